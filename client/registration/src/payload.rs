//! Wire shape of a registration: a `multipart/form-data` body.

use reqwest::multipart::{Form, Part};
use reqwest::Body;

use crate::attachment::ReceiptFile;
use crate::catalog::FEE_PER_MEMBER;
use crate::draft::{PaymentDetails, RegistrationDraft, TeamMember, TeamSize};
use crate::errors::Result;

/// Placeholder sent when the team did not pick a name.
const UNNAMED_TEAM: &str = "-";

pub fn total_fee(team_size: TeamSize) -> u32 {
    FEE_PER_MEMBER * team_size.get() as u32
}

/// Snapshot of a validated form, detached from the controller so that edits
/// made while the request is in flight do not leak into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub year: String,
    pub team_name: String,
    pub track: String,
    pub team_size: TeamSize,
    pub team_members: Vec<TeamMember>,
    pub upi_id: String,
    pub transaction_id: String,
    pub payment_receipt: ReceiptFile,
    pub fee_per_member: u32,
    pub total_fee: u32,
}

impl RegistrationPayload {
    pub fn new(draft: &RegistrationDraft, payment: &PaymentDetails, receipt: &ReceiptFile) -> Self {
        let team_name = if draft.team_name.is_empty() {
            UNNAMED_TEAM.to_string()
        } else {
            draft.team_name.clone()
        };
        Self {
            name: draft.leader_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            year: draft.year.clone(),
            team_name,
            track: draft.track.clone(),
            team_size: draft.team_size(),
            team_members: draft.members().to_vec(),
            upi_id: payment.upi_id.clone(),
            transaction_id: payment.transaction_id.clone(),
            payment_receipt: receipt.clone(),
            fee_per_member: FEE_PER_MEMBER,
            total_fee: total_fee(draft.team_size()),
        }
    }

    /// Text parts in the order they are sent. `paymentReceipt` goes between
    /// `transactionId` and `feePerMember`.
    pub fn text_fields(&self) -> Result<Vec<(&'static str, String)>> {
        Ok(vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("phone", self.phone.clone()),
            ("year", self.year.clone()),
            ("teamName", self.team_name.clone()),
            ("track", self.track.clone()),
            ("teamSize", self.team_size.get().to_string()),
            ("teamMembers", serde_json::to_string(&self.team_members)?),
            ("upiId", self.upi_id.clone()),
            ("transactionId", self.transaction_id.clone()),
            ("feePerMember", self.fee_per_member.to_string()),
            ("totalFee", self.total_fee.to_string()),
        ])
    }

    pub fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for (key, value) in self.text_fields()? {
            if key == "feePerMember" {
                form = form.part("paymentReceipt", self.receipt_part()?);
            }
            form = form.text(key, value);
        }
        Ok(form)
    }

    fn receipt_part(&self) -> Result<Part> {
        let receipt = &self.payment_receipt;
        let part = Part::stream_with_length(
            Body::from(receipt.bytes.clone()),
            receipt.bytes.len() as u64,
        )
        .file_name(receipt.file_name.clone())
        .mime_str(&receipt.media_type)?;
        Ok(part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{DraftField, MemberField};

    fn payload_for(size: i64, team_name: &str) -> RegistrationPayload {
        let mut draft = RegistrationDraft::default();
        draft.set_field(DraftField::LeaderName, "John Doe");
        draft.set_field(DraftField::TeamName, team_name);
        draft.set_team_size(size);
        draft.set_member_field(0, MemberField::RollNumber, "GU-001");
        let payment = PaymentDetails {
            upi_id: "john@upi".to_string(),
            transaction_id: "TXN123".to_string(),
        };
        let receipt = ReceiptFile::new("r.jpg", "image/jpeg", vec![0xFF, 0xD8]);
        RegistrationPayload::new(&draft, &payment, &receipt)
    }

    #[test]
    fn fees_follow_team_size() {
        assert_eq!(payload_for(2, "").total_fee, 100);
        assert_eq!(payload_for(4, "").total_fee, 200);
        assert_eq!(payload_for(3, "").fee_per_member, FEE_PER_MEMBER);
    }

    #[test]
    fn blank_team_name_is_sent_as_dash() {
        assert_eq!(payload_for(2, "").team_name, "-");
        assert_eq!(payload_for(2, "Night Owls").team_name, "Night Owls");
    }

    #[test]
    fn members_serialize_with_camel_case_keys() {
        let fields = payload_for(2, "").text_fields().unwrap();
        let members = &fields.iter().find(|(k, _)| *k == "teamMembers").unwrap().1;
        let parsed: serde_json::Value = serde_json::from_str(members).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["rollNumber"], "GU-001");
        assert_eq!(parsed[1]["name"], "");
    }

    #[test]
    fn field_order_matches_endpoint_contract() {
        let keys: Vec<_> = payload_for(3, "")
            .text_fields()
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            [
                "name",
                "email",
                "phone",
                "year",
                "teamName",
                "track",
                "teamSize",
                "teamMembers",
                "upiId",
                "transactionId",
                "feePerMember",
                "totalFee",
            ]
        );
    }

    #[test]
    fn form_builds_with_receipt_part() {
        let form = payload_for(2, "").into_form().unwrap();
        assert!(!form.boundary().is_empty());
    }
}
