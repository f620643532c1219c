//! Submission checks over the form state.
//!
//! Rules run in a fixed order and each maps to one user-facing message. The
//! controller surfaces the first failure; [`validate`] computes all of them.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::attachment::{is_accepted_media_type, ReceiptFile};
use crate::draft::{PaymentDetails, RegistrationDraft, TeamSize};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingRequiredField,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,
    #[error("Team size must be between {} and {}", TeamSize::MIN, TeamSize::MAX)]
    TeamSizeOutOfRange,
    /// `member` is 1-based, as shown to the user.
    #[error("Please enter name, roll number and program for member {member}")]
    IncompleteMember { member: usize },
    #[error("Please upload the payment receipt")]
    MissingReceipt,
    #[error("Payment receipt must be JPG, JPEG or PDF")]
    UnsupportedReceipt,
    #[error("Please provide UPI ID and transaction ID")]
    MissingPaymentDetails,
}

/// Borrowed view of everything a submission needs.
#[derive(Debug, Clone, Copy)]
pub struct FormView<'a> {
    pub draft: &'a RegistrationDraft,
    pub receipt: Option<&'a ReceiptFile>,
    pub payment: &'a PaymentDetails,
}

/// Every failing rule, in evaluation order.
pub fn validate(form: FormView<'_>) -> Vec<ValidationError> {
    let draft = form.draft;
    let mut failures = Vec::new();

    let required = [
        &draft.leader_name,
        &draft.email,
        &draft.phone,
        &draft.year,
        &draft.track,
    ];
    if required.iter().any(|v| v.is_empty()) {
        failures.push(ValidationError::MissingRequiredField);
    }
    if !is_valid_email(&draft.email) {
        failures.push(ValidationError::InvalidEmail);
    }
    if !is_valid_phone(&draft.phone) {
        failures.push(ValidationError::InvalidPhone);
    }
    if !(TeamSize::MIN..=TeamSize::MAX).contains(&draft.team_size().get()) {
        failures.push(ValidationError::TeamSizeOutOfRange);
    }
    failures.extend(
        draft
            .members()
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_complete())
            .map(|(i, _)| ValidationError::IncompleteMember { member: i + 1 }),
    );
    match form.receipt {
        None => failures.push(ValidationError::MissingReceipt),
        Some(file) if !is_accepted_media_type(&file.media_type) => {
            failures.push(ValidationError::UnsupportedReceipt)
        }
        Some(_) => {}
    }
    if form.payment.upi_id.is_empty() || form.payment.transaction_id.is_empty() {
        failures.push(ValidationError::MissingPaymentDetails);
    }

    failures
}

/// The failure the user sees, if any.
pub fn first_failure(form: FormView<'_>) -> Option<ValidationError> {
    validate(form).into_iter().next()
}

/// `local@domain.tld`: no whitespace, exactly one `@`, a dot after it.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"))
        .is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{DraftField, MemberField};

    fn complete_draft() -> RegistrationDraft {
        let mut draft = RegistrationDraft::default();
        draft.set_field(DraftField::LeaderName, "John Doe");
        draft.set_field(DraftField::Email, "john@geetauniversity.edu.in");
        draft.set_field(DraftField::Phone, "9876543210");
        draft.set_field(DraftField::Year, "2nd Year");
        draft.set_field(DraftField::Track, "AI & Machine Learning");
        for i in 0..2 {
            draft.set_member_field(i, MemberField::Name, format!("Member {i}"));
            draft.set_member_field(i, MemberField::RollNumber, format!("R{i}"));
            draft.set_member_field(i, MemberField::Program, "B.Tech CS");
        }
        draft
    }

    fn payment() -> PaymentDetails {
        PaymentDetails {
            upi_id: "john@upi".to_string(),
            transaction_id: "TXN123".to_string(),
        }
    }

    fn receipt() -> ReceiptFile {
        ReceiptFile::new("r.jpg", "image/jpeg", vec![0xFF, 0xD8])
    }

    #[test]
    fn complete_form_passes() {
        let draft = complete_draft();
        let file = receipt();
        let payment = payment();
        let form = FormView {
            draft: &draft,
            receipt: Some(&file),
            payment: &payment,
        };
        assert!(validate(form).is_empty());
        assert_eq!(first_failure(form), None);
    }

    #[test]
    fn missing_email_reports_required_fields_first() {
        let mut draft = complete_draft();
        draft.set_field(DraftField::Email, "");
        let file = receipt();
        let payment = payment();
        let form = FormView {
            draft: &draft,
            receipt: Some(&file),
            payment: &payment,
        };

        assert_eq!(
            validate(form),
            vec![
                ValidationError::MissingRequiredField,
                ValidationError::InvalidEmail
            ]
        );
        assert_eq!(
            first_failure(form).unwrap().to_string(),
            "Please fill in all required fields"
        );
    }

    #[test]
    fn team_name_is_optional() {
        let draft = complete_draft();
        assert!(draft.team_name.is_empty());
        let file = receipt();
        let payment = payment();
        assert!(first_failure(FormView {
            draft: &draft,
            receipt: Some(&file),
            payment: &payment,
        })
        .is_none());
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("john@geetauniversity.edu.in"));
        assert!(!is_valid_email("john@localhost"));
        assert!(!is_valid_email("john doe@x.in"));
        assert!(!is_valid_email("a@b@c.in"));
        assert!(!is_valid_email("@b.in"));
    }

    #[test]
    fn phone_must_be_ten_digits() {
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("987654321"));
        assert!(!is_valid_phone("98765432100"));
        assert!(!is_valid_phone("98765-4321"));
        assert!(!is_valid_phone("９８７６５４３２１０"));
    }

    #[test]
    fn incomplete_members_are_numbered_from_one() {
        let mut draft = complete_draft();
        draft.set_team_size(3);
        draft.set_member_field(0, MemberField::RollNumber, "  ");
        let file = receipt();
        let payment = payment();

        let failures = validate(FormView {
            draft: &draft,
            receipt: Some(&file),
            payment: &payment,
        });

        assert_eq!(
            failures,
            vec![
                ValidationError::IncompleteMember { member: 1 },
                ValidationError::IncompleteMember { member: 3 },
            ]
        );
        assert_eq!(
            failures[1].to_string(),
            "Please enter name, roll number and program for member 3"
        );
    }

    #[test]
    fn receipt_and_payment_rules() {
        let draft = complete_draft();
        let empty = PaymentDetails::default();
        let png = ReceiptFile::new("r.png", "image/png", vec![1]);

        assert_eq!(
            validate(FormView {
                draft: &draft,
                receipt: None,
                payment: &empty,
            }),
            vec![
                ValidationError::MissingReceipt,
                ValidationError::MissingPaymentDetails
            ]
        );
        assert_eq!(
            first_failure(FormView {
                draft: &draft,
                receipt: Some(&png),
                payment: &payment(),
            }),
            Some(ValidationError::UnsupportedReceipt)
        );
    }

    #[test]
    fn either_payment_field_missing_fails() {
        let draft = complete_draft();
        let file = receipt();
        let no_upi = PaymentDetails {
            upi_id: String::new(),
            ..payment()
        };
        let no_txn = PaymentDetails {
            transaction_id: String::new(),
            ..payment()
        };

        for details in [&no_upi, &no_txn] {
            assert_eq!(
                validate(FormView {
                    draft: &draft,
                    receipt: Some(&file),
                    payment: details,
                }),
                vec![ValidationError::MissingPaymentDetails]
            );
        }
    }

    #[test]
    fn team_size_message_names_the_bounds() {
        assert_eq!(
            ValidationError::TeamSizeOutOfRange.to_string(),
            "Team size must be between 2 and 4"
        );
    }
}
