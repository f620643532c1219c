//! Working state of the registration form: the draft, its team roster and
//! the payment details.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Number of people on a team. Always in `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct TeamSize(u8);

impl TeamSize {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 4;

    /// Clamp any integer into the accepted range.
    pub fn clamped(n: i64) -> Self {
        Self(n.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Default for TeamSize {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl From<TeamSize> for u8 {
    fn from(size: TeamSize) -> u8 {
        size.0
    }
}

impl TryFrom<u8> for TeamSize {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(format!(
                "team size {n} is outside {}..={}",
                Self::MIN,
                Self::MAX
            ))
        }
    }
}

/// One roster entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMember {
    pub name: String,
    pub roll_number: String,
    pub program: String,
}

impl TeamMember {
    pub fn new(name: &str, roll_number: &str, program: &str) -> Self {
        Self {
            name: name.to_string(),
            roll_number: roll_number.to_string(),
            program: program.to_string(),
        }
    }

    /// All three fields carry something other than whitespace.
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.roll_number, &self.program]
            .iter()
            .all(|v| !v.trim().is_empty())
    }

    fn field_mut(&mut self, field: MemberField) -> &mut String {
        match field {
            MemberField::Name => &mut self.name,
            MemberField::RollNumber => &mut self.roll_number,
            MemberField::Program => &mut self.program,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberField {
    Name,
    RollNumber,
    Program,
}

/// Free-text fields of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    LeaderName,
    Email,
    Phone,
    Year,
    TeamName,
    Track,
}

/// The in-progress registration plus its size-synchronised roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub leader_name: String,
    pub email: String,
    pub phone: String,
    pub year: String,
    pub team_name: String,
    pub track: String,
    team_size: TeamSize,
    members: Vec<TeamMember>,
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        let team_size = TeamSize::default();
        Self {
            leader_name: String::new(),
            email: String::new(),
            phone: String::new(),
            year: String::new(),
            team_name: String::new(),
            track: String::new(),
            team_size,
            members: vec![TeamMember::default(); team_size.as_usize()],
        }
    }
}

impl RegistrationDraft {
    pub fn team_size(&self) -> TeamSize {
        self.team_size
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::LeaderName => &mut self.leader_name,
            DraftField::Email => &mut self.email,
            DraftField::Phone => &mut self.phone,
            DraftField::Year => &mut self.year,
            DraftField::TeamName => &mut self.team_name,
            DraftField::Track => &mut self.track,
        };
        *slot = value.into();
    }

    /// Resize the roster to `n` members, clamped to the accepted range.
    /// Members at retained indices keep their contents.
    pub fn set_team_size(&mut self, n: i64) -> TeamSize {
        let size = TeamSize::clamped(n);
        if size.get() as i64 != n {
            debug!("team size {n} clamped to {}", size.get());
        }
        self.team_size = size;
        self.members.resize_with(size.as_usize(), TeamMember::default);
        size
    }

    /// Replace one field of roster entry `index`. Returns `false` (and changes
    /// nothing) when `index` is past the end of the roster.
    pub fn set_member_field(
        &mut self,
        index: usize,
        field: MemberField,
        value: impl Into<String>,
    ) -> bool {
        match self.members.get_mut(index) {
            Some(member) => {
                *member.field_mut(field) = value.into();
                true
            }
            None => {
                warn!(
                    "ignoring edit of member {index}; roster has {} entries",
                    self.members.len()
                );
                false
            }
        }
    }
}

/// UPI transaction metadata entered alongside the receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentDetails {
    pub upi_id: String,
    pub transaction_id: String,
}
