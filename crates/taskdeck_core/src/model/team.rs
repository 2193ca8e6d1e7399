//! Team and team-member domain model.
//!
//! # Responsibility
//! - Define the team aggregate and the member records tasks are assigned to.
//! - Validate name/role lengths and the capacity range.
//!
//! # Invariants
//! - `capacity` is an integer in `[0, MEMBER_CAPACITY_MAX]`.
//! - A member belongs to exactly one team; tasks reference members but never
//!   own them.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a team.
pub type TeamId = Uuid;
/// Stable identifier for a team member.
pub type MemberId = Uuid;

/// Maximum concurrent non-done tasks a member may be sized for.
pub const MEMBER_CAPACITY_MAX: u8 = 5;

const NAME_MAX_CHARS: usize = 100;
const ROLE_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 500;

/// A team owning members; projects link to teams by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub uuid: TeamId,
    pub name: String,
    pub description: Option<String>,
    /// Creating user, when the surrounding system tracks one.
    pub created_by: Option<Uuid>,
}

impl Team {
    /// Creates a team with a generated stable id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            description: None,
            created_by: None,
        }
    }

    /// Checks field-level invariants prior to persistence.
    pub fn validate(&self) -> Result<(), TeamValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(TeamValidationError::BlankName);
        }
        if name.chars().count() > NAME_MAX_CHARS {
            return Err(TeamValidationError::NameTooLong(name.chars().count()));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX_CHARS {
                return Err(TeamValidationError::DescriptionTooLong(
                    description.chars().count(),
                ));
            }
        }
        Ok(())
    }
}

/// A person on a team, sized by how many concurrent tasks they can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub uuid: MemberId,
    pub team: TeamId,
    pub name: String,
    /// Free-text role label ("Backend", "QA", ...).
    pub role: String,
    pub capacity: u8,
}

impl TeamMember {
    /// Creates a member with a generated stable id.
    pub fn new(team: TeamId, name: impl Into<String>, role: impl Into<String>, capacity: u8) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            team,
            name: name.into(),
            role: role.into(),
            capacity,
        }
    }

    /// Checks field-level invariants prior to persistence.
    pub fn validate(&self) -> Result<(), TeamValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(TeamValidationError::BlankName);
        }
        if name.chars().count() > NAME_MAX_CHARS {
            return Err(TeamValidationError::NameTooLong(name.chars().count()));
        }
        let role = self.role.trim();
        if role.is_empty() {
            return Err(TeamValidationError::BlankRole);
        }
        if role.chars().count() > ROLE_MAX_CHARS {
            return Err(TeamValidationError::RoleTooLong(role.chars().count()));
        }
        if self.capacity > MEMBER_CAPACITY_MAX {
            return Err(TeamValidationError::CapacityOutOfRange(self.capacity));
        }
        Ok(())
    }
}

/// Field-level validation failures for team and member records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamValidationError {
    BlankName,
    NameTooLong(usize),
    BlankRole,
    RoleTooLong(usize),
    DescriptionTooLong(usize),
    CapacityOutOfRange(u8),
}

impl Display for TeamValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "name must not be blank"),
            Self::NameTooLong(len) => {
                write!(f, "name exceeds {NAME_MAX_CHARS} characters (got {len})")
            }
            Self::BlankRole => write!(f, "role must not be blank"),
            Self::RoleTooLong(len) => {
                write!(f, "role exceeds {ROLE_MAX_CHARS} characters (got {len})")
            }
            Self::DescriptionTooLong(len) => write!(
                f,
                "description exceeds {DESCRIPTION_MAX_CHARS} characters (got {len})"
            ),
            Self::CapacityOutOfRange(value) => write!(
                f,
                "capacity must be between 0 and {MEMBER_CAPACITY_MAX}, got {value}"
            ),
        }
    }
}

impl Error for TeamValidationError {}
