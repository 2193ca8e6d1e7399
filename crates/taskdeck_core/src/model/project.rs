//! Project domain model.
//!
//! # Responsibility
//! - Define the project record tasks belong to.
//! - Validate name/description lengths.
//!
//! # Invariants
//! - A project is optionally linked to one team; scheduling operations
//!   require the link to be present.

use crate::model::team::TeamId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

const NAME_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 500;

/// A project grouping tasks; scheduling resolves its team for capacity data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub uuid: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub team: Option<TeamId>,
}

impl Project {
    /// Creates a project with a generated stable id, not yet linked to a team.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            description: None,
            team: None,
        }
    }

    /// Checks field-level invariants prior to persistence.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProjectValidationError::BlankName);
        }
        if name.chars().count() > NAME_MAX_CHARS {
            return Err(ProjectValidationError::NameTooLong(name.chars().count()));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX_CHARS {
                return Err(ProjectValidationError::DescriptionTooLong(
                    description.chars().count(),
                ));
            }
        }
        Ok(())
    }
}

/// Field-level validation failures for project records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    BlankName,
    NameTooLong(usize),
    DescriptionTooLong(usize),
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "project name must not be blank"),
            Self::NameTooLong(len) => {
                write!(f, "project name exceeds {NAME_MAX_CHARS} characters (got {len})")
            }
            Self::DescriptionTooLong(len) => write!(
                f,
                "project description exceeds {DESCRIPTION_MAX_CHARS} characters (got {len})"
            ),
        }
    }
}

impl Error for ProjectValidationError {}
