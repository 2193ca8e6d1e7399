//! Task domain model.
//!
//! # Responsibility
//! - Define the task record, its priority/status enums and the assignment
//!   sum type.
//! - Validate title/description lengths.
//!
//! # Invariants
//! - `assignment` is either `Unassigned` or a member of the task's project's
//!   team; the core never fabricates member ids.
//! - High-priority tasks are pinned: bulk reassignment must never move them.

use crate::model::project::ProjectId;
use crate::model::team::MemberId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

const TITLE_MAX_CHARS: usize = 200;
const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Wire form of an unassigned task's assignee field.
pub const UNASSIGNED_WIRE: &str = "Unassigned";

/// Task urgency. High-priority tasks are never auto-moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// Task lifecycle state. Only non-done tasks count toward member load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TaskStatus {
    /// Whether this task still occupies capacity.
    pub fn is_active(self) -> bool {
        self != Self::Done
    }
}

/// Who a task is assigned to.
///
/// Replaces the `"Unassigned"` string sentinel of the external contract with
/// a proper sum type; the sentinel survives only in the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Unassigned,
    Member(MemberId),
}

impl Assignment {
    /// Returns the assigned member id, if any.
    pub fn member_id(self) -> Option<MemberId> {
        match self {
            Self::Unassigned => None,
            Self::Member(id) => Some(id),
        }
    }

    pub fn is_assigned(self) -> bool {
        matches!(self, Self::Member(_))
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unassigned => write!(f, "{UNASSIGNED_WIRE}"),
            Self::Member(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for Assignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unassigned => serializer.serialize_str(UNASSIGNED_WIRE),
            Self::Member(id) => serializer.collect_str(id),
        }
    }
}

impl<'de> Deserialize<'de> for Assignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        if value == UNASSIGNED_WIRE {
            return Ok(Self::Unassigned);
        }
        Uuid::parse_str(&value)
            .map(Self::Member)
            .map_err(|_| D::Error::custom(format!("expected `{UNASSIGNED_WIRE}` or a member uuid, got `{value}`")))
    }
}

/// A unit of work belonging to exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub uuid: TaskId,
    pub project: ProjectId,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "assignedMember")]
    pub assignment: Assignment,
    pub priority: TaskPriority,
    pub status: TaskStatus,
}

impl Task {
    /// Creates an unassigned pending task with medium priority.
    pub fn new(project: ProjectId, title: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            project,
            title: title.into(),
            description: None,
            assignment: Assignment::Unassigned,
            priority: TaskPriority::Medium,
            status: TaskStatus::Pending,
        }
    }

    /// Checks field-level invariants prior to persistence.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(TaskValidationError::TitleTooLong(title.chars().count()));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX_CHARS {
                return Err(TaskValidationError::DescriptionTooLong(
                    description.chars().count(),
                ));
            }
        }
        Ok(())
    }
}

/// Field-level validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    BlankTitle,
    TitleTooLong(usize),
    DescriptionTooLong(usize),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::TitleTooLong(len) => {
                write!(f, "task title exceeds {TITLE_MAX_CHARS} characters (got {len})")
            }
            Self::DescriptionTooLong(len) => write!(
                f,
                "task description exceeds {DESCRIPTION_MAX_CHARS} characters (got {len})"
            ),
        }
    }
}

impl Error for TaskValidationError {}
