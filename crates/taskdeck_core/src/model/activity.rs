//! Activity history domain model.
//!
//! # Responsibility
//! - Define the append-only activity event record and its kind catalogue.
//! - Carry enough denormalized context (names, not just ids) to render
//!   history after the referenced entities are gone.
//!
//! # Invariants
//! - Events are immutable once appended; the core never updates or deletes
//!   them.

use crate::model::team::MemberId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an activity event.
pub type ActivityId = Uuid;

const DESCRIPTION_MAX_CHARS: usize = 500;

/// Reason tag recorded on capacity-driven reassignments.
pub const REASSIGN_REASON_CAPACITY: &str = "Auto reassignment due to capacity";

/// Catalogue of recordable activity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    TaskReassigned,
    TaskAutoReassigned,
    ProjectCreated,
    ProjectUpdated,
    ProjectDeleted,
    TeamCreated,
    TeamUpdated,
    TeamDeleted,
    MemberAdded,
    MemberRemoved,
}

impl ActivityKind {
    /// Stable string id used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TaskCreated => "TASK_CREATED",
            Self::TaskUpdated => "TASK_UPDATED",
            Self::TaskDeleted => "TASK_DELETED",
            Self::TaskReassigned => "TASK_REASSIGNED",
            Self::TaskAutoReassigned => "TASK_AUTO_REASSIGNED",
            Self::ProjectCreated => "PROJECT_CREATED",
            Self::ProjectUpdated => "PROJECT_UPDATED",
            Self::ProjectDeleted => "PROJECT_DELETED",
            Self::TeamCreated => "TEAM_CREATED",
            Self::TeamUpdated => "TEAM_UPDATED",
            Self::TeamDeleted => "TEAM_DELETED",
            Self::MemberAdded => "MEMBER_ADDED",
            Self::MemberRemoved => "MEMBER_REMOVED",
        }
    }

    /// Parses one activity kind from its stable string id.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "TASK_CREATED" => Some(Self::TaskCreated),
            "TASK_UPDATED" => Some(Self::TaskUpdated),
            "TASK_DELETED" => Some(Self::TaskDeleted),
            "TASK_REASSIGNED" => Some(Self::TaskReassigned),
            "TASK_AUTO_REASSIGNED" => Some(Self::TaskAutoReassigned),
            "PROJECT_CREATED" => Some(Self::ProjectCreated),
            "PROJECT_UPDATED" => Some(Self::ProjectUpdated),
            "PROJECT_DELETED" => Some(Self::ProjectDeleted),
            "TEAM_CREATED" => Some(Self::TeamCreated),
            "TEAM_UPDATED" => Some(Self::TeamUpdated),
            "TEAM_DELETED" => Some(Self::TeamDeleted),
            "MEMBER_ADDED" => Some(Self::MemberAdded),
            "MEMBER_REMOVED" => Some(Self::MemberRemoved),
            _ => None,
        }
    }
}

/// Denormalized member reference inside an activity event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeRef {
    pub id: MemberId,
    pub name: String,
}

/// One appended activity row, as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub uuid: ActivityId,
    pub kind: ActivityKind,
    pub description: String,
    pub project: Option<Uuid>,
    pub task: Option<Uuid>,
    pub team: Option<Uuid>,
    pub member: Option<Uuid>,
    pub performed_by: Option<Uuid>,
    pub old_assignee: Option<AssigneeRef>,
    pub new_assignee: Option<AssigneeRef>,
    pub reason: Option<String>,
    /// Append time in epoch milliseconds.
    pub created_at: i64,
}

/// Payload for appending one activity event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivityEvent {
    pub kind: ActivityKind,
    pub description: String,
    pub project: Option<Uuid>,
    pub task: Option<Uuid>,
    pub team: Option<Uuid>,
    pub member: Option<Uuid>,
    pub performed_by: Option<Uuid>,
    pub old_assignee: Option<AssigneeRef>,
    pub new_assignee: Option<AssigneeRef>,
    pub reason: Option<String>,
}

impl NewActivityEvent {
    /// Creates an event payload with all optional context unset.
    pub fn new(kind: ActivityKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            project: None,
            task: None,
            team: None,
            member: None,
            performed_by: None,
            old_assignee: None,
            new_assignee: None,
            reason: None,
        }
    }

    /// Checks field-level invariants prior to append.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ActivityValidationError::BlankDescription);
        }
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(ActivityValidationError::DescriptionTooLong(
                description.chars().count(),
            ));
        }
        Ok(())
    }
}

/// Field-level validation failures for activity events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    BlankDescription,
    DescriptionTooLong(usize),
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankDescription => write!(f, "activity description must not be blank"),
            Self::DescriptionTooLong(len) => write!(
                f,
                "activity description exceeds {DESCRIPTION_MAX_CHARS} characters (got {len})"
            ),
        }
    }
}

impl Error for ActivityValidationError {}

#[cfg(test)]
mod tests {
    use super::ActivityKind;

    #[test]
    fn kind_string_ids_round_trip() {
        let kinds = [
            ActivityKind::TaskCreated,
            ActivityKind::TaskAutoReassigned,
            ActivityKind::ProjectDeleted,
            ActivityKind::MemberRemoved,
        ];
        for kind in kinds {
            assert_eq!(ActivityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ActivityKind::parse("NOT_A_KIND"), None);
    }
}
