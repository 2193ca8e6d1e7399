//! Core domain logic for TaskDeck.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod scheduler;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{ActivityEvent, ActivityId, ActivityKind, NewActivityEvent};
pub use model::project::{Project, ProjectId};
pub use model::task::{Assignment, Task, TaskId, TaskPriority, TaskStatus};
pub use model::team::{MemberId, Team, TeamId, TeamMember, MEMBER_CAPACITY_MAX};
pub use repo::activity_repo::{
    ActivityListQuery, ActivityPage, ActivityRepository, SqliteActivityRepository,
};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::team_repo::{SqliteTeamRepository, TeamRepository};
pub use repo::{RepoError, RepoResult};
pub use scheduler::load::{LoadSnapshot, TeamLoad};
pub use scheduler::select::{capacity_warning, pick_least_loaded, CapacityWarning};
pub use service::activity_service::ActivityService;
pub use service::assignment_service::{
    AssignError, AssignmentCheck, AssignmentService, CreateTaskOptions, RebalanceOutcome,
    ReassignmentRecord, TaskDraft,
};
pub use service::dashboard_service::{DashboardService, DashboardSummary};
pub use service::project_service::ProjectService;
pub use service::task_service::TaskService;
pub use service::team_service::TeamService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
