//! Capacity-aware assignment and rebalance surface.
//!
//! # Responsibility
//! - Expose the scheduling operations callers wrap in transport layers:
//!   team load, auto-assign, assignment guard, guarded task creation, bulk
//!   rebalance.
//! - Drive the pure scheduler over fresh load snapshots and persist each
//!   applied move together with its audit record.
//!
//! # Invariants
//! - Load snapshots are recomputed from storage on every entry point; no
//!   scheduler state survives between calls.
//! - The working snapshot array of a rebalance is owned by that call.
//! - Each task move and its audit append commit as one transaction; moves
//!   already committed are never rolled back by later failures.
//! - Concurrent rebalances or manual edits are not detected (no optimistic
//!   locking); each individual move stays atomic regardless.

use crate::model::activity::{
    ActivityKind, AssigneeRef, NewActivityEvent, REASSIGN_REASON_CAPACITY,
};
use crate::model::project::ProjectId;
use crate::model::task::{Assignment, Task, TaskId, TaskPriority, TaskStatus};
use crate::model::team::{MemberId, TeamId};
use crate::repo::activity_repo::{ActivityRepository, SqliteActivityRepository};
use crate::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::team_repo::{SqliteTeamRepository, TeamRepository};
use crate::repo::RepoError;
use crate::scheduler::load::{LoadSnapshot, TeamLoad};
use crate::scheduler::rebalance::{reassignment_candidates, DestinationPool};
use crate::scheduler::select::{capacity_warning, pick_least_loaded, CapacityWarning};
use log::{debug, info};
use rusqlite::Connection;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Input for guarded task creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub project: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub assignment: Assignment,
    pub priority: TaskPriority,
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Creates an unassigned pending draft with medium priority.
    pub fn new(project: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project,
            title: title.into(),
            description: None,
            assignment: Assignment::Unassigned,
            priority: TaskPriority::Medium,
            status: TaskStatus::Pending,
        }
    }
}

/// Flags controlling guarded task creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateTaskOptions {
    /// Pick the least-loaded member instead of using the draft assignment.
    pub auto_assign: bool,
    /// Proceed past a capacity warning.
    pub force_assign: bool,
}

/// Outcome of the assignment guard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AssignmentCheck {
    Ok,
    Warning(CapacityWarning),
}

/// One applied move of a rebalance run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignmentRecord {
    pub task: TaskId,
    pub task_title: String,
    pub old_assignee: AssigneeRef,
    pub new_assignee: AssigneeRef,
    /// Apply time in epoch milliseconds.
    pub reassigned_at: i64,
    pub reason: String,
}

/// Result of one rebalance run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebalanceOutcome {
    pub message: String,
    pub moved: Vec<ReassignmentRecord>,
}

impl RebalanceOutcome {
    pub fn moved_count(&self) -> usize {
        self.moved.len()
    }
}

/// Errors from assignment and rebalance operations.
#[derive(Debug)]
pub enum AssignError {
    ProjectNotFound(ProjectId),
    ProjectNotLinkedToTeam(ProjectId),
    MemberNotInTeam(MemberId),
    NoMembersAvailable,
    /// Soft failure: the caller may retry with `force_assign`.
    CapacityExceeded(CapacityWarning),
    Repo(RepoError),
}

impl Display for AssignError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::ProjectNotLinkedToTeam(id) => {
                write!(f, "project is not linked to a team: {id}")
            }
            Self::MemberNotInTeam(id) => {
                write!(f, "member does not belong to the project's team: {id}")
            }
            Self::NoMembersAvailable => {
                write!(f, "no team members available for assignment")
            }
            Self::CapacityExceeded(warning) => write!(f, "{}", warning.message),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AssignError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AssignError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for AssignError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Scheduling surface over one storage connection.
///
/// Owns the mutable connection so each applied move can commit its task
/// mutation and audit append as one transaction.
pub struct AssignmentService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> AssignmentService<'conn> {
    /// Creates a service over a migrated/ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Fresh load snapshots for the project's team, in stable member order.
    ///
    /// An empty member list is a valid empty result, not an error.
    pub fn team_load(&self, project_id: ProjectId) -> Result<TeamLoad, AssignError> {
        let team = self.project_team(project_id)?;
        let members = self.snapshots_for_team(team)?;
        Ok(TeamLoad { team, members })
    }

    /// Picks the least-loaded member of the project's team.
    pub fn auto_assign_member(&self, project_id: ProjectId) -> Result<MemberId, AssignError> {
        let load = self.team_load(project_id)?;
        let picked = pick_least_loaded(&load.members).ok_or(AssignError::NoMembersAvailable)?;

        info!(
            "event=auto_assign module=scheduler status=ok project={} member={} load_ratio={:.2}",
            project_id,
            picked.member,
            picked.load_ratio()
        );
        Ok(picked.member)
    }

    /// Evaluates whether assigning one more task to `member` deserves a
    /// warning. Pre-condition check only; nothing is mutated.
    pub fn check_assignment(
        &self,
        project_id: ProjectId,
        member: MemberId,
    ) -> Result<AssignmentCheck, AssignError> {
        let load = self.team_load(project_id)?;
        let snapshot = load
            .members
            .iter()
            .find(|snapshot| snapshot.member == member)
            .ok_or(AssignError::MemberNotInTeam(member))?;

        Ok(match capacity_warning(snapshot) {
            Some(warning) => AssignmentCheck::Warning(warning),
            None => AssignmentCheck::Ok,
        })
    }

    /// Creates a task, optionally auto-assigning and enforcing the capacity
    /// guard.
    ///
    /// A warning on an explicitly assigned member aborts with
    /// `CapacityExceeded` unless `force_assign` is set. An assigned member
    /// outside the team's snapshot set skips the guard; referential
    /// integrity of the assignment is the CRUD layer's responsibility.
    pub fn create_task(
        &self,
        draft: TaskDraft,
        options: CreateTaskOptions,
    ) -> Result<Task, AssignError> {
        let team = self.project_team(draft.project)?;

        let mut task = Task {
            uuid: Uuid::new_v4(),
            project: draft.project,
            title: draft.title,
            description: draft.description,
            assignment: draft.assignment,
            priority: draft.priority,
            status: draft.status,
        };

        if options.auto_assign {
            task.assignment = Assignment::Member(self.auto_assign_member(draft.project)?);
        }

        if let Assignment::Member(member) = task.assignment {
            let snapshots = self.snapshots_for_team(team)?;
            let selected = snapshots.iter().find(|snapshot| snapshot.member == member);
            if let Some(snapshot) = selected {
                if let Some(warning) = capacity_warning(snapshot) {
                    if !options.force_assign {
                        return Err(AssignError::CapacityExceeded(warning));
                    }
                    debug!(
                        "event=task_create module=scheduler status=forced project={} member={} current_tasks={} capacity={}",
                        draft.project, member, snapshot.current_tasks, snapshot.capacity
                    );
                }
            }
        }

        let tasks = SqliteTaskRepository::try_new(&*self.conn)?;
        tasks.create_task(&task)?;

        info!(
            "event=task_create module=scheduler status=ok project={} task={} assignee={}",
            task.project, task.uuid, task.assignment
        );
        Ok(task)
    }

    /// Moves excess tasks away from over-capacity members onto members with
    /// spare capacity.
    ///
    /// Never fails because some tasks could not be moved; unmovable tasks
    /// stay where they are and the outcome simply reports fewer moves. Each
    /// applied move commits independently, so an error mid-run leaves prior
    /// moves (and their audit rows) in place.
    pub fn rebalance(
        &mut self,
        project_id: ProjectId,
        performed_by: Option<Uuid>,
    ) -> Result<RebalanceOutcome, AssignError> {
        info!(
            "event=rebalance module=scheduler status=start project={}",
            project_id
        );

        let team = self.project_team(project_id)?;
        // Working set owned by this call; mutated as moves are applied.
        let mut snapshots = self.snapshots_for_team(team)?;
        let project_tasks = {
            let tasks = SqliteTaskRepository::try_new(&*self.conn)?;
            tasks.active_assigned_in_project(project_id)?
        };

        let over_capacity: Vec<usize> = snapshots
            .iter()
            .enumerate()
            .filter(|(_, snapshot)| snapshot.is_over_capacity)
            .map(|(index, _)| index)
            .collect();

        if over_capacity.is_empty() {
            info!(
                "event=rebalance module=scheduler status=ok project={} moved=0 reason=no_over_capacity",
                project_id
            );
            return Ok(RebalanceOutcome {
                message: "No members are over capacity. No reassignments needed.".to_string(),
                moved: Vec::new(),
            });
        }

        let mut records: Vec<ReassignmentRecord> = Vec::new();

        for source in over_capacity {
            let excess = snapshots[source].excess() as usize;
            if excess == 0 {
                continue;
            }

            let moves: Vec<(TaskId, String)> =
                reassignment_candidates(&project_tasks, snapshots[source].member, excess)
                    .into_iter()
                    .map(|task| (task.uuid, task.title.clone()))
                    .collect();

            let mut pool = DestinationPool::new(&snapshots, source);

            for (task_id, task_title) in moves {
                let Some(destination) = pool.head() else {
                    // Destinations exhausted; the member's remaining excess
                    // stays assigned.
                    debug!(
                        "event=rebalance_skip module=scheduler status=ok project={} member={} reason=no_destinations",
                        project_id, snapshots[source].member
                    );
                    break;
                };

                let record = ReassignmentRecord {
                    task: task_id,
                    task_title,
                    old_assignee: AssigneeRef {
                        id: snapshots[source].member,
                        name: snapshots[source].name.clone(),
                    },
                    new_assignee: AssigneeRef {
                        id: snapshots[destination].member,
                        name: snapshots[destination].name.clone(),
                    },
                    reassigned_at: now_epoch_ms(),
                    reason: REASSIGN_REASON_CAPACITY.to_string(),
                };

                self.apply_move(project_id, team, performed_by, &record)?;

                snapshots[source].record_removed_task();
                snapshots[destination].record_added_task();
                pool.settle_after_move(&snapshots);

                debug!(
                    "event=rebalance_move module=scheduler status=ok project={} task={} from={} to={}",
                    project_id, record.task, record.old_assignee.id, record.new_assignee.id
                );

                records.push(record);
            }
        }

        info!(
            "event=rebalance module=scheduler status=ok project={} moved={}",
            project_id,
            records.len()
        );

        Ok(RebalanceOutcome {
            message: format!("Successfully reassigned {} task(s)", records.len()),
            moved: records,
        })
    }

    /// Commits one task move and its audit record as a single transaction.
    fn apply_move(
        &mut self,
        project: ProjectId,
        team: TeamId,
        performed_by: Option<Uuid>,
        record: &ReassignmentRecord,
    ) -> Result<(), AssignError> {
        let tx = self.conn.transaction()?;
        {
            let tasks = SqliteTaskRepository::try_new(&tx)?;
            tasks.update_assignee(record.task, Assignment::Member(record.new_assignee.id))?;

            let mut event = NewActivityEvent::new(
                ActivityKind::TaskAutoReassigned,
                format!(
                    "Task \"{}\" was automatically reassigned from {} to {} due to capacity constraints",
                    record.task_title, record.old_assignee.name, record.new_assignee.name
                ),
            );
            event.project = Some(project);
            event.task = Some(record.task);
            event.team = Some(team);
            event.member = Some(record.new_assignee.id);
            event.performed_by = performed_by;
            event.old_assignee = Some(record.old_assignee.clone());
            event.new_assignee = Some(record.new_assignee.clone());
            event.reason = Some(REASSIGN_REASON_CAPACITY.to_string());

            let activity = SqliteActivityRepository::try_new(&tx)?;
            activity.append(&event)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn project_team(&self, project_id: ProjectId) -> Result<TeamId, AssignError> {
        let projects = SqliteProjectRepository::try_new(&*self.conn)?;
        let project = projects
            .get_project(project_id)?
            .ok_or(AssignError::ProjectNotFound(project_id))?;
        project
            .team
            .ok_or(AssignError::ProjectNotLinkedToTeam(project_id))
    }

    fn snapshots_for_team(&self, team: TeamId) -> Result<Vec<LoadSnapshot>, AssignError> {
        let teams = SqliteTeamRepository::try_new(&*self.conn)?;
        let tasks = SqliteTaskRepository::try_new(&*self.conn)?;

        let members = teams.members_of(team)?;
        let mut snapshots = Vec::with_capacity(members.len());
        for member in &members {
            let current_tasks = tasks.count_active_for_member(member.uuid)?;
            snapshots.push(LoadSnapshot::new(member, current_tasks));
        }
        Ok(snapshots)
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
