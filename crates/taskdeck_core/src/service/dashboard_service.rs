//! Overview summary use-case service.
//!
//! # Responsibility
//! - Aggregate store-wide counts, per-team member load and the most recent
//!   auto-reassignments into one read model.
//!
//! Pure read surface; deleted entities referenced by history rows degrade
//! to "Unknown" labels instead of failing the summary.

use crate::model::activity::ActivityKind;
use crate::model::project::ProjectId;
use crate::model::team::TeamId;
use crate::repo::activity_repo::{
    ActivityListQuery, ActivityRepository, SqliteActivityRepository,
};
use crate::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::team_repo::{SqliteTeamRepository, TeamRepository};
use crate::repo::RepoResult;
use crate::scheduler::load::LoadSnapshot;
use rusqlite::Connection;
use serde::Serialize;

const RECENT_REASSIGNMENT_LIMIT: u32 = 5;

/// Name/id pair for projects referenced from a team summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub id: ProjectId,
    pub name: String,
}

/// One team's load overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub team: TeamId,
    pub name: String,
    pub members: Vec<LoadSnapshot>,
    pub projects: Vec<ProjectRef>,
    pub total_members: usize,
    pub overloaded_members: usize,
}

/// One recent auto-reassignment, denormalized for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentReassignment {
    pub task_title: String,
    pub project_name: String,
    pub old_assignee: String,
    pub new_assignee: String,
    pub reassigned_at: i64,
    pub description: String,
}

/// Store-wide overview read model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_projects: u64,
    pub total_active_tasks: u64,
    pub teams: Vec<TeamSummary>,
    pub recent_reassignments: Vec<RecentReassignment>,
}

/// Read-only summary surface over one storage connection.
pub struct DashboardService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> DashboardService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Builds the full overview in one pass.
    pub fn summary(&self) -> RepoResult<DashboardSummary> {
        let projects = SqliteProjectRepository::try_new(self.conn)?;
        let teams = SqliteTeamRepository::try_new(self.conn)?;
        let tasks = SqliteTaskRepository::try_new(self.conn)?;
        let activity = SqliteActivityRepository::try_new(self.conn)?;

        let total_projects = projects.count_projects()?;
        let total_active_tasks = tasks.count_active()?;

        let mut team_summaries = Vec::new();
        for team in teams.list_teams()? {
            let members = teams.members_of(team.uuid)?;
            let mut snapshots = Vec::with_capacity(members.len());
            for member in &members {
                let current_tasks = tasks.count_active_for_member(member.uuid)?;
                snapshots.push(LoadSnapshot::new(member, current_tasks));
            }

            let overloaded_members = snapshots
                .iter()
                .filter(|snapshot| snapshot.is_over_capacity)
                .count();
            let team_projects = projects
                .projects_of_team(team.uuid)?
                .into_iter()
                .map(|project| ProjectRef {
                    id: project.uuid,
                    name: project.name,
                })
                .collect();

            team_summaries.push(TeamSummary {
                team: team.uuid,
                name: team.name,
                total_members: snapshots.len(),
                overloaded_members,
                members: snapshots,
                projects: team_projects,
            });
        }

        let recent = activity.list(&ActivityListQuery {
            kind: Some(ActivityKind::TaskAutoReassigned),
            limit: Some(RECENT_REASSIGNMENT_LIMIT),
            ..ActivityListQuery::default()
        })?;

        let mut recent_reassignments = Vec::with_capacity(recent.events.len());
        for event in recent.events {
            let task_title = match event.task {
                Some(id) => tasks.get_task(id)?.map(|task| task.title),
                None => None,
            };
            let project_name = match event.project {
                Some(id) => projects.get_project(id)?.map(|project| project.name),
                None => None,
            };

            recent_reassignments.push(RecentReassignment {
                task_title: task_title.unwrap_or_else(|| "Unknown Task".to_string()),
                project_name: project_name.unwrap_or_else(|| "Unknown Project".to_string()),
                old_assignee: event
                    .old_assignee
                    .map_or_else(|| "Unknown".to_string(), |assignee| assignee.name),
                new_assignee: event
                    .new_assignee
                    .map_or_else(|| "Unknown".to_string(), |assignee| assignee.name),
                reassigned_at: event.created_at,
                description: event.description,
            });
        }

        Ok(DashboardSummary {
            total_projects,
            total_active_tasks,
            teams: team_summaries,
            recent_reassignments,
        })
    }
}
