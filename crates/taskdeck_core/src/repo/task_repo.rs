//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `tasks` plus the scheduling queries the
//!   capacity index and rebalancer depend on.
//!
//! # Invariants
//! - Write paths validate models before SQL mutations.
//! - `count_active_for_member` counts across ALL projects (global load).
//! - An unassigned task is stored as NULL; the wire sentinel never reaches
//!   storage.

use crate::repo::{ensure_connection_ready, parse_uuid_column, RepoError, RepoResult};
use crate::model::task::{Assignment, Task, TaskId, TaskPriority, TaskStatus};
use crate::model::project::ProjectId;
use crate::model::team::MemberId;
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    project_uuid,
    title,
    description,
    assigned_member,
    priority,
    status
FROM tasks";

/// Repository interface for task CRUD and scheduling queries.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    fn list_by_project(&self, project: ProjectId) -> RepoResult<Vec<Task>>;
    /// Count of one member's non-done tasks across all projects.
    fn count_active_for_member(&self, member: MemberId) -> RepoResult<u32>;
    /// Count of all non-done tasks in the store.
    fn count_active(&self) -> RepoResult<u64>;
    /// Non-done, assigned tasks of one project, in stable creation order.
    fn active_assigned_in_project(&self, project: ProjectId) -> RepoResult<Vec<Task>>;
    /// Rewrites a task's assignee only.
    fn update_assignee(&self, id: TaskId, assignment: Assignment) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "tasks")?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (uuid, project_uuid, title, description, assigned_member, priority, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                task.uuid.to_string(),
                task.project.to_string(),
                task.title.trim(),
                task.description.as_deref(),
                task.assignment.member_id().map(|id| id.to_string()),
                priority_to_db(task.priority),
                status_to_db(task.status),
            ],
        )?;

        Ok(task.uuid)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                project_uuid = ?1,
                title = ?2,
                description = ?3,
                assigned_member = ?4,
                priority = ?5,
                status = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?7;",
            params![
                task.project.to_string(),
                task.title.trim(),
                task.description.as_deref(),
                task.assignment.member_id().map(|id| id.to_string()),
                priority_to_db(task.priority),
                status_to_db(task.status),
                task.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(task.uuid));
        }

        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }

    fn list_by_project(&self, project: ProjectId) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE project_uuid = ?1 ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([project.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn count_active_for_member(&self, member: MemberId) -> RepoResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT count(*) FROM tasks WHERE assigned_member = ?1 AND status != 'done';",
            [member.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn count_active(&self) -> RepoResult<u64> {
        let count: u64 = self.conn.query_row(
            "SELECT count(*) FROM tasks WHERE status != 'done';",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn active_assigned_in_project(&self, project: ProjectId) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE project_uuid = ?1
               AND status != 'done'
               AND assigned_member IS NOT NULL
             ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([project.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn update_assignee(&self, id: TaskId, assignment: Assignment) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                assigned_member = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?2;",
            params![
                assignment.member_id().map(|id| id.to_string()),
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid = parse_uuid_column(row.get("uuid")?, "tasks.uuid")?;
    let project = parse_uuid_column(row.get("project_uuid")?, "tasks.project_uuid")?;

    let assignment = match row.get::<_, Option<String>>("assigned_member")? {
        Some(value) => Assignment::Member(parse_uuid_column(value, "tasks.assigned_member")?),
        None => Assignment::Unassigned,
    };

    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority value `{priority_text}` in tasks.priority"
        ))
    })?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status value `{status_text}` in tasks.status"
        ))
    })?;

    let task = Task {
        uuid,
        project,
        title: row.get("title")?,
        description: row.get("description")?,
        assignment,
        priority,
        status,
    };
    task.validate()?;
    Ok(task)
}

fn priority_to_db(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "low",
        TaskPriority::Medium => "medium",
        TaskPriority::High => "high",
    }
}

fn parse_priority(value: &str) -> Option<TaskPriority> {
    match value {
        "low" => Some(TaskPriority::Low),
        "medium" => Some(TaskPriority::Medium),
        "high" => Some(TaskPriority::High),
        _ => None,
    }
}

fn status_to_db(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Done => "done",
    }
}

fn parse_status(value: &str) -> Option<TaskStatus> {
    match value {
        "pending" => Some(TaskStatus::Pending),
        "in_progress" => Some(TaskStatus::InProgress),
        "done" => Some(TaskStatus::Done),
        _ => None,
    }
}
