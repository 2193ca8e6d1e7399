//! Activity history repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Append immutable activity rows and serve filtered, paginated history.
//!
//! # Invariants
//! - Append-only: no update or delete API exists on this repository.
//! - Listing returns newest rows first.

use crate::repo::{ensure_connection_ready, parse_uuid_column, RepoError, RepoResult};
use crate::model::activity::{
    ActivityEvent, ActivityId, ActivityKind, AssigneeRef, NewActivityEvent,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const ACTIVITY_SELECT_SQL: &str = "SELECT
    uuid,
    kind,
    description,
    project_uuid,
    task_uuid,
    team_uuid,
    member_uuid,
    performed_by,
    old_assignee_uuid,
    old_assignee_name,
    new_assignee_uuid,
    new_assignee_name,
    reason,
    created_at
FROM activity_log";

const ACTIVITY_DEFAULT_LIMIT: u32 = 50;
const ACTIVITY_LIMIT_MAX: u32 = 200;

/// Query options for listing activity history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityListQuery {
    pub project: Option<Uuid>,
    pub task: Option<Uuid>,
    pub team: Option<Uuid>,
    pub kind: Option<ActivityKind>,
    /// Maximum rows to return. Defaults to 50 and clamps to 200.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// One page of activity history plus the unpaginated total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityPage {
    pub events: Vec<ActivityEvent>,
    pub total: u64,
}

/// Repository interface for the append-only activity log.
pub trait ActivityRepository {
    /// Appends one event and returns its stable id.
    fn append(&self, event: &NewActivityEvent) -> RepoResult<ActivityId>;
    /// Lists events newest-first with optional filters.
    fn list(&self, query: &ActivityListQuery) -> RepoResult<ActivityPage>;
}

/// SQLite-backed activity repository.
pub struct SqliteActivityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActivityRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "activity_log")?;
        Ok(Self { conn })
    }
}

impl ActivityRepository for SqliteActivityRepository<'_> {
    fn append(&self, event: &NewActivityEvent) -> RepoResult<ActivityId> {
        event.validate()?;

        let uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO activity_log (
                uuid,
                kind,
                description,
                project_uuid,
                task_uuid,
                team_uuid,
                member_uuid,
                performed_by,
                old_assignee_uuid,
                old_assignee_name,
                new_assignee_uuid,
                new_assignee_name,
                reason
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
            params![
                uuid.to_string(),
                event.kind.as_str(),
                event.description.trim(),
                event.project.map(|id| id.to_string()),
                event.task.map(|id| id.to_string()),
                event.team.map(|id| id.to_string()),
                event.member.map(|id| id.to_string()),
                event.performed_by.map(|id| id.to_string()),
                event.old_assignee.as_ref().map(|a| a.id.to_string()),
                event.old_assignee.as_ref().map(|a| a.name.as_str()),
                event.new_assignee.as_ref().map(|a| a.id.to_string()),
                event.new_assignee.as_ref().map(|a| a.name.as_str()),
                event.reason.as_deref(),
            ],
        )?;

        Ok(uuid)
    }

    fn list(&self, query: &ActivityListQuery) -> RepoResult<ActivityPage> {
        let mut filter = String::from(" WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(project) = query.project {
            filter.push_str(" AND project_uuid = ?");
            bind_values.push(Value::Text(project.to_string()));
        }
        if let Some(task) = query.task {
            filter.push_str(" AND task_uuid = ?");
            bind_values.push(Value::Text(task.to_string()));
        }
        if let Some(team) = query.team {
            filter.push_str(" AND team_uuid = ?");
            bind_values.push(Value::Text(team.to_string()));
        }
        if let Some(kind) = query.kind {
            filter.push_str(" AND kind = ?");
            bind_values.push(Value::Text(kind.as_str().to_string()));
        }

        let total: u64 = self.conn.query_row(
            &format!("SELECT count(*) FROM activity_log{filter};"),
            params_from_iter(bind_values.clone()),
            |row| row.get(0),
        )?;

        let limit = query
            .limit
            .unwrap_or(ACTIVITY_DEFAULT_LIMIT)
            .min(ACTIVITY_LIMIT_MAX);
        let mut sql = format!(
            "{ACTIVITY_SELECT_SQL}{filter} ORDER BY created_at DESC, uuid DESC LIMIT ?"
        );
        bind_values.push(Value::Integer(i64::from(limit)));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }
        sql.push(';');

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_activity_row(row)?);
        }

        Ok(ActivityPage { events, total })
    }
}

fn parse_activity_row(row: &Row<'_>) -> RepoResult<ActivityEvent> {
    let uuid = parse_uuid_column(row.get("uuid")?, "activity_log.uuid")?;

    let kind_text: String = row.get("kind")?;
    let kind = ActivityKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid activity kind `{kind_text}` in activity_log.kind"
        ))
    })?;

    Ok(ActivityEvent {
        uuid,
        kind,
        description: row.get("description")?,
        project: parse_optional_uuid(row, "project_uuid")?,
        task: parse_optional_uuid(row, "task_uuid")?,
        team: parse_optional_uuid(row, "team_uuid")?,
        member: parse_optional_uuid(row, "member_uuid")?,
        performed_by: parse_optional_uuid(row, "performed_by")?,
        old_assignee: parse_assignee(row, "old_assignee_uuid", "old_assignee_name")?,
        new_assignee: parse_assignee(row, "new_assignee_uuid", "new_assignee_name")?,
        reason: row.get("reason")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_optional_uuid(row: &Row<'_>, column: &str) -> RepoResult<Option<Uuid>> {
    match row.get::<_, Option<String>>(column)? {
        Some(value) => Ok(Some(parse_uuid_column(
            value,
            &format!("activity_log.{column}"),
        )?)),
        None => Ok(None),
    }
}

fn parse_assignee(
    row: &Row<'_>,
    id_column: &str,
    name_column: &str,
) -> RepoResult<Option<AssigneeRef>> {
    let id = match row.get::<_, Option<String>>(id_column)? {
        Some(value) => parse_uuid_column(value, &format!("activity_log.{id_column}"))?,
        None => return Ok(None),
    };
    let name: Option<String> = row.get(name_column)?;
    Ok(Some(AssigneeRef {
        id,
        name: name.unwrap_or_else(|| "Unknown".to_string()),
    }))
}
