//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `projects`.
//!
//! # Invariants
//! - Write paths validate models before SQL mutations.
//! - Deleting a project removes its tasks (FK cascade).

use crate::repo::{ensure_connection_ready, parse_uuid_column, RepoError, RepoResult};
use crate::model::project::{Project, ProjectId};
use crate::model::team::TeamId;
use rusqlite::{params, Connection, Row};

const PROJECT_SELECT_SQL: &str = "SELECT uuid, name, description, team_uuid FROM projects";

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    fn update_project(&self, project: &Project) -> RepoResult<()>;
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
    /// Total number of projects in the store.
    fn count_projects(&self) -> RepoResult<u64>;
    /// Projects linked to one team, in stable creation order.
    fn projects_of_team(&self, team: TeamId) -> RepoResult<Vec<Project>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "projects")?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        project.validate()?;

        self.conn.execute(
            "INSERT INTO projects (uuid, name, description, team_uuid)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                project.uuid.to_string(),
                project.name.trim(),
                project.description.as_deref(),
                project.team.map(|id| id.to_string()),
            ],
        )?;

        Ok(project.uuid)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;

        let changed = self.conn.execute(
            "UPDATE projects
             SET
                name = ?1,
                description = ?2,
                team_uuid = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4;",
            params![
                project.name.trim(),
                project.description.as_deref(),
                project.team.map(|id| id.to_string()),
                project.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::ProjectNotFound(project.uuid));
        }

        Ok(())
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::ProjectNotFound(id));
        }

        Ok(())
    }

    fn count_projects(&self) -> RepoResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT count(*) FROM projects;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn projects_of_team(&self, team: TeamId) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} WHERE team_uuid = ?1 ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([team.to_string()])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let uuid = parse_uuid_column(row.get("uuid")?, "projects.uuid")?;
    let team = match row.get::<_, Option<String>>("team_uuid")? {
        Some(value) => Some(parse_uuid_column(value, "projects.team_uuid")?),
        None => None,
    };

    Ok(Project {
        uuid,
        name: row.get("name")?,
        description: row.get("description")?,
        team,
    })
}
