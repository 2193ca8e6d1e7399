//! Team/member repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `teams` and `team_members`.
//! - Keep member listing order stable for scheduling iteration.
//!
//! # Invariants
//! - Write paths validate models before SQL mutations.
//! - Deleting a team removes its members (FK cascade).
//! - `members_of` returns members in creation order.

use crate::repo::{ensure_connection_ready, parse_uuid_column, RepoError, RepoResult};
use crate::model::team::{MemberId, Team, TeamId, TeamMember};
use rusqlite::{params, Connection, Row};

const TEAM_SELECT_SQL: &str = "SELECT uuid, name, description, created_by FROM teams";
const MEMBER_SELECT_SQL: &str =
    "SELECT uuid, team_uuid, name, role, capacity FROM team_members";

/// Repository interface for team and member operations.
pub trait TeamRepository {
    fn create_team(&self, team: &Team) -> RepoResult<TeamId>;
    fn get_team(&self, id: TeamId) -> RepoResult<Option<Team>>;
    fn list_teams(&self) -> RepoResult<Vec<Team>>;
    fn update_team(&self, team: &Team) -> RepoResult<()>;
    fn delete_team(&self, id: TeamId) -> RepoResult<()>;
    fn add_member(&self, member: &TeamMember) -> RepoResult<MemberId>;
    fn get_member(&self, id: MemberId) -> RepoResult<Option<TeamMember>>;
    fn update_member(&self, member: &TeamMember) -> RepoResult<()>;
    fn remove_member(&self, id: MemberId) -> RepoResult<()>;
    /// Members of one team in stable creation order.
    fn members_of(&self, team: TeamId) -> RepoResult<Vec<TeamMember>>;
}

/// SQLite-backed team repository.
pub struct SqliteTeamRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeamRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "teams")?;
        ensure_connection_ready(conn, "team_members")?;
        Ok(Self { conn })
    }
}

impl TeamRepository for SqliteTeamRepository<'_> {
    fn create_team(&self, team: &Team) -> RepoResult<TeamId> {
        team.validate()?;

        self.conn.execute(
            "INSERT INTO teams (uuid, name, description, created_by)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                team.uuid.to_string(),
                team.name.trim(),
                team.description.as_deref(),
                team.created_by.map(|id| id.to_string()),
            ],
        )?;

        Ok(team.uuid)
    }

    fn get_team(&self, id: TeamId) -> RepoResult<Option<Team>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEAM_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_team_row(row)?));
        }
        Ok(None)
    }

    fn list_teams(&self) -> RepoResult<Vec<Team>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEAM_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut teams = Vec::new();
        while let Some(row) = rows.next()? {
            teams.push(parse_team_row(row)?);
        }
        Ok(teams)
    }

    fn update_team(&self, team: &Team) -> RepoResult<()> {
        team.validate()?;

        let changed = self.conn.execute(
            "UPDATE teams
             SET
                name = ?1,
                description = ?2,
                created_by = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4;",
            params![
                team.name.trim(),
                team.description.as_deref(),
                team.created_by.map(|id| id.to_string()),
                team.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::TeamNotFound(team.uuid));
        }

        Ok(())
    }

    fn delete_team(&self, id: TeamId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM teams WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::TeamNotFound(id));
        }

        Ok(())
    }

    fn add_member(&self, member: &TeamMember) -> RepoResult<MemberId> {
        member.validate()?;

        self.conn.execute(
            "INSERT INTO team_members (uuid, team_uuid, name, role, capacity)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                member.uuid.to_string(),
                member.team.to_string(),
                member.name.trim(),
                member.role.trim(),
                member.capacity,
            ],
        )?;

        Ok(member.uuid)
    }

    fn get_member(&self, id: MemberId) -> RepoResult<Option<TeamMember>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMBER_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_member_row(row)?));
        }
        Ok(None)
    }

    fn update_member(&self, member: &TeamMember) -> RepoResult<()> {
        member.validate()?;

        let changed = self.conn.execute(
            "UPDATE team_members
             SET
                team_uuid = ?1,
                name = ?2,
                role = ?3,
                capacity = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?5;",
            params![
                member.team.to_string(),
                member.name.trim(),
                member.role.trim(),
                member.capacity,
                member.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::MemberNotFound(member.uuid));
        }

        Ok(())
    }

    fn remove_member(&self, id: MemberId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM team_members WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::MemberNotFound(id));
        }

        Ok(())
    }

    fn members_of(&self, team: TeamId) -> RepoResult<Vec<TeamMember>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL} WHERE team_uuid = ?1 ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([team.to_string()])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }
        Ok(members)
    }
}

fn parse_team_row(row: &Row<'_>) -> RepoResult<Team> {
    let uuid = parse_uuid_column(row.get("uuid")?, "teams.uuid")?;
    let created_by = match row.get::<_, Option<String>>("created_by")? {
        Some(value) => Some(parse_uuid_column(value, "teams.created_by")?),
        None => None,
    };

    Ok(Team {
        uuid,
        name: row.get("name")?,
        description: row.get("description")?,
        created_by,
    })
}

fn parse_member_row(row: &Row<'_>) -> RepoResult<TeamMember> {
    let uuid = parse_uuid_column(row.get("uuid")?, "team_members.uuid")?;
    let team = parse_uuid_column(row.get("team_uuid")?, "team_members.team_uuid")?;

    let capacity = match row.get::<_, i64>("capacity")? {
        value @ 0..=5 => value as u8,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid capacity value `{other}` in team_members.capacity"
            )));
        }
    };

    let member = TeamMember {
        uuid,
        team,
        name: row.get("name")?,
        role: row.get("role")?,
        capacity,
    };
    member.validate()?;
    Ok(member)
}
