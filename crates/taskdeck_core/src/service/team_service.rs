//! Team/member use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for team management callers.
//! - Verify cross-record preconditions (member's team must exist) above the
//!   repository layer.

use crate::model::team::{MemberId, Team, TeamId, TeamMember};
use crate::repo::team_repo::TeamRepository;
use crate::repo::{RepoError, RepoResult};

/// Use-case service wrapper for team and member operations.
pub struct TeamService<R: TeamRepository> {
    repo: R,
}

impl<R: TeamRepository> TeamService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_team(&self, team: &Team) -> RepoResult<TeamId> {
        self.repo.create_team(team)
    }

    pub fn get_team(&self, id: TeamId) -> RepoResult<Option<Team>> {
        self.repo.get_team(id)
    }

    pub fn list_teams(&self) -> RepoResult<Vec<Team>> {
        self.repo.list_teams()
    }

    pub fn update_team(&self, team: &Team) -> RepoResult<()> {
        self.repo.update_team(team)
    }

    /// Deletes a team together with its members.
    pub fn delete_team(&self, id: TeamId) -> RepoResult<()> {
        self.repo.delete_team(id)
    }

    /// Adds a member after verifying the target team exists.
    pub fn add_member(&self, member: &TeamMember) -> RepoResult<MemberId> {
        if self.repo.get_team(member.team)?.is_none() {
            return Err(RepoError::TeamNotFound(member.team));
        }
        self.repo.add_member(member)
    }

    pub fn get_member(&self, id: MemberId) -> RepoResult<Option<TeamMember>> {
        self.repo.get_member(id)
    }

    pub fn update_member(&self, member: &TeamMember) -> RepoResult<()> {
        self.repo.update_member(member)
    }

    /// Removes a member; their tasks revert to unassigned at the storage
    /// layer.
    pub fn remove_member(&self, id: MemberId) -> RepoResult<()> {
        self.repo.remove_member(id)
    }

    /// Members of one team in stable creation order.
    pub fn members_of(&self, team: TeamId) -> RepoResult<Vec<TeamMember>> {
        self.repo.members_of(team)
    }
}
