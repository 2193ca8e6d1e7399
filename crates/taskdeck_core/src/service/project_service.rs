//! Project use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for project management callers.
//! - Delegate persistence to repository implementations.

use crate::model::project::{Project, ProjectId};
use crate::repo::project_repo::ProjectRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for project CRUD operations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        self.repo.create_project(project)
    }

    pub fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        self.repo.get_project(id)
    }

    pub fn list_projects(&self) -> RepoResult<Vec<Project>> {
        self.repo.list_projects()
    }

    pub fn update_project(&self, project: &Project) -> RepoResult<()> {
        self.repo.update_project(project)
    }

    /// Deletes a project together with its tasks.
    pub fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        self.repo.delete_project(id)
    }
}
