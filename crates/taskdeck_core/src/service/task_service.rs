//! Task use-case service for assignment-agnostic mutations.
//!
//! # Responsibility
//! - Provide get/update/delete/list entry points for task callers.
//!
//! Assignment-aware task creation lives in the assignment service; plain
//! updates here perform no capacity checks, matching the external contract
//! (the guard fires on create only).

use crate::model::project::ProjectId;
use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for task CRUD operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(id)
    }

    pub fn list_by_project(&self, project: ProjectId) -> RepoResult<Vec<Task>> {
        self.repo.list_by_project(project)
    }

    pub fn update_task(&self, task: &Task) -> RepoResult<()> {
        self.repo.update_task(task)
    }

    pub fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        self.repo.delete_task(id)
    }
}
