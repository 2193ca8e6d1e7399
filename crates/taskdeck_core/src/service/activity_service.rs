//! Activity history use-case service.
//!
//! # Responsibility
//! - Provide append and filtered listing entry points over the audit log.

use crate::model::activity::{ActivityId, NewActivityEvent};
use crate::repo::activity_repo::{ActivityListQuery, ActivityPage, ActivityRepository};
use crate::repo::RepoResult;

/// Use-case service wrapper for the append-only activity log.
pub struct ActivityService<R: ActivityRepository> {
    repo: R,
}

impl<R: ActivityRepository> ActivityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn append(&self, event: &NewActivityEvent) -> RepoResult<ActivityId> {
        self.repo.append(event)
    }

    pub fn list(&self, query: &ActivityListQuery) -> RepoResult<ActivityPage> {
        self.repo.list(query)
    }
}
