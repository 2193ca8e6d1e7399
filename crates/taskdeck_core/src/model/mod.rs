//! Domain model for teams, projects, tasks and the activity history.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Enforce field-level invariants before anything reaches storage.
//!
//! # Invariants
//! - Every domain object is identified by a stable uuid.
//! - Member capacity is an integer in `[0, 5]`.
//! - Task assignment is a sum type; the `"Unassigned"` sentinel exists only
//!   on the wire.

pub mod activity;
pub mod project;
pub mod task;
pub mod team;
