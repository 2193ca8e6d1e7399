//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Host the assignment/rebalance surface the transport layer calls into.

pub mod activity_service;
pub mod assignment_service;
pub mod dashboard_service;
pub mod project_service;
pub mod task_service;
pub mod team_service;
