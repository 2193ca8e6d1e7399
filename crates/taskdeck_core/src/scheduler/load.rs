//! Per-member load snapshots (capacity index).
//!
//! # Responsibility
//! - Carry one member's capacity and current non-done task count, plus the
//!   derived ranking fields.
//!
//! # Invariants
//! - Derived fields (`load_percentage`, `is_over_capacity`) are refreshed on
//!   every count mutation.
//! - `load_percentage` is 0 for capacity-0 members, but the ranking ratio
//!   treats them as saturated (`+inf`).

use crate::model::team::{MemberId, TeamId, TeamMember};
use serde::Serialize;

/// One member's load at a point in time. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSnapshot {
    pub member: MemberId,
    pub name: String,
    pub role: String,
    pub capacity: u8,
    /// Non-done tasks assigned to this member across ALL projects.
    pub current_tasks: u32,
    pub load_percentage: f64,
    pub is_over_capacity: bool,
}

impl LoadSnapshot {
    /// Builds a snapshot from a member record and their current task count.
    pub fn new(member: &TeamMember, current_tasks: u32) -> Self {
        let mut snapshot = Self {
            member: member.uuid,
            name: member.name.clone(),
            role: member.role.clone(),
            capacity: member.capacity,
            current_tasks,
            load_percentage: 0.0,
            is_over_capacity: false,
        };
        snapshot.refresh();
        snapshot
    }

    /// Ranking ratio: `current/capacity`, with capacity 0 ranked saturated.
    pub fn load_ratio(&self) -> f64 {
        if self.capacity > 0 {
            f64::from(self.current_tasks) / f64::from(self.capacity)
        } else {
            f64::INFINITY
        }
    }

    /// How many more tasks fit before the member reaches capacity.
    pub fn spare_capacity(&self) -> i64 {
        i64::from(self.capacity) - i64::from(self.current_tasks)
    }

    /// Whether the member can take at least one more task.
    pub fn has_spare(&self) -> bool {
        u32::from(self.capacity) > self.current_tasks
    }

    /// Tasks above capacity; zero when at or under capacity.
    pub fn excess(&self) -> u32 {
        self.current_tasks.saturating_sub(u32::from(self.capacity))
    }

    /// Registers one task moved onto this member.
    pub fn record_added_task(&mut self) {
        self.current_tasks += 1;
        self.refresh();
    }

    /// Registers one task moved off this member.
    pub fn record_removed_task(&mut self) {
        self.current_tasks = self.current_tasks.saturating_sub(1);
        self.refresh();
    }

    fn refresh(&mut self) {
        self.load_percentage = if self.capacity > 0 {
            f64::from(self.current_tasks) / f64::from(self.capacity) * 100.0
        } else {
            0.0
        };
        self.is_over_capacity = self.current_tasks > u32::from(self.capacity);
    }
}

/// Load snapshots for one team, in stable member order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamLoad {
    pub team: TeamId,
    pub members: Vec<LoadSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::LoadSnapshot;
    use crate::model::team::TeamMember;
    use uuid::Uuid;

    fn member(capacity: u8) -> TeamMember {
        TeamMember::new(Uuid::new_v4(), "M", "Dev", capacity)
    }

    #[test]
    fn derived_fields_follow_count_mutations() {
        let mut snapshot = LoadSnapshot::new(&member(2), 2);
        assert!(!snapshot.is_over_capacity);
        assert_eq!(snapshot.load_percentage, 100.0);

        snapshot.record_added_task();
        assert!(snapshot.is_over_capacity);
        assert_eq!(snapshot.current_tasks, 3);

        snapshot.record_removed_task();
        assert!(!snapshot.is_over_capacity);
    }

    #[test]
    fn capacity_zero_reports_zero_percentage_but_saturated_ratio() {
        let snapshot = LoadSnapshot::new(&member(0), 0);
        assert_eq!(snapshot.load_percentage, 0.0);
        assert!(snapshot.load_ratio().is_infinite());
        assert!(!snapshot.is_over_capacity);
        assert!(!snapshot.has_spare());
    }

    #[test]
    fn excess_is_zero_at_or_under_capacity() {
        assert_eq!(LoadSnapshot::new(&member(3), 2).excess(), 0);
        assert_eq!(LoadSnapshot::new(&member(3), 3).excess(), 0);
        assert_eq!(LoadSnapshot::new(&member(3), 5).excess(), 2);
    }
}
