//! Bulk reassignment planning helpers.
//!
//! # Responsibility
//! - Select which of an over-capacity member's tasks may move.
//! - Maintain the ranked pool of destination members through a rebalance.
//!
//! # Invariants
//! - High-priority tasks are pinned and never returned as candidates.
//! - Candidate order is Low before Medium, ties stable in input order.
//! - The destination pool addresses the caller-owned snapshot array by
//!   index; it holds no copies and is never shared across invocations.
//! - Pool admission requires spare capacity, but eviction only happens once
//!   a destination goes strictly over capacity: a member filled to exactly
//!   its capacity stays eligible for one more task.

use crate::model::task::{Task, TaskPriority};
use crate::model::team::MemberId;
use crate::scheduler::load::LoadSnapshot;

/// Tasks eligible to move off one over-capacity member, capped at `excess`.
///
/// Input tasks are expected to be the project's non-done assigned tasks;
/// filtering to the member and dropping pinned (High) tasks happens here.
pub fn reassignment_candidates<'a>(
    tasks: &'a [Task],
    member: MemberId,
    excess: usize,
) -> Vec<&'a Task> {
    let mut candidates: Vec<&Task> = tasks
        .iter()
        .filter(|task| {
            task.assignment.member_id() == Some(member) && task.priority != TaskPriority::High
        })
        .collect();

    candidates.sort_by_key(|task| priority_rank(task.priority));
    candidates.truncate(excess);
    candidates
}

fn priority_rank(priority: TaskPriority) -> u8 {
    match priority {
        TaskPriority::Low => 0,
        TaskPriority::Medium => 1,
        TaskPriority::High => 2,
    }
}

/// Ranked destination members for one over-capacity source, addressed as
/// indices into the rebalance call's working snapshot array.
#[derive(Debug)]
pub struct DestinationPool {
    order: Vec<usize>,
}

impl DestinationPool {
    /// Admits every member other than `source` that has spare capacity,
    /// ranked by spare capacity descending.
    pub fn new(snapshots: &[LoadSnapshot], source: usize) -> Self {
        let mut order: Vec<usize> = (0..snapshots.len())
            .filter(|&index| index != source && snapshots[index].has_spare())
            .collect();
        sort_by_spare_desc(&mut order, snapshots);
        Self { order }
    }

    /// Current best destination, if any.
    pub fn head(&self) -> Option<usize> {
        self.order.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Re-ranks the pool after a task landed on the current head: evict the
    /// head if it went over capacity, otherwise re-sort by spare capacity.
    pub fn settle_after_move(&mut self, snapshots: &[LoadSnapshot]) {
        let Some(head) = self.head() else {
            return;
        };

        if snapshots[head].is_over_capacity {
            self.order.remove(0);
        } else {
            sort_by_spare_desc(&mut self.order, snapshots);
        }
    }
}

fn sort_by_spare_desc(order: &mut [usize], snapshots: &[LoadSnapshot]) {
    order.sort_by_key(|&index| std::cmp::Reverse(snapshots[index].spare_capacity()));
}
