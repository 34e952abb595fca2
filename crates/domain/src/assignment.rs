// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rotation-based assignee selection.
//!
//! Counters only order candidates. A worker that has never been assigned
//! under a category has no counter and always wins over one that has.

use std::cmp::Ordering;

/// A worker eligible for assignment, together with their rotation counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The worker's employee identifier.
    pub worker_id: i64,
    /// The counter for the category being assigned, if one exists.
    pub counter: Option<i64>,
    /// Display name, carried through for reporting.
    pub display_name: String,
}

impl Candidate {
    /// Creates a new candidate.
    #[must_use]
    pub const fn new(worker_id: i64, counter: Option<i64>, display_name: String) -> Self {
        Self {
            worker_id,
            counter,
            display_name,
        }
    }
}

/// Rotation order: no counter first, then smallest counter, then smallest id.
fn rotation_order(a: &Candidate, b: &Candidate) -> Ordering {
    match (a.counter, b.counter) {
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
        (Some(x), Some(y)) => x.cmp(&y),
    }
    .then_with(|| a.worker_id.cmp(&b.worker_id))
}

/// Picks the next assignee from `pool`.
///
/// Returns `None` when the pool is empty; callers treat that as "leave
/// unassigned", never as an error.
#[must_use]
pub fn select_assignee(pool: &[Candidate]) -> Option<&Candidate> {
    pool.iter().min_by(|a, b| rotation_order(a, b))
}

/// The counter value after one more assignment.
#[must_use]
pub const fn counter_after_assignment(current: Option<i64>) -> i64 {
    match current {
        Some(value) => value.saturating_add(1),
        None => 1,
    }
}

/// The counter value after an assignment is taken away. Never negative.
#[must_use]
pub const fn counter_after_release(current: i64) -> i64 {
    if current > 0 { current - 1 } else { 0 }
}

/// A change of owner that requires counter bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reassignment {
    /// The owner losing the assignment, if there was one.
    pub from: Option<i64>,
    /// The owner gaining the assignment, if there is one.
    pub to: Option<i64>,
}

impl Reassignment {
    /// Returns a reassignment if `from` and `to` differ.
    #[must_use]
    pub fn between(from: Option<i64>, to: Option<i64>) -> Option<Self> {
        (from != to).then_some(Self { from, to })
    }
}
