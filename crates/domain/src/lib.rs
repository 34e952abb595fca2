// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod assignment;
pub mod dates;
mod error;
mod permissions;
mod roles;
mod states;
mod types;

#[cfg(test)]
mod tests;

pub use assignment::{
    Candidate, Reassignment, counter_after_assignment, counter_after_release, select_assignee,
};
pub use dates::{DATE_DRIFT_TOLERANCE, DateParseError};
pub use error::{DomainError, ErrorCategory};
pub use permissions::{Entity, Field, FieldPermissions, PERMISSION_TABLE};
pub use roles::{EmployeeRole, RoleCategory};
pub use states::{GuideState, OtState};
pub use types::{
    GuideSnapshot, HandlerRegistration, SalesOrder, Worker, WorkOrderSnapshot, full_name,
};
