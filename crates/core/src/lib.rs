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

//! Pure state machines for work orders and dispatch guides.
//!
//! Nothing here touches storage. The persistence coordinator loads and locks
//! rows, hands snapshots to these functions, and writes back the returned
//! transitions.

mod command;
mod dispatch_guide;
mod error;
mod state;
mod work_order;

#[cfg(test)]
mod tests;

pub use command::{GuidePatch, WorkOrderPatch};
pub use dispatch_guide::{GuideContext, apply_guide_patch};
pub use error::CoreError;
pub use state::{
    GuideChanges, GuideTransition, WorkOrderChanges, WorkOrderPlan, WorkOrderTransition,
};
pub use work_order::{WorkOrderContext, apply_work_order_patch, plan_work_order};
