// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs shared between queries, mutations and the backend lock helpers.

use diesel::prelude::*;
use despacho_domain::{GuideSnapshot, GuideState, OtState, WorkOrderSnapshot};

use crate::diesel_schema::{dispatch_guides, work_orders};
use crate::error::PersistenceError;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = work_orders)]
pub struct WorkOrderRow {
    pub ot_id: i64,
    pub originating_order_id: i64,
    pub worker_id: Option<i64>,
    pub fecha: String,
    pub state: String,
    pub notes: Option<String>,
}

impl WorkOrderRow {
    pub fn into_snapshot(self) -> Result<WorkOrderSnapshot, PersistenceError> {
        let state: OtState = self.state.parse::<OtState>().map_err(|e| {
            PersistenceError::CorruptRow {
                table: "work_orders",
                id: self.ot_id,
                reason: e.to_string(),
            }
        })?;
        Ok(WorkOrderSnapshot {
            ot_id: self.ot_id,
            worker_id: self.worker_id,
            fecha: Some(self.fecha),
            state,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = dispatch_guides)]
pub struct DispatchGuideRow {
    pub guide_id: i64,
    pub ot_id: i64,
    pub courier_id: Option<i64>,
    pub handler_id: Option<i64>,
    pub delivery_address: Option<String>,
    pub fecha: Option<String>,
    pub state: String,
}

impl DispatchGuideRow {
    pub fn into_snapshot(self) -> Result<GuideSnapshot, PersistenceError> {
        let state: GuideState = self.state.parse::<GuideState>().map_err(|e| {
            PersistenceError::CorruptRow {
                table: "dispatch_guides",
                id: self.guide_id,
                reason: e.to_string(),
            }
        })?;
        Ok(GuideSnapshot {
            guide_id: self.guide_id,
            ot_id: self.ot_id,
            courier_id: self.courier_id,
            handler_id: self.handler_id,
            fecha: self.fecha,
            state,
        })
    }
}
