// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work order and dispatch guide lifecycle states.
//!
//! State strings arrive in many spellings (`En Picking`, `EN_PICKING`,
//! `completada`). Both enums accept any casing, read whitespace runs as `_`,
//! and always store their canonical name.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Uppercases and joins whitespace runs with `_`.
fn normalize_token(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<String>>()
        .join("_")
}

/// Work order (OT) lifecycle.
///
/// `CREATED → ASSIGNED → IN_PROGRESS → COMPLETED`, with `CANCELLED`
/// reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtState {
    /// No worker was available at creation.
    Created,
    /// A worker owns the order.
    Assigned,
    /// Picking has started.
    InProgress,
    /// Picking finished; the guide may progress.
    Completed,
    /// Abandoned.
    Cancelled,
}

impl OtState {
    /// Returns the canonical stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Assigned => "ASSIGNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match normalize_token(s).as_str() {
            "CREATED" | "CREADA" => Ok(Self::Created),
            "ASSIGNED" | "ASIGNADA" => Ok(Self::Assigned),
            "IN_PROGRESS" | "EN_PROCESO" | "EN_PROGRESO" => Ok(Self::InProgress),
            "COMPLETED" | "COMPLETADA" => Ok(Self::Completed),
            "CANCELLED" | "CANCELED" | "CANCELADA" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidState {
                entity: "work order",
                value: s.to_string(),
            }),
        }
    }

    /// Returns true if no further lifecycle movement is expected.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns true if the order still represents picking work.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Created | Self::Assigned | Self::InProgress)
    }

    /// Returns true if the forward lifecycle allows moving to `next`.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        match self {
            Self::Created => matches!(next, Self::Assigned | Self::Cancelled),
            Self::Assigned => matches!(next, Self::InProgress | Self::Cancelled),
            Self::InProgress => matches!(next, Self::Completed | Self::Cancelled),
            Self::Completed | Self::Cancelled => false,
        }
    }
}

impl FromStr for OtState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for OtState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch guide lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuideState {
    /// The paired work order is still being picked.
    EnPicking,
    /// Created for an order that was already picked.
    Pendiente,
    /// Picking finished; waiting for a handler.
    PorAsignar,
    /// A handler carries the delivery.
    Asignada,
    /// Delivered. Terminal.
    Entregada,
}

impl GuideState {
    /// Returns the canonical stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnPicking => "EN_PICKING",
            Self::Pendiente => "PENDIENTE",
            Self::PorAsignar => "POR_ASIGNAR",
            Self::Asignada => "ASIGNADA",
            Self::Entregada => "ENTREGADA",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match normalize_token(s).as_str() {
            "EN_PICKING" | "ENPICKING" => Ok(Self::EnPicking),
            "PENDIENTE" | "PENDING" => Ok(Self::Pendiente),
            "POR_ASIGNAR" => Ok(Self::PorAsignar),
            "ASIGNADA" => Ok(Self::Asignada),
            "ENTREGADA" => Ok(Self::Entregada),
            _ => Err(DomainError::InvalidState {
                entity: "dispatch guide",
                value: s.to_string(),
            }),
        }
    }

    /// Returns true if the guide can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Entregada)
    }

    /// Initial state for a guide created next to a work order in `ot_state`.
    #[must_use]
    pub const fn initial_for(ot_state: OtState) -> Self {
        match ot_state {
            OtState::Completed => Self::Pendiente,
            _ => Self::EnPicking,
        }
    }
}

impl FromStr for GuideState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for GuideState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
