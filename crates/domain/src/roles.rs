// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee roles and rotation categories.

use serde::{Deserialize, Serialize};

/// The roles the engine understands.
///
/// The employee directory may hold other roles; those employees can neither
/// act on work orders nor be assigned to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeRole {
    /// Logistics supervisor. May reassign work and couriers.
    JefeLogistica,
    /// Picker. Owns work orders.
    EmpleadoLogistica,
    /// Courier. Owns dispatch guides and assigns handlers.
    Transportista,
}

impl EmployeeRole {
    /// Returns the directory representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::JefeLogistica => "JEFE_LOGISTICA",
            Self::EmpleadoLogistica => "EMPLEADO_LOGISTICA",
            Self::Transportista => "TRANSPORTISTA",
        }
    }

    /// Parses a directory role, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for roles the engine does not know about.
    #[must_use]
    pub fn parse_directory_role(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "JEFE_LOGISTICA" => Some(Self::JefeLogistica),
            "EMPLEADO_LOGISTICA" => Some(Self::EmpleadoLogistica),
            "TRANSPORTISTA" => Some(Self::Transportista),
            _ => None,
        }
    }

    /// The rotation category this role is assigned under, if any.
    #[must_use]
    pub const fn category(&self) -> Option<RoleCategory> {
        match self {
            Self::JefeLogistica => None,
            Self::EmpleadoLogistica => Some(RoleCategory::WorkerLogistics),
            Self::Transportista => Some(RoleCategory::Courier),
        }
    }
}

impl std::fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Namespace for rotation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleCategory {
    /// Pickers that own work orders.
    WorkerLogistics,
    /// Couriers and individual handlers that own dispatch guides.
    Courier,
}

impl RoleCategory {
    /// Returns the stored representation of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WorkerLogistics => "WORKER_LOGISTICS",
            Self::Courier => "COURIER",
        }
    }

    /// The directory role whose members are eligible under this category.
    #[must_use]
    pub const fn eligible_role(&self) -> EmployeeRole {
        match self {
            Self::WorkerLogistics => EmployeeRole::EmpleadoLogistica,
            Self::Courier => EmployeeRole::Transportista,
        }
    }
}
