// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level edit permissions.
//!
//! Both state machines consult the same table. A field a role is not allowed
//! to edit is ignored when it appears in a request; it is never an error.

use crate::roles::EmployeeRole;

/// The editable entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A picking work order.
    WorkOrder,
    /// A dispatch guide.
    DispatchGuide,
}

/// The editable fields across both entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The entity's date.
    Date,
    /// The work order's owning worker.
    Worker,
    /// The lifecycle state.
    State,
    /// Free-text notes.
    Notes,
    /// The guide's courier company.
    Courier,
    /// The guide's individual handler.
    Handler,
}

impl Field {
    /// Returns the request name of the field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "fecha",
            Self::Worker => "worker_id",
            Self::State => "estado",
            Self::Notes => "notes",
            Self::Courier => "courier_id",
            Self::Handler => "handler_id",
        }
    }
}

/// Role × entity → editable fields.
pub const PERMISSION_TABLE: &[(EmployeeRole, Entity, &[Field])] = &[
    (
        EmployeeRole::JefeLogistica,
        Entity::WorkOrder,
        &[Field::Date, Field::Worker, Field::State, Field::Notes],
    ),
    (
        EmployeeRole::EmpleadoLogistica,
        Entity::WorkOrder,
        &[Field::Date, Field::State, Field::Notes],
    ),
    (
        EmployeeRole::JefeLogistica,
        Entity::DispatchGuide,
        &[Field::Date, Field::Courier, Field::State, Field::Handler],
    ),
    (
        EmployeeRole::Transportista,
        Entity::DispatchGuide,
        &[Field::Date, Field::State, Field::Handler],
    ),
];

/// The fields one role may edit on one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPermissions {
    fields: &'static [Field],
}

impl FieldPermissions {
    /// Looks up the permissions of `role` on `entity`.
    ///
    /// Roles without an entry get an empty set.
    #[must_use]
    pub fn for_role(role: EmployeeRole, entity: Entity) -> Self {
        let fields: &'static [Field] = PERMISSION_TABLE
            .iter()
            .find(|(r, e, _)| *r == role && *e == entity)
            .map_or(&[], |(_, _, fields)| *fields);
        Self { fields }
    }

    /// Returns true if the field may be edited.
    #[must_use]
    pub fn allows(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    /// Returns true if nothing may be edited.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
