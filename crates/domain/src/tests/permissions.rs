// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{EmployeeRole, Entity, Field, FieldPermissions};

#[test]
fn test_supervisor_work_order_fields() {
    let perms = FieldPermissions::for_role(EmployeeRole::JefeLogistica, Entity::WorkOrder);
    assert!(perms.allows(Field::Date));
    assert!(perms.allows(Field::Worker));
    assert!(perms.allows(Field::State));
    assert!(perms.allows(Field::Notes));
    assert!(!perms.allows(Field::Handler));
}

#[test]
fn test_picker_cannot_reassign_work_orders() {
    let perms = FieldPermissions::for_role(EmployeeRole::EmpleadoLogistica, Entity::WorkOrder);
    assert!(perms.allows(Field::Date));
    assert!(perms.allows(Field::State));
    assert!(perms.allows(Field::Notes));
    assert!(!perms.allows(Field::Worker));
}

#[test]
fn test_guide_fields_by_role() {
    let boss = FieldPermissions::for_role(EmployeeRole::JefeLogistica, Entity::DispatchGuide);
    assert!(boss.allows(Field::Courier));
    assert!(boss.allows(Field::Handler));

    let courier = FieldPermissions::for_role(EmployeeRole::Transportista, Entity::DispatchGuide);
    assert!(courier.allows(Field::Date));
    assert!(courier.allows(Field::State));
    assert!(courier.allows(Field::Handler));
    assert!(!courier.allows(Field::Courier));
}

/// Roles without a table entry may edit nothing.
#[test]
fn test_missing_entries_are_empty() {
    assert!(FieldPermissions::for_role(EmployeeRole::Transportista, Entity::WorkOrder).is_empty());
    assert!(
        FieldPermissions::for_role(EmployeeRole::EmpleadoLogistica, Entity::DispatchGuide)
            .is_empty()
    );
}

#[test]
fn test_role_parsing() {
    assert_eq!(
        EmployeeRole::parse_directory_role(" transportista "),
        Some(EmployeeRole::Transportista)
    );
    assert_eq!(
        EmployeeRole::parse_directory_role("Jefe_Logistica"),
        Some(EmployeeRole::JefeLogistica)
    );
    assert_eq!(EmployeeRole::parse_directory_role("VENDEDOR"), None);
}
