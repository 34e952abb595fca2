// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schema introspection for the migration parity check.
//!
//! Both backends are read into the same normalized [`Schema`], which is then
//! compared structurally. Types are reduced to `integer`, `real`, `text` and
//! `blob`.

use std::collections::{BTreeMap, BTreeSet};

use color_eyre::{eyre::Context, eyre::eyre, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};

const MIGRATIONS_TABLE: &str = "__diesel_schema_migrations";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<Vec<String>>,
    indexes: BTreeSet<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Column {
    normalized_type: &'static str,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

#[derive(QueryableByName)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Reads the schema of a migrated `SQLite` database.
pub fn introspect_sqlite(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct ColumnRow {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyRow {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexRow {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    let tables: Vec<NameRow> = diesel::sql_query(format!(
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' AND name != '{MIGRATIONS_TABLE}' ORDER BY name"
    ))
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    let mut schema = Schema::default();
    for NameRow { name: table_name } in tables {
        let mut table = Table::default();

        let columns: Vec<ColumnRow> = diesel::sql_query(format!("PRAGMA table_info({table_name})"))
            .load(conn)
            .wrap_err_with(|| format!("Failed to get columns for table {table_name}"))?;
        for column in columns {
            if column.pk > 0 {
                table.primary_keys.insert(column.name.clone());
            }
            table.columns.insert(
                column.name,
                Column {
                    normalized_type: normalize_sqlite_type(&column.r#type),
                    // SQLite reports INTEGER PRIMARY KEY columns as nullable.
                    nullable: column.notnull == 0 && column.pk == 0,
                },
            );
        }

        let foreign_keys: Vec<ForeignKeyRow> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({table_name})"))
                .load(conn)
                .wrap_err_with(|| format!("Failed to get foreign keys for table {table_name}"))?;
        table.foreign_keys = foreign_keys
            .into_iter()
            .map(|fk| ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            })
            .collect();

        let indexes: Vec<IndexRow> = diesel::sql_query(format!("PRAGMA index_list({table_name})"))
            .load(conn)
            .wrap_err_with(|| format!("Failed to get indexes for table {table_name}"))?;
        for index in indexes {
            let columns: Vec<String> =
                diesel::sql_query(format!("PRAGMA index_info({})", index.name))
                    .load::<NameRow>(conn)
                    .wrap_err_with(|| format!("Failed to get index columns for {}", index.name))?
                    .into_iter()
                    .map(|row| row.name)
                    .collect();

            match index.origin.as_str() {
                "u" => {
                    table.unique_constraints.insert(columns);
                }
                "c" => {
                    table.indexes.insert(columns);
                }
                // Primary key indexes are covered by `primary_keys`.
                _ => {}
            }
        }

        schema.tables.insert(table_name, table);
    }

    Ok(schema)
}

/// Reads the schema of a migrated `MySQL` database.
pub fn introspect_mysql(conn: &mut MysqlConnection, database: &str) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct ColumnRow {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        data_type: String,
        #[diesel(sql_type = Text)]
        is_nullable: String,
        #[diesel(sql_type = Text)]
        column_key: String,
    }

    #[derive(QueryableByName)]
    #[allow(clippy::struct_field_names)]
    struct ForeignKeyRow {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        referenced_table_name: String,
        #[diesel(sql_type = Text)]
        referenced_column_name: String,
    }

    #[derive(QueryableByName)]
    struct IndexRow {
        #[diesel(sql_type = Text)]
        index_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Integer)]
        non_unique: i32,
    }

    let tables: Vec<NameRow> = diesel::sql_query(
        "SELECT table_name AS name FROM information_schema.tables \
         WHERE table_schema = ? AND table_name != ? ORDER BY table_name",
    )
    .bind::<Text, _>(database)
    .bind::<Text, _>(MIGRATIONS_TABLE)
    .load(conn)
    .wrap_err("Failed to query MySQL tables")?;

    let mut schema = Schema::default();
    for NameRow { name: table_name } in tables {
        let mut table = Table::default();

        let columns: Vec<ColumnRow> = diesel::sql_query(
            "SELECT column_name, data_type, is_nullable, column_key \
             FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&table_name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get columns for table {table_name}"))?;
        for column in columns {
            if column.column_key == "PRI" {
                table.primary_keys.insert(column.column_name.clone());
            }
            table.columns.insert(
                column.column_name,
                Column {
                    normalized_type: normalize_mysql_type(&column.data_type),
                    nullable: column.is_nullable == "YES",
                },
            );
        }

        let foreign_keys: Vec<ForeignKeyRow> = diesel::sql_query(
            "SELECT column_name, referenced_table_name, referenced_column_name \
             FROM information_schema.key_column_usage \
             WHERE table_schema = ? AND table_name = ? AND referenced_table_name IS NOT NULL",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&table_name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get foreign keys for table {table_name}"))?;
        table.foreign_keys = foreign_keys
            .into_iter()
            .map(|fk| ForeignKey {
                from_column: fk.column_name,
                to_table: fk.referenced_table_name,
                to_column: fk.referenced_column_name,
            })
            .collect();

        let indexes: Vec<IndexRow> = diesel::sql_query(
            "SELECT index_name, column_name, non_unique FROM information_schema.statistics \
             WHERE table_schema = ? AND table_name = ? AND index_name != 'PRIMARY' \
             ORDER BY index_name, seq_in_index",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&table_name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get indexes for table {table_name}"))?;

        let mut grouped: BTreeMap<String, (bool, Vec<String>)> = BTreeMap::new();
        for index in indexes {
            grouped
                .entry(index.index_name)
                .or_insert_with(|| (index.non_unique == 0, Vec::new()))
                .1
                .push(index.column_name);
        }
        for (unique, columns) in grouped.into_values() {
            if unique {
                table.unique_constraints.insert(columns);
            } else {
                table.indexes.insert(columns);
            }
        }

        schema.tables.insert(table_name, table);
    }

    Ok(schema)
}

fn normalize_sqlite_type(sqlite_type: &str) -> &'static str {
    let upper = sqlite_type.to_uppercase();
    if upper.contains("INT") {
        "integer"
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        "real"
    } else if upper.contains("BLOB") {
        "blob"
    } else {
        "text"
    }
}

fn normalize_mysql_type(mysql_type: &str) -> &'static str {
    match mysql_type.to_uppercase().as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => "integer",
        "DECIMAL" | "NUMERIC" | "FLOAT" | "DOUBLE" | "REAL" => "real",
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => "blob",
        _ => "text",
    }
}

/// Compares two schemas and reports every mismatch at once.
pub fn compare(sqlite: &Schema, mysql: &Schema) -> Result<()> {
    let mut problems: Vec<String> = Vec::new();

    for name in sqlite.tables.keys().filter(|t| !mysql.tables.contains_key(*t)) {
        problems.push(format!("table '{name}' exists in SQLite but not in MySQL"));
    }
    for name in mysql.tables.keys().filter(|t| !sqlite.tables.contains_key(*t)) {
        problems.push(format!("table '{name}' exists in MySQL but not in SQLite"));
    }

    for (name, lite) in &sqlite.tables {
        let Some(my) = mysql.tables.get(name) else {
            continue;
        };
        compare_table(name, lite, my, &mut problems);
    }

    if problems.is_empty() {
        return Ok(());
    }

    Err(eyre!(
        "Schema parity check FAILED:\n{}",
        problems
            .iter()
            .map(|p| format!("  - {p}"))
            .collect::<Vec<_>>()
            .join("\n")
    ))
}

fn compare_table(name: &str, lite: &Table, my: &Table, problems: &mut Vec<String>) {
    for (column, lite_column) in &lite.columns {
        match my.columns.get(column) {
            None => problems.push(format!("column '{name}.{column}' missing in MySQL")),
            Some(my_column) if my_column != lite_column => problems.push(format!(
                "column '{name}.{column}' differs: SQLite {lite_column:?}, MySQL {my_column:?}"
            )),
            Some(_) => {}
        }
    }
    for column in my.columns.keys().filter(|c| !lite.columns.contains_key(*c)) {
        problems.push(format!("column '{name}.{column}' missing in SQLite"));
    }

    if lite.primary_keys != my.primary_keys {
        problems.push(format!(
            "primary key of '{name}' differs: SQLite {:?}, MySQL {:?}",
            lite.primary_keys, my.primary_keys
        ));
    }
    if lite.foreign_keys != my.foreign_keys {
        problems.push(format!(
            "foreign keys of '{name}' differ: SQLite {:?}, MySQL {:?}",
            lite.foreign_keys, my.foreign_keys
        ));
    }
    if lite.unique_constraints != my.unique_constraints {
        problems.push(format!(
            "unique constraints of '{name}' differ: SQLite {:?}, MySQL {:?}",
            lite.unique_constraints, my.unique_constraints
        ));
    }

    // InnoDB adds a single-column index for every foreign key; those are
    // the only indexes MySQL may have on top of SQLite's.
    for columns in lite.indexes.difference(&my.indexes) {
        problems.push(format!("index {columns:?} on '{name}' missing in MySQL"));
    }
    for columns in my.indexes.difference(&lite.indexes) {
        let fk_index = matches!(columns.as_slice(), [column]
            if my.foreign_keys.iter().any(|fk| &fk.from_column == column));
        if !fk_index {
            problems.push(format!("unexpected MySQL index {columns:?} on '{name}'"));
        }
    }
}
