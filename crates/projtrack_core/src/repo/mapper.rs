//! Parameter and row mapping between entities and `project` family rows.
//!
//! # Responsibility
//! - Reconstruct entity records from result rows, field by column.
//! - Convert decimal attributes between `Decimal` and their canonical
//!   2-digit TEXT storage form.
//!
//! # Invariants
//! - Fields match columns by their snake_case names, one function per
//!   entity; no runtime reflection.
//! - An absent `Option` value binds SQL NULL, never an error.
//! - A missing column or unconvertible value is a `MappingError` naming
//!   the column.

use crate::model::project::{normalize_decimal, Category, Material, Project, Step};
use rusqlite::types::FromSql;
use rusqlite::Row;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type MappingResult<T> = Result<T, MappingError>;

/// A result row could not be converted to an entity.
///
/// Indicates a schema/entity mismatch; treated as fatal, not retried.
#[derive(Debug)]
pub struct MappingError {
    pub column: &'static str,
    pub message: String,
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot map column `{}`: {}", self.column, self.message)
    }
}

impl Error for MappingError {}

/// Reconstructs a project from one `project` row.
///
/// Child collections start empty; fetch-by-id fills them from separate
/// queries inside the same transaction.
pub fn project_from_row(row: &Row<'_>) -> MappingResult<Project> {
    Ok(Project {
        project_id: Some(get_column(row, "project_id")?),
        project_name: get_column(row, "project_name")?,
        estimated_hours: decimal_from_db(get_column(row, "estimated_hours")?, "estimated_hours")?,
        actual_hours: decimal_from_db(get_column(row, "actual_hours")?, "actual_hours")?,
        difficulty: get_column(row, "difficulty")?,
        notes: get_column(row, "notes")?,
        categories: Vec::new(),
        materials: Vec::new(),
        steps: Vec::new(),
    })
}

/// Reconstructs a category from one `category` row.
pub fn category_from_row(row: &Row<'_>) -> MappingResult<Category> {
    Ok(Category {
        category_id: get_column(row, "category_id")?,
        category_name: get_column(row, "category_name")?,
    })
}

/// Reconstructs a material from one `material` row.
pub fn material_from_row(row: &Row<'_>) -> MappingResult<Material> {
    Ok(Material {
        material_id: get_column(row, "material_id")?,
        project_id: get_column(row, "project_id")?,
        material_name: get_column(row, "material_name")?,
        cost: decimal_from_db(get_column(row, "cost")?, "cost")?,
        quantity: decimal_from_db(get_column(row, "quantity")?, "quantity")?,
    })
}

/// Reconstructs a step from one `step` row.
pub fn step_from_row(row: &Row<'_>) -> MappingResult<Step> {
    Ok(Step {
        step_id: get_column(row, "step_id")?,
        project_id: get_column(row, "project_id")?,
        step_text: get_column(row, "step_text")?,
        step_order: get_column(row, "step_order")?,
    })
}

/// Converts a decimal attribute to its bind value.
///
/// `None` stays `None` and binds SQL NULL; present values are normalized
/// to the canonical 2-digit form before storage.
pub fn decimal_to_db(value: Option<Decimal>) -> Option<String> {
    value.map(|decimal| normalize_decimal(decimal).to_string())
}

fn decimal_from_db(raw: Option<String>, column: &'static str) -> MappingResult<Option<Decimal>> {
    raw.map(|text| {
        Decimal::from_str(&text).map_err(|err| MappingError {
            column,
            message: format!("invalid decimal `{text}`: {err}"),
        })
    })
    .transpose()
}

fn get_column<T: FromSql>(row: &Row<'_>, column: &'static str) -> MappingResult<T> {
    row.get(column).map_err(|err| MappingError {
        column,
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{decimal_to_db, material_from_row, project_from_row};
    use crate::db::open_db_in_memory;
    use rusqlite::params;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn decimal_to_db_normalizes_scale() {
        let bound = decimal_to_db(Some(Decimal::from_str("3.5").unwrap()));
        assert_eq!(bound.as_deref(), Some("3.50"));
    }

    #[test]
    fn decimal_to_db_passes_none_through() {
        assert_eq!(decimal_to_db(None), None);
    }

    #[test]
    fn project_from_row_maps_nullable_columns_to_none() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO project (project_name) VALUES (?1);",
            params!["Planter box"],
        )
        .unwrap();

        let project = conn
            .query_row("SELECT * FROM project;", [], |row| {
                Ok(project_from_row(row))
            })
            .unwrap()
            .unwrap();

        assert_eq!(project.project_id, Some(1));
        assert_eq!(project.project_name, "Planter box");
        assert_eq!(project.estimated_hours, None);
        assert_eq!(project.difficulty, None);
        assert_eq!(project.notes, None);
    }

    #[test]
    fn project_from_row_rejects_missing_column() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO project (project_name) VALUES (?1);",
            params!["Shed"],
        )
        .unwrap();

        let error = conn
            .query_row("SELECT project_id FROM project;", [], |row| {
                Ok(project_from_row(row))
            })
            .unwrap()
            .unwrap_err();

        assert_eq!(error.column, "project_name");
    }

    #[test]
    fn project_from_row_rejects_unparseable_decimal() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO project (project_name, estimated_hours) VALUES (?1, ?2);",
            params!["Shed", "not-a-number"],
        )
        .unwrap();

        let error = conn
            .query_row("SELECT * FROM project;", [], |row| {
                Ok(project_from_row(row))
            })
            .unwrap()
            .unwrap_err();

        assert_eq!(error.column, "estimated_hours");
        assert!(error.message.contains("not-a-number"));
    }

    #[test]
    fn material_from_row_round_trips_cost_and_quantity() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO project (project_name) VALUES (?1);",
            params!["Shed"],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO material (project_id, material_name, cost, quantity)
             VALUES (?1, ?2, ?3, ?4);",
            params![1, "2x4 lumber", "4.25", "12.00"],
        )
        .unwrap();

        let material = conn
            .query_row("SELECT * FROM material;", [], |row| {
                Ok(material_from_row(row))
            })
            .unwrap()
            .unwrap();

        assert_eq!(material.material_name, "2x4 lumber");
        assert_eq!(material.cost, Some(Decimal::from_str("4.25").unwrap()));
        assert_eq!(material.quantity, Some(Decimal::from_str("12.00").unwrap()));
    }
}
