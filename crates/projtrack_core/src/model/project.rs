//! Project entity and its child records.
//!
//! # Responsibility
//! - Define the records reconstructed from `project`, `category`,
//!   `material` and `step` rows.
//! - Provide the 2-digit decimal normalization used at every input
//!   boundary.
//!
//! # Invariants
//! - `project_id` is `None` only before the first insert and is immutable
//!   once assigned by the store.
//! - Child collections are populated only by fetch-by-id; every other path
//!   leaves them empty.
//! - Decimal attributes carry exactly two fractional digits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Store-assigned identifier for a project row.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ProjectId = i64;

/// Store-assigned identifier for a category row.
pub type CategoryId = i64;

/// Store-assigned identifier for a material row.
pub type MaterialId = i64;

/// Store-assigned identifier for a step row.
pub type StepId = i64;

/// A tracked project with its aggregated child records.
///
/// Scalar attributes map one-to-one onto `project` columns. The three
/// child collections are owned by composition and keep the order their
/// rows came back in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// `None` until the store assigns an id on insert.
    pub project_id: Option<ProjectId>,
    /// Required display name. Not validated by this layer.
    pub project_name: String,
    /// Estimated effort in hours, 2-digit scale.
    pub estimated_hours: Option<Decimal>,
    /// Recorded effort in hours, 2-digit scale.
    pub actual_hours: Option<Decimal>,
    /// Difficulty rating, nominally 1-5. Stored as given.
    pub difficulty: Option<u8>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Categories linked through `project_category`, in query order.
    pub categories: Vec<Category>,
    /// Materials owned by this project, in query order.
    pub materials: Vec<Material>,
    /// Build steps owned by this project, in query order.
    pub steps: Vec<Step>,
}

impl Project {
    /// Creates an unsaved project with empty child collections.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_id: None,
            project_name: project_name.into(),
            estimated_hours: None,
            actual_hours: None,
            difficulty: None,
            notes: None,
            categories: Vec::new(),
            materials: Vec::new(),
            steps: Vec::new(),
        }
    }
}

/// A category linked to projects through the association table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub category_name: String,
}

/// A material required by one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub material_id: MaterialId,
    pub project_id: ProjectId,
    pub material_name: String,
    /// Unit cost, 2-digit scale.
    pub cost: Option<Decimal>,
    /// Amount required, 2-digit scale.
    pub quantity: Option<Decimal>,
}

/// One ordered build step of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step_id: StepId,
    pub project_id: ProjectId,
    pub step_text: String,
    pub step_order: i64,
}

/// Normalizes a decimal attribute to exactly two fractional digits.
///
/// Rounds when the input carries more precision and pads when it carries
/// less, so `3.5` becomes `3.50`.
pub fn normalize_decimal(value: Decimal) -> Decimal {
    let mut normalized = value.round_dp(2);
    normalized.rescale(2);
    normalized
}

#[cfg(test)]
mod tests {
    use super::{normalize_decimal, Project};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn new_project_has_no_id_and_empty_children() {
        let project = Project::new("Bookshelf");
        assert_eq!(project.project_id, None);
        assert_eq!(project.project_name, "Bookshelf");
        assert!(project.categories.is_empty());
        assert!(project.materials.is_empty());
        assert!(project.steps.is_empty());
    }

    #[test]
    fn normalize_decimal_pads_to_two_digits() {
        let normalized = normalize_decimal(Decimal::from_str("3.5").unwrap());
        assert_eq!(normalized.to_string(), "3.50");
    }

    #[test]
    fn normalize_decimal_rounds_excess_precision() {
        let normalized = normalize_decimal(Decimal::from_str("1.005").unwrap());
        assert_eq!(normalized.scale(), 2);
    }

    #[test]
    fn normalize_decimal_keeps_whole_numbers_padded() {
        let normalized = normalize_decimal(Decimal::from_str("12").unwrap());
        assert_eq!(normalized.to_string(), "12.00");
    }

    #[test]
    fn project_serializes_with_column_named_fields() {
        let project = Project::new("Workbench");
        let json = serde_json::to_value(&project).unwrap();
        assert!(json.get("project_name").is_some());
        assert!(json.get("estimated_hours").is_some());
        assert_eq!(json["project_id"], serde_json::Value::Null);
    }
}
