//! Boat domain types shared by the filter form, the results grid, and the
//! data service adapters.
//!
//! DESIGN
//! ======
//! Wire names follow the hosting platform's field API names (`Name`,
//! `BoatType__c`, ...) via serde renames so the HTTP adapter can pass
//! records through untouched. Everything else in the crate uses the Rust
//! field names.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

/// Label of the synthetic option meaning "no filter".
pub const ALL_TYPES_LABEL: &str = "All Types";

/// Filter value meaning "all categories".
pub const ALL_TYPES_VALUE: &str = "";

// =============================================================================
// CATEGORIES
// =============================================================================

/// A boat category as returned by the type-lookup service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoatType {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// One entry of the filter dropdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub label: String,
    pub value: String,
}

impl CategoryOption {
    /// The "All Types" option. Always first in the option set.
    #[must_use]
    pub fn all_types() -> Self {
        Self { label: ALL_TYPES_LABEL.to_owned(), value: ALL_TYPES_VALUE.to_owned() }
    }
}

impl From<&BoatType> for CategoryOption {
    fn from(boat_type: &BoatType) -> Self {
        Self { label: boat_type.name.clone(), value: boat_type.id.clone() }
    }
}

/// Map a lookup response into the dropdown option set, "All Types" first.
#[must_use]
pub fn build_search_options(types: &[BoatType]) -> Vec<CategoryOption> {
    let mut options = Vec::with_capacity(types.len() + 1);
    options.push(CategoryOption::all_types());
    options.extend(types.iter().map(CategoryOption::from));
    options
}

// =============================================================================
// RECORDS
// =============================================================================

/// Read-only projection of a boat record held by the grid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoatRecord {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "BoatType__c", default)]
    pub boat_type: Option<String>,
    #[serde(rename = "Length__c", default)]
    pub length: Option<f64>,
    #[serde(rename = "Picture__c", default)]
    pub picture: Option<String>,
    #[serde(rename = "Price__c", default)]
    pub price: Option<f64>,
    #[serde(rename = "Description__c", default)]
    pub description: Option<String>,
}

/// Uncommitted edits for one grid row, keyed by wire field name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftValue {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DraftValue {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), fields: Map::new() }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Fold a later edit of the same row into this one. Later values win.
    pub fn merge(&mut self, other: DraftValue) {
        self.fields.extend(other.fields);
    }
}

/// A single field-update request: identifier plus only the edited fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordInput {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl From<DraftValue> for RecordInput {
    fn from(draft: DraftValue) -> Self {
        Self { id: draft.id, fields: draft.fields }
    }
}

// =============================================================================
// GRID COLUMNS
// =============================================================================

/// Cell renderer hint for a grid column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Number,
    Currency,
}

/// Grid column metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Column {
    pub label: &'static str,
    pub field_name: &'static str,
    pub kind: ColumnKind,
    pub editable: bool,
}

/// Columns shown by the results grid, in display order.
pub const COLUMNS: [Column; 4] = [
    Column { label: "Name", field_name: "Name", kind: ColumnKind::Text, editable: true },
    Column { label: "Length", field_name: "Length__c", kind: ColumnKind::Number, editable: true },
    Column { label: "Price", field_name: "Price__c", kind: ColumnKind::Currency, editable: true },
    Column { label: "Description", field_name: "Description__c", kind: ColumnKind::Text, editable: true },
];
