//! Field selectors and the set of fields a chart can choose from.

use crate::data::QueryResult;
use crate::error::{PlotError, PlotResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCharacteristics {
    #[serde(default)]
    pub numeric: bool,
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub semantic_types: Vec<String>,
}

/// A reference to one named column plus its capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSelector {
    pub runtime_name: String,
    pub full_db_name: String,
    #[serde(default)]
    pub field_characteristics: FieldCharacteristics,
}

impl FieldSelector {
    pub fn new(name: impl Into<String>, numeric: bool) -> Self {
        let name = name.into();
        Self {
            runtime_name: name.clone(),
            full_db_name: name,
            field_characteristics: FieldCharacteristics {
                numeric,
                ..Default::default()
            },
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.field_characteristics.numeric
    }

    pub fn same_field(&self, other: &FieldSelector) -> bool {
        self.full_db_name == other.full_db_name
    }

    /// Column index of this field in `headers`, matched on the full db
    /// name first and the runtime name second.
    pub fn column_index(&self, headers: &[String]) -> PlotResult<usize> {
        headers
            .iter()
            .position(|h| *h == self.full_db_name)
            .or_else(|| headers.iter().position(|h| *h == self.runtime_name))
            .ok_or_else(|| PlotError::FieldNotFound {
                field: self.full_db_name.clone(),
                available: headers.to_vec(),
            })
    }
}

/// The fields currently offered by the upstream query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldProvider {
    pub all_fields: Vec<FieldSelector>,
}

impl FieldProvider {
    pub fn new(all_fields: Vec<FieldSelector>) -> Self {
        Self { all_fields }
    }

    /// Derive fields from a result's headers, marking a column numeric when
    /// its cells are numbers.
    pub fn from_query_result(result: &QueryResult) -> Self {
        let all_fields = result
            .headers
            .iter()
            .enumerate()
            .map(|(idx, name)| FieldSelector::new(name.clone(), result.is_numeric_column(idx)))
            .collect();
        Self { all_fields }
    }

    pub fn numeric_fields(&self) -> Vec<FieldSelector> {
        self.all_fields.iter().filter(|f| f.is_numeric()).cloned().collect()
    }

    pub fn non_numeric_fields(&self) -> Vec<FieldSelector> {
        self.all_fields.iter().filter(|f| !f.is_numeric()).cloned().collect()
    }

    pub fn find(&self, name: &str) -> Option<&FieldSelector> {
        self.all_fields
            .iter()
            .find(|f| f.full_db_name == name)
            .or_else(|| self.all_fields.iter().find(|f| f.runtime_name == name))
    }

    /// Drop removed fields, then append added ones not already present.
    pub fn apply_changes(&mut self, added: &[FieldSelector], removed: &[FieldSelector]) {
        self.all_fields.retain(|f| !removed.iter().any(|r| r.same_field(f)));
        for field in added {
            if !self.all_fields.iter().any(|f| f.same_field(field)) {
                self.all_fields.push(field.clone());
            }
        }
    }
}

/// Re-resolve one selection after the field set changed.
///
/// A selection that was removed (or never made) is replaced by the first
/// candidate satisfying `accept`, taken from `available` then `added` and
/// skipping anything in `removed`. Otherwise the selection is kept.
pub fn update_single_field<F>(
    selected: Option<&FieldSelector>,
    available: &[FieldSelector],
    added: &[FieldSelector],
    removed: &[FieldSelector],
    accept: F,
) -> Option<FieldSelector>
where
    F: Fn(&FieldSelector) -> bool,
{
    let needs_substitution = match selected {
        Some(current) => removed.iter().any(|r| r.same_field(current)),
        None => true,
    };
    if !needs_substitution {
        return selected.cloned();
    }

    available
        .iter()
        .chain(added.iter())
        .filter(|f| !removed.iter().any(|r| r.same_field(f)))
        .find(|f| accept(f))
        .cloned()
}
