//! Recipe definitions.
//!
//! This module provides:
//! - Raw recipe entries as they appear in recipe book documents
//! - Validated recipe entries with a guaranteed name and ingredient list

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::inventory::ItemCounts;

/// A recipe entry exactly as written in a recipe book document.
///
/// Every field is optional so that a missing `Name` is reported by the
/// book validator instead of failing the whole document parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRecipeEntry {
    /// Unique recipe name.
    #[serde(default)]
    pub name: Option<String>,
    /// Item produced by the recipe, if it can be used further.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Ingredient item names, duplicates meaning "two of".
    #[serde(default)]
    pub recipe: Option<Vec<String>>,
}

impl From<RecipeEntry> for RawRecipeEntry {
    fn from(entry: RecipeEntry) -> Self {
        Self {
            name: Some(entry.name),
            result: entry.result,
            recipe: Some(entry.recipe),
        }
    }
}

/// A named transformation of ingredients into an optional result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecipeEntry {
    /// Unique recipe name.
    pub name: String,
    /// Item produced; `None` for a named combo that feeds nothing else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Ingredient item names in slot order.
    pub recipe: Vec<String>,
}

impl RecipeEntry {
    /// Creates a recipe without a result.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, recipe: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            result: None,
            recipe: recipe.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the item produced by this recipe.
    #[must_use]
    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    /// Returns true if this is a named combo without a usable result.
    #[must_use]
    pub fn is_combo(&self) -> bool {
        self.result.is_none()
    }

    /// Returns true if the recipe consumes at least one of `item`.
    #[must_use]
    pub fn uses(&self, item: &str) -> bool {
        self.recipe.iter().any(|ingredient| ingredient == item)
    }

    /// Distinct ingredient names.
    #[must_use]
    pub fn distinct_ingredients(&self) -> BTreeSet<&str> {
        self.recipe.iter().map(String::as_str).collect()
    }

    /// Distinct ingredient names in first-appearance order.
    #[must_use]
    pub fn ordered_distinct_ingredients(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.recipe
            .iter()
            .map(String::as_str)
            .filter(|ingredient| seen.insert(*ingredient))
            .collect()
    }

    /// Ingredient multiset.
    #[must_use]
    pub fn ingredient_counts(&self) -> ItemCounts {
        self.recipe.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_entry_parses_pascal_case() {
        let raw: RawRecipeEntry = serde_json::from_str(
            r#"{"Name": "Assassin", "Result": "Assassin", "Recipe": ["Deadeye", "Vampiric"]}"#,
        )
        .expect("parse");

        assert_eq!(raw.name.as_deref(), Some("Assassin"));
        assert_eq!(raw.result.as_deref(), Some("Assassin"));
        assert_eq!(raw.recipe.expect("recipe").len(), 2);
    }

    #[test]
    fn test_raw_entry_tolerates_missing_fields() {
        let raw: RawRecipeEntry =
            serde_json::from_str(r#"{"Result": null}"#).expect("parse");
        assert!(raw.name.is_none());
        assert!(raw.result.is_none());
        assert!(raw.recipe.is_none());
    }

    #[test]
    fn test_entry_helpers() {
        let entry = RecipeEntry::new("Heralding Minions", ["Dynamo", "Arcane Buffer", "Dynamo"]);

        assert!(entry.is_combo());
        assert!(entry.uses("Dynamo"));
        assert!(!entry.uses("Toxic"));
        assert_eq!(entry.distinct_ingredients().len(), 2);
        assert_eq!(
            entry.ordered_distinct_ingredients(),
            vec!["Dynamo", "Arcane Buffer"]
        );
        assert_eq!(entry.ingredient_counts().count("Dynamo"), 2);
    }

    #[test]
    fn test_entry_serializes_without_null_result() {
        let entry = RecipeEntry::new("Combo", ["A"]);
        let json = serde_json::to_string(&entry).expect("serialize");
        assert_eq!(json, r#"{"Name":"Combo","Recipe":["A"]}"#);

        let with_result = entry.with_result("Out");
        let raw = RawRecipeEntry::from(with_result);
        assert_eq!(raw.result.as_deref(), Some("Out"));
    }
}
