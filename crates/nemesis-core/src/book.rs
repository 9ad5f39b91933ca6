//! Recipe book validation and indexing.
//!
//! This module provides:
//! - Validation of the combined default + custom recipe documents
//! - Lookup by recipe name and by produced result
//! - Sorted name listing and case-insensitive search for selection UIs

use ahash::AHashMap;
use nemesis_common::{BookError, BookResult};
use std::collections::BTreeSet;
use tracing::debug;

use crate::recipes::{RawRecipeEntry, RecipeEntry};

/// The active, validated set of recipes.
///
/// A book is built wholesale and never mutated afterwards; reloading means
/// building a new one and swapping it in.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    /// Entries in document order (default entries first).
    entries: Vec<RecipeEntry>,
    /// Entry index by recipe name.
    by_name: AHashMap<String, usize>,
    /// Entry index by produced result.
    by_result: AHashMap<String, usize>,
    /// How many entries came from the default document.
    default_count: usize,
}

impl RecipeBook {
    /// Validates the default and custom documents and builds the indices.
    ///
    /// Custom entries are appended after the default ones and uniqueness is
    /// checked over the combined list. Checks run in order (missing names,
    /// duplicate names, duplicate results, empty recipes) and every
    /// violation of the first failing kind is reported together.
    pub fn load(
        default_entries: Vec<RawRecipeEntry>,
        custom_entries: Vec<RawRecipeEntry>,
    ) -> BookResult<Self> {
        let default_count = default_entries.len();
        let combined: Vec<RawRecipeEntry> =
            default_entries.into_iter().chain(custom_entries).collect();

        let entries = validate(combined)?;

        let mut by_name = AHashMap::with_capacity(entries.len());
        let mut by_result = AHashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            by_name.insert(entry.name.clone(), index);
            if let Some(result) = &entry.result {
                by_result.insert(result.clone(), index);
            }
        }

        debug!(
            "Indexed {} recipes ({} with results)",
            entries.len(),
            by_result.len()
        );

        Ok(Self {
            entries,
            by_name,
            by_result,
            default_count,
        })
    }

    /// Builds a book from already-shaped entries, all counted as default.
    pub fn from_entries(entries: Vec<RecipeEntry>) -> BookResult<Self> {
        Self::load(entries.into_iter().map(Into::into).collect(), Vec::new())
    }

    /// Returns the number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the book holds no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that came from the default document.
    #[must_use]
    pub fn default_count(&self) -> usize {
        self.default_count
    }

    /// Number of entries that came from the custom document.
    #[must_use]
    pub fn custom_count(&self) -> usize {
        self.entries.len() - self.default_count
    }

    /// Gets a recipe by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RecipeEntry> {
        self.by_name.get(name).map(|&index| &self.entries[index])
    }

    /// Gets the recipe that produces `result`.
    #[must_use]
    pub fn get_by_result(&self, result: &str) -> Option<&RecipeEntry> {
        self.by_result.get(result).map(|&index| &self.entries[index])
    }

    /// Returns true if a recipe with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterates over recipes in document order.
    pub fn iter(&self) -> impl Iterator<Item = &RecipeEntry> {
        self.entries.iter()
    }

    /// Iterates over `(result, recipe)` pairs of the result index.
    pub fn results(&self) -> impl Iterator<Item = (&str, &RecipeEntry)> {
        self.by_result
            .iter()
            .map(|(result, &index)| (result.as_str(), &self.entries[index]))
    }

    /// Recipe names sorted alphabetically.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Recipes sorted by name.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<&RecipeEntry> {
        let mut entries: Vec<&RecipeEntry> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Searches recipes by name substring (case-insensitive), sorted by name.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&RecipeEntry> {
        let query_lower = query.to_lowercase();
        self.sorted_entries()
            .into_iter()
            .filter(|e| e.name.to_lowercase().contains(&query_lower))
            .collect()
    }
}

fn validate(raw: Vec<RawRecipeEntry>) -> BookResult<Vec<RecipeEntry>> {
    let unnamed: Vec<usize> = raw
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.name.is_none())
        .map(|(position, _)| position)
        .collect();
    if !unnamed.is_empty() {
        return Err(BookError::MalformedEntry(unnamed));
    }

    let entries: Vec<RecipeEntry> = raw
        .into_iter()
        .filter_map(|entry| {
            Some(RecipeEntry {
                name: entry.name?,
                result: entry.result,
                recipe: entry.recipe.unwrap_or_default(),
            })
        })
        .collect();

    let duplicate_names = duplicates(entries.iter().map(|e| e.name.as_str()));
    if !duplicate_names.is_empty() {
        return Err(BookError::DuplicateName(duplicate_names));
    }

    let duplicate_results = duplicates(entries.iter().filter_map(|e| e.result.as_deref()));
    if !duplicate_results.is_empty() {
        return Err(BookError::DuplicateResult(duplicate_results));
    }

    let empty: Vec<String> = entries
        .iter()
        .filter(|e| e.recipe.is_empty())
        .map(|e| e.name.clone())
        .collect();
    if !empty.is_empty() {
        return Err(BookError::EmptyRecipe(empty));
    }

    Ok(entries)
}

/// Values that occur more than once, each listed once, sorted.
fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = AHashMap::new();
    for value in values {
        *seen.entry(value).or_insert(0usize) += 1;
    }
    seen.into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(value, _)| value.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
