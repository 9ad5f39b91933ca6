//! Feasibility filter for recipe display.
//!
//! A recipe is feasible when every distinct ingredient is present at least
//! once, none of them is excluded, and the distinct names of its
//! ingredients plus the already-committed items fit into the crafting
//! slots. Quantities are not checked here; the planner does that.

use std::collections::BTreeSet;

use crate::book::RecipeBook;
use crate::inventory::ItemCounts;
use crate::recipes::RecipeEntry;

/// Checks a single recipe against the feasibility rules.
#[must_use]
pub fn is_feasible(
    recipe: &RecipeEntry,
    present: &ItemCounts,
    excluded: &BTreeSet<String>,
    committed: &[String],
    capacity: usize,
) -> bool {
    if recipe.recipe.iter().any(|ingredient| excluded.contains(ingredient)) {
        return false;
    }

    let slot_usage: BTreeSet<&str> = recipe
        .recipe
        .iter()
        .chain(committed.iter())
        .map(String::as_str)
        .collect();
    if slot_usage.len() > capacity {
        return false;
    }

    recipe.recipe.iter().all(|ingredient| present.has(ingredient))
}

/// Returns every feasible recipe of the book, sorted by name.
#[must_use]
pub fn feasible<'b>(
    book: &'b RecipeBook,
    present: &ItemCounts,
    excluded: &BTreeSet<String>,
    committed: &[String],
    capacity: usize,
) -> Vec<&'b RecipeEntry> {
    book.sorted_entries()
        .into_iter()
        .filter(|recipe| is_feasible(recipe, present, excluded, committed, capacity))
        .collect()
}
