//! Partial-progress resolution for committed crafting slots.
//!
//! Given the items already placed into the crafting slots, works out which
//! recipes are complete among them and which items are left over.

use std::collections::BTreeSet;

use crate::book::RecipeBook;
use crate::inventory::ItemCounts;
use crate::recipes::RecipeEntry;

/// Outcome of resolving a committed item list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress<'b> {
    /// Recipes completed among the committed items, in detection order.
    pub completed: Vec<&'b RecipeEntry>,
    /// Items left over after removing completed recipes.
    pub combinable: BTreeSet<String>,
}

impl Progress<'_> {
    /// Returns true if the named recipe was completed.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.completed.iter().any(|recipe| recipe.name == name)
    }

    /// Names of the completed recipes.
    #[must_use]
    pub fn completed_names(&self) -> Vec<&str> {
        self.completed.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Resolves completed recipes among the committed items.
///
/// Scans growing prefixes of the remaining list; the first recipe (by name)
/// whose whole ingredient multiset fits into the prefix is completed, its
/// ingredients are removed and the scan restarts from a one-item prefix.
/// Greedy and order-sensitive: earlier-placed items are consumed first.
#[must_use]
pub fn resolve<'b>(book: &'b RecipeBook, committed: &[String]) -> Progress<'b> {
    let candidates = book.sorted_entries();
    let mut remaining: Vec<&str> = committed.iter().map(String::as_str).collect();
    let mut completed: Vec<&'b RecipeEntry> = Vec::new();

    'scan: loop {
        for prefix_len in 1..=remaining.len() {
            let prefix: ItemCounts = remaining[..prefix_len].iter().copied().collect();
            let found = candidates.iter().find(|recipe| {
                recipe.recipe.len() <= prefix_len
                    && !completed.iter().any(|done| done.name == recipe.name)
                    && prefix.contains_all(recipe.recipe.as_slice())
            });

            if let Some(&recipe) = found {
                for ingredient in &recipe.recipe {
                    let position = remaining.iter().position(|item| *item == ingredient.as_str());
                    if let Some(position) = position {
                        remaining.remove(position);
                    }
                }
                completed.push(recipe);
                continue 'scan;
            }
        }
        break;
    }

    Progress {
        completed,
        combinable: remaining.into_iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_single_recipe_with_leftover() {
        let book = RecipeBook::from_entries(vec![RecipeEntry::new("X", ["A", "B"])])
            .expect("valid book");

        let progress = resolve(&book, &strings(&["A", "B", "C"]));
        assert_eq!(progress.completed_names(), vec!["X"]);
        assert_eq!(progress.combinable, set(&["C"]));
        assert!(progress.contains("X"));
    }

    #[test]
    fn test_order_independent_within_prefix() {
        let book = RecipeBook::from_entries(vec![RecipeEntry::new("X", ["A", "B"])])
            .expect("valid book");

        let progress = resolve(&book, &strings(&["B", "C", "A"]));
        assert_eq!(progress.completed_names(), vec!["X"]);
        assert_eq!(progress.combinable, set(&["C"]));
    }

    #[test]
    fn test_two_recipes_restart_scan() {
        let book = RecipeBook::from_entries(vec![
            RecipeEntry::new("Pair", ["A", "B"]),
            RecipeEntry::new("Other", ["C", "D"]),
        ])
        .expect("valid book");

        let progress = resolve(&book, &strings(&["A", "C", "B", "D"]));
        assert_eq!(progress.completed_names(), vec!["Pair", "Other"]);
        assert!(progress.combinable.is_empty());
    }

    #[test]
    fn test_recipe_completes_only_once() {
        let book = RecipeBook::from_entries(vec![RecipeEntry::new("X", ["A"])])
            .expect("valid book");

        let progress = resolve(&book, &strings(&["A", "A"]));
        assert_eq!(progress.completed_names(), vec!["X"]);
        assert_eq!(progress.combinable, set(&["A"]));
    }

    #[test]
    fn test_duplicate_ingredients_need_both_copies() {
        let book = RecipeBook::from_entries(vec![RecipeEntry::new("Double", ["A", "A"])])
            .expect("valid book");

        let single = resolve(&book, &strings(&["A", "B"]));
        assert!(single.completed.is_empty());
        assert_eq!(single.combinable, set(&["A", "B"]));

        let double = resolve(&book, &strings(&["A", "B", "A"]));
        assert_eq!(double.completed_names(), vec!["Double"]);
        assert_eq!(double.combinable, set(&["B"]));
    }

    #[test]
    fn test_earlier_items_win() {
        // Both recipes want A; the one matching the shorter prefix takes it.
        let book = RecipeBook::from_entries(vec![
            RecipeEntry::new("First", ["A", "B"]),
            RecipeEntry::new("Second", ["A", "C"]),
        ])
        .expect("valid book");

        let progress = resolve(&book, &strings(&["A", "C", "B"]));
        assert_eq!(progress.completed_names(), vec!["Second"]);
        assert_eq!(progress.combinable, set(&["B"]));
    }

    #[test]
    fn test_empty_committed_list() {
        let book = RecipeBook::from_entries(vec![RecipeEntry::new("X", ["A"])])
            .expect("valid book");
        let progress = resolve(&book, &[]);
        assert!(progress.completed.is_empty());
        assert!(progress.combinable.is_empty());
    }
}
