//! Desired-component propagation.
//!
//! Expands a set of goal recipes into every item and intermediate result
//! needed anywhere in their dependency trees.

use std::collections::BTreeSet;

use crate::book::RecipeBook;

/// Computes the desired component set for the given goal recipe names.
///
/// Goals with a result expand from that result; goals without one expand
/// from their direct ingredients. A name that is produced by some recipe
/// expands into that recipe's ingredients. Unknown goal names are skipped.
///
/// The visited set makes this terminate on cyclic books; a cycle is simply
/// truncated where it closes.
#[must_use]
pub fn compute_desired<'a, I>(goal_names: I, book: &RecipeBook) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut visited = BTreeSet::new();
    let mut stack: Vec<&str> = Vec::new();

    for goal_name in goal_names {
        let Some(goal) = book.get(goal_name) else {
            continue;
        };

        match &goal.result {
            Some(result) => stack.push(result),
            None => stack.extend(goal.recipe.iter().rev().map(String::as_str)),
        }

        while let Some(component) = stack.pop() {
            if !visited.insert(component.to_string()) {
                continue;
            }
            if let Some(recipe) = book.get_by_result(component) {
                stack.extend(recipe.recipe.iter().rev().map(String::as_str));
            }
        }
    }

    visited
}
