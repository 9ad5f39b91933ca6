//! Next-step planning toward a goal recipe.
//!
//! This module provides:
//! - `NextSteps`: items to collect and recipes to run, in execution order
//! - Recursive planning that reserves items as it goes
//! - Grouping of repeated steps for display ("2x Assassin")

use nemesis_common::{PlanError, PlanResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::book::RecipeBook;
use crate::inventory::ItemCounts;
use crate::recipes::RecipeEntry;

/// What to do next to reach a goal recipe.
///
/// Lists keep duplicates: running a sub-recipe twice shows up twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextSteps {
    /// Raw items that must still be collected.
    pub items_to_collect: Vec<String>,
    /// Recipes that can be run right now, in post-order.
    pub recipes_to_run: Vec<String>,
}

impl NextSteps {
    /// Creates an empty plan.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if there is nothing to collect and nothing to run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items_to_collect.is_empty() && self.recipes_to_run.is_empty()
    }

    /// Appends another plan's steps after this one's.
    pub fn merge(&mut self, other: NextSteps) {
        self.items_to_collect.extend(other.items_to_collect);
        self.recipes_to_run.extend(other.recipes_to_run);
    }

    /// Recipes to run, grouped by name in first-appearance order.
    #[must_use]
    pub fn grouped_recipes(&self) -> Vec<GroupedStep> {
        group_steps(&self.recipes_to_run)
    }

    /// Items to collect, grouped by name in first-appearance order.
    #[must_use]
    pub fn grouped_items(&self) -> Vec<GroupedStep> {
        group_steps(&self.items_to_collect)
    }

    /// Returns true if the named recipe is among the recipes to run.
    #[must_use]
    pub fn runs(&self, name: &str) -> bool {
        self.recipes_to_run.iter().any(|r| r == name)
    }
}

/// A step name with how many times it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedStep {
    /// Recipe or item name.
    pub name: String,
    /// Number of occurrences.
    pub count: usize,
}

impl fmt::Display for GroupedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}x {}", self.count, self.name)
        }
    }
}

fn group_steps(steps: &[String]) -> Vec<GroupedStep> {
    let mut grouped: Vec<GroupedStep> = Vec::new();
    for step in steps {
        match grouped.iter_mut().find(|g| &g.name == step) {
            Some(group) => group.count += 1,
            None => grouped.push(GroupedStep {
                name: step.clone(),
                count: 1,
            }),
        }
    }
    grouped
}

/// Plans the steps toward `target`, reserving items from `available`.
///
/// Each ingredient is taken from `available` if one is left; otherwise the
/// recipe producing it is planned recursively, or the ingredient is listed
/// for collection when nothing produces it. The target itself is listed to
/// run only when every ingredient was taken directly.
///
/// `available` is drained as planning proceeds, so later siblings see the
/// reservations of earlier ones. Pass a copy to keep the caller's counts.
pub fn plan(
    book: &RecipeBook,
    target: &RecipeEntry,
    available: &mut ItemCounts,
) -> PlanResult<NextSteps> {
    let mut planner = Planner {
        book,
        chain: Vec::new(),
    };
    planner.expand(target, available)
}

/// Plans toward the recipe called `name`.
pub fn plan_by_name(
    book: &RecipeBook,
    name: &str,
    available: &mut ItemCounts,
) -> PlanResult<NextSteps> {
    let target = book
        .get(name)
        .ok_or_else(|| PlanError::UnknownRecipe(name.to_string()))?;
    plan(book, target, available)
}

struct Planner<'a> {
    book: &'a RecipeBook,
    /// Recipes currently being expanded, outermost first.
    chain: Vec<&'a str>,
}

impl<'a> Planner<'a> {
    fn expand(
        &mut self,
        target: &'a RecipeEntry,
        available: &mut ItemCounts,
    ) -> PlanResult<NextSteps> {
        if let Some(start) = self.chain.iter().position(|name| *name == target.name) {
            let mut chain: Vec<String> =
                self.chain[start..].iter().map(|s| (*s).to_string()).collect();
            chain.push(target.name.clone());
            return Err(PlanError::CyclicRecipe { chain });
        }
        self.chain.push(&target.name);

        let mut steps = NextSteps::empty();
        let mut all_present = true;
        for ingredient in &target.recipe {
            if available.take_one(ingredient) {
                continue;
            }
            all_present = false;
            match self.book.get_by_result(ingredient) {
                Some(sub_recipe) => steps.merge(self.expand(sub_recipe, available)?),
                None => steps.items_to_collect.push(ingredient.clone()),
            }
        }

        self.chain.pop();
        if all_present {
            steps.recipes_to_run.push(target.name.clone());
        }
        trace!(
            "Planned {}: run {:?}, collect {:?}",
            target.name,
            steps.recipes_to_run,
            steps.items_to_collect
        );
        Ok(steps)
    }
}
