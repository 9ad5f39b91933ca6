//! Per-cycle evaluation.
//!
//! Composes the resolver, planner and feasibility filter into one report
//! per decision cycle: what to run, what to collect, which recipes are ready
//! and how the tracked recipe is coming along.

use nemesis_common::NemesisResult;
use std::collections::BTreeSet;
use tracing::debug;

use crate::book::RecipeBook;
use crate::feasibility::feasible;
use crate::inventory::{InventorySnapshot, ItemCounts, DEFAULT_SLOT_CAPACITY};
use crate::planner::{plan, NextSteps};
use crate::progress::resolve;
use crate::recipes::RecipeEntry;
use crate::session::{TrackEvent, TrackerSession};

/// Knobs for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOptions {
    /// Number of crafting slots.
    pub capacity: usize,
    /// Items that must not be used by ready recipes.
    pub excluded: BTreeSet<String>,
    /// Leave out ready recipes that nobody asked for.
    pub hide_undesired: bool,
}

impl Default for CycleOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_SLOT_CAPACITY,
            excluded: BTreeSet::new(),
            hide_undesired: false,
        }
    }
}

/// How the tracked recipe relates to the crafting slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackedGuidance {
    /// The slots hold exactly the recipe's ingredients.
    Complete {
        /// Tracked recipe name
        recipe: String,
    },
    /// Some ingredients are not on hand at all.
    MissingComponents {
        /// Tracked recipe name
        recipe: String,
        /// Absent ingredients in recipe order
        missing: Vec<String>,
    },
    /// Assembly in progress.
    InProgress {
        /// Tracked recipe name
        recipe: String,
        /// Committed items the recipe does not use
        extraneous: Vec<String>,
        /// Ingredients still to place, numbered from 1
        order: Vec<(String, usize)>,
    },
}

/// Everything the display layer needs for one cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport<'b> {
    /// Goal recipe, if one is selected.
    pub goal: Option<&'b RecipeEntry>,
    /// Steps toward the goal.
    pub next_steps: NextSteps,
    /// Tracked recipe when it is not ready.
    pub tracked_not_ready: Option<&'b RecipeEntry>,
    /// Ready recipes that are part of the goal plan.
    pub toward_goal: Vec<&'b RecipeEntry>,
    /// Ready recipes that are desired but not part of the goal plan.
    pub desired: Vec<&'b RecipeEntry>,
    /// Any other ready recipes.
    pub other: Vec<&'b RecipeEntry>,
    /// Recipes complete in the crafting slots.
    pub completed: Vec<&'b RecipeEntry>,
    /// Committed items left over after completed recipes.
    pub combinable: BTreeSet<String>,
    /// Guidance for the tracked recipe.
    pub guidance: Option<TrackedGuidance>,
    /// Change to the tracked recipe caused by this cycle.
    pub track_event: Option<TrackEvent>,
    /// Committed list the cycle was evaluated against.
    pub committed: Vec<String>,
    /// Items on hand, loose and committed.
    pub present: ItemCounts,
}

/// Runs one decision cycle.
///
/// When the snapshot was taken with the crafting panel hidden, the committed
/// list last seen by `session` stands in for it. The session is only changed
/// once every fallible step has succeeded.
pub fn evaluate<'b>(
    book: &'b RecipeBook,
    session: &mut TrackerSession,
    snapshot: &InventorySnapshot,
    options: &CycleOptions,
) -> NemesisResult<CycleReport<'b>> {
    snapshot.check_capacity(options.capacity)?;

    let committed: Vec<String> = match &snapshot.committed {
        Some(visible) => visible.clone(),
        None => session.committed().to_vec(),
    };
    let present = snapshot.present_counts_with(&committed);

    let goal = session.goal_recipe(book);
    let next_steps = match goal {
        Some(goal) => plan(book, goal, &mut present.clone())?,
        None => NextSteps::empty(),
    };

    session.observe_committed(snapshot.committed.as_deref());

    let present_names: BTreeSet<&str> = present.names().collect();
    let guidance = session
        .tracked_recipe(book)
        .map(|recipe| tracked_guidance(recipe, &committed, &present_names));

    let progress = resolve(book, &committed);
    let track_event = session.apply_progress(&progress);

    let ready = feasible(book, &present, &options.excluded, &committed, options.capacity);

    let tracked_not_ready = session
        .tracked_recipe(book)
        .filter(|tracked| !ready.iter().any(|r| r.name == tracked.name));

    let (toward_goal, rest): (Vec<_>, Vec<_>) =
        ready.into_iter().partition(|r| next_steps.runs(&r.name));
    let (desired, other): (Vec<_>, Vec<_>) = rest.into_iter().partition(|r| {
        session.desired_recipes().contains(&r.name)
            || r.result
                .as_ref()
                .is_some_and(|result| session.desired_components().contains(result))
    });
    let other = if options.hide_undesired { Vec::new() } else { other };

    debug!(
        "Cycle: {} toward goal, {} desired, {} other, {} completed",
        toward_goal.len(),
        desired.len(),
        other.len(),
        progress.completed.len()
    );

    Ok(CycleReport {
        goal,
        next_steps,
        tracked_not_ready,
        toward_goal,
        desired,
        other,
        completed: progress.completed,
        combinable: progress.combinable,
        guidance,
        track_event,
        committed,
        present,
    })
}

/// Compares the tracked recipe with the committed slots and present items.
#[must_use]
pub fn tracked_guidance(
    recipe: &RecipeEntry,
    committed: &[String],
    present: &BTreeSet<&str>,
) -> TrackedGuidance {
    let needed = recipe.ordered_distinct_ingredients();
    let put_in: BTreeSet<&str> = committed.iter().map(String::as_str).collect();

    if put_in == needed.iter().copied().collect::<BTreeSet<_>>() {
        return TrackedGuidance::Complete {
            recipe: recipe.name.clone(),
        };
    }

    let missing: Vec<String> = needed
        .iter()
        .filter(|ingredient| !present.contains(*ingredient))
        .map(|ingredient| (*ingredient).to_string())
        .collect();
    if !missing.is_empty() {
        return TrackedGuidance::MissingComponents {
            recipe: recipe.name.clone(),
            missing,
        };
    }

    let extraneous = put_in
        .iter()
        .filter(|item| !recipe.uses(item))
        .map(|item| (*item).to_string())
        .collect();
    let order = needed
        .iter()
        .filter(|ingredient| !put_in.contains(*ingredient))
        .enumerate()
        .map(|(index, ingredient)| ((*ingredient).to_string(), index + 1))
        .collect();

    TrackedGuidance::InProgress {
        recipe: recipe.name.clone(),
        extraneous,
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nemesis_common::{NemesisError, PlanError, SnapshotError};

    fn book() -> RecipeBook {
        RecipeBook::from_entries(vec![
            RecipeEntry::new("X", ["A", "B"]).with_result("X"),
            RecipeEntry::new("Y", ["X", "C"]).with_result("Y"),
            RecipeEntry::new("Wanted", ["C", "D"]).with_result("W"),
            RecipeEntry::new("Spare", ["E"]),
        ])
        .expect("valid book")
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn names(recipes: &[&RecipeEntry]) -> Vec<String> {
        recipes.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_groupings_are_disjoint() {
        let book = book();
        let mut session = TrackerSession::new();
        session.set_goal(&book, Some("Y"));
        session.set_desired(&book, "Wanted", true);

        let snapshot = InventorySnapshot::new(strings(&["A", "B", "C", "D", "E"]), vec![]);
        let report =
            evaluate(&book, &mut session, &snapshot, &CycleOptions::default()).expect("cycle");

        assert_eq!(report.goal.expect("goal").name, "Y");
        assert_eq!(report.next_steps.recipes_to_run, vec!["X"]);
        assert_eq!(names(&report.toward_goal), vec!["X"]);
        assert_eq!(names(&report.desired), vec!["Wanted"]);
        assert_eq!(names(&report.other), vec!["Spare"]);
        assert!(report.tracked_not_ready.is_none());
    }

    #[test]
    fn test_hide_undesired() {
        let book = book();
        let mut session = TrackerSession::new();
        let snapshot = InventorySnapshot::new(strings(&["E"]), vec![]);
        let options = CycleOptions {
            hide_undesired: true,
            ..CycleOptions::default()
        };

        let report = evaluate(&book, &mut session, &snapshot, &options).expect("cycle");
        assert!(report.other.is_empty());
        assert!(report.next_steps.is_empty());
    }

    #[test]
    fn test_tracked_not_ready() {
        let book = book();
        let mut session = TrackerSession::new();
        session.toggle_tracked(&book, "Wanted");

        let snapshot = InventorySnapshot::new(strings(&["C"]), vec![]);
        let report =
            evaluate(&book, &mut session, &snapshot, &CycleOptions::default()).expect("cycle");

        assert_eq!(report.tracked_not_ready.expect("tracked").name, "Wanted");
        assert_eq!(
            report.guidance,
            Some(TrackedGuidance::MissingComponents {
                recipe: "Wanted".into(),
                missing: vec!["D".into()],
            })
        );
    }

    #[test]
    fn test_completed_tracked_recipe_clears_track() {
        let book = book();
        let mut session = TrackerSession::new();
        session.toggle_tracked(&book, "X");

        let snapshot = InventorySnapshot::new(vec![], strings(&["A", "B"]));
        let report =
            evaluate(&book, &mut session, &snapshot, &CycleOptions::default()).expect("cycle");

        assert_eq!(names(&report.completed), vec!["X"]);
        assert_eq!(report.track_event, Some(TrackEvent::Completed("X".into())));
        assert_eq!(
            report.guidance,
            Some(TrackedGuidance::Complete {
                recipe: "X".into()
            })
        );
        assert!(session.tracked().is_none());
    }

    #[test]
    fn test_in_progress_guidance() {
        let recipe = RecipeEntry::new("Trickster", ["Overcharged", "Assassin", "Echoist"]);
        let committed = strings(&["Assassin", "Toxic"]);
        let present: BTreeSet<&str> = ["Overcharged", "Assassin", "Echoist", "Toxic"]
            .into_iter()
            .collect();

        assert_eq!(
            tracked_guidance(&recipe, &committed, &present),
            TrackedGuidance::InProgress {
                recipe: "Trickster".into(),
                extraneous: vec!["Toxic".into()],
                order: vec![("Overcharged".into(), 1), ("Echoist".into(), 2)],
            }
        );
    }

    #[test]
    fn test_over_capacity_snapshot() {
        let book = book();
        let mut session = TrackerSession::new();
        let snapshot = InventorySnapshot::new(vec![], strings(&["A", "B", "C", "D", "E"]));

        let result = evaluate(&book, &mut session, &snapshot, &CycleOptions::default());
        assert!(matches!(
            result,
            Err(NemesisError::Snapshot(SnapshotError::OverCapacity { .. }))
        ));
    }

    #[test]
    fn test_cyclic_goal_surfaces_error() {
        let book = RecipeBook::from_entries(vec![
            RecipeEntry::new("MakeA", ["B"]).with_result("A"),
            RecipeEntry::new("MakeB", ["A"]).with_result("B"),
        ])
        .expect("valid book");
        let mut session = TrackerSession::new();
        session.set_goal(&book, Some("MakeA"));

        let result = evaluate(
            &book,
            &mut session,
            &InventorySnapshot::default(),
            &CycleOptions::default(),
        );
        assert!(matches!(
            result,
            Err(NemesisError::Plan(PlanError::CyclicRecipe { .. }))
        ));
    }

    #[test]
    fn test_evaluation_does_not_drain_snapshot() {
        let book = book();
        let mut session = TrackerSession::new();
        session.set_goal(&book, Some("X"));
        let snapshot = InventorySnapshot::new(strings(&["A", "B"]), vec![]);

        let first = evaluate(&book, &mut session, &snapshot, &CycleOptions::default())
            .expect("cycle")
            .next_steps;
        let second = evaluate(&book, &mut session, &snapshot, &CycleOptions::default())
            .expect("cycle")
            .next_steps;
        assert_eq!(first, second);
        assert_eq!(first.recipes_to_run, vec!["X"]);
    }

    #[test]
    fn test_failed_plan_leaves_track_in_place() {
        let book = RecipeBook::from_entries(vec![
            RecipeEntry::new("X", ["A", "B"]).with_result("X"),
            RecipeEntry::new("MakeP", ["Q"]).with_result("P"),
            RecipeEntry::new("MakeQ", ["P"]).with_result("Q"),
        ])
        .expect("valid book");
        let mut session = TrackerSession::new();
        session.toggle_tracked(&book, "X");
        session.set_goal(&book, Some("MakeP"));
        let snapshot = InventorySnapshot::new(vec![], strings(&["A", "B"]));

        let result = evaluate(&book, &mut session, &snapshot, &CycleOptions::default());
        assert!(matches!(
            result,
            Err(NemesisError::Plan(PlanError::CyclicRecipe { .. }))
        ));
        assert_eq!(session.tracked(), Some("X"));
        assert!(session.committed().is_empty());

        // Once the goal is fixed the completion is still reported.
        session.set_goal(&book, None);
        let report =
            evaluate(&book, &mut session, &snapshot, &CycleOptions::default()).expect("cycle");
        assert_eq!(report.track_event, Some(TrackEvent::Completed("X".into())));
    }

    #[test]
    fn test_hidden_panel_reuses_last_committed_list() {
        let book = book();
        let mut session = TrackerSession::new();
        session.toggle_tracked(&book, "X");

        let visible = InventorySnapshot::new(strings(&["B"]), strings(&["A"]));
        evaluate(&book, &mut session, &visible, &CycleOptions::default()).expect("cycle");

        let hidden = InventorySnapshot::panel_hidden(strings(&["B"]));
        let report =
            evaluate(&book, &mut session, &hidden, &CycleOptions::default()).expect("cycle");
        assert_eq!(report.committed, strings(&["A"]));
        assert_eq!(report.present.count("A"), 1);
        assert_eq!(
            report.guidance,
            Some(TrackedGuidance::InProgress {
                recipe: "X".into(),
                extraneous: vec![],
                order: vec![("B".into(), 1)],
            })
        );

        // A new area forgets the cached slots.
        session.on_area_change();
        let report =
            evaluate(&book, &mut session, &hidden, &CycleOptions::default()).expect("cycle");
        assert!(report.committed.is_empty());
        assert!(report.guidance.is_none());
    }
}
