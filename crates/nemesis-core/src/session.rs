//! Tracker session state.
//!
//! This module owns the user's selections between decision cycles:
//! - Desired recipes and their cached component set
//! - The goal recipe being worked towards
//! - The recipe currently being assembled (tracked)
//! - The last committed slot list seen while the crafting panel was open
//!
//! Every change goes through an explicit transition method.

use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::book::RecipeBook;
use crate::desired::compute_desired;
use crate::progress::Progress;
use crate::recipes::RecipeEntry;

/// Something that happened to the tracked recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackEvent {
    /// A recipe is now tracked.
    Tracked(String),
    /// The user cleared the track.
    Cleared(String),
    /// The tracked recipe was found complete in the crafting slots.
    Completed(String),
    /// The tracked recipe disappeared from the book or the area changed.
    Dropped(String),
}

/// Session state owned by the caller of each decision cycle.
#[derive(Debug, Clone, Default)]
pub struct TrackerSession {
    /// Recipes the user marked as desired.
    desired_recipes: BTreeSet<String>,
    /// Items and results needed anywhere under the desired recipes.
    desired_components: BTreeSet<String>,
    /// Recipe being worked towards.
    goal: Option<String>,
    /// Recipe currently being assembled.
    tracked: Option<String>,
    /// Committed slots from the last cycle the panel was visible.
    committed_cache: Vec<String>,
    /// Keep the tracked recipe across area changes.
    remember_tracked_on_area_change: bool,
}

impl TrackerSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the tracked recipe across area changes.
    #[must_use]
    pub fn with_remember_tracked(mut self, remember: bool) -> Self {
        self.remember_tracked_on_area_change = remember;
        self
    }

    /// Recipes marked as desired.
    #[must_use]
    pub fn desired_recipes(&self) -> &BTreeSet<String> {
        &self.desired_recipes
    }

    /// Cached desired component set.
    #[must_use]
    pub fn desired_components(&self) -> &BTreeSet<String> {
        &self.desired_components
    }

    /// Name of the goal recipe.
    #[must_use]
    pub fn goal(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    /// Name of the tracked recipe.
    #[must_use]
    pub fn tracked(&self) -> Option<&str> {
        self.tracked.as_deref()
    }

    /// Resolves the goal recipe against a book.
    #[must_use]
    pub fn goal_recipe<'b>(&self, book: &'b RecipeBook) -> Option<&'b RecipeEntry> {
        self.goal.as_deref().and_then(|name| book.get(name))
    }

    /// Resolves the tracked recipe against a book.
    #[must_use]
    pub fn tracked_recipe<'b>(&self, book: &'b RecipeBook) -> Option<&'b RecipeEntry> {
        self.tracked.as_deref().and_then(|name| book.get(name))
    }

    /// Committed slot list currently in effect.
    #[must_use]
    pub fn committed(&self) -> &[String] {
        &self.committed_cache
    }

    /// Marks or unmarks a recipe as desired and recomputes components.
    ///
    /// Names the book does not know are ignored.
    pub fn set_desired(&mut self, book: &RecipeBook, name: &str, desired: bool) {
        if desired {
            if !book.contains(name) {
                return;
            }
            self.desired_recipes.insert(name.to_string());
        } else {
            self.desired_recipes.remove(name);
        }
        self.rebuild_desired(book);
    }

    /// Selects the goal recipe; selecting a goal also marks it desired.
    ///
    /// An unknown name clears the goal.
    pub fn set_goal(&mut self, book: &RecipeBook, name: Option<&str>) {
        match name {
            Some(name) if book.contains(name) => {
                info!("Working towards {}", name);
                self.goal = Some(name.to_string());
                self.set_desired(book, name, true);
            },
            _ => self.goal = None,
        }
    }

    /// Toggles tracking of a recipe.
    pub fn toggle_tracked(&mut self, book: &RecipeBook, name: &str) -> Option<TrackEvent> {
        if self.tracked.as_deref() == Some(name) {
            self.tracked = None;
            return Some(TrackEvent::Cleared(name.to_string()));
        }
        if !book.contains(name) {
            return None;
        }
        self.tracked = Some(name.to_string());
        Some(TrackEvent::Tracked(name.to_string()))
    }

    /// Re-validates selections after the book was replaced.
    pub fn on_book_reloaded(&mut self, book: &RecipeBook) -> Option<TrackEvent> {
        if self.goal.as_deref().is_some_and(|goal| !book.contains(goal)) {
            debug!("Goal recipe no longer in book, clearing");
            self.goal = None;
        }
        self.rebuild_desired(book);

        match self.tracked.take() {
            Some(name) if !book.contains(&name) => Some(TrackEvent::Dropped(name)),
            other => {
                self.tracked = other;
                None
            },
        }
    }

    /// Forgets per-area state when the player changes area.
    pub fn on_area_change(&mut self) -> Option<TrackEvent> {
        self.committed_cache.clear();
        if self.remember_tracked_on_area_change {
            return None;
        }
        self.tracked.take().map(TrackEvent::Dropped)
    }

    /// Records the committed slots if the crafting panel is visible, and
    /// returns the list in effect (the cached one when hidden).
    pub fn observe_committed(&mut self, visible: Option<&[String]>) -> &[String] {
        if let Some(committed) = visible {
            self.committed_cache = committed.to_vec();
        }
        &self.committed_cache
    }

    /// Clears the track if the tracked recipe is now complete.
    pub fn apply_progress(&mut self, progress: &Progress<'_>) -> Option<TrackEvent> {
        let name = self.tracked.as_deref()?;
        if !progress.contains(name) {
            return None;
        }
        info!("Recipe {} is complete", name);
        self.tracked.take().map(TrackEvent::Completed)
    }

    /// Returns true if the item is neither a desired component nor an
    /// ingredient of the tracked recipe.
    #[must_use]
    pub fn is_undesired_item(&self, book: &RecipeBook, item: &str) -> bool {
        if self.desired_components.contains(item) {
            return false;
        }
        !self
            .tracked_recipe(book)
            .is_some_and(|recipe| recipe.uses(item))
    }

    fn rebuild_desired(&mut self, book: &RecipeBook) {
        self.desired_recipes.retain(|name| book.contains(name));
        self.desired_components =
            compute_desired(self.desired_recipes.iter().map(String::as_str), book);
        debug!(
            "Desired components rebuilt: {} recipes, {} components",
            self.desired_recipes.len(),
            self.desired_components.len()
        );
    }
}
