//! Tracker configuration.
//!
//! Provides the recipe book locations, crafting slot capacity and the user's
//! standing selections (desired recipes, goal, excluded items).
//! Configuration can be loaded from and saved to a TOML file.

use nemesis_core::{CycleOptions, TrackerSession, DEFAULT_SLOT_CAPACITY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "nemesis.toml";

/// Tracker configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    // === Recipe Books ===
    /// Directory holding the recipe book documents
    pub book_dir: PathBuf,
    /// Default book file name
    pub default_book: String,
    /// Custom book file name
    pub custom_book: String,
    /// Template the custom book is seeded from
    pub custom_template: String,
    /// Reload books when their files change
    pub hot_reload: bool,

    // === Crafting ===
    /// Number of crafting slots (1-8)
    pub capacity: usize,
    /// Items ready recipes must not use
    pub excluded_items: BTreeSet<String>,

    // === Selections ===
    /// Recipes marked as desired
    pub desired_recipes: BTreeSet<String>,
    /// Recipe being worked towards
    pub goal_recipe: Option<String>,
    /// Keep the tracked recipe across area changes
    pub remember_tracked_on_area_change: bool,
    /// Hide ready recipes nobody asked for
    pub hide_undesired: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            // Books
            book_dir: PathBuf::from("assets/recipes"),
            default_book: "defaultRecipeBook.json".to_string(),
            custom_book: "customRecipeBook.json".to_string(),
            custom_template: "customRecipeBook.example.json".to_string(),
            hot_reload: false,

            // Crafting
            capacity: DEFAULT_SLOT_CAPACITY,
            excluded_items: BTreeSet::new(),

            // Selections
            desired_recipes: BTreeSet::new(),
            goal_recipe: None,
            remember_tracked_on_area_change: false,
            hide_undesired: false,
        }
    }
}

impl TrackerConfig {
    /// Reads the configuration at `path`, clamped by `validate`.
    ///
    /// A missing file yields the defaults; an unreadable or invalid one
    /// yields the defaults with a warning.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Self::default();
            },
            Err(e) => {
                warn!("Cannot read config {}: {e}", path.display());
                return Self::default();
            },
        };

        toml::from_str::<Self>(&contents)
            .map(|mut config| {
                config.validate();
                debug!("Loaded config from {}", path.display());
                config
            })
            .unwrap_or_else(|e| {
                warn!("Ignoring invalid config {}: {e}", path.display());
                Self::default()
            })
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.capacity = self.capacity.clamp(1, 8);
    }

    /// Evaluation options derived from this configuration.
    #[must_use]
    pub fn cycle_options(&self) -> CycleOptions {
        CycleOptions {
            capacity: self.capacity,
            excluded: self.excluded_items.clone(),
            hide_undesired: self.hide_undesired,
        }
    }

    /// Builds a session with the configured selections applied to `book`.
    #[must_use]
    pub fn session(&self, book: &nemesis_core::RecipeBook) -> TrackerSession {
        let mut session =
            TrackerSession::new().with_remember_tracked(self.remember_tracked_on_area_change);
        for name in &self.desired_recipes {
            if !book.contains(name) {
                warn!("Configured desired recipe {} is not in the book", name);
            }
            session.set_desired(book, name, true);
        }
        if let Some(goal) = &self.goal_recipe {
            if !book.contains(goal) {
                warn!("Configured goal recipe {} is not in the book", goal);
            }
            session.set_goal(book, Some(goal));
        }
        session
    }
}
