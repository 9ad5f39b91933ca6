//! Recipe book document loading and management.
//!
//! This module provides:
//! - Reading the default and custom recipe book JSON documents
//! - Seeding the custom book from its template on first run
//! - Wholesale reload that keeps the previous book on failure
//! - Hot-reload support driven by file modification times

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use nemesis_common::{BookError, BookResult};
use nemesis_core::{RawRecipeEntry, RecipeBook};
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;

/// Statistics for the book loader.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BookLoaderStats {
    /// Number of successful loads.
    pub loads: u32,
    /// Number of loads that failed and kept the previous book.
    pub failed_loads: u32,
    /// Number of hot-reloads performed.
    pub hot_reloads: u32,
    /// Entries taken from the default document by the last load.
    pub default_entries: usize,
    /// Entries taken from the custom document by the last load.
    pub custom_entries: usize,
}

/// Recipe book loader with hot-reload support.
///
/// Owns the active book. A reload builds a complete new book and swaps it
/// in; readers holding the previous `Arc` keep a consistent view.
pub struct BookLoader {
    /// Directory holding the documents.
    base_path: PathBuf,
    /// Default document file name.
    default_file: String,
    /// Custom document file name.
    custom_file: String,
    /// Template the custom document is seeded from.
    template_file: String,
    /// Active book, if any load has succeeded.
    book: Option<Arc<RecipeBook>>,
    /// Modification times for hot-reload detection.
    mod_times: HashMap<PathBuf, SystemTime>,
    /// Whether hot-reload is enabled.
    hot_reload_enabled: bool,
    /// Statistics.
    stats: BookLoaderStats,
}

impl BookLoader {
    /// Creates a new loader using the standard document names.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("Initializing recipe book loader at: {:?}", base_path);

        let defaults = TrackerConfig::default();
        Self {
            base_path,
            default_file: defaults.default_book,
            custom_file: defaults.custom_book,
            template_file: defaults.custom_template,
            book: None,
            mod_times: HashMap::new(),
            hot_reload_enabled: false,
            stats: BookLoaderStats::default(),
        }
    }

    /// Creates a loader from the tracker configuration.
    #[must_use]
    pub fn from_config(config: &TrackerConfig) -> Self {
        let mut loader = Self::new(&config.book_dir).with_hot_reload(config.hot_reload);
        loader.default_file.clone_from(&config.default_book);
        loader.custom_file.clone_from(&config.custom_book);
        loader.template_file.clone_from(&config.custom_template);
        loader
    }

    /// Enables or disables hot-reload.
    #[must_use]
    pub fn with_hot_reload(mut self, enabled: bool) -> Self {
        self.hot_reload_enabled = enabled;
        self
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the active book, or `None` if nothing has loaded yet.
    #[must_use]
    pub fn book(&self) -> Option<Arc<RecipeBook>> {
        self.book.clone()
    }

    /// Returns loader statistics.
    #[must_use]
    pub fn stats(&self) -> &BookLoaderStats {
        &self.stats
    }

    /// Path of the default document.
    #[must_use]
    pub fn default_path(&self) -> PathBuf {
        self.base_path.join(&self.default_file)
    }

    /// Path of the custom document.
    #[must_use]
    pub fn custom_path(&self) -> PathBuf {
        self.base_path.join(&self.custom_file)
    }

    /// Path of the custom document template.
    #[must_use]
    pub fn template_path(&self) -> PathBuf {
        self.base_path.join(&self.template_file)
    }

    /// Copies the template into place if the custom document is missing.
    ///
    /// Returns true if the custom document was created.
    pub fn seed_custom_book(&self) -> BookResult<bool> {
        let custom = self.custom_path();
        if custom.exists() {
            return Ok(false);
        }

        let template = self.template_path();
        if !template.exists() {
            return Err(BookError::MissingDocument(template));
        }

        fs::copy(&template, &custom)?;
        info!("Seeded custom recipe book from {:?}", template);
        Ok(true)
    }

    /// Builds a new book from both documents and swaps it in.
    ///
    /// On failure the previous book stays active and the error is returned.
    pub fn reload(&mut self) -> BookResult<Arc<RecipeBook>> {
        match self.build() {
            Ok(book) => {
                let book = Arc::new(book);
                self.stats.loads += 1;
                self.stats.default_entries = book.default_count();
                self.stats.custom_entries = book.custom_count();
                info!(
                    "Loaded {} recipes ({} default, {} custom)",
                    book.len(),
                    book.default_count(),
                    book.custom_count()
                );
                self.book = Some(Arc::clone(&book));
                Ok(book)
            },
            Err(e) => {
                self.stats.failed_loads += 1;
                if self.book.is_some() {
                    warn!("Failed to rebuild the recipe book, keeping previous: {e}");
                } else {
                    warn!("Failed to build the recipe book: {e}");
                }
                Err(e)
            },
        }
    }

    fn build(&mut self) -> BookResult<RecipeBook> {
        self.seed_custom_book()?;

        let default_path = self.default_path();
        let custom_path = self.custom_path();
        let default_entries = self.read_document(&default_path)?;
        let custom_entries = self.read_document(&custom_path)?;

        RecipeBook::load(default_entries, custom_entries)
    }

    /// Reads one recipe book document.
    pub fn read_document(&mut self, path: &Path) -> BookResult<Vec<RawRecipeEntry>> {
        debug!("Loading recipe book document: {:?}", path);

        if !path.exists() {
            return Err(BookError::MissingDocument(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;

        // Track modification time for hot-reload, parseable or not
        if let Ok(metadata) = fs::metadata(path) {
            if let Ok(modified) = metadata.modified() {
                self.mod_times.insert(path.to_path_buf(), modified);
            }
        }

        let entries: Vec<RawRecipeEntry> =
            serde_json::from_str(&content).map_err(|source| BookError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Read {} entries from {:?}", entries.len(), path);
        Ok(entries)
    }

    /// Checks for modified documents and reloads the book.
    ///
    /// Returns true if a new book was swapped in.
    pub fn check_hot_reload(&mut self) -> bool {
        if !self.hot_reload_enabled {
            return false;
        }

        let changed = self.mod_times.iter().any(|(path, prev_modified)| {
            fs::metadata(path)
                .and_then(|metadata| metadata.modified())
                .is_ok_and(|modified| modified > *prev_modified)
        });
        if !changed {
            return false;
        }

        info!("Recipe book changed on disk, reloading");
        if self.reload().is_ok() {
            self.stats.hot_reloads += 1;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    const DEFAULT_BOOK: &str = r#"[
        {"Name": "Assassin", "Result": "Assassin", "Recipe": ["Deadeye", "Vampiric"]},
        {"Name": "Trickster", "Result": "Trickster", "Recipe": ["Overcharged", "Assassin", "Echoist"]}
    ]"#;

    const TEMPLATE: &str = r#"[
        {"Name": "Vampiric Pair", "Result": null, "Recipe": ["Vampiric", "Vampiric"]}
    ]"#;

    fn setup(default: &str, template: Option<&str>) -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("defaultRecipeBook.json"), default).expect("write default");
        if let Some(template) = template {
            fs::write(dir.path().join("customRecipeBook.example.json"), template)
                .expect("write template");
        }
        dir
    }

    #[test]
    fn test_initial_load_seeds_custom_book() {
        let dir = setup(DEFAULT_BOOK, Some(TEMPLATE));
        let mut loader = BookLoader::new(dir.path());

        let book = loader.reload().expect("load");
        assert_eq!(book.len(), 3);
        assert_eq!(book.default_count(), 2);
        assert_eq!(book.custom_count(), 1);
        assert!(dir.path().join("customRecipeBook.json").exists());
        assert_eq!(loader.stats().loads, 1);
    }

    #[test]
    fn test_existing_custom_book_is_not_overwritten() {
        let dir = setup(DEFAULT_BOOK, Some(TEMPLATE));
        fs::write(dir.path().join("customRecipeBook.json"), "[]").expect("write custom");
        let loader = BookLoader::new(dir.path());

        assert!(!loader.seed_custom_book().expect("seed"));
        let content =
            fs::read_to_string(dir.path().join("customRecipeBook.json")).expect("read custom");
        assert_eq!(content, "[]");
    }

    #[test]
    fn test_missing_template() {
        let dir = setup(DEFAULT_BOOK, None);
        let mut loader = BookLoader::new(dir.path());

        let err = loader.reload().expect_err("no template");
        assert!(matches!(err, BookError::MissingDocument(_)));
        assert!(loader.book().is_none());
        assert_eq!(loader.stats().failed_loads, 1);
    }

    #[test]
    fn test_missing_default_document() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("customRecipeBook.json"), "[]").expect("write custom");
        let mut loader = BookLoader::new(dir.path());

        let err = loader.reload().expect_err("no default book");
        assert!(matches!(err, BookError::MissingDocument(path) if path.ends_with("defaultRecipeBook.json")));
    }

    #[test]
    fn test_unparseable_document() {
        let dir = setup("{ not json", Some("[]"));
        let mut loader = BookLoader::new(dir.path());

        let err = loader.reload().expect_err("bad json");
        assert!(matches!(err, BookError::ParseError { .. }));
    }

    #[test]
    fn test_failed_reload_keeps_previous_book() {
        let dir = setup(DEFAULT_BOOK, Some(TEMPLATE));
        let mut loader = BookLoader::new(dir.path());
        let first = loader.reload().expect("load");

        // A custom entry clashing with a default name.
        fs::write(
            dir.path().join("customRecipeBook.json"),
            r#"[{"Name": "Assassin", "Result": null, "Recipe": ["Toxic"]}]"#,
        )
        .expect("write custom");

        let err = loader.reload().expect_err("duplicate name");
        assert!(matches!(err, BookError::DuplicateName(ref names) if names == &["Assassin"]));

        let kept = loader.book().expect("previous book");
        assert!(Arc::ptr_eq(&first, &kept));
        assert_eq!(loader.stats().loads, 1);
        assert_eq!(loader.stats().failed_loads, 1);
    }

    #[test]
    fn test_from_config_uses_configured_names() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("base.json"), DEFAULT_BOOK).expect("write default");
        fs::write(dir.path().join("mine.json"), TEMPLATE).expect("write custom");

        let config = TrackerConfig {
            book_dir: dir.path().to_path_buf(),
            default_book: "base.json".to_string(),
            custom_book: "mine.json".to_string(),
            ..TrackerConfig::default()
        };
        let mut loader = BookLoader::from_config(&config);

        let book = loader.reload().expect("load");
        assert!(book.contains("Vampiric Pair"));
        assert_eq!(loader.base_path(), dir.path());
    }

    #[test]
    fn test_hot_reload() {
        let dir = setup(DEFAULT_BOOK, Some(TEMPLATE));
        let mut loader = BookLoader::new(dir.path()).with_hot_reload(true);
        loader.reload().expect("load");
        assert!(!loader.check_hot_reload());

        // Make sure the new modification time is strictly later.
        std::thread::sleep(Duration::from_millis(1100));
        fs::write(dir.path().join("customRecipeBook.json"), "[]").expect("write custom");

        assert!(loader.check_hot_reload());
        assert_eq!(loader.book().expect("book").len(), 2);
        assert_eq!(loader.stats().hot_reloads, 1);
    }

    #[test]
    fn test_broken_edit_is_reported_once() {
        let dir = setup(DEFAULT_BOOK, Some(TEMPLATE));
        let mut loader = BookLoader::new(dir.path()).with_hot_reload(true);
        loader.reload().expect("load");

        std::thread::sleep(Duration::from_millis(1100));
        fs::write(dir.path().join("customRecipeBook.json"), "[{").expect("write custom");

        assert!(!loader.check_hot_reload());
        assert_eq!(loader.stats().failed_loads, 1);
        assert_eq!(loader.book().expect("previous book").len(), 3);

        // The broken file is not retried until it changes again.
        assert!(!loader.check_hot_reload());
        assert_eq!(loader.stats().failed_loads, 1);
    }

    #[test]
    fn test_hot_reload_disabled() {
        let dir = setup(DEFAULT_BOOK, Some(TEMPLATE));
        let mut loader = BookLoader::new(dir.path());
        loader.reload().expect("load");
        assert!(!loader.check_hot_reload());
    }

    #[test]
    fn test_shipped_books_are_valid() {
        let shipped = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/recipes");
        let dir = TempDir::new().expect("Failed to create temp dir");
        for name in ["defaultRecipeBook.json", "customRecipeBook.example.json"] {
            fs::copy(shipped.join(name), dir.path().join(name)).expect("copy shipped book");
        }

        let mut loader = BookLoader::new(dir.path());
        let book = loader.reload().expect("shipped books load");
        assert_eq!(book.custom_count(), 1);

        // Every recipe plans without hitting a cycle.
        for recipe in book.iter() {
            let mut available = nemesis_core::ItemCounts::new();
            nemesis_core::plan(&book, recipe, &mut available).expect("acyclic");
        }
    }
}
