//! Command line interface: init, validate, list, desired, plan, watch.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use nemesis_common::PlanError;
use nemesis_core::{compute_desired, evaluate, CycleReport, RecipeBook, TrackerSession};
use tracing::{info, warn};

use crate::book_loader::BookLoader;
use crate::config::{TrackerConfig, CONFIG_FILE};
use crate::report;
use crate::snapshot::load_snapshot;

/// Crafting recipe tracker.
#[derive(Parser, Debug)]
#[command(name = "nemesis", version, about)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Tracker subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration and seed the custom recipe book
    Init,

    /// Load both recipe books and report problems
    Validate,

    /// List recipe names
    List {
        /// Only names containing this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show the components needed by desired recipes
    Desired {
        /// Recipes to expand (default: configured desired recipes and goal)
        recipes: Vec<String>,
    },

    /// Run one decision cycle against an inventory snapshot
    Plan(CycleArgs),

    /// Re-evaluate the snapshot periodically, reloading changed recipe books
    Watch {
        #[command(flatten)]
        cycle: CycleArgs,

        /// Milliseconds between cycles
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,

        /// Stop after this many cycles (default: run until interrupted)
        #[arg(long)]
        cycles: Option<u32>,
    },
}

/// Inputs of a decision cycle.
#[derive(Args, Debug, Clone)]
pub struct CycleArgs {
    /// Inventory snapshot JSON
    #[arg(short, long)]
    pub snapshot: PathBuf,

    /// Goal recipe (overrides the configured one)
    #[arg(short, long)]
    pub goal: Option<String>,

    /// Recipe being assembled in the crafting slots
    #[arg(short, long)]
    pub track: Option<String>,

    /// Items ready recipes must not use (repeatable)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Hide ready recipes nobody asked for
    #[arg(long)]
    pub hide_undesired: bool,
}

impl CycleArgs {
    /// Layers the command line selections over the configuration.
    fn apply(&self, config: &TrackerConfig) -> TrackerConfig {
        let mut config = config.clone();
        if self.goal.is_some() {
            config.goal_recipe.clone_from(&self.goal);
        }
        config.excluded_items.extend(self.exclude.iter().cloned());
        config.hide_undesired |= self.hide_undesired;
        config
    }
}

/// Runs a parsed command line, writing its output to `out`.
pub fn dispatch<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let config = TrackerConfig::load_from(&cli.config);
    let lines = match cli.command {
        Commands::Init => cmd_init(&cli.config, &config)?,
        Commands::Validate => cmd_validate(&config)?,
        Commands::List { search } => cmd_list(&config, search.as_deref())?,
        Commands::Desired { recipes } => cmd_desired(&config, &recipes)?,
        Commands::Plan(args) => cmd_plan(&args.apply(&config), &args)?,
        Commands::Watch {
            cycle,
            interval_ms,
            cycles,
        } => {
            let interval = Duration::from_millis(interval_ms);
            return cmd_watch(&cycle.apply(&config), &cycle, interval, cycles, out);
        },
    };
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn load_book(loader: &mut BookLoader, config: &TrackerConfig) -> Result<Arc<RecipeBook>> {
    loader
        .reload()
        .with_context(|| format!("loading recipe books from {}", config.book_dir.display()))
}

fn ensure_known<'a>(
    book: &RecipeBook,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    for name in names {
        if !book.contains(name) {
            bail!(PlanError::UnknownRecipe(name.to_string()));
        }
    }
    Ok(())
}

fn cmd_init(config_path: &Path, config: &TrackerConfig) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    if config_path.exists() {
        lines.push(format!("Keeping existing {}", config_path.display()));
    } else {
        config.save_to(config_path)?;
        lines.push(format!("Wrote {}", config_path.display()));
    }

    let loader = BookLoader::from_config(config);
    if loader.seed_custom_book()? {
        lines.push(format!("Seeded {}", loader.custom_path().display()));
    }
    Ok(lines)
}

fn cmd_validate(config: &TrackerConfig) -> Result<Vec<String>> {
    let book = load_book(&mut BookLoader::from_config(config), config)?;
    Ok(vec![format!(
        "Recipe book OK: {} recipes ({} default, {} custom)",
        book.len(),
        book.default_count(),
        book.custom_count()
    )])
}

fn cmd_list(config: &TrackerConfig, search: Option<&str>) -> Result<Vec<String>> {
    let book = load_book(&mut BookLoader::from_config(config), config)?;
    let lines = match search {
        Some(query) => book.search(query).iter().map(|r| r.name.clone()).collect(),
        None => book.sorted_names().into_iter().map(str::to_string).collect(),
    };
    Ok(lines)
}

fn cmd_desired(config: &TrackerConfig, recipes: &[String]) -> Result<Vec<String>> {
    let book = load_book(&mut BookLoader::from_config(config), config)?;

    let goals: Vec<&str> = if recipes.is_empty() {
        config
            .desired_recipes
            .iter()
            .chain(config.goal_recipe.iter())
            .map(String::as_str)
            .collect()
    } else {
        recipes.iter().map(String::as_str).collect()
    };
    ensure_known(&book, goals.iter().copied())?;

    Ok(compute_desired(goals, &book).into_iter().collect())
}

/// Builds the session for a run of cycles, validating the selections.
fn start_session(
    config: &TrackerConfig,
    book: &RecipeBook,
    track: Option<&str>,
) -> Result<TrackerSession> {
    ensure_known(book, config.goal_recipe.iter().map(String::as_str).chain(track))?;

    let mut session = config.session(book);
    if let Some(name) = track {
        session.toggle_tracked(book, name);
    }
    Ok(session)
}

/// Report lines followed by the stash.
fn cycle_lines(
    cycle: &CycleReport<'_>,
    session: &TrackerSession,
    book: &RecipeBook,
) -> Vec<String> {
    let mut lines = report::render(cycle);
    let mut items: Vec<(&str, u32)> = cycle.present.iter().collect();
    items.sort_unstable();
    if !items.is_empty() {
        lines.push("Stash:".to_string());
        lines.extend(report::render_items(session, book, items));
    }
    lines
}

fn cmd_plan(config: &TrackerConfig, args: &CycleArgs) -> Result<Vec<String>> {
    let book = load_book(&mut BookLoader::from_config(config), config)?;
    let mut session = start_session(config, &book, args.track.as_deref())?;

    let snapshot = load_snapshot(&args.snapshot)?;
    let cycle = evaluate(&book, &mut session, &snapshot, &config.cycle_options())?;
    info!(
        "Cycle done: {} ready recipes",
        cycle.toward_goal.len() + cycle.desired.len() + cycle.other.len()
    );

    Ok(cycle_lines(&cycle, &session, &book))
}

fn cmd_watch<W: Write>(
    config: &TrackerConfig,
    args: &CycleArgs,
    interval: Duration,
    cycles: Option<u32>,
    out: &mut W,
) -> Result<()> {
    let mut loader = BookLoader::from_config(config);
    let mut book = load_book(&mut loader, config)?;
    let mut session = start_session(config, &book, args.track.as_deref())?;
    let options = config.cycle_options();
    let mut area: Option<String> = None;
    let mut done = 0u32;

    loop {
        if loader.check_hot_reload() {
            if let Some(reloaded) = loader.book() {
                book = reloaded;
            }
            writeln!(out, "Recipe book reloaded: {} recipes", book.len())?;
            let event = session.on_book_reloaded(&book);
            if let Some(line) = event.as_ref().and_then(report::render_event) {
                writeln!(out, "{line}")?;
            }
        }

        match load_snapshot(&args.snapshot) {
            Ok(snapshot) => {
                if snapshot.area != area {
                    if area.is_some() {
                        info!("Area changed to {:?}", snapshot.area);
                        let event = session.on_area_change();
                        if let Some(line) = event.as_ref().and_then(report::render_event) {
                            writeln!(out, "{line}")?;
                        }
                    }
                    area.clone_from(&snapshot.area);
                }

                match evaluate(&book, &mut session, &snapshot, &options) {
                    Ok(cycle) => {
                        for line in cycle_lines(&cycle, &session, &book) {
                            writeln!(out, "{line}")?;
                        }
                    },
                    Err(e) => warn!("Skipping cycle: {e}"),
                }
            },
            Err(e) => warn!("Skipping cycle: {e}"),
        }
        writeln!(out)?;
        out.flush()?;

        done += 1;
        if cycles.is_some_and(|limit| done >= limit) {
            return Ok(());
        }
        thread::sleep(interval);
    }
}
