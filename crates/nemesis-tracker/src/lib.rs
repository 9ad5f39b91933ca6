//! # Nemesis Tracker
//!
//! The collaborator around the recipe engine.
//!
//! This crate ties the engine to the outside world:
//! - Configuration file with standing selections
//! - Recipe book documents: loading, seeding, reload and hot-reload
//! - Inventory snapshot documents
//! - Plain-text cycle reports
//! - The `nemesis` command line

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod book_loader;
pub mod cli;
pub mod config;
pub mod report;
pub mod snapshot;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::book_loader::*;
    pub use crate::config::*;
    pub use crate::snapshot::*;
}

pub use prelude::*;
