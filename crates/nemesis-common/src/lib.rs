//! # Nemesis Common
//!
//! Shared abstractions for Project Nemesis.
//!
//! This crate provides the error taxonomy used across all Nemesis tiers:
//! - Recipe book loading and validation errors
//! - Next-step planning errors
//! - Inventory snapshot errors
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
}

pub use prelude::*;
