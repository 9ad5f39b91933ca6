//! # Nemesis Core
//!
//! Recipe graph engine for Project Nemesis.
//!
//! This crate provides the pure decision logic of the crafting tracker:
//! - Recipe entries and the indexed, validated recipe book
//! - Desired-component propagation through the recipe graph
//! - Feasibility filtering of recipes for display
//! - Partial-progress resolution of committed crafting slots
//! - Next-step planning toward a goal recipe
//! - Session state and per-cycle evaluation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod book;
pub mod cycle;
pub mod desired;
pub mod feasibility;
pub mod inventory;
pub mod planner;
pub mod progress;
pub mod recipes;
pub mod session;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::book::*;
    pub use crate::cycle::*;
    pub use crate::desired::*;
    pub use crate::feasibility::*;
    pub use crate::inventory::*;
    pub use crate::planner::*;
    pub use crate::progress::*;
    pub use crate::recipes::*;
    pub use crate::session::*;
}

pub use prelude::*;
