//! multicf - Exhaustive enumeration of nested control fields
//!
//! This library groups a set of geographic points ("portals") into nested
//! triangular regions called control fields: triples of portals connected by
//! three links, optionally containing smaller control fields built recursively
//! from portals strictly inside the enclosing triangle. The search enumerates
//! a maximal, non-self-crossing hierarchy of such nested triangles up to a
//! configurable depth bound.
//!
//! # Architecture
//!
//! - **[`Portal`]**: Immutable storage for a named geographic point
//! - **[`Quadtree`]**: Spatial index built once over all portals, read-only afterwards
//! - **[`LinkSet`]**: Persistent, branch-local collection of committed links
//! - **[`builder`]**: Recursive per-level triangle enumeration with pruning
//! - **[`build_forest`]**: Parallel top-level dispatch and forest merge
//!
//! # Performance Characteristics
//!
//! - **Index build**: O(N log N) for N portals
//! - **Range query**: O(log N + K) where K=results
//! - **Search**: bounded by C(|candidates|, 3) per level, hard-capped at
//!   `max_depth` levels; degenerate and crossing triangles are pruned before
//!   the range query runs

pub mod builder;
mod dispatch;
mod field;
pub mod geometry;
mod linkset;
mod loader;
mod portal;
mod quadtree;

// Public API exports
pub use dispatch::{Config, SearchOutcome, WorkerFailure, build_forest, build_forest_with_cancel};
pub use field::ControlField;
pub use linkset::LinkSet;
pub use loader::load_portals_from_csv;
pub use portal::{Link, Portal, PortalId};
pub use quadtree::Quadtree;

/// Error types for the control field search
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FieldError>;
