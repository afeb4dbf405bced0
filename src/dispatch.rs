//! Parallel top-level dispatch for the control field search
//!
//! The top-level 3-combination space is partitioned across the rayon worker
//! pool by first vertex. Every worker reads the shared spatial index (built
//! once, never mutated) and owns its own link set chain, so no locking is
//! needed anywhere in the search. A panic inside one branch is caught at the
//! worker boundary and reported alongside the results of all other branches.

use crate::builder::FieldBuilder;
use crate::{ControlField, FieldError, Portal, PortalId, Quadtree, Result};
use rayon::prelude::*;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};

/// Search configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum nesting depth (multiplicity) of the field hierarchy.
    /// Depth 1 is a plain field with nothing nested inside it.
    pub max_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_depth: 4 }
    }
}

/// An isolated failure inside one top-level branch.
///
/// Carries the triangle that seeded the branch so the failure can be
/// reproduced; it never cancels sibling branches.
#[derive(Debug, Clone)]
pub struct WorkerFailure {
    /// Vertex ids of the top-level triangle whose branch failed
    pub vertex_ids: [PortalId; 3],
    /// Panic payload, stringified
    pub message: String,
}

/// Result of one full search run
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Top-level control fields; order across workers is unspecified,
    /// content is deterministic as a set
    pub fields: Vec<ControlField>,
    /// Branches that failed in isolation
    pub failures: Vec<WorkerFailure>,
    /// Whether the abort signal was observed; already-built fields are kept
    pub cancelled: bool,
}

impl SearchOutcome {
    /// Total number of fields across the whole forest
    pub fn total_fields(&self) -> usize {
        self.fields.iter().map(ControlField::subtree_len).sum()
    }
}

/// Build the control field forest over `portals` up to `config.max_depth`.
///
/// Fails fast with [`FieldError::InvalidInput`] when fewer than 3 portals are
/// supplied or the depth bound is zero; no partial computation is attempted
/// in that case.
pub fn build_forest(portals: &[Portal], config: &Config) -> Result<SearchOutcome> {
    let cancel = AtomicBool::new(false);
    build_forest_with_cancel(portals, config, &cancel)
}

/// Like [`build_forest`], honoring a global abort signal.
///
/// When `cancel` becomes true, in-flight workers stop spawning new branches
/// and return their partially built results; already-computed fields are not
/// discarded. The outcome carries `cancelled = true`.
pub fn build_forest_with_cancel(
    portals: &[Portal],
    config: &Config,
    cancel: &AtomicBool,
) -> Result<SearchOutcome> {
    #[cfg(feature = "profiling")]
    profiling::scope!("dispatch::build_forest");

    if portals.len() < 3 {
        return Err(FieldError::InvalidInput {
            reason: format!("need at least 3 portals, got {}", portals.len()),
        });
    }
    if config.max_depth < 1 {
        return Err(FieldError::InvalidInput {
            reason: "max_depth must be at least 1".to_string(),
        });
    }

    tracing::info!(
        portals = portals.len(),
        max_depth = config.max_depth,
        "starting control field search"
    );

    let index = Quadtree::build(portals);
    let n = portals.len();

    // One task per first vertex; each task walks its share of the top-level
    // 3-combinations sequentially.
    let per_task: Vec<(Vec<ControlField>, Vec<WorkerFailure>)> = (0..n)
        .into_par_iter()
        .map(|i| {
            let builder = FieldBuilder::new(portals, &index, config.max_depth, cancel);
            let mut fields = Vec::new();
            let mut failures = Vec::new();

            'combos: for j in (i + 1)..n {
                for k in (j + 1)..n {
                    if cancel.load(Ordering::Relaxed) {
                        break 'combos;
                    }

                    let combo = [i as u32, j as u32, k as u32];
                    let seed_ids = combo.map(|x| portals[x as usize].id);
                    match catch_branch(seed_ids, || builder.build_root(combo)) {
                        Ok(Some(field)) => fields.push(field),
                        Ok(None) => {}
                        Err(failure) => failures.push(failure),
                    }
                }
            }

            (fields, failures)
        })
        .collect();

    let mut outcome = SearchOutcome::default();
    for (fields, failures) in per_task {
        outcome.fields.extend(fields);
        outcome.failures.extend(failures);
    }
    outcome.cancelled = cancel.load(Ordering::Relaxed);

    if outcome.cancelled {
        tracing::warn!(
            roots = outcome.fields.len(),
            "search cancelled, returning partial forest"
        );
    } else {
        tracing::info!(
            roots = outcome.fields.len(),
            total = outcome.total_fields(),
            failures = outcome.failures.len(),
            "control field search finished"
        );
    }

    Ok(outcome)
}

/// Run one top-level branch, converting a panic into a [`WorkerFailure`]
fn catch_branch(
    vertex_ids: [PortalId; 3],
    f: impl FnOnce() -> Option<ControlField>,
) -> std::result::Result<Option<ControlField>, WorkerFailure> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        tracing::warn!(?vertex_ids, %message, "branch failed, continuing with siblings");
        WorkerFailure {
            vertex_ids,
            message,
        }
    })
}
