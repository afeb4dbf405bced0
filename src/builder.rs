//! Recursive control field construction
//!
//! [`FieldBuilder`] evaluates candidate triangles level by level: degenerate
//! and link-crossing triples are pruned before the spatial index is consulted,
//! the index narrows interior candidates to the triangle's bounding box, and
//! the exact strict interior test decides membership. Surviving triangles
//! become [`ControlField`] nodes and recursion continues on their interior
//! portals with a persistently extended [`LinkSet`].

use crate::geometry;
use crate::portal::Link;
use crate::{ControlField, LinkSet, Portal, Quadtree};
use geo::{Coord, Rect};
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-search state shared by all recursion levels of one branch.
///
/// Holds only read-only references; a single builder can therefore be used
/// from any number of worker threads at once.
pub struct FieldBuilder<'a> {
    portals: &'a [Portal],
    index: &'a Quadtree,
    max_depth: u32,
    cancel: &'a AtomicBool,
}

/// Outcome of the cheap triangle filters plus the interior query
struct TriangleEval {
    links: [Link; 3],
    interior: Vec<u32>,
}

impl<'a> FieldBuilder<'a> {
    pub fn new(
        portals: &'a [Portal],
        index: &'a Quadtree,
        max_depth: u32,
        cancel: &'a AtomicBool,
    ) -> Self {
        Self {
            portals,
            index,
            max_depth,
            cancel,
        }
    }

    /// Evaluate one top-level triangle and build its whole branch.
    ///
    /// Top-level fields start at depth 1 with an empty link set. A top-level
    /// triangle that encloses no portal at all is not a multi-layer field and
    /// produces nothing.
    pub fn build_root(&self, combo: [u32; 3]) -> Option<ControlField> {
        let inherited = LinkSet::empty();
        let eval = self.evaluate_triangle(combo, &inherited)?;
        if eval.interior.is_empty() {
            return None;
        }

        let children = if self.max_depth > 1 {
            self.build_level(&eval.interior, &inherited.extend(&eval.links), 2)
        } else {
            Vec::new()
        };

        Some(ControlField::new(self.vertex_ids(combo), 1, children))
    }

    /// Enumerate all 3-combinations of `candidates` at `depth` and return the
    /// resulting sibling fields.
    ///
    /// Every sibling extends the same inherited link set independently;
    /// siblings never see each other's links.
    pub fn build_level(&self, candidates: &[u32], inherited: &LinkSet, depth: u32) -> Vec<ControlField> {
        let mut fields = Vec::new();
        let n = candidates.len();

        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    if self.cancel.load(Ordering::Relaxed) {
                        // Abort: keep what was already built, spawn nothing new
                        return fields;
                    }

                    let combo = [candidates[i], candidates[j], candidates[k]];
                    let Some(eval) = self.evaluate_triangle(combo, inherited) else {
                        continue;
                    };

                    let children = if !eval.interior.is_empty() && depth < self.max_depth {
                        self.build_level(&eval.interior, &inherited.extend(&eval.links), depth + 1)
                    } else {
                        Vec::new()
                    };

                    fields.push(ControlField::new(self.vertex_ids(combo), depth, children));
                }
            }
        }

        fields
    }

    /// Run the pruning filters and the interior query for one triple.
    ///
    /// Returns `None` when the triangle is degenerate or any of its links
    /// would cross an inherited link; those triples contribute nothing at any
    /// depth. The pruning order matters: both filters are cheap compared to
    /// the range query.
    fn evaluate_triangle(&self, combo: [u32; 3], inherited: &LinkSet) -> Option<TriangleEval> {
        let [p1, p2, p3] = combo.map(|i| &self.portals[i as usize]);
        let (a, b, c) = (p1.coord(), p2.coord(), p3.coord());

        if geometry::is_degenerate(a, b, c) {
            return None;
        }

        let links = [Link::new(p1, p2), Link::new(p2, p3), Link::new(p3, p1)];
        if links.iter().any(|link| inherited.would_cross(link)) {
            return None;
        }

        Some(TriangleEval {
            links,
            interior: self.interior_portals(combo, a, b, c),
        })
    }

    /// Portals strictly inside the triangle, excluding its own vertices
    fn interior_portals(&self, combo: [u32; 3], a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> Vec<u32> {
        let bbox = Rect::new(
            Coord {
                x: a.x.min(b.x).min(c.x),
                y: a.y.min(b.y).min(c.y),
            },
            Coord {
                x: a.x.max(b.x).max(c.x),
                y: a.y.max(b.y).max(c.y),
            },
        );

        self.index
            .range_query(bbox)
            .into_iter()
            .filter(|&i| !combo.contains(&i))
            .filter(|&i| geometry::point_in_triangle(self.portals[i as usize].coord(), a, b, c))
            .collect()
    }

    #[inline]
    fn vertex_ids(&self, combo: [u32; 3]) -> [crate::PortalId; 3] {
        combo.map(|i| self.portals[i as usize].id)
    }
}
