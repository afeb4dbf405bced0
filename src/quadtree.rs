//! Quadtree spatial index over portal coordinates
//!
//! The tree is built once before the search starts and is read-only
//! afterwards, so any number of worker threads may query it concurrently
//! without synchronization. Coordinates are planar (x = longitude,
//! y = latitude) and queries are closed axis-aligned boxes.

use crate::Portal;
use geo::{Coord, Rect};

/// Maximum depth of the quadtree to prevent infinite recursion
/// (duplicate coordinates can never split apart)
const MAX_DEPTH: u32 = 16;

/// Number of points a node holds before subdividing
const NODE_CAPACITY: usize = 8;

/// Static spatial index answering closed-box range queries
#[derive(Debug, Clone)]
pub struct Quadtree {
    root: QuadtreeNode,
    len: usize,
}

/// A single node in the quadtree
#[derive(Debug, Clone)]
struct QuadtreeNode {
    /// Bounding box in planar degrees
    bounding_box: Rect<f64>,
    /// Depth level in the tree (0 = root)
    level: u32,
    /// Portal indices with their coordinates, stored at this node
    items: Vec<(u32, Coord<f64>)>,
    /// Child nodes (NW, NE, SW, SE) if subdivided
    children: Option<Box<[QuadtreeNode; 4]>>,
}

impl Quadtree {
    /// Build the index over all portals; O(n log n).
    ///
    /// Portals with identical coordinates are kept in insertion order, which
    /// makes queries deterministic for duplicated input.
    pub fn build(portals: &[Portal]) -> Self {
        #[cfg(feature = "profiling")]
        profiling::scope!("quadtree::build");

        let bounding_box = bounding_box_of(portals);
        let mut root = QuadtreeNode::new(bounding_box, 0);
        for (i, portal) in portals.iter().enumerate() {
            root.insert(i as u32, portal.coord());
        }

        tracing::debug!(portals = portals.len(), "spatial index built");
        Self {
            root,
            len: portals.len(),
        }
    }

    /// Indices of all portals whose coordinates fall within the closed box;
    /// O(log n + k). Results are in deterministic tree order.
    pub fn range_query(&self, query: Rect<f64>) -> Vec<u32> {
        let mut results = Vec::new();
        self.root.query(query, &mut results);
        results
    }

    /// Number of indexed portals
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl QuadtreeNode {
    fn new(bounding_box: Rect<f64>, level: u32) -> Self {
        Self {
            bounding_box,
            level,
            items: Vec::new(),
            children: None,
        }
    }

    fn insert(&mut self, index: u32, coord: Coord<f64>) {
        if self.children.is_some() {
            let quadrant = self.bounding_box_quadrant(coord);
            let children = self.children.as_mut().unwrap();
            children[quadrant].insert(index, coord);
            return;
        }

        self.items.push((index, coord));

        if self.items.len() > NODE_CAPACITY && self.level < MAX_DEPTH {
            self.subdivide();
        }
    }

    /// Split this node into 4 children and redistribute its items
    fn subdivide(&mut self) {
        let min = self.bounding_box.min();
        let max = self.bounding_box.max();
        let mid_x = (min.x + max.x) / 2.0;
        let mid_y = (min.y + max.y) / 2.0;

        let child_level = self.level + 1;

        // NW, NE, SW, SE
        let nw = QuadtreeNode::new(
            Rect::new(Coord { x: min.x, y: mid_y }, Coord { x: mid_x, y: max.y }),
            child_level,
        );
        let ne = QuadtreeNode::new(
            Rect::new(Coord { x: mid_x, y: mid_y }, Coord { x: max.x, y: max.y }),
            child_level,
        );
        let sw = QuadtreeNode::new(
            Rect::new(Coord { x: min.x, y: min.y }, Coord { x: mid_x, y: mid_y }),
            child_level,
        );
        let se = QuadtreeNode::new(
            Rect::new(Coord { x: mid_x, y: min.y }, Coord { x: max.x, y: mid_y }),
            child_level,
        );

        let mut children = Box::new([nw, ne, sw, se]);
        for (index, coord) in self.items.drain(..) {
            let quadrant = quadrant_of(coord, mid_x, mid_y);
            children[quadrant].insert(index, coord);
        }
        self.children = Some(children);
    }

    /// Quadrant index of a coordinate relative to this node's midpoint
    fn bounding_box_quadrant(&self, coord: Coord<f64>) -> usize {
        let min = self.bounding_box.min();
        let max = self.bounding_box.max();
        quadrant_of(coord, (min.x + max.x) / 2.0, (min.y + max.y) / 2.0)
    }

    fn query(&self, query: Rect<f64>, results: &mut Vec<u32>) {
        if !rects_intersect(self.bounding_box, query) {
            return;
        }

        let qmin = query.min();
        let qmax = query.max();
        for &(index, coord) in &self.items {
            if coord.x >= qmin.x && coord.x <= qmax.x && coord.y >= qmin.y && coord.y <= qmax.y {
                results.push(index);
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query(query, results);
            }
        }
    }
}

/// Map a coordinate to a quadrant (NW, NE, SW, SE) around a midpoint.
///
/// The comparison is total, so every coordinate within the parent lands in
/// exactly one child even when it sits on a subdivision line.
#[inline]
fn quadrant_of(coord: Coord<f64>, mid_x: f64, mid_y: f64) -> usize {
    match (coord.x >= mid_x, coord.y >= mid_y) {
        (false, true) => 0,  // NW
        (true, true) => 1,   // NE
        (false, false) => 2, // SW
        (true, false) => 3,  // SE
    }
}

#[inline]
fn rects_intersect(a: Rect<f64>, b: Rect<f64>) -> bool {
    !(a.max().x < b.min().x
        || a.min().x > b.max().x
        || a.max().y < b.min().y
        || a.min().y > b.max().y)
}

/// Closed bounding box over all portal coordinates
fn bounding_box_of(portals: &[Portal]) -> Rect<f64> {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for portal in portals {
        let c = portal.coord();
        min_x = min_x.min(c.x);
        min_y = min_y.min(c.y);
        max_x = max_x.max(c.x);
        max_y = max_y.max(c.y);
    }

    if portals.is_empty() {
        return Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.0 });
    }

    Rect::new(
        Coord { x: min_x, y: min_y },
        Coord { x: max_x, y: max_y },
    )
}
