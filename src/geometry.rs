//! Pure geometric predicates for the control field search
//!
//! All functions are deterministic, side-effect free and reentrant. They
//! operate on planar coordinates (x = longitude, y = latitude); at control
//! field scales the planar approximation is the same one every field planning
//! tool uses.

use geo::Coord;

/// Tolerance below which a cross product counts as zero (collinear)
pub const EPSILON: f64 = 1e-10;

/// Sign source for all other predicates: the 2D cross product of
/// `(b - a)` and `(c - a)`.
///
/// Positive means `c` lies to the left of the directed line `a -> b`,
/// negative to the right, and magnitudes within [`EPSILON`] mean collinear.
#[inline]
pub fn orientation(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Whether the triangle `(a, b, c)` is degenerate, i.e. its points are
/// collinear within tolerance. Degenerate triangles are always skipped by
/// the search, never emitted, never recursed into.
#[inline]
pub fn is_degenerate(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> bool {
    orientation(a, b, c).abs() <= EPSILON
}

/// Strict interior test: true iff `p` lies strictly inside triangle
/// `(a, b, c)`.
///
/// The three orientation tests must agree in sign and must all be non-zero,
/// so points exactly on an edge (or on a vertex) are deterministically
/// excluded.
pub fn point_in_triangle(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> bool {
    let d1 = orientation(a, b, p);
    let d2 = orientation(b, c, p);
    let d3 = orientation(c, a, p);

    let all_pos = d1 > EPSILON && d2 > EPSILON && d3 > EPSILON;
    let all_neg = d1 < -EPSILON && d2 < -EPSILON && d3 < -EPSILON;
    all_pos || all_neg
}

/// Proper crossing test: true iff the open segments `(p1, p2)` and
/// `(p3, p4)` strictly cross.
///
/// Segments that merely touch at an endpoint do not cross, and collinear or
/// overlapping segments return false, matching the degenerate-skip policy of
/// the rest of the search.
pub fn segments_intersect(
    p1: Coord<f64>,
    p2: Coord<f64>,
    p3: Coord<f64>,
    p4: Coord<f64>,
) -> bool {
    let d1 = orientation(p3, p4, p1);
    let d2 = orientation(p3, p4, p2);
    let d3 = orientation(p1, p2, p3);
    let d4 = orientation(p1, p2, p4);

    let straddles_34 = (d1 > EPSILON && d2 < -EPSILON) || (d1 < -EPSILON && d2 > EPSILON);
    let straddles_12 = (d3 > EPSILON && d4 < -EPSILON) || (d3 < -EPSILON && d4 > EPSILON);
    straddles_34 && straddles_12
}
