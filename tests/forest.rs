//! End-to-end invariants of the control field forest
//!
//! These tests build forests over small portal clouds through the public API
//! and verify the structural guarantees: no pair of committed links along any
//! root-to-node path properly crosses, children are strictly inside their
//! parent, and depths stay within the configured bound.

use geo::Coord;
use multicf::{Config, ControlField, Portal, build_forest, geometry};
use std::collections::HashMap;

/// Points from the (x, y) plane, stored as (lon = x, lat = y)
fn portal_xy(id: u32, x: f64, y: f64) -> Portal {
    Portal::new(id, format!("p{id}"), y, x)
}

fn coord_map(portals: &[Portal]) -> HashMap<u32, Coord<f64>> {
    portals.iter().map(|p| (p.id, p.coord())).collect()
}

/// Reproducible irregular portal cloud with no exact duplicates
fn portal_cloud(n: u32) -> Vec<Portal> {
    (0..n)
        .map(|i| {
            let x = ((i as f64 * 37.0) % 11.0) + (i as f64 * 0.013);
            let y = ((i as f64 * 53.0) % 13.0) + (i as f64 * 0.007);
            portal_xy(i, x, y)
        })
        .collect()
}

fn triangle_edges(field: &ControlField) -> [(u32, u32); 3] {
    let [a, b, c] = field.vertex_ids;
    [(a, b), (b, c), (c, a)]
}

/// Walk one root, checking link crossings against ancestors, containment in
/// the parent, and the depth bound.
fn check_subtree(
    field: &ControlField,
    parent: Option<&ControlField>,
    ancestor_edges: &[(u32, u32)],
    coords: &HashMap<u32, Coord<f64>>,
    max_depth: u32,
) {
    assert!(field.depth >= 1 && field.depth <= max_depth, "depth bound violated");
    match parent {
        Some(parent) => assert_eq!(field.depth, parent.depth + 1),
        None => assert_eq!(field.depth, 1),
    }

    // Containment: all 3 vertices strictly inside the parent triangle
    if let Some(parent) = parent {
        let [pa, pb, pc] = parent.vertex_ids.map(|id| coords[&id]);
        for id in field.vertex_ids {
            assert!(
                geometry::point_in_triangle(coords[&id], pa, pb, pc),
                "vertex {id} not strictly inside parent {:?}",
                parent.vertex_ids
            );
        }
    }

    // Non-crossing: own edges against every ancestor edge
    let own = triangle_edges(field);
    for &(a1, a2) in ancestor_edges {
        for &(b1, b2) in &own {
            if a1 == b1 || a1 == b2 || a2 == b1 || a2 == b2 {
                continue; // sharing a portal is not a crossing
            }
            assert!(
                !geometry::segments_intersect(coords[&a1], coords[&a2], coords[&b1], coords[&b2]),
                "edge ({b1},{b2}) crosses ancestor edge ({a1},{a2})"
            );
        }
    }

    let mut extended: Vec<(u32, u32)> = ancestor_edges.to_vec();
    extended.extend_from_slice(&own);
    for child in &field.children {
        check_subtree(child, Some(field), &extended, coords, max_depth);
    }
}

#[test]
fn forest_invariants_hold_on_irregular_cloud() {
    let portals = portal_cloud(15);
    let coords = coord_map(&portals);
    let config = Config { max_depth: 3 };

    let outcome = build_forest(&portals, &config).unwrap();
    assert!(!outcome.cancelled);
    assert!(!outcome.fields.is_empty());

    for root in &outcome.fields {
        check_subtree(root, None, &[], &coords, config.max_depth);
    }
}

#[test]
fn deep_nesting_respects_depth_bound() {
    // Concentric triangles: each one strictly inside the previous
    let mut portals = Vec::new();
    let mut id = 0;
    for ring in 0..4 {
        let s = 100.0 / 3.0_f64.powi(ring);
        let cx = 40.0;
        let cy = 30.0;
        portals.push(portal_xy(id, cx - s, cy - s * 0.8));
        portals.push(portal_xy(id + 1, cx + s, cy - s * 0.8));
        portals.push(portal_xy(id + 2, cx, cy + s));
        id += 3;
    }

    for max_depth in [1, 2, 4] {
        let outcome = build_forest(&portals, &Config { max_depth }).unwrap();
        let coords = coord_map(&portals);
        for root in &outcome.fields {
            check_subtree(root, None, &[], &coords, max_depth);
        }
        let deepest = outcome
            .fields
            .iter()
            .map(ControlField::max_depth)
            .max()
            .unwrap();
        assert!(deepest <= max_depth);
        if max_depth >= 2 {
            // The concentric layout must actually nest
            assert!(deepest >= 2, "expected nesting at max_depth {max_depth}");
        }
    }
}

#[test]
fn collinear_triples_never_appear() {
    // A collinear triple embedded in an otherwise valid cloud
    let mut portals = portal_cloud(8);
    let base = portals.len() as u32;
    portals.push(portal_xy(base, 20.0, 20.0));
    portals.push(portal_xy(base + 1, 21.0, 21.0));
    portals.push(portal_xy(base + 2, 22.0, 22.0));

    let outcome = build_forest(&portals, &Config { max_depth: 3 }).unwrap();

    fn walk(field: &ControlField, banned: [u32; 3]) {
        assert_ne!(field.sorted_vertex_ids(), banned);
        for child in &field.children {
            walk(child, banned);
        }
    }
    for root in &outcome.fields {
        walk(root, [base, base + 1, base + 2]);
    }
}

#[test]
fn repeated_runs_agree_as_sets() {
    let portals = portal_cloud(13);
    let config = Config { max_depth: 4 };

    fn field_set(fields: &[ControlField]) -> Vec<([u32; 3], u32)> {
        fn walk(field: &ControlField, out: &mut Vec<([u32; 3], u32)>) {
            out.push((field.sorted_vertex_ids(), field.depth));
            field.children.iter().for_each(|c| walk(c, out));
        }
        let mut out = Vec::new();
        fields.iter().for_each(|f| walk(f, &mut out));
        out.sort_unstable();
        out
    }

    let a = field_set(&build_forest(&portals, &config).unwrap().fields);
    let b = field_set(&build_forest(&portals, &config).unwrap().fields);
    assert_eq!(a, b);
}
