//! Control field tree nodes
//!
//! A control field is a triangle of three portals at a given nesting depth,
//! optionally containing smaller control fields built from portals strictly
//! inside it. Root fields form a forest; nodes are created during the search
//! and never mutated after being handed to their parent.

use crate::PortalId;
use serde::Serialize;

/// One triangular field in the nesting hierarchy
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlField {
    /// Ids of the 3 portals spanning this field
    pub vertex_ids: [PortalId; 3],
    /// Nesting depth, 1 for top-level fields
    pub depth: u32,
    /// Fields nested strictly inside this one, at depth + 1
    pub children: Vec<ControlField>,
}

impl ControlField {
    pub fn new(vertex_ids: [PortalId; 3], depth: u32, children: Vec<ControlField>) -> Self {
        Self {
            vertex_ids,
            depth,
            children,
        }
    }

    /// A field with nothing nested inside it
    pub fn leaf(vertex_ids: [PortalId; 3], depth: u32) -> Self {
        Self::new(vertex_ids, depth, Vec::new())
    }

    /// Whether this field contains no nested fields
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Vertex ids sorted ascending, the canonical identity of the triangle
    pub fn sorted_vertex_ids(&self) -> [PortalId; 3] {
        let mut ids = self.vertex_ids;
        ids.sort_unstable();
        ids
    }

    /// Total number of fields in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(ControlField::subtree_len).sum::<usize>()
    }

    /// Deepest depth reached within this subtree
    pub fn max_depth(&self) -> u32 {
        self.children
            .iter()
            .map(ControlField::max_depth)
            .max()
            .unwrap_or(self.depth)
    }
}
