//! Persistent link bookkeeping along one recursion path
//!
//! A `LinkSet` holds every link committed by the current search node and all
//! of its ancestors. Extension is copy-on-extend: the ancestor prefix is
//! structurally shared behind an `Arc`, and sibling branches extending the
//! same parent can never observe each other's additions. That branch
//! isolation is what makes the recursive search safe to fan out across
//! worker threads without locks.

use crate::geometry;
use crate::portal::Link;
use smallvec::SmallVec;
use std::sync::Arc;

/// Branch-local, persistently extended collection of committed links
#[derive(Clone, Debug, Default)]
pub struct LinkSet {
    head: Option<Arc<LinkSetNode>>,
}

#[derive(Debug)]
struct LinkSetNode {
    /// Links committed at this level (one triangle's worth)
    links: SmallVec<[Link; 3]>,
    /// Shared ancestor prefix
    parent: Option<Arc<LinkSetNode>>,
}

impl LinkSet {
    /// The root link set, containing no links
    pub fn empty() -> Self {
        Self { head: None }
    }

    /// A new set containing all links of `self` plus `new_links`.
    ///
    /// `self` is not mutated; the existing chain is shared, not copied.
    pub fn extend(&self, new_links: &[Link]) -> Self {
        if new_links.is_empty() {
            return self.clone();
        }
        Self {
            head: Some(Arc::new(LinkSetNode {
                links: SmallVec::from_slice(new_links),
                parent: self.head.clone(),
            })),
        }
    }

    /// True iff `candidate` properly crosses any link in the set.
    ///
    /// Links sharing an endpoint with the candidate are skipped: meeting at
    /// a portal is not a crossing.
    pub fn would_cross(&self, candidate: &Link) -> bool {
        let (c1, c2) = candidate.coords();
        self.iter().any(|link| {
            if link.shares_endpoint(candidate) {
                return false;
            }
            let (l1, l2) = link.coords();
            geometry::segments_intersect(c1, c2, l1, l2)
        })
    }

    /// Iterate over every link from this node back to the root
    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        LinkSetIter {
            node: self.head.as_deref(),
            offset: 0,
        }
    }

    /// Number of links along the whole chain
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

struct LinkSetIter<'a> {
    node: Option<&'a LinkSetNode>,
    offset: usize,
}

impl<'a> Iterator for LinkSetIter<'a> {
    type Item = &'a Link;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.node?;
            if let Some(link) = node.links.get(self.offset) {
                self.offset += 1;
                return Some(link);
            }
            self.node = node.parent.as_deref();
            self.offset = 0;
        }
    }
}
