//! Portal storage and link identity
//!
//! Portals are created once at load time and never mutated. Identity is by
//! `id`; coordinates are interpreted as planar `(x = longitude, y = latitude)`
//! for all geometric predicates.

use geo::Coord;
use serde::{Deserialize, Serialize};

/// Stable identifier of a portal, unique within one input set
pub type PortalId = u32;

/// A named geographic point
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Portal {
    pub id: PortalId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Portal {
    pub fn new(id: PortalId, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Planar coordinate of this portal (x = longitude, y = latitude)
    #[inline]
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

/// An unordered pair of two distinct portals, carrying endpoint coordinates
/// so crossing tests need no lookup back into the portal set.
///
/// Equality and hashing consider only the canonical id pair, so
/// `Link::new(a, b) == Link::new(b, a)`.
#[derive(Clone, Copy, Debug)]
pub struct Link {
    a: PortalId,
    b: PortalId,
    a_coord: Coord<f64>,
    b_coord: Coord<f64>,
}

impl Link {
    /// Create a link between two portals, canonicalized so `a.id < b.id`
    pub fn new(p: &Portal, q: &Portal) -> Self {
        debug_assert_ne!(p.id, q.id, "link endpoints must be distinct portals");
        if p.id <= q.id {
            Self {
                a: p.id,
                b: q.id,
                a_coord: p.coord(),
                b_coord: q.coord(),
            }
        } else {
            Self {
                a: q.id,
                b: p.id,
                a_coord: q.coord(),
                b_coord: p.coord(),
            }
        }
    }

    #[inline]
    pub fn endpoints(&self) -> (PortalId, PortalId) {
        (self.a, self.b)
    }

    #[inline]
    pub fn coords(&self) -> (Coord<f64>, Coord<f64>) {
        (self.a_coord, self.b_coord)
    }

    /// Whether this link shares an endpoint with `other`
    #[inline]
    pub fn shares_endpoint(&self, other: &Link) -> bool {
        self.a == other.a || self.a == other.b || self.b == other.a || self.b == other.b
    }

    /// Whether `id` is one of this link's endpoints
    #[inline]
    pub fn touches(&self, id: PortalId) -> bool {
        self.a == id || self.b == id
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.a == other.a && self.b == other.b
    }
}

impl Eq for Link {}

impl std::hash::Hash for Link {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.a.hash(state);
        self.b.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portal(id: PortalId, lat: f64, lon: f64) -> Portal {
        Portal::new(id, format!("p{id}"), lat, lon)
    }

    #[test]
    fn test_coord_axes() {
        let p = portal(0, 51.5, -0.12);
        assert_eq!(p.coord().x, -0.12);
        assert_eq!(p.coord().y, 51.5);
    }

    #[test]
    fn test_link_equality_is_symmetric() {
        let p = portal(3, 0.0, 0.0);
        let q = portal(7, 1.0, 1.0);
        assert_eq!(Link::new(&p, &q), Link::new(&q, &p));
        assert_eq!(Link::new(&p, &q).endpoints(), (3, 7));
    }

    #[test]
    fn test_link_canonical_coords_follow_ids() {
        let p = portal(9, 2.0, 3.0);
        let q = portal(1, 5.0, 6.0);
        let link = Link::new(&p, &q);
        let (a, b) = link.coords();
        // Endpoint coordinates stay attached to the canonicalized id order
        assert_eq!(a, q.coord());
        assert_eq!(b, p.coord());
    }

    #[test]
    fn test_shares_endpoint() {
        let p = portal(0, 0.0, 0.0);
        let q = portal(1, 1.0, 0.0);
        let r = portal(2, 0.0, 1.0);
        let s = portal(3, 1.0, 1.0);

        assert!(Link::new(&p, &q).shares_endpoint(&Link::new(&q, &r)));
        assert!(!Link::new(&p, &q).shares_endpoint(&Link::new(&r, &s)));
        assert!(Link::new(&p, &q).touches(0));
        assert!(!Link::new(&p, &q).touches(2));
    }
}
