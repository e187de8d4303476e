//! Node → temperature-curve spatial join.
//!
//! Temperature data comes as one curve per grid cell or weather site.  Each
//! node is assigned a curve by, in order:
//!
//! 1. its zone, if the zone has an explicit mapping;
//! 2. the nearest site (R-tree nearest neighbour), i.e. the Voronoi cell the
//!    node falls in.
//!
//! A node matching neither stays unassigned.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use hx_core::{Coord, CurveId};

// ── R-tree site entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a site position with its curve.
#[derive(Clone)]
struct SiteEntry {
    point: [f64; 2],
    curve: CurveId,
}

impl RTreeObject for SiteEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for SiteEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── SpatialJoin ───────────────────────────────────────────────────────────────

/// Zone mappings plus a site index.  Add inputs, then call
/// [`build`](Self::build) to bulk-load the R-tree.
#[derive(Default)]
pub struct SpatialJoin {
    zones:   HashMap<String, CurveId>,
    pending: Vec<SiteEntry>,
    sites:   RTree<SiteEntry>,
}

impl SpatialJoin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every node in `zone` to `curve`.
    pub fn add_zone(&mut self, zone: impl Into<String>, curve: CurveId) {
        self.zones.insert(zone.into(), curve);
    }

    /// Register a temperature site at `at`.
    pub fn add_site(&mut self, at: Coord, curve: CurveId) {
        self.pending.push(SiteEntry { point: at.as_array(), curve });
    }

    /// Bulk-load pending sites into the R-tree.
    pub fn build(mut self) -> Self {
        let mut entries: Vec<SiteEntry> = std::mem::take(&mut self.pending);
        entries.extend(self.sites.iter().cloned());
        self.sites = RTree::bulk_load(entries);
        self
    }

    pub fn site_count(&self) -> usize {
        self.sites.size()
    }

    /// Curve for a node at `coord` in `zone`.
    pub fn curve_for(&self, coord: Coord, zone: Option<&str>) -> Option<CurveId> {
        if let Some(c) = zone.and_then(|z| self.zones.get(z)) {
            return Some(*c);
        }
        self.sites
            .nearest_neighbor(&coord.as_array())
            .map(|e| e.curve)
    }
}
