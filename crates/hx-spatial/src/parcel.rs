//! Parcels: where stationary activities take place.
//!
//! The event log only says which link an activity is on.  The parcel is
//! resolved from the link: an explicit link → parcel table wins; otherwise
//! the parcel nearest to the link's terminal node is used.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use hx_core::{Coord, CurveId, LinkId, ParcelId};

use crate::network::Network;
use crate::{SpatialError, SpatialResult};

/// A land-use parcel bound to one temperature curve.
#[derive(Clone, Debug, PartialEq)]
pub struct Parcel {
    pub name:  String,
    pub curve: CurveId,
    /// Representative point (centroid); parcels without one are reachable
    /// only through the explicit link table.
    pub coord: Option<Coord>,
}

#[derive(Clone)]
struct ParcelEntry {
    point: [f64; 2],
    id:    ParcelId,
}

impl RTreeObject for ParcelEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for ParcelEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── ParcelStore ───────────────────────────────────────────────────────────────

/// All parcels, their centroid index, and the explicit link table.
pub struct ParcelStore {
    parcels:     Vec<Parcel>,
    by_name:     HashMap<String, ParcelId>,
    link_parcel: HashMap<LinkId, ParcelId>,
    centroids:   RTree<ParcelEntry>,
}

impl ParcelStore {
    #[inline]
    pub fn get(&self, id: ParcelId) -> &Parcel {
        &self.parcels[id.index()]
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    pub fn resolve(&self, name: &str) -> SpatialResult<ParcelId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SpatialError::UnknownParcel(name.to_owned()))
    }

    /// Parcel hosting activities on `link`.
    pub fn parcel_for_link(&self, link: LinkId, network: &Network) -> SpatialResult<ParcelId> {
        if let Some(p) = self.link_parcel.get(&link) {
            return Ok(*p);
        }
        let at = network.link_end_coord(link);
        self.centroids
            .nearest_neighbor(&at.as_array())
            .map(|e| e.id)
            .ok_or_else(|| SpatialError::NoParcelForLink(network.link(link).name.clone()))
    }
}

// ── ParcelStoreBuilder ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ParcelStoreBuilder {
    parcels:     Vec<Parcel>,
    by_name:     HashMap<String, ParcelId>,
    link_parcel: HashMap<LinkId, ParcelId>,
}

impl ParcelStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_parcel(&mut self, parcel: Parcel) -> SpatialResult<ParcelId> {
        if self.by_name.contains_key(&parcel.name) {
            return Err(SpatialError::Duplicate { kind: "parcel", name: parcel.name });
        }
        let id = ParcelId(self.parcels.len() as u32);
        self.by_name.insert(parcel.name.clone(), id);
        self.parcels.push(parcel);
        Ok(id)
    }

    pub fn parcel_id(&self, name: &str) -> Option<ParcelId> {
        self.by_name.get(name).copied()
    }

    /// Pin activities on `link` to `parcel`.  A later call for the same
    /// link replaces the earlier one.
    pub fn assign_link(&mut self, link: LinkId, parcel: ParcelId) {
        self.link_parcel.insert(link, parcel);
    }

    /// Bulk-load the centroid R-tree and produce the store.
    pub fn build(self) -> ParcelStore {
        let entries: Vec<ParcelEntry> = self
            .parcels
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                p.coord.map(|c| ParcelEntry { point: c.as_array(), id: ParcelId(i as u32) })
            })
            .collect();
        ParcelStore {
            parcels:     self.parcels,
            by_name:     self.by_name,
            link_parcel: self.link_parcel,
            centroids:   RTree::bulk_load(entries),
        }
    }
}
