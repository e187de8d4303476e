//! Network-wide exposure totals per link.
//!
//! Workers never write the store directly.  Each agent's aggregation fills
//! its own [`LinkContributions`]; one writer folds those into the
//! [`LinkExposureStore`] afterwards, in agent order.

use hx_core::LinkId;

#[cfg(feature = "fx-hash")]
type LinkMap<V> = rustc_hash::FxHashMap<LinkId, V>;
#[cfg(not(feature = "fx-hash"))]
type LinkMap<V> = std::collections::HashMap<LinkId, V>;

/// Accumulated exposure on one link.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LinkTotals {
    pub air:        f64,
    /// `None` until some traversal produced a defined radiant value.
    pub radiant:    Option<f64>,
    pub traversals: u64,
}

impl LinkTotals {
    /// Record one traversal.
    pub fn add(&mut self, air: f64, radiant: Option<f64>) {
        self.air += air;
        if let Some(r) = radiant {
            self.radiant = Some(self.radiant.unwrap_or(0.0) + r);
        }
        self.traversals += 1;
    }

    fn absorb(&mut self, other: &LinkTotals) {
        self.air += other.air;
        if let Some(r) = other.radiant {
            self.radiant = Some(self.radiant.unwrap_or(0.0) + r);
        }
        self.traversals += other.traversals;
    }
}

// ── LinkContributions ─────────────────────────────────────────────────────────

/// One agent's additions to the link totals.
#[derive(Clone, Debug, Default)]
pub struct LinkContributions {
    map: LinkMap<LinkTotals>,
}

impl LinkContributions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, link: LinkId, air: f64, radiant: Option<f64>) {
        self.map.entry(link).or_default().add(air, radiant);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, link: LinkId) -> Option<&LinkTotals> {
        self.map.get(&link)
    }
}

// ── LinkExposureStore ─────────────────────────────────────────────────────────

/// Dense per-link totals, indexed by `LinkId`.
#[derive(Clone, Debug)]
pub struct LinkExposureStore {
    totals: Vec<LinkTotals>,
}

impl LinkExposureStore {
    pub fn new(link_count: usize) -> Self {
        Self { totals: vec![LinkTotals::default(); link_count] }
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    #[inline]
    pub fn get(&self, link: LinkId) -> &LinkTotals {
        &self.totals[link.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (LinkId, &LinkTotals)> {
        self.totals.iter().enumerate().map(|(i, t)| (LinkId(i as u32), t))
    }

    /// Links traversed at least once.
    pub fn touched(&self) -> usize {
        self.totals.iter().filter(|t| t.traversals > 0).count()
    }

    /// Fold one agent's contributions in.  Links are visited in id order so
    /// the result does not depend on hash iteration order.
    pub fn merge(&mut self, part: &LinkContributions) {
        let mut links: Vec<(&LinkId, &LinkTotals)> = part.map.iter().collect();
        links.sort_unstable_by_key(|(l, _)| **l);
        for (link, t) in links {
            self.totals[link.index()].absorb(t);
        }
    }
}
