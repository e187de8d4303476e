//! Pass-level counters.

use hx_trajectory::Population;

use crate::links::LinkExposureStore;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub agents:        usize,
    pub aborted:       usize,
    /// Agents excluded during reconstruction for a malformed event sequence.
    pub dropped:       usize,
    pub null_air:      usize,
    pub null_radiant:  usize,
    /// Sum of all defined agent air totals.
    pub total_air:     f64,
    pub links_touched: usize,
}

impl RunSummary {
    pub fn collect(pop: &Population, links: &LinkExposureStore) -> Self {
        let mut s = RunSummary {
            agents: pop.len(),
            dropped: pop.dropped.len(),
            links_touched: links.touched(),
            ..RunSummary::default()
        };
        for a in pop.iter() {
            if a.aborted {
                s.aborted += 1;
            }
            match a.air {
                Some(v) => s.total_air += v,
                None => s.null_air += 1,
            }
            if a.radiant.is_none() {
                s.null_radiant += 1;
            }
        }
        s
    }
}
