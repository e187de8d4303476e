//! `Aggregator`: turns reconstructed trajectories into exposure values.
//!
//! # Per segment
//!
//! | Segment                       | Air                                   | Radiant                     |
//! |-------------------------------|---------------------------------------|-----------------------------|
//! | activity `[s, e)`             | parcel curve over `[s, e)`            | none                        |
//! | outdoor leg                   | Σ link air over its events            | Σ event radiant, `None` if any is `None` |
//! | cabin / transit leg `[s, e)`  | `rate · (e − s)`                      | none                        |
//! | open segment (no end)         | `None`                                | `None`                      |
//!
//! # Per agent
//!
//! Air total is the sum over all activities and legs.  Radiant total is the
//! sum over outdoor legs only, `None` if any of them is `None`.  Both totals
//! are `None` for an aborted or truncated agent, or one with any open
//! segment.

use hx_core::{ExposureClass, ExposureConfig};
use hx_spatial::ThermalIndex;
use hx_trajectory::{Agent, Leg, Population};

use crate::links::{LinkContributions, LinkExposureStore};
use crate::summary::RunSummary;
use crate::{ExposureError, ExposureResult};

pub struct Aggregator<'a> {
    index: &'a ThermalIndex,
    cfg:   &'a ExposureConfig,
}

impl<'a> Aggregator<'a> {
    /// Checks `cfg` before any agent is touched.
    pub fn new(index: &'a ThermalIndex, cfg: &'a ExposureConfig) -> ExposureResult<Self> {
        cfg.validate()?;
        Ok(Self { index, cfg })
    }

    /// A zeroed store sized for this network.
    pub fn link_store(&self) -> LinkExposureStore {
        LinkExposureStore::new(self.index.network().link_count())
    }

    /// Aggregate every agent of `pop`, folding link contributions into
    /// `links`.
    pub fn run(&self, pop: &mut Population, links: &mut LinkExposureStore) -> ExposureResult<RunSummary> {
        let network = self.index.network().link_count();
        if links.len() != network {
            return Err(ExposureError::StoreSize { store: links.len(), network });
        }

        #[cfg(not(feature = "parallel"))]
        {
            for agent in pop.agents_mut() {
                let part = self.aggregate_agent(agent);
                links.merge(&part);
            }
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let parts: Vec<LinkContributions> =
                pop.agents_mut().par_iter_mut().map(|a| self.aggregate_agent(a)).collect();
            for part in &parts {
                links.merge(part);
            }
        }

        let summary = RunSummary::collect(pop, links);
        tracing::info!(
            agents = summary.agents,
            aborted = summary.aborted,
            null_air = summary.null_air,
            null_radiant = summary.null_radiant,
            links = summary.links_touched,
            total_air = summary.total_air,
            "exposure aggregation finished"
        );
        Ok(summary)
    }

    /// Fill all exposure fields of `agent` and return its link additions.
    pub fn aggregate_agent(&self, agent: &mut Agent) -> LinkContributions {
        let mut part = LinkContributions::new();

        for act in &mut agent.activities {
            act.air = act.end.map(|end| self.index.parcel_exposure(act.parcel, act.start, end));
        }
        for leg in &mut agent.legs {
            match leg.class {
                ExposureClass::OutdoorTraveled => self.outdoor_leg(leg, &mut part),
                ExposureClass::VehicleCabin => constant_rate_leg(leg, self.cfg.cabin_rate),
                ExposureClass::Transit => constant_rate_leg(leg, self.cfg.transit_rate),
            }
        }

        if !agent.is_complete() {
            agent.air = None;
            agent.radiant = None;
        } else {
            let acts = agent.activities.iter().map(|a| a.air);
            let legs = agent.legs.iter().map(|l| l.air);
            agent.air = acts.chain(legs).sum::<Option<f64>>();
            agent.radiant = agent
                .legs
                .iter()
                .filter(|l| l.class.is_outdoor())
                .map(|l| l.radiant)
                .sum::<Option<f64>>();
        }
        part
    }

    fn outdoor_leg(&self, leg: &mut Leg, part: &mut LinkContributions) {
        if leg.end.is_none() {
            leg.air = None;
            leg.radiant = None;
            return;
        }
        let mut air = 0.0;
        let mut radiant = Some(0.0);
        for ev in &mut leg.events {
            let e = self.index.link_exposure(ev.link, ev.entry, ev.exit, self.cfg);
            ev.air = Some(e.air);
            ev.radiant = e.radiant;
            part.add(ev.link, e.air, e.radiant);
            air += e.air;
            radiant = radiant.zip(e.radiant).map(|(a, b)| a + b);
        }
        leg.air = Some(air);
        leg.radiant = radiant;
    }
}

fn constant_rate_leg(leg: &mut Leg, rate: f64) {
    leg.air = leg.duration().map(|d| rate * d as f64);
    leg.radiant = None;
}
