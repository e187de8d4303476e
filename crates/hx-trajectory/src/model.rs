//! Reconstructed trajectories: `Agent`, `Activity`, `Leg`, `Event`.
//!
//! An agent's activities and legs interleave in time:
//!
//! ```text
//! activity[0], leg[0], activity[1], leg[1], …, activity[n]
//! ```
//!
//! Segment ends are `Option<i64>`: `None` marks a segment the log never
//! closed (aborted plan or truncated log).  Exposure fields start as `None`
//! and are filled by the aggregator; a value that stays `None` afterwards is
//! undefined, which is distinct from zero.

use std::collections::HashMap;

use hx_core::{AgentId, ExposureClass, LinkId, ParcelId, TravelMode};

// ── Event ─────────────────────────────────────────────────────────────────────

/// Time spent on one link of a traveled leg.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub link:    LinkId,
    pub entry:   i64,
    pub exit:    i64,
    pub air:     Option<f64>,
    pub radiant: Option<f64>,
}

impl Event {
    pub fn new(link: LinkId, entry: i64, exit: i64) -> Self {
        Self { link, entry, exit, air: None, radiant: None }
    }

    #[inline]
    pub fn duration(&self) -> i64 {
        self.exit - self.entry
    }
}

// ── Activity ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Activity {
    pub act_type: String,
    pub link:     LinkId,
    pub parcel:   ParcelId,
    pub start:    i64,
    pub end:      Option<i64>,
    pub air:      Option<f64>,
}

impl Activity {
    pub fn duration(&self) -> Option<i64> {
        self.end.map(|e| e - self.start)
    }
}

// ── Leg ───────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Leg {
    /// `legMode` exactly as logged (`access_walk`, `taxi`, ...).
    pub mode_tag:   String,
    /// Parsed from `mode_tag`; several tags share one mode.
    pub mode:       TravelMode,
    /// Fixed when the leg opens; decides how its exposure is computed.
    pub class:      ExposureClass,
    pub start:      i64,
    pub end:        Option<i64>,
    /// Set by a `travelled` record; teleported legs stay `false`.
    pub traveled:   bool,
    pub start_link: LinkId,
    pub end_link:   Option<LinkId>,
    pub events:     Vec<Event>,
    pub air:        Option<f64>,
    pub radiant:    Option<f64>,
}

impl Leg {
    pub fn open(tag: &str, class: ExposureClass, start: i64, start_link: LinkId) -> Self {
        Self {
            mode_tag: tag.trim().to_owned(),
            mode: TravelMode::from_tag(tag),
            class,
            start,
            end: None,
            traveled: false,
            start_link,
            end_link: None,
            events: Vec::new(),
            air: None,
            radiant: None,
        }
    }

    pub fn duration(&self) -> Option<i64> {
        self.end.map(|e| e - self.start)
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub id:         AgentId,
    /// External person id from the event log.
    pub name:       String,
    pub activities: Vec<Activity>,
    pub legs:       Vec<Leg>,
    /// The simulator gave up on this agent's plan (`stuckAndAbort`).
    pub aborted:    bool,
    /// The log ended before the plan came to rest in a final activity
    /// (mid-leg, or between an arrival and the next `actstart`).
    pub truncated:  bool,
    pub air:        Option<f64>,
    pub radiant:    Option<f64>,
}

impl Agent {
    pub fn new(id: AgentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            activities: Vec::new(),
            legs: Vec::new(),
            aborted: false,
            truncated: false,
            air: None,
            radiant: None,
        }
    }

    /// Activities plus legs.
    pub fn segment_count(&self) -> usize {
        self.activities.len() + self.legs.len()
    }

    /// `true` if any activity or leg has no end time.
    pub fn has_open_segment(&self) -> bool {
        self.activities.iter().any(|a| a.end.is_none()) || self.legs.iter().any(|l| l.end.is_none())
    }

    /// `true` if the plan ran to a closed final activity, so totals are
    /// defined.
    pub fn is_complete(&self) -> bool {
        !self.aborted && !self.truncated && !self.has_open_segment()
    }

    /// `true` if the external id is a plain population member (all ASCII
    /// digits), as opposed to a transit driver or other system agent.
    pub fn is_population_member(&self) -> bool {
        !self.name.is_empty() && self.name.bytes().all(|b| b.is_ascii_digit())
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// All reconstructed agents, indexed by `AgentId`.
#[derive(Clone, Debug, Default)]
pub struct Population {
    agents:  Vec<Agent>,
    by_name: HashMap<String, AgentId>,
    /// External ids of agents excluded for a malformed event sequence.
    pub dropped: Vec<String>,
}

impl Population {
    /// Build from agents whose ids are their positions in `agents`.
    pub fn new(agents: Vec<Agent>, dropped: Vec<String>) -> Self {
        let mut pop = Self { agents, by_name: HashMap::new(), dropped };
        pop.reindex();
        pop
    }

    fn reindex(&mut self) {
        self.by_name.clear();
        for (i, a) in self.agents.iter_mut().enumerate() {
            a.id = AgentId(i as u32);
            self.by_name.insert(a.name.clone(), a.id);
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> &Agent {
        &self.agents[id.index()]
    }

    pub fn by_name(&self, name: &str) -> Option<&Agent> {
        self.by_name.get(name).map(|id| self.get(*id))
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    /// Drop agents that are not population members and renumber the rest.
    /// Returns how many were removed.
    pub fn retain_population_members(&mut self) -> usize {
        let before = self.agents.len();
        self.agents.retain(Agent::is_population_member);
        self.reindex();
        before - self.agents.len()
    }
}
