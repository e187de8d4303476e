//! `Reconstructor`: the streaming per-agent state machine.
//!
//! # States
//!
//! ```text
//!            actend                departure              arrival
//! NoPlan ──────────► AwaitingLeg ───────────► InLeg ─────────────► AwaitingActivity
//!   │                    ▲                    │ travelled                 │
//!   │ actstart           │ actend             └──────┘                    │ actstart
//!   └──────────────► InActivity ◄─────────────────────────────────────────┘
//!
//! stuckAndAbort (any state) ─► Aborted
//! ```
//!
//! An `actend` seen in `NoPlan` is the end of the agent's first activity,
//! which has no `actstart` record: the activity is opened at
//! `ExposureConfig::day_start` and closed in the same step.
//!
//! Records that do not fit the current state are malformed.  Depending on
//! [`MalformedPolicy`] the pass fails, or the agent is logged, marked
//! dropped and left out of the resulting [`Population`].  Unknown links and
//! unresolvable parcels always fail the pass.

use std::collections::HashMap;

use hx_core::{AgentId, ExposureConfig, LinkId, MalformedPolicy, TravelMode};
use hx_spatial::{RouteBook, RouteKey, ThermalIndex};

use crate::apportion::apportion;
use crate::event::{EventKind, LogEvent};
use crate::model::{Activity, Agent, Leg, Population};
use crate::{TrajectoryError, TrajectoryResult};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum AgentState {
    NoPlan,
    InActivity,
    AwaitingLeg,
    InLeg,
    AwaitingActivity,
    Aborted,
    Dropped,
}

impl AgentState {
    fn describe(self) -> &'static str {
        match self {
            AgentState::NoPlan => "no plan started",
            AgentState::InActivity => "in an activity",
            AgentState::AwaitingLeg => "between activity and leg",
            AgentState::InLeg => "in a leg",
            AgentState::AwaitingActivity => "between leg and activity",
            AgentState::Aborted => "aborted",
            AgentState::Dropped => "dropped",
        }
    }
}

/// Counters for one reconstruction pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconstructStats {
    pub records:        u64,
    pub ignored:        u64,
    pub legs_traveled:  u64,
    pub legs_unmatched: u64,
    pub events:         u64,
}

/// Consumes log records one at a time and builds per-agent trajectories.
pub struct Reconstructor<'a> {
    index:   &'a ThermalIndex,
    routes:  &'a RouteBook,
    cfg:     &'a ExposureConfig,
    agents:  Vec<Agent>,
    states:  Vec<AgentState>,
    by_name: HashMap<String, AgentId>,
    stats:   ReconstructStats,
}

impl<'a> Reconstructor<'a> {
    pub fn new(index: &'a ThermalIndex, routes: &'a RouteBook, cfg: &'a ExposureConfig) -> Self {
        Self {
            index,
            routes,
            cfg,
            agents: Vec::new(),
            states: Vec::new(),
            by_name: HashMap::new(),
            stats: ReconstructStats::default(),
        }
    }

    pub fn stats(&self) -> ReconstructStats {
        self.stats
    }

    /// Drain `events` into the state machine, then [`finish`](Self::finish).
    pub fn run<I>(mut self, events: I) -> TrajectoryResult<Population>
    where
        I: IntoIterator<Item = TrajectoryResult<LogEvent>>,
    {
        for ev in events {
            self.push(ev?)?;
        }
        Ok(self.finish())
    }

    /// Process one record.
    pub fn push(&mut self, ev: LogEvent) -> TrajectoryResult<()> {
        self.stats.records += 1;
        if let EventKind::Other(tag) = &ev.kind {
            tracing::trace!(kind = %tag, person = %ev.person, "ignored event");
            self.stats.ignored += 1;
            return Ok(());
        }

        let id = self.agent_id(&ev.person);
        let state = self.states[id.index()];
        match state {
            AgentState::Aborted | AgentState::Dropped => {
                tracing::debug!(person = %ev.person, kind = ev.kind.tag(), state = state.describe(), "event after plan ended");
                self.stats.ignored += 1;
                return Ok(());
            }
            _ => {}
        }

        match self.step(id, state, ev) {
            Ok(next) => {
                self.states[id.index()] = next;
                Ok(())
            }
            Err(err @ TrajectoryError::Malformed { .. }) => match self.cfg.malformed_policy {
                MalformedPolicy::Fatal => Err(err),
                MalformedPolicy::DropAgent => {
                    tracing::warn!(error = %err, "dropping agent");
                    self.states[id.index()] = AgentState::Dropped;
                    Ok(())
                }
            },
            Err(err) => Err(err),
        }
    }

    fn agent_id(&mut self, person: &str) -> AgentId {
        if let Some(id) = self.by_name.get(person) {
            return *id;
        }
        let id = AgentId(self.agents.len() as u32);
        self.agents.push(Agent::new(id, person));
        self.states.push(AgentState::NoPlan);
        self.by_name.insert(person.to_owned(), id);
        id
    }

    fn link(&self, name: &str) -> TrajectoryResult<LinkId> {
        self.index
            .network()
            .link_id(name)
            .ok_or_else(|| TrajectoryError::UnknownLink(name.to_owned()))
    }

    fn open_activity(&self, link: &str, act_type: String, start: i64) -> TrajectoryResult<Activity> {
        let link = self.link(link)?;
        Ok(Activity {
            act_type,
            link,
            parcel: self.index.activity_parcel(link)?,
            start,
            end: None,
            air: None,
        })
    }

    fn step(&mut self, id: AgentId, state: AgentState, ev: LogEvent) -> TrajectoryResult<AgentState> {
        use AgentState::*;

        let malformed = |event: &'static str| TrajectoryError::Malformed {
            agent: ev.person.clone(),
            event,
            state: state.describe(),
        };

        match (state, &ev.kind) {
            (_, EventKind::StuckAndAbort) => {
                self.agents[id.index()].aborted = true;
                Ok(Aborted)
            }

            (NoPlan, EventKind::ActEnd { link, act_type }) => {
                let start = self.cfg.day_start.min(ev.time);
                let mut act = self.open_activity(link, act_type.clone(), start)?;
                act.end = Some(ev.time);
                self.agents[id.index()].activities.push(act);
                Ok(AwaitingLeg)
            }
            (InActivity, EventKind::ActEnd { .. }) => {
                let agent = &mut self.agents[id.index()];
                match agent.activities.last_mut() {
                    Some(act) if ev.time >= act.start => {
                        act.end = Some(ev.time);
                        Ok(AwaitingLeg)
                    }
                    _ => Err(malformed("actend")),
                }
            }

            (AwaitingLeg, EventKind::Departure { link, mode }) => {
                let link = self.link(link)?;
                let class = self.cfg.classify(TravelMode::from_tag(mode));
                let leg = Leg::open(mode, class, ev.time, link);
                self.agents[id.index()].legs.push(leg);
                Ok(InLeg)
            }

            (InLeg, EventKind::Travelled { .. }) => {
                if let Some(leg) = self.agents[id.index()].legs.last_mut() {
                    leg.traveled = true;
                }
                Ok(InLeg)
            }

            (InLeg, EventKind::Arrival { link, .. }) => {
                let end_link = self.link(link)?;
                let index: &'a ThermalIndex = self.index;
                let network = index.network();
                let routes = self.routes;
                let agent = &mut self.agents[id.index()];
                let Some(leg) = agent.legs.last_mut() else {
                    return Err(malformed("arrival"));
                };
                if ev.time < leg.start {
                    return Err(malformed("arrival"));
                }
                leg.end = Some(ev.time);
                leg.end_link = Some(end_link);
                if leg.traveled {
                    self.stats.legs_traveled += 1;
                    let key = RouteKey::new(&leg.mode_tag, leg.start_link, end_link);
                    match routes.lookup(&agent.name, &key) {
                        Some(route) => {
                            leg.events = apportion(leg.start, ev.time, route, network);
                            self.stats.events += leg.events.len() as u64;
                        }
                        None => {
                            self.stats.legs_unmatched += 1;
                            tracing::warn!(
                                person = %agent.name,
                                mode = %leg.mode_tag,
                                start = %network.link(leg.start_link).name,
                                end = %network.link(end_link).name,
                                "traveled leg has no matched route"
                            );
                        }
                    }
                }
                Ok(AwaitingActivity)
            }

            (NoPlan | AwaitingActivity, EventKind::ActStart { link, act_type }) => {
                let act = self.open_activity(link, act_type.clone(), ev.time)?;
                self.agents[id.index()].activities.push(act);
                Ok(InActivity)
            }

            (_, kind) => Err(malformed(kind.static_tag())),
        }
    }

    /// Close what the log leaves open and hand over the population.
    ///
    /// An agent resting in its final activity has it closed at
    /// `max(start, day_end)`.  Aborted agents keep their open segment.  An
    /// agent whose log stops anywhere between an `actend` and the next
    /// `actstart` is marked truncated.
    pub fn finish(self) -> Population {
        let mut kept = Vec::with_capacity(self.agents.len());
        let mut dropped = Vec::new();
        let (mut aborted, mut truncated) = (0usize, 0usize);

        for (mut agent, state) in self.agents.into_iter().zip(self.states) {
            match state {
                AgentState::Dropped => {
                    dropped.push(agent.name);
                    continue;
                }
                AgentState::Aborted => aborted += 1,
                AgentState::InActivity => {
                    if let (Some(day_end), Some(act)) = (self.cfg.day_end, agent.activities.last_mut()) {
                        act.end = Some(act.start.max(day_end));
                    }
                }
                AgentState::AwaitingLeg | AgentState::InLeg | AgentState::AwaitingActivity => {
                    agent.truncated = true;
                }
                AgentState::NoPlan => {}
            }
            if !agent.aborted && !agent.is_complete() {
                truncated += 1;
            }
            kept.push(agent);
        }

        tracing::info!(
            agents = kept.len(),
            aborted,
            truncated,
            dropped = dropped.len(),
            records = self.stats.records,
            events = self.stats.events,
            unmatched_legs = self.stats.legs_unmatched,
            "trajectory reconstruction finished"
        );
        Population::new(kept, dropped)
    }
}
