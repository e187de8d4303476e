//! Matched routes from the simulator's output plans.
//!
//! A route is only used to spread a traveled leg's duration over the links
//! it followed; it is discarded once the leg's events exist.
//!
//! # Lookup
//!
//! Legs are matched by `(mode tag, start link, end link)`, where the mode tag
//! is the simulator's string as written (`walk` and `access_walk` are
//! different keys).  Routes read from an agent's own plan are keyed by that agent as well and win over shared
//! routes (rows without a person), which serve any agent.

use std::collections::HashMap;

use hx_core::LinkId;

use crate::network::Network;

/// The ordered links a traveled leg followed, start and end link included.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Mode tag as written in the plan.
    pub mode:       String,
    pub links:      Vec<LinkId>,
    /// Distance reported by the simulator, in metres.  Informational only;
    /// apportionment uses the network's link lengths.
    pub distance_m: f64,
}

impl Route {
    pub fn start_link(&self) -> Option<LinkId> {
        self.links.first().copied()
    }

    pub fn end_link(&self) -> Option<LinkId> {
        self.links.last().copied()
    }

    pub fn key(&self) -> Option<RouteKey> {
        Some(RouteKey::new(self.mode.as_str(), self.start_link()?, self.end_link()?))
    }

    /// Sum of network link lengths along the route.
    pub fn network_length(&self, network: &Network) -> f64 {
        self.links.iter().map(|&l| network.link(l).length_m).sum()
    }
}

/// Lookup key for a leg's route.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct RouteKey {
    pub mode:  String,
    pub start: LinkId,
    pub end:   LinkId,
}

impl RouteKey {
    /// Surrounding whitespace in `mode` is ignored.
    pub fn new(mode: &str, start: LinkId, end: LinkId) -> Self {
        Self { mode: mode.trim().to_owned(), start, end }
    }
}

/// All matched routes of a run.
#[derive(Default, Debug)]
pub struct RouteBook {
    per_agent: HashMap<String, HashMap<RouteKey, Route>>,
    shared:    HashMap<RouteKey, Route>,
}

impl RouteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route.  `person = None` makes it available to every agent.
    /// Returns `false` (and keeps the first route) if the key is taken.
    pub fn insert(&mut self, person: Option<&str>, route: Route) -> bool {
        let Some(key) = route.key() else {
            return false;
        };
        match person {
            Some(p) => {
                let own = self.per_agent.entry(p.to_owned()).or_default();
                if own.contains_key(&key) {
                    return false;
                }
                own.insert(key, route);
            }
            None => {
                if self.shared.contains_key(&key) {
                    return false;
                }
                self.shared.insert(key, route);
            }
        }
        true
    }

    /// Route for `person`'s leg with `key`, preferring the agent's own plan.
    pub fn lookup(&self, person: &str, key: &RouteKey) -> Option<&Route> {
        self.per_agent
            .get(person)
            .and_then(|own| own.get(key))
            .or_else(|| self.shared.get(key))
    }

    pub fn len(&self) -> usize {
        self.per_agent.values().map(HashMap::len).sum::<usize>() + self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
