//! Plain data row types written by output backends.
//!
//! `None` marks an undefined value (open segment, aborted agent, radiant
//! outside daylight) and is written as SQL `NULL`, a Parquet null, or an
//! empty CSV field.

/// One agent and its totals.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRow {
    pub agent_id: String,
    /// Activities plus legs.
    pub segments: u32,
    pub aborted:  bool,
    pub air:      Option<f64>,
    pub radiant:  Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRow {
    /// Run-wide sequence number.
    pub activity_id: u64,
    pub agent_id:    String,
    /// Position in the agent's activity list.
    pub index:       u32,
    pub act_type:    String,
    pub parcel_id:   String,
    pub start:       i64,
    pub end:         Option<i64>,
    pub duration:    Option<i64>,
    pub air:         Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegRow {
    /// Run-wide sequence number.
    pub leg_id:   u64,
    pub agent_id: String,
    pub index:    u32,
    /// Mode tag as logged.
    pub mode:     String,
    pub start:    i64,
    pub end:      Option<i64>,
    pub duration: Option<i64>,
    pub air:      Option<f64>,
    pub radiant:  Option<f64>,
}

/// One link traversal inside a leg.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub agent_id:  String,
    pub leg_index: u32,
    pub link_id:   String,
    pub entry:     i64,
    pub exit:      i64,
    pub air:       Option<f64>,
    pub radiant:   Option<f64>,
}

/// Network-wide totals for one link.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRow {
    pub link_id:    String,
    pub traversals: u64,
    pub air:        f64,
    pub radiant:    Option<f64>,
}
