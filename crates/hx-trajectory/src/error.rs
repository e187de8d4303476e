use hx_core::HxError;
use hx_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrajectoryError {
    /// A record that cannot follow the agent's current state, e.g. an
    /// `arrival` with no open leg.
    #[error("malformed event log: agent {agent}: `{event}` while {state}")]
    Malformed {
        agent: String,
        event: &'static str,
        state: &'static str,
    },

    #[error("event log references unknown link {0:?}")]
    UnknownLink(String),

    #[error("`{kind}` record at line {line} is missing `{field}`")]
    MissingField {
        kind:  String,
        field: &'static str,
        line:  u64,
    },

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Core(#[from] HxError),

    #[error("event log parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TrajectoryResult<T> = Result<T, TrajectoryError>;
