//! Spatial-subsystem error type.
//!
//! Every variant except `Parse`/`Io` is a missing-reference failure: the
//! input tables disagree with each other, and the run cannot continue.

use thiserror::Error;

use hx_thermal::ThermalError;

/// Errors produced by `hx-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("node {0:?} not found in network")]
    UnknownNode(String),

    #[error("link {0:?} not found in network")]
    UnknownLink(String),

    #[error("parcel {0:?} not found")]
    UnknownParcel(String),

    #[error("duplicate {kind} id {name:?}")]
    Duplicate { kind: &'static str, name: String },

    #[error("link {link:?} has invalid length {length}")]
    InvalidLength { link: String, length: f64 },

    #[error("no temperature curve could be joined to node {0:?}")]
    NoCurveForNode(String),

    #[error("no parcel could be resolved for link {0:?}")]
    NoParcelForLink(String),

    #[error("route for {person:?} has no links")]
    EmptyRoute { person: String },

    #[error(transparent)]
    Thermal(#[from] ThermalError),

    #[error("spatial parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
