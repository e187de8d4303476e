//! `hx-core`: foundational types for the heat-exposure pipeline.
//!
//! This crate is a dependency of every other `hx-*` crate.  It has no `hx-*`
//! dependencies and a single external one (`thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `LinkId`, `ParcelId`, `CurveId`  |
//! | [`geo`]         | `Coord` (projected metres), planar distance           |
//! | [`time`]        | `DAY_SECS`, time-of-day folding, event-time parsing   |
//! | [`mode`]        | `TravelMode`, `ExposureClass`                         |
//! | [`config`]      | `ExposureConfig`, `RadiantPolicy`, `MalformedPolicy`  |
//! | [`error`]       | `HxError`, `HxResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod mode;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ExposureConfig, MalformedPolicy, RadiantPolicy};
pub use error::{HxError, HxResult};
pub use geo::Coord;
pub use ids::{AgentId, CurveId, LinkId, NodeId, ParcelId};
pub use mode::{ExposureClass, TravelMode};
pub use time::{DAY_SECS, parse_secs, time_of_day};
