//! `hx-trajectory`: rebuilds per-agent trajectories from a simulator event log.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`event`]       | `LogEvent`, `EventKind`, lazy CSV `EventReader`              |
//! | [`model`]       | `Agent`, `Activity`, `Leg`, `Event`, `Population`            |
//! | [`apportion`]   | leg duration → link events along a matched route             |
//! | [`reconstruct`] | `Reconstructor`: the per-agent state machine                |
//! | [`error`]       | `TrajectoryError`, `TrajectoryResult<T>`                     |
//!
//! # Pass structure
//!
//! ```text
//! open_event_log ──► Reconstructor::push (one record at a time)
//!                         │  arrival of a traveled leg
//!                         ├──► RouteBook::lookup ──► apportion ──► Leg::events
//!                         ▼
//!                  Reconstructor::finish ──► Population
//! ```
//!
//! Reconstruction is single-threaded: records for one agent must be applied
//! in log order.  The resulting [`Population`] is plain data and can be
//! aggregated in parallel.

pub mod apportion;
pub mod error;
pub mod event;
pub mod model;
pub mod reconstruct;


pub use apportion::apportion;
pub use error::{TrajectoryError, TrajectoryResult};
pub use event::{EventKind, EventReader, LogEvent, event_reader, open_event_log};
pub use model::{Activity, Agent, Event, Leg, Population};
pub use reconstruct::{ReconstructStats, Reconstructor};
