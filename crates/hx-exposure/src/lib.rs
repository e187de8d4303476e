//! `hx-exposure`: integrates temperature curves over reconstructed
//! trajectories.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`aggregate`] | `Aggregator`: activity, leg, event and agent exposure     |
//! | [`links`]     | `LinkExposureStore`, `LinkContributions`, `LinkTotals`     |
//! | [`summary`]   | `RunSummary`                                               |
//! | [`error`]     | `ExposureError`, `ExposureResult<T>`                       |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Aggregates agents on Rayon's thread pool.                   |
//! | `fx-hash`  | FxHash for per-agent link contribution maps.                |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let agg = Aggregator::new(&index, &cfg)?;
//! let mut links = agg.link_store();
//! let summary = agg.run(&mut population, &mut links)?;
//! ```

pub mod aggregate;
pub mod error;
pub mod links;
pub mod summary;

#[cfg(test)]
mod tests;

pub use aggregate::Aggregator;
pub use error::{ExposureError, ExposureResult};
pub use links::{LinkContributions, LinkExposureStore, LinkTotals};
pub use summary::RunSummary;
