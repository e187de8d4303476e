//! `hx-thermal`: discretized diurnal temperature curves.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`curve`]  | `TemperatureCurve`: cyclic lookup and exact integration   |
//! | [`store`]  | `CurveStore`: curves interned by external id              |
//! | [`loader`] | `load_curves_csv`, `load_curves_reader`                    |
//! | [`error`]  | `ThermalError`, `ThermalResult<T>`                         |
//!
//! # Curve model (summary)
//!
//! A curve holds `N` samples for one day.  Sample `i` is valid on
//! `[i·S, (i+1)·S)` with `S = 86400 / N`, and the day repeats forever:
//!
//! ```text
//! value(t)          = samples[floor(t·N / 86400) mod N]
//! exposure(a, b)    = ∫ₐᵇ value(t) dt     (exact, piecewise constant)
//! ```

pub mod curve;
pub mod error;
pub mod loader;
pub mod store;

#[cfg(test)]
mod tests;

pub use curve::{MAX_STEPS, TemperatureCurve};
pub use error::{ThermalError, ThermalResult};
pub use loader::{load_curves_csv, load_curves_reader};
pub use store::CurveStore;
