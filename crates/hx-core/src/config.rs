//! Run configuration for reconstruction and exposure aggregation.
//!
//! Typically loaded from the `exposure` object of a JSON run file by the
//! application binary (requires the `serde` feature) and passed by reference
//! to the reconstructor and aggregator.  Every field has a default, so a run
//! file only needs to name what it overrides.

use crate::time::{DAY_SECS, time_of_day};
use crate::{ExposureClass, HxError, HxResult, TravelMode};

/// When an outdoor event qualifies for a radiant (MRT) value.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RadiantPolicy {
    /// Only the event's entry time is tested against the daylight window.
    /// An event entering at 20:40 and leaving at 20:50 is fully integrated.
    #[default]
    EventStart,
    /// Entry and exit must both lie inside the same day's window.
    WholeEvent,
}

/// What the reconstructor does with an agent whose records are out of order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MalformedPolicy {
    /// Abort the whole pass with an error.
    #[default]
    Fatal,
    /// Log the agent, mark it invalid, keep consuming the stream.
    DropAgent,
}

/// Exposure model parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExposureConfig {
    /// Constant temperature assumed inside private vehicles (°C).
    pub cabin_rate: f64,

    /// Constant temperature assumed inside transit vehicles (°C).
    pub transit_rate: f64,

    /// Modes whose legs are integrated over link events.  Every other mode
    /// uses a constant rate.
    pub outdoor_modes: Vec<TravelMode>,

    /// Radiant window start, seconds of day (inclusive).  Default 05:00.
    pub daylight_start: i64,

    /// Radiant window end, seconds of day (exclusive).  Default 20:45.
    pub daylight_end: i64,

    pub radiant_policy: RadiantPolicy,

    pub malformed_policy: MalformedPolicy,

    /// Start time given to each agent's first activity, which has no
    /// `actstart` record in the log.
    pub day_start: i64,

    /// Closing time for each agent's final activity, which has no `actend`
    /// record.  `None` leaves it open (and the agent total undefined).
    pub day_end: Option<i64>,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            cabin_rate:       25.5,
            transit_rate:     25.5,
            outdoor_modes:    vec![TravelMode::Walk, TravelMode::Bike],
            daylight_start:   18_000,
            daylight_end:     74_700,
            radiant_policy:   RadiantPolicy::EventStart,
            malformed_policy: MalformedPolicy::Fatal,
            day_start:        0,
            day_end:          Some(DAY_SECS),
        }
    }
}

impl ExposureConfig {
    /// Check parameter ranges.  Call once after loading.
    pub fn validate(&self) -> HxResult<()> {
        if !(self.cabin_rate.is_finite() && self.transit_rate.is_finite()) {
            return Err(HxError::Config("cabin_rate and transit_rate must be finite".into()));
        }
        if !(0..=DAY_SECS).contains(&self.daylight_start)
            || !(0..=DAY_SECS).contains(&self.daylight_end)
        {
            return Err(HxError::Config(format!(
                "daylight window [{}, {}) must lie within one day",
                self.daylight_start, self.daylight_end
            )));
        }
        if self.daylight_start >= self.daylight_end {
            return Err(HxError::Config(format!(
                "daylight window [{}, {}) is empty",
                self.daylight_start, self.daylight_end
            )));
        }
        if self.day_start < 0 {
            return Err(HxError::Config("day_start must be non-negative".into()));
        }
        if let Some(end) = self.day_end {
            if end < self.day_start {
                return Err(HxError::Config(format!(
                    "day_end {end} is before day_start {}",
                    self.day_start
                )));
            }
        }
        Ok(())
    }

    /// Exposure class for legs of `mode`.
    pub fn classify(&self, mode: TravelMode) -> ExposureClass {
        if self.outdoor_modes.contains(&mode) {
            ExposureClass::OutdoorTraveled
        } else if mode == TravelMode::Pt {
            ExposureClass::Transit
        } else {
            ExposureClass::VehicleCabin
        }
    }

    /// Whether an event over `[entry, exit)` gets a radiant value.
    pub fn radiant_applies(&self, entry: i64, exit: i64) -> bool {
        let tod = time_of_day(entry);
        let starts_inside = tod >= self.daylight_start && tod < self.daylight_end;
        match self.radiant_policy {
            RadiantPolicy::EventStart => starts_inside,
            RadiantPolicy::WholeEvent => {
                let window_end = entry - tod + self.daylight_end;
                starts_inside && exit <= window_end
            }
        }
    }
}
