//! Travel modes and the exposure class each mode is evaluated under.
//!
//! A leg's exposure formula depends only on its mode, so the class is chosen
//! once when the leg is opened (see `ExposureConfig::classify`) instead of
//! being re-derived from the mode string at every evaluation.

use std::str::FromStr;

use crate::HxError;

/// The mode recorded on a `departure` event.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TravelMode {
    Walk,
    Bike,
    Car,
    /// Car passenger.
    Ride,
    /// Scheduled public transport.
    Pt,
    /// Any mode string this pipeline has no dedicated handling for.
    Other,
}

impl TravelMode {
    /// Label used in output rows and route-table keys.
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Walk  => "walk",
            TravelMode::Bike  => "bike",
            TravelMode::Car   => "car",
            TravelMode::Ride  => "ride",
            TravelMode::Pt    => "pt",
            TravelMode::Other => "other",
        }
    }

    /// Parse a mode tag, mapping unknown tags to [`TravelMode::Other`].
    ///
    /// Access/egress walks emitted around transit legs count as walking.
    pub fn from_tag(tag: &str) -> TravelMode {
        match tag.trim().to_ascii_lowercase().as_str() {
            "walk" | "transit_walk" | "access_walk" | "egress_walk" | "non_network_walk" => {
                TravelMode::Walk
            }
            "bike" | "bicycle" => TravelMode::Bike,
            "car" => TravelMode::Car,
            "ride" => TravelMode::Ride,
            "pt" | "bus" | "rail" | "train" | "tram" | "subway" => TravelMode::Pt,
            _ => TravelMode::Other,
        }
    }
}

impl FromStr for TravelMode {
    type Err = HxError;

    /// Strict parse: unlike [`TravelMode::from_tag`], unknown tags are errors.
    /// Used for configuration values, where a typo must not pass silently.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match TravelMode::from_tag(s) {
            TravelMode::Other if !s.trim().eq_ignore_ascii_case("other") => {
                Err(HxError::Parse(format!("unknown travel mode {s:?}")))
            }
            m => Ok(m),
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a leg's exposure is computed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExposureClass {
    /// Physically traveled outdoors: integrate link curves over the leg's events.
    OutdoorTraveled,
    /// Climate-controlled private vehicle: constant cabin rate times duration.
    VehicleCabin,
    /// Public transport vehicle: constant transit rate times duration.
    Transit,
}

impl ExposureClass {
    #[inline]
    pub fn is_outdoor(self) -> bool {
        matches!(self, ExposureClass::OutdoorTraveled)
    }
}
