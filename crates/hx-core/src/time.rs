//! Simulation time helpers.
//!
//! # Design
//!
//! All trajectory times are whole seconds since midnight of the first
//! simulated day, held as `i64`.  Event logs write fractional seconds; the
//! fraction is truncated on read so every segment boundary is an integer and
//! apportionment rounding is reproducible.
//!
//! Temperature curves are diurnal, so lookups fold an absolute time onto the
//! time of day with [`time_of_day`].  Times past midnight (`t >= 86_400`)
//! are ordinary: a plan running to 27:30:00 is simply `99_000`.

use crate::{HxError, HxResult};

/// Seconds in one simulated day; the period of every temperature curve.
pub const DAY_SECS: i64 = 86_400;

/// Fold an absolute time onto `[0, DAY_SECS)`.
#[inline]
pub fn time_of_day(t: i64) -> i64 {
    t.rem_euclid(DAY_SECS)
}

/// Parse an event-log time field.
///
/// Accepts plain seconds (`"28800"`, `"28800.75"`, fraction truncated) or
/// clock notation (`"08:00:00"`, hours may exceed 23).  Negative,
/// non-finite and malformed values are rejected.
pub fn parse_secs(s: &str) -> HxResult<i64> {
    let s = s.trim();
    if s.contains(':') {
        return parse_hms(s);
    }
    let v: f64 = s
        .parse()
        .map_err(|_| HxError::Parse(format!("invalid time {s:?}")))?;
    if !v.is_finite() || v < 0.0 {
        return Err(HxError::Parse(format!("time {s:?} must be a finite non-negative number")));
    }
    Ok(v.trunc() as i64)
}

fn parse_hms(s: &str) -> HxResult<i64> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return Err(HxError::Parse(format!("invalid clock time {s:?}: expected HH:MM:SS")));
    }
    let field = |p: &str| {
        p.parse::<u32>()
            .map_err(|_| HxError::Parse(format!("invalid clock time {s:?}")))
    };
    let h = field(parts[0])? as i64;
    let m = field(parts[1])? as i64;
    // Seconds may carry a fraction in some writers; truncate like plain seconds.
    let sec = parts[2]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| HxError::Parse(format!("invalid clock time {s:?}")))?
        .trunc() as i64;
    if m >= 60 || sec >= 60 {
        return Err(HxError::Parse(format!("invalid clock time {s:?}: minutes/seconds out of range")));
    }
    Ok(h * 3_600 + m * 60 + sec)
}

/// Format seconds as `HH:MM:SS` (hours not wrapped), for log messages.
pub fn format_hms(t: i64) -> String {
    let sign = if t < 0 { "-" } else { "" };
    let t = t.abs();
    format!("{sign}{:02}:{:02}:{:02}", t / 3_600, (t % 3_600) / 60, t % 60)
}
