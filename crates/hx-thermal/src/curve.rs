//! `TemperatureCurve`: a cyclic, piecewise-constant function of time.
//!
//! # Integration
//!
//! Step indices are computed on the *unrolled* time axis (step 30 of a
//! 24-sample curve is 06:00 on day 2) and only the sample lookup wraps with
//! `rem_euclid(N)`.  That keeps the first/interior/last decomposition valid
//! for intervals of any length:
//!
//! ```text
//! s₀ = floor(a·N/86400)   s₁ = floor(b·N/86400)
//! s₀ == s₁ :  (b − a)·v(s₀)
//! otherwise:  ((s₀+1)·S − a)·v(s₀) + Σ_{s₀<k<s₁} S·v(k) + (b − s₁·S)·v(s₁)
//! ```
//!
//! Step indices multiply before dividing (`t·N / 86400`), so integer-second
//! boundaries such as `3600` on a 24-step curve land exactly on step 1
//! instead of `0.9999…`.

use hx_core::DAY_SECS;

use crate::{ThermalError, ThermalResult};

const DAY: f64 = DAY_SECS as f64;

/// Finest supported discretization: one sample per second of the day.
pub const MAX_STEPS: usize = DAY_SECS as usize;

/// One day of temperature samples, repeated indefinitely.
///
/// Immutable after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct TemperatureCurve {
    name:    String,
    samples: Vec<f64>,
}

impl TemperatureCurve {
    /// Build a curve from `samples` (at least one, at most [`MAX_STEPS`],
    /// all finite).
    pub fn new(name: impl Into<String>, samples: Vec<f64>) -> ThermalResult<Self> {
        let name = name.into();
        if samples.is_empty() {
            return Err(ThermalError::EmptyCurve(name));
        }
        if samples.len() > MAX_STEPS {
            return Err(ThermalError::StepOutOfRange { curve: name, step: samples.len() - 1 });
        }
        if let Some(step) = samples.iter().position(|v| !v.is_finite()) {
            return Err(ThermalError::NonFinite { curve: name, step });
        }
        Ok(Self { name, samples })
    }

    /// A single-step curve that is `value` all day.
    pub fn constant(name: impl Into<String>, value: f64) -> ThermalResult<Self> {
        Self::new(name, vec![value])
    }

    /// External id of the curve.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of steps per day (`N`).
    pub fn steps(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Duration of one step in seconds (`86400 / N`).
    #[inline]
    pub fn step_secs(&self) -> f64 {
        DAY / self.samples.len() as f64
    }

    /// Instantaneous value at absolute time `t` (seconds).
    #[inline]
    pub fn value(&self, t: f64) -> f64 {
        self.sample(self.step_at(t))
    }

    /// Exact integral of the curve over `[start, end)`, in °C·s.
    ///
    /// Returns `0.0` for an empty interval.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `end < start`.
    pub fn exposure(&self, start: f64, end: f64) -> f64 {
        debug_assert!(end >= start, "exposure interval [{start}, {end}) is inverted");
        if end <= start {
            return 0.0;
        }
        let step = self.step_secs();
        let first = self.step_at(start);
        let last = self.step_at(end);

        if first == last {
            return (end - start) * self.sample(first);
        }

        let head = ((first + 1) as f64 * step - start) * self.sample(first);
        let body: f64 = ((first + 1)..last).map(|k| step * self.sample(k)).sum();
        let tail = (end - last as f64 * step) * self.sample(last);
        head + body + tail
    }

    /// Step index on the unrolled time axis.
    #[inline]
    fn step_at(&self, t: f64) -> i64 {
        (t * self.samples.len() as f64 / DAY).floor() as i64
    }

    /// Sample for unrolled step `k`.
    #[inline]
    fn sample(&self, k: i64) -> f64 {
        self.samples[k.rem_euclid(self.samples.len() as i64) as usize]
    }
}
