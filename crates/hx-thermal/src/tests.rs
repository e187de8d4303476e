//! Unit tests for hx-thermal.

use crate::TemperatureCurve;

// ── Helpers ───────────────────────────────────────────────────────────────────

const DAY: f64 = 86_400.0;

/// 24 hourly samples: 20.0, 21.0, …, 43.0.
fn hourly() -> TemperatureCurve {
    TemperatureCurve::new("hourly", (0..24).map(|h| 20.0 + h as f64).collect()).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

// ── TemperatureCurve ──────────────────────────────────────────────────────────

#[cfg(test)]
mod curve {
    use super::*;
    use crate::ThermalError;

    #[test]
    fn rejects_empty_and_non_finite() {
        assert!(matches!(TemperatureCurve::new("e", vec![]), Err(ThermalError::EmptyCurve(_))));
        assert!(matches!(
            TemperatureCurve::new("n", vec![1.0, f64::NAN]),
            Err(ThermalError::NonFinite { step: 1, .. })
        ));
    }

    #[test]
    fn per_second_resolution_is_the_limit() {
        let fine = TemperatureCurve::new("s", vec![1.0; crate::MAX_STEPS]).unwrap();
        assert_eq!(fine.step_secs(), 1.0);
        assert!(matches!(
            TemperatureCurve::new("t", vec![1.0; crate::MAX_STEPS + 1]),
            Err(ThermalError::StepOutOfRange { .. })
        ));
    }

    #[test]
    fn value_picks_containing_step() {
        let c = hourly();
        assert_eq!(c.value(0.0), 20.0);
        assert_eq!(c.value(3_599.0), 20.0);
        assert_eq!(c.value(3_600.0), 21.0);
        assert_eq!(c.value(86_399.0), 43.0);
    }

    #[test]
    fn value_is_periodic() {
        let c = hourly();
        for t in [0.0, 1.0, 3_600.0, 45_000.5, 86_399.0] {
            assert_eq!(c.value(t), c.value(t + DAY));
            assert_eq!(c.value(t), c.value(t + 3.0 * DAY));
        }
    }

    #[test]
    fn empty_interval_is_zero() {
        let c = hourly();
        for t in [0.0, 3_600.0, 12_345.0, DAY, 2.5 * DAY] {
            assert_eq!(c.exposure(t, t), 0.0);
        }
    }

    #[test]
    fn within_one_step() {
        let c = hourly();
        // 10:00–10:30 at 30 °C.
        assert_eq!(c.exposure(36_000.0, 37_800.0), 1_800.0 * 30.0);
    }

    #[test]
    fn spanning_steps() {
        let c = hourly();
        // 00:30–02:15 → 1800·20 + 3600·21 + 900·22
        let expected = 1_800.0 * 20.0 + 3_600.0 * 21.0 + 900.0 * 22.0;
        assert!(close(c.exposure(1_800.0, 8_100.0), expected));
    }

    #[test]
    fn ends_exactly_on_step_boundary() {
        let c = hourly();
        // 00:00–01:00 is exactly one step of 20 °C; the tail step contributes 0 s.
        assert_eq!(c.exposure(0.0, 3_600.0), 72_000.0);
    }

    #[test]
    fn whole_day_and_multi_day() {
        let c = hourly();
        let day_total: f64 = (0..24).map(|h| 3_600.0 * (20.0 + h as f64)).sum();
        assert!(close(c.exposure(0.0, DAY), day_total));
        assert!(close(c.exposure(0.0, 3.0 * DAY), 3.0 * day_total));
        // Any full-day window has the same integral.
        assert!(close(c.exposure(40_000.0, 40_000.0 + DAY), day_total));
    }

    #[test]
    fn wraps_past_midnight() {
        let c = hourly();
        // 23:30 → 00:30 next day: 1800·43 + 1800·20
        assert!(close(c.exposure(84_600.0, DAY + 1_800.0), 1_800.0 * 43.0 + 1_800.0 * 20.0));
    }

    #[test]
    fn additivity() {
        let c = hourly();
        let cases = [
            (0.0, 100.0, 200.0),
            (1_800.0, 3_600.0, 90_000.0),
            (5_000.0, 5_000.0, 9_000.0),
            (12_345.0, 50_001.0, 2.0 * DAY + 7.0),
        ];
        for (a, m, b) in cases {
            let whole = c.exposure(a, b);
            let split = c.exposure(a, m) + c.exposure(m, b);
            assert!(close(whole, split), "[{a},{b}) = {whole}, split at {m} = {split}");
        }
    }

    #[test]
    fn constant_curve_is_linear() {
        let c = TemperatureCurve::constant("flat", 30.0).unwrap();
        assert_eq!(c.steps(), 1);
        assert_eq!(c.exposure(0.0, 600.0), 18_000.0);
        assert!(close(c.exposure(1_000.0, 1_000.0 + 5.0 * DAY), 30.0 * 5.0 * DAY));
    }

    #[test]
    fn non_divisor_step_count() {
        // 7 steps do not divide a day evenly; a whole day still sums exactly.
        let samples: Vec<f64> = (1..=7).map(f64::from).collect();
        let c = TemperatureCurve::new("odd", samples).unwrap();
        let expected = c.step_secs() * 28.0;
        assert!(close(c.exposure(0.0, DAY), expected));
    }
}

// ── CurveStore ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use super::*;
    use crate::{CurveStore, ThermalError};

    #[test]
    fn insert_and_resolve() {
        let mut s = CurveStore::new();
        let a = s.insert(TemperatureCurve::constant("a", 1.0).unwrap()).unwrap();
        let b = s.insert(TemperatureCurve::constant("b", 2.0).unwrap()).unwrap();
        assert_ne!(a, b);
        assert_eq!(s.resolve("b").unwrap(), b);
        assert_eq!(s.get(a).value(0.0), 1.0);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn duplicate_and_unknown() {
        let mut s = CurveStore::new();
        s.insert(TemperatureCurve::constant("a", 1.0).unwrap()).unwrap();
        assert!(matches!(
            s.insert(TemperatureCurve::constant("a", 2.0).unwrap()),
            Err(ThermalError::DuplicateCurve(_))
        ));
        assert!(matches!(s.resolve("zz"), Err(ThermalError::UnknownCurve(_))));
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{ThermalError, load_curves_reader};

    #[test]
    fn loads_interleaved_rows() {
        let csv = "curve_id,step,value\n\
                   g1,1,22.0\n\
                   g2,0,30.0\n\
                   g1,0,21.0\n";
        let store = load_curves_reader(Cursor::new(csv)).unwrap();
        assert_eq!(store.len(), 2);
        let g1 = store.get(store.resolve("g1").unwrap());
        assert_eq!(g1.samples(), &[21.0, 22.0]);
        // First appearance order.
        assert_eq!(store.resolve("g1").unwrap().0, 0);
        assert_eq!(store.resolve("g2").unwrap().0, 1);
    }

    #[test]
    fn missing_step_is_error() {
        let csv = "curve_id,step,value\ng1,0,21.0\ng1,2,23.0\n";
        let err = load_curves_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, ThermalError::MissingStep { step: 1, .. }), "{err}");
    }

    #[test]
    fn duplicate_step_is_error() {
        let csv = "curve_id,step,value\ng1,0,21.0\ng1,0,23.0\n";
        assert!(matches!(
            load_curves_reader(Cursor::new(csv)),
            Err(ThermalError::DuplicateStep { step: 0, .. })
        ));
    }

    #[test]
    fn oversized_step_is_error() {
        for step in ["18446744073709551615", "86400"] {
            let csv = format!("curve_id,step,value\ng1,0,21.0\ng1,{step},1.0\n");
            let err = load_curves_reader(Cursor::new(csv)).unwrap_err();
            assert!(matches!(err, ThermalError::StepOutOfRange { ref curve, .. } if curve == "g1"), "{err}");
        }
    }

    #[test]
    fn bad_number_is_parse_error() {
        let csv = "curve_id,step,value\ng1,0,warm\n";
        assert!(matches!(load_curves_reader(Cursor::new(csv)), Err(ThermalError::Parse(_))));
    }
}
