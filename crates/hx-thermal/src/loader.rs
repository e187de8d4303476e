//! CSV temperature-curve loader.
//!
//! # CSV format
//!
//! One row per `(curve, step)` sample.  Rows may come in any order; each
//! curve must list every step from `0` to `N − 1` exactly once, with
//! `N ≤ MAX_STEPS`.
//!
//! ```csv
//! curve_id,step,value
//! grid_17,0,24.1
//! grid_17,1,23.8
//! grid_18,0,25.0
//! grid_17,2,23.5
//! ```
//!
//! Curves are inserted into the [`CurveStore`] in order of first appearance,
//! so ids are stable for a given file.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::curve::MAX_STEPS;
use crate::{CurveStore, TemperatureCurve, ThermalError, ThermalResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CurveRecord {
    curve_id: String,
    step:     usize,
    value:    f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load all curves from a CSV file.
pub fn load_curves_csv(path: &Path) -> ThermalResult<CurveStore> {
    let file = std::fs::File::open(path)?;
    load_curves_reader(file)
}

/// Like [`load_curves_csv`] but accepts any `Read` source.
pub fn load_curves_reader<R: Read>(reader: R) -> ThermalResult<CurveStore> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut order: Vec<String> = Vec::new();
    let mut by_curve: HashMap<String, Vec<Option<f64>>> = HashMap::new();

    for result in csv_reader.deserialize::<CurveRecord>() {
        let row = result.map_err(|e| ThermalError::Parse(e.to_string()))?;
        if row.step >= MAX_STEPS {
            return Err(ThermalError::StepOutOfRange { curve: row.curve_id, step: row.step });
        }
        let slots = by_curve.entry(row.curve_id.clone()).or_insert_with(|| {
            order.push(row.curve_id.clone());
            Vec::new()
        });
        if slots.len() <= row.step {
            slots.resize(row.step + 1, None);
        }
        if slots[row.step].replace(row.value).is_some() {
            return Err(ThermalError::DuplicateStep { curve: row.curve_id, step: row.step });
        }
    }

    let mut store = CurveStore::new();
    for name in order {
        let slots = by_curve.remove(&name).unwrap_or_default();
        let samples = slots
            .into_iter()
            .enumerate()
            .map(|(step, v)| {
                v.ok_or_else(|| ThermalError::MissingStep { curve: name.clone(), step })
            })
            .collect::<ThermalResult<Vec<f64>>>()?;
        store.insert(TemperatureCurve::new(name, samples)?)?;
    }
    Ok(store)
}
