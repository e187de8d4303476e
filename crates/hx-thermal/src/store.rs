//! `CurveStore`: temperature curves interned by external id.

use std::collections::HashMap;

use hx_core::CurveId;

use crate::{TemperatureCurve, ThermalError, ThermalResult};

/// All curves of a run, indexed by [`CurveId`].
#[derive(Default, Debug)]
pub struct CurveStore {
    curves:  Vec<TemperatureCurve>,
    by_name: HashMap<String, CurveId>,
}

impl CurveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `curve` and return its id.  Names must be unique.
    pub fn insert(&mut self, curve: TemperatureCurve) -> ThermalResult<CurveId> {
        if self.by_name.contains_key(curve.name()) {
            return Err(ThermalError::DuplicateCurve(curve.name().to_owned()));
        }
        let id = CurveId(self.curves.len() as u32);
        self.by_name.insert(curve.name().to_owned(), id);
        self.curves.push(curve);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: CurveId) -> &TemperatureCurve {
        &self.curves[id.index()]
    }

    pub fn id_of(&self, name: &str) -> Option<CurveId> {
        self.by_name.get(name).copied()
    }

    /// Like [`id_of`](Self::id_of) but a missing curve is an error.
    pub fn resolve(&self, name: &str) -> ThermalResult<CurveId> {
        self.id_of(name)
            .ok_or_else(|| ThermalError::UnknownCurve(name.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CurveId, &TemperatureCurve)> {
        self.curves
            .iter()
            .enumerate()
            .map(|(i, c)| (CurveId(i as u32), c))
    }
}
