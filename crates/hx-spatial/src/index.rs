//! `ThermalIndex`: resolves parcels and links to temperature curves.
//!
//! Parcels and links hold curve ids; the index owns the curves, the network
//! and the parcels together so a lookup never dangles.  Construction checks
//! every curve id once; lookups afterwards are plain indexing.
//!
//! # Radiant values
//!
//! A link's radiant (MRT) curve applies only to events that pass the
//! daylight-window test in [`ExposureConfig::radiant_applies`].  Outside the
//! window, or on a link without a radiant curve, the radiant value is
//! `None`.

use hx_core::{CurveId, ExposureConfig, LinkId, ParcelId};
use hx_thermal::{CurveStore, TemperatureCurve, ThermalError};

use crate::network::Network;
use crate::parcel::ParcelStore;
use crate::SpatialResult;

/// Air and radiant exposure of one link traversal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkExposure {
    pub air:     f64,
    pub radiant: Option<f64>,
}

/// Curves plus the spatial entities bound to them.
pub struct ThermalIndex {
    curves:  CurveStore,
    network: Network,
    parcels: ParcelStore,
}

impl ThermalIndex {
    /// Bundle the inputs, checking that every referenced curve exists.
    pub fn new(curves: CurveStore, network: Network, parcels: ParcelStore) -> SpatialResult<Self> {
        let known = |c: CurveId| -> SpatialResult<()> {
            if c.index() < curves.len() {
                Ok(())
            } else {
                Err(ThermalError::UnknownCurve(c.to_string()).into())
            }
        };
        for (_, link) in network.links() {
            known(link.air_curve)?;
            if let Some(r) = link.radiant_curve {
                known(r)?;
            }
        }
        for i in 0..parcels.len() {
            known(parcels.get(ParcelId(i as u32)).curve)?;
        }
        Ok(Self { curves, network, parcels })
    }

    pub fn curves(&self) -> &CurveStore {
        &self.curves
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn parcels(&self) -> &ParcelStore {
        &self.parcels
    }

    #[inline]
    pub fn parcel_curve(&self, parcel: ParcelId) -> &TemperatureCurve {
        self.curves.get(self.parcels.get(parcel).curve)
    }

    #[inline]
    pub fn link_air_curve(&self, link: LinkId) -> &TemperatureCurve {
        self.curves.get(self.network.link(link).air_curve)
    }

    /// Radiant curve for an event on `link` over `[entry, exit)`, if one
    /// applies.
    pub fn link_radiant_curve(
        &self,
        link:  LinkId,
        entry: i64,
        exit:  i64,
        cfg:   &ExposureConfig,
    ) -> Option<&TemperatureCurve> {
        let curve = self.network.link(link).radiant_curve?;
        cfg.radiant_applies(entry, exit).then(|| self.curves.get(curve))
    }

    /// Parcel where an activity on `link` takes place.
    pub fn activity_parcel(&self, link: LinkId) -> SpatialResult<ParcelId> {
        self.parcels.parcel_for_link(link, &self.network)
    }

    /// Exposure of a stay at `parcel` over `[start, end)`.
    pub fn parcel_exposure(&self, parcel: ParcelId, start: i64, end: i64) -> f64 {
        self.parcel_curve(parcel).exposure(start as f64, end as f64)
    }

    /// Exposure of a traversal of `link` over `[entry, exit)`.
    pub fn link_exposure(
        &self,
        link:  LinkId,
        entry: i64,
        exit:  i64,
        cfg:   &ExposureConfig,
    ) -> LinkExposure {
        let (a, b) = (entry as f64, exit as f64);
        LinkExposure {
            air:     self.link_air_curve(link).exposure(a, b),
            radiant: self
                .link_radiant_curve(link, entry, exit, cfg)
                .map(|c| c.exposure(a, b)),
        }
    }
}
