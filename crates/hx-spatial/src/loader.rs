//! CSV loaders for the spatial inputs.
//!
//! # Formats
//!
//! ```text
//! sites.csv        curve_id,x,y
//! zones.csv        zone,curve_id
//! nodes.csv        node_id,x,y,zone                  (zone may be empty)
//! links.csv        link_id,from_node,to_node,length,freespeed,capacity,modes,air_curve,radiant_curve
//! parcels.csv      parcel_id,curve_id,x,y            (x,y may be empty)
//! link_parcels.csv link_id,parcel_id
//! routes.csv       person,mode,links,distance        (person may be empty)
//! ```
//!
//! `modes` is a comma-joined mode list (quoted in CSV: `"car,walk"`);
//! `air_curve`/`radiant_curve` may be empty.  Route `links` are
//! space-separated link ids in travel order, start and end link included.
//!
//! Every id a row refers to must already be loaded: curves before sites,
//! nodes before links, links before parcels tables and routes.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use hx_core::{Coord, CurveId, TravelMode};
use hx_thermal::CurveStore;

use crate::join::SpatialJoin;
use crate::network::{LinkSpec, Network, NetworkBuilder};
use crate::parcel::{Parcel, ParcelStoreBuilder};
use crate::route::{Route, RouteBook};
use crate::{SpatialError, SpatialResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SiteRecord {
    curve_id: String,
    x:        f64,
    y:        f64,
}

#[derive(Deserialize)]
struct ZoneRecord {
    zone:     String,
    curve_id: String,
}

#[derive(Deserialize)]
struct NodeRecord {
    node_id: String,
    x:       f64,
    y:       f64,
    zone:    Option<String>,
}

#[derive(Deserialize)]
struct LinkRecord {
    link_id:       String,
    from_node:     String,
    to_node:       String,
    length:        f64,
    freespeed:     f64,
    capacity:      f64,
    modes:         String,
    air_curve:     Option<String>,
    radiant_curve: Option<String>,
}

#[derive(Deserialize)]
struct ParcelRecord {
    parcel_id: String,
    curve_id:  String,
    x:         Option<f64>,
    y:         Option<f64>,
}

#[derive(Deserialize)]
struct LinkParcelRecord {
    link_id:   String,
    parcel_id: String,
}

#[derive(Deserialize)]
struct RouteRecord {
    person:   Option<String>,
    mode:     String,
    links:    String,
    distance: f64,
}

fn rows<R: Read, T: serde::de::DeserializeOwned>(
    reader: R,
) -> impl Iterator<Item = SpatialResult<T>> {
    csv::Reader::from_reader(reader)
        .into_deserialize::<T>()
        .map(|r| r.map_err(|e| SpatialError::Parse(e.to_string())))
}

fn curve(curves: &CurveStore, name: &str) -> SpatialResult<CurveId> {
    Ok(curves.resolve(name)?)
}

// ── Spatial join inputs ───────────────────────────────────────────────────────

/// Add temperature sites to `join`.  Returns the number of rows read.
///
/// Call [`SpatialJoin::build`] once all sites are added.
pub fn load_sites_reader<R: Read>(
    reader: R,
    curves: &CurveStore,
    join:   &mut SpatialJoin,
) -> SpatialResult<usize> {
    let mut n = 0;
    for row in rows::<_, SiteRecord>(reader) {
        let row = row?;
        join.add_site(Coord::new(row.x, row.y), curve(curves, &row.curve_id)?);
        n += 1;
    }
    Ok(n)
}

/// Add zone → curve mappings to `join`.  Returns the number of rows read.
pub fn load_zones_reader<R: Read>(
    reader: R,
    curves: &CurveStore,
    join:   &mut SpatialJoin,
) -> SpatialResult<usize> {
    let mut n = 0;
    for row in rows::<_, ZoneRecord>(reader) {
        let row = row?;
        join.add_zone(row.zone, curve(curves, &row.curve_id)?);
        n += 1;
    }
    Ok(n)
}

// ── Network ───────────────────────────────────────────────────────────────────

/// Load the network from node and link CSV files.
pub fn load_network_csv(
    nodes:  &Path,
    links:  &Path,
    curves: &CurveStore,
    join:   &SpatialJoin,
) -> SpatialResult<Network> {
    load_network_reader(std::fs::File::open(nodes)?, std::fs::File::open(links)?, curves, join)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
pub fn load_network_reader<N: Read, L: Read>(
    nodes:  N,
    links:  L,
    curves: &CurveStore,
    join:   &SpatialJoin,
) -> SpatialResult<Network> {
    let mut b = NetworkBuilder::new();

    for row in rows::<_, NodeRecord>(nodes) {
        let row = row?;
        let zone = row.zone.filter(|z| !z.trim().is_empty());
        b.add_node(row.node_id, Coord::new(row.x, row.y), zone)?;
    }

    for row in rows::<_, LinkRecord>(links) {
        let row = row?;
        let node = |name: &str| {
            b.node_id(name)
                .ok_or_else(|| SpatialError::UnknownNode(name.to_owned()))
        };
        let from = node(&row.from_node)?;
        let to = node(&row.to_node)?;
        let air_curve = optional_curve(curves, row.air_curve.as_deref())?;
        let radiant_curve = optional_curve(curves, row.radiant_curve.as_deref())?;
        b.add_link(LinkSpec {
            name:          row.link_id,
            from,
            to,
            length_m:      row.length,
            freespeed_mps: row.freespeed,
            capacity:      row.capacity,
            modes:         parse_modes(&row.modes),
            air_curve,
            radiant_curve,
        })?;
    }

    b.build(join)
}

fn optional_curve(curves: &CurveStore, name: Option<&str>) -> SpatialResult<Option<CurveId>> {
    match name.map(str::trim).filter(|s| !s.is_empty()) {
        Some(n) => curve(curves, n).map(Some),
        None => Ok(None),
    }
}

/// Split a comma-joined mode list, dropping blanks and duplicates.
fn parse_modes(s: &str) -> Vec<TravelMode> {
    let mut modes: Vec<TravelMode> = Vec::new();
    for tag in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let m = TravelMode::from_tag(tag);
        if !modes.contains(&m) {
            modes.push(m);
        }
    }
    modes
}

// ── Parcels ───────────────────────────────────────────────────────────────────

/// Read parcels.  Returns the builder so link assignments can be added
/// with [`load_link_parcels_reader`] before building.
pub fn load_parcels_reader<R: Read>(
    reader: R,
    curves: &CurveStore,
) -> SpatialResult<ParcelStoreBuilder> {
    let mut b = ParcelStoreBuilder::new();
    for row in rows::<_, ParcelRecord>(reader) {
        let row = row?;
        let coord = match (row.x, row.y) {
            (Some(x), Some(y)) => Some(Coord::new(x, y)),
            _ => None,
        };
        b.add_parcel(Parcel {
            curve: curve(curves, &row.curve_id)?,
            name:  row.parcel_id,
            coord,
        })?;
    }
    Ok(b)
}

/// Read explicit link → parcel assignments into `parcels`.
pub fn load_link_parcels_reader<R: Read>(
    reader:  R,
    network: &Network,
    parcels: &mut ParcelStoreBuilder,
) -> SpatialResult<usize> {
    let mut n = 0;
    for row in rows::<_, LinkParcelRecord>(reader) {
        let row = row?;
        let link = network.resolve_link(&row.link_id)?;
        let parcel = parcels
            .parcel_id(&row.parcel_id)
            .ok_or_else(|| SpatialError::UnknownParcel(row.parcel_id.clone()))?;
        parcels.assign_link(link, parcel);
        n += 1;
    }
    Ok(n)
}

// ── Routes ────────────────────────────────────────────────────────────────────

/// Load matched routes from a CSV file.
pub fn load_routes_csv(path: &Path, network: &Network) -> SpatialResult<RouteBook> {
    load_routes_reader(std::fs::File::open(path)?, network)
}

/// Like [`load_routes_csv`] but accepts any `Read` source.
///
/// A second route for the same person and key is ignored with a warning.
pub fn load_routes_reader<R: Read>(reader: R, network: &Network) -> SpatialResult<RouteBook> {
    let mut book = RouteBook::new();
    for row in rows::<_, RouteRecord>(reader) {
        let row = row?;
        let person = row.person.filter(|p| !p.trim().is_empty());
        let links = row
            .links
            .split_whitespace()
            .map(|l| network.resolve_link(l))
            .collect::<SpatialResult<Vec<_>>>()?;
        if links.is_empty() {
            return Err(SpatialError::EmptyRoute { person: person.unwrap_or_default() });
        }
        let route = Route {
            mode: row.mode.trim().to_owned(),
            links,
            distance_m: row.distance,
        };
        if !book.insert(person.as_deref(), route) {
            tracing::warn!(person = ?person, mode = %row.mode, "duplicate matched route ignored");
        }
    }
    Ok(book)
}
