//! `hx-spatial`: where things are, and which temperature curve applies there.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `Network`, `Node`, `Link`, `NetworkBuilder`, `LinkSpec`     |
//! | [`join`]    | `SpatialJoin`: node → curve by zone or nearest site (R-tree) |
//! | [`parcel`]  | `Parcel`, `ParcelStore`, `ParcelStoreBuilder`               |
//! | [`route`]   | `Route`, `RouteKey`, `RouteBook`                            |
//! | [`index`]   | `ThermalIndex`, `LinkExposure`                              |
//! | [`loader`]  | CSV loaders for nodes, links, sites, zones, parcels, routes |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Curve binding
//!
//! Every link has an air curve and optionally a radiant curve.  A link row
//! may name its air curve; otherwise the link inherits the curve its source
//! node received from the [`SpatialJoin`].  Radiant curves are never
//! inferred.

pub mod error;
pub mod index;
pub mod join;
pub mod loader;
pub mod network;
pub mod parcel;
pub mod route;


pub use error::{SpatialError, SpatialResult};
pub use index::{LinkExposure, ThermalIndex};
pub use join::SpatialJoin;
pub use loader::{
    load_link_parcels_reader, load_network_csv, load_network_reader, load_parcels_reader,
    load_routes_csv, load_routes_reader, load_sites_reader, load_zones_reader,
};
pub use network::{Link, LinkSpec, Network, NetworkBuilder, Node};
pub use parcel::{Parcel, ParcelStore, ParcelStoreBuilder};
pub use route::{Route, RouteBook, RouteKey};
