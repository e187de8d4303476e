//! Network representation and builder.
//!
//! # Data layout
//!
//! Nodes and links live in flat `Vec`s indexed by [`NodeId`] / [`LinkId`];
//! links refer to their end nodes by id, so a node shared by many links is
//! stored once.  External string ids are kept on each record and interned in
//! a name → id map for lookups from event logs and route tables.
//!
//! The network is immutable once built.  Per-link exposure accumulators
//! live in a separate store owned by the aggregation pass.

use std::collections::HashMap;

use hx_core::{Coord, CurveId, LinkId, NodeId, TravelMode};

use crate::join::SpatialJoin;
use crate::{SpatialError, SpatialResult};

// ── Records ───────────────────────────────────────────────────────────────────

/// A network node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub name:  String,
    pub coord: Coord,
    pub zone:  Option<String>,
    /// Curve assigned by the spatial join; `None` if neither a zone mapping
    /// nor a site matched.
    pub curve: Option<CurveId>,
}

/// A directed network link.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub name:          String,
    pub from:          NodeId,
    pub to:            NodeId,
    pub length_m:      f64,
    pub freespeed_mps: f64,
    pub capacity:      f64,
    pub modes:         Vec<TravelMode>,
    pub air_curve:     CurveId,
    pub radiant_curve: Option<CurveId>,
}

impl Link {
    pub fn allows(&self, mode: TravelMode) -> bool {
        self.modes.contains(&mode)
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// Nodes, links, and their curve bindings.  Construct with [`NetworkBuilder`].
#[derive(Debug)]
pub struct Network {
    nodes:        Vec<Node>,
    links:        Vec<Link>,
    node_by_name: HashMap<String, NodeId>,
    link_by_name: HashMap<String, LinkId>,
}

impl Network {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id.index()]
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_by_name.get(name).copied()
    }

    pub fn link_id(&self, name: &str) -> Option<LinkId> {
        self.link_by_name.get(name).copied()
    }

    /// Look up a link by external id; unknown ids are a data-integrity error.
    pub fn resolve_link(&self, name: &str) -> SpatialResult<LinkId> {
        self.link_id(name)
            .ok_or_else(|| SpatialError::UnknownLink(name.to_owned()))
    }

    pub fn links(&self) -> impl Iterator<Item = (LinkId, &Link)> {
        self.links
            .iter()
            .enumerate()
            .map(|(i, l)| (LinkId(i as u32), l))
    }

    /// Position of the link's terminal node, where an activity on that link
    /// takes place.
    pub fn link_end_coord(&self, id: LinkId) -> Coord {
        self.node(self.link(id).to).coord
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Everything needed to add a link.  Curves left `None` are filled in by
/// [`NetworkBuilder::build`] (air) or stay unbound (radiant).
#[derive(Clone, Debug)]
pub struct LinkSpec {
    pub name:          String,
    pub from:          NodeId,
    pub to:            NodeId,
    pub length_m:      f64,
    pub freespeed_mps: f64,
    pub capacity:      f64,
    pub modes:         Vec<TravelMode>,
    pub air_curve:     Option<CurveId>,
    pub radiant_curve: Option<CurveId>,
}

impl LinkSpec {
    /// A link open to all modes with only the geometry filled in.
    pub fn new(name: impl Into<String>, from: NodeId, to: NodeId, length_m: f64) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            length_m,
            freespeed_mps: 13.9,
            capacity:      600.0,
            modes:         vec![TravelMode::Car, TravelMode::Walk, TravelMode::Bike],
            air_curve:     None,
            radiant_curve: None,
        }
    }
}

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use hx_core::Coord;
/// use hx_spatial::{LinkSpec, NetworkBuilder, SpatialJoin};
/// use hx_thermal::{CurveStore, TemperatureCurve};
///
/// let mut curves = CurveStore::new();
/// let c = curves.insert(TemperatureCurve::constant("g0", 30.0).unwrap()).unwrap();
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_node("a", Coord::new(0.0, 0.0), None).unwrap();
/// let z = b.add_node("z", Coord::new(100.0, 0.0), None).unwrap();
/// b.add_link(LinkSpec::new("az", a, z, 100.0)).unwrap();
///
/// let mut join = SpatialJoin::new();
/// join.add_site(Coord::new(50.0, 0.0), c);
/// let net = b.build(&join.build()).unwrap();
/// assert_eq!(net.link(net.resolve_link("az").unwrap()).air_curve, c);
/// ```
#[derive(Default)]
pub struct NetworkBuilder {
    nodes:        Vec<(String, Coord, Option<String>)>,
    links:        Vec<LinkSpec>,
    node_by_name: HashMap<String, NodeId>,
    link_by_name: HashMap<String, LinkId>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id (sequential from 0).
    pub fn add_node(
        &mut self,
        name:  impl Into<String>,
        coord: Coord,
        zone:  Option<String>,
    ) -> SpatialResult<NodeId> {
        let name = name.into();
        if self.node_by_name.contains_key(&name) {
            return Err(SpatialError::Duplicate { kind: "node", name });
        }
        let id = NodeId(self.nodes.len() as u32);
        self.node_by_name.insert(name.clone(), id);
        self.nodes.push((name, coord, zone));
        Ok(id)
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_by_name.get(name).copied()
    }

    /// Add a directed link and return its id (sequential from 0).
    ///
    /// The length must be finite and non-negative: route apportionment
    /// relies on it to keep event times monotonic.
    pub fn add_link(&mut self, spec: LinkSpec) -> SpatialResult<LinkId> {
        if self.link_by_name.contains_key(&spec.name) {
            return Err(SpatialError::Duplicate { kind: "link", name: spec.name });
        }
        if !(spec.length_m.is_finite() && spec.length_m >= 0.0) {
            return Err(SpatialError::InvalidLength { link: spec.name, length: spec.length_m });
        }
        for end in [spec.from, spec.to] {
            if end.index() >= self.nodes.len() {
                return Err(SpatialError::UnknownNode(end.to_string()));
            }
        }
        let id = LinkId(self.links.len() as u32);
        self.link_by_name.insert(spec.name.clone(), id);
        self.links.push(spec);
        Ok(id)
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn link_count(&self) -> usize { self.links.len() }

    /// Run the spatial join over all nodes, bind each link's air curve, and
    /// produce the [`Network`].
    ///
    /// # Errors
    ///
    /// [`SpatialError::NoCurveForNode`] if a link without an explicit air
    /// curve starts at a node the join could not place.
    pub fn build(self, join: &SpatialJoin) -> SpatialResult<Network> {
        let nodes: Vec<Node> = self
            .nodes
            .into_iter()
            .map(|(name, coord, zone)| {
                let curve = join.curve_for(coord, zone.as_deref());
                Node { name, coord, zone, curve }
            })
            .collect();

        let links = self
            .links
            .into_iter()
            .map(|spec| {
                let source = &nodes[spec.from.index()];
                let air_curve = match spec.air_curve.or(source.curve) {
                    Some(c) => c,
                    None => return Err(SpatialError::NoCurveForNode(source.name.clone())),
                };
                Ok(Link {
                    name:          spec.name,
                    from:          spec.from,
                    to:            spec.to,
                    length_m:      spec.length_m,
                    freespeed_mps: spec.freespeed_mps,
                    capacity:      spec.capacity,
                    modes:         spec.modes,
                    air_curve,
                    radiant_curve: spec.radiant_curve,
                })
            })
            .collect::<SpatialResult<Vec<Link>>>()?;

        tracing::debug!(nodes = nodes.len(), links = links.len(), "network built");

        Ok(Network {
            nodes,
            links,
            node_by_name: self.node_by_name,
            link_by_name: self.link_by_name,
        })
    }
}
