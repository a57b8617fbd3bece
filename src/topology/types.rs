//! Geometry type definitions.
//!
//! This file contains the types shared by every circuit variant: the
//! validated parameter set, the derived segment lengths, edge-start
//! entries, and the `Topology` contract the variants implement.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use crate::topology::figure8::FigureEight;
use crate::topology::ring::Ring;

/// Fixed part of the junction length fit, in meters.
///
/// Empirical: fitted against junctions built by the network generator
/// for one to four lanes.
pub const JUNCTION_BASE_LEN: f64 = 2.9;

/// Per-lane part of the junction length fit, in meters.
///
/// Empirical, same fit as [`JUNCTION_BASE_LEN`].
pub const JUNCTION_LEN_PER_LANE: f64 = 3.3;

/// Tolerance gap inserted between adjacent segments, in meters.
pub const INNER_SPACE_LEN: f64 = 0.28;

/// Names of the geometric fields a variant may require in `net_params`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NetParam {
    RadiusRing,
    Length,
    Lanes,
    SpeedLimit,
    Resolution,
}

impl NetParam {
    /// Key of this field in the `net_params` mapping
    pub fn as_str(&self) -> &'static str {
        match self {
            NetParam::RadiusRing => "radius_ring",
            NetParam::Length => "length",
            NetParam::Lanes => "lanes",
            NetParam::SpeedLimit => "speed_limit",
            NetParam::Resolution => "resolution",
        }
    }
}

impl fmt::Display for NetParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated geometric parameters of a circuit.
///
/// Produced by [`crate::config::NetParams::validate`]; every field is
/// known to be present and positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyParams {
    /// Radius of each ring lobe, in meters
    pub radius_ring: f64,
    /// Number of lanes on every edge
    pub lanes: u32,
    /// Speed limit on every edge, in m/s
    pub speed_limit: f64,
    /// Number of points used to discretize each curved edge
    pub resolution: u32,
    /// Output location for the network description, not interpreted here
    pub net_path: Option<String>,
}

/// Segment lengths derived from a [`TopologyParams`].
///
/// Segment kinds a variant does not contain are zero for that variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedLengths {
    /// Arc length of one quarter-circle ring segment
    pub ring_edgelen: f64,
    /// Length of the straight crossing between two lobes
    pub intersection_len: f64,
    /// Length of one multi-lane junction
    pub junction_len: f64,
    /// Gap inserted between adjacent segments
    pub inner_space_len: f64,
    /// Length of one full traversal of the circuit
    pub total_length: f64,
}

impl DerivedLengths {
    /// Quarter-circle arc length for a ring of the given radius.
    pub fn quarter_arc(radius_ring: f64) -> f64 {
        radius_ring * PI / 2.0
    }

    /// Empirical junction length for the given lane count.
    pub fn junction_for_lanes(lanes: u32) -> f64 {
        JUNCTION_BASE_LEN + JUNCTION_LEN_PER_LANE * f64::from(lanes)
    }

    /// Evaluate a weighted sum of segment lengths in closed form.
    pub fn span(&self, mix: SegmentMix) -> f64 {
        mix.ring_arcs * self.ring_edgelen
            + mix.intersections * self.intersection_len
            + mix.junctions * self.junction_len
            + mix.gaps * self.inner_space_len
    }
}

/// How many of each segment kind lie between the circuit origin and a point.
///
/// Offsets are expressed this way so each one is computed independently
/// from the base lengths instead of by a running sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentMix {
    pub ring_arcs: f64,
    pub intersections: f64,
    pub junctions: f64,
    pub gaps: f64,
}

impl SegmentMix {
    pub const fn new(ring_arcs: f64, intersections: f64, junctions: f64, gaps: f64) -> Self {
        Self {
            ring_arcs,
            intersections,
            junctions,
            gaps,
        }
    }

    /// The same point without its trailing spacing gap.
    pub fn without_gap(self) -> Self {
        Self {
            gaps: self.gaps - 1.0,
            ..self
        }
    }
}

/// Start offset of a named edge, measured along the circuit from its origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStart {
    pub edge: String,
    pub offset: f64,
}

impl EdgeStart {
    pub fn new(edge: impl Into<String>, offset: f64) -> Self {
        Self {
            edge: edge.into(),
            offset,
        }
    }

    /// Internal (junction) edges carry a leading `:` in their identifier
    pub fn is_internal(&self) -> bool {
        self.edge.starts_with(':')
    }
}

/// Capability set every circuit variant provides.
pub trait Topology {
    /// Fields that must be present in `net_params` for this variant
    fn required_parameters(&self) -> &'static [NetParam];

    /// Segment lengths and total circuit length. Pure.
    fn derive_lengths(&self, params: &TopologyParams) -> DerivedLengths;

    /// Through-edges in traversal order.
    fn edge_starts(&self, params: &TopologyParams, lengths: &DerivedLengths) -> Vec<EdgeStart>;

    /// Internal (turn) edges; empty when the variant has no junction geometry.
    fn internal_edge_starts(
        &self,
        params: &TopologyParams,
        lengths: &DerivedLengths,
    ) -> Vec<EdgeStart>;

    /// Intersection connectors; empty when the variant never crosses itself.
    fn intersection_edge_starts(
        &self,
        params: &TopologyParams,
        lengths: &DerivedLengths,
    ) -> Vec<EdgeStart>;
}

/// Circuit variants selectable from configuration.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TopologyKind {
    /// Single ring of four quarter-circle edges
    #[serde(alias = "ring")]
    Loop,
    /// Two ring lobes joined at one crossing intersection
    #[serde(alias = "figure8")]
    FigureEight,
}

impl TopologyKind {
    fn variant(&self) -> &'static dyn Topology {
        match self {
            TopologyKind::Loop => &Ring,
            TopologyKind::FigureEight => &FigureEight,
        }
    }

    /// Human-readable name used in logs and artifacts
    pub fn name(&self) -> &'static str {
        match self {
            TopologyKind::Loop => "loop",
            TopologyKind::FigureEight => "figure_eight",
        }
    }
}

impl Topology for TopologyKind {
    fn required_parameters(&self) -> &'static [NetParam] {
        self.variant().required_parameters()
    }

    fn derive_lengths(&self, params: &TopologyParams) -> DerivedLengths {
        self.variant().derive_lengths(params)
    }

    fn edge_starts(&self, params: &TopologyParams, lengths: &DerivedLengths) -> Vec<EdgeStart> {
        self.variant().edge_starts(params, lengths)
    }

    fn internal_edge_starts(
        &self,
        params: &TopologyParams,
        lengths: &DerivedLengths,
    ) -> Vec<EdgeStart> {
        self.variant().internal_edge_starts(params, lengths)
    }

    fn intersection_edge_starts(
        &self,
        params: &TopologyParams,
        lengths: &DerivedLengths,
    ) -> Vec<EdgeStart> {
        self.variant().intersection_edge_starts(params, lengths)
    }
}
