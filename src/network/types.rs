//! Network layout type definitions.
//!
//! These structures are the generator's view of a scenario: every edge
//! with its start offset and length, plus the circuit-wide attributes a
//! network description needs. They are serialized to JSON as-is.

use serde::Serialize;

use crate::topology::{StartPosition, TopologyKind};

/// One edge of the network description
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EdgeSegment {
    /// Edge identifier
    pub id: String,
    /// Offset of the edge start along the circuit
    pub start: f64,
    /// Edge length, when implied by the tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

/// Complete network description of a circuit.
///
/// `edges` partitions the circuit: each through-edge runs up to the next
/// one's start, and the last wraps around to the first.
#[derive(Serialize, Debug, Clone)]
pub struct NetworkLayout {
    /// Scenario name
    pub name: String,
    /// Circuit variant
    pub scenario: TopologyKind,
    /// Length of one traversal
    pub total_length: f64,
    /// Ring radius the curves are drawn with
    pub radius_ring: f64,
    /// Lanes per edge
    pub lanes: u32,
    /// Speed limit on every edge
    pub speed_limit: f64,
    /// Points per curved edge
    pub resolution: u32,
    /// Junction priority hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Through-edges in traversal order
    pub edges: Vec<EdgeSegment>,
    /// Internal (turn) edges
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub internal_edges: Vec<EdgeSegment>,
    /// Intersection connectors
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub intersections: Vec<EdgeSegment>,
}

/// Initial placement artifact consumed by the experiment runner
#[derive(Serialize, Debug)]
pub struct PlacementRecord<'a> {
    pub scenario: &'a str,
    pub start_time: u64,
    pub end_time: u64,
    /// Log level requested for the experiment run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<&'a str>,
    pub vehicles: &'a [StartPosition],
}
