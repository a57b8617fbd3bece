//! Single-ring (loop) circuit geometry.

use log::debug;
use std::f64::consts::PI;

use crate::topology::types::{
    DerivedLengths, EdgeStart, NetParam, SegmentMix, Topology, TopologyParams,
};

const EDGES: [(&str, SegmentMix); 4] = [
    ("bottom", SegmentMix::new(0.0, 0.0, 0.0, 0.0)),
    ("right", SegmentMix::new(1.0, 0.0, 0.0, 0.0)),
    ("top", SegmentMix::new(2.0, 0.0, 0.0, 0.0)),
    ("left", SegmentMix::new(3.0, 0.0, 0.0, 0.0)),
];

const REQUIRED: [NetParam; 4] = [
    NetParam::Length,
    NetParam::Lanes,
    NetParam::SpeedLimit,
    NetParam::Resolution,
];

/// Radius of a ring with the given circumference.
pub fn radius_for_length(length: f64) -> f64 {
    length / (2.0 * PI)
}

/// Loop variant of the [`Topology`] contract: four quarter arcs, no junctions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ring;

impl Topology for Ring {
    fn required_parameters(&self) -> &'static [NetParam] {
        &REQUIRED
    }

    fn derive_lengths(&self, params: &TopologyParams) -> DerivedLengths {
        let ring_edgelen = DerivedLengths::quarter_arc(params.radius_ring);
        debug!("loop lengths: ring={:.4} total={:.4}", ring_edgelen, 4.0 * ring_edgelen);
        DerivedLengths {
            ring_edgelen,
            intersection_len: 0.0,
            junction_len: 0.0,
            inner_space_len: 0.0,
            total_length: 4.0 * ring_edgelen,
        }
    }

    fn edge_starts(&self, _params: &TopologyParams, lengths: &DerivedLengths) -> Vec<EdgeStart> {
        EDGES
            .iter()
            .map(|(edge, mix)| EdgeStart::new(*edge, lengths.span(*mix)))
            .collect()
    }

    fn internal_edge_starts(
        &self,
        _params: &TopologyParams,
        _lengths: &DerivedLengths,
    ) -> Vec<EdgeStart> {
        Vec::new()
    }

    fn intersection_edge_starts(
        &self,
        _params: &TopologyParams,
        _lengths: &DerivedLengths,
    ) -> Vec<EdgeStart> {
        Vec::new()
    }
}
