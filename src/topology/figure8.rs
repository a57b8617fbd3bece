//! Figure-eight circuit geometry.
//!
//! Two ring lobes joined at a single crossing. One traversal covers six
//! quarter-circle ring segments, two intersection crossings, two junction
//! transitions and ten spacing gaps.

use log::debug;

use crate::topology::types::{
    DerivedLengths, EdgeStart, NetParam, SegmentMix, Topology, TopologyParams, INNER_SPACE_LEN,
};

/// Segment composition of one full traversal.
const FULL_CIRCUIT: SegmentMix = SegmentMix::new(6.0, 2.0, 2.0, 10.0);

/// Through-edges in traversal order, with the segments that precede each start.
const THROUGH_EDGES: [(&str, SegmentMix); 10] = [
    ("bottom_lower_ring", SegmentMix::new(0.0, 0.0, 0.0, 1.0)),
    ("right_lower_ring_in", SegmentMix::new(1.0, 0.0, 0.0, 2.0)),
    ("right_lower_ring_out", SegmentMix::new(1.0, 0.5, 1.0, 3.0)),
    ("left_upper_ring", SegmentMix::new(1.0, 1.0, 1.0, 4.0)),
    ("top_upper_ring", SegmentMix::new(2.0, 1.0, 1.0, 5.0)),
    ("right_upper_ring", SegmentMix::new(3.0, 1.0, 1.0, 6.0)),
    ("bottom_upper_ring_in", SegmentMix::new(4.0, 1.0, 1.0, 7.0)),
    ("bottom_upper_ring_out", SegmentMix::new(4.0, 1.5, 2.0, 8.0)),
    ("top_lower_ring", SegmentMix::new(4.0, 2.0, 2.0, 9.0)),
    ("left_lower_ring", SegmentMix::new(5.0, 2.0, 2.0, 10.0)),
];

/// Midpoints of the two crossings of the junction zone.
const FIRST_CROSSING: SegmentMix = SegmentMix::new(1.0, 0.5, 0.0, 3.0);
const SECOND_CROSSING: SegmentMix = SegmentMix::new(4.0, 1.5, 1.0, 8.0);

const REQUIRED: [NetParam; 4] = [
    NetParam::RadiusRing,
    NetParam::Lanes,
    NetParam::SpeedLimit,
    NetParam::Resolution,
];

/// Figure-eight variant of the [`Topology`] contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct FigureEight;

impl Topology for FigureEight {
    fn required_parameters(&self) -> &'static [NetParam] {
        &REQUIRED
    }

    fn derive_lengths(&self, params: &TopologyParams) -> DerivedLengths {
        let mut lengths = DerivedLengths {
            ring_edgelen: DerivedLengths::quarter_arc(params.radius_ring),
            intersection_len: 2.0 * params.radius_ring,
            junction_len: DerivedLengths::junction_for_lanes(params.lanes),
            inner_space_len: INNER_SPACE_LEN,
            total_length: 0.0,
        };
        lengths.total_length = lengths.span(FULL_CIRCUIT);

        debug!(
            "figure-eight lengths: ring={:.4} intersection={:.4} junction={:.4} total={:.4}",
            lengths.ring_edgelen, lengths.intersection_len, lengths.junction_len, lengths.total_length
        );
        lengths
    }

    fn edge_starts(&self, _params: &TopologyParams, lengths: &DerivedLengths) -> Vec<EdgeStart> {
        THROUGH_EDGES
            .iter()
            .map(|(edge, mix)| EdgeStart::new(*edge, lengths.span(*mix)))
            .collect()
    }

    fn internal_edge_starts(
        &self,
        _params: &TopologyParams,
        lengths: &DerivedLengths,
    ) -> Vec<EdgeStart> {
        // Internal edges begin at the junction boundary, one gap before the through-edge.
        THROUGH_EDGES
            .iter()
            .map(|(edge, mix)| EdgeStart::new(format!(":{}", edge), lengths.span(mix.without_gap())))
            .collect()
    }

    fn intersection_edge_starts(
        &self,
        params: &TopologyParams,
        lengths: &DerivedLengths,
    ) -> Vec<EdgeStart> {
        vec![
            EdgeStart::new(
                format!(":center_intersection_{}", u64::from(params.lanes) + 1),
                lengths.span(FIRST_CROSSING),
            ),
            EdgeStart::new(":center_intersection_1", lengths.span(SECOND_CROSSING)),
        ]
    }
}
