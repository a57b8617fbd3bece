//! # Network Layout Module
//!
//! Turns a built [`Scenario`] into a [`NetworkLayout`], the input of the
//! network-file generator. The through-edge table must partition the
//! circuit exactly: every segment positive, the segment lengths summing to
//! the circuit length, and the last segment ending where the first begins.
//! The layout is checked against that contract before it is returned.
//!
//! ## Example Layout
//!
//! ```json
//! {
//!   "name": "figure8-single-lane",
//!   "scenario": "figure_eight",
//!   "total_length": 283.6955592153876,
//!   "edges": [
//!     { "id": "bottom_lower_ring", "start": 0.28, "length": 31.69592653589793 },
//!     ...
//!   ]
//! }
//! ```

pub mod types;

pub use types::{EdgeSegment, NetworkLayout, PlacementRecord};

use log::debug;
use std::collections::BTreeMap;

use crate::scenario::Scenario;
use crate::topology::EdgeStart;

/// Relative tolerance when comparing summed segment lengths to the total
const PARTITION_TOLERANCE: f64 = 1e-9;

/// Violations of the partition contract
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("circuit has no through-edges")]
    Empty,
    #[error("edge '{edge}' has invalid length {length}")]
    InvalidSegment { edge: String, length: f64 },
    #[error("segment lengths sum to {sum}, circuit length is {total}")]
    LengthMismatch { sum: f64, total: f64 },
}

/// Segments implied by consecutive offsets, wrapping at `total_length`.
pub fn partition(edges: &[EdgeStart], total_length: f64) -> Vec<EdgeSegment> {
    let Some(first) = edges.first() else {
        return Vec::new();
    };

    edges
        .iter()
        .enumerate()
        .map(|(i, edge)| {
            let end = match edges.get(i + 1) {
                Some(next) => next.offset,
                None => first.offset + total_length,
            };
            EdgeSegment {
                id: edge.edge.clone(),
                start: edge.offset,
                length: Some(end - edge.offset),
            }
        })
        .collect()
}

/// Check that `segments` cover a circuit of `total_length` exactly once.
pub fn check_partition(segments: &[EdgeSegment], total_length: f64) -> Result<(), LayoutError> {
    if segments.is_empty() {
        return Err(LayoutError::Empty);
    }

    let mut sum = 0.0;
    for segment in segments {
        let length = segment.length.unwrap_or(0.0);
        if !length.is_finite() || length <= 0.0 {
            return Err(LayoutError::InvalidSegment {
                edge: segment.id.clone(),
                length,
            });
        }
        sum += length;
    }

    if !sum.is_finite()
        || !total_length.is_finite()
        || (sum - total_length).abs() > PARTITION_TOLERANCE * total_length.max(1.0)
    {
        return Err(LayoutError::LengthMismatch {
            sum,
            total: total_length,
        });
    }
    Ok(())
}

/// Length of every edge of a circuit, keyed by edge id.
///
/// Through-edges run to the next through-edge, as in [`partition`].
/// Internal and intersection edges run to the next entry of the merged,
/// offset-sorted table `total_edge_starts`, the last one wrapping around.
pub fn edge_lengths(
    edge_starts: &[EdgeStart],
    total_edge_starts: &[EdgeStart],
    total_length: f64,
) -> BTreeMap<String, f64> {
    let mut lengths: BTreeMap<String, f64> = partition(total_edge_starts, total_length)
        .into_iter()
        .filter_map(|segment| segment.length.map(|length| (segment.id, length)))
        .collect();
    for segment in partition(edge_starts, total_length) {
        if let Some(length) = segment.length {
            lengths.insert(segment.id, length);
        }
    }
    lengths
}

/// Internal edges run from their own start to their through-edge's start.
fn internal_segments(scenario: &Scenario) -> Vec<EdgeSegment> {
    scenario
        .internal_edge_starts()
        .iter()
        .zip(scenario.edge_starts())
        .map(|(internal, through)| EdgeSegment {
            id: internal.edge.clone(),
            start: internal.offset,
            length: Some(through.offset - internal.offset),
        })
        .collect()
}

/// Build the network layout of a scenario.
pub fn build_layout(scenario: &Scenario) -> Result<NetworkLayout, LayoutError> {
    let total_length = scenario.total_length();
    let edges = partition(scenario.edge_starts(), total_length);
    check_partition(&edges, total_length)?;

    for segment in &edges {
        debug!("edge {:<24} start {:>10.4} length {:>10.4}", segment.id, segment.start, segment.length.unwrap_or(0.0));
    }

    let intersections = scenario
        .intersection_edge_starts()
        .iter()
        .map(|e| EdgeSegment {
            id: e.edge.clone(),
            start: e.offset,
            length: None,
        })
        .collect();

    let params = scenario.params();
    Ok(NetworkLayout {
        name: scenario.name().to_string(),
        scenario: scenario.kind(),
        total_length,
        radius_ring: params.radius_ring,
        lanes: params.lanes,
        speed_limit: params.speed_limit,
        resolution: params.resolution,
        priority: scenario.priority().map(str::to_string),
        edges,
        internal_edges: internal_segments(scenario),
        intersections,
    })
}
