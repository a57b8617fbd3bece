//! Circuit topology module.
//!
//! This module contains the circuit variants (loop and figure-eight),
//! the geometry types they share, and the distribution of vehicles
//! around a built circuit.

pub mod types;
pub mod figure8;
pub mod ring;
pub mod distribution;

// Re-export key types and functions for easier access
pub use types::{
    DerivedLengths, EdgeStart, NetParam, SegmentMix, Topology, TopologyKind, TopologyParams,
    INNER_SPACE_LEN, JUNCTION_BASE_LEN, JUNCTION_LEN_PER_LANE,
};
pub use figure8::FigureEight;
pub use ring::Ring;
pub use distribution::{edge_at, StartPosition};
