//! Vehicle distribution around the circuit.
//!
//! This module maps absolute circuit positions onto through-edges and
//! spreads the configured vehicles evenly over the part of the circuit
//! not reserved by bunching. With `shuffle` enabled the vehicle order is
//! permuted by a seeded RNG, so placement stays reproducible.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::{PositionSpec, VehicleTypeConfig};
use crate::topology::types::EdgeStart;

/// Seed used when shuffling is requested without an explicit seed
pub const DEFAULT_SHUFFLE_SEED: u64 = 0;

/// Initial placement of one vehicle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartPosition {
    pub vehicle_id: String,
    pub vehicle_type: String,
    pub edge: String,
    /// Distance from the start of `edge`
    pub position: f64,
    pub lane: u32,
}

/// A vehicle to be placed: its id and type name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleSlot {
    pub id: String,
    pub vehicle_type: String,
}

/// Enumerate vehicles as `{type}_{i}`, in type-name order.
pub fn enumerate_vehicles(types: &BTreeMap<String, VehicleTypeConfig>) -> Vec<VehicleSlot> {
    types
        .iter()
        .flat_map(|(name, vehicle_type)| {
            (0..vehicle_type.count).map(move |i| VehicleSlot {
                id: format!("{}_{}", name, i),
                vehicle_type: name.clone(),
            })
        })
        .collect()
}

/// Find the through-edge containing absolute position `x`.
///
/// `x` is wrapped modulo `total_length`. Positions before the first edge's
/// offset belong to the last edge, which wraps around the origin.
/// Returns the edge and the distance from its start, or `None` when there
/// are no edges.
pub fn edge_at(edges: &[EdgeStart], total_length: f64, x: f64) -> Option<(&EdgeStart, f64)> {
    let last = edges.last()?;
    let x = x.rem_euclid(total_length);

    match edges.iter().rev().find(|e| e.offset <= x) {
        Some(edge) => Some((edge, x - edge.offset)),
        None => Some((last, x + total_length - last.offset)),
    }
}

/// Place vehicles evenly over `total_length - bunching`.
///
/// The first vehicle sits at the start of the first through-edge. Every
/// position is computed from its index, not accumulated.
pub fn distribute_evenly(
    edges: &[EdgeStart],
    total_length: f64,
    vehicles: &[VehicleSlot],
    bunching: f64,
    shuffle_seed: Option<u64>,
) -> Vec<StartPosition> {
    let (Some(first), false) = (edges.first(), vehicles.is_empty()) else {
        return Vec::new();
    };

    let mut order: Vec<&VehicleSlot> = vehicles.iter().collect();
    if let Some(seed) = shuffle_seed {
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
        debug!("Shuffled {} vehicles with seed {}", order.len(), seed);
    }

    let increment = (total_length - bunching) / vehicles.len() as f64;
    info!(
        "Distributing {} vehicles over {:.2} of {:.2} (spacing {:.3})",
        vehicles.len(),
        total_length - bunching,
        total_length,
        increment
    );

    order
        .into_iter()
        .enumerate()
        .filter_map(|(i, vehicle)| {
            let x = first.offset + i as f64 * increment;
            edge_at(edges, total_length, x).map(|(edge, position)| StartPosition {
                vehicle_id: vehicle.id.clone(),
                vehicle_type: vehicle.vehicle_type.clone(),
                edge: edge.edge.clone(),
                position,
                lane: 0,
            })
        })
        .collect()
}

/// Assign explicit positions to vehicles in enumeration order.
pub fn assign_explicit(vehicles: &[VehicleSlot], positions: &[PositionSpec]) -> Vec<StartPosition> {
    vehicles
        .iter()
        .zip(positions)
        .map(|(vehicle, spec)| StartPosition {
            vehicle_id: vehicle.id.clone(),
            vehicle_type: vehicle.vehicle_type.clone(),
            edge: spec.edge.clone(),
            position: spec.position,
            lane: spec.lane,
        })
        .collect()
}
