//! Scenario construction.
//!
//! A [`Scenario`] is built once from validated parameters and never
//! changes afterwards. It owns the derived geometry, the three edge-start
//! tables and the initial vehicle placement; the network generator and
//! the experiment runner only read from it.

use log::info;
use std::collections::BTreeMap;

use crate::config::{CfgParams, Config, InitialConfig, NetParams, ValidationError, VehicleTypeConfig};
use crate::network::edge_lengths;
use crate::topology::distribution::{
    assign_explicit, distribute_evenly, edge_at, enumerate_vehicles, DEFAULT_SHUFFLE_SEED,
};
use crate::topology::{DerivedLengths, EdgeStart, StartPosition, Topology, TopologyKind, TopologyParams};
use crate::utils::validation::{validate_bunching, validate_explicit_positions, validate_vehicle_types};

/// Immutable circuit scenario
#[derive(Debug, Clone)]
pub struct Scenario {
    name: String,
    kind: TopologyKind,
    params: TopologyParams,
    priority: Option<String>,
    lengths: DerivedLengths,
    edge_starts: Vec<EdgeStart>,
    internal_edge_starts: Vec<EdgeStart>,
    intersection_edge_starts: Vec<EdgeStart>,
    /// All three tables merged and sorted by offset
    total_edge_starts: Vec<EdgeStart>,
    /// Length of every edge, keyed by edge id
    edge_lengths: BTreeMap<String, f64>,
    vehicle_types: BTreeMap<String, VehicleTypeConfig>,
    cfg_params: CfgParams,
    initial_config: InitialConfig,
    initial_positions: Vec<StartPosition>,
}

impl Scenario {
    /// Build a scenario, validating every input first.
    ///
    /// Nothing is returned unless all parameters are valid.
    pub fn new(
        name: impl Into<String>,
        kind: TopologyKind,
        net_params: &NetParams,
        vehicle_types: BTreeMap<String, VehicleTypeConfig>,
        cfg_params: CfgParams,
        initial_config: InitialConfig,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let params = net_params.validate(kind)?;
        validate_vehicle_types(&vehicle_types)?;
        cfg_params.validate()?;
        initial_config.validate()?;

        let lengths = kind.derive_lengths(&params);
        let edge_starts = kind.edge_starts(&params, &lengths);
        let internal_edge_starts = kind.internal_edge_starts(&params, &lengths);
        let intersection_edge_starts = kind.intersection_edge_starts(&params, &lengths);

        let mut total_edge_starts: Vec<EdgeStart> = edge_starts
            .iter()
            .chain(&internal_edge_starts)
            .chain(&intersection_edge_starts)
            .cloned()
            .collect();
        total_edge_starts.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        let edge_lengths = edge_lengths(&edge_starts, &total_edge_starts, lengths.total_length);

        validate_bunching(initial_config.bunching, lengths.total_length)?;
        let vehicles = enumerate_vehicles(&vehicle_types);
        let initial_positions = match &initial_config.positions {
            Some(positions) => {
                validate_explicit_positions(positions, vehicles.len(), &edge_lengths, params.lanes)?;
                assign_explicit(&vehicles, positions)
            }
            None => {
                let seed = initial_config
                    .shuffle
                    .then(|| initial_config.seed.unwrap_or(DEFAULT_SHUFFLE_SEED));
                distribute_evenly(
                    &edge_starts,
                    lengths.total_length,
                    &vehicles,
                    initial_config.bunching,
                    seed,
                )
            }
        };

        info!(
            "Built {} scenario '{}': length {:.4}, {} through / {} internal / {} intersection edges, {} vehicles",
            kind.name(),
            name,
            lengths.total_length,
            edge_starts.len(),
            internal_edge_starts.len(),
            intersection_edge_starts.len(),
            initial_positions.len()
        );

        Ok(Self {
            name,
            kind,
            params,
            priority: net_params.priority.clone(),
            lengths,
            edge_starts,
            internal_edge_starts,
            intersection_edge_starts,
            total_edge_starts,
            edge_lengths,
            vehicle_types,
            cfg_params,
            initial_config,
            initial_positions,
        })
    }

    /// Build a scenario from a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, ValidationError> {
        config.validate()?;
        Self::new(
            config.general.name.clone(),
            config.scenario,
            &config.net_params,
            config.type_params.clone(),
            config.cfg_params.clone(),
            config.initial_config.clone(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TopologyKind {
        self.kind
    }

    pub fn params(&self) -> &TopologyParams {
        &self.params
    }

    /// Junction priority hint, passed through to the generator
    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    pub fn lengths(&self) -> &DerivedLengths {
        &self.lengths
    }

    pub fn total_length(&self) -> f64 {
        self.lengths.total_length
    }

    /// Through-edges in traversal order
    pub fn edge_starts(&self) -> &[EdgeStart] {
        &self.edge_starts
    }

    pub fn internal_edge_starts(&self) -> &[EdgeStart] {
        &self.internal_edge_starts
    }

    pub fn intersection_edge_starts(&self) -> &[EdgeStart] {
        &self.intersection_edge_starts
    }

    /// Every edge of every table, sorted by offset
    pub fn total_edge_starts(&self) -> &[EdgeStart] {
        &self.total_edge_starts
    }

    pub fn vehicle_types(&self) -> &BTreeMap<String, VehicleTypeConfig> {
        &self.vehicle_types
    }

    pub fn cfg_params(&self) -> &CfgParams {
        &self.cfg_params
    }

    pub fn initial_config(&self) -> &InitialConfig {
        &self.initial_config
    }

    pub fn initial_positions(&self) -> &[StartPosition] {
        &self.initial_positions
    }

    /// Length of the named edge, from any of the three tables
    pub fn edge_length(&self, edge: &str) -> Option<f64> {
        self.edge_lengths.get(edge).copied()
    }

    /// Absolute circuit position of `pos` meters along `edge`.
    ///
    /// Looks the edge up in all three tables. Returns `None` for an unknown
    /// edge or a `pos` outside `[0, edge length]`. The last through-edge
    /// runs over the origin, so the result is wrapped into `[0, total_length)`.
    pub fn get_x(&self, edge: &str, pos: f64) -> Option<f64> {
        let length = self.edge_length(edge)?;
        if !(0.0..=length).contains(&pos) {
            return None;
        }
        self.total_edge_starts
            .iter()
            .find(|e| e.edge == edge)
            .map(|e| (e.offset + pos).rem_euclid(self.lengths.total_length))
    }

    /// Through-edge and relative position at absolute position `x`.
    pub fn edge_at(&self, x: f64) -> Option<(&str, f64)> {
        edge_at(&self.edge_starts, self.lengths.total_length, x)
            .map(|(edge, pos)| (edge.edge.as_str(), pos))
    }
}
