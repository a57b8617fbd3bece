//! # Circuitnet - Scenario geometry for ring and figure-eight traffic circuits
//!
//! This library derives the geometry of synthetic closed-loop road
//! circuits used in traffic-control experiments, and exposes it as
//! ordered edge-start tables for a network-file generator and for initial
//! vehicle placement.
//!
//! ## Overview
//!
//! A circuit is described by a handful of physical parameters (ring
//! radius or circumference, lane count, speed limit, curve resolution).
//! From these the library computes every segment length and the offset at
//! which each named edge starts along the circuit. All geometry is pure
//! arithmetic, computed once when a [`scenario::Scenario`] is built.
//!
//! ## Circuit Variants
//!
//! - **Loop**: one ring of four quarter-circle edges
//! - **Figure-eight**: two ring lobes joined at a crossing, ten through-edges,
//!   ten internal junction edges and two intersection connectors
//!
//! ## Architecture
//!
//! - `config`: Typed YAML configuration and its validation
//! - `config_loader`: Configuration file loading and CLI overrides
//! - `topology`: Circuit variants, derived lengths, edge-start tables, vehicle distribution
//! - `scenario`: The immutable scenario aggregate and position lookups
//! - `network`: Network layout derivation and partition checks
//! - `orchestrator`: Artifact generation for a configuration
//! - `utils`: Validation helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use circuitnet::{config_loader, orchestrator};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("figure8.yaml"))?;
//! let (scenario, artifacts) = orchestrator::generate_scenario_artifacts(&config, None)?;
//!
//! println!("circuit length {:.2}", scenario.total_length());
//! println!("layout written to {:?}", artifacts.layout_path);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! general:
//!   name: "figure8-single-lane"
//! scenario: figure_eight      # or: loop
//! net_params:
//!   radius_ring: 20           # loop circuits take `length` instead
//!   lanes: 1
//!   speed_limit: 35
//!   resolution: 40
//! type_params:
//!   idm:
//!     count: 14
//!     controller: { model: IDMController }
//!     lane_changer: { model: StaticLaneChanger }
//! initial_config:
//!   bunching: 20
//! ```
//!
//! ## Error Handling
//!
//! Library validation returns typed [`config::ValidationError`]s naming
//! every missing or invalid field at once. File loading and artifact
//! generation use `color_eyre` for context-rich reports.

pub mod config;
pub mod config_loader;
pub mod topology;
pub mod scenario;
pub mod network;
pub mod orchestrator;
pub mod utils;
