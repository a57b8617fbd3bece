use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::topology::ring::radius_for_length;
use crate::topology::{NetParam, Topology, TopologyKind, TopologyParams};
use crate::utils::validation::{
    check_count, check_positive_real, validate_vehicle_types, ParamError,
};

/// Scenario configuration as read from YAML
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub general: GeneralConfig,
    /// Circuit variant to build
    pub scenario: TopologyKind,
    pub net_params: NetParams,
    /// Vehicle types keyed by name, passed through to the environment
    #[serde(default)]
    pub type_params: BTreeMap<String, VehicleTypeConfig>,
    #[serde(default)]
    pub cfg_params: CfgParams,
    #[serde(default)]
    pub initial_config: InitialConfig,
}

impl Config {
    /// Validate the configuration
    ///
    /// Geometry problems are reported together; the remaining sections
    /// are checked only once the geometry is sound.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.general.name.trim().is_empty() {
            return Err(ValidationError::InvalidGeneral(
                "name cannot be empty".to_string(),
            ));
        }

        self.net_params.validate(self.scenario)?;
        validate_vehicle_types(&self.type_params)?;
        self.cfg_params.validate()?;
        self.initial_config.validate()?;

        Ok(())
    }

    /// Total number of vehicles across all vehicle types
    pub fn vehicle_count(&self) -> usize {
        self.type_params.values().map(|t| t.count as usize).sum()
    }
}

/// General scenario settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeneralConfig {
    /// Scenario name, used for artifact file names
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Raw network parameters.
///
/// Every field is optional here; which ones are required depends on the
/// circuit variant and is checked by [`NetParams::validate`].
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NetParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_ring: Option<f64>,
    /// Circumference of a loop circuit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lanes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<u32>,
    /// Junction priority hint for the generator, passed through
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_path: Option<String>,
}

impl NetParams {
    /// Validate against the fields `kind` requires.
    ///
    /// All missing or invalid fields are collected into a single
    /// [`ValidationError::InvalidNetParams`]. Values that pass every field
    /// check but make the derived circuit length overflow are rejected too.
    pub fn validate(&self, kind: TopologyKind) -> Result<TopologyParams, ValidationError> {
        // The field setting the circuit's scale comes first, as in `required_parameters`.
        let (scale_param, scale_value) = match kind {
            TopologyKind::FigureEight => (NetParam::RadiusRing, self.radius_ring),
            TopologyKind::Loop => (NetParam::Length, self.length),
        };

        let mut problems = Vec::new();
        let scale = keep(check_positive_real(scale_param, scale_value), &mut problems);
        let lanes = keep(check_count(NetParam::Lanes, self.lanes), &mut problems);
        let speed_limit = keep(check_positive_real(NetParam::SpeedLimit, self.speed_limit), &mut problems);
        let resolution = keep(check_count(NetParam::Resolution, self.resolution), &mut problems);

        let (Some(scale), Some(lanes), Some(speed_limit), Some(resolution)) =
            (scale, lanes, speed_limit, resolution)
        else {
            return Err(ValidationError::InvalidNetParams(problems));
        };

        if kind == TopologyKind::Loop && self.radius_ring.is_some() {
            log::warn!("radius_ring is ignored for loop circuits; it is derived from length");
        }

        let radius_ring = match kind {
            TopologyKind::FigureEight => scale,
            TopologyKind::Loop => radius_for_length(scale),
        };
        let params = TopologyParams {
            radius_ring,
            lanes,
            speed_limit,
            resolution,
            net_path: self.net_path.clone(),
        };

        if !kind.derive_lengths(&params).total_length.is_finite() {
            return Err(ValidationError::InvalidNetParams(vec![ParamError::Overflow {
                param: scale_param,
                value: scale,
            }]));
        }
        Ok(params)
    }
}

/// Record a field problem, keeping the value when there is none
fn keep<T>(checked: Result<T, ParamError>, problems: &mut Vec<ParamError>) -> Option<T> {
    checked.map_err(|problem| problems.push(problem)).ok()
}

/// Behavior model reference, e.g. a car-following or lane-change controller
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModelSpec {
    pub model: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f64>,
}

/// One vehicle type. Interpreted by the environment, not by the geometry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VehicleTypeConfig {
    pub count: u32,
    pub controller: ModelSpec,
    pub lane_changer: ModelSpec,
    #[serde(default)]
    pub extra: f64,
}

/// Simulation window, passed through to the experiment runner
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CfgParams {
    #[serde(default)]
    pub start_time: u64,
    pub end_time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_path: Option<String>,
}

impl CfgParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end_time <= self.start_time {
            return Err(ValidationError::InvalidCfgParams(format!(
                "end_time ({}) must be after start_time ({})",
                self.end_time, self.start_time
            )));
        }
        Ok(())
    }
}

/// Explicit start position for one vehicle
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PositionSpec {
    pub edge: String,
    pub position: f64,
    #[serde(default)]
    pub lane: u32,
}

/// Initial vehicle placement settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct InitialConfig {
    /// Shuffle vehicle order over the generated positions
    #[serde(default)]
    pub shuffle: bool,
    /// Length of circuit left empty behind the last vehicle
    #[serde(default)]
    pub bunching: f64,
    /// Seed for the shuffle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Explicit positions, one per vehicle, replacing the generated ones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<PositionSpec>>,
}

impl InitialConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.bunching.is_finite() || self.bunching < 0.0 {
            return Err(ValidationError::InvalidInitialConfig(format!(
                "bunching must be a non-negative number, got {}",
                self.bunching
            )));
        }
        if let Some(positions) = &self.positions {
            if let Some(bad) = positions.iter().find(|p| !p.position.is_finite() || p.position < 0.0) {
                return Err(ValidationError::InvalidInitialConfig(format!(
                    "position {} on edge '{}' must be a non-negative number",
                    bad.position, bad.edge
                )));
            }
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid net_params: {}", join_problems(.0))]
    InvalidNetParams(Vec<ParamError>),
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid vehicle type '{name}': {reason}")]
    InvalidVehicleType { name: String, reason: String },
    #[error("Invalid cfg_params: {0}")]
    InvalidCfgParams(String),
    #[error("Invalid initial configuration: {0}")]
    InvalidInitialConfig(String),
}

impl ValidationError {
    /// Net parameters named by this error, in the order they were checked
    pub fn fields(&self) -> Vec<NetParam> {
        match self {
            ValidationError::InvalidNetParams(problems) => {
                problems.iter().map(ParamError::param).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn join_problems(problems: &[ParamError]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            name: "circuit".to_string(),
            log_level: Some("info".to_string()),
        }
    }
}

impl Default for CfgParams {
    fn default() -> Self {
        Self {
            start_time: 0,
            end_time: 3000,
            cfg_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIGURE8_YAML: &str = r#"
general:
  name: "figure8-single-lane"
  log_level: info
scenario: figure_eight
net_params:
  radius_ring: 20
  lanes: 1
  speed_limit: 35
  resolution: 40
  priority: top_bottom
  net_path: "debug/net/"
type_params:
  idm:
    count: 14
    controller:
      model: IDMController
    lane_changer:
      model: StaticLaneChanger
cfg_params:
  start_time: 0
  end_time: 3000
  cfg_path: "debug/cfg/"
initial_config:
  shuffle: false
  bunching: 20
"#;

    #[test]
    fn test_figure8_config_parsing() {
        let config: Config = serde_yaml::from_str(FIGURE8_YAML).unwrap();
        assert_eq!(config.scenario, TopologyKind::FigureEight);
        assert_eq!(config.net_params.radius_ring, Some(20.0));
        assert_eq!(config.net_params.priority.as_deref(), Some("top_bottom"));
        assert_eq!(config.vehicle_count(), 14);
        assert_eq!(config.type_params["idm"].extra, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_net_params_validate_builds_typed_params() {
        let net = NetParams {
            radius_ring: Some(30.0),
            lanes: Some(2),
            speed_limit: Some(25.0),
            resolution: Some(40),
            net_path: Some("net/".to_string()),
            ..NetParams::default()
        };
        let params = net.validate(TopologyKind::FigureEight).unwrap();
        assert_eq!(params.radius_ring, 30.0);
        assert_eq!(params.lanes, 2);
        assert_eq!(params.net_path.as_deref(), Some("net/"));
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let net = NetParams {
            lanes: Some(1),
            speed_limit: Some(30.0),
            ..NetParams::default()
        };
        let err = net.validate(TopologyKind::FigureEight).unwrap_err();
        assert_eq!(err.fields(), vec![NetParam::RadiusRing, NetParam::Resolution]);
        let msg = err.to_string();
        assert!(msg.contains("radius_ring"));
        assert!(msg.contains("resolution"));
    }

    #[test]
    fn test_invalid_values_reported_with_missing() {
        let net = NetParams {
            radius_ring: Some(-5.0),
            lanes: Some(0),
            speed_limit: Some(f64::NAN),
            ..NetParams::default()
        };
        let err = net.validate(TopologyKind::FigureEight).unwrap_err();
        match &err {
            ValidationError::InvalidNetParams(problems) => {
                assert_eq!(problems.len(), 4);
                assert!(matches!(problems[0], ParamError::NotPositive { param: NetParam::RadiusRing, .. }));
                assert!(matches!(problems[1], ParamError::NotPositive { param: NetParam::Lanes, .. }));
                assert!(matches!(problems[2], ParamError::NotFinite { param: NetParam::SpeedLimit, .. }));
                assert_eq!(problems[3], ParamError::Missing(NetParam::Resolution));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_loop_requires_length_not_radius() {
        let net = NetParams {
            radius_ring: Some(20.0),
            lanes: Some(1),
            speed_limit: Some(30.0),
            resolution: Some(40),
            ..NetParams::default()
        };
        let err = net.validate(TopologyKind::Loop).unwrap_err();
        assert_eq!(err.fields(), vec![NetParam::Length]);

        let net = NetParams {
            length: Some(230.0),
            ..net
        };
        let params = net.validate(TopologyKind::Loop).unwrap();
        assert!((params.radius_ring * 2.0 * std::f64::consts::PI - 230.0).abs() < 1e-9);
    }

    #[test]
    fn test_circuit_length_overflow_rejected() {
        let net = NetParams {
            radius_ring: Some(1e308),
            lanes: Some(1),
            speed_limit: Some(30.0),
            resolution: Some(40),
            ..NetParams::default()
        };
        let err = net.validate(TopologyKind::FigureEight).unwrap_err();
        assert_eq!(err.fields(), vec![NetParam::RadiusRing]);
        assert!(err.to_string().contains("overflow"), "{err}");

        // Large but representable circuits still validate.
        let net = NetParams {
            radius_ring: Some(1e300),
            ..net
        };
        assert!(net.validate(TopologyKind::FigureEight).is_ok());
    }

    #[test]
    fn test_cfg_window_validation() {
        let cfg = CfgParams {
            start_time: 100,
            end_time: 100,
            cfg_path: None,
        };
        assert!(matches!(cfg.validate(), Err(ValidationError::InvalidCfgParams(_))));
        assert!(CfgParams::default().validate().is_ok());
    }

    #[test]
    fn test_initial_config_validation() {
        let initial = InitialConfig {
            bunching: -1.0,
            ..InitialConfig::default()
        };
        assert!(initial.validate().is_err());

        let initial = InitialConfig {
            positions: Some(vec![PositionSpec {
                edge: "top".to_string(),
                position: -3.0,
                lane: 0,
            }]),
            ..InitialConfig::default()
        };
        assert!(initial.validate().is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut config: Config = serde_yaml::from_str(FIGURE8_YAML).unwrap();
        config.general.name = "  ".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidGeneral(_))));
    }
}
