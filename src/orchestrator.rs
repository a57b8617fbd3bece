//! Scenario orchestrator.
//!
//! This module coordinates the generation process: building the scenario
//! from a loaded configuration, deriving the network layout, and writing
//! the layout and initial placement artifacts.

use color_eyre::eyre::{eyre, Result, WrapErr};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::network::{build_layout, PlacementRecord};
use crate::scenario::Scenario;

/// File name of the network layout artifact
pub const LAYOUT_FILE: &str = "network.json";

/// File name of the initial placement artifact
pub const POSITIONS_FILE: &str = "initial_positions.json";

/// Directory used when neither the CLI nor `net_params.net_path` names one
pub const DEFAULT_OUTPUT_DIR: &str = "circuit_output";

/// Paths of the files written for one scenario
#[derive(Debug, Clone)]
pub struct GeneratedArtifacts {
    pub layout_path: PathBuf,
    pub positions_path: PathBuf,
}

/// Pick the output directory: explicit override, then `net_path`, then the default.
pub fn resolve_output_dir(scenario: &Scenario, output_override: Option<&Path>) -> PathBuf {
    match (output_override, scenario.params().net_path.as_deref()) {
        (Some(dir), _) => dir.to_path_buf(),
        (None, Some(net_path)) => PathBuf::from(net_path),
        (None, None) => PathBuf::from(DEFAULT_OUTPUT_DIR),
    }
}

/// Build the scenario described by `config` and write its artifacts.
pub fn generate_scenario_artifacts(
    config: &Config,
    output_override: Option<&Path>,
) -> Result<(Scenario, GeneratedArtifacts)> {
    let scenario = Scenario::from_config(config)?;
    let layout = build_layout(&scenario)
        .map_err(|e| eyre!("Scenario '{}' violates the layout contract: {}", scenario.name(), e))?;

    let output_dir = resolve_output_dir(&scenario, output_override);
    fs::create_dir_all(&output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let layout_path = output_dir.join(LAYOUT_FILE);
    let layout_json = serde_json::to_string_pretty(&layout)?;
    fs::write(&layout_path, layout_json)
        .wrap_err_with(|| format!("Failed to write network layout '{}'", layout_path.display()))?;
    info!("Wrote network layout with {} edges to {:?}", layout.edges.len(), layout_path);

    let record = PlacementRecord {
        scenario: scenario.name(),
        start_time: scenario.cfg_params().start_time,
        end_time: scenario.cfg_params().end_time,
        log_level: config.general.log_level.as_deref(),
        vehicles: scenario.initial_positions(),
    };
    let positions_path = output_dir.join(POSITIONS_FILE);
    let positions_json = serde_json::to_string_pretty(&record)?;
    fs::write(&positions_path, positions_json)
        .wrap_err_with(|| format!("Failed to write initial positions '{}'", positions_path.display()))?;
    info!("Wrote {} initial positions to {:?}", record.vehicles.len(), positions_path);

    Ok((
        scenario,
        GeneratedArtifacts {
            layout_path,
            positions_path,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LOOP_YAML: &str = r#"
general:
  name: "ring-22"
scenario: loop
net_params:
  length: 230
  lanes: 1
  speed_limit: 30
  resolution: 40
type_params:
  idm:
    count: 22
    controller:
      model: IDMController
    lane_changer:
      model: StaticLaneChanger
"#;

    #[test]
    fn test_generate_loop_artifacts() {
        let config: Config = serde_yaml::from_str(LOOP_YAML).unwrap();
        let dir = TempDir::new().unwrap();

        let (scenario, artifacts) = generate_scenario_artifacts(&config, Some(dir.path())).unwrap();
        assert_eq!(scenario.initial_positions().len(), 22);

        let layout: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&artifacts.layout_path).unwrap()).unwrap();
        assert_eq!(layout["scenario"], "loop");
        assert_eq!(layout["edges"].as_array().unwrap().len(), 4);
        assert!(layout.get("intersections").is_none());

        let positions: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&artifacts.positions_path).unwrap()).unwrap();
        assert_eq!(positions["vehicles"].as_array().unwrap().len(), 22);
        assert_eq!(positions["end_time"], 3000);
    }

    #[test]
    fn test_output_dir_falls_back_to_net_path() {
        let mut config: Config = serde_yaml::from_str(LOOP_YAML).unwrap();
        config.net_params.net_path = Some("debug/net/".to_string());
        let scenario = Scenario::from_config(&config).unwrap();

        assert_eq!(resolve_output_dir(&scenario, None), PathBuf::from("debug/net/"));
        assert_eq!(
            resolve_output_dir(&scenario, Some(Path::new("elsewhere"))),
            PathBuf::from("elsewhere")
        );
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let mut config: Config = serde_yaml::from_str(LOOP_YAML).unwrap();
        config.net_params.length = None;
        let dir = TempDir::new().unwrap();

        let err = generate_scenario_artifacts(&config, Some(dir.path())).unwrap_err();
        assert!(err.to_string().contains("length"));
    }
}
