use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    info!("Detected {} scenario '{}'", config.scenario.name(), config.general.name);

    config.validate()?;

    Ok(config)
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub lanes: Option<u32>,
    pub seed: Option<u64>,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(lanes) = overrides.lanes {
        info!("Overriding lane count: {}", lanes);
        config.net_params.lanes = Some(lanes);
    }

    if let Some(seed) = overrides.seed {
        info!("Overriding placement seed: {}", seed);
        config.initial_config.seed = Some(seed);
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
