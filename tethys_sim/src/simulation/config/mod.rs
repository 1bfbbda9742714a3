// tethys_sim/src/simulation/config/mod.rs

//! Loading and validating scenario files.

pub mod structs;

use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use structs::{ScenarioConfig, SimulationConfig};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] Box<figment::Error>),
    #[error("failed to parse plugin element: {0}")]
    Element(#[from] toml::de::Error),
    #[error("simulation step size must be greater than zero")]
    ZeroStep,
}

impl ScenarioConfig {
    /// Reads and validates the scenario at `path`.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        if !path.is_file() {
            return Err(ScenarioError::NotFound(path.to_path_buf()));
        }
        tracing::info!("Loading scenario from: {}", path.display());
        Self::extract(Figment::new().merge(Toml::file(path)))
    }

    /// Parses a scenario held in memory.
    pub fn from_toml_str(source: &str) -> Result<Self, ScenarioError> {
        Self::extract(Figment::new().merge(Toml::string(source)))
    }

    fn extract(figment: Figment) -> Result<Self, ScenarioError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        if config.simulation.step_ms == 0 {
            return Err(ScenarioError::ZeroStep);
        }
        Ok(config)
    }
}

/// Parses one plugin's inline TOML element, e.g. a `[comm]` block stored as text.
pub fn parse_element<T: DeserializeOwned>(element: &str) -> Result<T, ScenarioError> {
    Ok(toml::from_str(element)?)
}
