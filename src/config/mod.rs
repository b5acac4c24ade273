//! Application Configuration
//!
//! Defaults for the command line front end, stored in TOML format. The library
//! itself takes every parameter per call and never reads this file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::vision::kernel::{self, KernelError};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Binarization filter settings
    pub binarization: BinarizationSettings,
    /// Output formatting settings
    pub output: OutputSettings,
}

/// Binarization filter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarizationSettings {
    /// Gaussian kernel size (odd, at least 3)
    pub kernel_size: usize,
    /// Kernel sigma; `(kernel_size - 1) / 6` when unset
    pub sigma: Option<f64>,
    /// Offset subtracted from the local mean before comparing
    pub offset: i32,
}

impl Default for BinarizationSettings {
    fn default() -> Self {
        Self {
            kernel_size: 11,
            sigma: None,
            offset: 2,
        }
    }
}

impl BinarizationSettings {
    /// Sigma actually used for the kernel
    pub fn effective_sigma(&self) -> f64 {
        self.sigma.unwrap_or_else(|| kernel::default_sigma(self.kernel_size))
    }

    /// Check the kernel parameters
    pub fn validate(&self) -> Result<(), KernelError> {
        kernel::validate(self.kernel_size, self.effective_sigma())
    }
}

/// Output formatting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty-print JSON output
    pub pretty_json: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "scanlate", "scanlate")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(proj_dirs.config_dir().to_path_buf())
}

/// Default location of the configuration file
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from `path` (or the default location), falling back to defaults
///
/// An explicitly given path must exist and parse. A missing default file is
/// not an error.
pub fn load_or_default(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        let config = load_config(path)?;
        info!("Loaded configuration from {:?}", path);
        return Ok(config);
    }

    match default_config_path() {
        Ok(path) if path.exists() => match load_config(&path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return Ok(config);
            }
            Err(e) => warn!("Ignoring unreadable configuration: {:#}", e),
        },
        Ok(_) => {}
        Err(e) => warn!("{}", e),
    }

    info!("Using default configuration");
    Ok(AppConfig::default())
}
