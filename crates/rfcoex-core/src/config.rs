//! # Configuration
//!
//! YAML configuration for analysis runs:
//!
//! - generator toggles and guard margin
//! - the default band selection
//! - the RF system preset plus per-field overrides
//! - logging
//! - user-defined bands merged into the built-in catalog
//!
//! ## Search Path
//!
//! The first file found wins:
//! 1. `RFCOEX_CONFIG` environment variable
//! 2. `./rfcoex.yaml`
//! 3. `<user config dir>/rfcoex/config.yaml`
//! 4. `/etc/rfcoex/config.yaml`
//!
//! ## Example
//!
//! ```yaml
//! analysis:
//!   guard_mhz: 1.0
//!   imd4: true
//! selection: [LTE_B13, GNSS_L1]
//! system:
//!   preset: mobile_device_poor
//!   overrides:
//!     antenna_isolation_db: 12.0
//! custom_bands:
//!   - code: PRIV_LTE
//!     tx_low: 3550.0
//!     tx_high: 3700.0
//!     rx_low: 3550.0
//!     rx_high: 3700.0
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::analysis::AnalysisOptions;
use crate::error::{CoexError, CoexResult};
use crate::observe::LogConfig;
use crate::power::{SystemOverrides, SystemParameters};
use crate::registry::{BandRegistry, BandSpec};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RFCOEX_CONFIG";

/// Which RF system parameters to use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Preset name or `default`
    pub preset: String,
    pub overrides: SystemOverrides,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            preset: "default".to_string(),
            overrides: SystemOverrides::default(),
        }
    }
}

impl SystemConfig {
    /// Preset with overrides applied.
    pub fn resolve(&self) -> CoexResult<SystemParameters> {
        let base = SystemParameters::named(&self.preset)?;
        Ok(self.overrides.apply(&base))
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoexConfig {
    pub version: String,
    pub analysis: AnalysisOptions,
    /// Bands analysed when none are given on the command line
    pub selection: Vec<String>,
    pub system: SystemConfig,
    pub logging: LogConfig,
    pub custom_bands: Vec<BandSpec>,
}

impl Default for CoexConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            analysis: AnalysisOptions::default(),
            selection: Vec::new(),
            system: SystemConfig::default(),
            logging: LogConfig::default(),
            custom_bands: Vec::new(),
        }
    }
}

impl CoexConfig {
    /// Load from the search path, or defaults if no file exists.
    pub fn load() -> CoexResult<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(CoexError::ConfigNotFound(format!(
                    "{} points at {}",
                    CONFIG_ENV,
                    path.display()
                )));
            }
            return Self::load_from(&path);
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> CoexResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoexError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Self::parse(&content)
    }

    pub fn parse(yaml: &str) -> CoexResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn save(&self, path: &Path) -> CoexResult<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|source| CoexError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./rfcoex.yaml")];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "rfcoex") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }
        paths.push(PathBuf::from("/etc/rfcoex/config.yaml"));
        paths
    }

    pub fn validate(&self) -> CoexResult<()> {
        self.analysis.validate()?;

        let mut seen = HashSet::new();
        for spec in &self.custom_bands {
            if spec.code.trim().is_empty() {
                return Err(CoexError::InvalidConfig("custom band with empty code".to_string()));
            }
            if !seen.insert(spec.code.as_str()) {
                return Err(CoexError::InvalidConfig(format!(
                    "custom band '{}' defined twice",
                    spec.code
                )));
            }
        }

        let registry = self.registry();
        if let Some(missing) = self.selection.iter().find(|c| !registry.contains(c)) {
            return Err(CoexError::UnknownBand(missing.clone()));
        }

        self.system_parameters()?.validate()
    }

    /// RF parameters from the configured preset and overrides.
    pub fn system_parameters(&self) -> CoexResult<SystemParameters> {
        self.system.resolve()
    }

    /// Built-in catalog plus the configured custom bands.
    pub fn registry(&self) -> BandRegistry {
        BandRegistry::with_custom(&self.custom_bands)
    }

    pub fn example_yaml() -> String {
        let config = Self {
            analysis: AnalysisOptions {
                guard_mhz: 1.0,
                aclr_margin_mhz: 20.0,
                ..AnalysisOptions::default()
            },
            selection: vec!["LTE_B13".to_string(), "GNSS_L1".to_string()],
            system: SystemConfig {
                preset: "mobile_device_typical".to_string(),
                overrides: SystemOverrides {
                    antenna_isolation_db: Some(12.0),
                    ..SystemOverrides::default()
                },
            },
            custom_bands: vec![BandSpec {
                code: "CBRS".to_string(),
                label: "CBRS 3.5 GHz".to_string(),
                category: "LTE".to_string(),
                tx_low: 3550.0,
                tx_high: 3700.0,
                rx_low: 3550.0,
                rx_high: 3700.0,
            }],
            ..Self::default()
        };
        serde_yaml::to_string(&config).unwrap_or_default()
    }
}
