//! Survey Configuration - geodesy, export layout and survey defaults as TOML
//!
//! Every struct implements `Default` with the values the tool ships with, so
//! a missing or empty config file behaves exactly like the built-ins.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::geodesy::{CrsId, HelmertParams, ZoneScheme};
use crate::trajectory::ProcessingMode;

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `SurveyConfig::load()` which searches:
/// 1. `$INCLINOMETRY_CONFIG` env var
/// 2. `./inclinometry.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Zone scheme and datum shift
    #[serde(default)]
    pub geodesy: GeodesyConfig,

    /// Output file layout
    #[serde(default)]
    pub export: ExportConfig,

    /// Fallbacks for values not given on the command line
    #[serde(default)]
    pub survey: SurveyDefaults,
}

impl SurveyConfig {
    /// Load configuration using the standard search order:
    /// 1. `$INCLINOMETRY_CONFIG` environment variable
    /// 2. `./inclinometry.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", defaults::CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./inclinometry.toml
        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", defaults::LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate TOML text. Unknown keys are logged, never fatal.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }
        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Reject values the engine cannot work with.
    ///
    /// Rules:
    /// - every float must be finite
    /// - `zone_crs_base` must be > 0
    /// - `export.decimals` must be <= 12
    /// - `survey.default_mode` must name a processing mode
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let h = &self.geodesy.datum_shift;
        for (name, value) in [
            ("tx", h.tx),
            ("ty", h.ty),
            ("tz", h.tz),
            ("rx", h.rx),
            ("ry", h.ry),
            ("rz", h.rz),
            ("scale_ppm", h.scale_ppm),
        ] {
            if !value.is_finite() {
                errors.push(format!("geodesy.datum_shift.{name} must be finite (got {value})"));
            }
        }

        if self.geodesy.zone_crs_base == 0 {
            errors.push("geodesy.zone_crs_base must be > 0".to_string());
        }

        if self.export.decimals > defaults::MAX_EXPORT_DECIMALS {
            errors.push(format!(
                "export.decimals = {} exceeds the maximum of {}",
                self.export.decimals,
                defaults::MAX_EXPORT_DECIMALS
            ));
        }
        for (name, suffix) in [
            ("inclination_suffix", &self.export.inclination_suffix),
            ("trace_suffix", &self.export.trace_suffix),
            ("points_suffix", &self.export.points_suffix),
        ] {
            if suffix.is_empty() {
                errors.push(format!("export.{name} must not be empty"));
            }
        }

        if !self.survey.magnetic_declination.is_finite() {
            errors.push(format!(
                "survey.magnetic_declination must be finite (got {})",
                self.survey.magnetic_declination
            ));
        }
        if let Err(e) = self.survey.default_mode.parse::<ProcessingMode>() {
            errors.push(format!("survey.default_mode: {e}"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            Self::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            Self::Serialize(e) => write!(f, "Config serialization error: {e}"),
            Self::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Geodesy
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeodesyConfig {
    /// Geographic CRS zones are resolved in (EPSG code)
    #[serde(default = "default_base_crs_id")]
    pub base_crs_id: u32,

    /// Zone `n` is EPSG `zone_crs_base + n`
    #[serde(default = "default_zone_crs_base")]
    pub zone_crs_base: u32,

    /// Pulkovo 1942 to WGS 84 shift
    #[serde(default)]
    pub datum_shift: HelmertParams,
}

fn default_base_crs_id() -> u32 { CrsId::PULKOVO_1942.code() }
fn default_zone_crs_base() -> u32 { CrsId::ZONE_CRS_BASE }

impl Default for GeodesyConfig {
    fn default() -> Self {
        Self {
            base_crs_id: default_base_crs_id(),
            zone_crs_base: default_zone_crs_base(),
            datum_shift: HelmertParams::default(),
        }
    }
}

impl GeodesyConfig {
    pub fn zone_scheme(&self) -> ZoneScheme {
        ZoneScheme {
            base_crs_id: CrsId(self.base_crs_id),
            zone_crs_base: self.zone_crs_base,
        }
    }
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Decimals written for every numeric table value
    #[serde(default = "default_decimals")]
    pub decimals: usize,

    #[serde(default = "default_inclination_suffix")]
    pub inclination_suffix: String,

    #[serde(default = "default_trace_suffix")]
    pub trace_suffix: String,

    #[serde(default = "default_points_suffix")]
    pub points_suffix: String,
}

fn default_decimals() -> usize { defaults::EXPORT_DECIMALS }
fn default_inclination_suffix() -> String { defaults::INCLINATION_SUFFIX.to_string() }
fn default_trace_suffix() -> String { defaults::TRACE_SUFFIX.to_string() }
fn default_points_suffix() -> String { defaults::POINTS_SUFFIX.to_string() }

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            inclination_suffix: default_inclination_suffix(),
            trace_suffix: default_trace_suffix(),
            points_suffix: default_points_suffix(),
        }
    }
}

// ============================================================================
// Survey defaults
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyDefaults {
    /// `"MD"` or `"XYZ"`
    #[serde(default = "default_mode")]
    pub default_mode: String,

    /// Degrees, applied in survey-angle mode only
    #[serde(default)]
    pub magnetic_declination: f64,
}

fn default_mode() -> String { defaults::DEFAULT_MODE.to_string() }

impl Default for SurveyDefaults {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            magnetic_declination: 0.0,
        }
    }
}
