//! Survey Configuration Module
//!
//! Geodesy parameters, export layout and survey defaults loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `INCLINOMETRY_CONFIG` environment variable (path to TOML file)
//! 2. `inclinometry.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! ```ignore
//! // In main():
//! config::init(SurveyConfig::load());
//!
//! // Anywhere else:
//! let decimals = config::get().export.decimals;
//! ```

mod survey_config;
pub mod defaults;
pub mod validation;

pub use survey_config::*;

use std::sync::OnceLock;

/// Global survey configuration, initialized once at startup.
static SURVEY_CONFIG: OnceLock<SurveyConfig> = OnceLock::new();

/// Initialize the global survey configuration.
///
/// A second call is ignored with a warning.
pub fn init(config: SurveyConfig) {
    if SURVEY_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global survey configuration.
///
/// Panics if `init()` has not been called. A missing config is a startup
/// bug, not a recoverable condition.
#[allow(clippy::expect_used)]
pub fn get() -> &'static SurveyConfig {
    SURVEY_CONFIG
        .get()
        .expect("config::get() called before config::init(), this is a startup bug")
}
