//! Default values shared by the config structs and the CLI.

// ============================================================================
// Config discovery
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "INCLINOMETRY_CONFIG";

/// Config file looked up in the current working directory.
pub const LOCAL_CONFIG_FILE: &str = "inclinometry.toml";

// ============================================================================
// Export
// ============================================================================

/// Fixed decimals for numeric table columns.
pub const EXPORT_DECIMALS: usize = 6;

/// Upper bound accepted for `export.decimals`.
pub const MAX_EXPORT_DECIMALS: usize = 12;

pub const INCLINATION_SUFFIX: &str = "_inclination.dat";
pub const TRACE_SUFFIX: &str = "_hor_trace.geojson";
pub const POINTS_SUFFIX: &str = "_MD_Points.dat";

// ============================================================================
// Survey
// ============================================================================

/// Processing mode name used when none is given.
pub const DEFAULT_MODE: &str = "MD";
