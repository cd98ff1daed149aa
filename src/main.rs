//! inclinometry - borehole trajectory from a directional survey
//!
//! # Usage
//!
//! ```bash
//! # Survey-angle file (MD, inclination, azimuth), head in Pulkovo 1942 lon/lat
//! inclinometry --survey well.txt --x 51.3 --y 55.1 --altitude 142.5 \
//!     --declination 11.2 --name W-1 --out-dir out/
//!
//! # Displacement file, head already in zone 9, with MD points
//! inclinometry --survey xyz.txt --mode XYZ --crs 28409 --x 9500000 --y 6100000 \
//!     --altitude 120 --points tops.txt --point-columns Name,MD
//! ```
//!
//! # Environment Variables
//!
//! - `INCLINOMETRY_CONFIG`: Path to a TOML config file
//! - `INCLINOMETRY_OUT_DIR`: Output directory when `--out-dir` is not given
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use inclinometry::config::{self, SurveyConfig};
use inclinometry::survey_io::{self, ColumnSelector, PointsTable, SurveyTable};
use inclinometry::{CrsId, GaussKrugerTransformer, ProcessingMode, Well, WellHead, WellSetup};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "inclinometry")]
#[command(about = "Borehole trajectory reconstruction from directional survey data")]
#[command(version)]
struct CliArgs {
    /// Tab-delimited survey file with a header line
    #[arg(long)]
    survey: PathBuf,

    /// Processing mode: MD (depth, inclination, azimuth) or XYZ (displacements).
    /// Defaults to `survey.default_mode` from the config.
    #[arg(long)]
    mode: Option<String>,

    /// Three survey columns, by header name or 0-based index
    #[arg(long, value_delimiter = ',', default_value = "0,1,2")]
    columns: Vec<ColumnSelector>,

    /// Well head X in the source CRS (longitude for geographic CRSs)
    #[arg(long, allow_hyphen_values = true)]
    x: f64,

    /// Well head Y in the source CRS (latitude for geographic CRSs)
    #[arg(long, allow_hyphen_values = true)]
    y: f64,

    /// Well head altitude (m)
    #[arg(long, allow_hyphen_values = true)]
    altitude: f64,

    /// EPSG code of the head coordinates
    #[arg(long, default_value_t = CrsId::PULKOVO_1942.code())]
    crs: u32,

    /// Magnetic declination in degrees (survey-angle mode only)
    #[arg(long, allow_hyphen_values = true)]
    declination: Option<f64>,

    /// Well name used for output files and the trace (default: survey file stem)
    #[arg(long)]
    name: Option<String>,

    /// Tab-delimited file of labelled MD points to locate on the trajectory
    #[arg(long)]
    points: Option<PathBuf>,

    /// Label and MD columns of the points file
    #[arg(long, value_delimiter = ',', default_value = "0,1")]
    point_columns: Vec<ColumnSelector>,

    /// Output directory
    #[arg(long, env = "INCLINOMETRY_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Config file (overrides INCLINOMETRY_CONFIG and ./inclinometry.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl CliArgs {
    fn well_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.survey
                .file_stem()
                .map_or_else(|| "well".to_string(), |s| s.to_string_lossy().into_owned())
        })
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    // Load configuration
    let survey_config = match &args.config {
        Some(path) => SurveyConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SurveyConfig::load(),
    };
    config::init(survey_config);
    let cfg = config::get();

    let columns: [ColumnSelector; 3] = match args.columns.clone().try_into() {
        Ok(cols) => cols,
        Err(cols) => bail!("--columns expects 3 selectors, got {}", cols.len()),
    };
    let [label_col, md_col]: [ColumnSelector; 2] = match args.point_columns.clone().try_into() {
        Ok(cols) => cols,
        Err(cols) => bail!("--point-columns expects 2 selectors, got {}", cols.len()),
    };

    let mode_name = args.mode.as_deref().unwrap_or(&cfg.survey.default_mode);
    let mode: ProcessingMode = mode_name.parse().context("Invalid --mode")?;
    let declination = args.declination.unwrap_or(cfg.survey.magnetic_declination);

    let table = SurveyTable::load(&args.survey)
        .with_context(|| format!("Failed to read survey {}", args.survey.display()))?;
    let stations = table
        .stations(&columns)
        .context("Failed to select survey columns")?;

    let md_points = match &args.points {
        Some(path) => PointsTable::load(path)
            .and_then(|t| t.points(&label_col, &md_col))
            .with_context(|| format!("Failed to read MD points {}", path.display()))?,
        None => Vec::new(),
    };

    let transformer = GaussKrugerTransformer::new(cfg.geodesy.datum_shift, cfg.geodesy.zone_crs_base);
    let setup = WellSetup::new(
        WellHead::new(args.x, args.y, args.altitude),
        CrsId(args.crs),
        declination,
        mode,
    )
    .with_zones(cfg.geodesy.zone_scheme());
    let well = Well::new(setup, &stations, &transformer).context("Failed to process trajectory")?;

    info!(
        zone = well.zone_index(),
        crs = %well.zone_crs_id(),
        meridian_correction = well.meridian_correction(),
        total_correction = well.total_angle_correction(),
        "Zone resolved"
    );

    let name = args.well_name();
    let summary = survey_io::export_well(&well, &name, &md_points, &args.out_dir, &cfg.export)
        .context("Failed to write outputs")?;

    info!(path = %summary.paths.inclination.display(), rows = summary.stations, "Wrote inclination table");
    info!(path = %summary.paths.trace.display(), "Wrote horizontal trace");
    if let Some(n) = summary.points_written {
        info!(path = %summary.paths.points.display(), located = n, requested = md_points.len(), "Wrote MD points");
    }

    Ok(())
}
