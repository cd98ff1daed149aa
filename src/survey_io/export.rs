//! Per-well output artifacts

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::info;

use crate::config::ExportConfig;
use crate::trajectory::Well;
use crate::types::{ExportTable, HorizontalTrace, PointInterpolation};

use super::ExportError;

const POINTS_HEADER: [&str; 6] = ["Point", "MD", "x", "y", "Depth", "Altitude"];

// ============================================================================
// Writers
// ============================================================================

/// Inclination table: two preamble lines, header, fixed-decimal rows.
pub fn write_inclination_table<W: Write>(mut out: W, table: &ExportTable, decimals: usize) -> std::io::Result<()> {
    writeln!(out, "Meridian correction = {:?}", table.meridian_correction)?;
    writeln!(out, "Magnetic declination = {:?}", table.magnetic_declination)?;
    writeln!(out, "{}", table.header().join("\t"))?;
    for row in &table.rows {
        writeln!(out, "{}", join_fixed(&row.values(), decimals))?;
    }
    out.flush()
}

/// MD points located on the trajectory, one line per point.
pub fn write_points_table<W: Write>(mut out: W, points: &[PointInterpolation], decimals: usize) -> std::io::Result<()> {
    writeln!(out, "{}", POINTS_HEADER.join("\t"))?;
    for p in points {
        let v = p.point;
        writeln!(
            out,
            "{}\t{}",
            p.label,
            join_fixed(&[v.measured_depth, v.x_global, v.y_global, v.depth, v.altitude], decimals)
        )?;
    }
    out.flush()
}

/// GeoJSON `Feature` for the plan-view trace.
pub fn trace_feature(trace: &HorizontalTrace) -> Value {
    let coordinates: Vec<[f64; 2]> = trace.points.iter().map(|&(x, y)| [x, y]).collect();
    json!({
        "type": "Feature",
        "crs": {
            "type": "name",
            "properties": { "name": format!("urn:ogc:def:crs:EPSG::{}", trace.crs_id.code()) }
        },
        "properties": { "WellName": trace.name },
        "geometry": { "type": "LineString", "coordinates": coordinates }
    })
}

pub fn write_trace<W: Write>(mut out: W, trace: &HorizontalTrace) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut out, &trace_feature(trace))?;
    writeln!(out)?;
    out.flush()
}

fn join_fixed(values: &[f64], decimals: usize) -> String {
    values
        .iter()
        .map(|v| format!("{v:.decimals$}"))
        .collect::<Vec<_>>()
        .join("\t")
}

// ============================================================================
// Well export
// ============================================================================

/// Where the three artifacts of one well land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub inclination: PathBuf,
    pub trace: PathBuf,
    pub points: PathBuf,
}

impl OutputPaths {
    pub fn for_well(dir: &Path, name: &str, cfg: &ExportConfig) -> Self {
        Self {
            inclination: dir.join(format!("{name}{}", cfg.inclination_suffix)),
            trace: dir.join(format!("{name}{}", cfg.trace_suffix)),
            points: dir.join(format!("{name}{}", cfg.points_suffix)),
        }
    }
}

/// What [`export_well`] wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub paths: OutputPaths,
    pub stations: usize,
    /// `None` when no points were supplied, so no points file was written
    pub points_written: Option<usize>,
}

fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ExportError::Io { path: path.to_path_buf(), source })
}

fn io_at(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io { path: path.to_path_buf(), source }
}

/// Write the inclination table, the trace, and (when `md_points` is non-empty)
/// the points file for one well into `dir`.
pub fn export_well(
    well: &Well,
    name: &str,
    md_points: &[(String, f64)],
    dir: &Path,
    cfg: &ExportConfig,
) -> Result<ExportSummary, ExportError> {
    std::fs::create_dir_all(dir).map_err(io_at(dir))?;
    let paths = OutputPaths::for_well(dir, name, cfg);

    let table = well.export_table();
    write_inclination_table(create(&paths.inclination)?, &table, cfg.decimals).map_err(io_at(&paths.inclination))?;

    write_trace(create(&paths.trace)?, &well.horizontal_trace(name)).map_err(io_at(&paths.trace))?;

    let points_written = if md_points.is_empty() {
        None
    } else {
        let located = well.interpolate_points(md_points);
        write_points_table(create(&paths.points)?, &located, cfg.decimals).map_err(io_at(&paths.points))?;
        Some(located.len())
    };

    info!(
        well = name,
        dir = %dir.display(),
        stations = table.rows.len(),
        points = points_written.unwrap_or(0),
        "Exported well"
    );

    Ok(ExportSummary { paths, stations: table.rows.len(), points_written })
}
