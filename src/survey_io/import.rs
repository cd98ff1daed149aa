//! Tab-delimited survey and point-list import
//!
//! Both file kinds share one layout: a header line of tab-separated column
//! names followed by one record per line. Blank lines are skipped, `\r` line
//! endings are tolerated. Survey files are fully numeric; point files keep
//! their fields as text until a column is selected.

use std::path::Path;
use std::str::FromStr;

use tracing::info;

use super::ImportError;

const DELIMITER: char = '\t';

// ============================================================================
// Column selection
// ============================================================================

/// A column picked by 0-based index or by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

impl FromStr for ColumnSelector {
    type Err = std::convert::Infallible;

    /// All-digit input is an index, anything else a header name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(s.parse::<usize>()
            .map_or_else(|_| Self::Name(s.to_string()), Self::Index))
    }
}

impl std::fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "#{i}"),
            Self::Name(n) => write!(f, "'{n}'"),
        }
    }
}

fn resolve_column(headers: &[String], selector: &ColumnSelector) -> Result<usize, ImportError> {
    match selector {
        ColumnSelector::Index(i) if *i < headers.len() => Ok(*i),
        ColumnSelector::Name(name) => headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ImportError::MissingColumn(selector.to_string())),
        ColumnSelector::Index(_) => Err(ImportError::MissingColumn(selector.to_string())),
    }
}

// ============================================================================
// Line splitting
// ============================================================================

/// Header plus (1-based line number, fields) for every non-blank record.
fn split_records(text: &str) -> Result<(Vec<String>, Vec<(usize, Vec<&str>)>), ImportError> {
    let mut lines = text.lines().enumerate();
    let headers: Vec<String> = loop {
        match lines.next() {
            Some((_, l)) if l.trim().is_empty() => continue,
            Some((_, l)) => break l.trim_end_matches('\r').split(DELIMITER).map(|h| h.trim().to_string()).collect(),
            None => return Err(ImportError::Empty),
        }
    };

    let mut records = Vec::new();
    for (idx, raw) in lines {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() != headers.len() {
            return Err(ImportError::Malformed {
                line: idx + 1,
                reason: format!("expected {} fields, found {}", headers.len(), fields.len()),
            });
        }
        records.push((idx + 1, fields));
    }
    Ok((headers, records))
}

/// Finite number from one field; `NaN` and `inf` are rejected like text.
fn parse_finite(field: &str, line: usize, what: &str) -> Result<f64, ImportError> {
    let field = field.trim();
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(ImportError::Malformed {
            line,
            reason: format!("{what}'{field}' is not a finite number"),
        }),
        Err(_) => Err(ImportError::Malformed {
            line,
            reason: format!("{what}'{field}' is not a number"),
        }),
    }
}

fn read_file(path: &Path) -> Result<String, ImportError> {
    std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// Survey table
// ============================================================================

/// Numeric survey file.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl SurveyTable {
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        let (headers, records) = split_records(text)?;
        let mut rows = Vec::with_capacity(records.len());
        for (line, fields) in records {
            let values = fields
                .iter()
                .map(|f| parse_finite(f, line, ""))
                .collect::<Result<Vec<f64>, _>>()?;
            rows.push(values);
        }
        Ok(Self { headers, rows })
    }

    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let table = Self::parse(&read_file(path)?)?;
        info!(path = %path.display(), columns = table.headers.len(), rows = table.rows.len(), "Loaded survey file");
        Ok(table)
    }

    pub fn column_index(&self, selector: &ColumnSelector) -> Result<usize, ImportError> {
        resolve_column(&self.headers, selector)
    }

    /// Station triples from three selected columns, in file order.
    pub fn stations(&self, columns: &[ColumnSelector; 3]) -> Result<Vec<[f64; 3]>, ImportError> {
        let a = self.column_index(&columns[0])?;
        let b = self.column_index(&columns[1])?;
        let c = self.column_index(&columns[2])?;
        Ok(self.rows.iter().map(|r| [r[a], r[b], r[c]]).collect())
    }
}

// ============================================================================
// Points table
// ============================================================================

/// Point list file: a label column and an MD column among others.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsTable {
    pub headers: Vec<String>,
    /// (source line, fields)
    pub rows: Vec<(usize, Vec<String>)>,
}

impl PointsTable {
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        let (headers, records) = split_records(text)?;
        let rows = records
            .into_iter()
            .map(|(line, fields)| (line, fields.into_iter().map(|f| f.trim().to_string()).collect()))
            .collect();
        Ok(Self { headers, rows })
    }

    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let table = Self::parse(&read_file(path)?)?;
        info!(path = %path.display(), points = table.rows.len(), "Loaded MD points file");
        Ok(table)
    }

    /// (label, MD) pairs; the MD column must be numeric and finite.
    pub fn points(&self, label: &ColumnSelector, md: &ColumnSelector) -> Result<Vec<(String, f64)>, ImportError> {
        let label_idx = resolve_column(&self.headers, label)?;
        let md_idx = resolve_column(&self.headers, md)?;
        self.rows
            .iter()
            .map(|(line, fields)| -> Result<(String, f64), ImportError> {
                let value = parse_finite(&fields[md_idx], *line, "MD ")?;
                Ok((fields[label_idx].clone(), value))
            })
            .collect()
    }
}
