//! Loads a spreadsheet into rows of identifiers and coordinates.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use thiserror::Error;

const LAT_NAMES: [&str; 2] = ["lat", "latitude"];
const LONG_NAMES: [&str; 4] = ["long", "lon", "lng", "longitude"];
const ID_NAME: &str = "id";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to open workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Workbook has no worksheets")]
    NoSheet,
    #[error("Worksheet is empty")]
    Empty,
    #[error("Column '{column}' not found. Available: {available:?}")]
    MissingColumn {
        column: &'static str,
        available: Vec<String>,
    },
}

#[derive(Debug, Clone)]
/// Header row plus data rows of the first worksheet.
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Data>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Columns {
    pub id: Option<usize>,
    pub lat: usize,
    pub long: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub long: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

impl Record {
    /// `None` when either value is missing.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.long) {
            (Some(lat), Some(long)) => Some(Coordinate { lat, long }),
            _ => None,
        }
    }
}

impl Table {
    /// Reads the first worksheet of the workbook at `path`.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let mut workbook = open_workbook_auto(path)?;
        let sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(TableError::NoSheet)?;
        let range = workbook.worksheet_range(&sheet)?;

        Table::from_range(&range)
    }

    pub fn from_range(range: &Range<Data>) -> Result<Self, TableError> {
        let mut rows = range.rows();
        let columns = rows
            .next()
            .ok_or(TableError::Empty)?
            .iter()
            .map(|cell| cell.to_string())
            .collect();
        let rows = rows.map(|row| row.to_vec()).collect();

        Ok(Table { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Finds the latitude, longitude and optional id columns.
    pub fn resolve_columns(&self) -> Result<Columns, TableError> {
        let lat = self.find_column(&LAT_NAMES).ok_or_else(|| self.missing("lat"))?;
        let long = self.find_column(&LONG_NAMES).ok_or_else(|| self.missing("long"))?;
        let id = self.find_column(&[ID_NAME]);

        Ok(Columns { id, lat, long })
    }

    /// Exact header match first, then a trimmed, case-insensitive one.
    fn find_column(&self, names: &[&str]) -> Option<usize> {
        let exact = self
            .columns
            .iter()
            .position(|c| names.contains(&c.as_str()));

        exact.or_else(|| {
            self.columns
                .iter()
                .position(|c| names.contains(&c.trim().to_lowercase().as_str()))
        })
    }

    fn missing(&self, column: &'static str) -> TableError {
        TableError::MissingColumn {
            column,
            available: self.columns.clone(),
        }
    }

    pub fn records<'a>(&'a self, columns: &'a Columns) -> impl Iterator<Item = Record> + 'a {
        self.rows.iter().enumerate().map(move |(idx, row)| {
            let id = columns
                .id
                .and_then(|i| row.get(i))
                .and_then(format_id)
                .unwrap_or_else(|| format!("idx_{}", idx));

            Record {
                id,
                lat: row.get(columns.lat).and_then(parse_coordinate),
                long: row.get(columns.long).and_then(parse_coordinate),
            }
        })
    }
}

/// Renders an id cell as a file stem. Ids that could leave the output
/// folder are dropped so the row falls back to its index.
fn format_id(cell: &Data) -> Option<String> {
    let id = match cell {
        Data::Int(v) => v.to_string(),
        // Past 2^63 `as i64` saturates, so large integral floats print directly.
        Data::Float(v) if v.fract() == 0.0 && v.abs() < 2f64.powi(63) => (*v as i64).to_string(),
        Data::Float(v) if v.fract() == 0.0 => format!("{:.0}", v),
        Data::Float(v) => v.to_string(),
        Data::String(s) => s.trim().to_string(),
        _ => return None,
    };

    is_safe_file_stem(&id).then_some(id)
}

fn is_safe_file_stem(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id.contains("..")
        && !id.contains(['/', '\\', ':', '\0'])
}

fn parse_coordinate(cell: &Data) -> Option<f64> {
    let value = match cell {
        Data::Float(v) => Some(*v),
        Data::Int(v) => Some(*v as f64),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    value.filter(|v| v.is_finite())
}

// -- Tests -------------------------------------------------------------------
