//! XLSX parser implementation.

use calamine::{open_workbook, Data, ExcelDateTime, Range, Reader, Xlsx};
use chrono::NaiveDateTime;
use log::debug;
use std::io::{Read, Seek};
use std::path::Path;
use txtify_core::{Error, Result};

/// Extractor for XLSX workbooks.
pub struct XlsxExtractor;

impl XlsxExtractor {
    /// Create a new XLSX extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the first sheet of the workbook stored at `path` as CSV.
    pub fn extract_path(&self, path: &Path) -> Result<String> {
        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e| Error::SpreadsheetError(format!("Failed to open workbook: {}", e)))?;
        first_sheet_csv(&mut workbook)
    }

    /// Extract the first sheet of a workbook read from `reader` as CSV.
    pub fn extract<R: Read + Seek>(&self, reader: R) -> Result<String> {
        let mut workbook = Xlsx::new(reader)
            .map_err(|e| Error::SpreadsheetError(format!("Failed to open workbook: {}", e)))?;
        first_sheet_csv(&mut workbook)
    }
}

impl Default for XlsxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn first_sheet_csv<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> Result<String> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::SpreadsheetError("Workbook has no worksheets".to_string()))?
        .map_err(|e| Error::SpreadsheetError(format!("Failed to read first worksheet: {}", e)))?;

    debug!(
        "XLSX first sheet: {} rows x {} columns",
        range.height(),
        range.width()
    );

    Ok(render_csv(&range))
}

static EMPTY_CELL: Data = Data::Empty;

/// Render a sheet as CSV. The first row is the header; blank header cells
/// are named `Unnamed: <column>`. Every row ends with `\n`.
///
/// Columns are counted from `A`: a sheet whose data starts further right
/// gets empty leading fields.
pub fn render_csv(range: &Range<Data>) -> String {
    let leading = range.start().map_or(0, |(_, column)| column as usize);
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return String::new();
    };

    let mut out = String::new();
    let header_fields: Vec<String> = from_first_column(header, leading)
        .enumerate()
        .map(|(column, cell)| match cell_text(cell) {
            name if name.is_empty() => format!("Unnamed: {}", column),
            name => name,
        })
        .collect();
    push_record(&mut out, &header_fields);

    for row in rows {
        let fields: Vec<String> = from_first_column(row, leading).map(cell_text).collect();
        push_record(&mut out, &fields);
    }

    out
}

fn from_first_column(row: &[Data], leading: usize) -> impl Iterator<Item = &Data> {
    std::iter::repeat(&EMPTY_CELL).take(leading).chain(row)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(value) => format_datetime(value),
        other => other.to_string(),
    }
}

/// Dates print as `YYYY-MM-DD HH:MM:SS`; durations keep their serial value.
fn format_datetime(value: &ExcelDateTime) -> String {
    match value.as_datetime() {
        Some(datetime) if value.is_datetime() => format_timestamp(&datetime),
        _ => value.to_string(),
    }
}

fn format_timestamp(datetime: &NaiveDateTime) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Whole numbers lose the fractional part; others use the shortest
/// representation that round-trips.
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn push_record(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}
