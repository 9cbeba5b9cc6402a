//! Spreadsheet ingestion for the clinic worklist.
//!
//! Reads the first worksheet of an uploaded workbook into the loose row
//! objects the core engine consumes, and classifies the file by name so
//! the caller knows whether to route it through the primary-roster or
//! supplemental-report import path. Only reading and reshaping happens
//! here; all reconciliation semantics live in `worklist-core`.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use worklist_core::models::RowObject;
use worklist_core::reconcile::FileKind;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("unable to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("worksheet has no data rows")]
    EmptyWorksheet,
}

pub type IngestResult<T> = Result<T, IngestError>;

/// A parsed upload, ready to hand to the store.
#[derive(Debug, Clone)]
pub struct ClassifiedImport {
    pub kind: FileKind,
    pub rows: Vec<RowObject>,
}

/// Read and classify one uploaded workbook. The first row is the header;
/// every following row becomes one row object keyed by header text.
pub fn ingest_file<P: AsRef<Path>>(path: P) -> IngestResult<ClassifiedImport> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let kind = FileKind::classify(&file_name);

    let rows = read_rows(path)?;
    debug!(file = %file_name, ?kind, rows = rows.len(), "ingested workbook");
    Ok(ClassifiedImport { kind, rows })
}

/// Read the first worksheet into row objects.
pub fn read_rows<P: AsRef<Path>>(path: P) -> IngestResult<Vec<RowObject>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::NoWorksheet)??;
    rows_from_cells(range.rows())
}

/// Reshape an iterator of cell rows into row objects. The header row
/// supplies the keys; blank header cells drop their whole column, and
/// blank data cells are simply absent from the row object.
fn rows_from_cells<I, R>(mut rows: I) -> IngestResult<Vec<RowObject>>
where
    I: Iterator<Item = R>,
    R: AsRef<[Data]>,
{
    let header = rows.next().ok_or(IngestError::EmptyWorksheet)?;
    let headers: Vec<String> = header.as_ref().iter().map(cell_text).collect();

    let mut out = Vec::new();
    for row in rows {
        let mut object = RowObject::new();
        for (header, cell) in headers.iter().zip(row.as_ref().iter()) {
            if header.is_empty() {
                continue;
            }
            if let Some(value) = cell_value(cell) {
                object.insert(header.clone(), value);
            }
        }
        if !object.is_empty() {
            out.push(object);
        }
    }
    Ok(out)
}

/// Convert one cell to a JSON value, or `None` for cells that carry no
/// data. Numeric cells stay numeric so date-serial DOB values survive
/// into the merge path intact.
fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::Error(_) => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Int(n) => Some(Value::from(*n)),
        Data::Float(f) => serde_json::Number::from_f64(*f).map(Value::Number),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => serde_json::Number::from_f64(dt.as_f64()).map(Value::Number),
        Data::DateTimeIso(s) => Some(Value::String(s.clone())),
        Data::DurationIso(s) => Some(Value::String(s.clone())),
    }
}

fn cell_text(cell: &Data) -> String {
    match cell_value(cell) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
