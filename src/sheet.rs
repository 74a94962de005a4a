//! Tabular sheet output for parsed set records.
//!
//! Appends one row per [`SetRecord`] to an Excel workbook, CSV, or Parquet
//! sheet laid out as
//! `Date, Exercise_ID, Exercise_Name_Calc, Input_Weight, Total_Weight, Reps, Rest`.
//! Existing rows are never modified; a workbook or CSV sheet without the
//! expected header gets it inserted above its existing rows.

use crate::config::CompressionAlgorithm;
use crate::constants::SHEET_HEADER;
use crate::error::{ImportError, Result};
use crate::models::SetRecord;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// Storage format of the sheet, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Csv,
    Parquet,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("xlsx") => Ok(SheetFormat::Xlsx),
            Some("csv") => Ok(SheetFormat::Csv),
            Some("parquet") => Ok(SheetFormat::Parquet),
            _ => Err(ImportError::UnsupportedOutput {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// One sheet row: a record and its resolved catalog id, if any
#[derive(Debug, Clone)]
pub struct SheetRow<'a> {
    pub record: &'a SetRecord,
    pub exercise_id: Option<String>,
}

/// Result of one append
#[derive(Debug, Clone, PartialEq)]
pub struct AppendSummary {
    pub rows_appended: usize,
    pub total_rows: usize,
    pub header_inserted: bool,
}

/// Appends rows to a sheet file
#[derive(Debug)]
pub struct SheetWriter {
    path: PathBuf,
    format: SheetFormat,
    compression: CompressionAlgorithm,
}

impl SheetWriter {
    pub fn new(path: PathBuf) -> Result<Self> {
        let format = SheetFormat::from_path(&path)?;
        Ok(Self {
            path,
            format,
            compression: CompressionAlgorithm::Snappy,
        })
    }

    /// Compression used when the sheet is Parquet
    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Append rows after any existing ones, creating the sheet if needed
    pub fn append(&self, rows: &[SheetRow<'_>]) -> Result<AppendSummary> {
        info!("Appending {} rows to {}", rows.len(), self.path.display());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        match self.format {
            SheetFormat::Xlsx => self.append_xlsx(rows),
            SheetFormat::Csv => self.append_csv(rows),
            SheetFormat::Parquet => self.append_parquet(rows),
        }
    }

    /// Whether the sheet holds anything; a CSV of only whitespace counts as empty
    fn sheet_exists(&self) -> Result<bool> {
        let metadata = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        if metadata.len() == 0 {
            return Ok(false);
        }
        if self.format != SheetFormat::Csv {
            return Ok(true);
        }

        let content = std::fs::read(&self.path)?;
        Ok(!content.iter().all(u8::is_ascii_whitespace))
    }

    fn append_xlsx(&self, new_rows: &[SheetRow<'_>]) -> Result<AppendSummary> {
        let mut book = if self.sheet_exists()? {
            umya_spreadsheet::reader::xlsx::read(&self.path)
                .map_err(|e| self.workbook_error(e))?
        } else {
            debug!("Creating new workbook {}", self.path.display());
            umya_spreadsheet::new_file()
        };

        let (header_inserted, total_rows) = {
            let sheet = first_worksheet(&mut book, &self.path)?;
            let header_inserted = self.reconcile_xlsx_header(sheet);

            let first_row = sheet.get_highest_row() + 1;
            for (offset, row) in new_rows.iter().enumerate() {
                write_xlsx_row(sheet, first_row + offset as u32, row);
            }
            // Row 1 is the header.
            let total_rows = sheet.get_highest_row().saturating_sub(1) as usize;
            (header_inserted, total_rows)
        };

        self.replace_file(|temp| {
            umya_spreadsheet::writer::xlsx::write(&book, temp.path())
                .map_err(|e| self.workbook_error(e))
        })?;

        Ok(AppendSummary {
            rows_appended: new_rows.len(),
            total_rows,
            header_inserted,
        })
    }

    /// Put the header in row 1 unless it is already there
    fn reconcile_xlsx_header(&self, sheet: &mut Worksheet) -> bool {
        let existing_rows = sheet.get_highest_row();
        if existing_rows > 0 && row_is_header(sheet, 1) {
            return false;
        }

        if existing_rows > 0 {
            warn!(
                "Workbook {} has no '{}' header row; inserting it above {} existing rows",
                self.path.display(),
                SHEET_HEADER.join(", "),
                existing_rows
            );
            sheet.insert_new_row(&1, &1);
        }

        for (column, name) in (1u32..).zip(SHEET_HEADER) {
            sheet.get_cell_mut((column, 1)).set_value(name);
        }
        existing_rows > 0
    }

    fn workbook_error(&self, error: impl std::fmt::Display) -> ImportError {
        ImportError::Workbook {
            path: self.path.clone(),
            reason: error.to_string(),
        }
    }

    fn append_csv(&self, new_rows: &[SheetRow<'_>]) -> Result<AppendSummary> {
        let new_rows = text_rows_frame(new_rows)?;

        let (mut sheet, header_inserted) = if self.sheet_exists()? {
            self.read_csv_sheet()?
        } else {
            debug!("Creating new sheet {}", self.path.display());
            (new_rows.clear(), false)
        };

        sheet.vstack_mut(&new_rows)?;

        self.replace_file(|temp| {
            CsvWriter::new(temp.as_file_mut())
                .include_header(true)
                .finish(&mut sheet)?;
            Ok(())
        })?;

        Ok(AppendSummary {
            rows_appended: new_rows.height(),
            total_rows: sheet.height(),
            header_inserted,
        })
    }

    /// Read an existing CSV sheet as text columns, reconciling its header
    fn read_csv_sheet(&self) -> Result<(DataFrame, bool)> {
        let mut sheet = read_csv_as_text(&self.path)?;
        if sheet.width() != SHEET_HEADER.len() {
            return Err(ImportError::HeaderMismatch {
                path: self.path.clone(),
                expected: SHEET_HEADER.len(),
                found: sheet.width(),
            });
        }

        let header_present = first_row_is_header(&sheet)?;
        sheet.set_column_names(SHEET_HEADER)?;

        if header_present {
            let data_rows = sheet.height() - 1;
            return Ok((sheet.slice(1, data_rows), false));
        }

        // First row is data or a stale header: keep it and put the header above.
        warn!(
            "Sheet {} has no '{}' header row; inserting it above {} existing rows",
            self.path.display(),
            SHEET_HEADER.join(", "),
            sheet.height()
        );
        Ok((sheet, true))
    }

    fn append_parquet(&self, new_rows: &[SheetRow<'_>]) -> Result<AppendSummary> {
        let new_rows = rows_frame(new_rows)?;

        let mut sheet = if self.sheet_exists()? {
            let existing = ParquetReader::new(File::open(&self.path)?).finish()?;
            if !has_sheet_header(&existing) {
                return Err(ImportError::HeaderMismatch {
                    path: self.path.clone(),
                    expected: SHEET_HEADER.len(),
                    found: existing.width(),
                });
            }
            existing
        } else {
            new_rows.clear()
        };

        sheet.vstack_mut(&new_rows)?;

        let compression = self.compression.to_polars_compression();
        self.replace_file(|temp| {
            ParquetWriter::new(temp.as_file_mut())
                .with_compression(compression)
                .finish(&mut sheet)?;
            Ok(())
        })?;

        Ok(AppendSummary {
            rows_appended: new_rows.height(),
            total_rows: sheet.height(),
            header_inserted: false,
        })
    }

    /// Write through a uniquely named sibling temp file, then move it over the sheet.
    /// The temp file is removed on any failure.
    fn replace_file<F>(&self, write: F) -> Result<()>
    where
        F: FnOnce(&mut NamedTempFile) -> Result<()>,
    {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        // Keep the extension so workbook writers recognise the file type.
        let suffix = self
            .path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut temp = tempfile::Builder::new()
            .prefix(".training-log")
            .suffix(&suffix)
            .tempfile_in(parent)?;
        write(&mut temp)?;
        temp.as_file().sync_all()?;

        temp.persist(&self.path)
            .map(|_| ())
            .map_err(|e| ImportError::ProcessingFailed {
                path: self.path.clone(),
                reason: format!("Failed to replace sheet: {}", e.error),
            })
    }
}

fn first_worksheet<'a>(book: &'a mut Spreadsheet, path: &Path) -> Result<&'a mut Worksheet> {
    book.get_sheet_mut(&0).ok_or_else(|| ImportError::Workbook {
        path: path.to_path_buf(),
        reason: "workbook has no worksheets".to_string(),
    })
}

fn row_is_header(sheet: &Worksheet, row: u32) -> bool {
    (1u32..)
        .zip(SHEET_HEADER)
        .all(|(column, expected)| sheet.get_value((column, row)).trim() == expected)
}

/// Text cells for date, id, and name; numeric cells for the rest
fn write_xlsx_row(sheet: &mut Worksheet, row: u32, sheet_row: &SheetRow<'_>) {
    let record = sheet_row.record;
    sheet
        .get_cell_mut((1, row))
        .set_value(record.timestamp_label());
    if let Some(id) = &sheet_row.exercise_id {
        sheet.get_cell_mut((2, row)).set_value(id.as_str());
    }
    sheet
        .get_cell_mut((3, row))
        .set_value(record.exercise_name.as_str());
    sheet
        .get_cell_mut((4, row))
        .set_value_number(record.input_weight);
    sheet
        .get_cell_mut((5, row))
        .set_value_number(record.total_weight);
    sheet
        .get_cell_mut((6, row))
        .set_value_number(f64::from(record.reps));
    sheet
        .get_cell_mut((7, row))
        .set_value_number(record.rest_before);
}

/// Build the typed frame for new rows, columns in sheet order
pub fn rows_frame(rows: &[SheetRow<'_>]) -> Result<DataFrame> {
    let dates: Vec<String> = rows.iter().map(|r| r.record.timestamp_label()).collect();
    let ids: Vec<Option<String>> = rows.iter().map(|r| r.exercise_id.clone()).collect();
    let names: Vec<&str> = rows.iter().map(|r| r.record.exercise_name.as_str()).collect();
    let input_weights: Vec<f64> = rows.iter().map(|r| r.record.input_weight).collect();
    let total_weights: Vec<f64> = rows.iter().map(|r| r.record.total_weight).collect();
    let reps: Vec<i64> = rows.iter().map(|r| i64::from(r.record.reps)).collect();
    let rest: Vec<f64> = rows.iter().map(|r| r.record.rest_before).collect();

    let df = df!(
        SHEET_HEADER[0] => dates,
        SHEET_HEADER[1] => ids,
        SHEET_HEADER[2] => names,
        SHEET_HEADER[3] => input_weights,
        SHEET_HEADER[4] => total_weights,
        SHEET_HEADER[5] => reps,
        SHEET_HEADER[6] => rest,
    )?;

    Ok(df)
}

/// Same layout as [`rows_frame`] with every cell rendered as text, for CSV sheets
pub fn text_rows_frame(rows: &[SheetRow<'_>]) -> Result<DataFrame> {
    let text = |value: f64| value.to_string();

    let dates: Vec<String> = rows.iter().map(|r| r.record.timestamp_label()).collect();
    let ids: Vec<Option<String>> = rows.iter().map(|r| r.exercise_id.clone()).collect();
    let names: Vec<&str> = rows.iter().map(|r| r.record.exercise_name.as_str()).collect();
    let input_weights: Vec<String> = rows.iter().map(|r| text(r.record.input_weight)).collect();
    let total_weights: Vec<String> = rows.iter().map(|r| text(r.record.total_weight)).collect();
    let reps: Vec<String> = rows.iter().map(|r| r.record.reps.to_string()).collect();
    let rest: Vec<String> = rows.iter().map(|r| text(r.record.rest_before)).collect();

    let df = df!(
        SHEET_HEADER[0] => dates,
        SHEET_HEADER[1] => ids,
        SHEET_HEADER[2] => names,
        SHEET_HEADER[3] => input_weights,
        SHEET_HEADER[4] => total_weights,
        SHEET_HEADER[5] => reps,
        SHEET_HEADER[6] => rest,
    )?;

    Ok(df)
}

/// Read a CSV sheet without assuming a header; every column is text
fn read_csv_as_text(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

fn first_row_is_header(df: &DataFrame) -> Result<bool> {
    if df.height() == 0 {
        return Ok(false);
    }

    for (column, expected) in df.get_columns().iter().zip(SHEET_HEADER) {
        if column.str()?.get(0).map(str::trim) != Some(expected) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn has_sheet_header(df: &DataFrame) -> bool {
    let names = df.get_column_names();
    names.len() == SHEET_HEADER.len()
        && names
            .iter()
            .zip(SHEET_HEADER)
            .all(|(name, expected)| name.as_str() == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_records() -> Vec<SetRecord> {
        let noon = NaiveDate::from_ymd_opt(2026, 2, 9)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        vec![
            SetRecord::new(noon, "Приседания со штангой", 60.0, 10, 2.0),
            SetRecord::new(noon, "Приседания со штангой", 62.5, 8, 0.0),
        ]
    }

    fn rows(records: &[SetRecord]) -> Vec<SheetRow<'_>> {
        records
            .iter()
            .map(|record| SheetRow {
                record,
                exercise_id: None,
            })
            .collect()
    }

    fn read_back(path: &Path) -> DataFrame {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .unwrap()
            .finish()
            .unwrap()
    }

    fn text_cell(df: &DataFrame, column: &str, row: usize) -> Option<String> {
        df.column(column)
            .unwrap()
            .str()
            .unwrap()
            .get(row)
            .map(str::to_string)
    }

    #[test]
    fn test_sheet_format_from_path() {
        assert_eq!(
            SheetFormat::from_path(Path::new("log.csv")).unwrap(),
            SheetFormat::Csv
        );
        assert_eq!(
            SheetFormat::from_path(Path::new("log.PARQUET")).unwrap(),
            SheetFormat::Parquet
        );
        assert_eq!(
            SheetFormat::from_path(Path::new("log.xlsx")).unwrap(),
            SheetFormat::Xlsx
        );
        assert!(matches!(
            SheetFormat::from_path(Path::new("log.ods")),
            Err(ImportError::UnsupportedOutput { .. })
        ));
    }

    #[test]
    fn test_rows_frame_layout() {
        let records = create_test_records();
        let df = rows_frame(&rows(&records)).unwrap();

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, SHEET_HEADER);
        assert_eq!(df.height(), 2);
        assert_eq!(text_cell(&df, "Date", 0).as_deref(), Some("2026.02.09, 12:00"));
        assert_eq!(df.column("Exercise_ID").unwrap().null_count(), 2);
    }

    #[test]
    fn test_append_creates_csv_sheet() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.csv");
        let records = create_test_records();

        let writer = SheetWriter::new(path.clone()).unwrap();
        let summary = writer.append(&rows(&records)).unwrap();

        assert_eq!(summary.rows_appended, 2);
        assert_eq!(summary.total_rows, 2);
        assert!(!summary.header_inserted);

        let content = std::fs::read_to_string(&path).unwrap();
        let first_line = content.lines().next().unwrap();
        assert_eq!(first_line, SHEET_HEADER.join(","));
        assert!(content.contains("\"2026.02.09, 12:00\",,Приседания со штангой,60,60,10,2"));
    }

    #[test]
    fn test_append_treats_blank_csv_as_new() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.csv");
        std::fs::write(&path, "\n  \r\n").unwrap();

        let records = create_test_records();
        let summary = SheetWriter::new(path.clone())
            .unwrap()
            .append(&rows(&records[..1]))
            .unwrap();

        assert_eq!(summary.total_rows, 1);
        assert!(!summary.header_inserted);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().next().unwrap(), SHEET_HEADER.join(","));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_append_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.csv");
        let records = create_test_records();
        let writer = SheetWriter::new(path.clone()).unwrap();

        writer.append(&rows(&records)).unwrap();
        writer.append(&rows(&records)).unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("log.csv")]);
    }

    #[test]
    fn test_append_keeps_existing_csv_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.csv");
        let records = create_test_records();
        let writer = SheetWriter::new(path.clone()).unwrap();

        writer.append(&rows(&records[..1])).unwrap();
        let summary = writer.append(&rows(&records[1..])).unwrap();

        assert_eq!(summary.total_rows, 2);
        let sheet = read_back(&path);
        assert_eq!(text_cell(&sheet, "Input_Weight", 0).as_deref(), Some("60"));
        assert_eq!(text_cell(&sheet, "Input_Weight", 1).as_deref(), Some("62.5"));
    }

    #[test]
    fn test_append_inserts_missing_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.csv");
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "\"2026.01.05, 12:00\",7,Жим лежа,50,50,5,1").unwrap();
        }

        let records = create_test_records();
        let summary = SheetWriter::new(path.clone())
            .unwrap()
            .append(&rows(&records))
            .unwrap();

        assert!(summary.header_inserted);
        assert_eq!(summary.total_rows, 3);

        let sheet = read_back(&path);
        assert!(has_sheet_header(&sheet));
        assert_eq!(text_cell(&sheet, "Exercise_ID", 0).as_deref(), Some("7"));
        assert_eq!(
            text_cell(&sheet, "Exercise_Name_Calc", 2).as_deref(),
            Some("Приседания со штангой")
        );
    }

    #[test]
    fn test_append_rejects_wrong_width_sheet() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.csv");
        std::fs::write(&path, "a,b,c\n1,2,3\n").unwrap();

        let records = create_test_records();
        let result = SheetWriter::new(path).unwrap().append(&rows(&records));

        assert!(matches!(
            result,
            Err(ImportError::HeaderMismatch {
                expected: 7,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_append_parquet_sheet() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.parquet");
        let records = create_test_records();
        let writer = SheetWriter::new(path.clone())
            .unwrap()
            .with_compression(CompressionAlgorithm::Zstd);

        writer.append(&rows(&records)).unwrap();
        let summary = writer.append(&rows(&records)).unwrap();

        assert_eq!(summary.rows_appended, 2);
        assert_eq!(summary.total_rows, 4);

        let sheet = ParquetReader::new(File::open(&path).unwrap())
            .finish()
            .unwrap();
        assert!(has_sheet_header(&sheet));
        assert_eq!(sheet.height(), 4);
    }

    #[test]
    fn test_append_xlsx_workbook() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.xlsx");
        let records = create_test_records();
        let writer = SheetWriter::new(path.clone()).unwrap();

        let first = writer.append(&rows(&records)).unwrap();
        let second = writer.append(&rows(&records[..1])).unwrap();

        assert!(!first.header_inserted);
        assert_eq!(first.total_rows, 2);
        assert_eq!(second.rows_appended, 1);
        assert_eq!(second.total_rows, 3);

        let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        let sheet = book.get_sheet(&0).unwrap();
        assert!(row_is_header(sheet, 1));
        assert_eq!(sheet.get_highest_row(), 4);
        assert_eq!(sheet.get_value((1, 2)), "2026.02.09, 12:00");
        assert_eq!(sheet.get_value((2, 2)), "");
        assert_eq!(sheet.get_value((3, 4)), "Приседания со штангой");
    }

    #[test]
    fn test_append_xlsx_inserts_missing_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.xlsx");
        {
            let mut book = umya_spreadsheet::new_file();
            let sheet = book.get_sheet_mut(&0).unwrap();
            sheet.get_cell_mut((1, 1)).set_value("2026.01.05, 12:00");
            sheet.get_cell_mut((2, 1)).set_value("7");
            sheet.get_cell_mut((3, 1)).set_value("Жим лежа");
            umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
        }

        let records = create_test_records();
        let summary = SheetWriter::new(path.clone())
            .unwrap()
            .append(&rows(&records))
            .unwrap();

        assert!(summary.header_inserted);
        assert_eq!(summary.total_rows, 3);

        let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        let sheet = book.get_sheet(&0).unwrap();
        assert!(row_is_header(sheet, 1));
        assert_eq!(sheet.get_value((3, 2)), "Жим лежа");
        assert_eq!(sheet.get_value((2, 2)), "7");
        assert_eq!(sheet.get_value((3, 3)), "Приседания со штангой");
    }
}
