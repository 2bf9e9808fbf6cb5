// ==========================================
// Proposal Desk - file parser implementations
// ==========================================
// Stage 0: read the file, pick the sheet, type every cell once
// Supports: Excel (.xlsx/.xls/.xlsm/.ods) / CSV (.csv)
// ==========================================

use crate::domain::import::{CellValue, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, ParsedSheet};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Sheet name fragment preferred by default
pub const DEFAULT_SHEET_KEYWORD: &str = "evento";

/// Pick the first sheet whose name contains `keyword` (case-insensitive), else the first sheet
pub fn select_sheet(sheet_names: &[String], keyword: &str) -> Option<String> {
    let keyword = keyword.to_lowercase();
    sheet_names
        .iter()
        .find(|name| !keyword.is_empty() && name.to_lowercase().contains(&keyword))
        .or_else(|| sheet_names.first())
        .cloned()
}

fn check_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// Brazilian exports use ';' because ',' is the decimal separator
    fn detect_delimiter(path: &Path) -> ImportResult<u8> {
        let mut first_line = String::new();
        BufReader::new(File::open(path)?).read_line(&mut first_line)?;
        let semicolons = first_line.matches(';').count();
        let commas = first_line.matches(',').count();
        Ok(if semicolons > commas { b';' } else { b',' })
    }
}

impl FileParser for CsvParser {
    fn parse_sheet(&self, file_path: &Path, _sheet_keyword: &str) -> ImportResult<ParsedSheet> {
        check_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let name = file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("csv")
            .to_string();

        let delimiter = Self::detect_delimiter(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .flexible(true) // rows may have different lengths
            .from_path(file_path)?;

        let mut records = reader.records();
        let headers: Vec<String> = match records.next() {
            Some(header) => header?.iter().map(|h| h.trim().to_string()).collect(),
            None => return Err(ImportError::EmptySheet(name)),
        };

        let mut rows = Vec::new();
        for (idx, result) in records.enumerate() {
            let record = result?;
            let cells = record.iter().map(CellValue::from).collect();
            // header is row 1
            rows.push(RawRow::new(idx + 2, cells));
        }

        debug!(sheet = %name, rows = rows.len(), "CSV parsed");
        Ok(ParsedSheet { name, headers, rows })
    }
}

// ==========================================
// Excel Parser
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// Excel serial date (1900 system) to a timestamp
    fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
        if !serial.is_finite() || serial < 0.0 {
            return None;
        }
        let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
        let millis = (serial * 86_400_000.0).round() as i64;
        base.checked_add_signed(Duration::milliseconds(millis))
    }

    fn to_cell_value(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) if s.trim().is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            Data::DateTime(dt) => match Self::serial_to_datetime(dt.as_f64()) {
                Some(value) => CellValue::Date(value),
                None => CellValue::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .map(|d| d.and_time(chrono::NaiveTime::MIN))
                })
                .map(CellValue::Date)
                .unwrap_or_else(|_| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(_) => CellValue::Text(cell.to_string()),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_sheet(&self, file_path: &Path, sheet_keyword: &str) -> ImportResult<ParsedSheet> {
        check_exists(file_path)?;

        let ext = extension_of(file_path);
        if !matches!(ext.as_str(), "xlsx" | "xls" | "xlsm" | "ods") {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_names = workbook.sheet_names().to_owned();
        let name = select_sheet(&sheet_names, sheet_keyword).ok_or(ImportError::NoSheets)?;

        let range = workbook.worksheet_range(&name)?;
        if range.is_empty() {
            return Err(ImportError::EmptySheet(name));
        }

        // the used range may not start at A1
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let pad = start_col as usize;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::EmptySheet(name.clone()))?;

        let headers: Vec<String> = std::iter::repeat(String::new())
            .take(pad)
            .chain(header_row.iter().map(|cell| cell.to_string().trim().to_string()))
            .collect();

        let mut rows = Vec::new();
        for (idx, data_row) in sheet_rows.enumerate() {
            let cells: Vec<CellValue> = std::iter::repeat(CellValue::Empty)
                .take(pad)
                .chain(data_row.iter().map(Self::to_cell_value))
                .collect();
            // +1 for 1-based numbering, +1 for the header row
            rows.push(RawRow::new(start_row as usize + idx + 2, cells));
        }

        debug!(sheet = %name, rows = rows.len(), "Excel sheet parsed");
        Ok(ParsedSheet {
            name,
            headers,
            rows,
        })
    }
}

// ==========================================
// Universal parser (dispatch on extension)
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_sheet(&self, file_path: &Path, sheet_keyword: &str) -> ImportResult<ParsedSheet> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse_sheet(file_path, sheet_keyword),
            "xlsx" | "xls" | "xlsm" | "ods" => ExcelParser.parse_sheet(file_path, sheet_keyword),
            other => {
                check_exists(file_path)?;
                Err(ImportError::UnsupportedFormat(other.to_string()))
            }
        }
    }
}
