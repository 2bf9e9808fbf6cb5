// ==========================================
// Proposal Desk - importer traits
// ==========================================
// Responsibility: seams of the import pipeline (no implementations here)
// ==========================================

use crate::domain::import::RawRow;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// ParsedSheet - the selected sheet, typed cells
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSheet {
    /// Name of the sheet that was selected
    pub name: String,
    /// Header texts of row 1, trimmed
    pub headers: Vec<String>,
    /// Data rows (row 2 onward), unfiltered
    pub rows: Vec<RawRow>,
}

// ==========================================
// FileParser Trait
// ==========================================
// Implementors: ExcelParser, CsvParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// Read one sheet of a tabular file
    ///
    /// # Arguments
    /// - file_path: spreadsheet path
    /// - sheet_keyword: preferred sheet name fragment (case-insensitive);
    ///   the first sheet is used when no name matches
    ///
    /// # Returns
    /// - Ok(ParsedSheet): header texts and typed data rows
    /// - Err(ImportError): structural failure, nothing was classified
    fn parse_sheet(&self, file_path: &Path, sheet_keyword: &str) -> ImportResult<ParsedSheet>;
}
