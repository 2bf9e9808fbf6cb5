// ==========================================
// Proposal Desk - spreadsheet import model
// ==========================================
// Responsibility: cell values, row-level findings and the import summary
// Lifecycle: everything here lives only for one import session
// ==========================================

use crate::domain::proposal::Proposal;
use crate::i18n::t;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CellValue - one spreadsheet cell, typed once at parse time
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
}

impl CellValue {
    /// Empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) | CellValue::Date(_) => false,
        }
    }

    /// Trimmed text rendering used for descriptive fields
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Date(d) if d.time() == chrono::NaiveTime::MIN => {
                write!(f, "{}", d.date().format("%Y-%m-%d"))
            }
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

// ==========================================
// RawRow - ordered cells plus the 1-based sheet row number
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize,
    pub cells: Vec<CellValue>,
}

impl RawRow {
    pub fn new(row_number: usize, cells: Vec<CellValue>) -> Self {
        Self { row_number, cells }
    }
}

// ==========================================
// ImportColumn - canonical event-sheet columns
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportColumn {
    #[serde(rename = "Evento")]
    Event,
    #[serde(rename = "Cidade / Praça")]
    City,
    #[serde(rename = "Sigla da Praça")]
    PracaCode,
    #[serde(rename = "Valor por inscrição")]
    UnitValue,
    #[serde(rename = "Quant. Vagas")]
    Slots,
    #[serde(rename = "Valor Total")]
    TotalValue,
    #[serde(rename = "Observações")]
    Observations,
}

impl ImportColumn {
    /// Template order
    pub const ALL: [ImportColumn; 7] = [
        ImportColumn::Event,
        ImportColumn::City,
        ImportColumn::PracaCode,
        ImportColumn::UnitValue,
        ImportColumn::Slots,
        ImportColumn::TotalValue,
        ImportColumn::Observations,
    ];

    /// Header label as it appears in the spreadsheet
    pub fn label(&self) -> &'static str {
        match self {
            ImportColumn::Event => "Evento",
            ImportColumn::City => "Cidade / Praça",
            ImportColumn::PracaCode => "Sigla da Praça",
            ImportColumn::UnitValue => "Valor por inscrição",
            ImportColumn::Slots => "Quant. Vagas",
            ImportColumn::TotalValue => "Valor Total",
            ImportColumn::Observations => "Observações",
        }
    }
}

impl fmt::Display for ImportColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==========================================
// Reasons
// ==========================================

/// Why a field blocks its row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationReason {
    InvalidSlots,
    InvalidUnitValue,
    MissingEventName,
}

impl ValidationReason {
    pub fn message(&self) -> String {
        match self {
            ValidationReason::InvalidSlots => t("validation.invalid_slots"),
            ValidationReason::InvalidUnitValue => t("validation.invalid_unit_value"),
            ValidationReason::MissingEventName => t("validation.missing_event_name"),
        }
    }
}

/// Why a field value was rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrectionReason {
    IntegerRounding,
    CurrencyFormatNormalization,
    AutomaticRecalculation,
}

impl CorrectionReason {
    pub fn message(&self) -> String {
        match self {
            CorrectionReason::IntegerRounding => t("correction.integer_rounding"),
            CorrectionReason::CurrencyFormatNormalization => t("correction.currency_format"),
            CorrectionReason::AutomaticRecalculation => t("correction.recalculation"),
        }
    }
}

// ==========================================
// ValidationError - blocks the row
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub row: usize,
    pub column: ImportColumn,
    pub reason: ValidationReason,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{} [{}]: {}", self.row, self.column, self.reason.message())
    }
}

// ==========================================
// CorrectionLog - informational, never blocks
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionLog {
    pub row: usize,
    pub column: ImportColumn,
    pub original: CellValue,
    pub corrected: f64,
    pub reason: CorrectionReason,
}

impl fmt::Display for CorrectionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "L{} [{}]: {} -> {} ({})",
            self.row,
            self.column,
            self.original,
            CellValue::Number(self.corrected),
            self.reason.message()
        )
    }
}

// ==========================================
// ImportSummary
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Success,
    Partial,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_analyzed: usize,
    pub new_proposals: usize,
    pub updated_proposals: usize,
    pub total_items: usize,
    pub corrections_count: usize,
    pub errors_count: usize,
    pub status: ImportStatus,
    pub message: String,
}

// ==========================================
// RowClassificationResult - immutable per-row outcome
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Structural blank row, contributes nothing
    Skipped,
    Classified {
        errors: Vec<ValidationError>,
        corrections: Vec<CorrectionLog>,
        candidate: Option<Proposal>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowClassificationResult {
    pub row: usize,
    pub outcome: RowOutcome,
}

impl RowClassificationResult {
    pub fn skipped(row: usize) -> Self {
        Self {
            row,
            outcome: RowOutcome::Skipped,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, RowOutcome::Skipped)
    }

    pub fn errors(&self) -> &[ValidationError] {
        match &self.outcome {
            RowOutcome::Classified { errors, .. } => errors,
            RowOutcome::Skipped => &[],
        }
    }

    pub fn corrections(&self) -> &[CorrectionLog] {
        match &self.outcome {
            RowOutcome::Classified { corrections, .. } => corrections,
            RowOutcome::Skipped => &[],
        }
    }

    pub fn candidate(&self) -> Option<&Proposal> {
        match &self.outcome {
            RowOutcome::Classified { candidate, .. } => candidate.as_ref(),
            RowOutcome::Skipped => None,
        }
    }
}
