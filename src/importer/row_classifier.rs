// ==========================================
// Proposal Desk - row classifier
// ==========================================
// Responsibility: one raw row → skipped, rejected, or accepted with corrections
// Pure: same row + same context → same result
// Order: blank check → slots → unit value → total → synthesis
// ==========================================

use crate::domain::import::{
    CellValue, CorrectionLog, CorrectionReason, ImportColumn, RawRow, RowClassificationResult,
    RowOutcome, ValidationError, ValidationReason,
};
use crate::importer::column_map::ColumnMap;
use crate::importer::numeric::{literal_number, normalize, same_amount};
use crate::importer::proposal_synthesizer::{synthesize, AcceptedRow, ImportContext};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// BlankRowPolicy - when a row is structural padding
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlankRowPolicy {
    /// Skip when the event name is blank, unless the sheet has a single data row
    #[default]
    EventNameBlank,
    /// Skip when every recognized column is blank, whatever the sheet size
    AllRecognizedEmpty,
}

impl BlankRowPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlankRowPolicy::EventNameBlank => "EVENT_NAME_BLANK",
            BlankRowPolicy::AllRecognizedEmpty => "ALL_RECOGNIZED_EMPTY",
        }
    }
}

impl fmt::Display for BlankRowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlankRowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EVENT_NAME_BLANK" => Ok(BlankRowPolicy::EventNameBlank),
            "ALL_RECOGNIZED_EMPTY" => Ok(BlankRowPolicy::AllRecognizedEmpty),
            other => Err(format!("unknown blank row policy: {}", other)),
        }
    }
}

// ==========================================
// ClassifierContext
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierContext {
    pub blank_row_policy: BlankRowPolicy,
    /// Number of data rows in the sheet (header excluded)
    pub data_row_count: usize,
    pub import: ImportContext,
}

/// Outcome of checking one numeric field
struct FieldCheck<T> {
    value: Option<T>,
    correction: Option<CorrectionLog>,
}

fn correction(
    row: usize,
    column: ImportColumn,
    original: &CellValue,
    corrected: f64,
    reason: CorrectionReason,
) -> CorrectionLog {
    CorrectionLog {
        row,
        column,
        original: original.clone(),
        corrected,
        reason,
    }
}

/// Strictly positive finite number, after normalization
fn positive(cell: &CellValue) -> Option<f64> {
    normalize(cell).filter(|v| v.is_finite() && *v > 0.0)
}

/// Slot counts must fit a `u32` after flooring; larger counts are invalid
fn check_slots(row: usize, cell: &CellValue) -> FieldCheck<u32> {
    let canonical = positive(cell)
        .map(f64::floor)
        .filter(|v| *v <= f64::from(u32::MAX));
    let Some(canonical) = canonical else {
        return FieldCheck {
            value: None,
            correction: None,
        };
    };

    let corrected = (literal_number(cell) != Some(canonical)).then(|| {
        correction(
            row,
            ImportColumn::Slots,
            cell,
            canonical,
            CorrectionReason::IntegerRounding,
        )
    });

    FieldCheck {
        // in range, checked above
        value: Some(canonical as u32),
        correction: corrected,
    }
}

fn check_unit_value(row: usize, cell: &CellValue) -> FieldCheck<f64> {
    let Some(number) = positive(cell) else {
        return FieldCheck {
            value: None,
            correction: None,
        };
    };

    let corrected = (literal_number(cell) != Some(number)).then(|| {
        correction(
            row,
            ImportColumn::UnitValue,
            cell,
            number,
            CorrectionReason::CurrencyFormatNormalization,
        )
    });

    FieldCheck {
        value: Some(number),
        correction: corrected,
    }
}

fn is_blank_row(row: &RawRow, event: &str, map: &ColumnMap, ctx: &ClassifierContext) -> bool {
    match ctx.blank_row_policy {
        BlankRowPolicy::EventNameBlank => event.is_empty() && ctx.data_row_count > 1,
        BlankRowPolicy::AllRecognizedEmpty => map.all_mapped_blank(row),
    }
}

/// Classify one data row
pub fn classify(row: &RawRow, map: &ColumnMap, ctx: &ClassifierContext) -> RowClassificationResult {
    let row_number = row.row_number;
    let event = map.get(row, ImportColumn::Event).to_text();

    if is_blank_row(row, &event, map, ctx) {
        return RowClassificationResult::skipped(row_number);
    }

    let mut errors = Vec::new();
    let mut corrections = Vec::new();

    // source behaviour leaves a lone nameless row without an event error
    if event.is_empty() && ctx.blank_row_policy == BlankRowPolicy::AllRecognizedEmpty {
        errors.push(ValidationError {
            row: row_number,
            column: ImportColumn::Event,
            reason: ValidationReason::MissingEventName,
        });
    }

    // ===== slots =====
    let slots = check_slots(row_number, map.get(row, ImportColumn::Slots));
    if slots.value.is_none() {
        errors.push(ValidationError {
            row: row_number,
            column: ImportColumn::Slots,
            reason: ValidationReason::InvalidSlots,
        });
    }
    corrections.extend(slots.correction);

    // ===== unit value =====
    let unit = check_unit_value(row_number, map.get(row, ImportColumn::UnitValue));
    if unit.value.is_none() {
        errors.push(ValidationError {
            row: row_number,
            column: ImportColumn::UnitValue,
            reason: ValidationReason::InvalidUnitValue,
        });
    }
    corrections.extend(unit.correction);

    // ===== total (always recalculated) =====
    let candidate = match (slots.value, unit.value) {
        (Some(slot_count), Some(unit_value)) => {
            let calculated = f64::from(slot_count) * unit_value;
            let stated_cell = map.get(row, ImportColumn::TotalValue);
            let matches_stated = normalize(stated_cell).map_or(false, |s| same_amount(s, calculated));
            if !matches_stated {
                corrections.push(correction(
                    row_number,
                    ImportColumn::TotalValue,
                    stated_cell,
                    calculated,
                    CorrectionReason::AutomaticRecalculation,
                ));
            }

            (!event.is_empty()).then(|| {
                let accepted = AcceptedRow {
                    row_number,
                    event: event.clone(),
                    city: map.get(row, ImportColumn::City).to_text(),
                    sigla: map.get(row, ImportColumn::PracaCode).to_text(),
                    slots: slot_count,
                    unit_value,
                    total_value: calculated,
                    observation: map.get(row, ImportColumn::Observations).to_text(),
                };
                synthesize(&accepted, &ctx.import)
            })
        }
        _ => None,
    };

    RowClassificationResult {
        row: row_number,
        outcome: RowOutcome::Classified {
            errors,
            corrections,
            candidate,
        },
    }
}
