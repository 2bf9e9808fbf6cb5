// ==========================================
// Proposal Desk - batch validator
// ==========================================
// Responsibility: classify every row, fold results, build the preview summary
// Order: file order is preserved in every output list
// ==========================================

use crate::domain::import::{
    CorrectionLog, ImportStatus, ImportSummary, RowClassificationResult, RowOutcome,
    ValidationError,
};
use crate::domain::proposal::Proposal;
use crate::i18n::t_with_args;
use crate::importer::column_map::ColumnMap;
use crate::importer::importer_trait::ParsedSheet;
use crate::importer::row_classifier::{classify, ClassifierContext};
use tracing::{debug, info};

// ==========================================
// BatchValidation - everything the preview shows
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct BatchValidation {
    pub errors: Vec<ValidationError>,
    pub corrections: Vec<CorrectionLog>,
    pub candidates: Vec<Proposal>,
    pub skipped_rows: Vec<usize>,
    pub summary: ImportSummary,
}

/// Running fold state
#[derive(Debug, Default)]
struct Accumulator {
    errors: Vec<ValidationError>,
    corrections: Vec<CorrectionLog>,
    candidates: Vec<Proposal>,
    skipped_rows: Vec<usize>,
}

impl Accumulator {
    fn absorb(mut self, result: RowClassificationResult) -> Self {
        match result.outcome {
            RowOutcome::Skipped => self.skipped_rows.push(result.row),
            RowOutcome::Classified {
                errors,
                corrections,
                candidate,
            } => {
                self.errors.extend(errors);
                self.corrections.extend(corrections);
                self.candidates.extend(candidate);
            }
        }
        self
    }
}

/// Run the classifier over the whole sheet
///
/// Idempotent: same sheet and context give the same validation.
pub fn validate(sheet: &ParsedSheet, map: &ColumnMap, ctx: &ClassifierContext) -> BatchValidation {
    let missing = map.missing_columns();
    if !missing.is_empty() {
        debug!(sheet = %sheet.name, missing = ?missing, "Columns not found in header");
    }

    let acc = sheet
        .rows
        .iter()
        .map(|row| classify(row, map, ctx))
        .fold(Accumulator::default(), Accumulator::absorb);

    let summary = ImportSummary {
        total_analyzed: sheet.rows.len(),
        new_proposals: acc.candidates.len(),
        updated_proposals: 0,
        total_items: acc.candidates.len(),
        corrections_count: acc.corrections.len(),
        errors_count: acc.errors.len(),
        status: ImportStatus::Partial,
        message: t_with_args("import.analysis_done", &[("sheet", sheet.name.as_str())]),
    };

    info!(
        sheet = %sheet.name,
        analyzed = summary.total_analyzed,
        candidates = summary.new_proposals,
        corrections = summary.corrections_count,
        errors = summary.errors_count,
        skipped = acc.skipped_rows.len(),
        "Sheet analysis finished"
    );

    BatchValidation {
        errors: acc.errors,
        corrections: acc.corrections,
        candidates: acc.candidates,
        skipped_rows: acc.skipped_rows,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::import::{CellValue, CorrectionReason, ImportColumn, RawRow};
    use crate::importer::proposal_synthesizer::tests::test_context;
    use crate::importer::row_classifier::BlankRowPolicy;

    fn sheet(rows: Vec<RawRow>) -> ParsedSheet {
        ParsedSheet {
            name: "Informações de Evento".to_string(),
            headers: vec![
                "Evento".to_string(),
                "Quant. Vagas".to_string(),
                "Valor por inscrição".to_string(),
                "Valor Total".to_string(),
            ],
            rows,
        }
    }

    fn ctx(rows: usize) -> ClassifierContext {
        ClassifierContext {
            blank_row_policy: BlankRowPolicy::EventNameBlank,
            data_row_count: rows,
            import: test_context(),
        }
    }

    fn three_rows() -> ParsedSheet {
        sheet(vec![
            RawRow::new(2, vec!["Corrida A".into(), 3.0.into(), 50.0.into(), 150.0.into()]),
            RawRow::new(3, vec!["Corrida B".into(), "abc".into(), 50.0.into(), CellValue::Empty]),
            RawRow::new(4, vec!["Corrida C".into(), 2.0.into(), "R$ 10,00".into(), 20.0.into()]),
        ])
    }

    #[test]
    fn test_mixed_sheet_summary() {
        let s = three_rows();
        let map = ColumnMap::from_headers(&s.headers);
        let v = validate(&s, &map, &ctx(s.rows.len()));

        assert_eq!(v.summary.total_analyzed, 3);
        assert_eq!(v.summary.errors_count, 1);
        assert_eq!(v.summary.corrections_count, 1);
        assert_eq!(v.summary.new_proposals, 2);
        assert_eq!(v.summary.total_items, 2);
        assert_eq!(v.summary.updated_proposals, 0);
        assert_eq!(v.summary.status, ImportStatus::Partial);

        assert_eq!(v.errors[0].row, 3);
        assert_eq!(v.corrections[0].row, 4);
        assert_eq!(v.corrections[0].reason, CorrectionReason::CurrencyFormatNormalization);
        assert!(!v.summary.message.is_empty());
    }

    #[test]
    fn test_file_order_preserved() {
        let s = sheet(vec![
            RawRow::new(2, vec!["A".into(), 1.5.into(), 10.0.into()]),
            RawRow::new(3, vec!["B".into(), 2.5.into(), 10.0.into()]),
        ]);
        let map = ColumnMap::from_headers(&s.headers);
        let v = validate(&s, &map, &ctx(2));

        let slot_rows: Vec<usize> = v
            .corrections
            .iter()
            .filter(|c| c.column == ImportColumn::Slots)
            .map(|c| c.row)
            .collect();
        assert_eq!(slot_rows, vec![2, 3]);
        assert_eq!(v.candidates[0].items[0].event, "A");
        assert_eq!(v.candidates[1].items[0].event, "B");
    }

    #[test]
    fn test_skipped_rows_counted_in_analyzed_only() {
        let s = sheet(vec![
            RawRow::new(2, vec!["A".into(), 1.0.into(), 10.0.into(), 10.0.into()]),
            RawRow::new(3, vec![CellValue::Empty; 4]),
        ]);
        let map = ColumnMap::from_headers(&s.headers);
        let v = validate(&s, &map, &ctx(2));

        assert_eq!(v.summary.total_analyzed, 2);
        assert_eq!(v.skipped_rows, vec![3]);
        assert_eq!(v.summary.errors_count, 0);
        assert_eq!(v.candidates.len(), 1);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let s = three_rows();
        let map = ColumnMap::from_headers(&s.headers);
        let c = ctx(s.rows.len());
        assert_eq!(validate(&s, &map, &c), validate(&s, &map, &c));
    }

    #[test]
    fn test_every_candidate_has_error_free_row() {
        let s = three_rows();
        let map = ColumnMap::from_headers(&s.headers);
        let v = validate(&s, &map, &ctx(3));

        let error_rows: Vec<usize> = v.errors.iter().map(|e| e.row).collect();
        for candidate in &v.candidates {
            let row_index: usize = candidate.id.rsplit('-').next().unwrap().parse().unwrap();
            assert!(!error_rows.contains(&(row_index + 2)));
        }
    }
}
