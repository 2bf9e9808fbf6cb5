// ==========================================
// Proposal Desk - numeric normalizer
// ==========================================
// Responsibility: locale-formatted money / quantity cells → canonical numbers
// Accepts: Brazilian decimal commas, "R$" prefixes, already-numeric cells
// Never panics; `None` means missing or unparsable
// ==========================================

use crate::domain::import::CellValue;

/// Currency token stripped before parsing
const CURRENCY_TOKEN: &str = "R$";

/// Normalize a cell to a number
///
/// - Empty / blank text / dates → None
/// - Number → unchanged
/// - Text → strip "R$" and whitespace, resolve separators, parse
pub fn normalize(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Empty | CellValue::Date(_) => None,
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => normalize_text(s),
    }
}

/// Normalize free text
///
/// Separator rules:
/// - a comma is present → it is the decimal separator, dots group thousands ("1.234,56")
/// - several dots and no comma → dots group thousands ("1.234.567")
/// - a single dot and no comma → decimal point ("10.5")
pub fn normalize_text(raw: &str) -> Option<f64> {
    let stripped: String = raw
        .replacen(CURRENCY_TOKEN, "", 1)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if stripped.is_empty() {
        return None;
    }

    let canonical = if stripped.contains(',') {
        stripped.replace('.', "").replacen(',', ".", 1)
    } else if stripped.matches('.').count() > 1 {
        stripped.replace('.', "")
    } else {
        stripped
    };

    canonical.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Literal numeric reading of a cell, without any locale handling
///
/// Text reads as its leading decimal number, so `"3.0"` is 3.0, `"50,00"` is 50
/// and `"1.234,56"` is 1.234, while `"R$ 10"` has no literal value.
/// Normalization counts as a correction only when it disagrees with this reading.
pub fn literal_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => leading_number(s),
        CellValue::Empty | CellValue::Date(_) => None,
    }
}

fn leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    while bytes.get(end).map_or(false, u8::is_ascii_digit) {
        end += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while bytes.get(end).map_or(false, u8::is_ascii_digit) {
            end += 1;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Equal up to floating point noise, relative to the larger magnitude
pub fn same_amount(a: f64, b: f64) -> bool {
    (a - b).abs() <= 4.0 * f64::EPSILON * a.abs().max(b.abs()).max(1.0)
}
