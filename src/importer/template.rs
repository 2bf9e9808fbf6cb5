// ==========================================
// Proposal Desk - import template writer
// ==========================================
// Output: workbook with the official proposal sheet
// and the event-information sheet read back by the importer
// ==========================================

use crate::domain::import::ImportColumn;
use crate::importer::error::ImportResult;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

pub const TEMPLATE_FILE_NAME: &str = "CAZARI_IMPORT_TEMPLATE.xlsx";
pub const PROPOSALS_SHEET: &str = "PROPOSTAS";
pub const EVENTS_SHEET: &str = "Informações de Evento";

/// Official column order of the proposal sheet
pub const OFFICIAL_HEADERS: [&str; 17] = [
    "Empresa",
    "Responsável",
    "E-mail",
    "Telefone",
    "Tipo Grupo",
    "Cidade / Praça",
    "Evento",
    "Tipo de Proposta",
    "Valor unitário por inscrição",
    "Valor Proposto",
    "Quant. Vagas",
    "Status",
    "Envio da Proposta",
    "Data de Retorno",
    "Último Contato",
    "Reserva",
    "Observações",
];

/// Write the template workbook to `path` (overwrites)
pub fn write_template(path: &Path) -> ImportResult<()> {
    let header_format = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let proposals = workbook.add_worksheet();
    proposals.set_name(PROPOSALS_SHEET)?;
    for (col, header) in OFFICIAL_HEADERS.iter().enumerate() {
        proposals.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let events = workbook.add_worksheet();
    events.set_name(EVENTS_SHEET)?;
    for (col, column) in ImportColumn::ALL.iter().enumerate() {
        events.write_string_with_format(0, col as u16, column.label(), &header_format)?;
    }

    workbook.save(path)?;
    info!(path = %path.display(), "Import template written");
    Ok(())
}
