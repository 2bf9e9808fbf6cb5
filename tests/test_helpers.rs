// ==========================================
// Test helpers
// ==========================================
// Responsibility: temporary databases, users and spreadsheets for the integration tests
// ==========================================
#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use proposal_desk::api::{NotificationLevel, Notifier};
use proposal_desk::domain::{ImportColumn, Proposal, ProposalStatus, User, UserRole};
use proposal_desk::importer::{synthesize, AcceptedRow, ImportContext};
use proposal_desk::importer::template::EVENTS_SHEET;
use proposal_desk::repository::KvStore;
use rust_xlsxwriter::Workbook;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Temporary database file with the schema in place
///
/// # Returns
/// - NamedTempFile: keep it alive for the duration of the test
/// - String: database path
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("non-utf8 temp path")?
        .to_string();
    proposal_desk::db::open_sqlite_connection(&db_path)?;
    Ok((temp_file, db_path))
}

pub fn test_store() -> (NamedTempFile, KvStore) {
    let (file, db_path) = create_test_db().unwrap();
    let store = KvStore::new(&db_path).unwrap();
    (file, store)
}

pub fn user(id: &str, role: UserRole, pracas: &[&str]) -> User {
    let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    User {
        id: id.to_string(),
        name: format!("Usuário {}", id),
        email: format!("{}@cazari.com.br", id),
        phone: None,
        title: "Executivo".to_string(),
        role,
        praca_ids: pracas.iter().map(|p| p.to_string()).collect(),
        default_praca_id: pracas.first().map(|p| p.to_string()).unwrap_or_default(),
        active: true,
        created_at: at,
        updated_at: at,
    }
}

pub fn admin() -> User {
    user("admin", UserRole::Admin, &["BH", "BSB", "SSA", "REC", "SP"])
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Single-item proposal owned by `owner`, id left blank for `ProposalApi::create`
pub fn proposal(
    owner: &User,
    praca: &str,
    status: ProposalStatus,
    return_date: NaiveDate,
    value: f64,
) -> Proposal {
    let row = AcceptedRow {
        row_number: 2,
        event: "Corrida".to_string(),
        city: "Cidade".to_string(),
        sigla: praca.to_string(),
        slots: 1,
        unit_value: value,
        total_value: value,
        observation: String::new(),
    };
    let mut p = synthesize(&row, &ImportContext::new(owner.clone(), Utc::now()));
    p.id.clear();
    p.company = format!("Empresa {}", praca);
    p.status = status;
    p.return_date = return_date;
    p
}

/// Cell written into the event sheet
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

/// Write an .xlsx with a decoy first sheet and the event sheet.
///
/// Every row follows the template column order:
/// Evento, Cidade / Praça, Sigla da Praça, Valor por inscrição, Quant. Vagas, Valor Total, Observações
pub fn write_event_workbook(dir: &Path, file_name: &str, rows: &[Vec<Cell>]) -> PathBuf {
    let path = dir.join(file_name);
    let mut workbook = Workbook::new();

    let decoy = workbook.add_worksheet();
    decoy.set_name("PROPOSTAS").unwrap();
    decoy.write_string(0, 0, "Empresa").unwrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name(EVENTS_SHEET).unwrap();
    for (col, column) in ImportColumn::ALL.iter().enumerate() {
        sheet.write_string(0, col as u16, column.label()).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(r, c, *s).unwrap();
                }
                Cell::Number(n) => {
                    sheet.write_number(r, c, *n).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }

    workbook.save(&path).unwrap();
    path
}

/// The sheet used by the import tests:
/// - row 2: clean
/// - row 3: Brazilian currency text, no total (2 corrections)
/// - row 4: non-numeric unit value (1 error)
/// - row 5: blank (skipped)
/// - row 6: fractional slots, wrong total (2 corrections)
pub fn mixed_rows() -> Vec<Vec<Cell<'static>>> {
    use Cell::*;
    vec![
        vec![
            Text("Maratona BH"),
            Text("Belo Horizonte"),
            Text("BH"),
            Number(150.0),
            Number(10.0),
            Number(1500.0),
            Text("lote 1"),
        ],
        vec![
            Text("Corrida SP"),
            Text("São Paulo"),
            Text("SP"),
            Text("R$ 1.234,56"),
            Text("2"),
            Blank,
            Blank,
        ],
        vec![
            Text("Evento Ruim"),
            Text("Recife"),
            Text("REC"),
            Text("abc"),
            Number(5.0),
            Blank,
            Blank,
        ],
        vec![Blank, Blank, Blank, Blank, Blank, Blank, Blank],
        vec![
            Text("Trail SSA"),
            Text("Salvador"),
            Text("SSA"),
            Number(100.0),
            Number(2.7),
            Number(999.0),
            Blank,
        ],
    ]
}

/// Notifier that keeps every message for later assertions
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<(String, NotificationLevel)>>,
}

impl RecordingNotifier {
    pub fn levels(&self) -> Vec<NotificationLevel> {
        self.messages.lock().unwrap().iter().map(|(_, l)| *l).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, level: NotificationLevel) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), level));
    }
}
