// ==========================================
// Proposal Desk - proposal synthesizer
// ==========================================
// Responsibility: accepted event row → complete Proposal record
// Invariant: the output satisfies every permanent-record rule
// (unique id, owner, territory, single consistent line item)
// ==========================================

use crate::domain::proposal::{ActionLog, Proposal, ProposalItem};
use crate::domain::types::{
    ActionType, ProposalModality, ProposalStatus, ProposalType, ReservationStatus, WithdrawalType,
};
use crate::domain::User;
use chrono::{DateTime, Duration, Utc};

// ===== bulk-import defaults =====
pub const IMPORT_COMPANY: &str = "Importado via Info Evento";
pub const IMPORT_RESPONSIBLE: &str = "Automático";
pub const IMPORT_EMAIL: &str = "import@sistema.com";
pub const IMPORT_GROUP_TYPE: &str = "Geral";
pub const IMPORT_OBSERVATIONS: &str = "Importação rápida de Informações de Evento";

pub const DEFAULT_REMINDER_DAYS: u32 = 3;
pub const DEFAULT_RETURN_OFFSET_DAYS: i64 = 1;

// ==========================================
// ImportContext - everything outside the row
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ImportContext {
    /// User performing the import; becomes owner and executive
    pub acting_user: User,
    /// Fixed once per analysis so ids stay reproducible
    pub imported_at: DateTime<Utc>,
    pub reminder_days: u32,
    pub return_offset_days: i64,
}

impl ImportContext {
    pub fn new(acting_user: User, imported_at: DateTime<Utc>) -> Self {
        Self {
            acting_user,
            imported_at,
            reminder_days: DEFAULT_REMINDER_DAYS,
            return_offset_days: DEFAULT_RETURN_OFFSET_DAYS,
        }
    }
}

// ==========================================
// AcceptedRow - validated, corrected field values
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedRow {
    pub row_number: usize,
    pub event: String,
    pub city: String,
    pub sigla: String,
    pub slots: u32,
    pub unit_value: f64,
    pub total_value: f64,
    pub observation: String,
}

/// Build the permanent record for one accepted row
pub fn synthesize(row: &AcceptedRow, ctx: &ImportContext) -> Proposal {
    // 0-based position among data rows (sheet row 2 → 0)
    let row_index = row.row_number.saturating_sub(2);
    let id = format!("EVENT-{}-{}", ctx.imported_at.timestamp_millis(), row_index);

    let today = ctx.imported_at.date_naive();
    let return_date = today + Duration::days(ctx.return_offset_days);

    let user = &ctx.acting_user;
    let praca_id = if row.sigla.is_empty() {
        user.default_praca_id.clone()
    } else {
        row.sigla.clone()
    };

    let item = ProposalItem {
        id: format!("ITEM-{}", id),
        proposal_id: id.clone(),
        event: row.event.clone(),
        city: row.city.clone(),
        sigla: row.sigla.clone(),
        unit_value: row.unit_value,
        total_value: row.total_value,
        slots: row.slots,
        payment_deadline: String::new(),
        withdrawal_type: WithdrawalType::Individual,
        observation: row.observation.clone(),
    };

    Proposal {
        id,
        company: IMPORT_COMPANY.to_string(),
        responsible: IMPORT_RESPONSIBLE.to_string(),
        email: IMPORT_EMAIL.to_string(),
        phone: String::new(),
        group_type: IMPORT_GROUP_TYPE.to_string(),
        proposal_type: ProposalType::Company,
        modality: ProposalModality::Individual,
        status: ProposalStatus::PrimeiraProposta,
        sent_date: today,
        return_date,
        last_contact: today,
        reservation: ReservationStatus::Nao,
        observations: IMPORT_OBSERVATIONS.to_string(),
        items: vec![item],
        payment_method: None,
        withdrawal_type: None,
        responsible_executive_id: user.id.clone(),
        owner_user_id: user.id.clone(),
        praca_id,
        upload_deadline: String::new(),
        reminder_days: ctx.reminder_days,
        created_by: Some(ActionLog::new(
            &user.id,
            &user.name,
            ActionType::Criou,
            ctx.imported_at,
        )),
        updated_by: Vec::new(),
        package_items: Vec::new(),
    }
}
