// ==========================================
// Proposal Desk - proposal domain model
// ==========================================
// Responsibility: the permanent proposal record and its line items
// Used by: importer (synthesizer output), repository (JSON documents), dashboard
// ==========================================

use crate::domain::types::{
    ActionType, PaymentMethod, ProposalModality, ProposalStatus, ProposalType, ReservationStatus,
    WithdrawalType,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ActionLog - who touched a record and how
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLog {
    pub user_id: String,
    pub user_name: String,
    pub action: ActionType,
    pub timestamp: DateTime<Utc>,
}

impl ActionLog {
    pub fn new(user_id: &str, user_name: &str, action: ActionType, timestamp: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            action,
            timestamp,
        }
    }
}

// ==========================================
// ProposalItem - slots reserved for one event
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalItem {
    pub id: String,
    pub proposal_id: String,
    pub event: String,
    pub city: String,
    pub sigla: String,          // territory code as typed on the sheet
    pub unit_value: f64,        // price per slot (BRL, cents kept)
    pub total_value: f64,       // slots * unit_value
    pub slots: u32,
    pub payment_deadline: String,
    pub withdrawal_type: WithdrawalType,
    pub observation: String,
}

// ==========================================
// ProposalPackageItem - multi-event package line
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalPackageItem {
    pub event_id: String,
    pub slots: u32,
    pub unit_value: f64,
    pub registration_deadline: String,
    pub payment_deadline: String,
}

impl ProposalPackageItem {
    pub fn value(&self) -> f64 {
        self.slots as f64 * self.unit_value
    }
}

// ==========================================
// Proposal - permanent record
// ==========================================
// Invariants:
// - id is unique in the store
// - owner_user_id and praca_id are never empty
// - every item.proposal_id == id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    // ===== identity =====
    pub id: String,

    // ===== contact =====
    pub company: String,
    pub responsible: String,
    pub email: String,
    pub phone: String,
    pub group_type: String,

    // ===== commercial =====
    #[serde(rename = "type")]
    pub proposal_type: ProposalType,
    pub modality: ProposalModality,
    pub status: ProposalStatus,
    pub sent_date: NaiveDate,
    pub return_date: NaiveDate, // follow-up date
    pub last_contact: NaiveDate,
    pub reservation: ReservationStatus,
    pub observations: String,
    pub items: Vec<ProposalItem>,
    pub payment_method: Option<PaymentMethod>,
    pub withdrawal_type: Option<WithdrawalType>,

    // ===== ownership =====
    pub responsible_executive_id: String, // legacy mirror of owner_user_id
    pub owner_user_id: String,
    pub praca_id: String,

    pub upload_deadline: String,
    pub reminder_days: u32,

    // ===== audit =====
    pub created_by: Option<ActionLog>,
    #[serde(default)]
    pub updated_by: Vec<ActionLog>,

    #[serde(default)]
    pub package_items: Vec<ProposalPackageItem>,
}

impl Proposal {
    /// Total value across line items and package items
    pub fn total_value(&self) -> f64 {
        let items: f64 = self.items.iter().map(|i| i.total_value).sum();
        let packages: f64 = self.package_items.iter().map(|p| p.value()).sum();
        items + packages
    }

    /// Total slots across line items and package items
    pub fn total_slots(&self) -> u64 {
        let items: u64 = self.items.iter().map(|i| i.slots as u64).sum();
        let packages: u64 = self.package_items.iter().map(|p| p.slots as u64).sum();
        items + packages
    }

    /// Follow-up date already passed while the deal is still open
    pub fn is_follow_up_delayed(&self, today: NaiveDate) -> bool {
        self.return_date < today && self.status != ProposalStatus::Concluida
    }
}
