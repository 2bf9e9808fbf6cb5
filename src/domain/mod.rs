// ==========================================
// Proposal Desk - domain layer
// ==========================================
// Responsibility: entities, value sets and import findings
// Red line: no data access, no import logic
// ==========================================

pub mod directory;
pub mod import;
pub mod proposal;
pub mod types;

// Re-export core types
pub use directory::{normalize_praca_ids, Event, Praca, User};
pub use import::{
    CellValue, CorrectionLog, CorrectionReason, ImportColumn, ImportStatus, ImportSummary,
    RawRow, RowClassificationResult, RowOutcome, ValidationError, ValidationReason,
};
pub use proposal::{ActionLog, Proposal, ProposalItem, ProposalPackageItem};
pub use types::{
    ActionType, PaymentMethod, ProposalModality, ProposalStatus, ProposalType, ReservationStatus,
    UserRole, WithdrawalType,
};
