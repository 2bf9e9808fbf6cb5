// ==========================================
// Proposal Desk - engine layer
// ==========================================
// Responsibility: pure business rules over domain records
// Red line: engines do no I/O; repositories are driven by the API layer
// ==========================================

pub mod dashboard;
pub mod visibility;

// Re-export engines
pub use dashboard::{DashboardEngine, DashboardStats, StatusCount};
pub use visibility::{executives_in_praca, is_visible_to, visible_proposals, ProposalFilter};
