// ==========================================
// Proposal Desk - API layer
// ==========================================
// Responsibility: business operations for the CLI and any front end
// ==========================================

pub mod dashboard_api;
pub mod directory_api;
pub mod error;
pub mod import_api;
pub mod proposal_api;

// Re-export core types
pub use dashboard_api::DashboardApi;
pub use directory_api::{DirectoryApi, DEFAULT_PRACAS};
pub use error::{ApiError, ApiResult};
pub use import_api::{
    ImportApi, ImportEvent, ImportSession, ImportStage, NotificationLevel, Notifier,
    TracingNotifier,
};
pub use proposal_api::ProposalApi;
