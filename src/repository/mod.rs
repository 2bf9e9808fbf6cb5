// ==========================================
// Proposal Desk - data repository layer
// ==========================================
// Red line: repositories hold no business logic
// Responsibility: data access behind typed interfaces
// Constraint: every query is parameterised
// ==========================================

pub mod directory_repo;
pub mod error;
pub mod kv_store;
pub mod proposal_repo;

// Re-export core repositories
pub use directory_repo::{DirectoryRepository, EventRepository, Keyed, PracaRepository, UserRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use kv_store::KvStore;
pub use proposal_repo::{ProposalRepository, SqliteProposalRepository, PROPOSALS_NAMESPACE};
