// ==========================================
// Proposal Desk - proposal repository
// ==========================================
// Responsibility: persistence of Proposal documents
// Storage: kv_store namespace "proposals", one JSON document per id
// Red line: no business rules, only CRUD
// ==========================================

use crate::domain::proposal::Proposal;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::kv_store::KvStore;
use async_trait::async_trait;
use tracing::debug;

pub const PROPOSALS_NAMESPACE: &str = "proposals";

// ==========================================
// ProposalRepository Trait
// ==========================================
#[async_trait]
pub trait ProposalRepository: Send + Sync {
    /// Every stored proposal, oldest first
    async fn list_all(&self) -> RepositoryResult<Vec<Proposal>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Proposal>>;

    /// Fails with DuplicateKey when the id exists
    async fn insert(&self, proposal: &Proposal) -> RepositoryResult<()>;

    /// Fails with NotFound when the id does not exist
    async fn update(&self, proposal: &Proposal) -> RepositoryResult<()>;

    async fn delete(&self, id: &str) -> RepositoryResult<bool>;

    /// Append a batch atomically
    ///
    /// # Returns
    /// - Ok(n): all `n` proposals stored
    /// - Err: nothing stored (a duplicate id aborts the whole batch)
    async fn append_all(&self, proposals: &[Proposal]) -> RepositoryResult<usize>;
}

// ==========================================
// SqliteProposalRepository
// ==========================================
#[derive(Clone)]
pub struct SqliteProposalRepository {
    store: KvStore,
}

impl SqliteProposalRepository {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProposalRepository for SqliteProposalRepository {
    async fn list_all(&self) -> RepositoryResult<Vec<Proposal>> {
        self.store.list(PROPOSALS_NAMESPACE)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Proposal>> {
        self.store.get(PROPOSALS_NAMESPACE, id)
    }

    async fn insert(&self, proposal: &Proposal) -> RepositoryResult<()> {
        self.store
            .insert_all(PROPOSALS_NAMESPACE, &[(proposal.id.clone(), proposal)])?;
        Ok(())
    }

    async fn update(&self, proposal: &Proposal) -> RepositoryResult<()> {
        if !self.store.contains(PROPOSALS_NAMESPACE, &proposal.id)? {
            return Err(RepositoryError::NotFound {
                entity: "Proposal".to_string(),
                id: proposal.id.clone(),
            });
        }
        self.store.put(PROPOSALS_NAMESPACE, &proposal.id, proposal)
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        self.store.delete(PROPOSALS_NAMESPACE, id)
    }

    async fn append_all(&self, proposals: &[Proposal]) -> RepositoryResult<usize> {
        let entries: Vec<(String, &Proposal)> =
            proposals.iter().map(|p| (p.id.clone(), p)).collect();
        let stored = self.store.insert_all(PROPOSALS_NAMESPACE, &entries)?;
        debug!(stored, "Proposals appended");
        Ok(stored)
    }
}
