// ==========================================
// Proposal Desk - proposal API
// ==========================================
// Responsibility: list / create / update / duplicate / delete proposals
// Audit trail: every write stamps an ActionLog for the acting user
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::directory::User;
use crate::domain::proposal::{ActionLog, Proposal};
use crate::domain::types::{ActionType, ProposalStatus};
use crate::engine::visibility::{is_visible_to, visible_proposals, ProposalFilter};
use crate::repository::ProposalRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct ProposalApi {
    proposal_repo: Arc<dyn ProposalRepository>,
}

impl ProposalApi {
    pub fn new(proposal_repo: Arc<dyn ProposalRepository>) -> Self {
        Self { proposal_repo }
    }

    /// Proposals `viewer` may see under `filter`, store order
    pub async fn list(&self, viewer: &User, filter: &ProposalFilter) -> ApiResult<Vec<Proposal>> {
        let all = self.proposal_repo.list_all().await?;
        Ok(visible_proposals(&all, viewer, filter)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn get(&self, id: &str, viewer: &User) -> ApiResult<Proposal> {
        let proposal = self.find(id).await?;
        if !is_visible_to(&proposal, viewer) {
            return Err(ApiError::NotFound(format!("Proposal(id={})", id)));
        }
        Ok(proposal)
    }

    /// Store a new proposal; a blank id gets a generated one
    pub async fn create(&self, mut proposal: Proposal, actor: &User) -> ApiResult<Proposal> {
        if proposal.id.trim().is_empty() {
            proposal.id = new_proposal_id();
        }
        if proposal.owner_user_id.trim().is_empty() {
            proposal.owner_user_id = actor.id.clone();
        }
        if proposal.responsible_executive_id.trim().is_empty() {
            proposal.responsible_executive_id = proposal.owner_user_id.clone();
        }
        Self::check_record(&proposal)?;
        relink_items(&mut proposal);

        proposal.created_by = Some(action(actor, ActionType::Criou));
        proposal.updated_by.clear();

        self.proposal_repo.insert(&proposal).await?;
        info!(id = %proposal.id, user = %actor.id, "Proposal created");
        Ok(proposal)
    }

    /// Replace a stored proposal; creation stamp is kept, an edit stamp is appended
    pub async fn update(&self, mut proposal: Proposal, actor: &User) -> ApiResult<Proposal> {
        let existing = self.find(&proposal.id).await?;
        Self::check_record(&proposal)?;
        relink_items(&mut proposal);

        proposal.created_by = existing.created_by;
        proposal.updated_by = existing.updated_by;
        proposal.updated_by.push(action(actor, ActionType::Editou));

        self.proposal_repo.update(&proposal).await?;
        info!(id = %proposal.id, user = %actor.id, "Proposal updated");
        Ok(proposal)
    }

    /// Copy a proposal under a new id, back at the first funnel stage
    pub async fn duplicate(&self, id: &str, actor: &User) -> ApiResult<Proposal> {
        let mut copy = self.find(id).await?;
        copy.id = new_proposal_id();
        copy.status = ProposalStatus::PrimeiraProposta;
        copy.created_by = Some(action(actor, ActionType::Duplicou));
        copy.updated_by.clear();
        relink_items(&mut copy);

        self.proposal_repo.insert(&copy).await?;
        info!(source = %id, id = %copy.id, user = %actor.id, "Proposal duplicated");
        Ok(copy)
    }

    pub async fn delete(&self, id: &str, actor: &User) -> ApiResult<()> {
        if !self.proposal_repo.delete(id).await? {
            return Err(ApiError::NotFound(format!("Proposal(id={})", id)));
        }
        info!(id = %id, user = %actor.id, action = ?ActionType::Excluiu, "Proposal deleted");
        Ok(())
    }

    async fn find(&self, id: &str) -> ApiResult<Proposal> {
        self.proposal_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Proposal(id={})", id)))
    }

    fn check_record(proposal: &Proposal) -> ApiResult<()> {
        if proposal.id.trim().is_empty() {
            return Err(ApiError::InvalidInput("id vazio".to_string()));
        }
        if proposal.owner_user_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("proposta sem responsável".to_string()));
        }
        if proposal.praca_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("proposta sem praça".to_string()));
        }
        Ok(())
    }
}

fn new_proposal_id() -> String {
    format!("PROP-{}", Uuid::new_v4())
}

fn action(actor: &User, action: ActionType) -> ActionLog {
    ActionLog::new(&actor.id, &actor.name, action, Utc::now())
}

/// Point every line item at its proposal; items of a copied proposal get fresh ids
fn relink_items(proposal: &mut Proposal) {
    let id = proposal.id.clone();
    for (idx, item) in proposal.items.iter_mut().enumerate() {
        if item.proposal_id != id {
            item.id = format!("ITEM-{}-{}", id, idx);
            item.proposal_id = id.clone();
        }
    }
}
