// ==========================================
// Proposal Desk - dashboard API
// ==========================================
// Responsibility: funnel statistics and the AI audit over the visible proposals
// Audit failures never surface as errors: the caller gets a fallback text
// ==========================================

use crate::ai::{AuditClient, AuditError};
use crate::api::error::ApiResult;
use crate::domain::directory::User;
use crate::domain::proposal::Proposal;
use crate::engine::dashboard::{DashboardEngine, DashboardStats};
use crate::engine::visibility::{executives_in_praca, visible_proposals, ProposalFilter};
use crate::i18n::t;
use crate::repository::{ProposalRepository, UserRepository};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct DashboardApi {
    proposal_repo: Arc<dyn ProposalRepository>,
    user_repo: Arc<UserRepository>,
    engine: DashboardEngine,
    audit_client: Option<AuditClient>,
}

impl DashboardApi {
    /// `audit_client` is `None` when no API key is configured
    pub fn new(
        proposal_repo: Arc<dyn ProposalRepository>,
        user_repo: Arc<UserRepository>,
        audit_client: Option<AuditClient>,
    ) -> Self {
        Self {
            proposal_repo,
            user_repo,
            engine: DashboardEngine::new(),
            audit_client,
        }
    }

    pub fn has_audit(&self) -> bool {
        self.audit_client.is_some()
    }

    #[instrument(skip(self, viewer), fields(viewer = %viewer.id))]
    pub async fn stats(
        &self,
        viewer: &User,
        filter: &ProposalFilter,
        today: NaiveDate,
    ) -> ApiResult<DashboardStats> {
        let all = self.proposal_repo.list_all().await?;
        let visible = visible_proposals(&all, viewer, filter);
        Ok(self.engine.compute(visible, today))
    }

    /// Executives selectable under the current praça filter
    pub fn executives(&self, praca_id: Option<&str>) -> ApiResult<Vec<User>> {
        let users = self.user_repo.list_all()?;
        Ok(executives_in_praca(&users, praca_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Narrative audit of the visible proposals, or a fallback message
    #[instrument(skip(self, viewer), fields(viewer = %viewer.id))]
    pub async fn audit(
        &self,
        viewer: &User,
        filter: &ProposalFilter,
        today: NaiveDate,
    ) -> ApiResult<String> {
        let Some(client) = &self.audit_client else {
            warn!("Audit requested without an API key");
            return Ok(t("audit.fallback_empty"));
        };

        let all = self.proposal_repo.list_all().await?;
        let visible: Vec<&Proposal> = visible_proposals(&all, viewer, filter);
        info!(count = visible.len(), model = %client.model(), "Running proposal audit");

        Ok(match client.audit(&visible, today).await {
            Ok(text) => text,
            Err(AuditError::EmptyResponse) => t("audit.fallback_empty"),
            Err(e) => {
                warn!(error = %e, "Audit failed");
                t("audit.fallback_error")
            }
        })
    }
}
