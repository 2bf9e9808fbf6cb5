// ==========================================
// Proposal Desk - proposal filtering and visibility
// ==========================================
// Responsibility: which proposals a viewer sees under the current filter
// Rules:
// - territory filter: exact praca_id match
// - executive filter: exact owner match
// - non-admin viewers see their own proposals and those of their territories
// ==========================================

use crate::domain::directory::User;
use crate::domain::proposal::Proposal;
use serde::{Deserialize, Serialize};

/// Optional dashboard/list filters; `None` means "all"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalFilter {
    pub praca_id: Option<String>,
    pub executive_id: Option<String>,
}

impl ProposalFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, proposal: &Proposal) -> bool {
        let praca_ok = self
            .praca_id
            .as_deref()
            .map_or(true, |id| proposal.praca_id == id);
        let exec_ok = self
            .executive_id
            .as_deref()
            .map_or(true, |id| proposal.owner_user_id == id);
        praca_ok && exec_ok
    }
}

/// Whether `viewer` may see `proposal`
pub fn is_visible_to(proposal: &Proposal, viewer: &User) -> bool {
    viewer.role.is_admin()
        || proposal.owner_user_id == viewer.id
        || viewer.serves_praca(&proposal.praca_id)
}

/// Filtered, visible subset in store order
pub fn visible_proposals<'a>(
    proposals: &'a [Proposal],
    viewer: &User,
    filter: &ProposalFilter,
) -> Vec<&'a Proposal> {
    proposals
        .iter()
        .filter(|p| filter.matches(p) && is_visible_to(p, viewer))
        .collect()
}

/// Active users serving a territory (all active users when no territory is selected)
pub fn executives_in_praca<'a>(users: &'a [User], praca_id: Option<&str>) -> Vec<&'a User> {
    users
        .iter()
        .filter(|u| u.active)
        .filter(|u| praca_id.map_or(true, |id| u.serves_praca(id)))
        .collect()
}
