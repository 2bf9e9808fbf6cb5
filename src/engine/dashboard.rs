// ==========================================
// Proposal Desk - dashboard aggregation engine
// ==========================================
// Input: visible, filtered proposals + reference date
// Output: DashboardStats
// Pure reduction; no I/O
// ==========================================

use crate::domain::proposal::Proposal;
use crate::domain::types::ProposalStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: ProposalStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_count: usize,
    /// One entry per status, funnel order, zeros included
    pub by_status: Vec<StatusCount>,
    pub total_value: f64,
    pub total_slots: u64,
    pub follow_ups_today: usize,
    pub follow_ups_delayed: usize,
    pub sent_count: usize,
    pub approved_count: usize,
    pub total_proposed_value: f64,
    pub total_approved_value: f64,
}

impl DashboardStats {
    pub fn count_for(&self, status: ProposalStatus) -> usize {
        self.by_status
            .iter()
            .find(|s| s.status == status)
            .map_or(0, |s| s.count)
    }
}

// ==========================================
// DashboardEngine
// ==========================================
pub struct DashboardEngine {
    // stateless
}

impl DashboardEngine {
    pub fn new() -> Self {
        Self {}
    }

    pub fn compute<'a, I>(&self, proposals: I, today: NaiveDate) -> DashboardStats
    where
        I: IntoIterator<Item = &'a Proposal>,
    {
        let mut by_status: Vec<StatusCount> = ProposalStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: 0,
            })
            .collect();

        let mut total_count = 0;
        let mut total_slots = 0u64;
        let mut total_proposed_value = 0.0;
        let mut total_approved_value = 0.0;
        let mut follow_ups_today = 0;
        let mut follow_ups_delayed = 0;

        for proposal in proposals {
            total_count += 1;
            if let Some(entry) = by_status.iter_mut().find(|s| s.status == proposal.status) {
                entry.count += 1;
            }

            let value = proposal.total_value();
            total_proposed_value += value;
            total_slots += proposal.total_slots();
            if proposal.status == ProposalStatus::Concluida {
                total_approved_value += value;
            }

            if proposal.return_date == today {
                follow_ups_today += 1;
            }
            if proposal.is_follow_up_delayed(today) {
                follow_ups_delayed += 1;
            }
        }

        let approved_count = by_status
            .iter()
            .find(|s| s.status == ProposalStatus::Concluida)
            .map_or(0, |s| s.count);

        DashboardStats {
            total_count,
            by_status,
            total_value: total_proposed_value,
            total_slots,
            follow_ups_today,
            follow_ups_delayed,
            sent_count: total_count,
            approved_count,
            total_proposed_value,
            total_approved_value,
        }
    }
}

impl Default for DashboardEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::visibility::tests::proposal;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn test_empty() {
        let stats = DashboardEngine::new().compute(&Vec::<Proposal>::new(), d(10));
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.by_status.len(), 5);
        assert_eq!(stats.total_value, 0.0);
    }

    #[test]
    fn test_counts_and_values() {
        let all = vec![
            proposal("P1", "e1", "BH", ProposalStatus::Concluida, d(5), 100.0),
            proposal("P2", "e1", "BH", ProposalStatus::Pendente, d(5), 50.0),
            proposal("P3", "e1", "BH", ProposalStatus::Pendente, d(10), 25.0),
            proposal("P4", "e1", "BH", ProposalStatus::EmAndamento, d(12), 10.0),
        ];
        let stats = DashboardEngine::new().compute(&all, d(10));

        assert_eq!(stats.total_count, 4);
        assert_eq!(stats.sent_count, 4);
        assert_eq!(stats.count_for(ProposalStatus::Pendente), 2);
        assert_eq!(stats.count_for(ProposalStatus::Negativa), 0);
        assert_eq!(stats.approved_count, 1);
        assert_eq!(stats.total_proposed_value, 185.0);
        assert_eq!(stats.total_value, 185.0);
        assert_eq!(stats.total_approved_value, 100.0);
        assert_eq!(stats.total_slots, 4);
        assert_eq!(stats.follow_ups_today, 1);
        // P1 is late but concluded
        assert_eq!(stats.follow_ups_delayed, 1);
    }
}
