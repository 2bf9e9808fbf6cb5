// ==========================================
// Dashboard API tests
// ==========================================

use proposal_desk::ai::AuditClient;
use proposal_desk::api::{DashboardApi, ProposalApi};
use proposal_desk::domain::{ProposalStatus, UserRole};
use proposal_desk::engine::ProposalFilter;
use proposal_desk::i18n::t;
use proposal_desk::repository::{
    KvStore, ProposalRepository, SqliteProposalRepository, UserRepository,
};
use std::sync::Arc;
use tempfile::NamedTempFile;

mod test_helpers;
use test_helpers::{admin, day, proposal, test_store, user};

struct Fixture {
    _db: NamedTempFile,
    store: KvStore,
    repo: Arc<dyn ProposalRepository>,
}

/// Today: 2026-03-10
/// - BH Pendente, return today, 100
/// - BH Concluída, return 03-01, 200 (late but closed)
/// - SP Negativa, return 03-05, 50 (delayed)
async fn seeded() -> Fixture {
    let (db, store) = test_store();
    let repo: Arc<dyn ProposalRepository> = Arc::new(SqliteProposalRepository::new(store.clone()));
    let proposals = ProposalApi::new(repo.clone());

    let bh = user("u-bh", UserRole::Exec, &["BH"]);
    let sp = user("u-sp", UserRole::Exec, &["SP"]);
    for (owner, praca, status, ret, value) in [
        (&bh, "BH", ProposalStatus::Pendente, day(2026, 3, 10), 100.0),
        (&bh, "BH", ProposalStatus::Concluida, day(2026, 3, 1), 200.0),
        (&sp, "SP", ProposalStatus::Negativa, day(2026, 3, 5), 50.0),
    ] {
        proposals
            .create(proposal(owner, praca, status, ret, value), owner)
            .await
            .unwrap();
    }

    let users = UserRepository::new(store.clone());
    users.upsert(&bh).unwrap();
    users.upsert(&sp).unwrap();

    Fixture {
        _db: db,
        store,
        repo,
    }
}

fn dashboard(fx: &Fixture, client: Option<AuditClient>) -> DashboardApi {
    DashboardApi::new(
        fx.repo.clone(),
        Arc::new(UserRepository::new(fx.store.clone())),
        client,
    )
}

#[tokio::test]
async fn test_stats_for_admin() {
    let fx = seeded().await;
    let api = dashboard(&fx, None);

    let stats = api
        .stats(&admin(), &ProposalFilter::all(), day(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(stats.total_count, 3);
    assert_eq!(stats.sent_count, 3);
    assert_eq!(stats.follow_ups_today, 1);
    assert_eq!(stats.follow_ups_delayed, 1);
    assert_eq!(stats.approved_count, 1);
    assert_eq!(stats.total_value, 350.0);
    assert_eq!(stats.total_approved_value, 200.0);
    assert_eq!(stats.total_slots, 3);
    assert_eq!(stats.count_for(ProposalStatus::Negativa), 1);
    assert_eq!(stats.count_for(ProposalStatus::EmAndamento), 0);
}

#[tokio::test]
async fn test_stats_respect_visibility_and_filter() {
    let fx = seeded().await;
    let api = dashboard(&fx, None);
    let today = day(2026, 3, 10);

    let sp_exec = user("u-sp", UserRole::Exec, &["SP"]);
    let stats = api.stats(&sp_exec, &ProposalFilter::all(), today).await.unwrap();
    assert_eq!(stats.total_count, 1);
    assert_eq!(stats.follow_ups_delayed, 1);

    let bh_only = ProposalFilter {
        praca_id: Some("BH".to_string()),
        executive_id: None,
    };
    let stats = api.stats(&admin(), &bh_only, today).await.unwrap();
    assert_eq!(stats.total_count, 2);
    assert_eq!(stats.follow_ups_delayed, 0);
}

#[tokio::test]
async fn test_executives_by_praca() {
    let fx = seeded().await;
    let api = dashboard(&fx, None);

    assert_eq!(api.executives(None).unwrap().len(), 2);
    let sp = api.executives(Some("SP")).unwrap();
    assert_eq!(sp.len(), 1);
    assert_eq!(sp[0].id, "u-sp");
}

#[tokio::test]
async fn test_audit_falls_back_without_key() {
    let fx = seeded().await;
    let api = dashboard(&fx, None);
    assert!(!api.has_audit());

    let text = api
        .audit(&admin(), &ProposalFilter::all(), day(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(text, t("audit.fallback_empty"));
}

#[tokio::test]
async fn test_audit_falls_back_on_unreachable_service() {
    let fx = seeded().await;
    let client = AuditClient::new("test-key".to_string()).with_base_url("http://127.0.0.1:9");
    let api = dashboard(&fx, Some(client));

    let text = api
        .audit(&admin(), &ProposalFilter::all(), day(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(text, t("audit.fallback_error"));
}
