// ==========================================
// Import session end-to-end tests
// ==========================================
// Spreadsheet on disk → preview → confirmation → store
// ==========================================

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use proposal_desk::api::{ApiError, ImportApi, ImportStage, NotificationLevel};
use proposal_desk::config::{config_keys, ConfigManager};
use proposal_desk::domain::{
    CorrectionReason, ImportColumn, ImportStatus, Proposal, ProposalStatus, UserRole,
    ValidationReason,
};
use proposal_desk::i18n::t;
use proposal_desk::repository::{
    KvStore, ProposalRepository, RepositoryResult, SqliteProposalRepository,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::{tempdir, NamedTempFile};

mod test_helpers;
use test_helpers::{create_test_db, mixed_rows, user, write_event_workbook, Cell, RecordingNotifier};

struct Fixture {
    _db: NamedTempFile,
    repo: Arc<SqliteProposalRepository>,
    config: Arc<ConfigManager>,
    notifier: Arc<RecordingNotifier>,
}

impl Fixture {
    fn new() -> Self {
        let (db, db_path) = create_test_db().unwrap();
        let store = KvStore::new(&db_path).unwrap();
        Self {
            _db: db,
            repo: Arc::new(SqliteProposalRepository::new(store)),
            config: Arc::new(ConfigManager::new(&db_path).unwrap()),
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }

    fn api(&self) -> ImportApi {
        ImportApi::new(self.repo.clone(), self.config.clone()).with_notifier(self.notifier.clone())
    }
}

fn imported_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 14, 30, 0).unwrap()
}

/// Store whose batch append never completes
struct StalledAppendRepository(SqliteProposalRepository);

#[async_trait]
impl ProposalRepository for StalledAppendRepository {
    async fn list_all(&self) -> RepositoryResult<Vec<Proposal>> {
        self.0.list_all().await
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Proposal>> {
        self.0.find_by_id(id).await
    }

    async fn insert(&self, proposal: &Proposal) -> RepositoryResult<()> {
        self.0.insert(proposal).await
    }

    async fn update(&self, proposal: &Proposal) -> RepositoryResult<()> {
        self.0.update(proposal).await
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        self.0.delete(id).await
    }

    async fn append_all(&self, _proposals: &[Proposal]) -> RepositoryResult<usize> {
        std::future::pending().await
    }
}

/// Valid row with a currency-format fix, invalid slots, blank row
fn three_row_sheet() -> Vec<Vec<Cell<'static>>> {
    use Cell::*;
    vec![
        vec![
            Text("Corrida BH"),
            Text("Belo Horizonte"),
            Text("BH"),
            Text("R$ 50,00"),
            Number(3.0),
            Number(150.0),
            Blank,
        ],
        vec![
            Text("Corrida REC"),
            Text("Recife"),
            Text("REC"),
            Number(50.0),
            Text("muitas"),
            Blank,
            Blank,
        ],
        // whitespace keeps the row inside the sheet range; it reads as empty
        vec![Text(" "), Blank, Blank, Blank, Blank, Blank, Blank],
    ]
}

#[tokio::test]
async fn test_preview_then_commit() {
    let fx = Fixture::new();
    let dir = tempdir().unwrap();
    let path = write_event_workbook(dir.path(), "eventos.xlsx", &mixed_rows());
    let exec = user("u-7", UserRole::Exec, &["BH"]);

    let mut api = fx.api();
    let summary = api.select_file_at(&path, &exec, imported_at()).await.unwrap();

    // preview
    assert_eq!(api.stage(), ImportStage::Preview);
    assert_eq!(api.session().sheet_name.as_deref(), Some("Informações de Evento"));
    assert_eq!(summary.status, ImportStatus::Partial);
    assert_eq!(summary.total_analyzed, 5);
    assert_eq!(summary.new_proposals, 3);
    assert_eq!(summary.errors_count, 1);
    assert_eq!(summary.corrections_count, 4);
    assert_eq!(api.session().skipped_rows, vec![5]);

    let error = &api.errors()[0];
    assert_eq!(error.row, 4);
    assert_eq!(error.column, ImportColumn::UnitValue);
    assert_eq!(error.reason, ValidationReason::InvalidUnitValue);

    let reasons: Vec<(usize, CorrectionReason)> =
        api.corrections().iter().map(|c| (c.row, c.reason)).collect();
    assert_eq!(
        reasons,
        vec![
            (3, CorrectionReason::CurrencyFormatNormalization),
            (3, CorrectionReason::AutomaticRecalculation),
            (6, CorrectionReason::IntegerRounding),
            (6, CorrectionReason::AutomaticRecalculation),
        ]
    );

    // nothing stored before confirmation
    assert!(fx.repo.list_all().await.unwrap().is_empty());

    let ids: Vec<&str> = api.candidates().iter().map(|p| p.id.as_str()).collect();
    let millis = imported_at().timestamp_millis();
    assert_eq!(
        ids,
        vec![
            format!("EVENT-{}-0", millis),
            format!("EVENT-{}-1", millis),
            format!("EVENT-{}-4", millis),
        ]
    );

    // commit
    let summary = api.confirm_import().await.unwrap();
    assert_eq!(summary.status, ImportStatus::Success);
    assert_eq!(api.stage(), ImportStage::Result);
    assert_eq!(fx.notifier.levels(), vec![NotificationLevel::Success]);

    let stored = fx.repo.list_all().await.unwrap();
    assert_eq!(stored.len(), 3);

    let sp = &stored[1];
    assert_eq!(sp.praca_id, "SP");
    assert_eq!(sp.owner_user_id, "u-7");
    assert_eq!(sp.status, ProposalStatus::PrimeiraProposta);
    assert_eq!(sp.return_date, NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
    assert_eq!(sp.items[0].unit_value, 1234.56);
    assert_eq!(sp.items[0].total_value, 2469.12);

    let ssa = &stored[2];
    assert_eq!(ssa.items[0].slots, 2);
    assert_eq!(ssa.items[0].total_value, 200.0);

    // a new file can be analysed from Result
    api.reset().unwrap();
    assert_eq!(api.stage(), ImportStage::Upload);
    assert!(api.candidates().is_empty());
}

#[tokio::test]
async fn test_only_the_valid_row_of_three_is_stored() {
    let fx = Fixture::new();
    let dir = tempdir().unwrap();
    let path = write_event_workbook(dir.path(), "eventos.xlsx", &three_row_sheet());
    let exec = user("u-3", UserRole::Exec, &["BH"]);

    let mut api = fx.api();
    let summary = api.select_file_at(&path, &exec, imported_at()).await.unwrap();

    assert_eq!(summary.total_analyzed, 3);
    assert_eq!(summary.errors_count, 1);
    assert_eq!(summary.corrections_count, 1);
    assert_eq!(summary.new_proposals, 1);
    assert_eq!(api.session().skipped_rows, vec![4]);

    assert_eq!(api.errors()[0].row, 3);
    assert_eq!(api.errors()[0].column, ImportColumn::Slots);
    let correction = &api.corrections()[0];
    assert_eq!(correction.row, 2);
    assert_eq!(correction.column, ImportColumn::UnitValue);
    assert_eq!(correction.reason, CorrectionReason::CurrencyFormatNormalization);
    assert_eq!(correction.corrected, 50.0);

    api.confirm_import().await.unwrap();

    let stored = fx.repo.list_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(
        stored[0].id,
        format!("EVENT-{}-0", imported_at().timestamp_millis())
    );
    assert_eq!(stored[0].items[0].unit_value, 50.0);
    assert_eq!(stored[0].items[0].total_value, 150.0);
}

#[tokio::test]
async fn test_abandoned_commit_leaves_session_in_preview() {
    let fx = Fixture::new();
    let dir = tempdir().unwrap();
    let path = write_event_workbook(dir.path(), "eventos.xlsx", &three_row_sheet());
    let stalled = Arc::new(StalledAppendRepository(fx.repo.as_ref().clone()));

    let mut api = ImportApi::new(stalled, fx.config.clone());
    api.select_file_at(&path, &user("u-3", UserRole::Exec, &["BH"]), imported_at())
        .await
        .unwrap();

    let timed_out = tokio::time::timeout(Duration::from_millis(50), api.confirm_import()).await;
    assert!(timed_out.is_err());

    assert_eq!(api.stage(), ImportStage::Preview);
    assert_eq!(api.candidates().len(), 1);
    api.reset().unwrap();
    assert_eq!(api.stage(), ImportStage::Upload);
}

#[tokio::test]
async fn test_commit_is_atomic_on_duplicate_id() {
    let fx = Fixture::new();
    let dir = tempdir().unwrap();
    let path = write_event_workbook(dir.path(), "eventos.xlsx", &mixed_rows());
    let exec = user("u-7", UserRole::Exec, &["BH"]);

    // first import stores three proposals
    let mut api = fx.api();
    api.select_file_at(&path, &exec, imported_at()).await.unwrap();
    api.confirm_import().await.unwrap();

    // same file, same timestamp: every id collides
    let mut api = fx.api();
    api.select_file_at(&path, &exec, imported_at()).await.unwrap();
    let err = api.confirm_import().await.unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));

    assert_eq!(api.stage(), ImportStage::Upload);
    assert!(api.candidates().is_empty());
    assert!(api.summary().is_none());
    assert_eq!(fx.repo.list_all().await.unwrap().len(), 3);
    assert_eq!(
        fx.notifier.levels().last().copied(),
        Some(NotificationLevel::Error)
    );
}

#[tokio::test]
async fn test_nothing_to_import_keeps_preview() {
    let fx = Fixture::new();
    let dir = tempdir().unwrap();
    let rows = vec![vec![
        Cell::Text("Sem Vagas"),
        Cell::Text("Recife"),
        Cell::Text("REC"),
        Cell::Number(50.0),
        Cell::Number(0.0),
        Cell::Blank,
        Cell::Blank,
    ]];
    let path = write_event_workbook(dir.path(), "ruim.xlsx", &rows);

    let mut api = fx.api();
    let summary = api
        .select_file_at(&path, &user("u-1", UserRole::Exec, &["REC"]), imported_at())
        .await
        .unwrap();
    assert_eq!(summary.new_proposals, 0);
    assert_eq!(api.errors()[0].reason, ValidationReason::InvalidSlots);

    let err = api.confirm_import().await.unwrap_err();
    assert!(matches!(err, ApiError::NothingToImport));
    assert_eq!(api.stage(), ImportStage::Preview);
    assert!(fx.repo.list_all().await.unwrap().is_empty());

    let messages = fx.notifier.messages.lock().unwrap();
    assert_eq!(
        messages.last(),
        Some(&(t("import.nothing_to_import"), NotificationLevel::Error))
    );
}

#[tokio::test]
async fn test_structural_failure_resets_session() {
    let fx = Fixture::new();
    let dir = tempdir().unwrap();
    let good = write_event_workbook(dir.path(), "eventos.xlsx", &mixed_rows());
    let exec = user("u-7", UserRole::Exec, &["BH"]);

    let mut api = fx.api();
    api.select_file_at(&good, &exec, imported_at()).await.unwrap();
    assert_eq!(api.stage(), ImportStage::Preview);

    let missing = dir.path().join("nao_existe.xlsx");
    let err = api.select_file(&missing, &exec).await.unwrap_err();
    assert!(matches!(err, ApiError::ImportError(_)));
    assert_eq!(api.stage(), ImportStage::Upload);
    assert!(api.candidates().is_empty());
    assert_eq!(fx.notifier.levels(), vec![NotificationLevel::Error]);

    let unsupported = dir.path().join("eventos.pdf");
    std::fs::write(&unsupported, b"%PDF").unwrap();
    assert!(api.select_file(&unsupported, &exec).await.is_err());
    assert_eq!(api.stage(), ImportStage::Upload);
}

#[tokio::test]
async fn test_confirm_without_preview_is_rejected() {
    let fx = Fixture::new();
    let mut api = fx.api();
    let err = api.confirm_import().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));
    assert_eq!(api.stage(), ImportStage::Upload);
}

#[tokio::test]
async fn test_blank_row_policy_from_config() {
    let fx = Fixture::new();
    fx.config
        .set_global_config_value(config_keys::IMPORT_BLANK_ROW_POLICY, "ALL_RECOGNIZED_EMPTY")
        .unwrap();

    let dir = tempdir().unwrap();
    let rows = vec![
        vec![
            Cell::Blank,
            Cell::Text("Salvador"),
            Cell::Text("SSA"),
            Cell::Number(80.0),
            Cell::Number(1.0),
            Cell::Blank,
            Cell::Blank,
        ],
        vec![
            Cell::Text("Trail SSA"),
            Cell::Text("Salvador"),
            Cell::Text("SSA"),
            Cell::Number(80.0),
            Cell::Number(1.0),
            Cell::Number(80.0),
            Cell::Blank,
        ],
    ];
    let path = write_event_workbook(dir.path(), "eventos.xlsx", &rows);

    let mut api = fx.api();
    api.select_file_at(&path, &user("u-2", UserRole::Exec, &["SSA"]), imported_at())
        .await
        .unwrap();

    // the nameless row is no longer skipped: it is rejected instead
    assert!(api.session().skipped_rows.is_empty());
    assert_eq!(api.errors().len(), 1);
    assert_eq!(api.errors()[0].reason, ValidationReason::MissingEventName);
    assert_eq!(api.candidates().len(), 1);
}

#[tokio::test]
async fn test_download_template_into_directory() {
    let fx = Fixture::new();
    let dir = tempdir().unwrap();
    let api = fx.api();

    let path = api.download_template(dir.path()).unwrap();
    assert!(path.ends_with("CAZARI_IMPORT_TEMPLATE.xlsx"));
    assert!(path.exists());
    assert_eq!(fx.notifier.levels(), vec![NotificationLevel::Success]);
}
