// ==========================================
// Proposal Desk - application state
// ==========================================
// Responsibility: open the database once and wire repositories, config and APIs
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

use crate::ai::AuditClient;
use crate::api::{DashboardApi, DirectoryApi, ImportApi, ProposalApi};
use crate::config::ConfigManager;
use crate::db::open_sqlite_connection;
use crate::i18n;
use crate::repository::{
    EventRepository, KvStore, PracaRepository, ProposalRepository, SqliteProposalRepository,
    UserRepository,
};

/// Environment variable that overrides the database location
pub const DB_PATH_ENV: &str = "PROPOSAL_DESK_DB_PATH";

/// Shared resources and API instances
pub struct AppState {
    pub db_path: String,
    pub config: Arc<ConfigManager>,
    pub proposal_api: Arc<ProposalApi>,
    pub directory_api: Arc<DirectoryApi>,
    pub dashboard_api: Arc<DashboardApi>,
    /// One import session per application; the session methods need `&mut`
    pub import_api: Arc<AsyncMutex<ImportApi>>,
    pub user_repo: Arc<UserRepository>,
}

impl AppState {
    /// Open (or create) the database and build every API.
    ///
    /// The directory is seeded with the default praças and the admin user on
    /// first start. The audit client is only created when `GEMINI_API_KEY` is set.
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "Initialising AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("não foi possível abrir o banco: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // Repositories
        // ==========================================
        let store = KvStore::from_connection(conn.clone())
            .map_err(|e| format!("não foi possível criar o KvStore: {}", e))?;
        let proposal_repo: Arc<dyn ProposalRepository> =
            Arc::new(SqliteProposalRepository::new(store.clone()));
        let praca_repo = Arc::new(PracaRepository::new(store.clone()));
        let user_repo = Arc::new(UserRepository::new(store.clone()));
        let event_repo = Arc::new(EventRepository::new(store));

        let config = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("não foi possível criar o ConfigManager: {}", e))?,
        );

        match config.get_locale() {
            Ok(locale) => i18n::set_locale(&locale),
            Err(e) => tracing::warn!(error = %e, "Locale not readable, keeping default"),
        }

        // ==========================================
        // APIs
        // ==========================================
        let directory_api = Arc::new(DirectoryApi::new(
            praca_repo,
            user_repo.clone(),
            event_repo,
            proposal_repo.clone(),
        ));
        directory_api
            .seed_defaults()
            .map_err(|e| format!("falha ao semear o cadastro: {}", e))?;

        let audit_client = match AuditClient::from_env() {
            Ok(client) => {
                let model = config
                    .get_audit_model()
                    .unwrap_or_else(|_| crate::config::defaults::AUDIT_MODEL.to_string());
                Some(client.with_model(&model))
            }
            Err(e) => {
                tracing::info!(reason = %e, "AI audit disabled");
                None
            }
        };

        let dashboard_api = Arc::new(DashboardApi::new(
            proposal_repo.clone(),
            user_repo.clone(),
            audit_client,
        ));
        let proposal_api = Arc::new(ProposalApi::new(proposal_repo.clone()));
        let import_api = Arc::new(AsyncMutex::new(ImportApi::new(
            proposal_repo,
            config.clone(),
        )));

        tracing::info!("AppState ready");
        Ok(Self {
            db_path,
            config,
            proposal_api,
            directory_api,
            dashboard_api,
            import_api,
            user_repo,
        })
    }

    /// User the CLI acts as; falls back to the seeded admin
    pub fn acting_user(&self, user_id: Option<&str>) -> Result<crate::domain::User, String> {
        let id = user_id.unwrap_or(crate::api::directory_api::DEFAULT_ADMIN_ID);
        self.user_repo
            .find_by_id(id)
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("usuário não encontrado: {}", id))
    }
}

/// Default database path.
///
/// `PROPOSAL_DESK_DB_PATH` wins when set; otherwise the OS data directory is
/// used, falling back to the working directory.
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./proposal_desk.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("proposal-desk");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("proposal_desk.db");
        }
    }
    path.to_string_lossy().to_string()
}
