// ==========================================
// Proposal Desk - directory API
// ==========================================
// Responsibility: territories (praças), users and events
// Rule: a praça referenced by an active user, an event or a proposal cannot be removed
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::directory::{Event, Praca, User};
use crate::domain::types::UserRole;
use crate::i18n::t;
use crate::repository::{EventRepository, PracaRepository, ProposalRepository, UserRepository};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Territories created on first start
pub const DEFAULT_PRACAS: [(&str, &str, &str); 5] = [
    ("BH", "Belo Horizonte", "MG"),
    ("BSB", "Brasília", "DF"),
    ("SSA", "Salvador", "BA"),
    ("REC", "Recife", "PE"),
    ("SP", "São Paulo", "SP"),
];

pub const DEFAULT_ADMIN_ID: &str = "1";

pub struct DirectoryApi {
    praca_repo: Arc<PracaRepository>,
    user_repo: Arc<UserRepository>,
    event_repo: Arc<EventRepository>,
    proposal_repo: Arc<dyn ProposalRepository>,
}

impl DirectoryApi {
    pub fn new(
        praca_repo: Arc<PracaRepository>,
        user_repo: Arc<UserRepository>,
        event_repo: Arc<EventRepository>,
        proposal_repo: Arc<dyn ProposalRepository>,
    ) -> Self {
        Self {
            praca_repo,
            user_repo,
            event_repo,
            proposal_repo,
        }
    }

    /// Seed default praças and the admin user into an empty directory.
    ///
    /// Returns whether anything was written.
    pub fn seed_defaults(&self) -> ApiResult<bool> {
        let mut seeded = false;

        if self.praca_repo.is_empty()? {
            for (id, name, uf) in DEFAULT_PRACAS {
                let mut praca = Praca::new(id, name, uf);
                praca.created_at = Some(Utc::now());
                praca.updated_at = praca.created_at;
                self.praca_repo.upsert(&praca)?;
            }
            seeded = true;
        }

        if self.user_repo.is_empty()? {
            let now = Utc::now();
            let admin = User {
                id: DEFAULT_ADMIN_ID.to_string(),
                name: "Admin Master".to_string(),
                email: "admin@cazari.com.br".to_string(),
                phone: None,
                title: "Administrador do Sistema".to_string(),
                role: UserRole::Admin,
                praca_ids: DEFAULT_PRACAS.iter().map(|(id, _, _)| id.to_string()).collect(),
                default_praca_id: "BH".to_string(),
                active: true,
                created_at: now,
                updated_at: now,
            };
            self.user_repo.upsert(&admin)?;
            seeded = true;
        }

        if seeded {
            info!("Directory seeded with default praças and admin user");
        }
        Ok(seeded)
    }

    // ==========================================
    // Praças
    // ==========================================

    pub fn list_pracas(&self) -> ApiResult<Vec<Praca>> {
        Ok(self.praca_repo.list_all()?)
    }

    /// Register a praça; the code is trimmed and upper-cased
    pub fn add_praca(&self, mut praca: Praca) -> ApiResult<Praca> {
        praca.praca_id = praca.praca_id.trim().to_uppercase();
        praca.name = praca.name.trim().to_string();
        praca.uf = praca.uf.map(|uf| uf.trim().to_uppercase());

        if praca.praca_id.is_empty() || praca.name.is_empty() {
            return Err(ApiError::InvalidInput(
                "sigla e nome da praça são obrigatórios".to_string(),
            ));
        }
        if self.praca_repo.find_by_id(&praca.praca_id)?.is_some() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "já existe uma praça com a sigla {}",
                praca.praca_id
            )));
        }

        let now = Utc::now();
        praca.created_at = Some(now);
        praca.updated_at = Some(now);
        self.praca_repo.upsert(&praca)?;
        info!(praca_id = %praca.praca_id, "Praça added");
        Ok(praca)
    }

    pub fn update_praca(&self, mut praca: Praca) -> ApiResult<Praca> {
        let existing = self
            .praca_repo
            .find_by_id(&praca.praca_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Praca(id={})", praca.praca_id)))?;

        praca.created_at = existing.created_at;
        praca.updated_at = Some(Utc::now());
        self.praca_repo.upsert(&praca)?;
        info!(praca_id = %praca.praca_id, "Praça updated");
        Ok(praca)
    }

    pub async fn remove_praca(&self, praca_id: &str) -> ApiResult<()> {
        let used_by_user = self
            .user_repo
            .list_all()?
            .iter()
            .any(|u| u.active && u.serves_praca(praca_id));
        let used_by_event = self
            .event_repo
            .list_all()?
            .iter()
            .any(|e| e.praca_id == praca_id);
        let used_by_proposal = self
            .proposal_repo
            .list_all()
            .await?
            .iter()
            .any(|p| p.praca_id == praca_id);

        if used_by_user || used_by_event || used_by_proposal {
            warn!(
                praca_id = %praca_id,
                used_by_user,
                used_by_event,
                used_by_proposal,
                "Praça removal blocked"
            );
            return Err(ApiError::BusinessRuleViolation(t("directory.praca_in_use")));
        }

        if !self.praca_repo.delete(praca_id)? {
            return Err(ApiError::NotFound(format!("Praca(id={})", praca_id)));
        }
        info!(praca_id = %praca_id, "Praça removed");
        Ok(())
    }

    // ==========================================
    // Users
    // ==========================================

    pub fn list_users(&self) -> ApiResult<Vec<User>> {
        Ok(self.user_repo.list_all()?)
    }

    pub fn get_user(&self, id: &str) -> ApiResult<User> {
        self.user_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("User(id={})", id)))
    }

    pub fn upsert_user(&self, mut user: User) -> ApiResult<User> {
        if user.id.trim().is_empty() || user.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("usuário sem id ou nome".to_string()));
        }
        if user.default_praca_id.is_empty() {
            if let Some(first) = user.praca_ids.first() {
                user.default_praca_id = first.clone();
            }
        }
        user.updated_at = Utc::now();
        self.user_repo.upsert(&user)?;
        info!(user_id = %user.id, role = ?user.role, "User saved");
        Ok(user)
    }

    pub fn delete_user(&self, id: &str) -> ApiResult<()> {
        if !self.user_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("User(id={})", id)));
        }
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    // ==========================================
    // Events
    // ==========================================

    /// Events, optionally restricted to one praça
    pub fn list_events(&self, praca_id: Option<&str>) -> ApiResult<Vec<Event>> {
        let events = self.event_repo.list_all()?;
        Ok(match praca_id {
            Some(id) => events.into_iter().filter(|e| e.praca_id == id).collect(),
            None => events,
        })
    }

    pub fn get_event(&self, id: &str) -> ApiResult<Event> {
        self.event_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Event(id={})", id)))
    }

    pub fn upsert_event(&self, mut event: Event) -> ApiResult<Event> {
        if event.praca_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("evento sem praça".to_string()));
        }
        if self.praca_repo.find_by_id(&event.praca_id)?.is_none() {
            return Err(ApiError::InvalidInput(format!(
                "praça desconhecida: {}",
                event.praca_id
            )));
        }
        event.updated_at = Utc::now();
        self.event_repo.upsert(&event)?;
        info!(event_id = %event.event_id, praca_id = %event.praca_id, "Event saved");
        Ok(event)
    }

    pub fn delete_event(&self, id: &str) -> ApiResult<()> {
        if !self.event_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("Event(id={})", id)));
        }
        Ok(())
    }
}
