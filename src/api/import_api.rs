// ==========================================
// Proposal Desk - spreadsheet import API
// ==========================================
// Responsibility: one import session (Upload → Preview → Committing → Result)
// Gate: nothing reaches the store before an explicit confirmation
// Commit: a single atomic append; failure leaves the store untouched
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportConfigReader;
use crate::domain::directory::User;
use crate::domain::import::{CorrectionLog, ImportStatus, ImportSummary, ValidationError};
use crate::domain::proposal::Proposal;
use crate::i18n::{t, t_with_args};
use crate::importer::{
    validate, write_template, ClassifierContext, ColumnMap, FileParser, ImportContext,
    UniversalFileParser, TEMPLATE_FILE_NAME,
};
use crate::repository::ProposalRepository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument};

// ==========================================
// ImportStage - session state machine
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStage {
    #[default]
    Upload,
    Preview,
    Committing,
    Result,
}

/// Inputs that move the session between stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportEvent {
    FileAnalyzed,
    AnalysisFailed,
    ConfirmRequested,
    CommitSucceeded,
    CommitFailed,
    Reset,
}

impl ImportStage {
    /// Next stage, or InvalidStateTransition
    pub fn transition(self, event: ImportEvent) -> ApiResult<ImportStage> {
        use ImportEvent::*;
        use ImportStage as S;

        match (self, event) {
            (S::Upload | S::Preview | S::Result, FileAnalyzed) => Ok(S::Preview),
            (S::Upload | S::Preview | S::Result, AnalysisFailed) => Ok(S::Upload),
            (S::Preview, ConfirmRequested) => Ok(S::Committing),
            (S::Committing, CommitSucceeded) => Ok(S::Result),
            (S::Committing, CommitFailed) => Ok(S::Upload),
            (S::Upload | S::Preview | S::Result, Reset) => Ok(S::Upload),
            (from, event) => Err(ApiError::InvalidStateTransition {
                from: from.to_string(),
                to: format!("{:?}", event),
            }),
        }
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImportStage::Upload => "upload",
            ImportStage::Preview => "preview",
            ImportStage::Committing => "committing",
            ImportStage::Result => "result",
        };
        f.write_str(s)
    }
}

// ==========================================
// Notifier - user-visible feedback
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: NotificationLevel);
}

/// Default notifier: writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, level: NotificationLevel) {
        match level {
            NotificationLevel::Success => info!(notification = %message, "notify"),
            NotificationLevel::Error => error!(notification = %message, "notify"),
        }
    }
}

// ==========================================
// ImportSession - state of the current import
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSession {
    pub stage: ImportStage,
    pub sheet_name: Option<String>,
    pub candidates: Vec<Proposal>,
    pub errors: Vec<ValidationError>,
    pub corrections: Vec<CorrectionLog>,
    pub skipped_rows: Vec<usize>,
    pub summary: Option<ImportSummary>,
}

/// Holds the session in Committing while the store append is in flight.
///
/// Dropped without `finish` (the commit future was abandoned), it puts the
/// session back to Preview so it can be confirmed again or reset.
struct CommitInFlight<'a> {
    stage: &'a mut ImportStage,
    finished: bool,
}

impl<'a> CommitInFlight<'a> {
    fn begin(stage: &'a mut ImportStage) -> ApiResult<Self> {
        *stage = stage.transition(ImportEvent::ConfirmRequested)?;
        Ok(Self {
            stage,
            finished: false,
        })
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for CommitInFlight<'_> {
    fn drop(&mut self) {
        if !self.finished && *self.stage == ImportStage::Committing {
            *self.stage = ImportStage::Preview;
        }
    }
}

// ==========================================
// ImportApi
// ==========================================
pub struct ImportApi {
    proposal_repo: Arc<dyn ProposalRepository>,
    config: Arc<dyn ImportConfigReader>,
    parser: Arc<dyn FileParser>,
    notifier: Arc<dyn Notifier>,
    session: ImportSession,
}

impl ImportApi {
    pub fn new(
        proposal_repo: Arc<dyn ProposalRepository>,
        config: Arc<dyn ImportConfigReader>,
    ) -> Self {
        Self {
            proposal_repo,
            config,
            parser: Arc::new(UniversalFileParser),
            notifier: Arc::new(TracingNotifier),
            session: ImportSession::default(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn FileParser>) -> Self {
        self.parser = parser;
        self
    }

    // ==========================================
    // accessors
    // ==========================================

    pub fn stage(&self) -> ImportStage {
        self.session.stage
    }

    pub fn session(&self) -> &ImportSession {
        &self.session
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.session.errors
    }

    pub fn corrections(&self) -> &[CorrectionLog] {
        &self.session.corrections
    }

    pub fn candidates(&self) -> &[Proposal] {
        &self.session.candidates
    }

    pub fn summary(&self) -> Option<&ImportSummary> {
        self.session.summary.as_ref()
    }

    // ==========================================
    // operations
    // ==========================================

    /// Analyse a spreadsheet and move to Preview
    ///
    /// # Returns
    /// - Ok(ImportSummary): status `partial`, both counts filled in
    /// - Err(ApiError): structural failure; the user is notified and the session is back at Upload
    pub async fn select_file(&mut self, path: impl AsRef<Path>, acting_user: &User) -> ApiResult<ImportSummary> {
        self.select_file_at(path, acting_user, Utc::now()).await
    }

    /// `select_file` with an explicit import timestamp (ids and dates derive from it)
    #[instrument(skip(self, path, acting_user), fields(user = %acting_user.id))]
    pub async fn select_file_at(
        &mut self,
        path: impl AsRef<Path>,
        acting_user: &User,
        imported_at: DateTime<Utc>,
    ) -> ApiResult<ImportSummary> {
        // rejected while committing
        self.session.stage.transition(ImportEvent::FileAnalyzed)?;

        let analysed = self.analyse(path.as_ref(), acting_user, imported_at).await;
        match analysed {
            Ok(session) => {
                let summary = session.summary.clone();
                self.session = session;
                summary.ok_or_else(|| ApiError::InternalError("summary missing".to_string()))
            }
            Err(err) => {
                self.notifier.notify(&err.to_string(), NotificationLevel::Error);
                let stage = self.session.stage.transition(ImportEvent::AnalysisFailed)?;
                self.session = ImportSession {
                    stage,
                    ..ImportSession::default()
                };
                Err(err)
            }
        }
    }

    async fn analyse(
        &self,
        path: &Path,
        acting_user: &User,
        imported_at: DateTime<Utc>,
    ) -> ApiResult<ImportSession> {
        let keyword = self.config.get_sheet_keyword().await?;
        let policy = self.config.get_blank_row_policy().await?;
        let import = ImportContext {
            acting_user: acting_user.clone(),
            imported_at,
            reminder_days: self.config.get_reminder_days().await?,
            return_offset_days: self.config.get_return_offset_days().await?,
        };

        let parser = Arc::clone(&self.parser);
        let owned_path = path.to_path_buf();
        let sheet = tokio::task::spawn_blocking(move || parser.parse_sheet(&owned_path, &keyword))
            .await
            .map_err(|e| ApiError::InternalError(format!("parser task failed: {}", e)))??;

        let map = ColumnMap::from_headers(&sheet.headers);
        let ctx = ClassifierContext {
            blank_row_policy: policy,
            data_row_count: sheet.rows.len(),
            import,
        };
        let validation = validate(&sheet, &map, &ctx);

        Ok(ImportSession {
            stage: self.session.stage.transition(ImportEvent::FileAnalyzed)?,
            sheet_name: Some(sheet.name),
            candidates: validation.candidates,
            errors: validation.errors,
            corrections: validation.corrections,
            skipped_rows: validation.skipped_rows,
            summary: Some(validation.summary),
        })
    }

    /// Commit the previewed candidates
    ///
    /// # Returns
    /// - Ok(ImportSummary): status `success`, stage Result
    /// - Err(NothingToImport): no candidate; notified, stage unchanged
    /// - Err(other): store failure; notified, session reset, store unchanged
    ///
    /// A commit future dropped before completion leaves the session in Preview.
    #[instrument(skip(self))]
    pub async fn confirm_import(&mut self) -> ApiResult<ImportSummary> {
        if self.session.stage == ImportStage::Preview && self.session.candidates.is_empty() {
            self.notifier
                .notify(&t("import.nothing_to_import"), NotificationLevel::Error);
            return Err(ApiError::NothingToImport);
        }

        let in_flight = CommitInFlight::begin(&mut self.session.stage)?;
        let outcome = self.proposal_repo.append_all(&self.session.candidates).await;
        in_flight.finish();

        match outcome {
            Ok(stored) => {
                self.session.stage = self.session.stage.transition(ImportEvent::CommitSucceeded)?;
                let summary = self
                    .session
                    .summary
                    .as_mut()
                    .ok_or_else(|| ApiError::InternalError("summary missing".to_string()))?;
                summary.status = ImportStatus::Success;
                summary.message = t("import.commit_done");

                info!(stored, "Import committed");
                self.notifier.notify(&t("import.commit_notify"), NotificationLevel::Success);
                Ok(summary.clone())
            }
            Err(err) => {
                let err = ApiError::from(err);
                let detail = err.to_string();
                error!(error = %detail, "Import commit failed");
                self.notifier.notify(
                    &t_with_args("import.commit_failed", &[("error", detail.as_str())]),
                    NotificationLevel::Error,
                );
                let stage = self.session.stage.transition(ImportEvent::CommitFailed)?;
                self.session = ImportSession {
                    stage,
                    ..ImportSession::default()
                };
                Err(err)
            }
        }
    }

    /// Back to Upload, dropping every finding and candidate
    pub fn reset(&mut self) -> ApiResult<()> {
        let stage = self.session.stage.transition(ImportEvent::Reset)?;
        self.session = ImportSession {
            stage,
            ..ImportSession::default()
        };
        Ok(())
    }

    /// Write the official template; a directory target gets the default file name
    pub fn download_template(&self, target: impl AsRef<Path>) -> ApiResult<PathBuf> {
        let target = target.as_ref();
        let path = if target.is_dir() {
            target.join(TEMPLATE_FILE_NAME)
        } else {
            target.to_path_buf()
        };

        write_template(&path)?;
        self.notifier.notify(&t("import.template_done"), NotificationLevel::Success);
        Ok(path)
    }
}
