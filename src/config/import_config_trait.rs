// ==========================================
// Proposal Desk - import configuration reader trait
// ==========================================
// Responsibility: settings the import pipeline needs (interface only)
// Red line: no writes, no business logic
// ==========================================

use crate::importer::row_classifier::BlankRowPolicy;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// Implementor: ConfigManager (reads config_kv)
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// Which rows count as structural blanks
    ///
    /// # Default
    /// - EVENT_NAME_BLANK
    async fn get_blank_row_policy(&self) -> RepositoryResult<BlankRowPolicy>;

    /// Reminder period stamped on imported proposals
    ///
    /// # Default
    /// - 3
    async fn get_reminder_days(&self) -> RepositoryResult<u32>;

    /// Days between the import date and the follow-up date
    ///
    /// # Default
    /// - 1
    async fn get_return_offset_days(&self) -> RepositoryResult<i64>;

    /// Preferred sheet name fragment
    ///
    /// # Default
    /// - "evento"
    async fn get_sheet_keyword(&self) -> RepositoryResult<String>;
}
