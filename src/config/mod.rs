// ==========================================
// Proposal Desk - configuration layer
// ==========================================
// Responsibility: system settings with scoped overrides
// Storage: config_kv table
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// Re-export the configuration manager
pub use config_manager::{config_keys, defaults, ConfigManager, ConfigScope};
pub use import_config_trait::ImportConfigReader;
