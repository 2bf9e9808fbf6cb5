// ==========================================
// Proposal Desk - core library
// ==========================================
// Territorial sales-proposal tracking
// Core: spreadsheet import with validation, correction and a gated commit
// Stack: Rust + SQLite
// ==========================================

// i18n
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// Modules
// ==========================================

// Domain layer - entities and value sets
pub mod domain;

// Repository layer - data access
pub mod repository;

// Engine layer - pure business rules
pub mod engine;

// Import layer - spreadsheets in, proposals out
pub mod importer;

// Configuration layer
pub mod config;

// Database infrastructure (connection setup, PRAGMAs, schema)
pub mod db;

// Logging
pub mod logging;

// Internationalisation
pub mod i18n;

// AI audit client
pub mod ai;

// API layer - business operations
pub mod api;

// Application layer - wiring
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    ActionLog, ActionType, CorrectionLog, ImportStatus, ImportSummary, Praca, Proposal,
    ProposalItem, ProposalStatus, User, UserRole, ValidationError,
};

pub use engine::{DashboardEngine, DashboardStats, ProposalFilter};

pub use api::{DashboardApi, DirectoryApi, ImportApi, ImportStage, ProposalApi};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Proposal Desk";
