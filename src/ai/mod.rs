//! AI module for the proposal audit
//!
//! Sends a digest of the visible proposals to the Gemini `generateContent`
//! endpoint and returns the narrative text.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use proposal_desk::ai::AuditClient;
//!
//! let client = AuditClient::from_env()?.with_model("gemini-3-flash-preview");
//! let report = client.audit(&proposals, today).await?;
//! ```

pub mod prompt;

use crate::domain::proposal::Proposal;
use chrono::NaiveDate;
use serde::Deserialize;
use std::env;
use thiserror::Error;
use tracing::{debug, warn};

pub use prompt::{audit_prompt, digest, ProposalDigest};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Audit errors
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Empty response")]
    EmptyResponse,
}

/// Gemini REST client
#[derive(Clone)]
pub struct AuditClient {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

// ===== generateContent response =====

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl AuditClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Create a client from GEMINI_API_KEY (a .env file is loaded if present)
    pub fn from_env() -> Result<Self, AuditError> {
        let _ = dotenvy::dotenv();

        let api_key = env::var(API_KEY_ENV)
            .map_err(|_| AuditError::MissingApiKey(format!("{} not set", API_KEY_ENV)))?;

        Ok(Self::new(api_key))
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Narrative audit of the given proposals
    pub async fn audit(&self, proposals: &[&Proposal], today: NaiveDate) -> Result<String, AuditError> {
        let digests = digest(proposals.iter().copied());
        let text = audit_prompt(&digests, today);
        self.generate(&text).await
    }

    /// Single generateContent call
    pub async fn generate(&self, prompt: &str) -> Result<String, AuditError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        debug!(model = %self.model, prompt_len = prompt.len(), "Calling generateContent");
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuditError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuditError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<GeminiError>(&body) {
                warn!(status = %status, message = %error.error.message, "Gemini API error");
                return Err(AuditError::ApiError(error.error.message));
            }
            return Err(AuditError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        extract_text(&body)
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(body: &str) -> Result<String, AuditError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| AuditError::InvalidJson(e.to_string()))?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AuditError::EmptyResponse);
    }
    Ok(text)
}
