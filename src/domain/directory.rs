// ==========================================
// Proposal Desk - directory entities
// ==========================================
// Responsibility: territories (praças), users and events
// Red line: plain data, no persistence logic
// ==========================================

use crate::domain::types::UserRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ==========================================
// Praca - geographic sales region
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Praca {
    pub praca_id: String, // short code, e.g. "BH"
    pub name: String,
    pub uf: Option<String>,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Praca {
    pub fn new(praca_id: &str, name: &str, uf: &str) -> Self {
        Self {
            praca_id: praca_id.to_string(),
            name: name.to_string(),
            uf: Some(uf.to_string()),
            active: true,
            created_at: None,
            updated_at: None,
        }
    }
}

// ==========================================
// User - commercial team member
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub title: String,
    pub role: UserRole,
    /// Territories served; legacy records store them as "BH;SP"
    #[serde(deserialize_with = "deserialize_praca_ids", default)]
    pub praca_ids: Vec<String>,
    pub default_praca_id: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn serves_praca(&self, praca_id: &str) -> bool {
        self.praca_ids.iter().any(|p| p == praca_id)
    }
}

/// Split, trim and drop empty territory codes
pub fn normalize_praca_ids(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn deserialize_praca_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PracaIds {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<PracaIds>::deserialize(deserializer)? {
        Some(PracaIds::List(list)) => list
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(PracaIds::Joined(joined)) => normalize_praca_ids(&joined),
        None => Vec::new(),
    })
}

// ==========================================
// Event - sellable event in a territory
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub name: String,
    pub city: String,
    pub uf: String,
    pub praca_id: String, // mandatory territory link
    pub event_date: String,
    pub venue: String,
    pub distances: String,
    pub start_time: String,
    pub official_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
