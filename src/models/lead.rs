use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Read,
    Replied,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
        }
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "read" => Ok(Self::Read),
            "replied" => Ok(Self::Replied),
            _ => Err(format!("invalid lead status: {}", s)),
        }
    }
}

/// A general contact-form submission. `email_sent` records whether the
/// single notification attempt succeeded; a failed attempt never rolls the
/// submission back.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub whatsapp: Option<String>,
    pub service: Option<String>,
    pub budget: Option<String>,
    pub message: String,
    pub status: LeadStatus,
    pub email_sent: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LeadCreate {
    pub name: String,
    pub email: String,
    pub whatsapp: Option<String>,
    pub service: Option<String>,
    pub budget: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct LeadPatch {
    pub status: Option<LeadStatus>,
    pub notes: Option<String>,
}

/// Dashboard projection for the most-recent-leads list.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeadBrief {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}
