use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    #[default]
    New,
    Reviewing,
    Qualified,
    CallScheduled,
    ProposalSent,
    Closed,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Reviewing => "reviewing",
            Self::Qualified => "qualified",
            Self::CallScheduled => "call-scheduled",
            Self::ProposalSent => "proposal-sent",
            Self::Closed => "closed",
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "reviewing" => Ok(Self::Reviewing),
            "qualified" => Ok(Self::Qualified),
            "call-scheduled" => Ok(Self::CallScheduled),
            "proposal-sent" => Ok(Self::ProposalSent),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("invalid application status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UsingHouzez {
    Yes,
    No,
}

impl UsingHouzez {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    Audit,
    Kickstart,
    Build,
    Advisory,
    NotSure,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audit => "audit",
            Self::Kickstart => "kickstart",
            Self::Build => "build",
            Self::Advisory => "advisory",
            Self::NotSure => "not-sure",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TargetMarket {
    Uae,
    Ksa,
    Us,
    Eu,
    Uk,
    Canada,
    Australia,
    Other,
}

impl TargetMarket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uae => "uae",
            Self::Ksa => "ksa",
            Self::Us => "us",
            Self::Eu => "eu",
            Self::Uk => "uk",
            Self::Canada => "canada",
            Self::Australia => "australia",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum Timeline {
    #[sqlx(rename = "asap")]
    #[serde(rename = "asap")]
    Asap,
    #[sqlx(rename = "2-4-weeks")]
    #[serde(rename = "2-4-weeks")]
    TwoToFourWeeks,
    #[sqlx(rename = "1-2-months")]
    #[serde(rename = "1-2-months")]
    OneToTwoMonths,
    #[sqlx(rename = "flexible")]
    #[serde(rename = "flexible")]
    Flexible,
}

impl Timeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asap => "asap",
            Self::TwoToFourWeeks => "2-4-weeks",
            Self::OneToTwoMonths => "1-2-months",
            Self::Flexible => "flexible",
        }
    }
}

/// A consulting-application submission from the qualification form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HouzezApplication {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub whatsapp: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub using_houzez: UsingHouzez,
    pub service_type: ServiceType,
    pub target_market: TargetMarket,
    pub timeline: Timeline,
    pub budget: Option<String>,
    pub features: Vec<String>,
    pub other_feature: Option<String>,
    pub problem: String,
    pub notes: Option<String>,
    pub status: ApplicationStatus,
    pub email_sent: bool,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ApplicationCreate {
    pub full_name: String,
    pub email: String,
    pub whatsapp: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub using_houzez: UsingHouzez,
    pub service_type: ServiceType,
    pub target_market: TargetMarket,
    pub timeline: Timeline,
    pub budget: Option<String>,
    pub features: Vec<String>,
    pub other_feature: Option<String>,
    pub problem: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationPatch {
    pub status: Option<ApplicationStatus>,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationBrief {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub service_type: ServiceType,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}
