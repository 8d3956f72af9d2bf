use chrono::{Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::ApiError;
use crate::models::{ApplicationBrief, LeadBrief};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatTotals {
    pub total_leads: i64,
    pub new_leads: i64,
    pub total_applications: i64,
    pub new_applications: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub stats: StatTotals,
    pub recent_leads: Vec<LeadBrief>,
    pub recent_applications: Vec<ApplicationBrief>,
}

/// Dashboard counters: lifetime totals, last-7-day totals, and the five most
/// recent entries of each intake kind.
pub async fn dashboard_stats(pool: &PgPool) -> Result<DashboardStats, ApiError> {
    let week_ago = Utc::now() - Duration::days(7);

    let total_leads: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM contact_submissions"#)
        .fetch_one(pool)
        .await?;

    let new_leads: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM contact_submissions WHERE created_at >= $1"#)
            .bind(week_ago)
            .fetch_one(pool)
            .await?;

    let total_applications: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM houzez_applications"#)
            .fetch_one(pool)
            .await?;

    let new_applications: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM houzez_applications WHERE created_at >= $1"#)
            .bind(week_ago)
            .fetch_one(pool)
            .await?;

    let recent_leads = sqlx::query_as::<_, LeadBrief>(
        r#"
        SELECT id, name, email, status, created_at
        FROM contact_submissions
        ORDER BY created_at DESC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await?;

    let recent_applications = sqlx::query_as::<_, ApplicationBrief>(
        r#"
        SELECT id, full_name, email, service_type, status, created_at
        FROM houzez_applications
        ORDER BY created_at DESC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(DashboardStats {
        stats: StatTotals {
            total_leads,
            new_leads,
            total_applications,
            new_applications,
        },
        recent_leads,
        recent_applications,
    })
}
