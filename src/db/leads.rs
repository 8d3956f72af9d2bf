use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::ApiError;
use crate::models::{ContactSubmission, LeadCreate, LeadPatch, LeadStatus};

pub async fn create_lead(pool: &PgPool, data: &LeadCreate) -> Result<ContactSubmission, ApiError> {
    let lead = sqlx::query_as::<_, ContactSubmission>(
        r#"
        INSERT INTO contact_submissions (name, email, whatsapp, service, budget, message)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(data.whatsapp.as_deref())
    .bind(data.service.as_deref())
    .bind(data.budget.as_deref())
    .bind(&data.message)
    .fetch_one(pool)
    .await?;

    Ok(lead)
}

pub async fn get_lead(pool: &PgPool, id: Uuid) -> Result<ContactSubmission, ApiError> {
    sqlx::query_as::<_, ContactSubmission>(r#"SELECT * FROM contact_submissions WHERE id = $1"#)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Lead"))
}

pub async fn update_lead(
    pool: &PgPool,
    id: Uuid,
    patch: &LeadPatch,
) -> Result<ContactSubmission, ApiError> {
    sqlx::query_as::<_, ContactSubmission>(
        r#"
        UPDATE contact_submissions
        SET
            status = COALESCE($1, status),
            notes = COALESCE($2, notes)
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(patch.status.as_ref().map(LeadStatus::as_str))
    .bind(patch.notes.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Lead"))
}

pub async fn delete_lead(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let deleted = sqlx::query_scalar::<_, Uuid>(
        r#"DELETE FROM contact_submissions WHERE id = $1 RETURNING id"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match deleted {
        Some(_) => Ok(()),
        None => Err(ApiError::not_found("Lead")),
    }
}

/// Records the outcome of the single notification attempt. Never called on
/// failure; the flag simply stays false.
pub async fn mark_lead_email_sent(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    sqlx::query(r#"UPDATE contact_submissions SET email_sent = TRUE WHERE id = $1"#)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn list_leads(
    pool: &PgPool,
    page: i64,
    limit: i64,
    status: Option<LeadStatus>,
    search: Option<&str>,
) -> Result<(Vec<ContactSubmission>, i64), ApiError> {
    let mut count_qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM contact_submissions WHERE TRUE");
    push_filters(&mut count_qb, status, search);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM contact_submissions WHERE TRUE");
    push_filters(&mut qb, status, search);
    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind((page - 1) * limit);

    let leads = qb
        .build_query_as::<ContactSubmission>()
        .fetch_all(pool)
        .await?;

    Ok((leads, total))
}

fn push_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    status: Option<LeadStatus>,
    search: Option<&str>,
) {
    if let Some(status) = status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }

    if let Some(q) = search.map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", q);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR message ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}
