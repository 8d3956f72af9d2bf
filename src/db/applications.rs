use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::ApiError;
use crate::models::{
    ApplicationCreate, ApplicationPatch, ApplicationStatus, HouzezApplication,
};

pub async fn create_application(
    pool: &PgPool,
    data: &ApplicationCreate,
) -> Result<HouzezApplication, ApiError> {
    let application = sqlx::query_as::<_, HouzezApplication>(
        r#"
        INSERT INTO houzez_applications
            (full_name, email, whatsapp, company, website, using_houzez,
             service_type, target_market, timeline, budget, features,
             other_feature, problem, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(&data.full_name)
    .bind(&data.email)
    .bind(data.whatsapp.as_deref())
    .bind(data.company.as_deref())
    .bind(data.website.as_deref())
    .bind(data.using_houzez.as_str())
    .bind(data.service_type.as_str())
    .bind(data.target_market.as_str())
    .bind(data.timeline.as_str())
    .bind(data.budget.as_deref())
    .bind(&data.features)
    .bind(data.other_feature.as_deref())
    .bind(&data.problem)
    .bind(data.notes.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(application)
}

pub async fn get_application(pool: &PgPool, id: Uuid) -> Result<HouzezApplication, ApiError> {
    sqlx::query_as::<_, HouzezApplication>(r#"SELECT * FROM houzez_applications WHERE id = $1"#)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Application"))
}

pub async fn update_application(
    pool: &PgPool,
    id: Uuid,
    patch: &ApplicationPatch,
) -> Result<HouzezApplication, ApiError> {
    sqlx::query_as::<_, HouzezApplication>(
        r#"
        UPDATE houzez_applications
        SET
            status = COALESCE($1, status),
            admin_notes = COALESCE($2, admin_notes)
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(patch.status.as_ref().map(ApplicationStatus::as_str))
    .bind(patch.admin_notes.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Application"))
}

pub async fn delete_application(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let deleted = sqlx::query_scalar::<_, Uuid>(
        r#"DELETE FROM houzez_applications WHERE id = $1 RETURNING id"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match deleted {
        Some(_) => Ok(()),
        None => Err(ApiError::not_found("Application")),
    }
}

pub async fn mark_application_email_sent(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    sqlx::query(r#"UPDATE houzez_applications SET email_sent = TRUE WHERE id = $1"#)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn list_applications(
    pool: &PgPool,
    page: i64,
    limit: i64,
    status: Option<ApplicationStatus>,
    search: Option<&str>,
) -> Result<(Vec<HouzezApplication>, i64), ApiError> {
    let mut count_qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM houzez_applications WHERE TRUE");
    push_filters(&mut count_qb, status, search);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM houzez_applications WHERE TRUE");
    push_filters(&mut qb, status, search);
    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind((page - 1) * limit);

    let applications = qb
        .build_query_as::<HouzezApplication>()
        .fetch_all(pool)
        .await?;

    Ok((applications, total))
}

fn push_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    status: Option<ApplicationStatus>,
    search: Option<&str>,
) {
    if let Some(status) = status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }

    if let Some(q) = search.map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", q);
        qb.push(" AND (full_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR company ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}
