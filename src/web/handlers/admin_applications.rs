use actix_web::{delete, get, patch, web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use presskit::common::ApiError;
use presskit::db;
use presskit::models::{ApplicationPatch, ApplicationStatus, PageMeta};

use crate::web::forms::{AdminListQuery, UpdateApplicationForm};
use crate::web::helpers::{paging, require_admin};
use crate::web::state::AppState;

#[get("/api/admin/applications")]
pub async fn list_applications(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<AdminListQuery>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let (page, limit) = paging(query.page, query.limit, 20)?;
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(s) => Some(s.parse::<ApplicationStatus>().map_err(ApiError::Validation)?),
    };

    let (applications, total) =
        db::list_applications(&state.pool, page, limit, status, query.search.as_deref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "applications": applications,
        "pagination": PageMeta::new(page, limit, total),
    })))
}

#[get("/api/admin/applications/{id}")]
pub async fn get_application(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let application = db::get_application(&state.pool, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(application))
}

#[patch("/api/admin/applications/{id}")]
pub async fn update_application(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    form: web::Json<UpdateApplicationForm>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let form = form.into_inner();
    let patch = ApplicationPatch {
        status: form.status,
        admin_notes: form.admin_notes,
    };

    let application = db::update_application(&state.pool, path.into_inner(), &patch).await?;

    Ok(HttpResponse::Ok().json(application))
}

#[delete("/api/admin/applications/{id}")]
pub async fn delete_application(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    db::delete_application(&state.pool, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_applications)
        .service(get_application)
        .service(update_application)
        .service(delete_application);
}
