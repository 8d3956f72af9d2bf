use actix_web::{delete, get, patch, web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use presskit::common::ApiError;
use presskit::db;
use presskit::models::{LeadPatch, LeadStatus, PageMeta};

use crate::web::forms::{AdminListQuery, UpdateLeadForm};
use crate::web::helpers::{paging, require_admin};
use crate::web::state::AppState;

#[get("/api/admin/leads")]
pub async fn list_leads(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<AdminListQuery>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let (page, limit) = paging(query.page, query.limit, 20)?;
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(s) => Some(s.parse::<LeadStatus>().map_err(ApiError::Validation)?),
    };

    let (leads, total) =
        db::list_leads(&state.pool, page, limit, status, query.search.as_deref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "leads": leads,
        "pagination": PageMeta::new(page, limit, total),
    })))
}

#[get("/api/admin/leads/{id}")]
pub async fn get_lead(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let lead = db::get_lead(&state.pool, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(lead))
}

#[patch("/api/admin/leads/{id}")]
pub async fn update_lead(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    form: web::Json<UpdateLeadForm>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let form = form.into_inner();
    let patch = LeadPatch {
        status: form.status,
        notes: form.notes,
    };

    let lead = db::update_lead(&state.pool, path.into_inner(), &patch).await?;

    Ok(HttpResponse::Ok().json(lead))
}

#[delete("/api/admin/leads/{id}")]
pub async fn delete_lead(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    db::delete_lead(&state.pool, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_leads)
        .service(get_lead)
        .service(update_lead)
        .service(delete_lead);
}
