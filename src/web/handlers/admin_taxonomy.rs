use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use presskit::common::ApiError;
use presskit::db;
use presskit::models::{CategoryCreate, CategoryPatch, TagCreate, TagPatch};

use crate::web::forms::{CreateCategoryForm, CreateTagForm, UpdateCategoryForm, UpdateTagForm};
use crate::web::helpers::{check_valid, normalize_slug, opt_trimmed, require_admin};
use crate::web::state::AppState;

#[get("/api/admin/categories")]
pub async fn list_categories(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let categories = db::list_categories(&state.pool).await?;

    Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}

#[post("/api/admin/categories")]
pub async fn create_category(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Json<CreateCategoryForm>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;
    check_valid(&*form)?;

    let form = form.into_inner();
    let data = CategoryCreate {
        name: form.name.trim().to_string(),
        slug: normalize_slug(&form.slug),
        description: opt_trimmed(form.description),
        color: opt_trimmed(form.color),
    };

    let category = db::create_category(&state.pool, &data).await?;

    Ok(HttpResponse::Created().json(category))
}

#[patch("/api/admin/categories/{id}")]
pub async fn update_category(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    form: web::Json<UpdateCategoryForm>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let form = form.into_inner();
    let patch = CategoryPatch {
        name: form.name.map(|s| s.trim().to_string()),
        slug: form.slug.as_deref().map(normalize_slug),
        description: form.description,
        color: form.color,
    };

    let category = db::update_category(&state.pool, path.into_inner(), &patch).await?;

    Ok(HttpResponse::Ok().json(category))
}

#[delete("/api/admin/categories/{id}")]
pub async fn delete_category(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    db::delete_category(&state.pool, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[get("/api/admin/tags")]
pub async fn list_tags(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let tags = db::list_tags(&state.pool).await?;

    Ok(HttpResponse::Ok().json(json!({ "tags": tags })))
}

#[post("/api/admin/tags")]
pub async fn create_tag(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Json<CreateTagForm>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;
    check_valid(&*form)?;

    let form = form.into_inner();
    let data = TagCreate {
        name: form.name.trim().to_string(),
        slug: normalize_slug(&form.slug),
    };

    let tag = db::create_tag(&state.pool, &data).await?;

    Ok(HttpResponse::Created().json(tag))
}

#[patch("/api/admin/tags/{id}")]
pub async fn update_tag(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    form: web::Json<UpdateTagForm>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let form = form.into_inner();
    let patch = TagPatch {
        name: form.name.map(|s| s.trim().to_string()),
        slug: form.slug.as_deref().map(normalize_slug),
    };

    let tag = db::update_tag(&state.pool, path.into_inner(), &patch).await?;

    Ok(HttpResponse::Ok().json(tag))
}

#[delete("/api/admin/tags/{id}")]
pub async fn delete_tag(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    db::delete_tag(&state.pool, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_categories)
        .service(create_category)
        .service(update_category)
        .service(delete_category)
        .service(list_tags)
        .service(create_tag)
        .service(update_tag)
        .service(delete_tag);
}
