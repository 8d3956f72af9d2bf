use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use presskit::common::ApiError;
use presskit::db;
use presskit::models::{PageMeta, PostCreate, PostPatch, PostStatus};

use crate::web::forms::{AdminListQuery, CreatePostForm, UpdatePostForm};
use crate::web::helpers::{
    check_valid, normalize_slug, opt_trimmed, paging, parse_timestamp, require_admin,
};
use crate::web::state::AppState;

#[get("/api/admin/blog")]
pub async fn list_posts(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<AdminListQuery>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let (page, limit) = paging(query.page, query.limit, 20)?;
    let status = parse_status_filter(query.status.as_deref())?;

    let (posts, total) =
        db::list_admin(&state.pool, page, limit, status, query.search.as_deref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "pagination": PageMeta::new(page, limit, total),
    })))
}

#[post("/api/admin/blog")]
pub async fn create_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Json<CreatePostForm>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;
    check_valid(&*form)?;

    let form = form.into_inner();

    let scheduled_for = form
        .scheduled_for
        .as_deref()
        .map(parse_timestamp)
        .transpose()?;

    let data = PostCreate {
        title: form.title.trim().to_string(),
        slug: normalize_slug(&form.slug),
        excerpt: form.excerpt.trim().to_string(),
        content: form.content,
        featured_image: opt_trimmed(form.featured_image),
        featured_image_alt: opt_trimmed(form.featured_image_alt),
        categories: form.categories,
        tags: form.tags,
        author: state.default_author.clone(),
        status: form.status,
        scheduled_for,
        meta_title: opt_trimmed(form.meta_title),
        meta_description: opt_trimmed(form.meta_description),
    };

    let post = db::create_post(&state.pool, &data).await?;

    Ok(HttpResponse::Created().json(post))
}

#[get("/api/admin/blog/{id}")]
pub async fn get_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let post = db::get_post(&state.pool, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(post))
}

#[patch("/api/admin/blog/{id}")]
pub async fn update_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    form: web::Json<UpdatePostForm>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let form = form.into_inner();

    let scheduled_for = form
        .scheduled_for
        .as_deref()
        .map(parse_timestamp)
        .transpose()?;

    let patch = PostPatch {
        title: form.title.map(|s| s.trim().to_string()),
        slug: form.slug.as_deref().map(normalize_slug),
        excerpt: form.excerpt.map(|s| s.trim().to_string()),
        content: form.content,
        featured_image: form.featured_image,
        featured_image_alt: form.featured_image_alt,
        categories: form.categories,
        tags: form.tags,
        status: form.status,
        scheduled_for,
        meta_title: form.meta_title,
        meta_description: form.meta_description,
    };

    let post = db::update_post(&state.pool, path.into_inner(), &patch).await?;

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/api/admin/blog/{id}")]
pub async fn delete_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    db::delete_post(&state.pool, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[post("/api/admin/blog/{id}/duplicate")]
pub async fn duplicate_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let post = db::duplicate_post(&state.pool, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "post": post })))
}

fn parse_status_filter(status: Option<&str>) -> Result<Option<PostStatus>, ApiError> {
    match status.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(s) => s.parse::<PostStatus>().map(Some).map_err(ApiError::Validation),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_posts)
        .service(create_post)
        .service(get_post)
        .service(update_post)
        .service(delete_post)
        .service(duplicate_post);
}
