use actix_web::{get, web, HttpResponse};
use serde_json::json;

use presskit::common::ApiError;
use presskit::db;
use presskit::models::PageMeta;

use crate::web::forms::{PublicListQuery, RelatedQuery, SearchQuery};
use crate::web::helpers::paging;
use crate::web::state::AppState;

#[get("/api/blog")]
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PublicListQuery>,
) -> Result<HttpResponse, ApiError> {
    let (page, limit) = paging(query.page, query.limit, 10)?;

    // A category filter that names no known category matches nothing,
    // same as a category with zero visible posts.
    let category_id = match &query.category {
        Some(slug) => match db::category_id_by_slug(&state.pool, slug).await? {
            Some(id) => Some(id),
            None => {
                return Ok(HttpResponse::Ok().json(json!({
                    "posts": [],
                    "pagination": PageMeta::new(page, limit, 0),
                })));
            }
        },
        None => None,
    };

    let (posts, total) =
        db::list_public(&state.pool, page, limit, category_id, query.search.as_deref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "pagination": PageMeta::new(page, limit, total),
    })))
}

#[get("/api/blog/search")]
pub async fn search_posts(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let (page, limit) = paging(query.page, query.limit, 10)?;

    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({
            "posts": [],
            "pagination": PageMeta::empty(limit),
        })));
    }

    let (posts, total) = db::search_public(&state.pool, q, page, limit).await?;

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "pagination": PageMeta::new(page, limit, total),
    })))
}

#[get("/api/blog/sidebar")]
pub async fn sidebar(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let summary = db::sidebar_summary(&state.pool).await?;

    Ok(HttpResponse::Ok().json(summary))
}

#[get("/api/blog/{slug}/related")]
pub async fn related_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<RelatedQuery>,
) -> Result<HttpResponse, ApiError> {
    let slug = path.into_inner();
    let limit = query.limit.unwrap_or(3).clamp(1, 10);

    let current = db::get_public_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;

    let category_ids: Vec<_> = current.categories.iter().map(|c| c.id).collect();
    let posts = db::get_related(&state.pool, &slug, &category_ids, limit).await?;

    Ok(HttpResponse::Ok().json(json!({ "posts": posts })))
}

#[get("/api/blog/{slug}")]
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let slug = path.into_inner();

    // A published post whose timestamp is still in the future answers
    // exactly like a missing one.
    let post = db::get_public_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;

    Ok(HttpResponse::Ok().json(post))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Fixed-path routes must register before the slug catch-all.
    cfg.service(list_posts)
        .service(search_posts)
        .service(sidebar)
        .service(related_posts)
        .service(get_post);
}
