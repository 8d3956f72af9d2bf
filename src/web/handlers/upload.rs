use actix_web::http::header::CONTENT_TYPE;
use actix_web::{delete, post, web, HttpRequest, HttpResponse};
use serde_json::json;

use presskit::common::ApiError;
use presskit::services::MediaError;

use crate::web::forms::DeleteUploadForm;
use crate::web::helpers::require_admin;
use crate::web::state::AppState;

/// Thin adapter over the object-storage collaborator: the body is the blob,
/// the Content-Type header names the format, and the response carries the
/// public URL.
#[post("/api/admin/blog/upload")]
pub async fn upload_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    if body.is_empty() {
        return Err(ApiError::Validation("No file provided".to_string()));
    }

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .unwrap_or_default();

    let url = state
        .media
        .store(&body, &content_type)
        .await
        .map_err(media_error)?;

    Ok(HttpResponse::Created().json(json!({ "url": url })))
}

#[delete("/api/admin/blog/upload")]
pub async fn delete_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Json<DeleteUploadForm>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    state
        .media
        .delete_by_url(&form.url)
        .await
        .map_err(media_error)?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

fn media_error(e: MediaError) -> ApiError {
    match e {
        MediaError::UnsupportedType(_) | MediaError::ForeignUrl(_) => {
            ApiError::Validation(e.to_string())
        }
        MediaError::Io(io) => ApiError::Upstream(io.to_string()),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(upload_image).service(delete_image);
}
