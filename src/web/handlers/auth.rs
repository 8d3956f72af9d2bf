use actix_web::cookie::{Cookie, SameSite};
use actix_web::{post, web, HttpResponse};
use chrono::Duration;
use serde_json::json;

use presskit::common::ApiError;
use presskit::services::PasswordManager;

use crate::web::forms::LoginForm;
use crate::web::helpers::SESSION_COOKIE;
use crate::web::state::AppState;

const SESSION_TTL_HOURS: i64 = 24;

#[post("/api/admin/login")]
pub async fn login(
    state: web::Data<AppState>,
    form: web::Json<LoginForm>,
) -> Result<HttpResponse, ApiError> {
    let hash = state
        .admin_password_hash
        .as_ref()
        .ok_or(ApiError::Unauthorized)?;

    let ok = PasswordManager::verify_password(&form.password, hash).map_err(|e| {
        log::error!("password verification error: {e}");
        ApiError::Unauthorized
    })?;

    if !ok {
        return Err(ApiError::Unauthorized);
    }

    let token = state.sessions.issue(Duration::hours(SESSION_TTL_HOURS));
    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "success": true })))
}

#[post("/api/admin/logout")]
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "success": true }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(logout);
}
