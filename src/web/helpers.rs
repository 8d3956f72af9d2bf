use actix_web::error::InternalError;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, NaiveDateTime, Utc};
use validator::{Validate, ValidationErrors};

use presskit::common::ApiError;

use crate::web::state::AppState;

pub const SESSION_COOKIE: &str = "pk_admin";

const MAX_PAGE_SIZE: i64 = 100;

/// Admin gate. The auth collaborator's whole contract is "is this request
/// authenticated"; everything else about sessions lives in
/// `services::auth`.
pub fn require_admin(req: &HttpRequest, state: &AppState) -> Result<(), ApiError> {
    let authenticated = req
        .cookie(SESSION_COOKIE)
        .map(|c| state.sessions.verify(c.value()))
        .unwrap_or(false);

    if authenticated {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

pub fn paging(
    page: Option<i64>,
    limit: Option<i64>,
    default_limit: i64,
) -> Result<(i64, i64), ApiError> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(default_limit);

    if page < 1 {
        return Err(ApiError::Validation(
            "Pagination 'page' must be a positive integer".to_string(),
        ));
    }

    if limit < 1 || limit > MAX_PAGE_SIZE {
        return Err(ApiError::Validation(format!(
            "Pagination 'limit' must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    Ok((page, limit))
}

/// Scheduling inputs arrive either as RFC 3339 or as the `datetime-local`
/// shape without a zone; the latter is taken as UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, ApiError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(ApiError::Validation(format!(
        "Invalid timestamp: '{}'",
        input
    )))
}

pub fn check_valid<T: Validate>(data: &T) -> Result<(), ApiError> {
    data.validate()
        .map_err(|e| ApiError::Validation(first_message(&e)))
}

fn first_message(errors: &ValidationErrors) -> String {
    for (field, field_errors) in errors.field_errors() {
        if let Some(error) = field_errors.first() {
            return error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for '{}'", field));
        }
    }

    "Validation failed".to_string()
}

pub fn normalize_slug(input: &str) -> String {
    input.trim().to_lowercase()
}

pub fn opt_trimmed(input: Option<String>) -> Option<String> {
    input
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Malformed JSON bodies and query strings get the same `{"error": ...}`
/// shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": err.to_string() }));
        InternalError::from_response(err, response).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": err.to_string() }));
        InternalError::from_response(err, response).into()
    })
}
