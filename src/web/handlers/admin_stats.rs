use actix_web::{get, web, HttpRequest, HttpResponse};

use presskit::common::ApiError;
use presskit::db;

use crate::web::helpers::require_admin;
use crate::web::state::AppState;

#[get("/api/admin/stats")]
pub async fn dashboard(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state)?;

    let stats = db::dashboard_stats(&state.pool).await?;

    Ok(HttpResponse::Ok().json(stats))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard);
}
