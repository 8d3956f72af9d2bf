use actix_web::{post, web, HttpResponse};
use serde_json::json;

use presskit::common::ApiError;
use presskit::db;
use presskit::models::{ApplicationCreate, LeadCreate};

use crate::web::forms::{ApplicationForm, ContactForm};
use crate::web::helpers::{check_valid, opt_trimmed};
use crate::web::state::AppState;

/// The write always wins: the submission is persisted first, the
/// notification email is attempted exactly once afterwards, and a mail
/// failure is demoted to a warning with `emailSent` left false.
#[post("/api/contact")]
pub async fn submit_contact(
    state: web::Data<AppState>,
    form: web::Json<ContactForm>,
) -> Result<HttpResponse, ApiError> {
    check_valid(&*form)?;

    let form = form.into_inner();
    let data = LeadCreate {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_lowercase(),
        whatsapp: opt_trimmed(form.whatsapp),
        service: opt_trimmed(form.service),
        budget: opt_trimmed(form.budget),
        message: form.message,
    };

    let mut lead = db::create_lead(&state.pool, &data).await?;

    match &state.mailer {
        Some(mailer) => match mailer.send_contact_notification(&lead).await {
            Ok(()) => {
                db::mark_lead_email_sent(&state.pool, lead.id).await?;
                lead.email_sent = true;
            }
            Err(e) => log::warn!("contact notification email failed: {e}"),
        },
        None => log::warn!("SMTP not configured; skipping contact notification"),
    }

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Message sent successfully",
        "id": lead.id,
    })))
}

#[post("/api/houzez-apply")]
pub async fn submit_application(
    state: web::Data<AppState>,
    form: web::Json<ApplicationForm>,
) -> Result<HttpResponse, ApiError> {
    check_valid(&*form)?;

    if let Some(message) = form.conditional_rule_violation() {
        return Err(ApiError::Validation(message.to_string()));
    }

    let form = form.into_inner();
    let data = ApplicationCreate {
        full_name: form.full_name.trim().to_string(),
        email: form.email.trim().to_lowercase(),
        whatsapp: opt_trimmed(form.whatsapp),
        company: opt_trimmed(form.company),
        website: opt_trimmed(form.website),
        using_houzez: form.using_houzez,
        service_type: form.service_type,
        target_market: form.target_market,
        timeline: form.timeline,
        budget: opt_trimmed(form.budget),
        features: form.features,
        other_feature: opt_trimmed(form.other_feature),
        problem: form.problem,
        notes: opt_trimmed(form.notes),
    };

    let mut application = db::create_application(&state.pool, &data).await?;

    match &state.mailer {
        Some(mailer) => match mailer.send_application_notifications(&application).await {
            Ok(()) => {
                db::mark_application_email_sent(&state.pool, application.id).await?;
                application.email_sent = true;
            }
            Err(e) => log::warn!("application notification email failed: {e}"),
        },
        None => log::warn!("SMTP not configured; skipping application notification"),
    }

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Application submitted successfully",
        "id": application.id,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_contact).service(submit_application);
}
