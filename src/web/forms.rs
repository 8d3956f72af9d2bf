use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use presskit::models::{
    ApplicationStatus, LeadStatus, PostStatus, ServiceType, TargetMarket, Timeline, UsingHouzez,
};

#[derive(Deserialize)]
pub struct LoginForm {
    pub password: String,
}

#[derive(Deserialize)]
pub struct PublicListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct RelatedQuery {
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct AdminListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    #[validate(length(min = 1, message = "Excerpt is required"))]
    pub excerpt: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub featured_image: Option<String>,
    pub featured_image_alt: Option<String>,
    #[serde(default)]
    pub categories: Vec<Uuid>,
    #[serde(default)]
    pub tags: Vec<Uuid>,
    pub status: PostStatus,
    pub scheduled_for: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostForm {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub featured_image_alt: Option<String>,
    pub categories: Option<Vec<Uuid>>,
    pub tags: Option<Vec<Uuid>>,
    pub status: Option<PostStatus>,
    pub scheduled_for: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct CreateCategoryForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdateCategoryForm {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct CreateTagForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
}

#[derive(Deserialize, Default)]
pub struct UpdateTagForm {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub whatsapp: Option<String>,
    pub service: Option<String>,
    pub budget: Option<String>,
    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub whatsapp: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub using_houzez: UsingHouzez,
    pub service_type: ServiceType,
    pub target_market: TargetMarket,
    pub timeline: Timeline,
    pub budget: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub other_feature: Option<String>,
    #[validate(length(min = 10, message = "Please describe your problem in more detail"))]
    pub problem: String,
    pub notes: Option<String>,
}

impl ApplicationForm {
    /// Cross-field rules the derive cannot express: a budget is mandatory
    /// when asking for a recommendation, and an audit needs a site to audit.
    pub fn conditional_rule_violation(&self) -> Option<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());

        if self.service_type == ServiceType::NotSure && blank(&self.budget) {
            return Some("Budget is required when selecting 'Not sure - recommend for me'");
        }

        if self.service_type == ServiceType::Audit && blank(&self.website) {
            return Some("Website URL is required for Site Audit");
        }

        None
    }
}

#[derive(Deserialize)]
pub struct UpdateLeadForm {
    pub status: Option<LeadStatus>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationForm {
    pub status: Option<ApplicationStatus>,
    pub admin_notes: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteUploadForm {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_application() -> ApplicationForm {
        ApplicationForm {
            full_name: "Jane Roe".to_string(),
            email: "jane@example.com".to_string(),
            whatsapp: None,
            company: None,
            website: None,
            using_houzez: UsingHouzez::Yes,
            service_type: ServiceType::Build,
            target_market: TargetMarket::Uae,
            timeline: Timeline::Flexible,
            budget: None,
            features: vec![],
            other_feature: None,
            problem: "The portal search is unusably slow on mobile.".to_string(),
            notes: None,
        }
    }

    #[test]
    fn budget_required_only_for_not_sure() {
        let mut form = base_application();
        assert!(form.conditional_rule_violation().is_none());

        form.service_type = ServiceType::NotSure;
        assert!(form.conditional_rule_violation().is_some());

        form.budget = Some("1500-5000".to_string());
        assert!(form.conditional_rule_violation().is_none());
    }

    #[test]
    fn website_required_only_for_audit() {
        let mut form = base_application();
        form.service_type = ServiceType::Audit;
        assert!(form.conditional_rule_violation().is_some());

        form.website = Some("   ".to_string());
        assert!(form.conditional_rule_violation().is_some());

        form.website = Some("https://example.com".to_string());
        assert!(form.conditional_rule_violation().is_none());
    }

    #[test]
    fn contact_form_validation_messages() {
        let form = ContactForm {
            name: "J".to_string(),
            email: "not-an-email".to_string(),
            whatsapp: None,
            service: None,
            budget: None,
            message: "short".to_string(),
        };

        assert!(form.validate().is_err());

        let ok = ContactForm {
            name: "Jane Roe".to_string(),
            email: "jane@example.com".to_string(),
            whatsapp: None,
            service: Some("consulting".to_string()),
            budget: None,
            message: "I would like to discuss a project with you.".to_string(),
        };

        assert!(ok.validate().is_ok());
    }
}
