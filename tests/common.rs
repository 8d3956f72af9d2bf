use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use presskit::db;
use presskit::models::*;

#[allow(dead_code)]
pub fn post_input(title: &str, slug: &str, status: PostStatus) -> PostCreate {
    PostCreate {
        title: title.to_string(),
        slug: slug.to_string(),
        excerpt: format!("{title} excerpt"),
        content: format!("<p>{title} body</p>"),
        featured_image: None,
        featured_image_alt: None,
        categories: vec![],
        tags: vec![],
        author: "Admin".to_string(),
        status,
        scheduled_for: None,
        meta_title: None,
        meta_description: None,
    }
}

#[allow(dead_code)]
pub async fn seed_post(pool: &PgPool, title: &str, slug: &str, status: PostStatus) -> PostDetail {
    db::create_post(pool, &post_input(title, slug, status))
        .await
        .expect("Failed to seed post")
}

/// Rewrites the publish timestamp directly, bypassing the publish-once rule,
/// to simulate posts published in the past or scheduled into the future.
#[allow(dead_code)]
pub async fn set_published_at(pool: &PgPool, id: Uuid, when: DateTime<Utc>) {
    sqlx::query("UPDATE blog_posts SET published_at = $1 WHERE id = $2")
        .bind(when)
        .bind(id)
        .execute(pool)
        .await
        .expect("Failed to set published_at");
}

#[allow(dead_code)]
pub async fn seed_category(pool: &PgPool, name: &str, slug: &str) -> Category {
    db::create_category(
        pool,
        &CategoryCreate {
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            color: None,
        },
    )
    .await
    .expect("Failed to seed category")
}

#[allow(dead_code)]
pub async fn seed_tag(pool: &PgPool, name: &str, slug: &str) -> Tag {
    db::create_tag(
        pool,
        &TagCreate {
            name: name.to_string(),
            slug: slug.to_string(),
        },
    )
    .await
    .expect("Failed to seed tag")
}

#[allow(dead_code)]
pub fn lead_input(name: &str, email: &str) -> LeadCreate {
    LeadCreate {
        name: name.to_string(),
        email: email.to_string(),
        whatsapp: None,
        service: Some("consulting".to_string()),
        budget: None,
        message: "I would like to discuss a project with you.".to_string(),
    }
}

#[allow(dead_code)]
pub fn application_input(full_name: &str, email: &str) -> ApplicationCreate {
    ApplicationCreate {
        full_name: full_name.to_string(),
        email: email.to_string(),
        whatsapp: None,
        company: Some("Acme Estates".to_string()),
        website: Some("https://acme.example".to_string()),
        using_houzez: UsingHouzez::Yes,
        service_type: ServiceType::Build,
        target_market: TargetMarket::Uae,
        timeline: Timeline::TwoToFourWeeks,
        budget: Some("1500-5000".to_string()),
        features: vec!["crm".to_string(), "payment-gateway".to_string()],
        other_feature: None,
        problem: "Listing pages take seconds to load and search is broken.".to_string(),
        notes: None,
    }
}
