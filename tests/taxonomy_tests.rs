mod common;

#[cfg(test)]
pub mod taxonomy_tests {
    use sqlx::PgPool;
    use uuid::Uuid;

    use super::common::*;

    use presskit::common::ApiError;
    use presskit::db;
    use presskit::models::*;

    #[sqlx::test(migrations = "./migrations")]
    async fn category_defaults_to_brand_color(pool: PgPool) {
        let category = seed_category(&pool, "Guides", "guides").await;
        assert_eq!(category.color, "#5b21b6");

        let custom = db::create_category(
            &pool,
            &CategoryCreate {
                name: "News".to_string(),
                slug: "news".to_string(),
                description: Some("Short updates".to_string()),
                color: Some("#0f766e".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(custom.color, "#0f766e");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn category_slug_collisions_are_rejected(pool: PgPool) {
        seed_category(&pool, "Guides", "guides").await;

        let result = db::create_category(
            &pool,
            &CategoryCreate {
                name: "Other Guides".to_string(),
                slug: "guides".to_string(),
                description: None,
                color: None,
            },
        )
        .await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));

        let news = seed_category(&pool, "News", "news").await;
        let rename = db::update_category(
            &pool,
            news.id,
            &CategoryPatch {
                slug: Some("guides".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(rename, Err(ApiError::Conflict(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn category_update_excludes_own_slug(pool: PgPool) {
        let category = seed_category(&pool, "Guides", "guides").await;

        let updated = db::update_category(
            &pool,
            category.id,
            &CategoryPatch {
                name: Some("Long-form guides".to_string()),
                slug: Some("guides".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Long-form guides");
        assert_eq!(updated.slug, "guides");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn category_delete_guard_counts_referencing_posts(pool: PgPool) {
        let category = seed_category(&pool, "Guides", "guides").await;

        for i in 0..3 {
            let mut input = post_input(&format!("Post {i}"), &format!("post-{i}"), PostStatus::Draft);
            input.categories = vec![category.id];
            db::create_post(&pool, &input).await.unwrap();
        }

        let result = db::delete_category(&pool, category.id).await;
        match result {
            Err(ApiError::Conflict(message)) => {
                assert_eq!(
                    message,
                    "Cannot delete category. 3 post(s) are using this category."
                );
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        // Unreferenced categories delete cleanly.
        let empty = seed_category(&pool, "Empty", "empty").await;
        db::delete_category(&pool, empty.id).await.unwrap();

        let missing = db::delete_category(&pool, Uuid::new_v4()).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn categories_list_sorted_by_name_with_live_counts(pool: PgPool) {
        let news = seed_category(&pool, "News", "news").await;
        seed_category(&pool, "Guides", "guides").await;

        let mut input = post_input("One", "one", PostStatus::Draft);
        input.categories = vec![news.id];
        db::create_post(&pool, &input).await.unwrap();

        let listed = db::list_categories(&pool).await.unwrap();
        let names: Vec<_> = listed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Guides", "News"]);

        let counts: Vec<_> = listed.iter().map(|c| c.post_count).collect();
        assert_eq!(counts, vec![0, 1]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn tag_slug_collisions_are_rejected(pool: PgPool) {
        seed_tag(&pool, "Rust", "rust").await;

        let result = db::create_tag(
            &pool,
            &TagCreate {
                name: "Rust again".to_string(),
                slug: "rust".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn tag_delete_guard_counts_referencing_posts(pool: PgPool) {
        let tag = seed_tag(&pool, "Rust", "rust").await;

        let mut input = post_input("One", "one", PostStatus::Published);
        input.tags = vec![tag.id];
        db::create_post(&pool, &input).await.unwrap();

        let result = db::delete_tag(&pool, tag.id).await;
        match result {
            Err(ApiError::Conflict(message)) => {
                assert_eq!(message, "Cannot delete tag. 1 post(s) are using this tag.");
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        let unused = seed_tag(&pool, "Go", "go").await;
        db::delete_tag(&pool, unused.id).await.unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn tag_update_not_found(pool: PgPool) {
        let result = db::update_tag(
            &pool,
            Uuid::new_v4(),
            &TagPatch {
                name: Some("Ghost".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
