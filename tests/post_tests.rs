mod common;

#[cfg(test)]
pub mod post_tests {
    use chrono::{Duration, Utc};
    use sqlx::PgPool;
    use uuid::Uuid;

    use super::common::*;

    use presskit::common::ApiError;
    use presskit::db;
    use presskit::models::*;

    #[sqlx::test(migrations = "./migrations")]
    async fn create_draft_leaves_publish_timestamp_empty(pool: PgPool) {
        let created = seed_post(&pool, "First", "first", PostStatus::Draft).await;

        assert_eq!(created.post.status, PostStatus::Draft);
        assert_eq!(created.post.published_at, None);
        assert_eq!(created.post.author, "Admin");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_published_stamps_publish_timestamp(pool: PgPool) {
        let start = Utc::now();
        let created = seed_post(&pool, "Live", "live", PostStatus::Published).await;
        let end = Utc::now();

        let published_at = created.post.published_at.expect("publishedAt must be set");
        assert!(
            published_at >= start - Duration::seconds(1) && published_at <= end + Duration::seconds(1),
            "publishedAt outside test window"
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_with_colliding_slug_is_rejected(pool: PgPool) {
        let original = seed_post(&pool, "First", "shared-slug", PostStatus::Draft).await;

        let result = db::create_post(&pool, &post_input("Second", "shared-slug", PostStatus::Draft)).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));

        // The original document is untouched.
        let unchanged = db::get_post(&pool, original.post.id).await.unwrap();
        assert_eq!(unchanged.post.title, "First");

        let (_, total) = db::list_admin(&pool, 1, 10, None, None).await.unwrap();
        assert_eq!(total, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn update_into_colliding_slug_is_rejected(pool: PgPool) {
        seed_post(&pool, "First", "first", PostStatus::Draft).await;
        let second = seed_post(&pool, "Second", "second", PostStatus::Draft).await;

        let patch = PostPatch {
            slug: Some("first".to_string()),
            ..Default::default()
        };
        let result = db::update_post(&pool, second.post.id, &patch).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));

        let unchanged = db::get_post(&pool, second.post.id).await.unwrap();
        assert_eq!(unchanged.post.slug, "second");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn keeping_own_slug_on_update_is_not_a_collision(pool: PgPool) {
        let post = seed_post(&pool, "First", "first", PostStatus::Draft).await;

        let patch = PostPatch {
            slug: Some("first".to_string()),
            title: Some("First, revised".to_string()),
            ..Default::default()
        };

        let updated = db::update_post(&pool, post.post.id, &patch).await.unwrap();
        assert_eq!(updated.post.title, "First, revised");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn publish_timestamp_is_stamped_once(pool: PgPool) {
        let post = seed_post(&pool, "Draft", "draft-post", PostStatus::Draft).await;

        let publish = PostPatch {
            status: Some(PostStatus::Published),
            ..Default::default()
        };
        let published = db::update_post(&pool, post.post.id, &publish).await.unwrap();
        let first_stamp = published.post.published_at.expect("publishedAt must be set");

        // Re-saving while already published must not move the stamp.
        let resave = PostPatch {
            status: Some(PostStatus::Published),
            title: Some("Draft, edited live".to_string()),
            ..Default::default()
        };
        let resaved = db::update_post(&pool, post.post.id, &resave).await.unwrap();
        assert_eq!(resaved.post.published_at, Some(first_stamp));

        // A patch without status leaves it alone too.
        let edit = PostPatch {
            excerpt: Some("Tightened excerpt".to_string()),
            ..Default::default()
        };
        let edited = db::update_post(&pool, post.post.id, &edit).await.unwrap();
        assert_eq!(edited.post.published_at, Some(first_stamp));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn partial_update_touches_only_named_fields(pool: PgPool) {
        let post = seed_post(&pool, "Original", "original", PostStatus::Pending).await;

        let patch = PostPatch {
            excerpt: Some("Only the excerpt changes".to_string()),
            ..Default::default()
        };
        let updated = db::update_post(&pool, post.post.id, &patch).await.unwrap();

        assert_eq!(updated.post.excerpt, "Only the excerpt changes");
        assert_eq!(updated.post.title, post.post.title);
        assert_eq!(updated.post.slug, post.post.slug);
        assert_eq!(updated.post.content, post.post.content);
        assert_eq!(updated.post.status, PostStatus::Pending);
        assert_eq!(updated.post.published_at, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn update_missing_post_is_not_found(pool: PgPool) {
        let patch = PostPatch {
            title: Some("Ghost".to_string()),
            ..Default::default()
        };
        let result = db::update_post(&pool, Uuid::new_v4(), &patch).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn scheduled_for_is_stored_as_timestamp(pool: PgPool) {
        let tomorrow = Utc::now() + Duration::days(1);
        let mut input = post_input("Scheduled", "scheduled", PostStatus::Scheduled);
        input.scheduled_for = Some(tomorrow);

        let created = db::create_post(&pool, &input).await.unwrap();
        let stored = created.post.scheduled_for.expect("scheduledFor must be set");
        assert!((stored - tomorrow).num_seconds().abs() < 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn duplicate_probes_slug_and_forces_draft(pool: PgPool) {
        let mut input = post_input("Foo", "foo", PostStatus::Published);
        input.meta_title = Some("Foo meta".to_string());
        let source = db::create_post(&pool, &input).await.unwrap();

        let first = db::duplicate_post(&pool, source.post.id).await.unwrap();
        assert_eq!(first.post.slug, "foo-copy");
        assert_eq!(first.post.title, "Foo (Copy)");
        assert_eq!(first.post.status, PostStatus::Draft);
        assert_eq!(first.post.published_at, None);
        assert_eq!(first.post.content, source.post.content);
        assert_eq!(first.post.meta_title.as_deref(), Some("Foo meta"));

        let second = db::duplicate_post(&pool, source.post.id).await.unwrap();
        assert_eq!(second.post.slug, "foo-copy-2");

        let third = db::duplicate_post(&pool, source.post.id).await.unwrap();
        assert_eq!(third.post.slug, "foo-copy-3");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn duplicate_copies_taxonomy(pool: PgPool) {
        let category = seed_category(&pool, "Guides", "guides").await;
        let tag = seed_tag(&pool, "Rust", "rust").await;

        let mut input = post_input("Tagged", "tagged", PostStatus::Published);
        input.categories = vec![category.id];
        input.tags = vec![tag.id];
        let source = db::create_post(&pool, &input).await.unwrap();

        let copy = db::duplicate_post(&pool, source.post.id).await.unwrap();
        assert_eq!(copy.categories, source.categories);
        assert_eq!(copy.tags, source.tags);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn duplicate_missing_post_is_not_found(pool: PgPool) {
        let result = db::duplicate_post(&pool, Uuid::new_v4()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn delete_is_unconditional(pool: PgPool) {
        let category = seed_category(&pool, "Guides", "guides").await;
        let mut input = post_input("Doomed", "doomed", PostStatus::Published);
        input.categories = vec![category.id];
        let post = db::create_post(&pool, &input).await.unwrap();

        db::delete_post(&pool, post.post.id).await.unwrap();

        let result = db::get_post(&pool, post.post.id).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        // Join rows cascade with the post.
        let orphans: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM post_categories WHERE post_id = $1")
                .bind(post.post.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(orphans, 0);

        let again = db::delete_post(&pool, post.post.id).await;
        assert!(matches!(again, Err(ApiError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn update_replaces_taxonomy_sets_when_present(pool: PgPool) {
        let guides = seed_category(&pool, "Guides", "guides").await;
        let news = seed_category(&pool, "News", "news").await;

        let mut input = post_input("Shifting", "shifting", PostStatus::Draft);
        input.categories = vec![guides.id];
        let post = db::create_post(&pool, &input).await.unwrap();
        assert_eq!(post.categories.len(), 1);

        let patch = PostPatch {
            categories: Some(vec![news.id]),
            ..Default::default()
        };
        let updated = db::update_post(&pool, post.post.id, &patch).await.unwrap();
        assert_eq!(updated.categories.len(), 1);
        assert_eq!(updated.categories[0].slug, "news");

        // An empty set clears the association entirely.
        let clear = PostPatch {
            categories: Some(vec![]),
            ..Default::default()
        };
        let cleared = db::update_post(&pool, post.post.id, &clear).await.unwrap();
        assert!(cleared.categories.is_empty());

        // A patch without the field leaves the association alone.
        let untouched = PostPatch {
            title: Some("Shifting, again".to_string()),
            ..Default::default()
        };
        let after = db::update_post(&pool, post.post.id, &untouched).await.unwrap();
        assert!(after.categories.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_with_unknown_category_is_a_validation_error(pool: PgPool) {
        let mut input = post_input("Orphan", "orphan", PostStatus::Draft);
        input.categories = vec![Uuid::new_v4()];

        let result = db::create_post(&pool, &input).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        // The failed transaction leaves nothing behind.
        let (_, total) = db::list_admin(&pool, 1, 10, None, None).await.unwrap();
        assert_eq!(total, 0);
    }
}
