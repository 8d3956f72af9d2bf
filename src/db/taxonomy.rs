use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{is_unique_violation, ApiError};
use crate::models::{
    Category, CategoryCreate, CategoryPatch, CategoryWithCount, SidebarCategory, SidebarTag, Tag,
    TagCreate, TagPatch, TagWithCount, DEFAULT_CATEGORY_COLOR,
};

pub async fn create_category(pool: &PgPool, data: &CategoryCreate) -> Result<Category, ApiError> {
    sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, slug, description, color)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&data.name)
    .bind(&data.slug)
    .bind(data.description.as_deref())
    .bind(data.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR))
    .fetch_one(pool)
    .await
    .map_err(|e| slug_conflict("category", e))
}

pub async fn update_category(
    pool: &PgPool,
    id: Uuid,
    patch: &CategoryPatch,
) -> Result<Category, ApiError> {
    sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories
        SET
            name = COALESCE($1, name),
            slug = COALESCE($2, slug),
            description = COALESCE($3, description),
            color = COALESCE($4, color)
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(patch.name.as_deref())
    .bind(patch.slug.as_deref())
    .bind(patch.description.as_deref())
    .bind(patch.color.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| slug_conflict("category", e))?
    .ok_or_else(|| ApiError::not_found("Category"))
}

/// Deletion is refused while any post still references the category; the
/// count is computed live so the message always matches reality.
pub async fn delete_category(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let in_use: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM post_categories WHERE category_id = $1"#)
            .bind(id)
            .fetch_one(pool)
            .await?;

    if in_use > 0 {
        return Err(ApiError::Conflict(format!(
            "Cannot delete category. {} post(s) are using this category.",
            in_use
        )));
    }

    let deleted =
        sqlx::query_scalar::<_, Uuid>(r#"DELETE FROM categories WHERE id = $1 RETURNING id"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

    match deleted {
        Some(_) => Ok(()),
        None => Err(ApiError::not_found("Category")),
    }
}

pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryWithCount>, ApiError> {
    let categories = sqlx::query_as::<_, CategoryWithCount>(
        r#"
        SELECT
            c.*,
            (SELECT COUNT(*) FROM post_categories pc WHERE pc.category_id = c.id) AS post_count
        FROM categories c
        ORDER BY c.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn category_id_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Uuid>, ApiError> {
    let id = sqlx::query_scalar::<_, Uuid>(r#"SELECT id FROM categories WHERE slug = $1"#)
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    Ok(id)
}

pub async fn create_tag(pool: &PgPool, data: &TagCreate) -> Result<Tag, ApiError> {
    sqlx::query_as::<_, Tag>(
        r#"
        INSERT INTO tags (name, slug)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(&data.name)
    .bind(&data.slug)
    .fetch_one(pool)
    .await
    .map_err(|e| slug_conflict("tag", e))
}

pub async fn update_tag(pool: &PgPool, id: Uuid, patch: &TagPatch) -> Result<Tag, ApiError> {
    sqlx::query_as::<_, Tag>(
        r#"
        UPDATE tags
        SET
            name = COALESCE($1, name),
            slug = COALESCE($2, slug)
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(patch.name.as_deref())
    .bind(patch.slug.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| slug_conflict("tag", e))?
    .ok_or_else(|| ApiError::not_found("Tag"))
}

pub async fn delete_tag(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let in_use: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM post_tags WHERE tag_id = $1"#)
        .bind(id)
        .fetch_one(pool)
        .await?;

    if in_use > 0 {
        return Err(ApiError::Conflict(format!(
            "Cannot delete tag. {} post(s) are using this tag.",
            in_use
        )));
    }

    let deleted = sqlx::query_scalar::<_, Uuid>(r#"DELETE FROM tags WHERE id = $1 RETURNING id"#)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match deleted {
        Some(_) => Ok(()),
        None => Err(ApiError::not_found("Tag")),
    }
}

pub async fn list_tags(pool: &PgPool) -> Result<Vec<TagWithCount>, ApiError> {
    let tags = sqlx::query_as::<_, TagWithCount>(
        r#"
        SELECT
            t.*,
            (SELECT COUNT(*) FROM post_tags pt WHERE pt.tag_id = t.id) AS post_count
        FROM tags t
        ORDER BY t.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

#[derive(Debug, Serialize)]
pub struct SidebarSummary {
    pub categories: Vec<SidebarCategory>,
    pub tags: Vec<SidebarTag>,
}

/// Sidebar counts consider only publicly visible posts; empty categories and
/// tags are dropped, and tags are capped to the 15 most used.
pub async fn sidebar_summary(pool: &PgPool) -> Result<SidebarSummary, ApiError> {
    let categories = sqlx::query_as::<_, SidebarCategory>(
        r#"
        SELECT c.id, c.name, c.slug, c.color, COUNT(*) AS post_count
        FROM categories c
        JOIN post_categories pc ON pc.category_id = c.id
        JOIN blog_posts p ON p.id = pc.post_id
        WHERE p.status = 'published' AND p.published_at <= now()
        GROUP BY c.id, c.name, c.slug, c.color
        ORDER BY c.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    let tags = sqlx::query_as::<_, SidebarTag>(
        r#"
        SELECT t.id, t.name, t.slug, COUNT(*) AS post_count
        FROM tags t
        JOIN post_tags pt ON pt.tag_id = t.id
        JOIN blog_posts p ON p.id = pt.post_id
        WHERE p.status = 'published' AND p.published_at <= now()
        GROUP BY t.id, t.name, t.slug
        ORDER BY post_count DESC, t.name
        LIMIT 15
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(SidebarSummary { categories, tags })
}

fn slug_conflict(entity: &str, e: sqlx::Error) -> ApiError {
    if is_unique_violation(&e) {
        ApiError::Conflict(format!("A {entity} with this slug already exists"))
    } else {
        e.into()
    }
}
