use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use std::collections::HashMap;

use crate::common::{is_foreign_key_violation, is_unique_violation, ApiError};
use crate::models::{
    BlogPost, Category, PostCreate, PostDetail, PostListItem, PostPatch, PostStatus, PostSummary,
    Tag,
};

/// Visibility predicate shared by every public query: a post marked
/// `published` with a future timestamp is not visible yet.
const VISIBLE: &str = "status = 'published' AND published_at <= now()";

const SUMMARY_COLUMNS: &str = "id, title, slug, excerpt, featured_image, featured_image_alt, \
     author, status, published_at, scheduled_for, created_at, updated_at";

pub async fn create_post(pool: &PgPool, data: &PostCreate) -> Result<PostDetail, ApiError> {
    let mut tx = pool.begin().await?;

    // published_at is stamped here, once, iff the post is born published.
    let post = sqlx::query_as::<_, BlogPost>(
        r#"
        INSERT INTO blog_posts
            (title, slug, excerpt, content, featured_image, featured_image_alt,
             author, status, published_at, scheduled_for, meta_title, meta_description)
        VALUES
            ($1, $2, $3, $4, $5, $6, $7, $8,
             CASE WHEN $8 = 'published' THEN now() END,
             $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(&data.title)
    .bind(&data.slug)
    .bind(&data.excerpt)
    .bind(&data.content)
    .bind(data.featured_image.as_deref())
    .bind(data.featured_image_alt.as_deref())
    .bind(&data.author)
    .bind(data.status.as_str())
    .bind(data.scheduled_for)
    .bind(data.meta_title.as_deref())
    .bind(data.meta_description.as_deref())
    .fetch_one(&mut *tx)
    .await
    .map_err(slug_conflict)?;

    link_taxonomy(&mut tx, post.id, &data.categories, &data.tags).await?;

    tx.commit().await?;

    with_taxonomy(pool, post).await
}

pub async fn get_post(pool: &PgPool, id: Uuid) -> Result<PostDetail, ApiError> {
    let post = sqlx::query_as::<_, BlogPost>(r#"SELECT * FROM blog_posts WHERE id = $1"#)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;

    with_taxonomy(pool, post).await
}

pub async fn update_post(pool: &PgPool, id: Uuid, patch: &PostPatch) -> Result<PostDetail, ApiError> {
    let mut tx = pool.begin().await?;

    // Every SET expression reads the pre-update row, so the publish-once
    // rule can compare the stored status against the incoming one: the
    // timestamp is stamped only on the transition into 'published' and
    // survives any later re-save untouched.
    let post = sqlx::query_as::<_, BlogPost>(
        r#"
        UPDATE blog_posts
        SET
            title = COALESCE($1, title),
            slug = COALESCE($2, slug),
            excerpt = COALESCE($3, excerpt),
            content = COALESCE($4, content),
            featured_image = COALESCE($5, featured_image),
            featured_image_alt = COALESCE($6, featured_image_alt),
            published_at = CASE
                WHEN $7 = 'published' AND status <> 'published' THEN now()
                ELSE published_at
            END,
            status = COALESCE($7, status),
            scheduled_for = COALESCE($8, scheduled_for),
            meta_title = COALESCE($9, meta_title),
            meta_description = COALESCE($10, meta_description),
            updated_at = now()
        WHERE id = $11
        RETURNING *
        "#,
    )
    .bind(patch.title.as_deref())
    .bind(patch.slug.as_deref())
    .bind(patch.excerpt.as_deref())
    .bind(patch.content.as_deref())
    .bind(patch.featured_image.as_deref())
    .bind(patch.featured_image_alt.as_deref())
    .bind(patch.status.as_ref().map(PostStatus::as_str))
    .bind(patch.scheduled_for)
    .bind(patch.meta_title.as_deref())
    .bind(patch.meta_description.as_deref())
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(slug_conflict)?
    .ok_or_else(|| ApiError::not_found("Post"))?;

    if let Some(categories) = &patch.categories {
        sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        link_categories(&mut tx, id, categories).await?;
    }

    if let Some(tags) = &patch.tags {
        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        link_tags(&mut tx, id, tags).await?;
    }

    tx.commit().await?;

    with_taxonomy(pool, post).await
}

pub async fn delete_post(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    // Unconditional hard delete; join rows cascade.
    let deleted = sqlx::query_scalar::<_, Uuid>(
        r#"DELETE FROM blog_posts WHERE id = $1 RETURNING id"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match deleted {
        Some(_) => Ok(()),
        None => Err(ApiError::not_found("Post")),
    }
}

/// Clones a post as a fresh draft. The slug is disambiguated by linear
/// probing: `foo-copy`, `foo-copy-2`, `foo-copy-3`, ... until free.
pub async fn duplicate_post(pool: &PgPool, id: Uuid) -> Result<PostDetail, ApiError> {
    let source = sqlx::query_as::<_, BlogPost>(r#"SELECT * FROM blog_posts WHERE id = $1"#)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;

    let base = format!("{}-copy", source.slug);
    let mut candidate = base.clone();
    let mut counter = 1;

    loop {
        let taken: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM blog_posts WHERE slug = $1)"#,
        )
        .bind(&candidate)
        .fetch_one(pool)
        .await?;

        if !taken {
            break;
        }

        counter += 1;
        candidate = format!("{}-{}", base, counter);
    }

    let mut tx = pool.begin().await?;

    // The clone never inherits publication state: status is forced to
    // draft and published_at/scheduled_for start empty.
    let copy = sqlx::query_as::<_, BlogPost>(
        r#"
        INSERT INTO blog_posts
            (title, slug, excerpt, content, featured_image, featured_image_alt,
             author, status, meta_title, meta_description)
        SELECT
            title || ' (Copy)', $1, excerpt, content, featured_image, featured_image_alt,
            author, 'draft', meta_title, meta_description
        FROM blog_posts
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(&candidate)
    .bind(source.id)
    .fetch_one(&mut *tx)
    .await
    .map_err(slug_conflict)?;

    sqlx::query(
        r#"
        INSERT INTO post_categories (post_id, category_id)
        SELECT $1, category_id FROM post_categories WHERE post_id = $2
        "#,
    )
    .bind(copy.id)
    .bind(source.id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO post_tags (post_id, tag_id)
        SELECT $1, tag_id FROM post_tags WHERE post_id = $2
        "#,
    )
    .bind(copy.id)
    .bind(source.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    with_taxonomy(pool, copy).await
}

pub async fn list_admin(
    pool: &PgPool,
    page: i64,
    limit: i64,
    status: Option<PostStatus>,
    search: Option<&str>,
) -> Result<(Vec<PostListItem>, i64), ApiError> {
    let mut count_qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM blog_posts WHERE TRUE");
    push_admin_filters(&mut count_qb, status, search);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM blog_posts WHERE TRUE", SUMMARY_COLUMNS));
    push_admin_filters(&mut qb, status, search);
    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind((page - 1) * limit);

    let rows = qb.build_query_as::<PostSummary>().fetch_all(pool).await?;
    let items = attach_summaries(pool, rows).await?;

    Ok((items, total))
}

pub async fn list_public(
    pool: &PgPool,
    page: i64,
    limit: i64,
    category_id: Option<Uuid>,
    search: Option<&str>,
) -> Result<(Vec<PostListItem>, i64), ApiError> {
    let mut count_qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM blog_posts WHERE {}", VISIBLE));
    push_public_filters(&mut count_qb, category_id, search, false);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {} FROM blog_posts WHERE {}",
        SUMMARY_COLUMNS, VISIBLE
    ));
    push_public_filters(&mut qb, category_id, search, false);
    qb.push(" ORDER BY published_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind((page - 1) * limit);

    let rows = qb.build_query_as::<PostSummary>().fetch_all(pool).await?;
    let items = attach_summaries(pool, rows).await?;

    Ok((items, total))
}

/// Dedicated search: unlike the listing filter, the match also runs over
/// the post body.
pub async fn search_public(
    pool: &PgPool,
    query: &str,
    page: i64,
    limit: i64,
) -> Result<(Vec<PostListItem>, i64), ApiError> {
    let mut count_qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM blog_posts WHERE {}", VISIBLE));
    push_public_filters(&mut count_qb, None, Some(query), true);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {} FROM blog_posts WHERE {}",
        SUMMARY_COLUMNS, VISIBLE
    ));
    push_public_filters(&mut qb, None, Some(query), true);
    qb.push(" ORDER BY published_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind((page - 1) * limit);

    let rows = qb.build_query_as::<PostSummary>().fetch_all(pool).await?;
    let items = attach_summaries(pool, rows).await?;

    Ok((items, total))
}

/// A published post with a future timestamp answers exactly like a missing
/// one.
pub async fn get_public_by_slug(pool: &PgPool, slug: &str) -> Result<Option<PostDetail>, ApiError> {
    let post = sqlx::query_as::<_, BlogPost>(&format!(
        "SELECT * FROM blog_posts WHERE slug = $1 AND {}",
        VISIBLE
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    match post {
        Some(post) => Ok(Some(with_taxonomy(pool, post).await?)),
        None => Ok(None),
    }
}

/// Visible posts sharing at least one category with the current post,
/// backfilled with the most recent other visible posts up to `limit`.
/// Recency order is preserved within each tier.
pub async fn get_related(
    pool: &PgPool,
    current_slug: &str,
    category_ids: &[Uuid],
    limit: i64,
) -> Result<Vec<PostListItem>, ApiError> {
    let mut rows: Vec<PostSummary> = Vec::new();

    if !category_ids.is_empty() {
        rows = sqlx::query_as::<_, PostSummary>(&format!(
            r#"
            SELECT {}
            FROM blog_posts
            WHERE {}
              AND slug <> $1
              AND EXISTS (
                  SELECT 1 FROM post_categories pc
                  WHERE pc.post_id = blog_posts.id AND pc.category_id = ANY($2)
              )
            ORDER BY published_at DESC
            LIMIT $3
            "#,
            SUMMARY_COLUMNS, VISIBLE
        ))
        .bind(current_slug)
        .bind(category_ids)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    }

    if (rows.len() as i64) < limit {
        let picked: Vec<Uuid> = rows.iter().map(|p| p.id).collect();
        let backfill = sqlx::query_as::<_, PostSummary>(&format!(
            r#"
            SELECT {}
            FROM blog_posts
            WHERE {}
              AND slug <> $1
              AND id <> ALL($2)
            ORDER BY published_at DESC
            LIMIT $3
            "#,
            SUMMARY_COLUMNS, VISIBLE
        ))
        .bind(current_slug)
        .bind(&picked)
        .bind(limit - rows.len() as i64)
        .fetch_all(pool)
        .await?;

        rows.extend(backfill);
    }

    attach_summaries(pool, rows).await
}

fn push_admin_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    status: Option<PostStatus>,
    search: Option<&str>,
) {
    if let Some(status) = status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }

    if let Some(q) = search.map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", q);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR excerpt ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn push_public_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    category_id: Option<Uuid>,
    search: Option<&str>,
    include_content: bool,
) {
    if let Some(category_id) = category_id {
        qb.push(
            " AND EXISTS (SELECT 1 FROM post_categories pc \
             WHERE pc.post_id = blog_posts.id AND pc.category_id = ",
        )
        .push_bind(category_id)
        .push(")");
    }

    if let Some(q) = search.map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", q);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR excerpt ILIKE ")
            .push_bind(pattern.clone());
        if include_content {
            qb.push(" OR content ILIKE ").push_bind(pattern);
        }
        qb.push(")");
    }
}

async fn link_taxonomy(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    categories: &[Uuid],
    tags: &[Uuid],
) -> Result<(), ApiError> {
    link_categories(tx, post_id, categories).await?;
    link_tags(tx, post_id, tags).await
}

async fn link_categories(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    categories: &[Uuid],
) -> Result<(), ApiError> {
    if categories.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO post_categories (post_id, category_id)
        SELECT $1, unnest($2::uuid[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(categories)
    .execute(&mut **tx)
    .await
    .map_err(reference_error)?;

    Ok(())
}

async fn link_tags(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    tags: &[Uuid],
) -> Result<(), ApiError> {
    if tags.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO post_tags (post_id, tag_id)
        SELECT $1, unnest($2::uuid[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(tags)
    .execute(&mut **tx)
    .await
    .map_err(reference_error)?;

    Ok(())
}

fn slug_conflict(e: sqlx::Error) -> ApiError {
    if is_unique_violation(&e) {
        ApiError::Conflict("A post with this slug already exists".to_string())
    } else {
        e.into()
    }
}

fn reference_error(e: sqlx::Error) -> ApiError {
    if is_foreign_key_violation(&e) {
        ApiError::Validation("Unknown category or tag reference".to_string())
    } else {
        e.into()
    }
}

#[derive(sqlx::FromRow)]
struct CategoryLink {
    post_id: Uuid,
    id: Uuid,
    name: String,
    slug: String,
    description: Option<String>,
    color: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct TagLink {
    post_id: Uuid,
    id: Uuid,
    name: String,
    slug: String,
    created_at: DateTime<Utc>,
}

async fn taxonomy_for(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<(HashMap<Uuid, Vec<Category>>, HashMap<Uuid, Vec<Tag>>), ApiError> {
    if post_ids.is_empty() {
        return Ok((HashMap::new(), HashMap::new()));
    }

    let category_links = sqlx::query_as::<_, CategoryLink>(
        r#"
        SELECT pc.post_id, c.id, c.name, c.slug, c.description, c.color, c.created_at
        FROM post_categories pc
        JOIN categories c ON c.id = pc.category_id
        WHERE pc.post_id = ANY($1)
        ORDER BY c.name
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    let tag_links = sqlx::query_as::<_, TagLink>(
        r#"
        SELECT pt.post_id, t.id, t.name, t.slug, t.created_at
        FROM post_tags pt
        JOIN tags t ON t.id = pt.tag_id
        WHERE pt.post_id = ANY($1)
        ORDER BY t.name
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    let mut categories: HashMap<Uuid, Vec<Category>> = HashMap::new();
    for link in category_links {
        categories.entry(link.post_id).or_default().push(Category {
            id: link.id,
            name: link.name,
            slug: link.slug,
            description: link.description,
            color: link.color,
            created_at: link.created_at,
        });
    }

    let mut tags: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for link in tag_links {
        tags.entry(link.post_id).or_default().push(Tag {
            id: link.id,
            name: link.name,
            slug: link.slug,
            created_at: link.created_at,
        });
    }

    Ok((categories, tags))
}

async fn with_taxonomy(pool: &PgPool, post: BlogPost) -> Result<PostDetail, ApiError> {
    let (mut categories, mut tags) = taxonomy_for(pool, &[post.id]).await?;

    Ok(PostDetail {
        categories: categories.remove(&post.id).unwrap_or_default(),
        tags: tags.remove(&post.id).unwrap_or_default(),
        post,
    })
}

async fn attach_summaries(
    pool: &PgPool,
    rows: Vec<PostSummary>,
) -> Result<Vec<PostListItem>, ApiError> {
    let ids: Vec<Uuid> = rows.iter().map(|p| p.id).collect();
    let (mut categories, mut tags) = taxonomy_for(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|post| PostListItem {
            categories: categories.remove(&post.id).unwrap_or_default(),
            tags: tags.remove(&post.id).unwrap_or_default(),
            post,
        })
        .collect())
}
