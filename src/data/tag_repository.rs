use std::collections::HashMap;

use crate::domain::error::DomainError;
use crate::domain::tag::Tag;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Tags ordered by how many posts carry them, most used first.
    async fn popular(&self, limit: i64) -> Result<Vec<Tag>, DomainError>;

    /// Exact-title lookup; absence is an `Ok(None)`, not an error.
    async fn find_by_title(&self, title: &str) -> Result<Option<Tag>, DomainError>;

    /// Prefetch side table: the tags of every given post in one query,
    /// popularity-ordered within each post, optionally capped per post.
    async fn for_posts(
        &self,
        post_ids: &[Uuid],
        per_post: Option<i64>,
    ) -> Result<HashMap<Uuid, Vec<Tag>>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresTagRepository {
    pool: PgPool,
}

impl PostgresTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TAG_COLUMNS: &str = "t.id, t.title, \
    (SELECT COUNT(*) FROM post_tags pt WHERE pt.tag_id = t.id) AS posts_count";

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn popular(&self, limit: i64) -> Result<Vec<Tag>, DomainError> {
        let sql = format!(
            "SELECT {TAG_COLUMNS} FROM tags t \
             ORDER BY posts_count DESC, t.title ASC LIMIT $1"
        );
        sqlx::query_as::<_, Tag>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to fetch popular tags: {}", e);
                DomainError::Internal(format!("database error: {}", e))
            })
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Tag>, DomainError> {
        let sql = format!("SELECT {TAG_COLUMNS} FROM tags t WHERE t.title = $1");
        sqlx::query_as::<_, Tag>(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to look up tag {}: {}", title, e);
                DomainError::Internal(format!("database error: {}", e))
            })
    }

    async fn for_posts(
        &self,
        post_ids: &[Uuid],
        per_post: Option<i64>,
    ) -> Result<HashMap<Uuid, Vec<Tag>>, DomainError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, PostTagRow>(
            "WITH tag_counts AS ( \
                 SELECT tag_id, COUNT(*) AS posts_count \
                 FROM post_tags GROUP BY tag_id \
             ) \
             SELECT ranked.post_id, ranked.id, ranked.title, ranked.posts_count \
             FROM ( \
                 SELECT pt.post_id, t.id, t.title, tc.posts_count, \
                        ROW_NUMBER() OVER ( \
                            PARTITION BY pt.post_id \
                            ORDER BY tc.posts_count DESC, t.title ASC \
                        ) AS tag_rank \
                 FROM post_tags pt \
                 JOIN tags t ON t.id = pt.tag_id \
                 JOIN tag_counts tc ON tc.tag_id = pt.tag_id \
                 WHERE pt.post_id = ANY($1) \
             ) ranked \
             WHERE $2::bigint IS NULL OR ranked.tag_rank <= $2 \
             ORDER BY ranked.post_id, ranked.tag_rank",
        )
        .bind(post_ids)
        .bind(per_post)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to prefetch tags: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        Ok(group_by_post(rows))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PostTagRow {
    post_id: Uuid,
    id: Uuid,
    title: String,
    posts_count: i64,
}

/// Rows arrive sorted by (post, rank); pushing preserves the per-post order.
fn group_by_post(rows: Vec<PostTagRow>) -> HashMap<Uuid, Vec<Tag>> {
    let mut tags_by_post: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for row in rows {
        tags_by_post.entry(row.post_id).or_default().push(Tag {
            id: row.id,
            title: row.title,
            posts_count: row.posts_count,
        });
    }
    tags_by_post
}
