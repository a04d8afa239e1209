use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostOrder, PostQuery};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Executes one `PostQuery` as a single SQL statement. Every returned
    /// row carries the author username and both aggregated counts.
    async fn fetch(&self, query: &PostQuery) -> Result<Vec<Post>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn fetch(&self, query: &PostQuery) -> Result<Vec<Post>, DomainError> {
        let sql = post_query_sql(query);
        let mut rows = sqlx::query_as::<_, Post>(&sql);
        if let Some(slug) = &query.slug {
            rows = rows.bind(slug);
        }
        if let Some(tag_title) = &query.tag_title {
            rows = rows.bind(tag_title);
        }
        if let Some(limit) = query.limit {
            rows = rows.bind(limit);
        }

        rows.fetch_all(&self.pool).await.map_err(|e| {
            error!("failed to fetch posts: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }
}

/// Renders a `PostQuery` to SQL. Placeholders are numbered in bind order:
/// slug filter, tag filter, limit.
fn post_query_sql(query: &PostQuery) -> String {
    let mut sql = String::from(
        "SELECT p.id, p.title, p.text, p.slug, p.image_url, p.published_at, \
         u.username AS author, \
         (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count, \
         (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes_count \
         FROM posts p \
         JOIN users u ON u.id = p.author_id",
    );

    let mut bind = 0;
    let mut filters = Vec::new();
    if query.slug.is_some() {
        bind += 1;
        filters.push(format!("p.slug = ${bind}"));
    }
    if query.tag_title.is_some() {
        bind += 1;
        filters.push(format!(
            "EXISTS (SELECT 1 FROM post_tags pt \
             JOIN tags t ON t.id = pt.tag_id \
             WHERE pt.post_id = p.id AND t.title = ${bind})"
        ));
    }
    if !filters.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&filters.join(" AND "));
    }

    sql.push_str(match query.order {
        PostOrder::Popular => " ORDER BY likes_count DESC, p.published_at DESC, p.id",
        PostOrder::Newest => " ORDER BY p.published_at DESC, p.id",
    });

    if query.limit.is_some() {
        bind += 1;
        sql.push_str(&format!(" LIMIT ${bind}"));
    }

    sql
}
