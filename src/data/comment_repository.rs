use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// All comments of one post, authors joined, oldest first.
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(
            "SELECT c.id, c.text, c.published_at, u.username AS author \
             FROM comments c \
             JOIN users u ON u.id = c.author_id \
             WHERE c.post_id = $1 \
             ORDER BY c.published_at ASC, c.id",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to fetch comments for post {}: {}", post_id, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }
}
