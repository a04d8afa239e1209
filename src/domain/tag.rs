use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tag with its aggregated post count. `posts_count` reflects the number
/// of posts associated with the tag at query time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub title: String,
    pub posts_count: i64,
}
