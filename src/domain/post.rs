use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::tag::Tag;

/// A post row as the pages consume it: the author's username is joined in
/// and the comment/like counts are aggregated at query time, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub author: String,
    pub comments_count: i64,
    pub likes_count: i64,
}

/// A post together with its prefetched, popularity-ordered tags.
#[derive(Debug, Clone)]
pub struct PostWithTags {
    pub post: Post,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
    /// Most liked first; ties broken by newest publication, then id.
    Popular,
    /// Most recently published first.
    Newest,
}

/// Inert description of one post fetch: ordering, filters, limit.
/// `PostRepository::fetch` turns a query into a single SQL statement; there
/// is no builder state beyond these fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PostQuery {
    pub order: PostOrder,
    pub limit: Option<i64>,
    pub slug: Option<String>,
    pub tag_title: Option<String>,
}

impl PostQuery {
    pub fn popular(limit: i64) -> Self {
        Self {
            order: PostOrder::Popular,
            limit: Some(limit),
            slug: None,
            tag_title: None,
        }
    }

    pub fn newest(limit: i64) -> Self {
        Self {
            order: PostOrder::Newest,
            limit: Some(limit),
            slug: None,
            tag_title: None,
        }
    }

    pub fn by_slug(slug: &str) -> Self {
        Self {
            order: PostOrder::Newest,
            limit: Some(1),
            slug: Some(slug.to_owned()),
            tag_title: None,
        }
    }

    pub fn tagged(tag_title: &str, limit: i64) -> Self {
        Self {
            order: PostOrder::Newest,
            limit: Some(limit),
            slug: None,
            tag_title: Some(tag_title.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_slug_fetches_a_single_row() {
        let query = PostQuery::by_slug("first-post");
        assert_eq!(query.slug.as_deref(), Some("first-post"));
        assert_eq!(query.limit, Some(1));
        assert_eq!(query.tag_title, None);
    }

    #[test]
    fn tagged_carries_filter_and_limit() {
        let query = PostQuery::tagged("rust", 20);
        assert_eq!(query.tag_title.as_deref(), Some("rust"));
        assert_eq!(query.limit, Some(20));
        assert_eq!(query.order, PostOrder::Newest);
    }
}
