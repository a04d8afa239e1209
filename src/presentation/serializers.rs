use chrono::{DateTime, Utc};

use crate::domain::comment::Comment;
use crate::domain::post::Post;
use crate::domain::tag::Tag;

/// Teaser length of a post card, in characters.
const TEASER_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct SerializedPost {
    pub title: String,
    pub teaser_text: String,
    pub author: String,
    pub comments_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<SerializedTag>,
    pub first_tag_title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SerializedTag {
    pub title: String,
    pub posts_with_tag: i64,
}

#[derive(Debug, Clone)]
pub struct SerializedComment {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}

/// Detail-page variant of a post: full text and comments instead of a
/// teaser, plus the like count.
#[derive(Debug, Clone)]
pub struct SerializedPostDetail {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<SerializedComment>,
    pub likes_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<SerializedTag>,
}

/// Flattens a post row and its prefetched tags into the card mapping the
/// templates consume. `tags` must already be popularity-ordered; an empty
/// list leaves `first_tag_title` absent.
pub fn serialize_post(post: &Post, tags: &[Tag]) -> SerializedPost {
    SerializedPost {
        title: post.title.clone(),
        teaser_text: post.text.chars().take(TEASER_CHARS).collect(),
        author: post.author.clone(),
        comments_amount: post.comments_count,
        image_url: post.image_url.clone(),
        published_at: post.published_at,
        slug: post.slug.clone(),
        tags: tags.iter().map(serialize_tag).collect(),
        first_tag_title: tags.first().map(|tag| tag.title.clone()),
    }
}

pub fn serialize_tag(tag: &Tag) -> SerializedTag {
    SerializedTag {
        title: tag.title.clone(),
        posts_with_tag: tag.posts_count,
    }
}

pub fn serialize_comment(comment: &Comment) -> SerializedComment {
    SerializedComment {
        text: comment.text.clone(),
        published_at: comment.published_at,
        author: comment.author.clone(),
    }
}
