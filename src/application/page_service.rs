use std::sync::Arc;

use crate::data::comment_repository::{CommentRepository, PostgresCommentRepository};
use crate::data::post_repository::{PostRepository, PostgresPostRepository};
use crate::data::tag_repository::{PostgresTagRepository, TagRepository};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostQuery, PostWithTags};
use crate::domain::tag::Tag;
use uuid::Uuid;

/// How many tags a post card carries, most popular first.
pub const CARD_TAG_LIMIT: i64 = 5;

#[derive(Clone)]
pub struct PageService<P, T, C>
where
    P: PostRepository + 'static,
    T: TagRepository + 'static,
    C: CommentRepository + 'static,
{
    posts: Arc<P>,
    tags: Arc<T>,
    comments: Arc<C>,
}

pub type PgPageService =
    PageService<PostgresPostRepository, PostgresTagRepository, PostgresCommentRepository>;

impl<P, T, C> PageService<P, T, C>
where
    P: PostRepository + 'static,
    T: TagRepository + 'static,
    C: CommentRepository + 'static,
{
    pub fn new(posts: Arc<P>, tags: Arc<T>, comments: Arc<C>) -> Self {
        Self {
            posts,
            tags,
            comments,
        }
    }

    /// Top `limit` posts by like count, tags prefetched.
    pub async fn popular_posts(&self, limit: i64) -> Result<Vec<PostWithTags>, DomainError> {
        let posts = self.posts.fetch(&PostQuery::popular(limit)).await?;
        self.attach_tags(posts).await
    }

    /// The `limit` most recently published posts, presented oldest-first.
    pub async fn fresh_posts(&self, limit: i64) -> Result<Vec<PostWithTags>, DomainError> {
        let mut posts = self.posts.fetch(&PostQuery::newest(limit)).await?;
        posts.reverse();
        self.attach_tags(posts).await
    }

    /// Up to `limit` posts carrying the tag, newest first, tags prefetched.
    pub async fn posts_for_tag(
        &self,
        tag_title: &str,
        limit: i64,
    ) -> Result<Vec<PostWithTags>, DomainError> {
        let posts = self.posts.fetch(&PostQuery::tagged(tag_title, limit)).await?;
        self.attach_tags(posts).await
    }

    pub async fn post_by_slug(&self, slug: &str) -> Result<Post, DomainError> {
        self.posts
            .fetch(&PostQuery::by_slug(slug))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::PostNotFound(slug.to_owned()))
    }

    pub async fn tag_by_title(&self, title: &str) -> Result<Tag, DomainError> {
        self.tags
            .find_by_title(title)
            .await?
            .ok_or_else(|| DomainError::TagNotFound(title.to_owned()))
    }

    pub async fn popular_tags(&self, limit: i64) -> Result<Vec<Tag>, DomainError> {
        self.tags.popular(limit).await
    }

    /// All tags of one post, popularity-ordered, uncapped.
    pub async fn tags_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, DomainError> {
        let mut side = self.tags.for_posts(&[post_id], None).await?;
        Ok(side.remove(&post_id).unwrap_or_default())
    }

    pub async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        self.comments.for_post(post_id).await
    }

    /// The two-query prefetch: one side-table fetch for the whole batch,
    /// then a zip that leaves untagged posts with an empty list.
    async fn attach_tags(&self, posts: Vec<Post>) -> Result<Vec<PostWithTags>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let mut side = self.tags.for_posts(&ids, Some(CARD_TAG_LIMIT)).await?;
        Ok(posts
            .into_iter()
            .map(|post| {
                let tags = side.remove(&post.id).unwrap_or_default();
                PostWithTags { post, tags }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::PostOrder;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        Posts {}

        #[async_trait]
        impl PostRepository for Posts {
            async fn fetch(&self, query: &PostQuery) -> Result<Vec<Post>, DomainError>;
        }
    }

    mock! {
        Tags {}

        #[async_trait]
        impl TagRepository for Tags {
            async fn popular(&self, limit: i64) -> Result<Vec<Tag>, DomainError>;
            async fn find_by_title(&self, title: &str) -> Result<Option<Tag>, DomainError>;
            async fn for_posts(
                &self,
                post_ids: &[Uuid],
                per_post: Option<i64>,
            ) -> Result<HashMap<Uuid, Vec<Tag>>, DomainError>;
        }
    }

    mock! {
        Comments {}

        #[async_trait]
        impl CommentRepository for Comments {
            async fn for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError>;
        }
    }

    fn sample_post(slug: &str) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: slug.to_uppercase(),
            text: "A story worth reading.".into(),
            slug: slug.to_owned(),
            image_url: None,
            published_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            author: "alice".into(),
            comments_count: 0,
            likes_count: 0,
        }
    }

    fn sample_tag(title: &str, posts_count: i64) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            posts_count,
        }
    }

    #[tokio::test]
    async fn fresh_posts_come_back_in_ascending_publication_order() {
        let mut posts = MockPosts::new();
        posts
            .expect_fetch()
            .withf(|query| query.order == PostOrder::Newest && query.limit == Some(5))
            .returning(|_| {
                let mut newer = sample_post("newer");
                newer.published_at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
                let mut older = sample_post("older");
                older.published_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
                Ok(vec![newer, older])
            });
        let mut tags = MockTags::new();
        tags.expect_for_posts().returning(|_, _| Ok(HashMap::new()));
        let service =
            PageService::new(Arc::new(posts), Arc::new(tags), Arc::new(MockComments::new()));

        let fresh = service.fresh_posts(5).await.unwrap();

        let slugs: Vec<&str> = fresh.iter().map(|p| p.post.slug.as_str()).collect();
        assert_eq!(slugs, ["older", "newer"]);
    }

    #[tokio::test]
    async fn popular_posts_zip_the_prefetched_tags() {
        let tagged = sample_post("tagged");
        let bare = sample_post("bare");
        let tagged_id = tagged.id;
        let fetched = vec![tagged, bare];
        let mut posts = MockPosts::new();
        posts
            .expect_fetch()
            .withf(|query| query.order == PostOrder::Popular && query.limit == Some(5))
            .return_once(move |_| Ok(fetched));
        let mut tags = MockTags::new();
        tags.expect_for_posts()
            .withf(|ids, per_post| ids.len() == 2 && *per_post == Some(CARD_TAG_LIMIT))
            .return_once(move |_, _| {
                let mut side = HashMap::new();
                side.insert(tagged_id, vec![sample_tag("rust", 3)]);
                Ok(side)
            });
        let service =
            PageService::new(Arc::new(posts), Arc::new(tags), Arc::new(MockComments::new()));

        let cards = service.popular_posts(5).await.unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].tags[0].title, "rust");
        assert!(cards[1].tags.is_empty());
    }

    #[tokio::test]
    async fn no_posts_means_no_prefetch_roundtrip() {
        let mut posts = MockPosts::new();
        posts.expect_fetch().returning(|_| Ok(Vec::new()));
        let mut tags = MockTags::new();
        tags.expect_for_posts().never();
        let service =
            PageService::new(Arc::new(posts), Arc::new(tags), Arc::new(MockComments::new()));

        let cards = service.popular_posts(5).await.unwrap();

        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn unknown_slug_becomes_post_not_found() {
        let mut posts = MockPosts::new();
        posts.expect_fetch().returning(|_| Ok(Vec::new()));
        let service = PageService::new(
            Arc::new(posts),
            Arc::new(MockTags::new()),
            Arc::new(MockComments::new()),
        );

        let err = service.post_by_slug("missing").await.unwrap_err();

        assert!(matches!(err, DomainError::PostNotFound(slug) if slug == "missing"));
    }

    #[tokio::test]
    async fn unknown_tag_title_becomes_tag_not_found() {
        let mut tags = MockTags::new();
        tags.expect_find_by_title().returning(|_| Ok(None));
        let service = PageService::new(
            Arc::new(MockPosts::new()),
            Arc::new(tags),
            Arc::new(MockComments::new()),
        );

        let err = service.tag_by_title("missing").await.unwrap_err();

        assert!(matches!(err, DomainError::TagNotFound(title) if title == "missing"));
    }

    #[tokio::test]
    async fn tag_page_passes_its_limit_through() {
        let mut posts = MockPosts::new();
        posts
            .expect_fetch()
            .withf(|query| query.tag_title.as_deref() == Some("rust") && query.limit == Some(20))
            .returning(|_| Ok(Vec::new()));
        let service = PageService::new(
            Arc::new(posts),
            Arc::new(MockTags::new()),
            Arc::new(MockComments::new()),
        );

        let cards = service.posts_for_tag("rust", 20).await.unwrap();

        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn detail_tags_are_not_capped() {
        let post_id = Uuid::new_v4();
        let mut tags = MockTags::new();
        tags.expect_for_posts()
            .withf(move |ids, per_post| ids.len() == 1 && ids[0] == post_id && per_post.is_none())
            .return_once(move |_, _| {
                let many: Vec<Tag> = (0..6).map(|i| sample_tag(&format!("tag-{i}"), i)).collect();
                let mut side = HashMap::new();
                side.insert(post_id, many);
                Ok(side)
            });
        let service = PageService::new(
            Arc::new(MockPosts::new()),
            Arc::new(tags),
            Arc::new(MockComments::new()),
        );

        let result = service.tags_for_post(post_id).await.unwrap();

        assert_eq!(result.len(), 6);
    }
}
