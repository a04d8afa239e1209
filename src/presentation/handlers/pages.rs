use actix_web::{HttpResponse, get, web};
use tracing::info;

use crate::application::page_service::PgPageService;
use crate::domain::error::DomainError;
use crate::domain::post::PostWithTags;
use crate::presentation::serializers::{
    SerializedPost, SerializedPostDetail, serialize_comment, serialize_post, serialize_tag,
};
use crate::presentation::templates::{ContactsPage, IndexPage, PostDetailPage, TagPage, render};

/// Cards per block on the home page and in every sidebar.
const HOME_BLOCK_SIZE: i64 = 5;
/// Posts shown on one tag page.
const TAG_PAGE_SIZE: i64 = 20;

fn serialize_cards(posts: &[PostWithTags]) -> Vec<SerializedPost> {
    posts
        .iter()
        .map(|p| serialize_post(&p.post, &p.tags))
        .collect()
}

#[get("/")]
pub async fn index(pages: web::Data<PgPageService>) -> Result<HttpResponse, DomainError> {
    let popular = pages.popular_posts(HOME_BLOCK_SIZE).await?;
    let fresh = pages.fresh_posts(HOME_BLOCK_SIZE).await?;
    let tags = pages.popular_tags(HOME_BLOCK_SIZE).await?;

    info!(
        popular = popular.len(),
        fresh = fresh.len(),
        "rendering home page"
    );

    render(IndexPage {
        most_popular_posts: serialize_cards(&popular),
        page_posts: serialize_cards(&fresh),
        popular_tags: tags.iter().map(serialize_tag).collect(),
    })
}

#[get("/posts/{slug}/")]
pub async fn post_detail(
    pages: web::Data<PgPageService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let slug = path.into_inner();
    let post = pages.post_by_slug(&slug).await?;
    let comments = pages.comments_for_post(post.id).await?;
    let related_tags = pages.tags_for_post(post.id).await?;

    let sidebar_posts = pages.popular_posts(HOME_BLOCK_SIZE).await?;
    let sidebar_tags = pages.popular_tags(HOME_BLOCK_SIZE).await?;

    info!(
        slug = %post.slug,
        comments = comments.len(),
        "rendering post page"
    );

    render(PostDetailPage {
        post: SerializedPostDetail {
            title: post.title,
            text: post.text,
            author: post.author,
            comments: comments.iter().map(serialize_comment).collect(),
            likes_amount: post.likes_count,
            image_url: post.image_url,
            published_at: post.published_at,
            slug: post.slug,
            tags: related_tags.iter().map(serialize_tag).collect(),
        },
        popular_tags: sidebar_tags.iter().map(serialize_tag).collect(),
        most_popular_posts: serialize_cards(&sidebar_posts),
    })
}

#[get("/tags/{tag_title}/")]
pub async fn tag_filter(
    pages: web::Data<PgPageService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let tag_title = path.into_inner();
    let tag = pages.tag_by_title(&tag_title).await?;
    let related_posts = pages.posts_for_tag(&tag.title, TAG_PAGE_SIZE).await?;

    let sidebar_posts = pages.popular_posts(HOME_BLOCK_SIZE).await?;
    let sidebar_tags = pages.popular_tags(HOME_BLOCK_SIZE).await?;

    info!(
        tag = %tag.title,
        posts = related_posts.len(),
        "rendering tag page"
    );

    render(TagPage {
        tag: tag.title,
        popular_tags: sidebar_tags.iter().map(serialize_tag).collect(),
        posts: serialize_cards(&related_posts),
        most_popular_posts: serialize_cards(&sidebar_posts),
    })
}

#[get("/contacts/")]
pub async fn contacts() -> Result<HttpResponse, DomainError> {
    render(ContactsPage)
}
