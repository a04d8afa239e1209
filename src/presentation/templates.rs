use actix_web::HttpResponse;
use askama::Template;
use tracing::error;

use crate::domain::error::DomainError;
use crate::presentation::serializers::{SerializedPost, SerializedPostDetail, SerializedTag};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub most_popular_posts: Vec<SerializedPost>,
    pub page_posts: Vec<SerializedPost>,
    pub popular_tags: Vec<SerializedTag>,
}

#[derive(Template)]
#[template(path = "post-details.html")]
pub struct PostDetailPage {
    pub post: SerializedPostDetail,
    pub popular_tags: Vec<SerializedTag>,
    pub most_popular_posts: Vec<SerializedPost>,
}

#[derive(Template)]
#[template(path = "posts-list.html")]
pub struct TagPage {
    pub tag: String,
    pub popular_tags: Vec<SerializedTag>,
    pub posts: Vec<SerializedPost>,
    pub most_popular_posts: Vec<SerializedPost>,
}

#[derive(Template)]
#[template(path = "contacts.html")]
pub struct ContactsPage;

/// The one place pages turn into responses. Render failures surface as 500s.
pub fn render<T: Template>(page: T) -> Result<HttpResponse, DomainError> {
    let body = page.render().map_err(|e| {
        error!("template rendering failed: {}", e);
        DomainError::Internal(format!("template rendering failed: {}", e))
    })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}
