use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("post not found: {0}")]
    PostNotFound(String),
    #[error("tag not found: {0}")]
    TagNotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::PostNotFound(_) | DomainError::TagNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Request-derived values never reach the body; details go to the logs.
        let reason = match self {
            DomainError::PostNotFound(_) | DomainError::TagNotFound(_) => "Page not found.",
            DomainError::Internal(_) => "Something went wrong on our side.",
        };
        let body = format!(
            "<!DOCTYPE html>\n<html><head><title>{status}</title></head>\
             <body><h1>{status}</h1><p>{reason}</p></body></html>",
            status = self.status_code(),
            reason = reason,
        );
        HttpResponse::build(self.status_code())
            .content_type("text/html; charset=utf-8")
            .body(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_post_maps_to_404() {
        let err = DomainError::PostNotFound("no-such-slug".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn missing_tag_maps_to_404() {
        let err = DomainError::TagNotFound("no-such-tag".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_failures_map_to_500() {
        let err = DomainError::Internal("connection reset".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_body_does_not_echo_the_request() {
        let err = DomainError::PostNotFound("<script>".into());
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
