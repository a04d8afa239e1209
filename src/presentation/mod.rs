pub mod handlers;
pub mod middleware;
pub mod serializers;
pub mod templates;
