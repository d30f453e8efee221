//! HTTP middleware for the app.

pub mod cors;

pub use cors::widget_cors_middleware;
