//! Middleware: bearer-token extractor for authenticated routes.

pub mod auth;

pub use auth::AuthUser;
