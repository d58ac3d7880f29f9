//! User accounts and story feed backend.
//!
//! Registration and login with bcrypt (or argon2) password hashes and
//! stateless HS256 session tokens, public profiles, username search, and a
//! story feed, over PostgreSQL or an in-memory store.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;

use axum::routing::{get, post};
use handlers::http;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router (health, auth, users, feeds). Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let auth_routes = axum::Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let user_routes = axum::Router::new()
        .route("/search/:username", get(handlers::search_users))
        .route(
            "/:id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        );

    let feed_routes = axum::Router::new()
        .route("/", get(handlers::list_feeds).post(handlers::create_feed))
        .route("/:id", get(handlers::get_feed));

    axum::Router::new()
        .route("/health", get(http::health))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/feeds", feed_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
