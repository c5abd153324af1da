pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::catalog::Catalog;

pub struct AppState {
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { catalog: Catalog::new(db) }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/api/movies", get(routes::search_movies).post(routes::create_movie))
        .route("/api/movies/{id}", axum::routing::put(routes::update_movie).delete(routes::delete_movie))
        .route("/api/filmography_search", get(routes::filmography_search))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
