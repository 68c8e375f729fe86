//! Route table for the HTML pages and the JSON API

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{api, web, AppState};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration, API only
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let pages = Router::new()
        .route("/", get(web::home))
        .route("/books", get(web::home))
        .route("/books/page/:page", get(web::list_page))
        .route("/books/search", get(web::search))
        .route("/books/new", get(web::new_book_form).post(web::create_book))
        .route("/books/:id", get(web::edit_book_form).post(web::update_book))
        .route("/books/:id/delete", post(web::delete_book))
        .with_state(state.clone());

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Books
        .route("/books", post(api::books::create_book))
        .route("/books/page/:page", get(api::books::list_books))
        .route("/books/search", get(api::books::search_books))
        .route(
            "/books/:id",
            get(api::books::get_book)
                .put(api::books::update_book)
                .delete(api::books::delete_book),
        )
        .layer(cors)
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .merge(pages)
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
}
