//! Router tests against the in-memory store

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{
    config::SearchConfig,
    models::book::{max_year, Book, NewBook},
    repository::{BookStore, Repository, SearchFilter},
    router::create_router,
    services::Services,
    views::Views,
    AppError, AppResult, AppState,
};

fn app_with(repository: Repository) -> Router {
    let services = Services::new(repository, &SearchConfig::default());
    create_router(AppState::new(services, Views::new().expect("templates compile")))
}

fn app() -> (Router, Repository) {
    let repository = Repository::in_memory();
    (app_with(repository.clone()), repository)
}

async fn seed(repository: &Repository, title: &str, author: &str, genre: &str, year: i32) -> Book {
    repository
        .books
        .create(&NewBook {
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            year,
        })
        .await
        .expect("seed book")
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn json_body(response: Response) -> Value {
    serde_json::from_str(&text(response).await).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_root_and_books_redirect_to_first_page() {
    let (app, _) = app();
    for uri in ["/", "/books"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/books/page/1");
    }
}

#[tokio::test]
async fn test_listing_pages() {
    let (app, repository) = app();
    for i in 1..=13 {
        seed(&repository, &format!("Volume {:02}", i), "Anon", "Misc", 1900 + i).await;
    }

    let response = get(&app, "/books/page/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains("Volume 13"));
    assert!(body.contains("Volume 08"));
    assert!(!body.contains("Volume 07"));
    assert!(body.contains(r#"href="/books/page/3""#));

    let body = text(get(&app, "/books/page/3").await).await;
    assert!(body.contains("Volume 01"));
    assert!(!body.contains("Volume 02"));
}

#[tokio::test]
async fn test_page_without_books_shows_not_found_view() {
    let (app, repository) = app();
    seed(&repository, "Only", "Anon", "Misc", 2000).await;

    for uri in ["/books/page/2", "/books/page/0", "/books/page/-1"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        assert!(text(response).await.contains("Page Not Found"));
    }
}

#[tokio::test]
async fn test_page_past_offset_range_shows_not_found_view() {
    let (app, repository) = app();
    seed(&repository, "Only", "Anon", "Misc", 2000).await;

    let uri = format!("/books/page/{}", i64::MAX);
    let response = get(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("Page Not Found"));
}

#[tokio::test]
async fn test_search_matches_any_field() {
    let (app, repository) = app();
    seed(&repository, "The Hobbit", "J.R.R. Tolkien", "Fantasy", 1937).await;
    seed(&repository, "Tolkien: A Biography", "Humphrey Carpenter", "Biography", 1977).await;
    seed(&repository, "Dune", "Frank Herbert", "Science Fiction", 1965).await;

    let body = text(get(&app, "/books/search?q=tolkien").await).await;
    assert!(body.contains("The Hobbit"));
    assert!(body.contains("Tolkien: A Biography"));
    assert!(!body.contains("Dune"));
    assert!(body.contains("2 results for"));

    let body = text(get(&app, "/books/search?q=196").await).await;
    assert!(body.contains("Dune"));
    assert!(body.contains("1 result for"));

    let body = text(get(&app, "/books/search?q=").await).await;
    assert!(body.contains("3 results for"));

    let body = text(get(&app, "/books/search").await).await;
    assert!(body.contains("3 results for"));
}

#[tokio::test]
async fn test_new_book_form() {
    let (app, _) = app();
    let response = get(&app, "/books/new").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains("New Book"));
    assert!(body.contains(r#"action="/books/new""#));
}

#[tokio::test]
async fn test_create_book_redirects() {
    let (app, repository) = app();
    let response = post_form(
        &app,
        "/books/new",
        "title=Emma&author=Jane+Austen&genre=Classic&year=1815",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/books/page/1");

    let found = repository
        .books
        .search(&SearchFilter::new("Emma", true))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].author, "Jane Austen");
    assert_eq!(found[0].year, 1815);
}

#[tokio::test]
async fn test_invalid_create_rerenders_form() {
    let (app, repository) = app();
    let response = post_form(&app, "/books/new", "title=&author=Jane+Austen&genre=Classic&year=1699").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = text(response).await;
    assert!(body.contains("Title is required"));
    assert!(body.contains("Year has to be between 1700 and the current year"));
    assert!(body.contains(r#"value="Jane Austen""#));
    assert!(body.contains(r#"value="1699""#));
    assert_eq!(repository.books.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_edit_form() {
    let (app, repository) = app();
    let book = seed(&repository, "Emma", "Jane Austen", "Classic", 1815).await;

    let response = get(&app, &format!("/books/{}", book.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains("Edit Book"));
    assert!(body.contains(r#"value="Emma""#));
    assert!(body.contains(&format!(r#"action="/books/{}/delete""#, book.id)));

    let response = get(&app, "/books/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(text(response).await.contains("Book Not Found"));
}

#[tokio::test]
async fn test_update_book() {
    let (app, repository) = app();
    let book = seed(&repository, "Emma", "Jane Austen", "Classic", 1815).await;
    let uri = format!("/books/{}", book.id);

    let response = post_form(&app, &uri, "title=Persuasion&author=Jane+Austen&genre=Classic&year=1817").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let stored = repository.books.get(book.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Persuasion");
    assert_eq!(stored.created_at, book.created_at);

    let response = post_form(&app, &uri, "title=Persuasion&author=Jane+Austen&genre=Classic&year=3000").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains(&format!(r#"action="/books/{}""#, book.id)));
    assert!(body.contains("Year has to be between 1700 and the current year"));
    assert_eq!(repository.books.get(book.id).await.unwrap().unwrap().year, 1817);

    let response = post_form(&app, "/books/999", "title=X&author=Y&genre=Z&year=2000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_book() {
    let (app, repository) = app();
    let book = seed(&repository, "Emma", "Jane Austen", "Classic", 1815).await;

    let response = post_form(&app, "/books/999/delete", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(repository.books.count().await.unwrap(), 1);

    let response = post_form(&app, &format!("/books/{}/delete", book.id), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/books/page/1");
    assert_eq!(repository.books.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unusable_ids_show_error_view() {
    let (app, repository) = app();
    seed(&repository, "Emma", "Jane Austen", "Classic", 1815).await;

    for id in ["abc", "99999999999"] {
        let response = get(&app, &format!("/books/{}", id)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", id);
        assert!(text(response).await.contains("Book Not Found"));

        let response = post_form(
            &app,
            &format!("/books/{}", id),
            "title=X&author=Y&genre=Z&year=2000",
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", id);
        assert!(text(response).await.contains("Book Not Found"));

        let response = post_form(&app, &format!("/books/{}/delete", id), "").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", id);
        assert!(text(response).await.contains("Book Not Found"));
    }
    assert_eq!(repository.books.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_api_book_lifecycle() {
    let (app, _) = app();

    let response = send_json(
        &app,
        "POST",
        "/api/v1/books",
        json!({"title": "Dune", "author": "Frank Herbert", "genre": "Science Fiction", "year": 1965}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_i64().expect("id assigned");
    assert_eq!(created["year"], 1965);

    let page = json_body(get(&app, "/api/v1/books/page/1").await).await;
    assert_eq!(page["books"][0]["title"], "Dune");
    assert_eq!(page["pagination"]["total_pages"], 1);
    assert_eq!(page["pagination"]["page_size"], 6);

    let response = send_json(
        &app,
        "PUT",
        &format!("/api/v1/books/{}", id),
        json!({"title": "Dune", "author": "Frank Herbert", "genre": "SF", "year": "1965"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["genre"], "SF");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/books/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &format!("/api/v1/books/{}", id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/api/v1/books/page/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_validation_errors() {
    let (app, _) = app();
    let future = max_year() + 1;
    let response = send_json(
        &app,
        "POST",
        "/api/v1/books",
        json!({"title": "", "author": "A", "genre": "G", "year": future}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "BadValue");
    assert_eq!(body["fields"][0]["field"], "title");
    assert_eq!(body["fields"][0]["message"], "Title is required");
    assert_eq!(body["fields"][1]["field"], "year");
}

#[tokio::test]
async fn test_api_search_and_health() {
    let (app, repository) = app();
    seed(&repository, "The Hobbit", "J.R.R. Tolkien", "Fantasy", 1937).await;

    let body = json_body(get(&app, "/api/v1/books/search?q=HOBBIT").await).await;
    assert_eq!(body["total_results"], 1);
    assert_eq!(body["query"], "HOBBIT");

    let body = json_body(get(&app, "/api/v1/health").await).await;
    assert_eq!(body["status"], "healthy");

    let body = json_body(get(&app, "/api/v1/ready").await).await;
    assert_eq!(body["status"], "ready");
}

/// Store whose every call fails, as if the database were unreachable
struct OfflineStore;

#[async_trait]
impl BookStore for OfflineStore {
    async fn list(&self, _offset: i64, _limit: i64) -> AppResult<Vec<Book>> {
        Err(offline())
    }

    async fn count(&self) -> AppResult<i64> {
        Err(offline())
    }

    async fn search(&self, _filter: &SearchFilter) -> AppResult<Vec<Book>> {
        Err(offline())
    }

    async fn get(&self, _id: i32) -> AppResult<Option<Book>> {
        Err(offline())
    }

    async fn create(&self, _book: &NewBook) -> AppResult<Book> {
        Err(offline())
    }

    async fn update(&self, _id: i32, _book: &NewBook) -> AppResult<Option<Book>> {
        Err(offline())
    }

    async fn delete(&self, _id: i32) -> AppResult<bool> {
        Err(offline())
    }

    async fn ping(&self) -> AppResult<()> {
        Err(offline())
    }
}

fn offline() -> AppError {
    AppError::Internal("store offline".to_string())
}

#[tokio::test]
async fn test_store_failures_become_server_errors() {
    let app = app_with(Repository::new(Arc::new(OfflineStore)));

    let response = get(&app, "/books/page/1").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(text(response).await.contains("store offline"));

    let response = post_form(&app, "/books/new", "title=T&author=A&genre=G&year=2000").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = get(&app, "/api/v1/ready").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
