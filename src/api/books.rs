//! Book (catalog) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookForm},
        page::{BookPage, SearchResults},
    },
    web::SearchParams,
};

/// List one page of books, newest first
#[utoipa::path(
    get,
    path = "/books/page/{page}",
    tag = "books",
    params(
        ("page" = i64, Path, description = "Page number, starting at 1")
    ),
    responses(
        (status = 200, description = "Books on this page", body = BookPage),
        (status = 404, description = "Page has no books", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Path(page): Path<i64>,
) -> AppResult<Json<BookPage>> {
    let page = state.services.query.list_page(page).await?;
    Ok(Json(page))
}

/// Search title, author, genre and year
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(
        ("q" = Option<String>, Query, description = "Text to look for; empty matches everything")
    ),
    responses(
        (status = 200, description = "Matching books", body = SearchResults)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResults>> {
    let results = state.services.query.search(&params.q).await?;
    Ok(Json(results))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.query.get_book(id).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookForm,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(form): Json<BookForm>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.mutation.create(form).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = BookForm,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(form): Json<BookForm>,
) -> AppResult<Json<Book>> {
    let updated = state.services.mutation.update(id, form).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.mutation.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
