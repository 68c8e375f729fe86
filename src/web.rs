//! HTML pages: listing, search and the create/edit forms

use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::{error::AppError, models::book::BookForm, AppState};

/// Where every successful write sends the browser
pub const FIRST_PAGE: &str = "/books/page/1";

/// Failure that escaped the page handlers: answered with the raw error text
pub struct PageError(AppError);

impl From<AppError> for PageError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!("Unhandled error: {:?}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

pub type PageResult = Result<Response, PageError>;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub async fn home() -> Redirect {
    Redirect::to(FIRST_PAGE)
}

pub async fn list_page(State(state): State<AppState>, Path(page): Path<i64>) -> PageResult {
    match state.services.query.list_page(page).await {
        Ok(page) => Ok(state.views.listing(&page)?.into_response()),
        Err(AppError::EmptyPage(_)) => Ok(state.views.page_not_found()?.into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> PageResult {
    let results = state.services.query.search(&params.q).await?;
    Ok(state.views.search_results(&results)?.into_response())
}

pub async fn new_book_form(State(state): State<AppState>) -> PageResult {
    Ok(state.views.new_book(&BookForm::default(), &[])?.into_response())
}

pub async fn create_book(State(state): State<AppState>, Form(form): Form<BookForm>) -> PageResult {
    match state.services.mutation.create(form).await {
        Ok(_) => Ok(Redirect::to(FIRST_PAGE).into_response()),
        Err(AppError::Validation(failure)) => Ok(state
            .views
            .new_book(&failure.book, &failure.errors)?
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_book_form(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> PageResult {
    let Ok(Path(id)) = id else {
        return book_not_found(&state);
    };
    match state.services.query.get_book(id).await {
        Ok(book) => Ok(state.views.edit_book(&BookForm::from(&book), &[])?.into_response()),
        Err(AppError::NotFound(_)) => book_not_found(&state),
        Err(e) => Err(e.into()),
    }
}

pub async fn update_book(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    Form(form): Form<BookForm>,
) -> PageResult {
    let Ok(Path(id)) = id else {
        return book_not_found(&state);
    };
    match state.services.mutation.update(id, form).await {
        Ok(_) => Ok(Redirect::to(FIRST_PAGE).into_response()),
        Err(AppError::Validation(failure)) => Ok(state
            .views
            .edit_book(&failure.book, &failure.errors)?
            .into_response()),
        Err(AppError::NotFound(_)) => book_not_found(&state),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_book(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> PageResult {
    let Ok(Path(id)) = id else {
        return book_not_found(&state);
    };
    match state.services.mutation.delete(id).await {
        Ok(()) => Ok(Redirect::to(FIRST_PAGE).into_response()),
        Err(AppError::NotFound(_)) => book_not_found(&state),
        Err(e) => Err(e.into()),
    }
}

/// Also answers ids that could never name a stored book, such as `abc`
fn book_not_found(state: &AppState) -> PageResult {
    Ok((StatusCode::NOT_FOUND, state.views.book_not_found()?).into_response())
}
