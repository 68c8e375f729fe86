//! HTML rendering of listing, search and form pages

use axum::response::Html;
use minijinja::{context, Environment};

use crate::{
    error::AppResult,
    models::{
        book::{BookForm, FieldError},
        page::{BookPage, SearchResults},
    },
};

const TEMPLATES: [(&str, &str); 7] = [
    ("layout.html", include_str!("../templates/layout.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("form.html", include_str!("../templates/form.html")),
    ("new-book.html", include_str!("../templates/new-book.html")),
    ("update-book.html", include_str!("../templates/update-book.html")),
    ("page-not-found.html", include_str!("../templates/page-not-found.html")),
    ("error.html", include_str!("../templates/error.html")),
];

/// Compiled page templates
#[derive(Clone)]
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> AppResult<Html<String>> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }

    pub fn listing(&self, page: &BookPage) -> AppResult<Html<String>> {
        let p = &page.pagination;
        self.render(
            "index.html",
            context! {
                books => &page.books,
                totalPages => p.total_pages,
                pages => p.page_links(),
                active => p.page,
                nextPage => p.next_page,
                prevPage => p.prev_page,
            },
        )
    }

    pub fn search_results(&self, results: &SearchResults) -> AppResult<Html<String>> {
        self.render(
            "index.html",
            context! {
                books => &results.books,
                notFoundText => &results.query,
                totalResults => results.total_results,
                title => "Search a Book",
            },
        )
    }

    pub fn new_book(&self, book: &BookForm, errors: &[FieldError]) -> AppResult<Html<String>> {
        self.render(
            "new-book.html",
            context! { book => book, errors => errors, title => "New Book" },
        )
    }

    pub fn edit_book(&self, book: &BookForm, errors: &[FieldError]) -> AppResult<Html<String>> {
        self.render(
            "update-book.html",
            context! { book => book, errors => errors, title => "Edit Book" },
        )
    }

    /// Shown for listing pages without books
    pub fn page_not_found(&self) -> AppResult<Html<String>> {
        self.render("page-not-found.html", context! { title => "Page Not Found" })
    }

    /// Shown when a book id does not exist
    pub fn book_not_found(&self) -> AppResult<Html<String>> {
        self.render("error.html", context! { title => "Book Not Found" })
    }
}
