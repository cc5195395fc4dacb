//! Book, genre and language models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// A book genre (many-to-many with books)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

/// A book's natural language
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Language {
    pub id: i32,
    pub name: String,
}

/// Book model from database. Represents a title/edition, not a physical
/// copy; copies are tracked as book instances.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub summary: Option<String>,
    pub isbn: Option<String>,
    pub language_id: Option<i32>,
}

/// Book row for listings, with the author name resolved
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author_name: Option<String>,
}

/// Full book details with author, language, and genres resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetails {
    pub book: Book,
    pub author_name: Option<String>,
    pub language: Option<String>,
    pub genres: Vec<Genre>,
}

/// Page query parameter for paginated listings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    /// Requested page, clamped so a zero or negative value never reaches
    /// the OFFSET computation
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Catalog-wide counts for the summary view
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogSummary {
    pub num_books: i64,
    pub num_copies: i64,
    pub num_copies_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
}
