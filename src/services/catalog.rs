//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor, UpdateAuthor},
        book::{BookDetails, BookSummary, CatalogSummary},
        instance::LoanStatus,
    },
    repository::Repository,
    services::loans::PAGE_SIZE,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Catalog-wide counts for the summary view
    pub async fn summary(&self) -> AppResult<CatalogSummary> {
        Ok(CatalogSummary {
            num_books: self.repository.books.count().await?,
            num_copies: self.repository.instances.count().await?,
            num_copies_available: self
                .repository
                .instances
                .count_by_status(LoanStatus::Available)
                .await?,
            num_authors: self.repository.authors.count().await?,
            num_genres: self.repository.books.count_genres().await?,
        })
    }

    /// List books ordered by title, paginated
    pub async fn list_books(&self, page: i64) -> AppResult<(Vec<BookSummary>, i64)> {
        self.repository.books.list(page, PAGE_SIZE).await
    }

    /// Get book details by ID
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        self.repository.books.get_details(id).await
    }

    /// List authors ordered by (last_name, first_name), paginated
    pub async fn list_authors(&self, page: i64) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(page, PAGE_SIZE).await
    }

    /// Get author by ID
    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Create a new author
    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        author
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.create(&author).await
    }

    /// Update an existing author
    pub async fn update_author(&self, id: i32, author: UpdateAuthor) -> AppResult<Author> {
        author
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.update(id, &author).await
    }

    /// Delete an author; book references are nulled
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }
}
