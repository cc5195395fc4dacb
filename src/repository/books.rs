//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDetails, BookSummary, Genre},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List books ordered by title with the author name resolved, paginated
    pub async fn list(&self, page: i64, per_page: i64) -> AppResult<(Vec<BookSummary>, i64)> {
        let offset = (page - 1) * per_page;

        let books = sqlx::query_as::<_, BookSummary>(
            r#"
            SELECT b.id, b.title,
                   a.last_name || ', ' || a.first_name AS author_name
            FROM books b
            LEFT JOIN authors a ON b.author_id = a.id
            ORDER BY b.title
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok((books, total))
    }

    /// Get book details by ID, with author, language, and genres resolved
    pub async fn get_details(&self, id: i32) -> AppResult<BookDetails> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let author_name: Option<String> = match book.author_id {
            Some(author_id) => {
                sqlx::query_scalar(
                    "SELECT last_name || ', ' || first_name FROM authors WHERE id = $1",
                )
                .bind(author_id)
                .fetch_optional(&self.pool)
                .await?
            }
            None => None,
        };

        let language: Option<String> = match book.language_id {
            Some(language_id) => {
                sqlx::query_scalar("SELECT name FROM languages WHERE id = $1")
                    .bind(language_id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => None,
        };

        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM genres g
            JOIN book_genres bg ON bg.genre_id = g.id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(BookDetails {
            book,
            author_name,
            language,
            genres,
        })
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count all genres
    pub async fn count_genres(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
