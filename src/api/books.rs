//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::book::{BookDetails, BookSummary, CatalogSummary, PageQuery},
    services::loans::PAGE_SIZE,
};

use super::{AuthenticatedUser, PaginatedResponse};

/// Catalog-wide counts
#[utoipa::path(
    get,
    path = "/catalog/summary",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Catalog counts", body = CatalogSummary),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn summary(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<CatalogSummary>> {
    let summary = state.services.catalog.summary().await?;
    Ok(Json(summary))
}

/// List books ordered by title
#[utoipa::path(
    get,
    path = "/books",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)")
    ),
    responses(
        (status = 200, description = "List of books", body = PaginatedResponse<BookSummary>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<BookSummary>>> {
    let page = query.page();
    let (books, total) = state.services.catalog.list_books(page).await?;

    Ok(Json(PaginatedResponse {
        items: books,
        total,
        page,
        per_page: PAGE_SIZE,
    }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}
