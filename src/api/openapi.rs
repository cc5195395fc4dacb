//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bibliotheca API",
        version = "0.1.0",
        description = "Library Catalog and Circulation REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::create_user,
        // Catalog
        books::summary,
        books::list_books,
        books::get_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Loans
        loans::my_loans,
        loans::all_borrowed,
        loans::renewal_form,
        loans::renew,
    ),
    components(
        schemas(
            // Catalog
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookDetails,
            crate::models::book::Genre,
            crate::models::book::Language,
            crate::models::book::CatalogSummary,
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            // Copies & loans
            crate::models::instance::BookInstance,
            crate::models::instance::LoanStatus,
            crate::models::instance::LoanedCopy,
            crate::models::instance::RenewalForm,
            crate::models::instance::RenewalRequest,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User accounts"),
        (name = "catalog", description = "Book catalog"),
        (name = "authors", description = "Author management"),
        (name = "loans", description = "Loan listings and renewals")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
