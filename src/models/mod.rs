//! Data models for Bibliotheca

pub mod author;
pub mod book;
pub mod instance;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookDetails, BookSummary, CatalogSummary, Genre, Language};
pub use instance::{BookInstance, LoanStatus, LoanedCopy};
pub use user::{User, UserClaims};
