//! User model and related types

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Capability names checked by the permission gate. Grants are administered
/// out of band (rows in `user_capabilities`); the server only checks
/// membership.
pub mod capability {
    /// Required to view the all-loans listing and to renew a copy
    pub const CAN_MARK_RETURNED: &str = "can_mark_returned";
    pub const ADD_AUTHOR: &str = "add_author";
    pub const CHANGE_AUTHOR: &str = "change_author";
    pub const DELETE_AUTHOR: &str = "delete_author";
    /// Required to register new user accounts
    pub const ADD_USER: &str = "add_user";
}

/// Membership check for string-named capabilities, decoupled from how
/// identities are represented.
pub trait CapabilitySet: Send + Sync {
    fn has_capability(&self, name: &str) -> bool;

    fn require_capability(&self, name: &str) -> Result<(), AppError> {
        if self.has_capability(name) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Missing capability: {}",
                name
            )))
        }
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub login: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Create user request. Accounts are registered by a caller holding
/// `add_user`; capability grants stay out of band.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    /// Login (username) - required and unique, used for authentication
    #[validate(length(min = 3, message = "Login must be at least 3 characters"))]
    pub login: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Login must not be empty"))]
    pub login: String,
    pub password: String,
}

/// Login response with JWT token
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub user_id: i32,
    pub capabilities: BTreeSet<String>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub capabilities: BTreeSet<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

impl CapabilitySet for UserClaims {
    fn has_capability(&self, name: &str) -> bool {
        self.capabilities.contains(name)
    }
}

impl CapabilitySet for BTreeSet<String> {
    fn has_capability(&self, name: &str) -> bool {
        self.contains(name)
    }
}
