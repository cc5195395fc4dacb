//! Authentication and account service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use std::collections::BTreeSet;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{capability, CreateUser, User, UserClaims},
    repository::Repository,
};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by login and password, returning a JWT carrying the
    /// user's capability set
    pub async fn authenticate(
        &self,
        login: &str,
        password: &str,
    ) -> AppResult<(String, User, BTreeSet<String>)> {
        let user = self
            .repository
            .users
            .get_by_login(login)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        let verified = match user.password {
            Some(ref hash) => verify_password(hash, password)?,
            None => false,
        };
        if !verified {
            return Err(AppError::Authentication(
                "Invalid login or password".to_string(),
            ));
        }

        let capabilities = self.repository.users.get_capabilities(user.id).await?;

        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.login.clone(),
            user_id: user.id,
            capabilities: capabilities.clone(),
            exp,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, user, capabilities))
    }

    /// Create a new user account with a hashed password
    pub async fn create(&self, user: CreateUser) -> AppResult<User> {
        user.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // Login is unique
        if self.repository.users.get_by_login(&user.login).await?.is_some() {
            return Err(AppError::Conflict("Login already exists".to_string()));
        }

        let password_hash = hash_password(&user.password)?;

        self.repository
            .users
            .create(
                &user.login,
                &password_hash,
                user.first_name.as_deref(),
                user.last_name.as_deref(),
            )
            .await
    }

    /// First-run bootstrap: with no accounts in the database, create an
    /// `admin`/`admin` account holding `add_user` so further accounts can
    /// be registered over the API. Capability grants beyond that stay out
    /// of band.
    pub async fn bootstrap(&self) -> AppResult<()> {
        if self.repository.users.count().await? > 0 {
            return Ok(());
        }

        let password_hash = hash_password("admin")?;
        let admin = self
            .repository
            .users
            .create("admin", &password_hash, None, None)
            .await?;
        self.repository
            .users
            .grant_capability(admin.id, capability::ADD_USER)
            .await?;

        tracing::warn!("Empty user table: created bootstrap account 'admin' with password 'admin'");
        Ok(())
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }
}
