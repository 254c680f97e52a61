use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};
use chrono::Utc;
use uuid::Uuid;

use ladle_domain::pagination::PageRequest;

use crate::domain::repository::UserRepository;
use crate::domain::types::{User, UserDraft, validate_user_draft};
use crate::error::ApiServiceError;

/// Hash a password with argon2id, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, draft: UserDraft) -> Result<User, ApiServiceError> {
        let errors = validate_user_draft(&draft);
        if !errors.is_empty() {
            return Err(ApiServiceError::Validation(errors));
        }
        if self.repo.find_by_email(&draft.email).await?.is_some() {
            return Err(ApiServiceError::EmailTaken);
        }
        if self.repo.find_by_username(&draft.username).await?.is_some() {
            return Err(ApiServiceError::UsernameTaken);
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email: draft.email,
            username: draft.username,
            first_name: draft.first_name,
            last_name: draft.last_name,
            password_hash: hash_password(&draft.password)?,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, ApiServiceError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)
    }
}

// ── GetUsers ─────────────────────────────────────────────────────────────────

pub struct GetUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUsersUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<User>, ApiServiceError> {
        self.repo.list(page).await
    }
}
