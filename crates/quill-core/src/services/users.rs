//! User profiles.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{User, UserChanges};
use crate::error::{DomainError, DomainResult, RepoError};
use crate::ports::{PasswordService, UserRepository};

pub struct UsersService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UsersService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    pub async fn get_user(&self, id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    /// Apply a partial profile update. A new password is re-hashed.
    ///
    /// Keeping one's own email is not a conflict.
    pub async fn update_user(&self, id: Uuid, changes: UserChanges) -> DomainResult<User> {
        let mut user = self.get_user(id).await?;

        if let Some(email) = changes.email {
            if email != user.email {
                if let Some(existing) = self.users.find_by_email(&email).await? {
                    if existing.id != id {
                        return Err(DomainError::EmailAlreadyExists);
                    }
                }
            }
            user.email = email;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(password) = changes.password {
            user.password_hash = self.passwords.hash(&password)?;
        }
        user.updated_at = Utc::now();

        let user = self.users.update(user).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::user_not_found(id),
            RepoError::Constraint(_) => DomainError::EmailAlreadyExists,
            other => other.into(),
        })?;

        tracing::info!(user_id = %id, "User updated");
        Ok(user)
    }
}
