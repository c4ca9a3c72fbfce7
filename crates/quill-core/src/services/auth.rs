//! Registration, login and token validation.

use std::sync::Arc;

use crate::domain::{User, mask_email};
use crate::error::{DomainError, DomainResult, RepoError};
use crate::ports::{AuthError, PasswordService, TokenClaims, TokenService, UserRepository};

/// Registration input, validated at the boundary.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login input.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A user together with a freshly issued access token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub async fn register(&self, input: RegisterUser) -> DomainResult<AuthSession> {
        let masked = mask_email(&input.email);
        tracing::info!(email = %masked, "Registration attempt");

        if self.users.find_by_email(&input.email).await?.is_some() {
            tracing::warn!(email = %masked, "Registration rejected - email already exists");
            return Err(DomainError::EmailAlreadyExists);
        }

        let password_hash = self.passwords.hash(&input.password)?;
        let user = self
            .users
            .insert(User::new(input.name, input.email, password_hash))
            .await
            .map_err(|e| match e {
                RepoError::Constraint(_) => DomainError::EmailAlreadyExists,
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, "Registration succeeded");
        self.issue(user)
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, credentials: Credentials) -> DomainResult<AuthSession> {
        let masked = mask_email(&credentials.email);

        let Some(user) = self.users.find_by_email(&credentials.email).await? else {
            tracing::warn!(email = %masked, "Login failed - unknown email");
            return Err(DomainError::InvalidCredentials);
        };

        match self
            .passwords
            .verify(&credentials.password, &user.password_hash)
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(email = %masked, user_id = %user.id, "Login failed - wrong password");
                return Err(DomainError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Login failed - stored hash unreadable");
                return Err(DomainError::InvalidCredentials);
            }
        }

        tracing::info!(user_id = %user.id, "Login succeeded");
        self.issue(user)
    }

    /// Validate a bearer token.
    pub fn authenticate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.tokens.validate_token(token)
    }

    pub fn token_lifetime_seconds(&self) -> i64 {
        self.tokens.expiration_seconds()
    }

    fn issue(&self, user: User) -> DomainResult<AuthSession> {
        let access_token = self.tokens.generate_token(user.id, &user.email)?;
        Ok(AuthSession { user, access_token })
    }
}
