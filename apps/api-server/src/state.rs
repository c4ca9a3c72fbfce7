//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    CommentRepository, LikeRepository, PasswordService, PostRepository, TokenService,
    UserRepository,
};
use quill_core::services::{
    AuthService, AuthorizationChecker, CommentsService, PostsService, UsersService,
};
use quill_infra::{Argon2PasswordService, InMemoryDatabase, JwtConfig, JwtTokenService};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use quill_infra::database::DbConn;
#[cfg(feature = "postgres")]
use quill_infra::{
    PostgresCommentRepository, PostgresLikeRepository, PostgresPostRepository,
    PostgresUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UsersService>,
    pub posts: Arc<PostsService>,
    pub comments: Arc<CommentsService>,
    pub authorization: AuthorizationChecker,
    /// Storage backend name reported by the health check.
    pub storage: &'static str,
}

/// One repository per table, all backed by the same store.
struct Repositories {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
    storage: &'static str,
}

impl Repositories {
    fn in_memory() -> Self {
        let db = InMemoryDatabase::new();
        Self {
            users: Arc::new(db.users()),
            posts: Arc::new(db.posts()),
            comments: Arc::new(db.comments()),
            likes: Arc::new(db.likes()),
            storage: "memory",
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(conn: DbConn) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(conn.clone())),
            comments: Arc::new(PostgresCommentRepository::new(conn.clone())),
            likes: Arc::new(PostgresLikeRepository::new(conn)),
            storage: "postgres",
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// Falls back to in-memory storage when no database is configured or the
    /// connection fails.
    pub async fn new(config: &AppConfig) -> Self {
        let repositories = Self::repositories(config).await;
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        let state = Self::assemble(repositories, passwords, tokens);
        tracing::info!(storage = state.storage, "Application state initialized");
        state
    }

    /// In-memory state with the given token settings.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        Self::assemble(
            Repositories::in_memory(),
            Arc::new(Argon2PasswordService::new()),
            Arc::new(JwtTokenService::new(jwt)),
        )
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Repositories::in_memory();
        };

        match quill_infra::connect(db_config).await {
            Ok(conn) => Repositories::postgres(conn),
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
                Repositories::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(config: &AppConfig) -> Repositories {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        Repositories::in_memory()
    }

    fn assemble(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        let posts = Arc::new(PostsService::new(
            repos.posts,
            repos.users.clone(),
            repos.comments.clone(),
            repos.likes,
        ));

        Self {
            auth: Arc::new(AuthService::new(
                repos.users.clone(),
                passwords.clone(),
                tokens,
            )),
            users: Arc::new(UsersService::new(repos.users.clone(), passwords)),
            comments: Arc::new(CommentsService::new(
                repos.comments,
                repos.users,
                posts.clone(),
            )),
            posts,
            authorization: AuthorizationChecker::new(),
            storage: repos.storage,
        }
    }
}
