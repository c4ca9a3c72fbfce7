//! Application services - orchestrate ports to implement the use cases.
//!
//! Every service receives its collaborators through `new`; wiring happens
//! in the API server's composition root.

mod auth;
mod authorization;
mod comments;
mod posts;
mod users;

pub use auth::{AuthService, AuthSession, Credentials, RegisterUser};
pub use authorization::AuthorizationChecker;
pub use comments::CommentsService;
pub use posts::PostsService;
pub use users::UsersService;
