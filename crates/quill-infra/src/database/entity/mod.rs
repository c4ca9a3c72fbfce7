//! SeaORM entities mirroring the `users`, `posts`, `comments` and `likes` tables.

pub mod comment;
pub mod like;
pub mod post;
pub mod user;
