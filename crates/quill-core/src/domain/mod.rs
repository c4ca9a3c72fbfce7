//! Domain entities - the core business objects.

mod comment;
mod like;
mod pagination;
mod post;
mod user;

pub use comment::{Comment, CommentView};
pub use like::Like;
pub use pagination::{DEFAULT_PAGE, DEFAULT_PAGE_ITEMS, Page, Pagination, total_pages};
pub use post::{NewPost, Post, PostChanges, PostView};
pub use user::{Author, User, UserChanges, mask_email};
