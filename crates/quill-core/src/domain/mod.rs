//! Domain entities - the core business objects.

mod category;
mod pagination;
mod post;
mod slug;
mod user;

pub use category::Category;
pub use pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_WINDOW, Page, PageRequest};
pub use post::{Comment, NewPost, Post, PostChanges};
pub use slug::slugify;
pub use user::{DEFAULT_ROLE, User};
