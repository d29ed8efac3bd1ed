use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Page, PageRequest, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity. Fails with `RepoError::Constraint` on a unique-key clash.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// Find a category by its exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError>;

    /// All categories, sorted by name ascending.
    async fn list_sorted(&self) -> Result<Vec<Category>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// A page of posts, newest first, optionally restricted to one category.
    async fn list(
        &self,
        category_id: Option<Uuid>,
        request: PageRequest,
    ) -> Result<Page<Post>, RepoError>;

    /// Posts whose title or content contains `query`, ignoring case. Newest first.
    async fn search(&self, query: &str) -> Result<Vec<Post>, RepoError>;

    /// Write the author-editable fields of `post`. The stored view count and
    /// comments are left as they are.
    async fn save_edits(&self, post: Post) -> Result<Post, RepoError>;

    /// Add one to the view count in place and return the updated post.
    async fn increment_view_count(&self, id: Uuid) -> Result<Post, RepoError>;

    /// Append `comment` to the stored comments and return the updated post.
    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Post, RepoError>;
}
