//! In-memory repositories - used when the server runs without PostgreSQL and in tests.
//!
//! Unique keys (user email, category name, post slug) are enforced the same way
//! the database constraints enforce them.
//! Note: Data is lost on process restart.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Category, Comment, Page, PageRequest, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CategoryRepository, PostRepository, UserRepository};

use super::mask_email;

/// An entity that can live in an [`InMemoryRepository`].
pub trait Record: Clone + Send + Sync + 'static {
    /// Human-readable entity name used in error messages.
    const KIND: &'static str;

    fn id(&self) -> Uuid;

    /// Value that must be unique across all rows, if any.
    fn unique_key(&self) -> Option<&str>;
}

impl Record for User {
    const KIND: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.email)
    }
}

impl Record for Category {
    const KIND: &'static str = "Category";

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl Record for Post {
    const KIND: &'static str = "Post";

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

/// Table of rows kept in insertion order behind an async RwLock.
pub struct InMemoryRepository<T> {
    rows: RwLock<Vec<T>>,
}

/// In-memory user repository.
pub type InMemoryUserRepository = InMemoryRepository<User>;

/// In-memory category repository.
pub type InMemoryCategoryRepository = InMemoryRepository<Category>;

/// In-memory post repository.
pub type InMemoryPostRepository = InMemoryRepository<Post>;

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    fn clashes(rows: &[T], entity: &T) -> bool {
        match entity.unique_key() {
            Some(key) => rows
                .iter()
                .any(|row| row.id() != entity.id() && row.unique_key() == Some(key)),
            None => false,
        }
    }

    async fn find_where(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        let rows = self.rows.read().await;
        rows.iter().find(|row| predicate(row)).cloned()
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> BaseRepository<T, Uuid> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        Ok(self.find_where(|row| row.id() == id).await)
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;

        if rows.iter().any(|row| row.id() == entity.id()) || Self::clashes(&rows, &entity) {
            return Err(RepoError::Constraint(format!("{} already exists", T::KIND)));
        }

        rows.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;

        if Self::clashes(&rows, &entity) {
            return Err(RepoError::Constraint(format!("{} already exists", T::KIND)));
        }

        let slot = rows
            .iter_mut()
            .find(|row| row.id() == entity.id())
            .ok_or(RepoError::NotFound)?;
        *slot = entity.clone();

        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or(RepoError::NotFound)?;
        rows.remove(index);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email (in-memory)");
        Ok(self.find_where(|user| user.email == email).await)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        Ok(self.find_where(|category| category.name == name).await)
    }

    async fn list_sorted(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories = self.rows.read().await.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

impl InMemoryPostRepository {
    /// Posts matching `predicate`, newest first. Ties keep the latest insert first.
    async fn newest_first(&self, predicate: impl Fn(&Post) -> bool) -> Vec<Post> {
        let rows = self.rows.read().await;
        let mut posts: Vec<Post> = rows.iter().rev().filter(|p| predicate(p)).cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    /// Apply `change` to the stored post under the write lock.
    async fn modify(&self, id: Uuid, change: impl FnOnce(&mut Post)) -> Result<Post, RepoError> {
        let mut rows = self.rows.write().await;
        let post = rows
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(RepoError::NotFound)?;
        change(post);
        Ok(post.clone())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        Ok(self.find_where(|post| post.slug == slug).await)
    }

    async fn list(
        &self,
        category_id: Option<Uuid>,
        request: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let posts = self
            .newest_first(|post| category_id.is_none_or(|id| post.category_id == id))
            .await;
        let total = posts.len() as u64;
        let (offset, limit) = request.window();

        let items = posts
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();

        Ok(Page::new(items, request, total))
    }

    async fn search(&self, query: &str) -> Result<Vec<Post>, RepoError> {
        Ok(self.newest_first(|post| post.matches(query)).await)
    }

    async fn save_edits(&self, edited: Post) -> Result<Post, RepoError> {
        self.modify(edited.id, move |post| {
            post.title = edited.title;
            post.content = edited.content;
            post.category_id = edited.category_id;
            post.excerpt = edited.excerpt;
            post.featured_image = edited.featured_image;
            post.tags = edited.tags;
            post.is_published = edited.is_published;
            post.updated_at = edited.updated_at;
        })
        .await
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<Post, RepoError> {
        self.modify(id, Post::increment_view_count).await
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Post, RepoError> {
        self.modify(id, move |post| post.add_comment(comment)).await
    }
}
