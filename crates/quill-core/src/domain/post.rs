use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::slugify;
use crate::error::DomainError;

/// Post entity - a blog article owned by its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    /// Derived from the title once, at creation.
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub view_count: i64,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment embedded in a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(user_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Fields supplied when creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
}

/// Partial update of a post. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<Uuid>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

impl Post {
    /// Create a new post authored by `author_id`.
    pub fn new(author_id: Uuid, draft: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            category_id: draft.category_id,
            slug: slugify(&draft.title),
            title: draft.title,
            content: draft.content,
            excerpt: draft.excerpt,
            featured_image: draft.featured_image,
            tags: draft.tags,
            is_published: draft.is_published,
            view_count: 0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Fails with `Forbidden` unless `user_id` wrote this post.
    pub fn ensure_authored_by(
        &self,
        user_id: Uuid,
        action: &'static str,
    ) -> Result<(), DomainError> {
        if self.is_authored_by(user_id) {
            Ok(())
        } else {
            Err(DomainError::Forbidden {
                action,
                entity_type: "post",
            })
        }
    }

    pub fn increment_view_count(&mut self) {
        self.view_count = self.view_count.saturating_add(1);
    }

    /// Append a comment. The post counts as updated when the comment was written.
    pub fn add_comment(&mut self, comment: Comment) {
        self.updated_at = comment.created_at;
        self.comments.push(comment);
    }

    /// Merge the provided fields onto this post. The slug is kept stable.
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(category_id) = changes.category_id {
            self.category_id = category_id;
        }
        if let Some(excerpt) = changes.excerpt {
            self.excerpt = Some(excerpt);
        }
        if let Some(featured_image) = changes.featured_image {
            self.featured_image = Some(featured_image);
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }
        if let Some(is_published) = changes.is_published {
            self.is_published = is_published;
        }
        self.updated_at = Utc::now();
    }

    /// Case-insensitive substring match against title or content.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.content.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "Some long enough content".to_string(),
            category_id: Uuid::new_v4(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_post_derives_slug_and_defaults() {
        let author = Uuid::new_v4();
        let post = Post::new(author, draft("Learning React Hooks"));

        assert_eq!(post.slug, "learning-react-hooks");
        assert_eq!(post.view_count, 0);
        assert!(post.comments.is_empty());
        assert!(!post.is_published);
        assert!(post.is_authored_by(author));
        assert!(!post.is_authored_by(Uuid::new_v4()));
    }

    #[test]
    fn test_apply_keeps_slug() {
        let mut post = Post::new(Uuid::new_v4(), draft("Original Title"));

        post.apply(PostChanges {
            title: Some("Renamed".to_string()),
            is_published: Some(true),
            ..Default::default()
        });

        assert_eq!(post.title, "Renamed");
        assert_eq!(post.slug, "original-title");
        assert!(post.is_published);
        assert_eq!(post.content, "Some long enough content");
    }

    #[test]
    fn test_add_comment_appends_in_order() {
        let mut post = Post::new(Uuid::new_v4(), draft("Comments"));
        let commenter = Uuid::new_v4();

        post.add_comment(Comment::new(commenter, "first".to_string()));
        let second = Comment::new(commenter, "second".to_string());
        post.add_comment(second.clone());

        assert_eq!(post.comments.len(), 2);
        assert_eq!(post.comments[0].content, "first");
        assert_eq!(post.comments[1], second);
        assert_eq!(post.comments[1].user_id, commenter);
        assert_eq!(post.updated_at, second.created_at);
    }

    #[test]
    fn test_increment_view_count() {
        let mut post = Post::new(Uuid::new_v4(), draft("Views"));
        post.increment_view_count();
        post.increment_view_count();
        assert_eq!(post.view_count, 2);
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let mut post = Post::new(Uuid::new_v4(), draft("Intro to REACT"));
        assert!(post.matches("react"));

        post.title = "Other".to_string();
        post.content = "I like React a lot".to_string();
        assert!(post.matches("REACT"));
        assert!(!post.matches("vue"));
    }

    #[test]
    fn test_ensure_authored_by() {
        let author = Uuid::new_v4();
        let post = Post::new(author, draft("Owned"));

        assert!(post.ensure_authored_by(author, "update").is_ok());

        let err = post.ensure_authored_by(Uuid::new_v4(), "delete").unwrap_err();
        assert_eq!(err.to_string(), "Not authorized to delete this post");
    }
}
