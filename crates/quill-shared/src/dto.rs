//! Data Transfer Objects - request/response types for the API.
//!
//! Request bodies carry their validation rules as `validator` attributes. Required
//! string fields default to empty so a missing field is reported by its rule
//! rather than as a malformed body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{
    Normalize, category_ref, clean_tags, post_title, required, trim_in_place, trim_option,
};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Request to create an account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(
        custom(function = "required", message = "Name is required"),
        length(min = 2, max = 50, message = "Name must be between 2 and 50 characters")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl Normalize for SignupRequest {
    fn normalize(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.email);
        self.email = self.email.to_lowercase();
    }
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "required", message = "Password is required"))]
    pub password: String,
}

impl Normalize for LoginRequest {
    fn normalize(&mut self) {
        trim_in_place(&mut self.email);
        self.email = self.email.to_lowercase();
    }
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Response returned by signup and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// Request to create a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(
        custom(function = "post_title"),
        length(min = 3, max = 100, message = "Title must be between 3 and 100 characters")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(
        custom(function = "required", message = "Content is required"),
        length(min = 10, message = "Content must be at least 10 characters")
    )]
    pub content: String,

    #[serde(default)]
    #[validate(custom(function = "category_ref"))]
    pub category: String,

    #[validate(length(max = 200, message = "Excerpt cannot exceed 200 characters"))]
    pub excerpt: Option<String>,

    pub tags: Option<Vec<String>>,

    #[validate(url(message = "Featured image must be a valid URL"))]
    pub featured_image: Option<String>,

    pub is_published: Option<bool>,
}

impl Normalize for CreatePostRequest {
    fn normalize(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.content);
        trim_in_place(&mut self.category);
        trim_option(&mut self.excerpt);
        trim_option(&mut self.featured_image);
        if let Some(tags) = self.tags.as_mut() {
            clean_tags(tags);
        }
    }
}

/// Partial update of a post; every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[validate(
        custom(function = "post_title"),
        length(min = 3, max = 100, message = "Title must be between 3 and 100 characters")
    )]
    pub title: Option<String>,

    #[validate(length(min = 10, message = "Content must be at least 10 characters"))]
    pub content: Option<String>,

    #[validate(custom(function = "category_ref"))]
    pub category: Option<String>,

    #[validate(length(max = 200, message = "Excerpt cannot exceed 200 characters"))]
    pub excerpt: Option<String>,

    pub tags: Option<Vec<String>>,

    #[validate(url(message = "Featured image must be a valid URL"))]
    pub featured_image: Option<String>,

    pub is_published: Option<bool>,
}

impl Normalize for UpdatePostRequest {
    fn normalize(&mut self) {
        trim_option(&mut self.title);
        trim_option(&mut self.content);
        trim_option(&mut self.category);
        trim_option(&mut self.excerpt);
        trim_option(&mut self.featured_image);
        if let Some(tags) = self.tags.as_mut() {
            clean_tags(tags);
        }
    }
}

/// Request to comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    #[serde(default)]
    #[validate(
        custom(function = "required", message = "Comment content is required"),
        length(min = 1, max = 500, message = "Comment must be between 1 and 500 characters")
    )]
    pub content: String,
}

impl Normalize for CommentRequest {
    fn normalize(&mut self) {
        trim_in_place(&mut self.content);
    }
}

/// Query string of `GET /api/posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub category: Option<String>,
}

/// Query string of `GET /api/posts/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Author reference, populated with public fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Category reference, populated with its name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    /// `None` when the commenter no longer exists.
    pub user: Option<AuthorSummary>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub view_count: i64,
    pub author: Option<AuthorSummary>,
    pub category: Option<CategorySummary>,
    pub comments: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_posts: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSearchResponse {
    pub posts: Vec<PostResponse>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub comments: Vec<CommentResponse>,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Request to create a category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    #[validate(
        custom(function = "required", message = "Category name is required"),
        length(min = 2, max = 50, message = "Category name must be between 2 and 50 characters")
    )]
    pub name: String,

    #[validate(length(max = 200, message = "Description cannot exceed 200 characters"))]
    pub description: Option<String>,
}

impl Normalize for CreateCategoryRequest {
    fn normalize(&mut self) {
        trim_in_place(&mut self.name);
        trim_option(&mut self.description);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryResponse>,
    pub count: usize,
}
