//! Response assembly - resolves author, category and commenter references.

use std::collections::HashMap;

use uuid::Uuid;

use quill_core::domain::{Category, Comment, Post, User};
use quill_shared::dto::{
    AuthorSummary, CategoryResponse, CategorySummary, CommentResponse, PostResponse, UserResponse,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        created_at: user.created_at,
    }
}

pub fn category_response(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        description: category.description,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

/// Populates references of posts, looking each user and category up at most once.
pub struct Populator<'a> {
    state: &'a AppState,
    users: HashMap<Uuid, Option<AuthorSummary>>,
    categories: HashMap<Uuid, Option<CategorySummary>>,
}

impl<'a> Populator<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            users: HashMap::new(),
            categories: HashMap::new(),
        }
    }

    async fn user(&mut self, id: Uuid) -> AppResult<Option<AuthorSummary>> {
        if let Some(cached) = self.users.get(&id) {
            return Ok(cached.clone());
        }

        let summary = self.state.users.find_by_id(id).await?.map(|u| AuthorSummary {
            id: u.id,
            name: u.name,
            email: u.email,
        });
        self.users.insert(id, summary.clone());
        Ok(summary)
    }

    async fn category(&mut self, id: Uuid) -> AppResult<Option<CategorySummary>> {
        if let Some(cached) = self.categories.get(&id) {
            return Ok(cached.clone());
        }

        let summary = self
            .state
            .categories
            .find_by_id(id)
            .await?
            .map(|c| CategorySummary { id: c.id, name: c.name });
        self.categories.insert(id, summary.clone());
        Ok(summary)
    }

    pub async fn comments(&mut self, comments: Vec<Comment>) -> AppResult<Vec<CommentResponse>> {
        let mut out = Vec::with_capacity(comments.len());
        for comment in comments {
            out.push(CommentResponse {
                id: comment.id,
                user: self.user(comment.user_id).await?,
                content: comment.content,
                created_at: comment.created_at,
            });
        }
        Ok(out)
    }

    pub async fn post(&mut self, post: Post) -> AppResult<PostResponse> {
        let author = self.user(post.author_id).await?;
        let category = self.category(post.category_id).await?;
        let comments = self.comments(post.comments).await?;

        Ok(PostResponse {
            id: post.id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            excerpt: post.excerpt,
            featured_image: post.featured_image,
            tags: post.tags,
            is_published: post.is_published,
            view_count: post.view_count,
            author,
            category,
            comments,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }

    pub async fn posts(&mut self, posts: Vec<Post>) -> AppResult<Vec<PostResponse>> {
        let mut out = Vec::with_capacity(posts.len());
        for post in posts {
            out.push(self.post(post).await?);
        }
        Ok(out)
    }
}
