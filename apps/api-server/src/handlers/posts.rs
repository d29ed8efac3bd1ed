//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::{Comment, NewPost, Page, PageRequest, Post, PostChanges, slugify};
use quill_shared::ApiResponse;
use quill_shared::dto::{
    CommentRequest, CommentsResponse, CreatePostRequest, ListPostsQuery, PostListResponse,
    PostSearchResponse, SearchQuery, UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::validation::{PathId, ValidatedJson};
use crate::state::AppState;

use super::views::Populator;

async fn load_post(state: &AppState, id: Uuid) -> AppResult<Post> {
    let post = state.posts.find_by_id(id).await?;
    Ok(post.ok_or(DomainError::not_found("Post"))?)
}

/// Resolve a category reference that has already passed the id format check.
async fn existing_category(state: &AppState, raw: &str) -> AppResult<Uuid> {
    let id =
        Uuid::parse_str(raw).map_err(|_| AppError::field("category", "Invalid category ID"))?;

    match state.categories.find_by_id(id).await? {
        Some(category) => Ok(category.id),
        None => Err(DomainError::validation("category", "Category not found").into()),
    }
}

/// GET /api/posts?page&limit&category
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let request = PageRequest::new(query.page, query.limit);

    let category = match query.category.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Some(state.categories.find_by_name(name).await?),
        _ => None,
    };

    let page = match category {
        // An unknown category name matches no posts.
        Some(None) => Page::empty(request),
        Some(Some(category)) => state.posts.list(Some(category.id), request).await?,
        None => state.posts.list(None, request).await?,
    };

    let total_pages = page.total_pages();
    let posts = Populator::new(&state).posts(page.items).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostListResponse {
        posts,
        current_page: page.page,
        total_pages,
        total_posts: page.total,
    })))
}

/// GET /api/posts/{id_or_slug}
///
/// Every successful read counts as a view.
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let key = path.into_inner();

    let by_id = match Uuid::parse_str(&key) {
        Ok(id) => state.posts.find_by_id(id).await?,
        Err(_) => None,
    };
    let post = match by_id {
        Some(post) => Some(post),
        None => state.posts.find_by_slug(&key).await?,
    };
    let post = post.ok_or(DomainError::not_found("Post"))?;

    let post = state.posts.increment_view_count(post.id).await?;

    let body = Populator::new(&state).post(post).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: ValidatedJson<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let category_id = existing_category(&state, &req.category).await?;

    if state.posts.find_by_slug(&slugify(&req.title)).await?.is_some() {
        let message = "A post with this title already exists".to_string();
        return Err(DomainError::Duplicate(message).into());
    }

    let post = Post::new(
        identity.user_id,
        NewPost {
            title: req.title,
            content: req.content,
            category_id,
            excerpt: req.excerpt,
            featured_image: req.featured_image,
            tags: req.tags.unwrap_or_default(),
            is_published: req.is_published.unwrap_or(false),
        },
    );
    let post = state.posts.insert(post).await?;

    tracing::info!(post_id = %post.id, slug = %post.slug, author = %identity.email, "Post created");

    let body = Populator::new(&state).post(post).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        body,
        "Post created successfully",
    )))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    id: PathId,
    body: ValidatedJson<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut post = load_post(&state, id.0).await?;
    post.ensure_authored_by(identity.user_id, "update")?;

    let category_id = match req.category.as_deref() {
        Some(raw) => Some(existing_category(&state, raw).await?),
        None => None,
    };

    post.apply(PostChanges {
        title: req.title,
        content: req.content,
        category_id,
        excerpt: req.excerpt,
        featured_image: req.featured_image,
        tags: req.tags,
        is_published: req.is_published,
    });
    let post = state.posts.save_edits(post).await?;

    let body = Populator::new(&state).post(post).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        body,
        "Post updated successfully",
    )))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    id: PathId,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, id.0).await?;
    post.ensure_authored_by(identity.user_id, "delete")?;

    state.posts.delete(post.id).await?;

    tracing::info!(post_id = %post.id, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted successfully")))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    id: PathId,
    body: ValidatedJson<CommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = load_post(&state, id.0).await?;
    let comment = Comment::new(identity.user_id, req.content);
    let post = state.posts.push_comment(post.id, comment).await?;

    let comments = Populator::new(&state).comments(post.comments).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        CommentsResponse { comments },
        "Comment added successfully",
    )))
}

/// GET /api/posts/search?q=
pub async fn search_posts(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(AppError::BadRequest("Search query is required".to_string()));
    }

    let posts = state.posts.search(q).await?;
    let posts = Populator::new(&state).posts(posts).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostSearchResponse {
        count: posts.len(),
        posts,
    })))
}
