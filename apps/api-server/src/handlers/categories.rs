//! Category handlers.

use actix_web::{HttpResponse, web};

use quill_core::DomainError;
use quill_core::domain::Category;
use quill_shared::ApiResponse;
use quill_shared::dto::{CategoryListResponse, CreateCategoryRequest};

use crate::middleware::error::AppResult;
use crate::middleware::validation::ValidatedJson;
use crate::state::AppState;

use super::views::category_response;

/// GET /api/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories: Vec<_> = state
        .categories
        .list_sorted()
        .await?
        .into_iter()
        .map(category_response)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CategoryListResponse {
        count: categories.len(),
        categories,
    })))
}

/// POST /api/categories
pub async fn create_category(
    state: web::Data<AppState>,
    body: ValidatedJson<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if state.categories.find_by_name(&req.name).await?.is_some() {
        return Err(DomainError::Duplicate("Category already exists".to_string()).into());
    }

    let category = state
        .categories
        .insert(Category::new(req.name, req.description))
        .await?;

    tracing::info!(category_id = %category.id, name = %category.name, "Category created");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        category_response(category),
        "Category created successfully",
    )))
}
