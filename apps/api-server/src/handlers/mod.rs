//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod health;
mod posts;
mod views;

#[cfg(test)]
mod tests;

use actix_web::{HttpRequest, HttpResponse, web};

use quill_shared::ErrorResponse;

use crate::middleware::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::observability::RequestId;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                // Auth routes
                .service(
                    web::scope("/auth")
                        .route("/signup", web::post().to(auth::signup))
                        .route("/register", web::post().to(auth::signup))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                )
                // Post routes; `/search` must precede `/{id}`
                .service(
                    web::scope("/posts")
                        .service(
                            web::resource("")
                                .route(web::get().to(posts::list_posts))
                                .route(web::post().to(posts::create_post)),
                        )
                        .service(web::resource("/search").route(web::get().to(posts::search_posts)))
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(posts::get_post))
                                .route(web::put().to(posts::update_post))
                                .route(web::delete().to(posts::delete_post)),
                        )
                        .service(
                            web::resource("/{id}/comments")
                                .route(web::post().to(posts::add_comment)),
                        ),
                )
                // Category routes
                .service(
                    web::resource("/categories")
                        .route(web::get().to(categories::list_categories))
                        .route(web::post().to(categories::create_category)),
                )
                .default_service(web::to(route_not_found)),
        );
}

/// The `X-Request-ID` header correlates the 404 with this log line.
async fn route_not_found(req: HttpRequest, request_id: RequestId) -> HttpResponse {
    tracing::debug!(
        request_id = %request_id.0,
        method = %req.method(),
        path = %req.path(),
        "No API route matched"
    );
    HttpResponse::NotFound().json(ErrorResponse::new("Route not found"))
}
