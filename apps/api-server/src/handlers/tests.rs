use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use quill_core::domain::{Category, Comment, NewPost, Post, User};
use quill_infra::JwtConfig;

use super::configure_routes;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn test_state() -> AppState {
    AppState::in_memory(JwtConfig::default())
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Store a user directly and issue a token for them.
async fn seed_user(state: &AppState, name: &str) -> (User, String) {
    let user = User::new(
        name.to_string(),
        format!("{}@example.com", name.to_lowercase()),
        "not-a-real-hash".to_string(),
    );
    let user = state.users.insert(user).await.unwrap();
    let token = state.tokens.issue(&user).unwrap();
    (user, token)
}

async fn seed_category(state: &AppState, name: &str) -> Category {
    state
        .categories
        .insert(Category::new(name.to_string(), None))
        .await
        .unwrap()
}

async fn seed_post(
    state: &AppState,
    author: Uuid,
    category: Uuid,
    title: &str,
    content: &str,
) -> Post {
    let post = Post::new(
        author,
        NewPost {
            title: title.to_string(),
            content: content.to_string(),
            category_id: category,
            ..Default::default()
        },
    );
    state.posts.insert(post).await.unwrap()
}

#[actix_web::test]
async fn test_health_check() {
    let state = test_state();
    let app = test_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/health").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "quill-api");
    assert!(body.get("success").is_none());
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[actix_web::test]
async fn test_duplicate_category_is_conflict() {
    let state = test_state();
    let app = test_app!(state);

    let create = || {
        test::TestRequest::post()
            .uri("/api/categories")
            .set_json(json!({"name": "Rust", "description": "Systems programming"}))
            .to_request()
    };

    let res = test::call_service(&app, create()).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["name"], "Rust");

    let res = test::call_service(&app, create()).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Category already exists");

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/categories").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["count"], 1);
}

#[actix_web::test]
async fn test_categories_listed_by_name() {
    let state = test_state();
    for name in ["Zig", "Go", "Rust"] {
        seed_category(&state, name).await;
    }
    let app = test_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/categories").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;

    let names: Vec<&str> = body["data"]["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Go", "Rust", "Zig"]);
    assert_eq!(body["data"]["count"], 3);
}

#[actix_web::test]
async fn test_category_name_too_short() {
    let state = test_state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .set_json(json!({"name": " a "}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][0]["field"], "name");
}

#[actix_web::test]
async fn test_get_post_by_slug_or_id_counts_views() {
    let state = test_state();
    let (author, _) = seed_user(&state, "Jane").await;
    let category = seed_category(&state, "Rust").await;
    let post = seed_post(&state, author.id, category.id, "Hello, World!", "Some body text").await;
    assert_eq!(post.slug, "hello-world");
    let app = test_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/posts/hello-world").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let by_slug: Value = test::read_body_json(res).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{}", post.id))
            .to_request(),
    )
    .await;
    let by_id: Value = test::read_body_json(res).await;

    assert_eq!(by_slug["data"]["id"], by_id["data"]["id"]);
    assert_eq!(by_slug["data"]["viewCount"], 1);
    assert_eq!(by_id["data"]["viewCount"], 2);
    assert_eq!(by_id["data"]["author"]["name"], "Jane");
    assert_eq!(by_id["data"]["category"]["name"], "Rust");
    assert!(by_id["data"]["author"].get("passwordHash").is_none());

    let stored = state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.view_count, 2);
}

#[actix_web::test]
async fn test_get_missing_post() {
    let state = test_state();
    let app = test_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/posts/no-such-post").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Post not found");
}

#[actix_web::test]
async fn test_create_post_as_author() {
    let state = test_state();
    let (_, token) = seed_user(&state, "Jane").await;
    let category = seed_category(&state, "Rust").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&token))
        .set_json(json!({
            "title": "  Learning Rust  ",
            "content": "Ownership and borrowing explained",
            "category": category.id,
            "tags": ["rust", " "],
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Post created successfully");
    assert_eq!(body["data"]["title"], "Learning Rust");
    assert_eq!(body["data"]["slug"], "learning-rust");
    assert_eq!(body["data"]["isPublished"], false);
    assert_eq!(body["data"]["viewCount"], 0);
    assert_eq!(body["data"]["tags"], json!(["rust"]));
    assert_eq!(body["data"]["author"]["email"], "jane@example.com");
    assert_eq!(body["data"]["category"]["name"], "Rust");
}

#[actix_web::test]
async fn test_create_post_short_title_is_rejected() {
    let state = test_state();
    let (_, token) = seed_user(&state, "Jane").await;
    let category = seed_category(&state, "Rust").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&token))
        .set_json(json!({
            "title": "Hi",
            "content": "Long enough content here",
            "category": category.id,
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title"]);
    assert!(state.posts.search("Long enough").await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_create_post_with_unknown_category() {
    let state = test_state();
    let (_, token) = seed_user(&state, "Jane").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&token))
        .set_json(json!({
            "title": "Orphan post",
            "content": "Long enough content here",
            "category": Uuid::new_v4(),
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["errors"][0]["field"], "category");
    assert_eq!(body["errors"][0]["message"], "Category not found");
}

#[actix_web::test]
async fn test_create_post_with_taken_slug() {
    let state = test_state();
    let (author, token) = seed_user(&state, "Jane").await;
    let category = seed_category(&state, "Rust").await;
    seed_post(&state, author.id, category.id, "Same Title", "First version of it").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&token))
        .set_json(json!({
            "title": "same title!",
            "content": "Second version of it",
            "category": category.id,
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_malformed_body_is_bad_request() {
    let state = test_state();
    let (_, token) = seed_user(&state, "Jane").await;
    let category = seed_category(&state, "Rust").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&token))
        .set_json(json!({
            "title": "Typed wrong",
            "content": "Long enough content here",
            "category": category.id,
            "tags": "rust",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_only_author_may_update_or_delete() {
    let state = test_state();
    let (author, author_token) = seed_user(&state, "Jane").await;
    let (_, other_token) = seed_user(&state, "Mallory").await;
    let category = seed_category(&state, "Rust").await;
    let post = seed_post(
        &state,
        author.id,
        category.id,
        "Original Title",
        "Original content",
    )
    .await;
    let app = test_app!(state);
    let uri = format!("/api/posts/{}", post.id);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&other_token))
            .set_json(json!({"title": "Hijacked"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Not authorized to update this post");

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&other_token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&author_token))
            .set_json(json!({"title": "Revised Title", "isPublished": true}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["title"], "Revised Title");
    assert_eq!(body["data"]["slug"], "original-title");

    let stored = state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Revised Title");
    assert!(stored.is_published);
    assert!(stored.updated_at >= post.updated_at);

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&author_token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Post deleted successfully");
    assert!(state.posts.find_by_id(post.id).await.unwrap().is_none());
}

#[actix_web::test]
async fn test_malformed_id_is_rejected() {
    let state = test_state();
    let (_, token) = seed_user(&state, "Jane").await;
    let app = test_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/posts/12345")
            .insert_header(bearer(&token))
            .set_json(json!({"title": "Whatever"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["errors"][0]["field"], "id");
    assert_eq!(body["errors"][0]["message"], "Invalid ID format");
}

#[actix_web::test]
async fn test_update_missing_post() {
    let state = test_state();
    let (_, token) = seed_user(&state, "Jane").await;
    let app = test_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", Uuid::new_v4()))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_list_second_page() {
    let state = test_state();
    let (author, _) = seed_user(&state, "Jane").await;
    let category = seed_category(&state, "Rust").await;
    for i in 1..=15 {
        seed_post(&state, author.id, category.id, &format!("Post {i}"), "Body of the post").await;
    }
    let app = test_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/posts?page=2&limit=10")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    let data = &body["data"];
    assert_eq!(data["currentPage"], 2);
    assert_eq!(data["totalPages"], 2);
    assert_eq!(data["totalPosts"], 15);

    let titles: Vec<&str> = data["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Post 5", "Post 4", "Post 3", "Post 2", "Post 1"]);
}

#[actix_web::test]
async fn test_list_filters_by_category_name() {
    let state = test_state();
    let (author, _) = seed_user(&state, "Jane").await;
    let rust = seed_category(&state, "Rust").await;
    let go = seed_category(&state, "Go").await;
    seed_post(&state, author.id, rust.id, "Rust one", "Body of the post").await;
    seed_post(&state, author.id, go.id, "Go one", "Body of the post").await;
    let app = test_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/posts?category=Rust").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["totalPosts"], 1);
    assert_eq!(body["data"]["posts"][0]["title"], "Rust one");

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/posts?category=Cobol").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["totalPosts"], 0);
    assert_eq!(body["data"]["totalPages"], 0);
    assert_eq!(body["data"]["posts"], json!([]));
}

#[actix_web::test]
async fn test_search_is_case_insensitive() {
    let state = test_state();
    let (author, _) = seed_user(&state, "Jane").await;
    let category = seed_category(&state, "Web").await;
    seed_post(&state, author.id, category.id, "Intro to React", "Components and hooks").await;
    seed_post(
        &state,
        author.id,
        category.id,
        "Frontend notes",
        "Why I picked REACT over Vue",
    )
    .await;
    seed_post(&state, author.id, category.id, "Backend notes", "Nothing relevant").await;
    let app = test_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/posts/search?q=react").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    let posts = body["data"]["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(posts[0]["title"], "Frontend notes");
}

#[actix_web::test]
async fn test_search_requires_query() {
    let state = test_state();
    let app = test_app!(state);

    for uri in ["/api/posts/search", "/api/posts/search?q=%20%20"] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Search query is required");
    }
}

#[actix_web::test]
async fn test_add_comment() {
    let state = test_state();
    let (author, _) = seed_user(&state, "Jane").await;
    let (reader, reader_token) = seed_user(&state, "Sam").await;
    let category = seed_category(&state, "Rust").await;
    let post = seed_post(&state, author.id, category.id, "Commented", "Body of the post").await;
    let app = test_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{}/comments", post.id))
            .insert_header(bearer(&reader_token))
            .set_json(json!({"content": "  Great read  "}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Comment added successfully");
    let comments = body["data"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["content"], "Great read");
    assert_eq!(comments[0]["user"]["name"], "Sam");

    let stored = state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.comments[0].user_id, reader.id);
}

#[actix_web::test]
async fn test_concurrent_views_and_comments_are_all_kept() {
    let state = test_state();
    let (author, author_token) = seed_user(&state, "Jane").await;
    let (_, reader_token) = seed_user(&state, "Sam").await;
    let category = seed_category(&state, "Rust").await;
    let post = seed_post(&state, author.id, category.id, "Busy Post", "Body of the post").await;
    let app = test_app!(state);

    let post_uri = format!("/api/posts/{}", post.id);
    let comments_uri = format!("{post_uri}/comments");
    let comment = |content: &str| {
        test::TestRequest::post()
            .uri(&comments_uri)
            .insert_header(bearer(&reader_token))
            .set_json(json!({ "content": content }))
            .to_request()
    };
    let view = || test::TestRequest::get().uri(&post_uri).to_request();

    let (first, viewed, second, viewed_again) = tokio::join!(
        test::call_service(&app, comment("First!")),
        test::call_service(&app, view()),
        test::call_service(&app, comment("Second!")),
        test::call_service(&app, view()),
    );
    for res in [first, viewed, second, viewed_again] {
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&post_uri)
            .insert_header(bearer(&author_token))
            .set_json(json!({"title": "Edited Busy Post"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let stored = state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Edited Busy Post");
    assert_eq!(stored.view_count, 2);
    let mut contents: Vec<_> = stored.comments.iter().map(|c| c.content.as_str()).collect();
    contents.sort_unstable();
    assert_eq!(contents, vec!["First!", "Second!"]);
}

#[actix_web::test]
async fn test_view_keeps_comment_written_after_lookup() {
    let state = test_state();
    let (author, _) = seed_user(&state, "Jane").await;
    let category = seed_category(&state, "Rust").await;
    let post = seed_post(&state, author.id, category.id, "Late Comment", "Body of the post").await;

    // A comment stored straight through the repository, as a parallel request would.
    let comment = Comment::new(author.id, "Written meanwhile".to_string());
    state.posts.push_comment(post.id, comment.clone()).await.unwrap();

    let app = test_app!(state);
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{}", post.id))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["viewCount"], 1);
    assert_eq!(body["data"]["comments"][0]["content"], "Written meanwhile");

    let stored = state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.comments, vec![comment]);
}

#[actix_web::test]
async fn test_empty_comment_is_rejected() {
    let state = test_state();
    let (author, token) = seed_user(&state, "Jane").await;
    let category = seed_category(&state, "Rust").await;
    let post = seed_post(&state, author.id, category.id, "Quiet post", "Body of the post").await;
    let app = test_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{}/comments", post.id))
            .insert_header(bearer(&token))
            .set_json(json!({"content": "   "}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["errors"][0]["field"], "content");
}

#[actix_web::test]
async fn test_protected_routes_require_token() {
    let state = test_state();
    let app = test_app!(state);
    let id = Uuid::new_v4();

    let requests = vec![
        test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({}))
            .to_request(),
        test::TestRequest::put()
            .uri(&format!("/api/posts/{id}"))
            .set_json(json!({}))
            .to_request(),
        test::TestRequest::delete()
            .uri(&format!("/api/posts/{id}"))
            .to_request(),
        test::TestRequest::post()
            .uri(&format!("/api/posts/{id}/comments"))
            .set_json(json!({"content": "hi"}))
            .to_request(),
        test::TestRequest::get().uri("/api/auth/me").to_request(),
    ];

    for req in requests {
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Not authorized, no token");
    }
}

#[actix_web::test]
async fn test_invalid_token_is_unauthorized() {
    let state = test_state();
    let app = test_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer("not.a.jwt"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_signup_login_and_me() {
    let state = test_state();
    let app = test_app!(state);

    let signup = || {
        test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({
                "name": "Jane Doe",
                "email": "Jane@Example.com",
                "password": "correct horse",
            }))
            .to_request()
    };

    let res = test::call_service(&app, signup()).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["user"]["email"], "jane@example.com");
    assert_eq!(body["data"]["user"]["role"], "user");
    assert!(body["data"]["user"].get("passwordHash").is_none());

    let res = test::call_service(&app, signup()).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "jane@example.com", "password": "wrong password"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Invalid credentials");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "jane@example.com", "password": "correct horse"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["tokenType"], "Bearer");
    assert_eq!(body["data"]["expiresIn"], 24 * 3600);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["name"], "Jane Doe");
}

#[actix_web::test]
async fn test_register_alias_validates() {
    let state = test_state();
    let app = test_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"name": "J", "email": "nope", "password": "short"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn test_unknown_api_route() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/nope")
            .insert_header(("X-Request-ID", "trace-42"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers().get("x-request-id").unwrap(), "trace-42");

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"success": false, "message": "Route not found"}));
}

#[actix_web::test]
async fn test_handler_errors_carry_request_id_header() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/posts/missing").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let header = res.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(Uuid::parse_str(header).is_ok());

    let body: Value = test::read_body_json(res).await;
    assert!(body.get("requestId").is_none());
}
