//! HTTP handlers and route configuration.

mod auth;
mod generate;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Owner-scoped posts
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            )
            .route("/generate", web::post().to(generate::generate)),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use async_trait::async_trait;
    use serde_json::json;

    use sparkblog_core::ports::{GenerateError, TextGenerator};
    use sparkblog_infra::TemplateGenerator;
    use sparkblog_shared::ApiResponse;
    use sparkblog_shared::dto::{AuthResponse, GenerateResponse, PostResponse, UserResponse};

    use super::configure_routes;
    use crate::state::AppState;

    struct OfflineGenerator;

    #[async_trait]
    impl TextGenerator for OfflineGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            Err(GenerateError::Upstream("model offline".to_string()))
        }
    }

    fn template_state() -> AppState {
        AppState::in_memory(Arc::new(TemplateGenerator))
    }

    async fn token_for(state: &AppState, email: &str) -> String {
        state
            .accounts
            .register(email, "correct horse")
            .await
            .unwrap()
            .token
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(template_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_register_then_me() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(template_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "email": "ada@example.com", "password": "correct horse" }))
            .to_request();
        let auth: ApiResponse<AuthResponse> = test::call_and_read_body_json(&app, req).await;
        let auth = auth.into_data().unwrap();
        assert_eq!(auth.token_type, "Bearer");

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&auth.access_token))
            .to_request();
        let me: ApiResponse<UserResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(me.into_data().unwrap().email, "ada@example.com");
    }

    #[actix_web::test]
    async fn test_short_password_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(template_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "email": "ada@example.com", "password": "short" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_posts_require_a_token() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(template_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_create_update_list_delete() {
        let state = template_state();
        let token = token_for(&state, "ada@example.com").await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "Rust", "content": "Ownership", "topic": " " }))
            .to_request();
        let created: ApiResponse<PostResponse> = test::call_and_read_body_json(&app, req).await;
        let created = created.into_data().unwrap();
        assert_eq!(created.topic, None);

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", created.id))
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "Rust 2", "content": "Borrowing", "topic": "lang" }))
            .to_request();
        let updated: ApiResponse<PostResponse> = test::call_and_read_body_json(&app, req).await;
        let updated = updated.into_data().unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Rust 2");
        assert_eq!(updated.created_at, created.created_at);

        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .to_request();
        let listed: ApiResponse<Vec<PostResponse>> =
            test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.into_data().unwrap().len(), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", created.id))
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .to_request();
        let listed: ApiResponse<Vec<PostResponse>> =
            test::call_and_read_body_json(&app, req).await;
        assert!(listed.into_data().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_blank_title_is_bad_request() {
        let state = template_state();
        let token = token_for(&state, "ada@example.com").await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "   ", "content": "Body" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_foreign_post_is_not_found() {
        let state = template_state();
        let ada = token_for(&state, "ada@example.com").await;
        let bob = token_for(&state, "bob@example.com").await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&ada))
            .set_json(json!({ "title": "Mine", "content": "Private" }))
            .to_request();
        let created: ApiResponse<PostResponse> = test::call_and_read_body_json(&app, req).await;
        let id = created.into_data().unwrap().id;

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{id}"))
            .insert_header(bearer(&bob))
            .set_json(json!({ "title": "Stolen", "content": "Mine now" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{id}"))
            .insert_header(bearer(&bob))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn test_generate_uses_template() {
        let state = template_state();
        let token = token_for(&state, "ada@example.com").await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .insert_header(bearer(&token))
            .set_json(json!({ "prompt": "Tide pools" }))
            .to_request();
        let body: ApiResponse<GenerateResponse> = test::call_and_read_body_json(&app, req).await;

        assert!(body.into_data().unwrap().content.starts_with("# Tide pools"));
    }

    #[actix_web::test]
    async fn test_generator_failure_is_bad_gateway() {
        let state = AppState::in_memory(Arc::new(OfflineGenerator));
        let token = token_for(&state, "ada@example.com").await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .insert_header(bearer(&token))
            .set_json(json!({ "prompt": "Tide pools" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }
}
