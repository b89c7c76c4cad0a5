//! Account handlers.

use actix_web::{HttpResponse, web};

use sparkblog_infra::SignedIn;
use sparkblog_shared::ApiResponse;
use sparkblog_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn auth_response(signed_in: SignedIn) -> AuthResponse {
    AuthResponse {
        access_token: signed_in.token,
        token_type: "Bearer".to_string(),
        expires_in: signed_in.expires_in.max(0) as u64,
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let signed_in = state.accounts.register(&req.email, &req.password).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(auth_response(signed_in))))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let signed_in = state.accounts.sign_in(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(auth_response(signed_in))))
}

/// GET /api/auth/me
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserResponse {
        id: identity.user_id,
        email: identity.email,
    })))
}
