//! AI drafting endpoint.

use actix_web::{HttpResponse, web};

use sparkblog_shared::ApiResponse;
use sparkblog_shared::dto::{GenerateRequest, GenerateResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/generate
pub async fn generate(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<GenerateRequest>,
) -> AppResult<HttpResponse> {
    let prompt = body.into_inner().prompt;
    if prompt.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Please enter a prompt for AI generation".to_string(),
        ));
    }

    tracing::debug!(owner_id = %identity.user_id, "Generating content");
    let content = state.generator.generate(&prompt).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(GenerateResponse { content })))
}
