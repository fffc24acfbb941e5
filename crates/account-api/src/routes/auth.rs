//! 인증 API.
//!
//! 로그인 엔드포인트. 자격증명 검증에 성공하면 1시간 유효한
//! Bearer 토큰을 발급합니다.

use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

use account_core::{IssuedToken, LoginRequest};

use crate::error::ApiResult;
use crate::state::AppState;

/// 로그인.
///
/// 존재하지 않는 이메일과 틀린 비밀번호는 동일한 401로 거부됩니다.
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "발급된 토큰", body = IssuedToken),
        (status = 401, description = "이메일 또는 비밀번호 불일치", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(input): Json<LoginRequest>,
) -> ApiResult<Json<IssuedToken>> {
    let token = state.service.login(input).await?;
    Ok(Json(token))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}
