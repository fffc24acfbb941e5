//! 이체 API.
//!
//! 인증된 사용자가 자기 계정에서 다른 계정으로 이체합니다.
//! 보내는 계정은 토큰의 subject로 결정되며 요청 바디로는 바꿀 수 없습니다.

use axum::{extract::State, routing::post, Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use account_core::TransferRequest;

use crate::error::ApiResult;
use crate::extract::CallerIdentity;
use crate::state::AppState;

/// 이체 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransferResponse {
    /// 이체 후 보내는 계정의 잔고
    pub balance: Decimal,
}

/// 이체.
///
/// POST /api/v1/transfers
#[utoipa::path(
    post,
    path = "/api/v1/transfers",
    tag = "transfers",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "이체 후 잔고", body = TransferResponse),
        (status = 400, description = "금액/대상 검증 실패 또는 잔고 부족", body = crate::error::ApiErrorResponse),
        (status = 401, description = "로그인 토큰 필요", body = crate::error::ApiErrorResponse),
        (status = 404, description = "받는 계정 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    CallerIdentity(caller): CallerIdentity,
    Json(input): Json<TransferRequest>,
) -> ApiResult<Json<TransferResponse>> {
    let balance = state.service.transfer(&caller, input).await?;
    Ok(Json(TransferResponse { balance }))
}

/// 이체 라우터 생성.
pub fn transfers_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(transfer))
}
