//! 계정 관리 API.
//!
//! 계정 CRUD와 입금 엔드포인트. 전부 관리자 전용이며, 호출자 분류는
//! `CallerIdentity` 추출기가, 거부는 서비스 계층이 담당합니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use account_core::{AccountSummary, CreatedAccount, DepositRequest, NewAccount, UpdateAccount};

use crate::error::ApiResult;
use crate::extract::CallerIdentity;
use crate::state::AppState;

/// 계정 목록 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountListResponse {
    /// 계정 요약 목록 (생성 순서)
    pub accounts: Vec<AccountSummary>,
    /// 전체 개수
    pub total: usize,
}

/// 계정 수정 요청 바디. 계정 id는 경로에서 받습니다.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAccountBody {
    /// 이름
    pub name: String,
    /// 이메일
    pub email: String,
    /// 전화번호
    pub phone_number: String,
    /// 생년월일
    pub date_of_birth: NaiveDate,
    /// 새 비밀번호 (무조건 다시 해싱됨)
    pub password: String,
}

/// 입금 요청 바디. 대상 계정 id는 경로에서 받습니다.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DepositBody {
    /// 입금 금액 (0보다 커야 함)
    pub amount: Decimal,
}

/// 잔고 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    /// 대상 계정 id
    pub account_id: Uuid,
    /// 변경 후 잔고
    pub balance: Decimal,
}

/// 계정 목록 조회.
///
/// GET /api/v1/accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    tag = "accounts",
    responses(
        (status = 200, description = "계정 목록", body = AccountListResponse),
        (status = 401, description = "관리자 권한 필요", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    CallerIdentity(caller): CallerIdentity,
) -> ApiResult<Json<AccountListResponse>> {
    let accounts = state.service.list(&caller).await?;
    let total = accounts.len();
    Ok(Json(AccountListResponse { accounts, total }))
}

/// 계정 생성.
///
/// 성공 시 새 계정 명의의 토큰을 함께 반환합니다.
/// POST /api/v1/accounts
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "accounts",
    request_body = NewAccount,
    responses(
        (status = 201, description = "생성된 계정 + 토큰", body = CreatedAccount),
        (status = 400, description = "입력 검증 실패", body = crate::error::ApiErrorResponse),
        (status = 409, description = "이메일 중복", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    CallerIdentity(caller): CallerIdentity,
    Json(input): Json<NewAccount>,
) -> ApiResult<(StatusCode, Json<CreatedAccount>)> {
    let created = state.service.create(&caller, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// 계정 수정.
///
/// PUT /api/v1/accounts/{id}
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{id}",
    tag = "accounts",
    params(("id" = Uuid, Path, description = "계정 id")),
    request_body = UpdateAccountBody,
    responses(
        (status = 200, description = "수정된 계정", body = AccountSummary),
        (status = 404, description = "계정 없음", body = crate::error::ApiErrorResponse),
        (status = 409, description = "이메일 중복", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAccountBody>,
) -> ApiResult<Json<AccountSummary>> {
    let input = UpdateAccount {
        id,
        name: body.name,
        email: body.email,
        phone_number: body.phone_number,
        date_of_birth: body.date_of_birth,
        password: body.password,
    };
    let summary = state.service.update(&caller, input).await?;
    Ok(Json(summary))
}

/// 계정 삭제. 즉시, 복구 불가.
///
/// DELETE /api/v1/accounts/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{id}",
    tag = "accounts",
    params(("id" = Uuid, Path, description = "계정 id")),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 404, description = "계정 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.service.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 입금.
///
/// POST /api/v1/accounts/{id}/deposit
#[utoipa::path(
    post,
    path = "/api/v1/accounts/{id}/deposit",
    tag = "accounts",
    params(("id" = Uuid, Path, description = "계정 id")),
    request_body = DepositBody,
    responses(
        (status = 200, description = "입금 후 잔고", body = BalanceResponse),
        (status = 400, description = "0 이하 금액", body = crate::error::ApiErrorResponse),
        (status = 404, description = "계정 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<Uuid>,
    Json(body): Json<DepositBody>,
) -> ApiResult<Json<BalanceResponse>> {
    let balance = state
        .service
        .deposit(
            &caller,
            DepositRequest {
                account_id: id,
                amount: body.amount,
            },
        )
        .await?;
    Ok(Json(BalanceResponse {
        account_id: id,
        balance,
    }))
}

/// 계정 라우터 생성.
pub fn accounts_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route("/{id}", axum::routing::put(update_account).delete(delete_account))
        .route("/{id}/deposit", post(deposit))
}
