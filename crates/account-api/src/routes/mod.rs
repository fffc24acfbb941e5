//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/accounts` - 계정 관리 (관리자 전용)
//! - `/api/v1/auth` - 로그인
//! - `/api/v1/transfers` - 이체 (인증된 사용자)

pub mod accounts;
pub mod auth;
pub mod health;
pub mod transfers;

pub use accounts::{
    accounts_router, AccountListResponse, BalanceResponse, DepositBody, UpdateAccountBody,
};
pub use auth::auth_router;
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use transfers::{transfers_router, TransferResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/api/v1/accounts", accounts_router())
        .nest("/api/v1/auth", auth_router())
        .nest("/api/v1/transfers", transfers_router())
}
