//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! # 자동 생성 구조
//!
//! 각 라우트 모듈은 자체 스키마를 정의하고, 중앙 `ApiDoc`에서 집계합니다.
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use account_core::{
    AccountSummary, CreatedAccount, IssuedToken, LoginRequest, NewAccount, TransferRequest,
};

use crate::error::ApiErrorResponse;
use crate::routes::{
    AccountListResponse, BalanceResponse, ComponentHealth, ComponentStatus, DepositBody,
    HealthResponse, TransferResponse, UpdateAccountBody,
};

/// Account API 문서.
///
/// 모든 엔드포인트와 스키마를 포함하는 OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Account Service API",
        version = "0.1.0",
        description = r#"
# 계정 & 인가 REST API

계정 관리, 로그인, 잔고 이체를 위한 REST API입니다.

## 인증

`Authorization: Bearer <credential>` 헤더 하나로 두 종류의 자격증명을 받습니다:

- **관리자 시크릿**: 계정 CRUD와 입금에 필요
- **로그인 토큰**: 이체에 필요 (1시간 유효)

자격증명이 없거나 무효이면 익명 호출자로 취급되어 거부됩니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(
            name = "Account Service Team",
            url = "https://github.com/user/account-service"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "accounts", description = "계정 관리 - CRUD 및 입금 (관리자 전용)"),
        (name = "auth", description = "인증 - 로그인 및 토큰 발급"),
        (name = "transfers", description = "이체 - 계정 간 잔고 이동 (인증된 사용자)")
    ),
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,

            // ===== Accounts =====
            AccountSummary,
            NewAccount,
            CreatedAccount,
            IssuedToken,
            AccountListResponse,
            UpdateAccountBody,
            DepositBody,
            BalanceResponse,

            // ===== Auth =====
            LoginRequest,

            // ===== Transfers =====
            TransferRequest,
            TransferResponse,
        )
    ),
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Accounts =====
        crate::routes::accounts::list_accounts,
        crate::routes::accounts::create_account,
        crate::routes::accounts::update_account,
        crate::routes::accounts::delete_account,
        crate::routes::accounts::deposit,

        // ===== Auth =====
        crate::routes::auth::login,

        // ===== Transfers =====
        crate::routes::transfers::transfer,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Account Service API"));

        // 태그 확인
        assert!(json.contains("health"));
        assert!(json.contains("accounts"));
        assert!(json.contains("transfers"));

        // 경로 확인
        assert!(json.contains("/health"));
        assert!(json.contains("/api/v1/accounts"));
        assert!(json.contains("/api/v1/auth/login"));
        assert!(json.contains("/api/v1/transfers"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("AccountSummary"));
        assert!(json.contains("NewAccount"));
        assert!(json.contains("IssuedToken"));
        assert!(json.contains("ApiErrorResponse"));
    }
}
