//! 계정 서비스 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - Bearer 자격증명(관리자 시크릿 | 로그인 토큰) 분류
//! - 헬스 체크 엔드포인트
//! - OpenAPI 문서 및 Swagger UI
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`extract`]: 호출자 분류 추출기
//! - [`error`]: 통합 에러 응답
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod error;
pub mod extract;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use extract::CallerIdentity;
pub use routes::*;
pub use state::AppState;
