//! 계정 서비스의 에러 타입.
//!
//! 이 모듈은 계정 서비스 전반에서 사용되는 에러 분류를 정의합니다.
//! 모든 실패는 기계적으로 구분 가능한 변형으로 표현되며,
//! 내부 상태(해시 값, 스택 트레이스)는 메시지에 포함하지 않습니다.

use thiserror::Error;

/// 핵심 계정 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러 (기동 시 치명적)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 권한 없음 (게이트 거부)
    #[error("권한 없음: {0}")]
    Unauthorized(String),

    /// 대상 없음 (id/email 조회 실패)
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 중복 충돌 (이메일 유일성 위반)
    #[error("충돌: {0}")]
    Conflict(String),

    /// 잘못된 입력 (검증 실패, 잔고 부족 포함)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 일시적 사용 불가 (저장소 타임아웃 등, 재시도 가능)
    #[error("일시적 사용 불가: {0}")]
    Unavailable(String),

    /// 내부 에러 (예기치 않은 결함)
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 계정 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Unavailable(_))
    }

    /// 치명적인 에러인지 확인합니다.
    pub fn is_critical(&self) -> bool {
        matches!(self, CoreError::Config(_) | CoreError::Internal(_))
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // 첫 번째 필드 에러만 메시지로 노출 (어떤 필드인지 알 수 있도록)
        let detail = errors
            .field_errors()
            .iter()
            .next()
            .map(|(field, errs)| {
                let kind = errs
                    .first()
                    .map(|e| e.code.to_string())
                    .unwrap_or_else(|| "invalid".to_string());
                format!("{field} ({kind})")
            })
            .unwrap_or_else(|| "요청 본문".to_string());
        CoreError::InvalidInput(format!("유효하지 않은 필드: {detail}"))
    }
}
