//! 애플리케이션 공유 상태.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use account_core::{
    AccountService, AppConfig, AuthorizationGate, Clock, CoreResult, MemoryStore, SystemClock,
    TokenService,
};

/// 모든 핸들러가 공유하는 애플리케이션 상태.
#[derive(Clone)]
pub struct AppState {
    /// 계정 서비스
    pub service: Arc<AccountService>,
    /// 인가 게이트
    pub gate: Arc<AuthorizationGate>,
    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,
    /// 서버 버전
    pub version: String,
}

impl AppState {
    /// 설정에서 상태를 구성합니다. 시스템 시계를 사용합니다.
    pub fn from_config(config: &AppConfig) -> CoreResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// 주입된 시계로 상태를 구성합니다 (테스트용).
    pub fn with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> CoreResult<Self> {
        config.validate()?;

        let tokens = Arc::new(TokenService::new(
            &config.auth.jwt_secret,
            config.auth.token_validity_minutes,
            clock,
        ));
        let gate = Arc::new(AuthorizationGate::new(
            &config.auth.admin_secret,
            tokens.clone(),
        ));
        let service = Arc::new(AccountService::new(
            Arc::new(MemoryStore::new()),
            tokens,
            Duration::from_millis(config.store.op_timeout_ms),
            config.auth.min_password_length,
        ));

        Ok(Self {
            service,
            gate,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// 가동 시간 (초).
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
