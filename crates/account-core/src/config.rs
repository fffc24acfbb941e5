//! 설정 관리.
//!
//! 애플리케이션 설정을 정의하고 TOML 파일 + 환경 변수에서 로드합니다.
//! 시크릿(JWT 서명 키, 관리자 시크릿)은 `secrecy`로 감싸 로그/디버그
//! 출력에 노출되지 않도록 합니다.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 저장소 설정
    pub store: StoreConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// 인증 설정.
///
/// `jwt_secret`과 `admin_secret`은 반드시 설정 파일 또는 환경 변수
/// (`ACCOUNT__AUTH__JWT_SECRET`, `ACCOUNT__AUTH__ADMIN_SECRET`)로
/// 주입되어야 하며, 비어 있으면 기동이 실패합니다.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT 서명용 대칭 시크릿
    pub jwt_secret: SecretString,
    /// 관리자 작업용 사전 공급 시크릿
    pub admin_secret: SecretString,
    /// 토큰 유효 기간 (분)
    pub token_validity_minutes: i64,
    /// 비밀번호 최소 길이
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::from(String::new()),
            admin_secret: SecretString::from(String::new()),
            token_validity_minutes: 60,
            min_password_length: 8,
        }
    }
}

/// 저장소 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// 저장소 호출 타임아웃 (밀리초). 초과 시 재시도 가능한
    /// `Unavailable`로 표면화됩니다.
    pub op_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { op_timeout_ms: 2000 }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없어도 에러가 아니며, 환경 변수만으로도 구성할 수 있습니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드 (선택적)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("ACCOUNT")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// 기동 전 필수 검증.
    ///
    /// 시크릿이 비어 있으면 인증 게이트가 조용히 무력화되므로,
    /// 여기서 치명적 에러로 기동을 중단시킵니다.
    pub fn validate(&self) -> CoreResult<()> {
        if self.auth.jwt_secret.expose_secret().is_empty() {
            return Err(CoreError::Config(
                "jwt_secret이 비어 있습니다 (ACCOUNT__AUTH__JWT_SECRET 설정 필요)".to_string(),
            ));
        }
        if self.auth.admin_secret.expose_secret().is_empty() {
            return Err(CoreError::Config(
                "admin_secret이 비어 있습니다 (ACCOUNT__AUTH__ADMIN_SECRET 설정 필요)".to_string(),
            ));
        }
        if self.auth.token_validity_minutes <= 0 {
            return Err(CoreError::Config(
                "token_validity_minutes는 양수여야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}
