//! 토큰 발급/검증.
//!
//! 대칭 시크릿으로 서명된 시간 제한 bearer 토큰을 발급하고 검증합니다.
//! 검증은 무상태입니다: 서버 측 세션 저장소가 없고, 만료는 주입된
//! 시계와의 시간 비교만으로 결정됩니다. 폐기(revocation) 경로는 없습니다.

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::Role;
use crate::clock::Clock;

/// 토큰 페이로드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 계정 이메일
    pub sub: String,
    /// 역할
    pub role: Role,
    /// 발급 시각 (Unix timestamp)
    pub iat: i64,
    /// 만료 시각 (Unix timestamp)
    pub exp: i64,
    /// 토큰 고유 식별자
    pub jti: String,
}

/// 발급된 토큰 묶음.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct IssuedToken {
    /// 인코딩된 토큰
    pub token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
    /// 만료까지 남은 시간 (초)
    pub expires_in: i64,
}

/// 토큰 에러.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("서명이 유효하지 않습니다")]
    InvalidSignature,
    #[error("잘못된 토큰 형식")]
    Malformed,
}

/// 토큰 서비스.
///
/// 시크릿은 설정에서 주입되며, 비어 있는 시크릿은 기동 단계에서
/// 이미 거부됩니다 (`AppConfig::validate`).
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// 새 토큰 서비스 생성.
    pub fn new(secret: &SecretString, validity_minutes: i64, clock: Arc<dyn Clock>) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret_bytes),
            decoding: DecodingKey::from_secret(secret_bytes),
            validity: Duration::minutes(validity_minutes),
            clock,
        }
    }

    /// 토큰 유효 기간 (초).
    pub fn validity_secs(&self) -> i64 {
        self.validity.num_seconds()
    }

    /// subject와 역할을 주장하는 토큰 발급.
    ///
    /// 주입된 시계의 현재 시각부터 유효 기간 동안 유효합니다.
    pub fn issue(&self, subject: &str, role: Role) -> Result<IssuedToken, TokenError> {
        let now = self.clock.now();
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding)?;
        Ok(IssuedToken {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.validity.num_seconds(),
        })
    }

    /// 토큰 검증.
    ///
    /// 서명 무결성을 먼저 확인한 뒤, 만료는 주입된 시계와 비교합니다.
    /// jsonwebtoken의 내장 exp 검증은 시스템 시계에 묶여 있으므로
    /// 비활성화하고 직접 비교합니다.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e
            .kind()
        {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })?;

        if self.clock.now().timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::Utc;

    fn service_with_clock(clock: Arc<FixedClock>) -> TokenService {
        let secret = SecretString::from("test-secret-key-for-tokens-minimum-32-chars".to_string());
        TokenService::new(&secret, 60, clock)
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let clock = Arc::new(FixedClock::at(Utc::now()));
        let service = service_with_clock(clock.clone());

        let issued = service.issue("hong@example.com", Role::User).unwrap();
        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 3600);

        // 30분 후에도 유효
        clock.advance(Duration::minutes(30));
        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "hong@example.com");
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn test_expired_token_rejected() {
        let clock = Arc::new(FixedClock::at(Utc::now()));
        let service = service_with_clock(clock.clone());

        let issued = service.issue("hong@example.com", Role::User).unwrap();

        // 2시간 후에는 만료
        clock.advance(Duration::hours(2));
        assert!(matches!(
            service.verify(&issued.token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let clock = Arc::new(FixedClock::at(Utc::now()));
        let service = service_with_clock(clock.clone());
        let issued = service.issue("hong@example.com", Role::Admin).unwrap();

        let other_secret =
            SecretString::from("another-secret-key-for-tokens-32-chars!".to_string());
        let other = TokenService::new(&other_secret, 60, clock);
        assert!(matches!(
            other.verify(&issued.token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let clock = Arc::new(FixedClock::at(Utc::now()));
        let service = service_with_clock(clock);
        assert!(matches!(
            service.verify("not.a.token"),
            Err(TokenError::Malformed)
        ));
    }
}
