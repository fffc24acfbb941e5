//! 인가 게이트.
//!
//! 인바운드 요청의 자격증명을 검사해 호출자를 분류합니다.
//! 게이트는 순수 분류기이며 부작용이 없습니다. 잘못된 형식의
//! 자격증명은 에러가 아니라 `Anonymous`로 가는 또 하나의 경로입니다.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::TokenService;

/// 분류된 호출자.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// 관리자 시크릿을 제시한 호출자
    Admin,
    /// 유효한 토큰을 제시한 사용자 (subject = 토큰의 이메일)
    User(String),
    /// 자격증명 없음 또는 무효
    Anonymous,
}

impl Caller {
    /// 관리자인지 확인.
    pub fn is_admin(&self) -> bool {
        matches!(self, Caller::Admin)
    }

    /// 사용자 subject 반환.
    pub fn subject(&self) -> Option<&str> {
        match self {
            Caller::User(subject) => Some(subject),
            _ => None,
        }
    }
}

/// 인가 게이트.
///
/// 관리자 시크릿은 SHA-256 다이제스트로 보관하고, 제시된 자격증명의
/// 다이제스트와 고정 길이 비교합니다. 원문 길이나 접두 일치 여부가
/// 비교 시간에 드러나지 않습니다.
pub struct AuthorizationGate {
    admin_digest: [u8; 32],
    tokens: Arc<TokenService>,
}

impl AuthorizationGate {
    /// 새 게이트 생성.
    pub fn new(admin_secret: &SecretString, tokens: Arc<TokenService>) -> Self {
        let admin_digest = Sha256::digest(admin_secret.expose_secret().as_bytes()).into();
        Self {
            admin_digest,
            tokens,
        }
    }

    /// 요청의 authorization 헤더 값으로 호출자를 분류합니다.
    ///
    /// 1. `Bearer ` 스킴 접두사를 제거
    /// 2. 관리자 시크릿과 일치하면 `Admin`
    /// 3. 토큰 검증에 성공하면 `User(subject)`
    /// 4. 그 외는 모두 `Anonymous`
    pub fn classify(&self, authorization: Option<&str>) -> Caller {
        let Some(header) = authorization else {
            return Caller::Anonymous;
        };
        let Some(credential) = header.strip_prefix("Bearer ") else {
            return Caller::Anonymous;
        };
        let credential = credential.trim();
        if credential.is_empty() {
            return Caller::Anonymous;
        }

        let digest: [u8; 32] = Sha256::digest(credential.as_bytes()).into();
        if digest == self.admin_digest {
            return Caller::Admin;
        }

        match self.tokens.verify(credential) {
            Ok(claims) => Caller::User(claims.sub),
            Err(_) => Caller::Anonymous,
        }
    }
}
