//! 인증 및 권한 부여.
//!
//! 이 모듈은 핵심의 인증 표면 전체를 제공합니다:
//!
//! - [`Role`]: 사용자 역할 (Admin, User)
//! - 비밀번호 해싱/검증 (Argon2id)
//! - [`TokenService`]: 서명된 시간 제한 토큰 발급/검증
//! - [`AuthorizationGate`]: 요청 자격증명을 Admin / User / Anonymous로 분류
//!
//! 게이트는 순수 분류기입니다. 엔드포인트별 정책(어떤 verdict가 어떤
//! 작업을 할 수 있는지)은 `AccountService`가 결정합니다.

mod gate;
mod password;
mod roles;
mod token;

pub use gate::{AuthorizationGate, Caller};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};
pub use roles::Role;
pub use token::{Claims, IssuedToken, TokenError, TokenService};
