//! # Account Core
//!
//! 계정 & 인가 핵심을 제공합니다:
//! - 계정 도메인 모델과 잔고 불변식
//! - 비밀번호 해싱, 토큰 발급/검증, 인가 게이트
//! - 저장소 추상화와 인메모리 구현
//! - 비즈니스 작업을 묶는 `AccountService`
//! - 설정 관리, 로깅 인프라

pub mod auth;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod service;
pub mod store;

pub use auth::*;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use service::{AccountService, CreatedAccount};
pub use store::{AccountStore, MemoryStore};
