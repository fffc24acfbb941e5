//! 계정 저장소 추상화.
//!
//! 영속 저장 엔진은 핵심의 범위 밖이므로, 핵심은 이 trait의 좁은
//! 인터페이스만 소비합니다. 잔고를 건드리는 연산(`credit`, `transfer`)은
//! 구현체가 원자성을 보장해야 합니다. 특히 `transfer`의 차감+가산은
//! 하나의 원자 단위이며, 부분 변이가 관찰되어서는 안 됩니다.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::Account;
use crate::error::CoreResult;

/// 계정 저장소.
///
/// 이메일 유일성은 이 계층이 최종 권위로 강제합니다. 서비스 계층의
/// 사전 조회는 친절한 에러 메시지를 위한 최적화일 뿐입니다.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// id로 계정 조회.
    async fn find_by_id(&self, id: Uuid) -> CoreResult<Option<Account>>;

    /// 이메일로 계정 조회.
    async fn find_by_email(&self, email: &str) -> CoreResult<Option<Account>>;

    /// 생성 순서대로 모든 계정 조회.
    async fn list(&self) -> CoreResult<Vec<Account>>;

    /// 새 계정 삽입. 이메일 중복 시 `Conflict`.
    async fn insert(&self, account: Account) -> CoreResult<()>;

    /// 기존 계정의 가변 필드 덮어쓰기. 대상 없음은 `NotFound`,
    /// 변경된 이메일이 다른 계정과 충돌하면 `Conflict`.
    ///
    /// 잔고와 생성 시각은 저장소가 보존합니다. 전달된 스냅샷의 잔고는
    /// 낡았을 수 있으며, 잔고를 바꾸는 경로는 `credit`/`transfer`뿐입니다.
    async fn update(&self, account: Account) -> CoreResult<()>;

    /// 계정 영구 삭제. 대상 없음은 `NotFound`.
    async fn delete(&self, id: Uuid) -> CoreResult<()>;

    /// 단일 계정 잔고에 금액을 더합니다 (원자적).
    ///
    /// 결과 잔고가 음수가 되는 변이는 `InvalidInput`으로 거부됩니다.
    /// 새 잔고를 반환합니다.
    async fn credit(&self, id: Uuid, amount: Decimal) -> CoreResult<Decimal>;

    /// 보내는 계정에서 받는 계정으로 금액을 이동합니다 (원자적).
    ///
    /// 잔고 확인과 두 잔고 변이가 하나의 임계 구역 안에서 일어나며,
    /// 동시 이체가 잔고를 음수로 몰고 갈 수 없습니다.
    /// 보내는 계정의 새 잔고를 반환합니다.
    async fn transfer(&self, sender: Uuid, receiver: Uuid, amount: Decimal)
        -> CoreResult<Decimal>;
}
