//! 계정 서비스.
//!
//! 비즈니스 작업(list/create/update/delete/deposit/login/transfer)을
//! 저장소 + 비밀번호 해셔 + 토큰 서비스를 조합해 제공합니다.
//!
//! 모든 작업은 게이트의 verdict를 먼저 확인하며, 거부 시 어떤 부작용도
//! 없이 즉시 반환합니다. 승인 후에는 검증, 단일 원자 잔고 변이,
//! (login/create의 경우) 토큰 발급 순서로 진행합니다.

use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    hash_password, validate_password_strength, verify_password, Caller, IssuedToken, Role,
    TokenService,
};
use crate::domain::{
    Account, AccountSummary, DepositRequest, LoginRequest, NewAccount, TransferRequest,
    UpdateAccount,
};
use crate::error::{CoreError, CoreResult};
use crate::store::AccountStore;

/// 생성된 계정 + 발급 토큰.
#[derive(Debug, Clone, serde::Serialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CreatedAccount {
    /// 생성된 계정 요약
    pub account: AccountSummary,
    /// 새 계정 명의로 발급된 토큰
    #[serde(flatten)]
    pub token: IssuedToken,
}

/// 계정 서비스.
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    tokens: Arc<TokenService>,
    /// 저장소 호출 상한. 초과는 재시도 가능한 `Unavailable`.
    store_timeout: Duration,
    min_password_length: usize,
}

impl AccountService {
    /// 새 서비스 생성.
    pub fn new(
        store: Arc<dyn AccountStore>,
        tokens: Arc<TokenService>,
        store_timeout: Duration,
        min_password_length: usize,
    ) -> Self {
        Self {
            store,
            tokens,
            store_timeout,
            min_password_length,
        }
    }

    /// 저장소 호출을 타임아웃으로 감쌉니다.
    async fn timed<T>(
        &self,
        fut: impl std::future::Future<Output = CoreResult<T>>,
    ) -> CoreResult<T> {
        tokio::time::timeout(self.store_timeout, fut)
            .await
            .map_err(|_| CoreError::Unavailable("저장소 응답 시간 초과".to_string()))?
    }

    fn require_admin(caller: &Caller) -> CoreResult<()> {
        if caller.is_admin() {
            Ok(())
        } else {
            Err(CoreError::Unauthorized(
                "관리자 권한이 필요합니다".to_string(),
            ))
        }
    }

    /// 모든 계정 조회 (관리자 전용).
    ///
    /// 생성 순서대로, 비밀번호 해시를 제외한 요약만 반환합니다.
    pub async fn list(&self, caller: &Caller) -> CoreResult<Vec<AccountSummary>> {
        Self::require_admin(caller)?;
        let accounts = self.timed(self.store.list()).await?;
        Ok(accounts.iter().map(Account::summary).collect())
    }

    /// 계정 생성 (관리자 전용).
    ///
    /// 이메일 유일성은 저장소가 최종 강제하며, 여기서의 사전 조회는
    /// 친절한 `Conflict` 메시지를 위한 것입니다. 성공 시 새 계정
    /// 명의의 토큰을 함께 반환합니다.
    pub async fn create(&self, caller: &Caller, input: NewAccount) -> CoreResult<CreatedAccount> {
        Self::require_admin(caller)?;
        input.validate()?;
        validate_password_strength(&input.password, self.min_password_length)
            .map_err(CoreError::InvalidInput)?;

        if self
            .timed(self.store.find_by_email(&input.email))
            .await?
            .is_some()
        {
            return Err(CoreError::Conflict(format!(
                "이미 사용 중인 이메일입니다: {}",
                input.email
            )));
        }

        let password_hash =
            hash_password(&input.password).map_err(|e| CoreError::Internal(e.to_string()))?;
        let account = Account::new(&input, password_hash);
        let summary = account.summary();

        self.timed(self.store.insert(account)).await?;
        info!(account_id = %summary.id, "계정 생성됨");

        let token = self
            .tokens
            .issue(&summary.email, Role::User)
            .map_err(|e| CoreError::Internal(e.to_string()))?;

        Ok(CreatedAccount {
            account: summary,
            token,
        })
    }

    /// 계정 수정 (관리자 전용).
    ///
    /// 모든 가변 필드를 덮어쓰고, 비밀번호는 무조건 다시 해싱합니다.
    /// id, 잔고, 생성 시각은 보존됩니다.
    pub async fn update(&self, caller: &Caller, input: UpdateAccount) -> CoreResult<AccountSummary> {
        Self::require_admin(caller)?;
        input.validate()?;
        validate_password_strength(&input.password, self.min_password_length)
            .map_err(CoreError::InvalidInput)?;

        let existing = self
            .timed(self.store.find_by_id(input.id))
            .await?
            .ok_or_else(|| {
                CoreError::NotFound(format!("계정을 찾을 수 없습니다: {}", input.id))
            })?;

        let password_hash =
            hash_password(&input.password).map_err(|e| CoreError::Internal(e.to_string()))?;
        let updated = Account {
            id: existing.id,
            name: input.name,
            email: input.email,
            phone_number: input.phone_number,
            date_of_birth: input.date_of_birth,
            password_hash,
            balance: existing.balance,
            created_at: existing.created_at,
        };
        let summary = updated.summary();

        self.timed(self.store.update(updated)).await?;
        info!(account_id = %summary.id, "계정 수정됨");
        Ok(summary)
    }

    /// 계정 삭제 (관리자 전용). 즉시, 복구 불가.
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> CoreResult<()> {
        Self::require_admin(caller)?;
        self.timed(self.store.delete(id)).await?;
        info!(account_id = %id, "계정 삭제됨");
        Ok(())
    }

    /// 입금 (관리자 전용).
    ///
    /// 0 이하의 금액은 거부합니다. 음수 입금을 허용하면 하한 없는
    /// "관리자 차감"이 되므로, 명시적으로 막습니다. 새 잔고를 반환합니다.
    pub async fn deposit(&self, caller: &Caller, input: DepositRequest) -> CoreResult<Decimal> {
        Self::require_admin(caller)?;
        if input.amount <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "입금 금액은 0보다 커야 합니다".to_string(),
            ));
        }

        let balance = self
            .timed(self.store.credit(input.account_id, input.amount))
            .await?;
        info!(account_id = %input.account_id, "입금 완료");
        Ok(balance)
    }

    /// 로그인 (공개).
    ///
    /// 존재하지 않는 이메일과 틀린 비밀번호는 동일한 메시지로
    /// 거부합니다 (계정 존재 여부를 노출하지 않음).
    pub async fn login(&self, input: LoginRequest) -> CoreResult<IssuedToken> {
        input.validate()?;

        let account = self.timed(self.store.find_by_email(&input.email)).await?;
        let verified = account
            .as_ref()
            .map(|a| verify_password(&input.password, &a.password_hash).is_ok())
            .unwrap_or(false);
        if !verified {
            warn!("로그인 실패");
            return Err(CoreError::Unauthorized(
                "이메일 또는 비밀번호가 올바르지 않습니다".to_string(),
            ));
        }

        self.tokens
            .issue(&input.email, Role::User)
            .map_err(|e| CoreError::Internal(e.to_string()))
    }

    /// 이체 (인증된 사용자 전용).
    ///
    /// 보내는 계정은 verdict의 subject로 결정됩니다. 잔고 확인과
    /// 차감+가산은 저장소의 단일 원자 단위로 수행되며, 실패한 이체는
    /// 양쪽 잔고를 그대로 둡니다. 보내는 계정의 새 잔고를 반환합니다.
    pub async fn transfer(&self, caller: &Caller, input: TransferRequest) -> CoreResult<Decimal> {
        let subject = caller.subject().ok_or_else(|| {
            CoreError::Unauthorized("이체에는 로그인 토큰이 필요합니다".to_string())
        })?;

        let sender = self
            .timed(self.store.find_by_email(subject))
            .await?
            .ok_or_else(|| {
                CoreError::Unauthorized(
                    "보내는 계정을 확인할 수 없습니다. 다시 로그인해 주세요".to_string(),
                )
            })?;

        if input.amount <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "이체 금액은 0보다 커야 합니다".to_string(),
            ));
        }
        if sender.id == input.receiver_id {
            return Err(CoreError::InvalidInput(
                "자기 자신에게는 이체할 수 없습니다".to_string(),
            ));
        }

        let balance = self
            .timed(self.store.transfer(sender.id, input.receiver_id, input.amount))
            .await?;
        info!(sender_id = %sender.id, receiver_id = %input.receiver_id, "이체 완료");
        Ok(balance)
    }

    /// 저장소 응답 여부 확인 (readiness 체크용).
    pub async fn store_healthy(&self) -> bool {
        self.timed(self.store.list()).await.is_ok()
    }
}
