//! 계정 도메인 모델.
//!
//! 저장소가 소유하는 `Account` 레코드와, 외부로 반환되는
//! `AccountSummary`(비밀번호 해시 제외), 각 작업의 입력 타입을 정의합니다.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 계정 레코드.
///
/// 저장소만이 이 타입을 소유하며, `password_hash`는 절대 직렬화하여
/// 외부로 내보내지 않습니다. `id`는 생성 시 부여되고 이후 불변입니다.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    /// 로그인 식별자. 전체 계정에서 유일해야 합니다.
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    /// PasswordHasher의 불투명한 출력. 평문은 저장하지 않습니다.
    pub password_hash: String,
    /// 잔고. 핵심이 일으키는 어떤 변이로도 음수가 되어서는 안 됩니다.
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// 새 계정 레코드 생성. 잔고는 0으로 시작합니다.
    pub fn new(input: &NewAccount, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            email: input.email.clone(),
            phone_number: input.phone_number.clone(),
            date_of_birth: input.date_of_birth,
            password_hash,
            balance: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    /// 비밀번호 해시를 제외한 요약 투영.
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            date_of_birth: self.date_of_birth,
            balance: self.balance,
            created_at: self.created_at,
        }
    }
}

/// 계정 요약 (응답용 투영).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct AccountSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

/// 계정 생성 입력.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct NewAccount {
    /// 표시 이름 (비어 있으면 안 됨)
    #[validate(length(min = 1, message = "이름은 비어 있을 수 없습니다"))]
    pub name: String,
    /// 로그인 이메일
    #[validate(email(message = "유효한 이메일 형식이 아닙니다"))]
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    /// 평문 비밀번호. 해싱 후 즉시 폐기됩니다.
    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub password: String,
}

/// 계정 수정 입력.
///
/// 모든 가변 필드를 덮어쓰며, 비밀번호는 무조건 다시 해싱합니다.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct UpdateAccount {
    /// 대상 계정 id
    pub id: Uuid,
    #[validate(length(min = 1, message = "이름은 비어 있을 수 없습니다"))]
    pub name: String,
    #[validate(email(message = "유효한 이메일 형식이 아닙니다"))]
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub password: String,
}

/// 로그인 입력.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 형식이 아닙니다"))]
    pub email: String,
    #[validate(length(min = 1, message = "비밀번호가 비어 있습니다"))]
    pub password: String,
}

/// 입금 입력 (관리자 전용).
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct DepositRequest {
    /// 대상 계정 id
    pub account_id: Uuid,
    /// 입금 금액. 0 이하는 거부됩니다.
    pub amount: Decimal,
}

/// 이체 입력 (인증된 사용자 전용).
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct TransferRequest {
    /// 받는 계정 id
    pub receiver_id: Uuid,
    /// 이체 금액. 0 이하는 거부됩니다.
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn new_account_input() -> NewAccount {
        NewAccount {
            name: "홍길동".to_string(),
            email: "hong@example.com".to_string(),
            phone_number: "010-1234-5678".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 14).unwrap(),
            password: "password1".to_string(),
        }
    }

    #[test]
    fn test_new_account_starts_with_zero_balance() {
        let account = Account::new(&new_account_input(), "$argon2id$hash".to_string());
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.email, "hong@example.com");
    }

    #[test]
    fn test_summary_excludes_password_hash() {
        let account = Account::new(&new_account_input(), "$argon2id$hash".to_string());
        let summary = account.summary();
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_new_account_validation() {
        let mut input = new_account_input();
        assert!(input.validate().is_ok());

        input.email = "not-an-email".to_string();
        assert!(input.validate().is_err());

        input.email = "hong@example.com".to_string();
        input.name = String::new();
        assert!(input.validate().is_err());

        input.name = "홍길동".to_string();
        input.password = "short".to_string();
        assert!(input.validate().is_err());
    }
}
