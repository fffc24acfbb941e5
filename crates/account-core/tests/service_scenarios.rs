//! 계정 서비스 시나리오 테스트.
//!
//! 관리자 생성/입금 → 로그인 → 이체 흐름과, 동시 이체에서의
//! 원자성/보존 법칙을 검증합니다.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use account_core::{
    Account, AccountService, AccountStore, Caller, CoreError, CoreResult, DepositRequest,
    FixedClock, LoginRequest, MemoryStore, NewAccount, TokenService, TransferRequest,
};

fn secret(s: &str) -> secrecy::SecretString {
    secrecy::SecretString::from(s.to_string())
}

struct Harness {
    service: AccountService,
    store: Arc<MemoryStore>,
}

fn harness() -> Harness {
    let clock = Arc::new(FixedClock::at(Utc::now()));
    let tokens = Arc::new(TokenService::new(
        &secret("scenario-test-jwt-secret-minimum-32-chars"),
        60,
        clock,
    ));
    let store = Arc::new(MemoryStore::new());
    let service = AccountService::new(store.clone(), tokens, Duration::from_secs(2), 8);
    Harness { service, store }
}

fn new_account(name: &str, email: &str) -> NewAccount {
    NewAccount {
        name: name.to_string(),
        email: email.to_string(),
        phone_number: "010-1234-5678".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1992, 8, 15).unwrap(),
        password: "password1".to_string(),
    }
}

#[tokio::test]
async fn admin_flow_then_transfer_scenario() {
    let h = harness();
    let admin = Caller::Admin;

    // E1 생성 (잔고 0) → 입금 100
    let e1 = h
        .service
        .create(&admin, new_account("E1", "e1@example.com"))
        .await
        .unwrap();
    assert_eq!(e1.account.balance, Decimal::ZERO);

    let balance = h
        .service
        .deposit(
            &admin,
            DepositRequest {
                account_id: e1.account.id,
                amount: dec!(100),
            },
        )
        .await
        .unwrap();
    assert_eq!(balance, dec!(100));

    // E2 생성 (잔고 0)
    let e2 = h
        .service
        .create(&admin, new_account("E2", "e2@example.com"))
        .await
        .unwrap();

    // E1으로 로그인
    let token = h
        .service
        .login(LoginRequest {
            email: "e1@example.com".to_string(),
            password: "password1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(token.token_type, "Bearer");

    // E1 → E2로 40 이체
    let e1_caller = Caller::User("e1@example.com".to_string());
    let new_balance = h
        .service
        .transfer(
            &e1_caller,
            TransferRequest {
                receiver_id: e2.account.id,
                amount: dec!(40),
            },
        )
        .await
        .unwrap();
    assert_eq!(new_balance, dec!(60));

    let listed = h.service.list(&admin).await.unwrap();
    assert_eq!(listed[0].balance, dec!(60));
    assert_eq!(listed[1].balance, dec!(40));

    // 잔고를 초과하는 이체는 거부되고 잔고는 그대로
    let err = h
        .service
        .transfer(
            &e1_caller,
            TransferRequest {
                receiver_id: e2.account.id,
                amount: dec!(1000),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));

    let listed = h.service.list(&admin).await.unwrap();
    assert_eq!(listed[0].balance, dec!(60));
    assert_eq!(listed[1].balance, dec!(40));
}

#[tokio::test]
async fn duplicate_email_returns_conflict_without_insert() {
    let h = harness();
    let admin = Caller::Admin;

    h.service
        .create(&admin, new_account("첫번째", "same@example.com"))
        .await
        .unwrap();

    let err = h
        .service
        .create(&admin, new_account("두번째", "same@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));
    assert_eq!(h.store.len().await, 1);
}

#[tokio::test]
async fn admin_operations_rejected_for_non_admin_without_side_effect() {
    let h = harness();
    let anonymous = Caller::Anonymous;
    let user = Caller::User("someone@example.com".to_string());

    for caller in [&anonymous, &user] {
        let err = h
            .service
            .create(caller, new_account("침입자", "intruder@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized(_)));

        assert!(matches!(
            h.service.list(caller).await.unwrap_err(),
            CoreError::Unauthorized(_)
        ));
        assert!(matches!(
            h.service
                .deposit(
                    caller,
                    DepositRequest {
                        account_id: Uuid::new_v4(),
                        amount: dec!(10),
                    }
                )
                .await
                .unwrap_err(),
            CoreError::Unauthorized(_)
        ));
        assert!(matches!(
            h.service.delete(caller, Uuid::new_v4()).await.unwrap_err(),
            CoreError::Unauthorized(_)
        ));
    }

    // 어떤 거부도 상태를 바꾸지 않음
    assert!(h.store.is_empty().await);

    // 익명 이체 역시 동일하게 거부
    let err = h
        .service
        .transfer(
            &anonymous,
            TransferRequest {
                receiver_id: Uuid::new_v4(),
                amount: dec!(1),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Unauthorized(_)));
}

#[tokio::test]
async fn login_failure_does_not_reveal_account_existence() {
    let h = harness();
    h.service
        .create(&Caller::Admin, new_account("회원", "member@example.com"))
        .await
        .unwrap();

    let unknown = h
        .service
        .login(LoginRequest {
            email: "ghost@example.com".to_string(),
            password: "password1".to_string(),
        })
        .await
        .unwrap_err();
    let wrong = h
        .service
        .login(LoginRequest {
            email: "member@example.com".to_string(),
            password: "wrongpass1".to_string(),
        })
        .await
        .unwrap_err();

    match (unknown, wrong) {
        (CoreError::Unauthorized(a), CoreError::Unauthorized(b)) => assert_eq!(a, b),
        other => panic!("Unexpected variants: {other:?}"),
    }
}

#[tokio::test]
async fn deposit_rejects_non_positive_amount() {
    let h = harness();
    let admin = Caller::Admin;
    let created = h
        .service
        .create(&admin, new_account("잔고", "balance@example.com"))
        .await
        .unwrap();

    for amount in [dec!(0), dec!(-5)] {
        let err = h
            .service
            .deposit(
                &admin,
                DepositRequest {
                    account_id: created.account.id,
                    amount,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    let listed = h.service.list(&admin).await.unwrap();
    assert_eq!(listed[0].balance, Decimal::ZERO);
}

#[tokio::test]
async fn self_transfer_rejected() {
    let h = harness();
    let admin = Caller::Admin;
    let created = h
        .service
        .create(&admin, new_account("본인", "self@example.com"))
        .await
        .unwrap();
    h.service
        .deposit(
            &admin,
            DepositRequest {
                account_id: created.account.id,
                amount: dec!(100),
            },
        )
        .await
        .unwrap();

    let err = h
        .service
        .transfer(
            &Caller::User("self@example.com".to_string()),
            TransferRequest {
                receiver_id: created.account.id,
                amount: dec!(10),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_alternating_transfers_conserve_total() {
    let h = harness();
    let admin = Caller::Admin;

    let a = h
        .service
        .create(&admin, new_account("A", "a@example.com"))
        .await
        .unwrap();
    let b = h
        .service
        .create(&admin, new_account("B", "b@example.com"))
        .await
        .unwrap();
    for id in [a.account.id, b.account.id] {
        h.service
            .deposit(
                &admin,
                DepositRequest {
                    account_id: id,
                    amount: dec!(100),
                },
            )
            .await
            .unwrap();
    }

    let service = Arc::new(h.service);
    let mut handles = Vec::new();
    for i in 0..50 {
        let service = service.clone();
        // 방향을 번갈아 가며 같은 계정 쌍을 두드림
        let (subject, receiver) = if i % 2 == 0 {
            ("a@example.com".to_string(), b.account.id)
        } else {
            ("b@example.com".to_string(), a.account.id)
        };
        handles.push(tokio::spawn(async move {
            let _ = service
                .transfer(
                    &Caller::User(subject),
                    TransferRequest {
                        receiver_id: receiver,
                        amount: dec!(3),
                    },
                )
                .await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let listed = service.list(&admin).await.unwrap();
    let total: Decimal = listed.iter().map(|a| a.balance).sum();
    assert_eq!(total, dec!(200));
    for account in &listed {
        assert!(account.balance >= Decimal::ZERO);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_drain_never_overdraws() {
    let h = harness();
    let admin = Caller::Admin;

    let a = h
        .service
        .create(&admin, new_account("A", "a@example.com"))
        .await
        .unwrap();
    let b = h
        .service
        .create(&admin, new_account("B", "b@example.com"))
        .await
        .unwrap();
    h.service
        .deposit(
            &admin,
            DepositRequest {
                account_id: a.account.id,
                amount: dec!(10),
            },
        )
        .await
        .unwrap();

    // 잔고 10을 놓고 1씩 이체를 30번 동시 시도: 정확히 10번만 성공해야 함
    let service = Arc::new(h.service);
    let mut handles = Vec::new();
    for _ in 0..30 {
        let service = service.clone();
        let receiver = b.account.id;
        handles.push(tokio::spawn(async move {
            service
                .transfer(
                    &Caller::User("a@example.com".to_string()),
                    TransferRequest {
                        receiver_id: receiver,
                        amount: dec!(1),
                    },
                )
                .await
                .is_ok()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }
    assert_eq!(successes, 10);

    let listed = service.list(&admin).await.unwrap();
    assert_eq!(listed[0].balance, dec!(0));
    assert_eq!(listed[1].balance, dec!(10));
}

/// 모든 호출이 응답하지 않는 저장소. 타임아웃 경로 검증용.
struct StalledStore;

#[async_trait]
impl AccountStore for StalledStore {
    async fn find_by_id(&self, _id: Uuid) -> CoreResult<Option<Account>> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(None)
    }
    async fn find_by_email(&self, _email: &str) -> CoreResult<Option<Account>> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(None)
    }
    async fn list(&self) -> CoreResult<Vec<Account>> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }
    async fn insert(&self, _account: Account) -> CoreResult<()> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
    async fn update(&self, _account: Account) -> CoreResult<()> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
    async fn delete(&self, _id: Uuid) -> CoreResult<()> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
    async fn credit(&self, _id: Uuid, _amount: Decimal) -> CoreResult<Decimal> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Decimal::ZERO)
    }
    async fn transfer(
        &self,
        _sender: Uuid,
        _receiver: Uuid,
        _amount: Decimal,
    ) -> CoreResult<Decimal> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Decimal::ZERO)
    }
}

#[tokio::test]
async fn stalled_store_surfaces_as_retryable_unavailable() {
    let clock = Arc::new(FixedClock::at(Utc::now()));
    let tokens = Arc::new(TokenService::new(
        &secret("scenario-test-jwt-secret-minimum-32-chars"),
        60,
        clock,
    ));
    let service = AccountService::new(
        Arc::new(StalledStore),
        tokens,
        Duration::from_millis(50),
        8,
    );

    let err = service.list(&Caller::Admin).await.unwrap_err();
    assert!(matches!(err, CoreError::Unavailable(_)));
    assert!(err.is_retryable());

    assert!(!service.store_healthy().await);
}
