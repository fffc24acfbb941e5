//! 잔고 불변식 속성 테스트.
//!
//! 임의의 입금/이체 시퀀스에 대해:
//! - 어떤 계정의 잔고도 음수로 관찰되지 않는다
//! - 성공한 입금의 합계가 전체 잔고 합계와 정확히 일치한다 (보존 법칙)

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

use account_core::{
    AccountService, Caller, DepositRequest, FixedClock, MemoryStore, NewAccount, TokenService,
    TransferRequest,
};

const ACCOUNT_EMAILS: [&str; 3] = ["p0@example.com", "p1@example.com", "p2@example.com"];

#[derive(Debug, Clone)]
enum Op {
    Deposit { target: usize, amount: u32 },
    Transfer { from: usize, to: usize, amount: u32 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize, 1..500u32).prop_map(|(target, amount)| Op::Deposit { target, amount }),
        (0..3usize, 0..3usize, 1..500u32)
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn no_sequence_of_operations_violates_balance_invariants(
        ops in proptest::collection::vec(op_strategy(), 1..40)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let clock = Arc::new(FixedClock::at(Utc::now()));
            let tokens = Arc::new(TokenService::new(
                &secrecy::SecretString::from("property-test-jwt-secret-32-chars!!".to_string()),
                60,
                clock,
            ));
            let service = AccountService::new(
                Arc::new(MemoryStore::new()),
                tokens,
                Duration::from_secs(2),
                8,
            );
            let admin = Caller::Admin;

            let mut ids = Vec::new();
            for (i, email) in ACCOUNT_EMAILS.iter().enumerate() {
                let created = service
                    .create(
                        &admin,
                        NewAccount {
                            name: format!("P{i}"),
                            email: email.to_string(),
                            phone_number: "010-0000-0000".to_string(),
                            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                            password: "password1".to_string(),
                        },
                    )
                    .await
                    .unwrap();
                ids.push(created.account.id);
            }

            let mut deposited_total = Decimal::ZERO;
            for op in ops {
                match op {
                    Op::Deposit { target, amount } => {
                        let amount = Decimal::from(amount);
                        if service
                            .deposit(
                                &admin,
                                DepositRequest {
                                    account_id: ids[target],
                                    amount,
                                },
                            )
                            .await
                            .is_ok()
                        {
                            deposited_total += amount;
                        }
                    }
                    Op::Transfer { from, to, amount } => {
                        // 이체는 실패해도 무방: 실패가 상태를 바꾸지 않는 것이 핵심
                        let _ = service
                            .transfer(
                                &Caller::User(ACCOUNT_EMAILS[from].to_string()),
                                TransferRequest {
                                    receiver_id: ids[to],
                                    amount: Decimal::from(amount),
                                },
                            )
                            .await;
                    }
                }

                // 매 연산 후 불변식 확인
                let listed = service.list(&admin).await.unwrap();
                for account in &listed {
                    prop_assert!(account.balance >= Decimal::ZERO);
                }
            }

            let listed = service.list(&admin).await.unwrap();
            let total: Decimal = listed.iter().map(|a| a.balance).sum();
            prop_assert_eq!(total, deposited_total);
            Ok(())
        })?;
    }
}
