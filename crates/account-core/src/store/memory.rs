//! 인메모리 계정 저장소.
//!
//! 계정별 `Arc<Mutex<Account>>` 항목을 유지하고, 이체 시 두 계정의
//! 뮤텍스를 id 오름차순으로 획득합니다. 반대 방향의 두 이체가 같은
//! 계정 쌍을 서로 다른 순서로 참조해도 교착이 발생하지 않습니다.
//!
//! 락 규율: 계정 뮤텍스를 쥔 채로 맵 락(RwLock)을 기다리는 경로는
//! 존재하지 않습니다. 맵 락을 쥔 채 계정 뮤텍스를 기다리는 것은
//! 허용됩니다 (뮤텍스 보유자는 맵 락 없이 완료되므로).

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::AccountStore;
use crate::domain::Account;
use crate::error::{CoreError, CoreResult};

struct Entry {
    /// 삽입 순번. `list`의 생성 순 정렬 기준입니다.
    seq: u64,
    account: Arc<Mutex<Account>>,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<Uuid, Entry>,
    /// 이메일 유일성의 최종 권위 인덱스.
    email_index: HashMap<String, Uuid>,
    next_seq: u64,
}

/// 인메모리 저장소.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// 빈 저장소 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 계정 수.
    pub async fn len(&self) -> usize {
        self.inner.read().await.accounts.len()
    }

    /// 저장소가 비어 있는지 확인.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.accounts.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> CoreResult<Option<Account>> {
        let arc = {
            let inner = self.inner.read().await;
            inner.accounts.get(&id).map(|e| e.account.clone())
        };
        match arc {
            Some(arc) => Ok(Some(arc.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<Account>> {
        let arc = {
            let inner = self.inner.read().await;
            inner
                .email_index
                .get(email)
                .and_then(|id| inner.accounts.get(id))
                .map(|e| e.account.clone())
        };
        match arc {
            Some(arc) => Ok(Some(arc.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn list(&self) -> CoreResult<Vec<Account>> {
        let mut entries: Vec<(u64, Arc<Mutex<Account>>)> = {
            let inner = self.inner.read().await;
            inner
                .accounts
                .values()
                .map(|e| (e.seq, e.account.clone()))
                .collect()
        };
        entries.sort_by_key(|(seq, _)| *seq);

        let mut accounts = Vec::with_capacity(entries.len());
        for (_, arc) in entries {
            accounts.push(arc.lock().await.clone());
        }
        Ok(accounts)
    }

    async fn insert(&self, account: Account) -> CoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.email_index.contains_key(&account.email) {
            return Err(CoreError::Conflict(format!(
                "이미 사용 중인 이메일입니다: {}",
                account.email
            )));
        }
        if inner.accounts.contains_key(&account.id) {
            // id는 생성 시 한 번만 부여되므로 도달하면 결함
            return Err(CoreError::Internal(format!(
                "계정 id가 이미 존재합니다: {}",
                account.id
            )));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.email_index.insert(account.email.clone(), account.id);
        inner.accounts.insert(
            account.id,
            Entry {
                seq,
                account: Arc::new(Mutex::new(account)),
            },
        );
        Ok(())
    }

    async fn update(&self, account: Account) -> CoreResult<()> {
        let mut inner = self.inner.write().await;
        let arc = inner
            .accounts
            .get(&account.id)
            .map(|e| e.account.clone())
            .ok_or_else(|| {
                CoreError::NotFound(format!("계정을 찾을 수 없습니다: {}", account.id))
            })?;

        let mut current = arc.lock().await;
        if current.email != account.email {
            if let Some(existing) = inner.email_index.get(&account.email) {
                if *existing != account.id {
                    return Err(CoreError::Conflict(format!(
                        "이미 사용 중인 이메일입니다: {}",
                        account.email
                    )));
                }
            }
            inner.email_index.remove(&current.email);
            inner.email_index.insert(account.email.clone(), account.id);
        }

        // 잔고와 생성 시각의 권위는 뮤텍스 안의 현재 값. 호출자의
        // 스냅샷은 낡았을 수 있고 (재해싱 중 입금/이체 도착),
        // 잔고 변이는 credit/transfer만 할 수 있습니다.
        let balance = current.balance;
        let created_at = current.created_at;
        *current = account;
        current.balance = balance;
        current.created_at = created_at;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> CoreResult<()> {
        let mut inner = self.inner.write().await;
        let arc = inner
            .accounts
            .get(&id)
            .map(|e| e.account.clone())
            .ok_or_else(|| CoreError::NotFound(format!("계정을 찾을 수 없습니다: {}", id)))?;

        // 진행 중인 잔고 변이가 끝난 뒤에 제거
        let email = arc.lock().await.email.clone();
        inner.email_index.remove(&email);
        inner.accounts.remove(&id);
        Ok(())
    }

    async fn credit(&self, id: Uuid, amount: Decimal) -> CoreResult<Decimal> {
        let arc = {
            let inner = self.inner.read().await;
            inner
                .accounts
                .get(&id)
                .map(|e| e.account.clone())
                .ok_or_else(|| CoreError::NotFound(format!("계정을 찾을 수 없습니다: {}", id)))?
        };

        let mut account = arc.lock().await;
        let new_balance = account.balance + amount;
        if new_balance < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "잔고는 음수가 될 수 없습니다".to_string(),
            ));
        }
        account.balance = new_balance;
        Ok(new_balance)
    }

    async fn transfer(
        &self,
        sender: Uuid,
        receiver: Uuid,
        amount: Decimal,
    ) -> CoreResult<Decimal> {
        if sender == receiver {
            // 같은 뮤텍스를 두 번 잠그면 교착이므로 진입 전에 거부
            return Err(CoreError::InvalidInput(
                "자기 자신에게는 이체할 수 없습니다".to_string(),
            ));
        }

        let (sender_arc, receiver_arc) = {
            let inner = self.inner.read().await;
            let sender_arc = inner
                .accounts
                .get(&sender)
                .map(|e| e.account.clone())
                .ok_or_else(|| {
                    CoreError::NotFound(format!("보내는 계정을 찾을 수 없습니다: {}", sender))
                })?;
            let receiver_arc = inner
                .accounts
                .get(&receiver)
                .map(|e| e.account.clone())
                .ok_or_else(|| {
                    CoreError::NotFound(format!("받는 계정을 찾을 수 없습니다: {}", receiver))
                })?;
            (sender_arc, receiver_arc)
        };

        // id 오름차순으로 획득해 반대 방향 이체와의 교착 방지
        let (mut first, mut second) = if sender < receiver {
            let first = sender_arc.lock().await;
            let second = receiver_arc.lock().await;
            (first, second)
        } else {
            let second = receiver_arc.lock().await;
            let first = sender_arc.lock().await;
            (first, second)
        };
        let (sender_account, receiver_account) = (&mut *first, &mut *second);

        // 잔고 확인과 변이가 같은 임계 구역 안: 낡은 읽기 불가
        if sender_account.balance < amount {
            return Err(CoreError::InvalidInput(
                "잔고가 부족하여 이체할 수 없습니다".to_string(),
            ));
        }
        sender_account.balance -= amount;
        receiver_account.balance += amount;

        Ok(sender_account.balance)
    }
}
