//! 주입 가능한 시계.
//!
//! 토큰 만료가 순수한 시간 비교로 결정되므로, 시계를 trait으로 추상화해
//! 테스트에서 시간을 고정/전진시킬 수 있게 합니다.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// 현재 시각 제공자.
pub trait Clock: Send + Sync {
    /// 현재 시각을 반환합니다.
    fn now(&self) -> DateTime<Utc>;
}

/// 시스템 시계.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 테스트용 고정 시계.
///
/// `advance`로 시간을 임의로 전진시킬 수 있습니다.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// 주어진 시각으로 고정된 시계를 생성합니다.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// 시간을 전진시킵니다.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}
