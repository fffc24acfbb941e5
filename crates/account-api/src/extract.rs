//! 호출자 추출기.
//!
//! authorization 헤더를 게이트에 통과시켜 `Caller`를 만듭니다.
//! 추출 자체는 절대 실패하지 않습니다. 자격증명이 없거나 무효이면
//! `Anonymous`가 되고, 거부 여부는 각 작업이 결정합니다.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::convert::Infallible;
use std::sync::Arc;

use account_core::{AuthorizationGate, Caller};

/// 요청에서 분류된 호출자.
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub Caller);

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let caller = parts
            .extensions
            .get::<Arc<AuthorizationGate>>()
            .map(|gate| gate.classify(authorization.as_deref()))
            .unwrap_or(Caller::Anonymous);

        Ok(CallerIdentity(caller))
    }
}
