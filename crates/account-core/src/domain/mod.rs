//! 핵심 도메인 모델.

mod account;

pub use account::{
    Account, AccountSummary, DepositRequest, LoginRequest, NewAccount, TransferRequest,
    UpdateAccount,
};
