//! # Account Operations
//!
//! Typed wrappers over a [`Session`] for the account contract. Arguments are
//! rendered to the string form the contract parses; JSON results are decoded.

use dl_04_account_contract::{AccountRecord, Function, HistoryEntry};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::de::from_slice;

use crate::domain::errors::{FailureReason, GatewayError};
use crate::service::Session;

/// Account contract client borrowing an open session.
#[derive(Clone, Copy)]
pub struct AccountClient<'a> {
    session: &'a Session,
}

impl<'a> AccountClient<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Seed the ledger with the sample accounts.
    pub async fn init_ledger(&self) -> Result<(), GatewayError> {
        self.session
            .submit(Function::InitLedger.name(), &[])
            .await
            .map(drop)
    }

    pub async fn account_exists(&self, dealer_id: &str) -> Result<bool, GatewayError> {
        let payload = self
            .session
            .evaluate(Function::AccountExists.name(), &[dealer_id])
            .await?;
        decode_payload(Function::AccountExists, &payload)
    }

    /// Create `record`; fails with a contract error if the id is taken.
    pub async fn create_account(&self, record: &AccountRecord) -> Result<(), GatewayError> {
        let balance = record.balance.to_string();
        let trans_amount = record.last_trans_amount.to_string();
        self.session
            .submit(
                Function::CreateAccount.name(),
                &[
                    record.dealer_id.as_str(),
                    record.msisdn.as_str(),
                    record.mpin.as_str(),
                    balance.as_str(),
                    record.status.as_str(),
                    trans_amount.as_str(),
                    record.last_trans_type.as_str(),
                    record.remarks.as_str(),
                ],
            )
            .await
            .map(drop)
    }

    pub async fn query_account(&self, dealer_id: &str) -> Result<AccountRecord, GatewayError> {
        let payload = self
            .session
            .evaluate(Function::QueryAccount.name(), &[dealer_id])
            .await?;
        decode_payload(Function::QueryAccount, &payload)
    }

    pub async fn update_account_balance(
        &self,
        dealer_id: &str,
        new_balance: Decimal,
    ) -> Result<(), GatewayError> {
        let balance = new_balance.to_string();
        self.session
            .submit(Function::UpdateAccountBalance.name(), &[dealer_id, balance.as_str()])
            .await
            .map(drop)
    }

    /// Committed modifications of the account, oldest first.
    pub async fn get_account_history(
        &self,
        dealer_id: &str,
    ) -> Result<Vec<HistoryEntry>, GatewayError> {
        let payload = self
            .session
            .evaluate(Function::GetAccountHistory.name(), &[dealer_id])
            .await?;
        decode_payload(Function::GetAccountHistory, &payload)
    }
}

fn decode_payload<T: DeserializeOwned>(
    function: Function,
    payload: &[u8],
) -> Result<T, GatewayError> {
    from_slice(payload).map_err(|e| GatewayError::Evaluate {
        transaction: function.name().to_string(),
        reason: FailureReason::Protocol(format!("undecodable result: {e}")),
    })
}
