//! # Account Contract
//!
//! Deterministic state machine over dealer accounts. Every operation reads and
//! writes only through the injected [`LedgerStub`]; conflicting concurrent
//! writes are caught by the commit service, not here.

use tracing::{debug, warn};

use crate::domain::entities::{parse_decimal, AccountRecord, HistoryEntry, NewAccount};
use crate::domain::errors::ContractError;
use crate::domain::functions::Function;
use crate::domain::seed::seed_accounts;
use crate::ports::inbound::ContractInvoker;
use crate::ports::outbound::LedgerStub;

/// Default contract name proposals address.
pub const DEFAULT_CONTRACT_NAME: &str = "accountcc";

/// The dealer account contract.
#[derive(Debug, Clone)]
pub struct AccountContract {
    name: String,
}

impl Default for AccountContract {
    fn default() -> Self {
        Self::new(DEFAULT_CONTRACT_NAME)
    }
}

impl AccountContract {
    /// Create the contract, addressed as `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Seed the sample accounts.
    ///
    /// Existing records under the seed ids are overwritten.
    pub fn init_ledger(&self, stub: &mut dyn LedgerStub) -> Result<(), ContractError> {
        for account in seed_accounts() {
            let bytes = account.to_json()?;
            stub.put_state(&account.dealer_id, bytes)
                .map_err(|e| ContractError::ledger("write world state", &account.dealer_id, e))?;
        }
        debug!(tx_id = %stub.tx_id(), "Ledger seeded");
        Ok(())
    }

    /// Whether a record exists for `dealer_id`.
    pub fn account_exists(
        &self,
        stub: &mut dyn LedgerStub,
        dealer_id: &str,
    ) -> Result<bool, ContractError> {
        Ok(read_state(stub, dealer_id)?.is_some())
    }

    /// Create a new record. Fails if the id is already present.
    pub fn create_account(
        &self,
        stub: &mut dyn LedgerStub,
        new: NewAccount<'_>,
    ) -> Result<(), ContractError> {
        if self.account_exists(stub, new.dealer_id)? {
            return Err(ContractError::AlreadyExists {
                dealer_id: new.dealer_id.to_string(),
            });
        }

        let record = new.into_record()?;
        let bytes = record.to_json()?;
        stub.put_state(&record.dealer_id, bytes)
            .map_err(|e| ContractError::ledger("write world state", &record.dealer_id, e))?;

        debug!(tx_id = %stub.tx_id(), dealer_id = %record.dealer_id, "Account created");
        Ok(())
    }

    /// Current record for `dealer_id`.
    pub fn query_account(
        &self,
        stub: &mut dyn LedgerStub,
        dealer_id: &str,
    ) -> Result<AccountRecord, ContractError> {
        let bytes = read_state(stub, dealer_id)?.ok_or_else(|| ContractError::NotFound {
            dealer_id: dealer_id.to_string(),
        })?;
        AccountRecord::from_json(dealer_id, &bytes)
    }

    /// Overwrite the balance of an existing record; other fields are kept.
    pub fn update_account_balance(
        &self,
        stub: &mut dyn LedgerStub,
        dealer_id: &str,
        new_balance: &str,
    ) -> Result<(), ContractError> {
        let mut record = self.query_account(stub, dealer_id)?;
        record.balance = parse_decimal("balance", new_balance)?;

        let bytes = record.to_json()?;
        stub.put_state(dealer_id, bytes)
            .map_err(|e| ContractError::ledger("write world state", dealer_id, e))?;

        debug!(tx_id = %stub.tx_id(), %dealer_id, balance = %record.balance, "Balance updated");
        Ok(())
    }

    /// Every committed modification of `dealer_id`, oldest first.
    ///
    /// A snapshot that cannot be decoded is reported with an empty record
    /// instead of failing the whole query. An unknown id has an empty history.
    pub fn get_account_history(
        &self,
        stub: &mut dyn LedgerStub,
        dealer_id: &str,
    ) -> Result<Vec<HistoryEntry>, ContractError> {
        let modifications = stub
            .get_history_for_key(dealer_id)
            .map_err(|e| ContractError::ledger("read history", dealer_id, e))?;

        Ok(modifications
            .into_iter()
            .map(|m| {
                let value = if m.is_delete {
                    AccountRecord::default()
                } else {
                    AccountRecord::from_json(dealer_id, &m.value).unwrap_or_else(|e| {
                        warn!(tx_id = %m.tx_id, %dealer_id, error = %e, "Undecodable history snapshot");
                        AccountRecord::default()
                    })
                };
                HistoryEntry {
                    tx_id: m.tx_id,
                    timestamp: m.timestamp,
                    is_delete: m.is_delete,
                    value,
                }
            })
            .collect())
    }

    /// Dispatch a named function with positional string arguments.
    ///
    /// Results are JSON encoded; functions without a result return an empty
    /// payload.
    pub fn dispatch(
        &self,
        stub: &mut dyn LedgerStub,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        let function: Function = function.parse()?;
        function.check_arity(args.len())?;

        match function {
            Function::InitLedger => self.init_ledger(stub).map(|()| Vec::new()),
            Function::AccountExists => {
                let exists = self.account_exists(stub, &args[0])?;
                encode_result(&args[0], &exists)
            }
            Function::CreateAccount => {
                let new = NewAccount::from_args(args).ok_or_else(|| {
                    ContractError::InvalidArguments {
                        function: function.name().to_string(),
                        expected: NewAccount::ARITY,
                        received: args.len(),
                    }
                })?;
                self.create_account(stub, new).map(|()| Vec::new())
            }
            Function::QueryAccount => {
                let record = self.query_account(stub, &args[0])?;
                encode_result(&args[0], &record)
            }
            Function::UpdateAccountBalance => self
                .update_account_balance(stub, &args[0], &args[1])
                .map(|()| Vec::new()),
            Function::GetAccountHistory => {
                let history = self.get_account_history(stub, &args[0])?;
                encode_result(&args[0], &history)
            }
        }
    }
}

impl ContractInvoker for AccountContract {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(
        &self,
        stub: &mut dyn LedgerStub,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        self.dispatch(stub, function, args)
    }
}

fn read_state(stub: &mut dyn LedgerStub, key: &str) -> Result<Option<Vec<u8>>, ContractError> {
    stub.get_state(key)
        .map_err(|e| ContractError::ledger("read world state", key, e))
}

fn encode_result<T: serde::Serialize>(dealer_id: &str, value: &T) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(value).map_err(|e| ContractError::Serialization {
        operation: "encode result for",
        dealer_id: dealer_id.to_string(),
        reason: e.to_string(),
    })
}
