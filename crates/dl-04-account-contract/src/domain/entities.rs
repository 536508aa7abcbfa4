//! # Account Entities
//!
//! The account record is stored as a JSON document keyed by `dealer_id`.
//! Field names on the wire match the REST clients that already consume it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::TxTimestamp;

use super::errors::ContractError;

/// One dealer account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(rename = "dealerId")]
    pub dealer_id: String,
    pub msisdn: String,
    pub mpin: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub status: String,
    #[serde(rename = "transAmount", with = "rust_decimal::serde::float")]
    pub last_trans_amount: Decimal,
    #[serde(rename = "transType")]
    pub last_trans_type: String,
    pub remarks: String,
}

impl AccountRecord {
    /// Encode as the stored JSON document.
    pub fn to_json(&self) -> Result<Vec<u8>, ContractError> {
        serde_json::to_vec(self).map_err(|e| ContractError::Serialization {
            operation: "encode",
            dealer_id: self.dealer_id.clone(),
            reason: e.to_string(),
        })
    }

    /// Decode a stored JSON document.
    pub fn from_json(dealer_id: &str, bytes: &[u8]) -> Result<Self, ContractError> {
        serde_json::from_slice(bytes).map_err(|e| ContractError::Serialization {
            operation: "decode",
            dealer_id: dealer_id.to_string(),
            reason: e.to_string(),
        })
    }
}

/// One committed modification of an account key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "txId")]
    pub tx_id: String,
    pub timestamp: TxTimestamp,
    #[serde(rename = "isDelete")]
    pub is_delete: bool,
    /// Snapshot written by the transaction; empty if it could not be decoded.
    pub value: AccountRecord,
}

/// Arguments of `CreateAccount`, still in string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAccount<'a> {
    pub dealer_id: &'a str,
    pub msisdn: &'a str,
    pub mpin: &'a str,
    pub balance: &'a str,
    pub status: &'a str,
    pub trans_amount: &'a str,
    pub trans_type: &'a str,
    pub remarks: &'a str,
}

impl<'a> NewAccount<'a> {
    /// Number of positional arguments `CreateAccount` takes.
    pub const ARITY: usize = 8;

    /// Bind positional arguments in declaration order.
    pub fn from_args(args: &'a [String]) -> Option<Self> {
        match args {
            [dealer_id, msisdn, mpin, balance, status, trans_amount, trans_type, remarks] => {
                Some(Self {
                    dealer_id,
                    msisdn,
                    mpin,
                    balance,
                    status,
                    trans_amount,
                    trans_type,
                    remarks,
                })
            }
            _ => None,
        }
    }

    /// Parse numerics and build the record.
    pub fn into_record(self) -> Result<AccountRecord, ContractError> {
        Ok(AccountRecord {
            dealer_id: self.dealer_id.to_string(),
            msisdn: self.msisdn.to_string(),
            mpin: self.mpin.to_string(),
            balance: parse_decimal("balance", self.balance)?,
            status: self.status.to_string(),
            last_trans_amount: parse_decimal("transAmount", self.trans_amount)?,
            last_trans_type: self.trans_type.to_string(),
            remarks: self.remarks.to_string(),
        })
    }
}

/// Strict decimal parse: the whole string must be a plain decimal number.
///
/// No whitespace, exponents or trailing garbage. The value must also come back
/// unchanged from the stored JSON number; anything the float encoding would
/// round or cannot represent is an error rather than silently altered.
pub fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, ContractError> {
    let invalid = || ContractError::NumericParse {
        field,
        value: value.to_string(),
    };
    let parsed = Decimal::from_str_exact(value).map_err(|_| invalid())?;
    if stored_form(parsed) != Some(parsed) {
        return Err(invalid());
    }
    Ok(parsed)
}

/// An amount encoded the way [`AccountRecord`] stores it.
#[derive(Serialize, Deserialize)]
struct StoredAmount(#[serde(with = "rust_decimal::serde::float")] Decimal);

/// What `value` reads back as after a trip through the stored encoding.
fn stored_form(value: Decimal) -> Option<Decimal> {
    let bytes = serde_json::to_vec(&StoredAmount(value)).ok()?;
    serde_json::from_slice::<StoredAmount>(&bytes)
        .ok()
        .map(|StoredAmount(amount)| amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record() -> AccountRecord {
        AccountRecord {
            dealer_id: "A001".into(),
            msisdn: "9998887701".into(),
            mpin: "1111".into(),
            balance: dec!(1000),
            status: "active".into(),
            last_trans_amount: dec!(500),
            last_trans_type: "credit".into(),
            remarks: "init".into(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let json: serde_json::Value = serde_json::from_slice(&record().to_json().unwrap()).unwrap();
        assert_eq!(json["dealerId"], "A001");
        assert_eq!(json["transType"], "credit");
        assert!(json["balance"].is_number());
        assert_eq!(json["balance"].as_f64(), Some(1000.0));
        assert_eq!(json["transAmount"].as_f64(), Some(500.0));
    }

    #[test]
    fn test_decodes_documents_written_by_other_clients() {
        let doc = br#"{"dealerId":"A009","msisdn":"1","mpin":"9","balance":12.5,
            "status":"active","transAmount":0,"transType":"","remarks":""}"#;
        let rec = AccountRecord::from_json("A009", doc).unwrap();
        assert_eq!(rec.balance, dec!(12.5));
        assert_eq!(rec.last_trans_amount, Decimal::ZERO);
    }

    #[test]
    fn test_history_entry_json_shape() {
        let entry = HistoryEntry {
            tx_id: "abc".into(),
            timestamp: TxTimestamp::new(1_700_000_000, 5),
            is_delete: false,
            value: record(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["txId"], "abc");
        assert_eq!(json["timestamp"]["seconds"], 1_700_000_000i64);
        assert_eq!(json["timestamp"]["nanos"], 5);
        assert_eq!(json["isDelete"], false);
        assert_eq!(json["value"]["dealerId"], "A001");
    }

    #[test]
    fn test_parse_decimal_is_strict() {
        assert_eq!(parse_decimal("balance", "1500").unwrap(), dec!(1500));
        assert_eq!(parse_decimal("balance", "-20.75").unwrap(), dec!(-20.75));

        for bad in ["", "abc", "12abc", " 12", "1e3", "1,000"] {
            assert!(
                matches!(
                    parse_decimal("balance", bad),
                    Err(ContractError::NumericParse { field: "balance", .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_decimal_rejects_values_the_record_cannot_hold() {
        let max = Decimal::MAX.to_string();
        for lossy in [
            "12345678901234567.89",
            "0.1234567890123456789",
            max.as_str(),
        ] {
            assert!(
                matches!(
                    parse_decimal("balance", lossy),
                    Err(ContractError::NumericParse { field: "balance", .. })
                ),
                "{lossy} would not survive storage"
            );
        }
    }

    #[test]
    fn test_accepted_amounts_read_back_unchanged() {
        for input in [
            "0",
            "-0.01",
            "0.1",
            "1500.25",
            "999999999999.99",
            "123456789012345",
            "-98765.4321",
            "0.000001",
            "1000000000000000000000",
        ] {
            let Ok(amount) = parse_decimal("balance", input) else {
                continue;
            };
            let mut rec = record();
            rec.balance = amount;
            rec.last_trans_amount = amount;
            let stored = AccountRecord::from_json("A001", &rec.to_json().unwrap()).unwrap();
            assert_eq!(stored.balance, amount, "balance {input}");
            assert_eq!(stored.last_trans_amount, amount, "transAmount {input}");
        }
        // everyday amounts are never refused
        for input in ["0", "0.1", "1500.25", "999999999999.99", "-98765.4321"] {
            assert!(parse_decimal("balance", input).is_ok(), "{input}");
        }
    }

    #[test]
    fn test_new_account_arity() {
        let args: Vec<String> = ["A003", "9", "3", "10", "active", "0", "credit", "x"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let new = NewAccount::from_args(&args).unwrap();
        assert_eq!(new.dealer_id, "A003");
        assert_eq!(new.remarks, "x");
        assert!(NewAccount::from_args(&args[..7]).is_none());
    }
}
