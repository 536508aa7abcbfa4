//! Sample accounts written by `InitLedger`.

use rust_decimal::Decimal;

use super::entities::AccountRecord;

/// The accounts `InitLedger` seeds, in write order.
pub fn seed_accounts() -> Vec<AccountRecord> {
    vec![
        AccountRecord {
            dealer_id: "A001".into(),
            msisdn: "9998887701".into(),
            mpin: "1111".into(),
            balance: Decimal::from(1000),
            status: "active".into(),
            last_trans_amount: Decimal::from(500),
            last_trans_type: "credit".into(),
            remarks: "init".into(),
        },
        AccountRecord {
            dealer_id: "A002".into(),
            msisdn: "9998887702".into(),
            mpin: "2222".into(),
            balance: Decimal::from(2000),
            status: "active".into(),
            last_trans_amount: Decimal::from(1000),
            last_trans_type: "credit".into(),
            remarks: "init".into(),
        },
    ]
}
