//! # Account Flows
//!
//! Account lifecycle driven through `AccountClient` against a loopback peer.

use dl_03_gateway::{AccountClient, FailureReason, GatewayError};
use dl_04_account_contract::AccountRecord;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::harness::TestNetwork;

// =============================================================================
// FIXTURES
// =============================================================================

fn record(dealer_id: &str, balance: Decimal) -> AccountRecord {
    AccountRecord {
        dealer_id: dealer_id.to_string(),
        msisdn: "9998887709".to_string(),
        mpin: "4321".to_string(),
        balance,
        status: "active".to_string(),
        last_trans_amount: dec!(0),
        last_trans_type: "credit".to_string(),
        remarks: "opening".to_string(),
    }
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_create_query_update_history() {
    let network = TestNetwork::start().await;
    let session = network.session().await;
    let accounts = AccountClient::new(&session);

    assert!(!accounts.account_exists("A100").await.unwrap());
    accounts.create_account(&record("A100", dec!(1000))).await.unwrap();
    assert!(accounts.account_exists("A100").await.unwrap());

    accounts.update_account_balance("A100", dec!(1500)).await.unwrap();
    let current = accounts.query_account("A100").await.unwrap();
    assert_eq!(current.balance, dec!(1500));
    assert_eq!(current.msisdn, "9998887709");

    let history = accounts.get_account_history("A100").await.unwrap();
    let balances: Vec<Decimal> = history.iter().map(|h| h.value.balance).collect();
    assert_eq!(balances, vec![dec!(1000), dec!(1500)]);
    assert!(history.iter().all(|h| !h.is_delete));
    assert_ne!(history[0].tx_id, history[1].tx_id);

    session.close();
    network.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_duplicate_create_is_contract_failure() {
    let network = TestNetwork::start().await;
    let session = network.session().await;
    let accounts = AccountClient::new(&session);

    accounts.create_account(&record("A200", dec!(10))).await.unwrap();
    let err = accounts
        .create_account(&record("A200", dec!(99)))
        .await
        .unwrap_err();

    assert_eq!(
        err.reason(),
        Some(&FailureReason::Contract("account A200 already exists".to_string()))
    );
    assert!(!err.is_retryable());
    // the first write survives
    assert_eq!(accounts.query_account("A200").await.unwrap().balance, dec!(10));

    network.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_query_missing_account() {
    let network = TestNetwork::start().await;
    let session = network.session().await;

    let err = AccountClient::new(&session)
        .query_account("A404")
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Evaluate { .. }));
    assert_eq!(err.to_string(), "Evaluate of QueryAccount failed: account A404 does not exist");

    network.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_evaluate_does_not_commit() {
    let network = TestNetwork::start().await;
    let session = network.session().await;

    // CreateAccount through evaluate is simulated and discarded
    session
        .evaluate(
            "CreateAccount",
            &["A300", "9998887703", "3333", "300", "active", "0", "credit", "dry run"],
        )
        .await
        .unwrap();
    assert!(!AccountClient::new(&session).account_exists("A300").await.unwrap());

    network.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_seeded_peer_serves_sample_accounts() {
    let network = TestNetwork::start_with(|config| config.contract.seed_on_start = true).await;
    let session = network.session().await;
    let accounts = AccountClient::new(&session);

    let a002 = accounts.query_account("A002").await.unwrap();
    assert_eq!(a002.balance, dec!(2000));
    assert_eq!(a002.remarks, "init");
    assert_eq!(accounts.get_account_history("A001").await.unwrap().len(), 1);

    // InitLedger from a client overwrites the seed again
    accounts.update_account_balance("A001", dec!(1)).await.unwrap();
    accounts.init_ledger().await.unwrap();
    assert_eq!(accounts.query_account("A001").await.unwrap().balance, dec!(1000));

    network.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_function_is_contract_failure() {
    let network = TestNetwork::start().await;
    let session = network.session().await;

    let err = session.submit("DeleteAccount", &["A001"]).await.unwrap_err();
    assert!(matches!(err.reason(), Some(FailureReason::Contract(_))), "{err}");

    network.stop().await;
}

// =============================================================================
// CONCURRENCY
// =============================================================================

/// Writers racing on one key either commit or lose with a retryable conflict;
/// retrying until success lands every update in history.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_conflict_and_retry() {
    const WRITERS: usize = 6;

    let network = TestNetwork::start().await;
    let setup = network.session().await;
    AccountClient::new(&setup)
        .create_account(&record("A500", dec!(0)))
        .await
        .unwrap();

    let mut sessions = Vec::with_capacity(WRITERS);
    for _ in 0..WRITERS {
        sessions.push(network.session().await);
    }

    let mut tasks = Vec::with_capacity(WRITERS);
    for (i, session) in sessions.into_iter().enumerate() {
        tasks.push(tokio::spawn(async move {
            let balance = Decimal::from(i as u64 + 1);
            let mut conflicts = 0u32;
            loop {
                match AccountClient::new(&session)
                    .update_account_balance("A500", balance)
                    .await
                {
                    Ok(()) => return conflicts,
                    Err(err) if err.is_retryable() && conflicts < 100 => conflicts += 1,
                    Err(err) => panic!("writer {i} failed: {err}"),
                }
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let history = AccountClient::new(&setup)
        .get_account_history("A500")
        .await
        .unwrap();
    assert_eq!(history.len(), WRITERS + 1);

    network.stop().await;
}
