mod common;

use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;

use common::{txn, ScriptedClassifier};
use finbot::categorizer::{BatchScheduler, SchedulerConfig};
use finbot::db::transaction_repo;
use finbot::services::run_sheet_sync;
use finbot::sheets::SheetsClient;

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_upsert_merges_fields_by_transaction_id() {
    let pool = common::setup_test_db().await;

    let mut first = txn("tx-100", "Blue Bottle Coffee");
    first.insert("Notes", json!("morning"));
    let written = transaction_repo::upsert_transactions(&pool, &[first]).await.unwrap();
    assert_eq!(written, 1);

    let mut second = txn("tx-100", "Blue Bottle Coffee");
    second.set_category("Snacks");
    transaction_repo::upsert_transactions(&pool, &[second]).await.unwrap();

    let stored = transaction_repo::get_transaction(&pool, "tx-100")
        .await
        .unwrap()
        .expect("row should exist");

    assert_eq!(stored.category.as_deref(), Some("Snacks"));
    // fields missing from the second write survive
    assert_eq!(stored.document.0["Notes"], "morning");
    assert_eq!(stored.document.0["Category"], "Snacks");

    let all = transaction_repo::list_transactions(&pool, 10).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_upsert_skips_records_without_id() {
    let pool = common::setup_test_db().await;
    let anonymous: finbot::models::Transaction =
        serde_json::from_value(json!({ "Description": "cash withdrawal" })).unwrap();

    let written = transaction_repo::upsert_transactions(&pool, &[anonymous, txn("tx-1", "ATM fee")])
        .await
        .unwrap();

    assert_eq!(written, 1);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_filter_new_drops_stored_ids() {
    let pool = common::setup_test_db().await;
    transaction_repo::upsert_transactions(&pool, &[txn("tx-1", "Costco")]).await.unwrap();

    let anonymous: finbot::models::Transaction =
        serde_json::from_value(json!({ "Description": "no id" })).unwrap();
    let fresh = transaction_repo::filter_new(
        &pool,
        vec![txn("tx-1", "Costco"), txn("tx-2", "Walgreens"), anonymous],
    )
    .await
    .unwrap();

    let descriptions: Vec<String> = fresh.iter().map(|t| t.description()).collect();
    assert_eq!(descriptions, vec!["Walgreens", "no id"]);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_sheet_sync_categorizes_and_stores_only_new_rows() {
    let pool = common::setup_test_db().await;
    transaction_repo::upsert_transactions(&pool, &[txn("tx-1", "Costco")]).await.unwrap();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", Matcher::Regex(r"^/v4/spreadsheets/".into()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "values": [
                    ["Transaction ID", "Description", "Amount", "Category"],
                    ["tx-1", "Costco", "90.00"],
                    ["tx-2", "Lyft Ride", "14.20"],
                    ["tx-3", "Walgreens", "8.99"]
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let sheets = SheetsClient::new(
        reqwest::Client::new(),
        "key".into(),
        "sheet".into(),
        "Transactions".into(),
    )
    .with_base_url(server.url());
    let classifier = Arc::new(ScriptedClassifier::always_ok().with_label_index(4));
    let scheduler = BatchScheduler::new(classifier.clone(), SchedulerConfig::default());

    let summary = run_sheet_sync(&pool, &sheets, &scheduler).await.unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.new, 2);
    assert_eq!(summary.classified, 2);
    assert_eq!(summary.written, 2);
    assert_eq!(classifier.calls(), vec!["Lyft Ride", "Walgreens"]);

    let stored = transaction_repo::get_transaction(&pool, "tx-2").await.unwrap().unwrap();
    assert_eq!(stored.category.as_deref(), Some("Transportation"));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_weekly_summary_groups_stored_documents() {
    let pool = common::setup_test_db().await;

    let rows = [
        json!({ "Transaction ID": "s-1", "Week": "2024-05-06", "Description": "Safeway", "Amount": "41.50", "Category": "Grocery" }),
        json!({ "Transaction ID": "s-2", "Week": "2024-05-06", "Description": "Lucky", "Amount": 8.5, "Category": "Grocery" }),
        json!({ "Transaction ID": "s-3", "Week": "2024-05-13", "Description": "Lyft", "Amount": 20, "Category": "Transportation" }),
        json!({ "Transaction ID": "s-4", "Description": "no week", "Amount": 99 }),
    ];
    let txns: Vec<finbot::models::Transaction> =
        rows.into_iter().map(|r| serde_json::from_value(r).unwrap()).collect();
    transaction_repo::upsert_transactions(&pool, &txns).await.unwrap();

    let summary = transaction_repo::weekly_summary(&pool).await.unwrap();

    let weeks: Vec<&str> = summary.weeks().map(|(w, _)| w).collect();
    assert_eq!(weeks, vec!["2024-05-13", "2024-05-06"]);

    let may6 = summary.week("2024-05-06").unwrap();
    assert_eq!(may6.total_week, 50.0);
    assert_eq!(may6.categories["Grocery"].transactions.len(), 2);
}
