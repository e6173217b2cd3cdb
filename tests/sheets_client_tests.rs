use mockito::Matcher;
use serde_json::json;

use finbot::sheets::{SheetsClient, SheetsClientError};

fn client_for(server: &mockito::ServerGuard) -> SheetsClient {
    SheetsClient::new(
        reqwest::Client::new(),
        "sheet-key".into(),
        "sheet123".into(),
        "Transactions".into(),
    )
    .with_base_url(server.url())
}

#[tokio::test]
async fn test_fetch_transactions_maps_header_row() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock(
            "GET",
            Matcher::Regex(r"^/v4/spreadsheets/sheet123/values/Transactions".into()),
        )
        .match_query(Matcher::UrlEncoded("key".into(), "sheet-key".into()))
        .with_status(200)
        .with_body(
            json!({
                "range": "Transactions!A1:D3",
                "majorDimension": "ROWS",
                "values": [
                    ["Date", "Transaction ID", "Description", "Amount"],
                    ["2024-05-01", "tx-1", "Costco Wholesale", "212.40"],
                    ["2024-05-02", "tx-2", "Shell Oil"]
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let txns = client_for(&server).fetch_transactions().await.unwrap();

    assert_eq!(txns.len(), 2);
    assert_eq!(txns[0].transaction_id().as_deref(), Some("tx-1"));
    assert_eq!(txns[0].description(), "Costco Wholesale");
    assert_eq!(txns[1].get("Amount"), Some(&json!("")));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_forbidden_is_an_http_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", Matcher::Any)
        .with_status(403)
        .with_body(r#"{"error":{"code":403,"message":"The caller does not have permission"}}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch_transactions().await.unwrap_err();
    assert!(matches!(err, SheetsClientError::Http(_)));
}

#[tokio::test]
async fn test_range_and_key_are_encoded() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/v4/spreadsheets/sheet123/values/Q2%20%23budget%3F")
        .match_query(Matcher::UrlEncoded("key".into(), "k&ey=1".into()))
        .with_status(200)
        .with_body(json!({ "values": [["Description"], ["Trader Joe's"]] }).to_string())
        .create_async()
        .await;

    let client = SheetsClient::new(
        reqwest::Client::new(),
        "k&ey=1".into(),
        "sheet123".into(),
        "Q2 #budget?".into(),
    )
    .with_base_url(server.url());

    let txns = client.fetch_transactions().await.unwrap();

    assert_eq!(txns[0].description(), "Trader Joe's");
    mock.assert_async().await;
}
