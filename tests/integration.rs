//! Integration tests against a mock HTTP server
//!
//! These exercise the full request path: query assembly, signing headers,
//! JSON decoding, and error mapping.

use coinbase_rest::{
    ClientConfig, CoinbaseRestClient, Credentials, Granularity, OrdersQuery, RestError, Side,
};
use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> CoinbaseRestClient {
    let credentials = Credentials::new("test-api-key", "test-api-secret");
    let config = ClientConfig::new().with_base_url(server.uri());
    CoinbaseRestClient::with_config(credentials, config)
}

#[tokio::test]
async fn test_list_accounts_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/brokerage/accounts"))
        .and(query_param("limit", "49"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accounts": [{
                "uuid": "b7c9e2f1-0000-0000-0000-000000000000",
                "name": "BTC Wallet",
                "currency": "BTC",
                "available_balance": {"value": "1.5", "currency": "BTC"},
                "default": true,
                "active": true,
                "type": "ACCOUNT_TYPE_CRYPTO",
                "ready": true,
                "hold": {"value": "0", "currency": "BTC"}
            }],
            "has_next": false,
            "cursor": "",
            "size": 1
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client.list_accounts(None, None).await.unwrap();

    assert_eq!(page.size, Some(1));
    assert_eq!(page.has_next, Some(false));
    let account = page.iter().next().unwrap();
    assert_eq!(account.name.as_deref(), Some("BTC Wallet"));
    assert_eq!(
        account.available_balance.as_ref().map(|b| b.value.as_str()),
        Some("1.5")
    );
}

#[tokio::test]
async fn test_auth_headers_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/brokerage/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accounts": [], "has_next": false, "cursor": "", "size": 0
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.list_accounts(Some(10), None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;

    assert_eq!(
        headers.get("CB-ACCESS-KEY").unwrap().to_str().unwrap(),
        "test-api-key"
    );
    assert_eq!(
        headers.get("accept").unwrap().to_str().unwrap(),
        "application/json"
    );

    let timestamp = headers.get("CB-ACCESS-TIMESTAMP").unwrap().to_str().unwrap();
    assert!(timestamp.chars().all(|c| c.is_ascii_digit()));

    // HMAC-SHA256 as lowercase hex
    let signature = headers.get("CB-ACCESS-SIGN").unwrap().to_str().unwrap();
    assert_eq!(signature.len(), 64);
    assert!(signature
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));

    // Signature covers the bare path, not the query string
    let credentials = Credentials::new("test-api-key", "test-api-secret");
    let expected = credentials.sign(timestamp, "GET", "/api/v3/brokerage/accounts", "");
    assert_eq!(signature, expected);
}

#[tokio::test]
async fn test_api_error_maps_to_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "unauthorized",
            "message": "invalid signature"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.get_product("BTC-USD").await.unwrap_err();

    match err {
        RestError::Api {
            status,
            code,
            message,
            ..
        } => {
            assert_eq!(status, 401);
            assert_eq!(code, "unauthorized");
            assert_eq!(message, "invalid signature");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    assert!(client.get_product("BTC-USD").await.unwrap_err().is_auth_error());
}

#[tokio::test]
async fn test_create_limit_order_request_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/brokerage/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "success_response": {
                "order_id": "o-123",
                "product_id": "BTC-USD",
                "side": "BUY",
                "client_order_id": "c-1"
            },
            "order_configuration": {
                "limit_limit_gtc": {
                    "limit_price": "25000.00",
                    "base_size": "0.001",
                    "post_only": true
                }
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let order = client
        .create_limit_order(
            "c-1",
            "BTC-USD",
            Side::Buy,
            dec!(25000.00),
            dec!(0.001),
            None,
            Some(true),
        )
        .await
        .unwrap();

    assert_eq!(order.order_id, "o-123");
    assert_eq!(order.side, Side::Buy);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["client_order_id"], "c-1");
    assert_eq!(body["product_id"], "BTC-USD");
    assert_eq!(body["side"], "BUY");
    assert_eq!(
        body["order_configuration"]["limit_limit_gtc"]["limit_price"],
        "25000.00"
    );
    assert_eq!(
        body["order_configuration"]["limit_limit_gtc"]["post_only"],
        true
    );

    // The signature covers the exact bytes that went over the wire
    let headers = &requests[0].headers;
    let timestamp = headers.get("CB-ACCESS-TIMESTAMP").unwrap().to_str().unwrap();
    let signature = headers.get("CB-ACCESS-SIGN").unwrap().to_str().unwrap();
    let raw_body = std::str::from_utf8(&requests[0].body).unwrap();
    let credentials = Credentials::new("test-api-key", "test-api-secret");
    let expected = credentials.sign(timestamp, "POST", "/api/v3/brokerage/orders", raw_body);
    assert_eq!(signature, expected);
}

#[tokio::test]
async fn test_create_order_rejection_becomes_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/brokerage/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error_response": {
                "error": "INSUFFICIENT_FUND",
                "message": "Insufficient balance in source account"
            },
            "order_configuration": {}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .create_buy_market_order("c-2", "BTC-USD", dec!(100))
        .await
        .unwrap_err();

    match err {
        RestError::Api { status, code, .. } => {
            assert_eq!(status, 200);
            assert_eq!(code, "INSUFFICIENT_FUND");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_list_orders_default_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/brokerage/orders/historical/batch"))
        .and(query_param("limit", "999"))
        .and(query_param("order_status", "OPEN,FILLED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orders": [],
            "has_next": false,
            "cursor": ""
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let query = OrdersQuery::new().with_order_status(["OPEN", "FILLED"]);
    let page = client.list_orders(&query).await.unwrap();
    assert!(page.orders.is_empty());
}

#[tokio::test]
async fn test_candles_query_uses_unix_seconds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/brokerage/products/ALGO-USD/candles"))
        .and(query_param("start", "1672531200"))
        .and(query_param("end", "1672617600"))
        .and(query_param("granularity", "ONE_HOUR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candles": [
                {"start": "1672531200", "low": "0.17", "high": "0.21",
                 "open": "0.18", "close": "0.20", "volume": "12345.6"}
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
    let page = client
        .get_product_candles("ALGO-USD", start, end, Granularity::OneHour)
        .await
        .unwrap();

    assert_eq!(page.candles.len(), 1);
    assert_eq!(page.candles[0].close.as_deref(), Some("0.20"));
}

#[tokio::test]
async fn test_transactions_summary() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/brokerage/transaction_summary"))
        .and(query_param("user_native_currency", "USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_volume": 1000.0,
            "total_fees": 5.5,
            "fee_tier": {
                "pricing_tier": "Advanced 1",
                "taker_fee_rate": "0.008",
                "maker_fee_rate": "0.006"
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let summary = client
        .get_transactions_summary(None, None, Some("USD"), None)
        .await
        .unwrap();

    assert_eq!(summary.total_fees, Some(5.5));
    assert_eq!(
        summary.fee_tier.and_then(|t| t.maker_fee_rate).as_deref(),
        Some("0.006")
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.get_order("o-1").await.unwrap_err();
    assert!(matches!(err, RestError::Parse(_)));
}

#[tokio::test]
async fn test_cancel_orders() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/brokerage/orders/batch_cancel/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"success": true, "failure_reason": "UNKNOWN_CANCEL_FAILURE_REASON", "order_id": "o-1"},
                {"success": false, "failure_reason": "UNKNOWN_CANCEL_ORDER", "order_id": "o-2"}
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let cancellation = client.cancel_orders(&["o-1", "o-2"]).await.unwrap();

    assert_eq!(cancellation.results.len(), 2);
    assert_eq!(cancellation.results[0].success, Some(true));
    assert_eq!(cancellation.results[1].order_id.as_deref(), Some("o-2"));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["order_ids"], json!(["o-1", "o-2"]));
}
