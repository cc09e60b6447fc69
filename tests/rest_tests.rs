mod common;

use common::{public_connector, setup_mock_server, signed_connector};
use huobix::core::types::{CandleInterval, OrderSide, OrderType};
use huobix::exchanges::huobi::NewOrder;
use huobix::{ExchangeError, HuobiBuilder};
use rust_decimal::Decimal;
use serde_json::json;
use std::time::Duration;
use tokio_test::assert_ok;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_public_request_is_not_signed() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/common/timestamp"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "data": 1629715504949u64})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let connector = signed_connector(&server);
    let ts = assert_ok!(connector.generic.timestamp().await);
    assert_eq!(ts, 1629715504949);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query_pairs().all(|(k, _)| k != "Signature"));
}

#[tokio::test]
async fn test_signed_request_carries_signature_params() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/account/accounts"))
        .and(query_param("AccessKeyId", "ak"))
        .and(query_param("SignatureMethod", "HmacSHA256"))
        .and(query_param("SignatureVersion", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": [
                {"id": 100009, "type": "spot", "subtype": "", "state": "working"},
                {"id": 100010, "type": "otc", "state": "working"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let connector = signed_connector(&server);
    let accounts = assert_ok!(connector.account.accounts().await);
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].id, 100009);
    assert_eq!(accounts[0].account_type, "spot");
    assert_eq!(accounts[1].subtype, "");

    let requests = server.received_requests().await.unwrap();
    let keys: Vec<String> = requests[0]
        .url
        .query_pairs()
        .map(|(k, _)| k.into_owned())
        .collect();
    assert!(keys.contains(&"Timestamp".to_string()));
    assert_eq!(keys.last().map(String::as_str), Some("Signature"));
}

#[tokio::test]
async fn test_candles_are_typed() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/market/history/kline"))
        .and(query_param("symbol", "btcusdt"))
        .and(query_param("period", "1min"))
        .and(query_param("size", "150"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ch": "market.btcusdt.kline.1min",
            "status": "ok",
            "ts": 1629769247172u64,
            "data": [{
                "id": 1629769200, "open": 49056.37, "close": 49025.51, "low": 49022.86,
                "high": 49056.38, "amount": 3.95, "vol": 193791.16, "count": 196
            }]
        })))
        .mount(&server)
        .await;

    let connector = public_connector(&server);
    let candles = assert_ok!(
        connector
            .market
            .candles("btcusdt", CandleInterval::Min1, None)
            .await
    );
    assert_eq!(candles.len(), 1);
    assert_eq!(candles[0].count, 196);
}

#[tokio::test]
async fn test_v1_error_envelope() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/market/history/kline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "err-code": "invalid-parameter",
            "err-msg": "invalid symbol"
        })))
        .mount(&server)
        .await;

    let err = public_connector(&server)
        .market
        .candles("btcusdt", CandleInterval::Day1, Some(10))
        .await
        .unwrap_err();
    match err {
        ExchangeError::ApiError { code, message } => {
            assert_eq!(code, "invalid-parameter");
            assert_eq!(message, "invalid symbol");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_v2_error_envelope() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v2/account/valuation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1002,
            "message": "unauthorized"
        })))
        .mount(&server)
        .await;

    let err = signed_connector(&server)
        .account
        .platform_valuation(None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ExchangeError::ApiError { ref code, .. } if code == "1002"));
}

#[tokio::test]
async fn test_http_error_with_envelope_is_api_error() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/common/timestamp"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "err-code": "bad-request",
            "err-msg": "malformed"
        })))
        .mount(&server)
        .await;

    let err = public_connector(&server).generic.timestamp().await.unwrap_err();
    assert!(matches!(err, ExchangeError::ApiError { ref code, .. } if code == "bad-request"));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_server_error_is_retryable_http_error() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/common/timestamp"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = public_connector(&server).generic.timestamp().await.unwrap_err();
    match &err {
        ExchangeError::HttpError { status, body, .. } => {
            assert_eq!(*status, 502);
            assert_eq!(body, "Bad Gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_place_order_posts_signed_body() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/order/orders/place"))
        .and(query_param("AccessKeyId", "ak"))
        .and(body_partial_json(json!({
            "account-id": 100009,
            "symbol": "btcusdt",
            "type": "buy-limit",
            "amount": "0.01",
            "price": "30000"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "data": "356501383558845"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let order = NewOrder::limit(
        100_009,
        "btcusdt",
        OrderSide::Buy,
        Decimal::new(1, 2),
        Decimal::new(30_000, 0),
    );
    let id = assert_ok!(signed_connector(&server).order.place_order(&order).await);
    assert_eq!(id, "356501383558845");
}

#[tokio::test]
async fn test_invalid_order_sends_nothing() {
    let server = setup_mock_server().await;
    let order = NewOrder::new(100_009, "btcusdt", OrderType::BuyLimit, Decimal::ONE);

    let err = signed_connector(&server)
        .order
        .place_order(&order)
        .await
        .unwrap_err();
    assert!(matches!(err, ExchangeError::ValidationError(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_signed_call_without_credentials() {
    let server = setup_mock_server().await;

    let err = public_connector(&server).account.accounts().await.unwrap_err();
    assert!(matches!(err, ExchangeError::ConfigurationError(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/common/timestamp"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok", "data": 1}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let connector = HuobiBuilder::new()
        .with_api_url(server.uri())
        .with_timeout(1)
        .build_rest_only()
        .unwrap();
    let err = connector.generic.timestamp().await.unwrap_err();
    match &err {
        ExchangeError::Timeout { endpoint, .. } => assert_eq!(endpoint, "/v1/common/timestamp"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}
