use yield_risk_engine::network::{MarketDataSource, RetryConfig, YieldsClient};
use yield_risk_engine::{Config, EngineError};

fn client_for(server: &mockito::ServerGuard) -> YieldsClient {
    let config = Config {
        yields_api_url: server.url(),
        protocols_api_url: server.url(),
        http_timeout_secs: 5,
        ..Default::default()
    };
    YieldsClient::new(&config).unwrap().with_bulk_retry(RetryConfig {
        max_attempts: 3,
        initial_delay_ms: 1,
        max_delay_ms: 5,
        exponential_base: 2.0,
    })
}

#[tokio::test]
async fn test_fetch_pools_parses_envelope() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/pools")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"status":"success","data":[
                {"pool":"abc","chain":"Ethereum","project":"aave-v3","symbol":"USDC",
                 "tvlUsd":1500000000,"apy":3.1,"apyBase":3.1,"apyReward":null,
                 "stablecoin":true,"ilRisk":"no","exposure":"single",
                 "underlyingTokens":["0xa0b8"]}
            ]}"#,
        )
        .create_async()
        .await;

    let pools = client_for(&server).fetch_pools().await.unwrap();
    mock.assert_async().await;

    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0].id, "abc");
    assert_eq!(pools[0].tvl_usd, Some(1.5e9));
    assert_eq!(pools[0].apy_reward, None);
    assert_eq!(pools[0].stablecoin, Some(true));
}

#[tokio::test]
async fn test_fetch_pools_retries_server_errors() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/pools")
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let err = client_for(&server).fetch_pools().await.unwrap_err();
    mock.assert_async().await;
    assert!(matches!(err, EngineError::Network { retry_count: 3, .. }));
}

#[tokio::test]
async fn test_fetch_pools_does_not_retry_client_errors() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/pools")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let err = client_for(&server).fetch_pools().await.unwrap_err();
    mock.assert_async().await;
    assert!(matches!(err, EngineError::UpstreamStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_payload_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/pools")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client_for(&server).fetch_pools().await.unwrap_err();
    assert!(matches!(err, EngineError::DataParsing { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_fetch_pool_history_keeps_null_apy() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/chart/abc")
        .with_status(200)
        .with_body(
            r#"{"status":"success","data":[
                {"timestamp":"2026-01-01T00:00:00.000Z","tvlUsd":100,"apy":4.2},
                {"timestamp":"2026-01-02T00:00:00.000Z","tvlUsd":110,"apy":null}
            ]}"#,
        )
        .create_async()
        .await;

    let history = client_for(&server).fetch_pool_history("abc").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].apy, Some(4.2));
    assert_eq!(history[1].apy, None);
}

#[tokio::test]
async fn test_fetch_pool_history_single_attempt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/chart/abc")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    assert!(client_for(&server).fetch_pool_history("abc").await.is_err());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_protocols_bare_array() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/protocols")
        .with_status(200)
        .with_body(
            r#"[{"name":"Aave V3","slug":"aave-v3","category":"Lending","chain":"Multi-Chain",
                 "chains":["Ethereum","Arbitrum"],"tvl":20000000000,"parentProtocol":"parent#aave"}]"#,
        )
        .create_async()
        .await;

    let protocols = client_for(&server).fetch_protocols().await.unwrap();
    assert_eq!(protocols.len(), 1);
    assert_eq!(protocols[0].slug, "aave-v3");
    assert_eq!(protocols[0].parent_protocol.as_deref(), Some("parent#aave"));
    assert_eq!(protocols[0].chains.len(), 2);
}

#[tokio::test]
async fn test_fetch_pools_keeps_valid_records_beside_bad_ones() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/pools")
        .with_status(200)
        .with_body(
            r#"{"status":"success","data":[
                {"pool":"abc","project":"aave-v3","symbol":"USDC","tvlUsd":1000000,"apy":3.1},
                {"project":"compound-v3","symbol":"USDC","tvlUsd":2000000,"apy":4.0}
            ]}"#,
        )
        .create_async()
        .await;

    let pools = client_for(&server).fetch_pools().await.unwrap();
    assert_eq!(pools.len(), 2);
    assert_eq!(pools[0].id, "abc");
    assert!(pools[1].id.is_empty());
}
