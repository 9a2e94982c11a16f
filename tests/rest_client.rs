//! REST client tests against a local canned-response `axum` server.
//!
//! Every request hitting the server is recorded, then answered with the
//! status and JSON body chosen by the test's handler closure.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use optiongreek::client::OptionGreekClient;
use optiongreek::config::ClientConfig;
use optiongreek::dashboard::{Panel, PanelData, PanelParams, PanelPoller};
use optiongreek::error::OptionGreekError;
use optiongreek::types::mcp::ToolCall;
use optiongreek::types::scanner::StockScanQuery;
use tokio::net::TcpListener;

// ===================================================================
// Mock server
// ===================================================================

#[derive(Debug, Clone)]
struct Captured {
    method: Method,
    target: String,
    headers: HeaderMap,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

type Handler = dyn Fn(&Captured) -> (u16, String) + Send + Sync;

#[derive(Clone)]
struct MockState {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<Captured>>>,
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let captured = Captured {
        method,
        target: uri
            .path_and_query()
            .map_or_else(|| uri.path().to_owned(), |pq| pq.as_str().to_owned()),
        headers,
        body,
    };
    let (status, body) = (state.handler)(&captured);
    state.requests.lock().unwrap().push(captured);

    let status = StatusCode::from_u16(status).unwrap();
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

struct MockServer {
    base_url: String,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl MockServer {
    async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Captured) -> (u16, String) + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            handler: Arc::new(handler),
            requests: requests.clone(),
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Always answer `status` with `body`.
    async fn fixed(status: u16, body: &str) -> Self {
        let body = body.to_owned();
        Self::start(move |_| (status, body.clone())).await
    }

    fn client(&self) -> OptionGreekClient {
        OptionGreekClient::with_base_url(&self.base_url).unwrap()
    }

    fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

const CHAIN_JSON: &str = r#"{
    "success": true, "symbol": "NSE:NIFTY50-INDEX", "spot_price": 24012.4, "atm_strike": 24000,
    "total_call_oi": 300, "total_put_oi": 360, "pcr": null,
    "expiries": [{"date": "26-12-2024"}],
    "chain": [
        {"strike_price": 23950, "call_oi": 100, "put_oi": 140,
         "call": {"ltp": 110.5, "oi": 100, "iv": 12.1}, "put": {"ltp": 48.0, "oi": 140, "iv": 13.0}},
        {"strike_price": 24000, "call_oi": 120, "put_oi": 150,
         "call": {"ltp": 80.0, "oi": 120, "iv": 11.8}, "put": {"ltp": 66.5, "oi": 150, "iv": 12.6}},
        {"strike_price": 24050, "call_oi": 80, "put_oi": 70,
         "call": {"ltp": 55.0, "oi": 80, "iv": 11.5}, "put": null}
    ],
    "timestamp": "2024-12-20T11:00:00"
}"#;

// ===================================================================
// Requests and parsing
// ===================================================================

#[tokio::test]
async fn option_chain_request_and_helpers() {
    let server = MockServer::fixed(200, CHAIN_JSON).await;
    let chain = server
        .client()
        .option_chain("NSE:NIFTY50-INDEX", 5)
        .await
        .expect("option_chain failed");

    let reqs = server.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].method, Method::GET);
    assert_eq!(
        reqs[0].target,
        "/api/v1/options/chain/NSE%3ANIFTY50-INDEX?strike_count=5"
    );
    assert_eq!(reqs[0].header("accept"), Some("application/json"));
    assert_eq!(reqs[0].header("authorization"), None);

    assert_eq!(chain.chain.len(), 3);
    assert!((chain.pcr().unwrap() - 1.2).abs() < 1e-9);
    assert_eq!(chain.atm_row().unwrap().strike_price, 24000.0);
    assert!(chain.row(24050.0).unwrap().put.is_none());
}

#[tokio::test]
async fn market_state_and_scan_queries() {
    let server = MockServer::start(|req| {
        if req.target.starts_with("/api/v1/market/state") {
            (200, r#"{"symbol": "NSE:NIFTY50-INDEX", "state": "RANGE", "tradable": false}"#.into())
        } else {
            (200, r#"{"success": true, "count": 0, "stocks": [], "errors": null}"#.into())
        }
    })
    .await;
    let client = server.client();

    let state = client.market_state("NSE:NIFTY50-INDEX").await.unwrap();
    assert!(!state.is_tradable());

    let query = StockScanQuery {
        limit: 10,
        tradable_only: true,
        top_only: false,
    };
    client.scan_fno_stocks(&query).await.unwrap();

    let reqs = server.requests();
    assert_eq!(reqs[0].target, "/api/v1/market/state?symbol=NSE%3ANIFTY50-INDEX");
    assert_eq!(
        reqs[1].target,
        "/api/v1/market/stocks/scan?limit=10&tradable_only=true&top_only=false"
    );
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let server = MockServer::fixed(200, r#"{"status": "healthy", "service": "OptionGreek API"}"#).await;
    let config = ClientConfig {
        api_base_url: server.base_url.clone(),
        access_token: Some("tok-123".into()),
        ..ClientConfig::default()
    };
    let client = OptionGreekClient::from_config(&config).unwrap();

    assert!(client.health().await.unwrap().is_healthy());
    assert_eq!(
        server.requests()[0].header("authorization"),
        Some("Bearer tok-123")
    );
}

#[tokio::test]
async fn mcp_batch_posts_calls() {
    let server = MockServer::fixed(
        200,
        r#"{"results": [
            {"content": [{"type": "text", "text": "{\"name\": \"A TRADER\"}"}]},
            {"isError": true, "content": [{"type": "text", "text": "Unknown tool: nope"}]}
        ]}"#,
    )
    .await;

    let calls = [ToolCall::new("get_profile"), ToolCall::new("nope")];
    let resp = server.client().mcp_batch(&calls).await.unwrap();

    assert_eq!(resp.results.len(), 2);
    assert_eq!(resp.results[0].json().unwrap()["name"], "A TRADER");
    assert!(resp.results[1].is_error);

    let req = &server.requests()[0];
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.target, "/api/v1/mcp/batch");
    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"calls": [
            {"name": "get_profile", "arguments": {}},
            {"name": "nope", "arguments": {}}
        ]})
    );
}

// ===================================================================
// Error mapping
// ===================================================================

#[tokio::test]
async fn fastapi_detail_becomes_api_error() {
    let server = MockServer::fixed(400, r#"{"detail": "Failed to fetch option chain"}"#).await;
    let err = server
        .client()
        .option_chain("NSE:NOPE-EQ", 10)
        .await
        .unwrap_err();

    match err {
        OptionGreekError::Api { status, body } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(body.message(), "Failed to fetch option chain");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn validation_detail_is_joined() {
    let server = MockServer::fixed(
        422,
        r#"{"detail": [{"loc": ["query", "strike_count"], "msg": "Input should be a valid integer", "type": "int_parsing"}]}"#,
    )
    .await;
    let err = server.client().greeks_heatmap("NSE:SBIN-EQ", 10).await.unwrap_err();
    let OptionGreekError::Api { body, .. } = err else {
        panic!("expected Api error");
    };
    assert_eq!(body.message(), "Input should be a valid integer");
}

#[tokio::test]
async fn non_json_error_becomes_http_status() {
    let server = MockServer::fixed(502, "Bad Gateway").await;
    let err = server.client().nifty_sentiment().await.unwrap_err();
    assert!(matches!(
        err,
        OptionGreekError::HttpStatus { status, ref body } if status.as_u16() == 502 && body == "Bad Gateway"
    ));
}

#[tokio::test]
async fn success_false_in_200_is_backend_error() {
    let server = MockServer::fixed(
        200,
        r#"{"success": false, "data": [], "error": "Fyers session expired"}"#,
    )
    .await;
    let err = server.client().indices().await.unwrap_err();
    assert!(matches!(err, OptionGreekError::Backend(ref m) if m == "Fyers session expired"));
}

#[tokio::test]
async fn local_validation_skips_the_network() {
    let server = MockServer::fixed(200, "{}").await;
    let client = server.client();

    let too_many: Vec<String> = (0..21).map(|i| format!("NSE:S{i}-EQ")).collect();
    assert!(matches!(
        client.bulk_oc_analysis(&too_many).await,
        Err(OptionGreekError::InvalidArgument(_))
    ));
    assert!(matches!(
        client.greeks_heatmap("NSE:SBIN-EQ", 31).await,
        Err(OptionGreekError::InvalidArgument(_))
    ));
    assert!(matches!(
        client.submit_auth_code("  ").await,
        Err(OptionGreekError::InvalidArgument(_))
    ));
    let calls: Vec<ToolCall> = (0..11).map(|_| ToolCall::new("get_funds")).collect();
    assert!(matches!(
        client.mcp_batch(&calls).await,
        Err(OptionGreekError::InvalidArgument(_))
    ));

    assert!(server.requests().is_empty());
}

// ===================================================================
// Panel polling
// ===================================================================

const INDICES_JSON: &str = r#"{"success": true, "data": [
    {"n": "NSE:NIFTY50-INDEX", "s": "ok", "v": {"lp": 24010.5, "ch": -12.3, "chp": -0.05}}
], "timestamp": "2024-12-20T11:00:00"}"#;

#[tokio::test]
async fn poller_keeps_stale_data_on_error() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let server = MockServer::start(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            (200, INDICES_JSON.to_owned())
        } else {
            (500, r#"{"detail": "Internal error"}"#.to_owned())
        }
    })
    .await;

    let handle = PanelPoller::spawn(
        server.client(),
        Panel::MarketIndices,
        PanelParams::default(),
        Duration::from_millis(50),
    );
    let mut state = handle.state();
    let snapshot = tokio::time::timeout(
        Duration::from_secs(5),
        state.wait_for(|s| s.fetch_count >= 2 && !s.fetching),
    )
    .await
    .expect("poller did not fetch twice")
    .unwrap()
    .clone();

    assert!(snapshot.is_stale());
    assert!(snapshot.error.as_deref().unwrap().contains("Internal error"));
    assert!(snapshot.last_updated.is_some());
    match snapshot.data {
        Some(PanelData::MarketIndices(r)) => assert_eq!(r.data[0].display_name(), "NIFTY50"),
        other => panic!("unexpected data {other:?}"),
    }
}

#[tokio::test]
async fn refresh_fetches_immediately() {
    let server = MockServer::fixed(200, INDICES_JSON).await;
    let handle = PanelPoller::spawn(
        server.client(),
        Panel::MarketIndices,
        PanelParams::default(),
        Duration::from_secs(3600),
    );
    let mut state = handle.state();

    tokio::time::timeout(Duration::from_secs(5), state.wait_for(|s| s.fetch_count == 1))
        .await
        .expect("first fetch")
        .unwrap();

    handle.refresh();
    let snapshot = tokio::time::timeout(
        Duration::from_secs(5),
        state.wait_for(|s| s.fetch_count == 2),
    )
    .await
    .expect("refresh did not trigger a fetch")
    .unwrap()
    .clone();

    assert!(snapshot.error.is_none());
    assert_eq!(server.requests().len(), 2);
}
