//! End-to-end tests of the report API router.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shared_types::{authorship_message, report_content_hash, Address, ReportType};
use std::sync::Arc;
use sw_02_wallet_provider::{LocalWallet, WalletProvider};
use sw_03_report_api::{ApiConfig, ReportApiService};
use tower::ServiceExt;

const REPORTER: &str = "0x00000000000000000000000000000000000000aa";

fn app() -> Router {
    app_with(ApiConfig::default()).0
}

fn app_with(config: ApiConfig) -> (Router, ReportApiService) {
    let service = ReportApiService::with_defaults(config).unwrap();
    (service.router(), service)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn submission(report_type: &str, target: &str, description: &str) -> Value {
    json!({
        "reportType": report_type,
        "targetValue": target,
        "description": description,
        "reporterAddress": REPORTER,
    })
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, value) = send(app, Method::POST, "/api/reports", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", value);
    value["data"].clone()
}

#[tokio::test]
async fn test_create_report_defaults() {
    let app = app();
    let report = create(
        &app,
        submission("phishing_url", "https://claim-airdrop.example", "Fake airdrop"),
    )
    .await;

    assert_eq!(report["id"], 1);
    assert_eq!(report["status"], "pending");
    assert_eq!(report["voteScore"], 0);
    assert_eq!(report["anchorOnChain"], false);
    assert_eq!(report["reporterAddress"], REPORTER);

    let expected = report_content_hash(
        ReportType::PhishingUrl,
        "https://claim-airdrop.example",
        "Fake airdrop",
        &REPORTER.parse().unwrap(),
    );
    assert_eq!(
        report["reportHash"],
        format!("0x{}", hex::encode(expected))
    );
}

#[tokio::test]
async fn test_create_keeps_client_report_hash() {
    let app = app();
    let mut body = submission("scam_wallet", "0xdead", "Drainer");
    body["reportHash"] = json!("0xfeed");
    let report = create(&app, body).await;
    assert_eq!(report["reportHash"], "0xfeed");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/reports",
        Some(json!({ "reportType": "phishing_url", "targetValue": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "reportType, targetValue, description, and reporterAddress are required"
    );

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/reports",
        Some(submission("rug_pull", "x", "y")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_address = submission("phishing_url", "x", "y");
    bad_address["reporterAddress"] = json!("0x1234");
    let (status, body) = send(&app, Method::POST, "/api/reports", Some(bad_address)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "reporterAddress must be a valid wallet address");
}

#[tokio::test]
async fn test_malformed_and_oversized_bodies() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/reports")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let huge = "a".repeat(128 * 1024);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/reports",
        Some(submission("phishing_url", "x", &huge)),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_get_update_delete_by_id() {
    let app = app();
    create(&app, submission("phishing_url", "evil.example", "Clone site")).await;

    let (status, report) = send(&app, Method::GET, "/api/reports/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["targetValue"], "evil.example");

    let (status, body) = send(&app, Method::GET, "/api/reports/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Valid ID is required");

    let (status, body) = send(&app, Method::GET, "/api/reports/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Report not found");

    let (status, updated) = send(
        &app,
        Method::PATCH,
        "/api/reports/1",
        Some(json!({ "status": "verified", "anchorOnChain": true, "onChainTxHash": "0xabc" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "verified");
    assert_eq!(updated["anchorOnChain"], true);
    assert_eq!(updated["description"], "Clone site");

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/reports/1",
        Some(json!({ "status": "escalated" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PATCH, "/api/reports/9", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, "/api/reports/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Report deleted successfully");

    let (status, _) = send(&app, Method::DELETE, "/api/reports/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/api/reports/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_pagination_and_filters() {
    let app = app();
    for i in 0..5 {
        create(
            &app,
            submission("phishing_url", &format!("site-{}.example", i), "Phishing"),
        )
        .await;
    }
    create(&app, submission("scam_wallet", "0xbeef", "Fake MetaMask support")).await;

    let (status, body) = send(&app, Method::GET, "/api/reports?page=2&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["pagination"]["total"], 6);
    assert_eq!(data["pagination"]["totalPages"], 3);
    let ids: Vec<i64> = data["reports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![4, 3]);
    assert_eq!(
        data["reports"][0]["reporter"]["walletAddress"],
        REPORTER
    );

    let (_, body) = send(&app, Method::GET, "/api/reports?reportType=scam_wallet", None).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let (_, body) = send(&app, Method::GET, "/api/reports?search=metamask", None).await;
    assert_eq!(body["data"]["reports"][0]["targetValue"], "0xbeef");

    let (_, body) = send(&app, Method::GET, "/api/reports?limit=1000&page=junk", None).await;
    assert_eq!(body["data"]["pagination"]["limit"], 100);
    assert_eq!(body["data"]["pagination"]["page"], 1);

    let (status, _) = send(&app, Method::GET, "/api/reports?status=archived", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats() {
    let app = app();

    let (_, body) = send(&app, Method::GET, "/api/reports/stats", None).await;
    assert_eq!(body["data"]["totalReports"], 0);
    assert_eq!(body["data"]["anchoredPercentage"], "0");

    let mut anchored = submission("phishing_url", "a.example", "x");
    anchored["anchorOnChain"] = json!(true);
    create(&app, anchored).await;
    create(&app, submission("phishing_url", "b.example", "x")).await;
    let mut other = submission("scam_wallet", "0xabc", "x");
    other["reporterAddress"] = json!("0x00000000000000000000000000000000000000bb");
    create(&app, other).await;

    let (status, body) = send(&app, Method::GET, "/api/reports/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"];
    assert_eq!(stats["totalReports"], 3);
    assert_eq!(stats["anchoredReports"], 1);
    assert_eq!(stats["phishingReports"], 2);
    assert_eq!(stats["scamWalletReports"], 1);
    assert_eq!(stats["totalUsers"], 2);
    assert_eq!(stats["anchoredPercentage"], "33.3");
}

#[tokio::test]
async fn test_votes() {
    let app = app();
    create(&app, submission("phishing_url", "x.example", "x")).await;

    let vote = |direction: &str| json!({ "voterAddress": REPORTER, "direction": direction });

    send(&app, Method::POST, "/api/reports/1/vote", Some(vote("up"))).await;
    send(&app, Method::POST, "/api/reports/1/vote", Some(vote("up"))).await;
    let (status, body) = send(&app, Method::POST, "/api/reports/1/vote", Some(vote("down"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["upvotes"], 2);
    assert_eq!(body["data"]["downvotes"], 1);
    assert_eq!(body["data"]["voteScore"], 1);

    let (status, body) =
        send(&app, Method::POST, "/api/reports/1/vote", Some(vote("sideways"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "direction must be either 'up' or 'down'");

    let (status, _) = send(&app, Method::POST, "/api/reports/7/vote", Some(vote("up"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_vote_counters_at_the_limit() {
    let app = app();
    create(&app, submission("phishing_url", "x.example", "x")).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/reports/1",
        Some(json!({ "upvotes": 5, "downvotes": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["voteScore"], 3);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/reports/1",
        Some(json!({ "upvotes": u64::MAX })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("upvotes must be at most"));

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/reports/1",
        Some(json!({ "upvotes": i64::MAX, "downvotes": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let up = json!({ "voterAddress": REPORTER, "direction": "up" });
    for _ in 0..2 {
        let (status, body) = send(&app, Method::POST, "/api/reports/1/vote", Some(up.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["voteScore"], i64::MAX);
    }

    let down = json!({ "voterAddress": REPORTER, "direction": "down" });
    let (status, body) = send(&app, Method::POST, "/api/reports/1/vote", Some(down)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["downvotes"], 1);
    assert_eq!(body["data"]["voteScore"], i64::MAX);
}

async fn signed_submission(
    description_signed: &str,
    description_sent: &str,
) -> Value {
    let wallet = Arc::new(LocalWallet::random(1));
    let provider = WalletProvider::with_provider(wallet.clone());
    let connection = provider.connect().await.unwrap();
    let address: Address = connection.address;

    let message = authorship_message(
        ReportType::PhishingUrl,
        "wallet-connect.example",
        description_signed,
        &address,
    );
    let signed = provider.sign_message(&message).await.unwrap();

    json!({
        "reportType": "phishing_url",
        "targetValue": "wallet-connect.example",
        "description": description_sent,
        "reporterAddress": address.to_checksum(),
        "signature": signed.signature(),
    })
}

#[tokio::test]
async fn test_signed_report_accepted() {
    let (app, service) = app_with(ApiConfig::default());
    let body = signed_submission("Fake connect page", "Fake connect page").await;

    let report = create(&app, body).await;
    assert_eq!(report["description"], "Fake connect page");

    let metrics = service.metrics().to_json();
    assert_eq!(metrics["reports"]["signed"], 1);
}

#[tokio::test]
async fn test_tampered_report_rejected() {
    let (app, service) = app_with(ApiConfig::default());
    let body = signed_submission("Fake connect page", "Totally legit page").await;

    let (status, body) = send(&app, Method::POST, "/api/reports", Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let metrics = service.metrics().to_json();
    assert_eq!(metrics["reports"]["signature_rejections"], 1);
}

#[tokio::test]
async fn test_unsigned_report_refused_when_signatures_required() {
    let mut config = ApiConfig::default();
    config.security.require_signed_reports = true;
    let (app, _) = app_with(config);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/reports",
        Some(submission("phishing_url", "x", "y")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body = signed_submission("Signed", "Signed").await;
    create(&app, body).await;
}

#[tokio::test]
async fn test_health_metrics_and_request_id() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");

    let (status, body) = send(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["requests"]["total"].as_u64().unwrap() >= 2);
}
