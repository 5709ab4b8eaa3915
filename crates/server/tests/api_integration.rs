use std::{net::SocketAddr, sync::Arc, time::Duration};

use alloy_primitives::Address;
use api::{ApiState, DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD};
use driver::{
    PointsTracker,
    testing::{self, FakeChain, FakeStore, tokens},
};
use primitives::PointsParams;
use reqwest::StatusCode;
use serde_json::{Value, json};
use server::{API_VERSION, run};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
    time::{Instant, sleep},
};

async fn free_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn spawn_server(
    tracker: PointsTracker,
) -> (SocketAddr, oneshot::Sender<()>, JoinHandle<eyre::Result<()>>) {
    let addr = free_addr().await;
    let state = ApiState::new(tracker, DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD);
    let allowed = config::DEFAULT_ALLOWED_ORIGINS.split(',').map(|s| s.to_owned()).collect();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(run(addr, state, allowed, async move {
        let _ = rx.await;
    }));
    wait_for_server(addr).await;
    (addr, tx, handle)
}

async fn wait_for_server(addr: SocketAddr) {
    let start = Instant::now();
    loop {
        if TcpStream::connect(addr).await.is_ok() {
            break;
        }
        if start.elapsed() > Duration::from_secs(5) {
            panic!("server did not start in time");
        }
        sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn calculate_then_leaderboard_integration() {
    let holder = Address::repeat_byte(0x77);
    let store = Arc::new(FakeStore::default());
    let tracker = PointsTracker::new(
        Arc::new(FakeChain::new(2_000).with_balance(holder, tokens(50))),
        Arc::clone(&store) as _,
        testing::config(PointsParams::new(1_000, 0.001)),
    );
    let (addr, shutdown, handle) = spawn_server(tracker).await;
    let base = format!("http://{addr}/{API_VERSION}");
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/calculate"))
        .json(&json!({ "address": format!("  {holder}  ") }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["blocks_held"], 1_000);
    assert_eq!(body["points"], 50.0);
    assert_eq!(body["level"], 2);

    let resp = client.get(format!("{base}/leaderboard")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["entries"][0]["address"], format!("{holder:#x}"));
    assert_eq!(body["entries"][0]["rank"], 1);

    shutdown.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn health_and_openapi_integration() {
    let tracker = PointsTracker::new(
        Arc::new(FakeChain::new(1)),
        Arc::new(FakeStore::default()),
        testing::config(PointsParams::default()),
    );
    let (addr, shutdown, handle) = spawn_server(tracker).await;

    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp =
        reqwest::get(format!("http://{addr}/{API_VERSION}/api-doc/openapi.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let doc: Value = resp.json().await.unwrap();
    assert!(doc["paths"]["/calculate"].is_object());

    shutdown.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
