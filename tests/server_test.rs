//! Live-socket tests: the Argo CD client against a mock controller, and the
//! server lifecycle.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get as get_route;
use axum::{Json, Router};
use serde_json::json;

use homelab_gate::config::ArgoCdConfig;
use homelab_gate::lifecycle::Shutdown;
use homelab_gate::status::{ApplicationSource, ArgoCdClient, HealthStatus, StatusError, SyncStatus};

mod common;
use common::*;

async fn start_mock_argocd(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

fn argocd_config(addr: SocketAddr, token: &str) -> ArgoCdConfig {
    ArgoCdConfig {
        server: format!("http://{addr}/"),
        token: token.into(),
        ..ArgoCdConfig::default()
    }
}

#[tokio::test]
async fn argocd_client_lists_applications() {
    let mock = Router::new().route(
        "/api/v1/applications",
        get_route(|headers: HeaderMap| async move {
            if headers.get(header::AUTHORIZATION).map(|v| v.as_bytes()) != Some(b"Bearer s3cret".as_slice()) {
                return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "no" })));
            }
            (
                StatusCode::OK,
                Json(json!({ "items": [
                    { "metadata": { "name": "vaultwarden" },
                      "status": { "health": { "status": "Healthy" }, "sync": { "status": "OutOfSync" } } },
                    { "metadata": { "name": "mosquitto" },
                      "status": { "health": { "status": "Progressing" } } }
                ]})),
            )
        }),
    );
    let addr = start_mock_argocd(mock).await;

    let client = ArgoCdClient::new(&argocd_config(addr, "s3cret")).unwrap();
    let apps = client.applications().await.unwrap();

    assert_eq!(apps.len(), 2);
    assert_eq!(apps[0].name, "vaultwarden");
    assert_eq!(apps[0].health, HealthStatus::Healthy);
    assert_eq!(apps[0].sync, SyncStatus::OutOfSync);
    assert_eq!(apps[1].health, HealthStatus::Unknown);
    assert_eq!(apps[1].sync, SyncStatus::Unknown);

    let rejected = ArgoCdClient::new(&argocd_config(addr, "wrong")).unwrap();
    let err = rejected.applications().await.unwrap_err();
    assert!(matches!(err, StatusError::Upstream(status) if status == StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn server_gates_live_requests_and_shuts_down() {
    let h = harness();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let Harness {
        server,
        static_dir: _static_dir,
        ..
    } = h;
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();
    let handle = tokio::spawn(async move { server.run(listener, &server_shutdown).await });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap();

    let res = client
        .get(format!("http://{addr}/"))
        .header("x-forwarded-for", "203.0.113.30")
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 307);
    assert_eq!(res.headers()["location"], "/login");
    assert_eq!(res.headers()["x-frame-options"], "DENY");

    let res = client
        .get(format!("http://{addr}/"))
        .header("cookie", format!("session={}", valid_token()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}
