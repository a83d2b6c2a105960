//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::net::TcpListener;

use routegate::config::ServerConfig;
use routegate::http::HttpServer;
use routegate::lifecycle::{launch, Shutdown};
use routegate::net::Listener;
use routegate::routing::Dispatcher;

/// Config for tests: ephemeral port, cheap hashing.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.auth.secret = "integration-test-secret-value".to_string();
    config.auth.bcrypt_cost = 4;
    config
}

/// A running server plus the handle that stops it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the full application on an ephemeral port.
pub async fn start_server() -> TestServer {
    start_server_with(test_config()).await
}

pub async fn start_server_with(config: ServerConfig) -> TestServer {
    let shutdown = Shutdown::new();
    let running = launch(config, &shutdown).await.unwrap();
    TestServer {
        addr: running.local_addr,
        shutdown,
    }
}

/// Serve a hand-built dispatcher on an ephemeral port.
pub async fn serve_dispatcher(config: ServerConfig, dispatcher: Dispatcher) -> TestServer {
    let shutdown = Shutdown::new();
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let listener = Listener::from_listener(tcp, config.listener.max_connections).unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config, Arc::new(dispatcher));
    tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer { addr, shutdown }
}

/// Register `username` and return a bearer token for it.
pub async fn register_and_login(
    client: &reqwest::Client,
    server: &TestServer,
    username: &str,
) -> String {
    let credentials = json!({ "username": username, "password": "correct horse" });

    let res = client
        .post(server.url("/users/register"))
        .json(&credentials)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let res = client
        .post(server.url("/users/login"))
        .json(&credentials)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    body["Token"].as_str().unwrap().to_string()
}
