//! Drives a live server over TCP with a real HTTP client.

use std::time::Duration;

use calcweb_server::{NetworkConfig, NetworkModule};
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct TestServer {
    base_url: String,
    stop: Option<oneshot::Sender<()>>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let config = NetworkConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..NetworkConfig::default()
        };
        let mut module = NetworkModule::new(config);
        let port = module.start().await.expect("bind");

        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(module.serve(async {
            let _ = stopped.await;
        }));

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            stop: Some(stop),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        let response = reqwest::Client::new()
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("request");
        let status = response.status().as_u16();
        (status, response.json().await.expect("json body"))
    }

    async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server stops")
            .expect("server task")
            .expect("serve result");
    }
}

#[tokio::test]
async fn documented_scenarios_over_the_wire() {
    let server = TestServer::start().await;

    assert_eq!(
        server.post("/add", &json!({"a": 10, "b": 5})).await,
        (200, json!({"result": 15.0}))
    );
    assert_eq!(
        server.post("/subtract", &json!({"a": 10, "b": 5})).await,
        (200, json!({"result": 5.0}))
    );
    assert_eq!(
        server.post("/multiply", &json!({"a": 10, "b": 5})).await,
        (200, json!({"result": 50.0}))
    );
    assert_eq!(
        server.post("/divide", &json!({"a": 10, "b": 5})).await,
        (200, json!({"result": 2.0}))
    );
    assert_eq!(
        server.post("/divide", &json!({"a": 10, "b": 0})).await,
        (400, json!({"error": "Cannot divide by zero!"}))
    );
    assert_eq!(
        server.post("/add", &json!({"a": "x", "b": 5})).await,
        (400, json!({"error": "a: value is not a valid number"}))
    );
    assert_eq!(
        server.post("/add", &json!({"a": "5", "b": 3})).await,
        (200, json!({"result": 8.0}))
    );

    server.stop().await;
}

#[tokio::test]
async fn homepage_and_health_checks() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let page = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(page.status().as_u16(), 200);
    let html = page.text().await.unwrap();
    assert!(html.contains("<h1>Hello World</h1>"));

    let ready = client.get(server.url("/health/ready")).send().await.unwrap();
    assert_eq!(ready.status().as_u16(), 200);

    let health: Value = client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["state"], "ready");

    let doc: Value = client
        .get(server.url("/openapi.json"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(doc["paths"]["/divide"]["post"].is_object());

    server.stop().await;
}

#[tokio::test]
async fn wrong_method_is_405() {
    let server = TestServer::start().await;

    let response = reqwest::Client::new()
        .get(server.url("/add"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 405);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Method Not Allowed"}));

    server.stop().await;
}
