// Test helpers are intentionally partially used
#![allow(dead_code)]

use reqwest::Client;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;
use valentine_post::domain::{Credential, MetricsPtr, RepositoryPtr};
use valentine_post::{create_memory_repository, create_noop_metrics, create_router};

/// Cards available in every test server.
pub const SEEDED: &[(i64, &str)] = &[(42, "heart"), (7, "lucky"), (100, "century")];

/// In-memory repository holding the `SEEDED` credentials.
pub async fn seeded_repository() -> RepositoryPtr {
    // ---
    let repo = create_memory_repository();
    let credentials: Vec<Credential> = SEEDED
        .iter()
        .map(|(id, password)| Credential::new(*id, *password))
        .collect();
    repo.insert_credentials(&credentials)
        .await
        .expect("seeding in-memory repository");
    repo
}

pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
    pub repository: RepositoryPtr,
}

impl TestServer {
    // ---
    pub async fn new() -> Self {
        // ---
        Self::with_metrics(create_noop_metrics().expect("noop metrics")).await
    }

    pub async fn with_metrics(metrics: MetricsPtr) -> Self {
        // --

        // Enable debug logging only when requested
        if std::env::var("TEST_DEBUG").is_ok() {
            let _ = tracing_subscriber::fmt()
                .with_env_filter("debug")
                .with_ansi(false)
                .with_test_writer()
                .try_init();
        }

        let repository = seeded_repository().await;
        let app = create_router(repository.clone(), metrics);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        sleep(Duration::from_millis(100)).await;

        let client = Client::new();

        Self {
            addr,
            client,
            repository,
        }
    }

    pub fn base_url(&self) -> String {
        // ---
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }
}

/// An address nothing listens on.
pub async fn closed_addr() -> std::net::SocketAddr {
    // ---
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
