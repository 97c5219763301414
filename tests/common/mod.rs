//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{extract::Query, http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;

/// A mock redirection decision service on a local listener.
pub struct DecisionStub {
    pub addr: SocketAddr,
    /// (host, url) query pairs received, in arrival order.
    pub lookups: Arc<Mutex<Vec<(String, String)>>>,
}

impl DecisionStub {
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    #[allow(dead_code)]
    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

/// Start a decision stub answering every lookup with a fixed status and body.
pub async fn start_decision_stub(status: u16, body: &'static str) -> DecisionStub {
    let lookups = Arc::new(Mutex::new(Vec::new()));
    let seen = lookups.clone();

    let app = Router::new().route(
        "/",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push((
                    params.get("host").cloned().unwrap_or_default(),
                    params.get("url").cloned().unwrap_or_default(),
                ));
                (StatusCode::from_u16(status).unwrap(), body)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    DecisionStub { addr, lookups }
}
