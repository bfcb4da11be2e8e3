//! In-process stand-in for the ANS backend with scripted replies.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{
    net::TcpListener,
    sync::{Mutex, Notify},
};

pub(crate) struct Reply {
    status: StatusCode,
    body: Value,
    hold: Option<Arc<Notify>>,
}

impl Reply {
    pub(crate) fn ok(body: Value) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    pub(crate) fn with_status(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            hold: None,
        }
    }

    /// Delays the response until `gate` is notified.
    pub(crate) fn held_by(mut self, gate: Arc<Notify>) -> Self {
        self.hold = Some(gate);
        self
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeBackend {
    replies: Arc<Mutex<HashMap<&'static str, VecDeque<Reply>>>>,
    pub(crate) queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub(crate) paths: Arc<Mutex<Vec<String>>>,
    pub(crate) arrived: Arc<Notify>,
}

impl FakeBackend {
    pub(crate) async fn script(&self, endpoint: &'static str, reply: Reply) {
        self.replies
            .lock()
            .await
            .entry(endpoint)
            .or_default()
            .push_back(reply);
    }

    pub(crate) async fn spawn(&self) -> String {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let app = Router::new()
            .route("/api/operadoras", get(list_operators))
            .route("/api/operadoras/:cnpj", get(operator))
            .route("/api/operadoras/:cnpj/despesas", get(expenses))
            .route("/api/estatisticas", get(statistics))
            .with_state(self.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}/api")
    }

    async fn reply(&self, endpoint: &'static str) -> Response {
        let next = self
            .replies
            .lock()
            .await
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front);
        self.arrived.notify_one();
        let Some(reply) = next else {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "no scripted reply"})),
            )
                .into_response();
        };
        if let Some(gate) = reply.hold {
            gate.notified().await;
        }
        (reply.status, Json(reply.body)).into_response()
    }
}

async fn list_operators(
    State(backend): State<FakeBackend>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    backend.queries.lock().await.push(query);
    backend.reply("operadoras").await
}

async fn operator(State(backend): State<FakeBackend>, Path(cnpj): Path<String>) -> Response {
    backend.paths.lock().await.push(cnpj);
    backend.reply("operadora").await
}

async fn expenses(State(backend): State<FakeBackend>, Path(cnpj): Path<String>) -> Response {
    backend.paths.lock().await.push(cnpj);
    backend.reply("despesas").await
}

async fn statistics(State(backend): State<FakeBackend>) -> Response {
    backend.reply("estatisticas").await
}
