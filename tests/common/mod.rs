#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Value,
}

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Text(&'static str),
}

/// Canned answer for requests whose path starts with `prefix`.
#[derive(Debug, Clone)]
pub struct Rule {
    method: Option<Method>,
    prefix: &'static str,
    status: StatusCode,
    reply: Reply,
}

pub fn rule(method: Method, prefix: &'static str, status: u16, body: Value) -> Rule {
    Rule {
        method: Some(method),
        prefix,
        status: StatusCode::from_u16(status).expect("valid status"),
        reply: Reply::Json(body),
    }
}

/// Like [`rule`], but answers with `text` as-is instead of JSON.
pub fn text_rule(method: Method, prefix: &'static str, status: u16, text: &'static str) -> Rule {
    Rule {
        reply: Reply::Text(text),
        ..rule(method, prefix, status, Value::Null)
    }
}

pub fn any_method(prefix: &'static str, status: u16, body: Value) -> Rule {
    Rule {
        method: None,
        ..rule(Method::GET, prefix, status, body)
    }
}

#[derive(Clone)]
struct Shared {
    rules: Arc<Vec<Rule>>,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

/// Stand-in for the analysis service. Records every request; answers with
/// the first matching rule, or echoes the request back with 200.
pub struct FakeUpstream {
    pub base_url: String,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeUpstream {
    pub fn start(rules: Vec<Rule>) -> Self {
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let shared = Shared {
            rules: Arc::new(rules),
            recorded: Arc::clone(&recorded),
        };
        let app = Router::new().fallback(handle).with_state(shared);
        let base_url = serve_in_background(app);
        Self { base_url, recorded }
    }

    pub fn take(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.recorded.lock().unwrap())
    }

    pub fn last(&self) -> Option<Recorded> {
        self.recorded.lock().unwrap().last().cloned()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.recorded
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.path == path)
            .cloned()
            .collect()
    }
}

async fn handle(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    shared.recorded.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        body: body.clone(),
    });

    let matched = shared.rules.iter().find(|rule| {
        rule.method.as_ref().is_none_or(|expected| *expected == method)
            && path.starts_with(rule.prefix)
    });

    match matched {
        Some(Rule {
            status,
            reply: Reply::Json(body),
            ..
        }) => (*status, Json(body.clone())).into_response(),
        Some(Rule {
            status,
            reply: Reply::Text(text),
            ..
        }) => (*status, *text).into_response(),
        None => (
            StatusCode::OK,
            Json(json!({ "method": method.to_string(), "path": path, "body": body })),
        )
            .into_response(),
    }
}

/// Serves `app` on its own thread and runtime so it outlives any single test.
pub fn serve_in_background(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    format!("http://127.0.0.1:{port}")
}

/// The proxy router, in-process, pointed at `upstream_base_url`.
pub fn spawn_proxy(upstream_base_url: &str) -> String {
    let upstream = write_track::Upstream::new(upstream_base_url, Duration::from_secs(2))
        .expect("upstream client");
    let state = write_track::AppState::new(upstream, write_track::catalog::Catalog::default());
    serve_in_background(write_track::router(state))
}

pub fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

pub fn words(count: usize) -> String {
    vec!["practice"; count].join(" ")
}
