//! In-process SPARQL endpoint stub for integration tests
//!
//! An axum router bound to an ephemeral local port. Every request is
//! recorded and answered with whatever the handler returns.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use oxigraph::model::Term;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use serde_json::{json, Map, Value};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const STUB_PATH: &str = "/roadnet/sparql";

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl StubResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "application/sparql-results+json",
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.into(),
        }
    }
}

impl IntoResponse for StubResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

type Handler = dyn Fn(&CapturedRequest) -> StubResponse + Send + Sync;

#[derive(Clone)]
struct StubState {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn capture(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> StubResponse {
    let request = CapturedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect(),
        body: String::from_utf8_lossy(&body).into_owned(),
    };

    let response = (state.handler)(&request);
    state.requests.lock().unwrap().push(request);
    response
}

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}{}", listener.local_addr().unwrap(), STUB_PATH);
    (listener, url)
}

pub struct StubEndpoint {
    pub url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    handle: JoinHandle<()>,
}

impl StubEndpoint {
    /// Serve every request with `handler`
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&CapturedRequest) -> StubResponse + Send + Sync + 'static,
    {
        let (listener, url) = bind().await;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            handler: Arc::new(handler),
            requests: requests.clone(),
        };
        let app: Router = Router::new().fallback(capture).with_state(state);

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url,
            requests,
            handle,
        }
    }

    /// Always answer with the same response
    pub async fn fixed(response: StubResponse) -> Self {
        Self::start(move |_| response.clone()).await
    }

    /// Accept requests and never answer
    pub async fn silent() -> Self {
        let (listener, url) = bind().await;
        let app: Router = Router::new().fallback(|| std::future::pending::<StatusCode>());

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url,
            requests: Arc::new(Mutex::new(Vec::new())),
            handle,
        }
    }

    /// Answer SELECT queries from an oxigraph store
    pub async fn backed_by(store: Store) -> Self {
        Self::start(move |request| evaluate(&store, &request.body)).await
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubEndpoint {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn term_json(term: &Term) -> Value {
    match term {
        Term::NamedNode(node) => json!({ "type": "uri", "value": node.as_str() }),
        Term::BlankNode(node) => json!({ "type": "bnode", "value": node.as_str() }),
        Term::Literal(literal) => match literal.language() {
            Some(lang) => json!({ "type": "literal", "xml:lang": lang, "value": literal.value() }),
            None => json!({
                "type": "literal",
                "datatype": literal.datatype().as_str(),
                "value": literal.value()
            }),
        },
        #[allow(unreachable_patterns)]
        other => json!({ "type": "literal", "value": other.to_string() }),
    }
}

/// Evaluate a SELECT query and encode it as SPARQL Results JSON
pub fn evaluate(store: &Store, query: &str) -> StubResponse {
    let results = match store.query(query) {
        Ok(results) => results,
        Err(e) => return StubResponse::with_status(400, e.to_string()),
    };

    let solutions = match results {
        QueryResults::Solutions(solutions) => solutions,
        _ => return StubResponse::with_status(400, "SELECT queries only"),
    };

    let vars: Vec<String> = solutions
        .variables()
        .iter()
        .map(|v| v.as_str().to_string())
        .collect();

    let mut bindings = Vec::new();
    for solution in solutions {
        let solution = match solution {
            Ok(solution) => solution,
            Err(e) => return StubResponse::with_status(500, e.to_string()),
        };
        let mut binding = Map::new();
        for (var, term) in solution.iter() {
            binding.insert(var.as_str().to_string(), term_json(term));
        }
        bindings.push(Value::Object(binding));
    }

    StubResponse::json(
        json!({ "head": { "vars": vars }, "results": { "bindings": bindings } }).to_string(),
    )
}

/// Shared sink for formatted log output
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a fmt subscriber and return what it logged
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();

    let value = tracing::subscriber::with_default(subscriber, f);
    (value, buffer.contents())
}

/// Log lines at `level` that mention `needle`
pub fn lines_at<'a>(logs: &'a str, level: &str, needle: &str) -> Vec<&'a str> {
    logs.lines()
        .filter(|line| line.split_whitespace().any(|token| token == level))
        .filter(|line| line.contains(needle))
        .collect()
}
