//! Client for the linq JSON API.
//!
//! Modules never await the network. They queue a request with [`Http::get`]
//! or [`Http::delete`] and keep the returned [`RequestId`]; the event loop
//! drains the outbox, runs each request on a tokio task, and feeds the
//! decoded result back as [`AppEvent::HttpResponse`].
//!
//! Wire format (`application/linq.api+json`):
//!
//! ```text
//! 200  {"data": [ ... ], "token": "<uuid>"}
//! 4xx  {"errors": [{"status": 404, "source": "/sales/..", "title": "Not Found",
//!                   "method": "GET", "detail": "..."}]}
//! ```

use crate::app::event::{AppEvent, RequestId};
use crate::config::model::ApiConfig;
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

const ACCEPT: &str = "application/linq.api+json, application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub id: RequestId,
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
}

/// Decoded success envelope.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ApiSuccess {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub token: Option<String>,
}

/// One entry of the error envelope.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub detail: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.title)?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct ApiErrors {
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    #[error("API error {0}")]
    Api(ApiError),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Turn a status code and body into the envelope they describe.
pub fn decode_response(status: u16, body: &str) -> Result<ApiSuccess, HttpError> {
    if (200..300).contains(&status) {
        if body.trim().is_empty() {
            return Ok(ApiSuccess::default());
        }
        return serde_json::from_str(body).map_err(|e| HttpError::Malformed(e.to_string()));
    }

    let first = serde_json::from_str::<ApiErrors>(body)
        .ok()
        .and_then(|envelope| envelope.errors.into_iter().next());
    let error = match first {
        Some(mut error) => {
            if error.status == 0 {
                error.status = status;
            }
            error
        }
        None => ApiError {
            status,
            title: reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Error")
                .to_string(),
            ..ApiError::default()
        },
    };
    Err(HttpError::Api(error))
}

pub struct Http {
    client: RefCell<Client>,
    base_url: RefCell<String>,
    token: RefCell<Option<String>>,
    outbox: RefCell<Vec<HttpRequest>>,
    next_id: Cell<RequestId>,
}

impl Http {
    pub fn new(config: &ApiConfig) -> Result<Self, HttpError> {
        Ok(Self {
            client: RefCell::new(build_client(config)?),
            base_url: RefCell::new(normalize_base_url(&config.base_url)),
            token: RefCell::new(None),
            outbox: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        })
    }

    /// Point later requests at a new endpoint and timeout. Requests already
    /// in flight finish on the old client. On error the old settings stay.
    pub fn configure(&self, config: &ApiConfig) -> Result<(), HttpError> {
        let client = build_client(config)?;
        *self.client.borrow_mut() = client;
        *self.base_url.borrow_mut() = normalize_base_url(&config.base_url);
        tracing::debug!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            "api client configured"
        );
        Ok(())
    }

    pub fn base_url(&self) -> String {
        self.base_url.borrow().clone()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.borrow(), path.trim_start_matches('/'))
    }

    pub fn get(&self, path: &str, query: Vec<(String, String)>) -> RequestId {
        self.enqueue(Method::Get, path, query)
    }

    pub fn delete(&self, path: &str) -> RequestId {
        self.enqueue(Method::Delete, path, Vec::new())
    }

    fn enqueue(&self, method: Method, path: &str, query: Vec<(String, String)>) -> RequestId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.outbox.borrow_mut().push(HttpRequest {
            id,
            method,
            path: path.to_string(),
            query,
        });
        id
    }

    pub fn drain(&self) -> Vec<HttpRequest> {
        std::mem::take(&mut *self.outbox.borrow_mut())
    }

    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    /// Remember the rolling token from the latest success envelope.
    pub fn set_token(&self, token: Option<String>) {
        if token.is_some() {
            *self.token.borrow_mut() = token;
        }
    }

    /// Run `request` on a background task. The outcome is posted to `tx`.
    pub fn dispatch(&self, request: HttpRequest, tx: mpsc::UnboundedSender<AppEvent>) {
        let url = self.url(&request.path);
        let mut query = request.query;
        if let Some(token) = self.token() {
            query.push(("token".to_string(), token));
        }
        let client = self.client.borrow().clone();
        let id = request.id;
        let method = request.method;

        tracing::debug!(id, %method, %url, "dispatching request");
        tokio::spawn(async move {
            let result = execute(&client, method, &url, &query).await;
            if let Err(ref e) = result {
                tracing::warn!(id, %method, %url, error = %e, "request failed");
            }
            let _ = tx.send(AppEvent::HttpResponse { id, result });
        });
    }
}

fn build_client(config: &ApiConfig) -> Result<Client, HttpError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));

    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs.max(1)))
        .default_headers(headers)
        .build()
        .map_err(|e| HttpError::Transport(format!("failed to build HTTP client: {e}")))
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

async fn execute(
    client: &Client,
    method: Method,
    url: &str,
    query: &[(String, String)],
) -> Result<ApiSuccess, HttpError> {
    let builder = match method {
        Method::Get => client.get(url),
        Method::Delete => client.delete(url),
    };
    let response = builder
        .query(query)
        .send()
        .await
        .map_err(|e| HttpError::Transport(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| HttpError::Transport(e.to_string()))?;
    decode_response(status, &body)
}
