//! Executing requests: the `Transport` seam and the background dispatcher.
//!
//! The UI thread never blocks on the network. `Dispatcher::dispatch` runs every
//! request on its own worker thread and the event loop collects finished
//! requests with `Dispatcher::drain`. Requests are neither ordered nor
//! cancelled relative to each other.
//!
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use tracing::{debug, warn};

use super::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::error::ApiError;

/// Performs one HTTP round trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking `reqwest` transport. No request timeout is set.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.text().map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, headers, body })
    }
}

/// A request handed to the dispatcher, tagged with the caller's ticket.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub ticket: u64,
    pub request: HttpRequest,
}

/// The outcome of a dispatched request.
#[derive(Debug, Clone)]
pub struct Completion {
    pub ticket: u64,
    pub result: Result<HttpResponse, ApiError>,
}

pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (tx, rx) = channel();
        Self { transport, tx, rx }
    }

    pub fn dispatch(&self, pending: PendingRequest) {
        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let PendingRequest { ticket, request } = pending;
            debug!(ticket, method = request.method.as_str(), url = %request.url, "request started");
            let result = transport.execute(&request);
            if let Err(err) = &result {
                warn!(ticket, error = %err, "request failed before a response arrived");
            }
            // The receiver only goes away when the app is shutting down.
            let _ = tx.send(Completion { ticket, result });
        });
    }

    /// Completions that have arrived since the last call, in arrival order.
    pub fn drain(&self) -> Vec<Completion> {
        self.rx.try_iter().collect()
    }

    /// Block until one completion arrives or `timeout` passes.
    pub fn wait(&self, timeout: std::time::Duration) -> Option<Completion> {
        self.rx.recv_timeout(timeout).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Echo;

    impl Transport for Echo {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            if request.url.ends_with("/fail") {
                return Err(ApiError::Transport("connection refused".into()));
            }
            Ok(HttpResponse {
                status: 200,
                headers: vec![],
                body: request.url.clone(),
            })
        }
    }

    fn get(url: &str) -> HttpRequest {
        HttpRequest { method: HttpMethod::Get, url: url.into(), headers: vec![], body: None }
    }

    #[test]
    fn completions_carry_their_ticket() {
        let d = Dispatcher::new(Arc::new(Echo));
        d.dispatch(PendingRequest { ticket: 7, request: get("http://x/employees") });
        d.dispatch(PendingRequest { ticket: 8, request: get("http://x/fail") });

        let mut seen = Vec::new();
        while seen.len() < 2 {
            let c = d.wait(Duration::from_secs(5)).expect("completion");
            seen.push(c);
        }
        seen.sort_by_key(|c| c.ticket);
        assert_eq!(seen[0].result.as_ref().unwrap().body, "http://x/employees");
        assert_eq!(seen[1].result, Err(ApiError::Transport("connection refused".into())));
        assert!(d.drain().is_empty());
    }
}
