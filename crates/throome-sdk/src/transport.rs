// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Blocking HTTP transport shared by every façade.
//!
//! One round trip per call, no retries. Failures are classified into
//! [`SdkError::Api`] (the gateway answered with status >= 400) and
//! [`SdkError::Connection`] (the gateway was never reached).

use std::io::Read;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::SdkConfig;
use crate::error::{Result, SdkError};

/// HTTP methods used by the gateway API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// Query string pairs appended to a request URL.
pub(crate) type Query = Vec<(&'static str, String)>;

pub(crate) struct Transport {
    agent: ureq::Agent,
    base_url: String,
}

impl Transport {
    pub(crate) fn new(config: &SdkConfig) -> Result<Self> {
        let base_url = config.normalized_base_url()?;
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();

        Ok(Self { agent, base_url })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn get(&self, path: &str, query: &Query) -> Result<Option<Value>> {
        self.request(Method::Get, path, None, query)
    }

    pub(crate) fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Option<Value>> {
        let payload = serde_json::to_string(body)?;
        self.request(Method::Post, path, Some(payload), &Vec::new())
    }

    /// DELETE a resource. Whatever the gateway sends back on success is
    /// drained and discarded.
    pub(crate) fn delete(&self, path: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.send(Method::Delete, &url, None, &Vec::new())?;

        std::io::copy(&mut response.into_reader(), &mut std::io::sink())
            .map_err(|e| SdkError::Connection(format!("failed to read response from {}: {}", url, e)))?;
        Ok(())
    }

    /// Perform one JSON round trip.
    ///
    /// Returns `None` when the gateway answers with an empty body.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        query: &Query,
    ) -> Result<Option<Value>> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.send(method, &url, body, query)?;
        let text = read_body(response, &url)?;

        if text.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&text)?))
    }

    fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
        query: &Query,
    ) -> Result<ureq::Response> {
        debug!(method = method.as_str(), url = %url, "Sending gateway request");

        let mut request = self
            .agent
            .request(method.as_str(), url)
            .set("Content-Type", "application/json");
        for (key, value) in query {
            request = request.query(key, value);
        }

        let outcome = match body {
            Some(payload) => request.send_string(&payload),
            None => request.call(),
        };
        outcome.map_err(|err| classify(method, url, err))
    }

    /// GET a plain-text resource. No `Content-Type` is sent and the body is
    /// returned verbatim.
    pub(crate) fn request_text(&self, path: &str, query: &Query) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Sending gateway text request");

        let mut request = self.agent.get(&url);
        for (key, value) in query {
            request = request.query(key, value);
        }

        match request.call() {
            Ok(response) => read_body(response, &url),
            Err(ureq::Error::Status(status_code, response)) => {
                let status_text = response.status_text().to_string();
                let body = read_body(response, &url).unwrap_or_default();
                let message = fallback_message(status_code, &status_text, body.trim());
                warn!(status_code, message = %message, "Gateway rejected text request");
                Err(SdkError::Api {
                    status_code,
                    message,
                })
            }
            Err(ureq::Error::Transport(transport)) => {
                warn!(url = %url, error = %transport, "Gateway unreachable");
                Err(SdkError::Connection(format!("failed to get {}: {}", url, transport)))
            }
        }
    }
}

/// Map a JSON success payload into a typed record.
pub(crate) fn decode<T: DeserializeOwned>(value: Option<Value>, what: &str) -> Result<T> {
    match value {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Err(SdkError::UnexpectedResponse(format!(
            "empty response, expected {}",
            what
        ))),
    }
}

/// Read a whole response body, without the 10 MB cap of `Response::into_string`.
fn read_body(response: ureq::Response, url: &str) -> Result<String> {
    let mut text = String::new();
    response
        .into_reader()
        .read_to_string(&mut text)
        .map_err(|e| SdkError::Connection(format!("failed to read response from {}: {}", url, e)))?;
    Ok(text)
}

fn classify(method: Method, url: &str, err: ureq::Error) -> SdkError {
    match err {
        ureq::Error::Status(status_code, response) => {
            let status_text = response.status_text().to_string();
            let body = read_body(response, url).unwrap_or_default();
            let message = api_error_message(status_code, &status_text, &body);
            warn!(
                method = method.as_str(),
                status_code,
                message = %message,
                "Gateway rejected request"
            );
            SdkError::Api {
                status_code,
                message,
            }
        }
        ureq::Error::Transport(transport) => {
            warn!(method = method.as_str(), url = %url, error = %transport, "Gateway unreachable");
            SdkError::Connection(format!("{} {} failed: {}", method.as_str(), url, transport))
        }
    }
}

/// Pick a human-readable message from an error body.
///
/// Prefers the JSON `message` field, then `error`, then the raw body text.
pub(crate) fn api_error_message(status_code: u16, status_text: &str, body: &str) -> String {
    let body = body.trim();
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(text)) = fields.get(key) {
                if !text.is_empty() {
                    return text.clone();
                }
            }
        }
    }
    fallback_message(status_code, status_text, body)
}

fn fallback_message(status_code: u16, status_text: &str, body: &str) -> String {
    if !body.is_empty() {
        body.to_string()
    } else if !status_text.is_empty() {
        status_text.to_string()
    } else {
        format!("HTTP {}", status_code)
    }
}
