//! Chat backend abstraction.
//!
//! The [`ChatBackend`] trait decouples sessions from the actual model service
//! (currently an Ollama-compatible `/api/chat` endpoint). Tests use scripted
//! backends that return predetermined replies without any network traffic.

use std::time::Duration;

use anyhow::Result;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::core::message::Message;
use crate::io::config::BackendConfig;

/// Abstraction over chat model backends.
pub trait ChatBackend {
    /// Send the ordered `messages` to `model` and return the generated text.
    fn chat(&self, model: &str, messages: &[Message]) -> Result<String>;
}

impl<T: ChatBackend + ?Sized> ChatBackend for &T {
    fn chat(&self, model: &str, messages: &[Message]) -> Result<String> {
        (**self).chat(model, messages)
    }
}

/// Failures talking to a chat backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("cannot connect to backend at {host}: {reason}")]
    Connect { host: String, reason: String },
    #[error("chat request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unreadable backend response: {0}")]
    Decode(String),
}

/// Sampling options forwarded with every chat request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingOptions {
    pub temperature: f64,
    pub top_p: f64,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    options: SamplingOptions,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Backend that talks to an Ollama server over HTTP.
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: Client,
    chat_url: Url,
    options: SamplingOptions,
}

impl OllamaBackend {
    /// Validate the configured host and build a blocking HTTP client.
    ///
    /// No request is made here; an unreachable server surfaces on the first `chat`.
    pub fn connect(config: &BackendConfig) -> Result<Self, BackendError> {
        let connect_err = |reason: String| BackendError::Connect {
            host: config.host.clone(),
            reason,
        };
        let chat_url = Url::parse(&format!("{}/api/chat", config.host.trim_end_matches('/')))
            .map_err(|err| connect_err(err.to_string()))?;
        if !matches!(chat_url.scheme(), "http" | "https") {
            return Err(connect_err(format!(
                "unsupported scheme '{}'",
                chat_url.scheme()
            )));
        }

        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        // Local daemons are never reached through a proxy.
        if is_loopback(&chat_url) {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(|err| connect_err(err.to_string()))?;

        info!(host = %config.host, "chat backend configured");
        Ok(Self {
            client,
            chat_url,
            options: SamplingOptions {
                temperature: config.temperature,
                top_p: config.top_p,
            },
        })
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    fn send_chat(&self, model: &str, messages: &[Message]) -> Result<String, BackendError> {
        let payload = ChatRequest {
            model,
            messages,
            stream: false,
            options: self.options,
        };
        let response = self
            .client
            .post(self.chat_url.clone())
            .json(&payload)
            .send()
            .map_err(|source| BackendError::Request {
                url: self.chat_url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().map_err(|source| BackendError::Request {
            url: self.chat_url.to_string(),
            source,
        })?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "chat request rejected");
            return Err(status_error(status.as_u16(), &body));
        }
        parse_chat_response(&body)
    }
}

impl ChatBackend for OllamaBackend {
    #[instrument(skip_all, fields(model = model, messages = messages.len()))]
    fn chat(&self, model: &str, messages: &[Message]) -> Result<String> {
        info!("sending prompt to model");
        let content = self.send_chat(model, messages)?;
        info!(bytes = content.len(), "received response from model");
        Ok(content)
    }
}

/// Offline backend that answers with `prefix` followed by the last message.
///
/// Handy for dry runs: the output file shows exactly what each file contributed.
#[derive(Debug, Clone, Default)]
pub struct EchoBackend {
    prefix: String,
}

impl EchoBackend {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ChatBackend for EchoBackend {
    fn chat(&self, model: &str, messages: &[Message]) -> Result<String> {
        debug!(model, messages = messages.len(), "echo backend");
        let last = messages.last().map(Message::content).unwrap_or_default();
        Ok(format!("{}{}", self.prefix, last))
    }
}

fn is_loopback(url: &Url) -> bool {
    matches!(
        url.host_str(),
        Some("localhost" | "127.0.0.1" | "[::1]" | "::1")
    )
}

fn parse_chat_response(body: &str) -> Result<String, BackendError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|err| BackendError::Decode(err.to_string()))?;
    Ok(parsed.message.map(|m| m.content).unwrap_or_default())
}

fn status_error(status: u16, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());
    BackendError::Status { status, message }
}
