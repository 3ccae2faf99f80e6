//! C2: HTTP Fan-out Client — three pooled `reqwest` clients, one per call
//! class, each with its own timeout budget. Redirects are refused outright
//! (a 3xx is surfaced as a transport error), idempotent GETs are retried
//! with exponential backoff, and a single `send` primitive owns the header
//! injection every outbound call needs.
use backoff::{future::retry, ExponentialBackoffBuilder};
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Relay response bodies on error paths are logged, never trusted further
/// than this many bytes.
const MAX_ERROR_BODY_BYTES: usize = 1024;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} timed out or failed to connect: {source}")]
    Request { url: String, #[source] source: reqwest::Error },
    #[error("{url} responded with status {status}: {body}")]
    Status { url: String, status: StatusCode, body: String },
    #[error("failed to read response body from {url}: {source}")]
    Transfer { url: String, #[source] source: reqwest::Error },
    #[error("failed to decode response body from {url}: {source}")]
    Decode { url: String, #[source] source: serde_json::Error },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallClass {
    Header,
    Payload,
    Registration,
}

/// Bundles the three call-class clients used throughout the multiplexer.
/// Construction is the only place timeouts are decided; callers just name
/// the call class they're making.
#[derive(Clone)]
pub struct HttpClients {
    header: Client,
    payload: Client,
    registration: Client,
    max_retries: u32,
    user_agent: String,
}

fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("static TLS/client configuration is always valid")
}

impl HttpClients {
    pub fn new(
        header_timeout: Duration,
        payload_timeout: Duration,
        registration_timeout: Duration,
        max_retries: u32,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            header: build_client(header_timeout),
            payload: build_client(payload_timeout),
            registration: build_client(registration_timeout),
            max_retries,
            user_agent: user_agent.into(),
        }
    }

    fn client_for(&self, class: CallClass) -> &Client {
        match class {
            CallClass::Header => &self.header,
            CallClass::Payload => &self.payload,
            CallClass::Registration => &self.registration,
        }
    }

    /// `SendHTTPRequest`: the sole transport primitive. `slot_uid`, when
    /// present, is injected as `X-Slot-UID`. `body` is serialized JSON sent
    /// on POST; GETs retry up to `max_retries` times with exponential
    /// backoff, POSTs are attempted exactly once. A `204` is reported back
    /// to the caller as `Ok(None)` with the output buffer untouched.
    pub async fn send<B: serde::Serialize + ?Sized, O: serde::de::DeserializeOwned>(
        &self,
        class: CallClass,
        method: Method,
        url: &str,
        caller_user_agent: Option<&str>,
        slot_uid: Option<&str>,
        body: Option<&B>,
    ) -> Result<Option<O>, TransportError> {
        self.send_with_headers(class, method, url, caller_user_agent, slot_uid, &[], body).await
    }

    /// Same contract as [`Self::send`], with room for call-site-specific
    /// headers such as the registration broadcaster's `X-Start-Time-Unix-Ms`.
    pub async fn send_with_headers<B: serde::Serialize + ?Sized, O: serde::de::DeserializeOwned>(
        &self,
        class: CallClass,
        method: Method,
        url: &str,
        caller_user_agent: Option<&str>,
        slot_uid: Option<&str>,
        extra_headers: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Option<O>, TransportError> {
        let client = self.client_for(class);
        let user_agent = match caller_user_agent {
            Some(caller) => format!("{}/{}", self.user_agent, caller),
            None => self.user_agent.clone(),
        };

        let attempt = || async {
            let mut request = client.request(method.clone(), url).header("Content-Type", "application/json").header("User-Agent", &user_agent);
            if let Some(uid) = slot_uid {
                request = request.header("X-Slot-UID", uid);
            }
            for (name, value) in extra_headers {
                request = request.header(*name, value.as_str());
            }
            if let Some(body) = body {
                request = request.json(body);
            }
            let response = request.send().await.map_err(|source| {
                backoff::Error::transient(TransportError::Request { url: url.to_string(), source })
            })?;
            Ok(response)
        };

        let response = if method == Method::GET && self.max_retries > 0 {
            let policy = ExponentialBackoffBuilder::new()
                .with_max_elapsed_time(Some(Duration::from_secs(5)))
                .build();
            retry(policy, attempt).await?
        } else {
            attempt().await.map_err(unwrap_backoff)?
        };

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let truncated: String = body.chars().take(MAX_ERROR_BODY_BYTES).collect();
            return Err(TransportError::Status { url: url.to_string(), status, body: truncated });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|source| TransportError::Transfer { url: url.to_string(), source })?;
        if bytes.is_empty() {
            return Ok(None);
        }
        let decoded = serde_json::from_slice::<O>(&bytes)
            .map_err(|source| TransportError::Decode { url: url.to_string(), source })?;
        Ok(Some(decoded))
    }
}

fn unwrap_backoff(err: backoff::Error<TransportError>) -> TransportError {
    match err {
        backoff::Error::Permanent(err) | backoff::Error::Transient { err, .. } => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_for_routes_to_the_configured_class() {
        let clients = HttpClients::new(
            Duration::from_millis(250),
            Duration::from_secs(2),
            Duration::from_secs(10),
            1,
            "relay-mux/test",
        );
        // Three distinct clients exist; routing is exercised end-to-end in
        // the auction/redemption integration tests.
        let _ = clients.client_for(CallClass::Header);
        let _ = clients.client_for(CallClass::Payload);
        let _ = clients.client_for(CallClass::Registration);
    }
}
