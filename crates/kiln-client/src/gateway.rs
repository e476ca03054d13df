//! Transport gateway: the single chokepoint between the typed client
//! surface and raw HTTP.
//!
//! Responsibilities, and nothing else:
//! - unwrap the `{code, message, data}` envelope on JSON endpoints,
//! - pass binary endpoints through untouched,
//! - map transport/envelope failures into [`ClientError`],
//! - notify the user-facing [`Notifier`] exactly once per failed call.
//!
//! The gateway performs no retries; each call is attempted exactly once.
//! Retry policy, where wanted, belongs to the caller.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

use kiln_types::{CODE_NOT_FOUND, Envelope};

use crate::error::ClientError;
use crate::notify::{Notifier, TracingNotifier};
use crate::upload::{FilePart, ProgressFn, UploadHandle, progress_body};

/// Default per-call timeout. Deliberately long: uploads and
/// training-triggering calls are slow operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(300_000);

/// HTTP gateway for one backend API root.
///
/// Cloning is cheap (the underlying connection pool is shared), which is
/// also how per-call overrides work:
///
/// ```rust,ignore
/// let quick = gateway.with_timeout(Duration::from_secs(5));
/// let stats: StatsSummary = quick.get_json("/stats").await?;
/// ```
#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    notifier: Arc<dyn Notifier>,
}

impl Gateway {
    /// Create a gateway for `base_url` (e.g. `http://host:5000/api`) with
    /// the default timeout and the tracing-backed notifier.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("kiln-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout: DEFAULT_TIMEOUT,
            notifier: Arc::new(TracingNotifier),
        }
    }

    /// Replace the notification sink (a toast/alert bridge in a UI shell).
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Return a gateway identical to this one but with a different
    /// timeout. Used both at construction time and as a per-call override.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut gw = self.clone();
        gw.timeout = timeout;
        gw
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ── JSON endpoints ───────────────────────────────────────────────────────

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let req = self.http.get(self.url(path)).timeout(self.timeout);
        self.send_envelope(req).await.map_err(|e| self.fail(e))
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self
            .http
            .post(self.url(path))
            .json(body)
            .timeout(self.timeout);
        self.send_envelope(req).await.map_err(|e| self.fail(e))
    }

    /// POST with an empty body (e.g. `/tasks/{id}/stop`).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let req = self.http.post(self.url(path)).timeout(self.timeout);
        self.send_envelope(req).await.map_err(|e| self.fail(e))
    }

    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let req = self.http.delete(self.url(path)).timeout(self.timeout);
        let _: serde_json::Value = self.send_envelope(req).await.map_err(|e| self.fail(e))?;
        Ok(())
    }

    // ── Binary endpoints ─────────────────────────────────────────────────────

    /// Fetch an opaque binary payload (model weights, dataset archives).
    /// Binary endpoints do not carry an envelope and are never parsed as
    /// one; failures still arrive as JSON envelopes and are mapped.
    pub async fn get_bytes(&self, path: &str) -> Result<Bytes, ClientError> {
        let run = async {
            let resp = self
                .http
                .get(self.url(path))
                .timeout(self.timeout)
                .send()
                .await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(match resp.json::<Envelope>().await {
                    Ok(env) => envelope_failure(env),
                    Err(_) => ClientError::Business {
                        code: status.as_u16() as i64,
                        message: status.to_string(),
                    },
                });
            }
            Ok(resp.bytes().await?)
        };
        run.await.map_err(|e| self.fail(e))
    }

    // ── Multipart endpoints ──────────────────────────────────────────────────

    /// POST a multipart form: text fields plus one file part streamed with
    /// progress reporting. A cancel observed on `handle` surfaces as
    /// [`ClientError::Cancelled`] and is excluded from notification.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, String)],
        file: FilePart,
        progress: Option<ProgressFn>,
        handle: &UploadHandle,
    ) -> Result<T, ClientError> {
        let run = async {
            let total = file.data.len() as u64;
            let body = progress_body(file.data, progress, handle.flag());
            let part = reqwest::multipart::Part::stream_with_length(body, total)
                .file_name(file.file_name)
                .mime_str(&file.mime)?;

            let mut form = reqwest::multipart::Form::new().part(file.field_name, part);
            for (name, value) in fields {
                form = form.text(name.to_string(), value.clone());
            }

            let req = self
                .http
                .post(self.url(path))
                .multipart(form)
                .timeout(self.timeout);
            self.send_envelope(req).await
        };

        run.await.map_err(|err| {
            // A transport error caused by our own aborted body stream is a
            // user-initiated cancel, not a real failure.
            let err = if handle.is_cancelled() && matches!(err, ClientError::Transport(_)) {
                ClientError::Cancelled
            } else {
                err
            };
            self.fail(err)
        })
    }

    // ── Internals ────────────────────────────────────────────────────────────

    async fn send_envelope<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let resp = req.send().await?;
        let envelope: Envelope = resp.json().await?;
        if !envelope.is_ok() {
            return Err(envelope_failure(envelope));
        }
        Ok(serde_json::from_value(envelope.data)?)
    }

    /// Single notification point: every failure passes through here once,
    /// on its way out of the gateway. Cancellations are suppressed.
    fn fail(&self, err: ClientError) -> ClientError {
        if !err.is_cancelled() {
            self.notifier.error(&err.user_message());
        }
        err
    }
}

fn envelope_failure(env: Envelope) -> ClientError {
    if env.code == CODE_NOT_FOUND {
        ClientError::NotFound(env.message)
    } else {
        ClientError::Business {
            code: env.code,
            message: env.message,
        }
    }
}
