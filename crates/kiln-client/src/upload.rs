//! Multipart upload pipeline: chunked body streaming with progress
//! observation and cooperative cancellation.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;

/// Observer invoked with a percentage in `0..=100` as bytes go out.
/// Values are non-decreasing; duplicates are possible and must be
/// tolerated.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

const CHUNK_SIZE: usize = 64 * 1024;

/// Cancellation handle for an in-flight upload.
///
/// Cancellation is cooperative: the body stream checks the flag before
/// each chunk, so the transfer may already have completed server-side by
/// the time the abort is observed. The gateway maps an abort to
/// [`ClientError::Cancelled`](crate::ClientError::Cancelled) and skips
/// the error notification.
#[derive(Debug, Clone, Default)]
pub struct UploadHandle {
    cancelled: Arc<AtomicBool>,
}

impl UploadHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub(crate) fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

/// One file destined for a multipart form field.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field_name: String,
    pub file_name: String,
    pub mime: String,
    pub data: Bytes,
}

impl FilePart {
    pub fn new(field_name: impl Into<String>, file_name: impl Into<String>, data: Bytes) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            mime: "application/octet-stream".to_owned(),
            data,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }
}

/// Body stream that slices a buffer into chunks, reports percent sent
/// after every chunk, and aborts with an error once cancelled.
struct ProgressStream {
    data: Bytes,
    offset: usize,
    progress: Option<ProgressFn>,
    cancelled: Arc<AtomicBool>,
    done: bool,
}

impl Stream for ProgressStream {
    type Item = Result<Bytes, io::Error>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        if this.cancelled.load(Ordering::SeqCst) {
            this.done = true;
            return Poll::Ready(Some(Err(io::Error::new(
                io::ErrorKind::Interrupted,
                "upload cancelled",
            ))));
        }

        let total = this.data.len();
        if total == 0 {
            // Nothing to send; still settle the observer at 100.
            this.done = true;
            if let Some(progress) = &this.progress {
                progress(100);
            }
            return Poll::Ready(None);
        }
        if this.offset >= total {
            this.done = true;
            return Poll::Ready(None);
        }

        let end = (this.offset + CHUNK_SIZE).min(total);
        let chunk = this.data.slice(this.offset..end);
        this.offset = end;

        if let Some(progress) = &this.progress {
            // offset only grows, so the reported percent is non-decreasing.
            let pct = (this.offset as u64 * 100 / total as u64) as u8;
            progress(pct);
        }

        Poll::Ready(Some(Ok(chunk)))
    }
}

/// Wrap `data` into a streaming [`reqwest::Body`] that drives `progress`
/// and honors the cancel flag.
pub(crate) fn progress_body(
    data: Bytes,
    progress: Option<ProgressFn>,
    cancelled: Arc<AtomicBool>,
) -> reqwest::Body {
    reqwest::Body::wrap_stream(ProgressStream {
        data,
        offset: 0,
        progress,
        cancelled,
        done: false,
    })
}
