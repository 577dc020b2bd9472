//! Streaming request-body pipeline.
//!
//! PATCH bodies are never buffered: they flow chunk by chunk into the blob
//! sink, optionally teed through a running checksum hasher. This module
//! adapts an axum body into the sink's [`ByteStream`], applying the per-read
//! deadline and the input cap, and classifying failures so the handler can
//! tell a stalled client (408) from everything else (500).

use axum::body::Body;
use futures::StreamExt;
use hoist_core::checksum::ChecksumHasher;
use hoist_storage::ByteStream;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared slot for a hasher teed off the body stream.
///
/// The stream side updates it per chunk; the handler takes it back out to
/// finalize once the append returns.
pub type HasherSlot = Arc<Mutex<Option<ChecksumHasher>>>;

/// Wrap a checksum hasher for teeing.
pub fn hasher_slot(hasher: ChecksumHasher) -> HasherSlot {
    Arc::new(Mutex::new(Some(hasher)))
}

/// Take the hasher back out of its slot and finalize the hex digest.
pub fn finalize_digest(slot: &HasherSlot) -> Option<String> {
    slot.lock()
        .unwrap_or_else(|e| e.into_inner())
        .take()
        .map(ChecksumHasher::finalize)
}

/// Convert a request body into the sink's byte stream.
///
/// Each chunk read races against `read_timeout`; a deadline miss yields an
/// `ErrorKind::TimedOut` item and ends the stream. The running total is
/// capped at `max_bytes`; exceeding it ends the stream with an error so the
/// durably written prefix is still accounted.
pub fn request_body_stream(body: Body, max_bytes: u64, read_timeout: Duration) -> ByteStream {
    let mut data = body.into_data_stream();
    let stream = async_stream::stream! {
        let mut total: u64 = 0;
        loop {
            let next = match tokio::time::timeout(read_timeout, data.next()).await {
                Ok(next) => next,
                Err(_) => {
                    yield Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "timed out reading the request body",
                    ));
                    break;
                }
            };
            let Some(item) = next else { break };
            match item {
                Ok(chunk) => {
                    total += chunk.len() as u64;
                    if total > max_bytes {
                        yield Err(io::Error::other("request body exceeds the input cap"));
                        break;
                    }
                    yield Ok(chunk);
                }
                Err(e) => {
                    yield Err(map_body_error(e));
                    break;
                }
            }
        }
    };
    Box::pin(stream)
}

/// Tee a byte stream through a checksum hasher.
pub fn tee_digest(stream: ByteStream, slot: HasherSlot) -> ByteStream {
    Box::pin(stream.map(move |item| {
        if let Ok(chunk) = &item
            && let Some(hasher) = slot.lock().unwrap_or_else(|e| e.into_inner()).as_mut()
        {
            hasher.update(chunk);
        }
        item
    }))
}

/// Map an axum body error to `io::Error`, preserving timeouts.
fn map_body_error(err: axum::Error) -> io::Error {
    if source_chain_has_timeout(&err) {
        io::Error::new(io::ErrorKind::TimedOut, err)
    } else {
        io::Error::other(err)
    }
}

fn source_chain_has_timeout(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>()
            && io_err.kind() == io::ErrorKind::TimedOut
        {
            return true;
        }
        current = e.source();
    }
    false
}
