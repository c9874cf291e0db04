//! Per-request trace context
//!
//! A trace id correlates every log line and audit payload produced while
//! handling one request. It lives in tokio task-local storage: the HTTP layer
//! enters a scope for the request future and every component running inside
//! that future can read the id without it being threaded through call
//! signatures. Concurrent requests each run in their own scope and never see
//! each other's id.
//!
//! Work spawned onto a new task does not inherit the scope; capture the id
//! with [`TraceId::current`] first and re-enter with [`TraceId::scope`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use uuid::Uuid;

/// Longest inbound trace id accepted from a client header
pub const MAX_TRACE_ID_LEN: usize = 128;

tokio::task_local! {
    static CURRENT_TRACE: TraceId;
}

/// Correlation token for one pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    /// Generates a fresh random trace id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accepts a client-supplied trace id
    ///
    /// Returns `None` for blank values, values longer than
    /// [`MAX_TRACE_ID_LEN`], or values containing anything but visible ASCII,
    /// in which case the caller should generate one instead.
    pub fn from_header(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty()
            || value.len() > MAX_TRACE_ID_LEN
            || !value.chars().all(|c| c.is_ascii_graphic())
        {
            return None;
        }
        Some(Self(value.to_string()))
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the trace id of the enclosing scope, if any
    pub fn current() -> Option<TraceId> {
        CURRENT_TRACE.try_with(|trace| trace.clone()).ok()
    }

    /// Returns the enclosing trace id, or a new one when called outside a scope
    pub fn current_or_generate() -> TraceId {
        Self::current().unwrap_or_else(Self::generate)
    }

    /// Runs `future` with this id as the current trace
    pub async fn scope<F>(self, future: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_TRACE.scope(self, future).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_trace_outside_scope() {
        assert!(TraceId::current().is_none());
    }

    #[test]
    fn test_from_header_rejects_blank_and_oversized() {
        assert!(TraceId::from_header("   ").is_none());
        assert!(TraceId::from_header(&"a".repeat(MAX_TRACE_ID_LEN + 1)).is_none());
        assert!(TraceId::from_header("has space").is_none());
        assert_eq!(TraceId::from_header(" abc-123 ").unwrap().as_str(), "abc-123");
    }

    #[tokio::test]
    async fn test_scope_exposes_trace() {
        let trace = TraceId::from_header("req-42").unwrap();
        let seen = trace.clone().scope(async { TraceId::current() }).await;
        assert_eq!(seen, Some(trace));
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_scopes_are_isolated() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let trace = TraceId::from_header(&format!("trace-{}", i)).unwrap();
                tokio::spawn(trace.clone().scope(async move {
                    tokio::task::yield_now().await;
                    (trace, TraceId::current())
                }))
            })
            .collect();

        for handle in handles {
            let (expected, seen) = handle.await.unwrap();
            assert_eq!(seen, Some(expected));
        }
    }

    #[tokio::test]
    async fn test_current_or_generate_prefers_scope() {
        let trace = TraceId::generate();
        let inside = trace.clone().scope(async { TraceId::current_or_generate() }).await;
        assert_eq!(inside, trace);
        assert_ne!(TraceId::current_or_generate(), trace);
    }
}
