//! Per-cycle tracing context.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation data for one request cycle.
///
/// Every log line emitted while a cycle runs is attached to the span from
/// [`RequestContext::span`], so `cycle_id` and `host_id` can be used to
/// follow a single cycle through interleaved output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Unique cycle identifier.
    pub cycle_id: Uuid,
    /// Host the cycle is bound to, if any.
    pub host_id: Option<String>,
    /// When the cycle started.
    pub started_at: DateTime<Utc>,
    /// Component that created the context.
    pub source: String,
    /// Operation being performed.
    pub operation: Option<String>,
    /// Additional metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl RequestContext {
    /// Creates a context with a fresh cycle id.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            host_id: None,
            started_at: Utc::now(),
            source: source.into(),
            operation: None,
            metadata: HashMap::new(),
        }
    }

    /// Sets the host id.
    #[must_use]
    pub fn with_host(mut self, host_id: impl Into<String>) -> Self {
        self.host_id = Some(host_id.into());
        self
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Adds metadata.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Milliseconds since the cycle started.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.started_at)
            .num_milliseconds()
    }

    /// First eight characters of the cycle id.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.cycle_id.simple().to_string().chars().take(8).collect()
    }

    /// Span carrying the cycle's correlation fields.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "cycle",
            cycle_id = %self.cycle_id,
            host_id = self.host_id.as_deref(),
            source = %self.source,
            operation = self.operation.as_deref(),
        )
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new("unknown")
    }
}

/// Enters a context's span and logs its duration on drop.
pub struct RequestGuard {
    context: RequestContext,
    _span: tracing::span::EnteredSpan,
}

impl RequestGuard {
    /// Enters `context`'s span.
    #[must_use]
    pub fn new(context: RequestContext) -> Self {
        let span = context.span().entered();
        tracing::debug!("Cycle context entered");
        Self {
            context,
            _span: span,
        }
    }

    /// The guarded context.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        tracing::debug!(elapsed_ms = self.context.elapsed_ms(), "Cycle context closed");
    }
}
