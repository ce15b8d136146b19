//! Run context for correlating every log line of one courier invocation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and metadata of a single courier run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunContext {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Command being executed (e.g. `upload plan`).
    pub command: String,
    /// Project name, once known.
    pub project: Option<String>,
    /// Project version, once known.
    pub version: Option<String>,
    /// Additional metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl RunContext {
    /// Create a context for `command`.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            command: command.into(),
            project: None,
            version: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Set the project being released.
    #[must_use]
    pub fn with_project(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.project = Some(name.into());
        self.version = Some(version.into());
        self
    }

    /// Add metadata.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Get elapsed time since the run started.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        // Utc::now() >= self.started_at by construction
        #[allow(clippy::arithmetic_side_effects)]
        let elapsed = Utc::now() - self.started_at;
        elapsed
    }

    /// Get elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed().num_milliseconds()
    }

    /// Create a tracing span carrying this context.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "run",
            run_id = %self.short_id(),
            command = %self.command,
            project = self.project.as_deref(),
            version = self.version.as_deref(),
        )
    }

    /// First eight hex digits of the run id, for log lines.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.run_id.simple().to_string().chars().take(8).collect()
    }
}

/// Enters the run span and logs start and completion.
pub struct RunGuard {
    context: RunContext,
    /// Held to keep the span active until the guard is dropped.
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl RunGuard {
    /// Enter the span of `context`.
    #[must_use]
    pub fn new(context: RunContext) -> Self {
        let span = context.span().entered();
        tracing::debug!("Run started");
        Self { context, span }
    }

    /// Get the run context.
    #[must_use]
    pub fn context(&self) -> &RunContext {
        &self.context
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        tracing::debug!(elapsed_ms = self.context.elapsed_ms(), "Run completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_context_creation() {
        let ctx = RunContext::new("config show");
        assert_eq!(ctx.command, "config show");
        assert!(ctx.project.is_none());
        assert!(ctx.metadata.is_empty());
    }

    #[test]
    fn test_run_context_builder() {
        let ctx = RunContext::new("upload plan")
            .with_project("app", "1.0.0")
            .with_metadata("files", "3");

        assert_eq!(ctx.project.as_deref(), Some("app"));
        assert_eq!(ctx.version.as_deref(), Some("1.0.0"));
        assert_eq!(ctx.metadata["files"], "3");
    }

    #[test]
    fn test_unique_run_ids() {
        let a = RunContext::new("x");
        let b = RunContext::new("x");
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn test_short_id() {
        let ctx = RunContext::new("x");
        let short = ctx.short_id();
        assert_eq!(short.len(), 8);
        assert!(ctx.run_id.simple().to_string().starts_with(&short));
    }

    #[test]
    fn test_elapsed_is_non_negative() {
        let ctx = RunContext::new("x");
        assert!(ctx.elapsed_ms() >= 0);
    }

    #[test]
    fn test_serialization() {
        let ctx = RunContext::new("config paths").with_project("app", "2.0.0");
        let json = serde_json::to_string(&ctx).unwrap();
        let parsed: RunContext = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.run_id, ctx.run_id);
        assert_eq!(parsed.project, ctx.project);
    }

    #[test]
    fn test_guard_holds_context() {
        let guard = RunGuard::new(RunContext::new("x").with_metadata("k", "v"));
        assert_eq!(guard.context().metadata["k"], "v");
    }
}
