//! Structured logging configuration and the per-request logger.
//!
//! The process carries exactly one base [`Logger`], created at startup from
//! a [`LogConfig`] and never reconfigured afterwards. It is a handle on a
//! root `tracing` span holding the static deployment fields (`role`,
//! `host`). The [`LoggerBinding`](crate::middleware::LoggerBinding)
//! middleware derives a child logger per request, adding the request fields
//! (`method`, `url`, `ip`, `user_agent`, `referer`, `req_id`), and stores
//! it in the [`Context`](crate::Context) for handlers to retrieve.
//!
//! [`init`] installs the global subscriber (console sink; `RUST_LOG`
//! overrides the configured default level). Call it once in `main`, before
//! any request is served.

use std::fmt;

use tracing::level_filters::LevelFilter;
use tracing::{field, Level, Span};
use tracing_subscriber::EnvFilter;

use crate::request::Request;

/// Process-wide logging configuration. Read-only after startup.
pub struct LogConfig {
    pub role: String,
    pub host: String,
    pub level: Level,
}

impl LogConfig {
    /// Configuration with the default minimum severity (INFO).
    pub fn new(role: impl Into<String>, host: impl Into<String>) -> Self {
        Self { role: role.into(), host: host.into(), level: Level::INFO }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

/// Installs the global `tracing` subscriber: console output, minimum
/// severity from `config.level`, overridable via `RUST_LOG`.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.level).into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// A structured logger: a handle on a `tracing` span whose fields are
/// attached to every record emitted through it.
///
/// Cloning is cheap (spans are reference-counted) and the logger is
/// immutable — deriving a request logger never touches the base.
#[derive(Clone)]
pub struct Logger {
    span: Span,
}

impl Logger {
    /// The process-wide base logger, carrying the static `role` and `host`
    /// fields. Build exactly one of these at startup.
    pub fn new(config: &LogConfig) -> Self {
        let span = tracing::info_span!("service", role = %config.role, host = %config.host);
        Self { span }
    }

    /// Derives the per-request child logger. `user_agent` and `referer`
    /// stay empty when the client did not send them.
    pub(crate) fn request(&self, req: &Request, req_id: &str) -> Logger {
        let span = tracing::info_span!(
            parent: &self.span,
            "request",
            method = %req.method(),
            url = %req.uri(),
            ip = %req.remote_addr(),
            user_agent = field::Empty,
            referer = field::Empty,
            req_id = %req_id,
        );
        if let Some(ua) = req.header("user-agent") {
            span.record("user_agent", ua);
        }
        if let Some(referer) = req.header("referer") {
            span.record("referer", referer);
        }
        Logger { span }
    }

    pub fn debug(&self, msg: impl fmt::Display) {
        self.span.in_scope(|| tracing::debug!("{}", msg));
    }

    pub fn info(&self, msg: impl fmt::Display) {
        self.span.in_scope(|| tracing::info!("{}", msg));
    }

    pub fn error(&self, msg: impl fmt::Display) {
        self.span.in_scope(|| tracing::error!("{}", msg));
    }
}
