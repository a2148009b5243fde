//! Subscriber setup for dagnet applications.
//!
//! The engine only emits `tracing` spans and events; it never installs a
//! subscriber. [`TracingConfig`] is the one place that does, so binaries and
//! demos get the same filter and formatting.
//!
//! # Example
//!
//! ```no_run
//! use dagnet_core_plugins::{TracingConfig, TracingFormat};
//! use tracing::Level;
//!
//! TracingConfig::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .with_env_filter("dagnet_graph=trace")
//!     .try_init()
//!     .expect("subscriber already installed");
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors from installing the global subscriber.
#[derive(Debug, Error)]
pub enum TracingInitError {
    /// The custom filter directive could not be parsed.
    #[error("invalid filter directive '{directive}': {source}")]
    InvalidFilter {
        /// The rejected directive string.
        directive: String,
        /// Parser error.
        #[source]
        source: ParseError,
    },
    /// A global subscriber was already set.
    #[error("failed to install tracing subscriber: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for the global `tracing` subscriber.
///
/// Defaults to `INFO` with pretty output and no span events.
///
/// ```
/// use dagnet_core_plugins::{TracingConfig, TracingFormat};
/// use tracing::Level;
///
/// // Development: span enter/exit shows every forward pass.
/// let dev = TracingConfig::new()
///     .with_level(Level::DEBUG)
///     .with_span_events(true);
///
/// // Production: JSON output, engine internals kept quiet.
/// let prod = TracingConfig::new()
///     .with_format(TracingFormat::Json)
///     .with_env_filter("info,dagnet_graph=warn");
///
/// assert_eq!(dev.level(), Level::DEBUG);
/// assert_eq!(prod.format(), TracingFormat::Json);
/// ```
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Maximum log level, used when no filter directive is set.
    level: Level,
    /// Output format.
    format: TracingFormat,
    /// Filter directive (e.g., "`dagnet_graph=trace`").
    env_filter: Option<String>,
    /// Whether to include span events (enter/exit).
    span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Creates a new `TracingConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a filter directive string, overriding the level.
    ///
    /// Format: `target=level,target=level,...`
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the configured level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the configured format.
    #[must_use]
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    /// Returns the filter directive, if one was set.
    #[must_use]
    pub fn env_filter(&self) -> Option<&str> {
        self.env_filter.as_deref()
    }

    /// Builds the [`EnvFilter`] this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns [`TracingInitError::InvalidFilter`] if the custom directive
    /// does not parse.
    pub fn build_filter(&self) -> Result<EnvFilter, TracingInitError> {
        match &self.env_filter {
            Some(directive) => {
                EnvFilter::try_new(directive).map_err(|source| TracingInitError::InvalidFilter {
                    directive: directive.clone(),
                    source,
                })
            }
            None => Ok(EnvFilter::new(self.level.as_str())),
        }
    }

    /// Installs the global subscriber.
    ///
    /// # Errors
    ///
    /// Fails if the filter directive is invalid or a global subscriber is
    /// already installed.
    pub fn try_init(&self) -> Result<(), TracingInitError> {
        let env_filter = self.build_filter()?;

        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        match self.format {
            TracingFormat::Pretty => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_span_events(span_events),
                )
                .try_init()?,
            TracingFormat::Compact => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_span_events(span_events),
                )
                .try_init()?,
            TracingFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(span_events),
                )
                .try_init()?,
        }

        tracing::info!(
            level = %self.level,
            format = ?self.format,
            "tracing initialized"
        );
        Ok(())
    }

    /// Installs the global subscriber without failing.
    ///
    /// An invalid directive falls back to the configured level and the
    /// rejected directive is reported through the installed subscriber. An
    /// already installed subscriber is left in place. Returns the error of
    /// the last attempt, if any, so callers can still inspect it.
    pub fn init(&self) -> Option<TracingInitError> {
        let err = match self.try_init() {
            Ok(()) => return None,
            Err(err @ TracingInitError::InvalidFilter { .. }) => err,
            Err(err) => {
                tracing::debug!(error = %err, "tracing subscriber left unchanged");
                return Some(err);
            }
        };

        let fallback = Self {
            env_filter: None,
            ..self.clone()
        };
        match fallback.try_init() {
            Ok(()) => {
                tracing::warn!(error = %err, level = %self.level, "falling back to level filter");
                Some(err)
            }
            Err(fallback_err) => {
                tracing::warn!(
                    error = %err,
                    fallback_error = %fallback_err,
                    "tracing fallback failed, subscriber left unchanged"
                );
                Some(fallback_err)
            }
        }
    }
}
