//! Logging setup over `tracing-subscriber`.
//!
//! ```rust,ignore
//! use switchboard_runtime::{config::load_config, logging::LoggingBuilder};
//!
//! let config = load_config()?;
//! LoggingBuilder::from_config(&config.logging)
//!     .directive("switchboard_framework=debug")
//!     .try_init()?;
//! ```

use std::ffi::OsStr;
use std::path::Path;

use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{LogFormat, LogOutput, LogRotation, LoggingConfig, SpanEventConfig};

const DEFAULT_LOG_FILE: &str = "switchboard.log";

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
        }
    }
}

/// Maps the configured span events onto `FmtSpan` flags.
///
/// The dispatch root opens one span per inbound event, so `new` + `close`
/// shows each event's start and end.
fn fmt_span(events: &SpanEventConfig) -> FmtSpan {
    [
        (events.new, FmtSpan::NEW),
        (events.enter, FmtSpan::ENTER),
        (events.exit, FmtSpan::EXIT),
        (events.close, FmtSpan::CLOSE),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .fold(FmtSpan::NONE, |acc, (_, kind)| acc | kind)
}

/// Installs logging from a [`LoggingConfig`]. Does nothing if a global
/// subscriber is already set.
pub fn init_from_config(config: &LoggingConfig) {
    let _ = LoggingBuilder::from_config(config).try_init();
}

/// Installs the global `tracing` subscriber for a [`LoggingConfig`], plus
/// any extra filter directives added in code.
#[derive(Debug, Default)]
pub struct LoggingBuilder {
    config: LoggingConfig,
    extra_directives: Vec<String>,
}

impl LoggingBuilder {
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            config: config.clone(),
            extra_directives: Vec::new(),
        }
    }

    /// Adds a filter directive such as `switchboard_framework=trace`. Applied
    /// after the configured per-module filters.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.extra_directives.push(directive.into());
        self
    }

    /// Configured per-module filters in name order, then the extra ones.
    fn directives(&self) -> Vec<String> {
        let mut filters: Vec<_> = self.config.filters.iter().collect();
        filters.sort_by(|a, b| a.0.cmp(b.0));
        filters
            .into_iter()
            .map(|(module, level)| format!("{module}={level}"))
            .chain(self.extra_directives.iter().cloned())
            .collect()
    }

    /// `RUST_LOG` wins over the configured level when set.
    fn build_filter(&self) -> EnvFilter {
        let base = self.config.level.to_string();
        let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base));

        for directive in self.directives() {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(_) => warn!(directive = %directive, "Ignoring invalid log filter directive"),
            }
        }
        filter
    }

    /// The sink for log lines. `None` in the second slot means the configured
    /// output was honoured.
    fn writer(&self) -> (BoxMakeWriter, Option<&'static str>) {
        match (self.config.output, &self.config.file_path) {
            (LogOutput::Stdout, _) => (BoxMakeWriter::new(std::io::stdout), None),
            (LogOutput::Stderr, _) => (BoxMakeWriter::new(std::io::stderr), None),
            (LogOutput::File, Some(path)) => {
                let appender = RollingFileAppender::new(
                    self.config.rotation.into(),
                    path.parent().unwrap_or_else(|| Path::new(".")),
                    path.file_name().unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE)),
                );
                (BoxMakeWriter::new(appender), None)
            }
            (LogOutput::File, None) => (
                BoxMakeWriter::new(std::io::stdout),
                Some("File output requested but no file path configured, using stdout"),
            ),
        }
    }

    fn layer(&self, writer: BoxMakeWriter) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_span_events(fmt_span(&self.config.span_events))
            .with_thread_ids(self.config.thread_ids)
            .with_file(self.config.file_location)
            .with_line_number(self.config.file_location);

        match self.config.format {
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
            #[cfg(feature = "json-log")]
            LogFormat::Json => layer.json().boxed(),
            _ => layer.boxed(),
        }
    }

    /// Installs the global subscriber.
    ///
    /// # Errors
    ///
    /// Fails if a global subscriber is already set.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let (writer, fallback) = self.writer();
        tracing_subscriber::registry()
            .with(self.layer(writer))
            .with(self.build_filter())
            .try_init()?;

        if let Some(reason) = fallback {
            warn!("{reason}");
        }
        if cfg!(not(feature = "json-log")) && self.config.format == LogFormat::Json {
            warn!("JSON log format requires the `json-log` feature, using full format");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_directives_sorted_then_extra() {
        let mut config = LoggingConfig::default();
        config
            .filters
            .insert("switchboard_framework".into(), LogLevel::Trace);
        config.filters.insert("hyper".into(), LogLevel::Error);

        let builder = LoggingBuilder::from_config(&config).directive("tower=warn");
        assert_eq!(
            builder.directives(),
            vec!["hyper=error", "switchboard_framework=trace", "tower=warn"]
        );
    }

    #[test]
    fn test_fmt_span_flags() {
        assert_eq!(fmt_span(&SpanEventConfig::default()), FmtSpan::NONE);

        let lifecycle = SpanEventConfig {
            new: true,
            close: true,
            ..Default::default()
        };
        assert_eq!(fmt_span(&lifecycle), FmtSpan::NEW | FmtSpan::CLOSE);

        let full = SpanEventConfig {
            new: true,
            enter: true,
            exit: true,
            close: true,
        };
        assert_eq!(fmt_span(&full), FmtSpan::FULL);
    }

    #[test]
    fn test_file_output_without_path_falls_back() {
        let config = LoggingConfig {
            output: LogOutput::File,
            ..Default::default()
        };
        let (_, fallback) = LoggingBuilder::from_config(&config).writer();
        assert!(fallback.is_some());

        let config = LoggingConfig {
            output: LogOutput::Stderr,
            ..Default::default()
        };
        let (_, fallback) = LoggingBuilder::from_config(&config).writer();
        assert!(fallback.is_none());
    }
}
