//! Logging adapter and subscriber setup
//!
//! The tracker SDK logs through a `(tag, message, optional error)` interface
//! at five severities. `TracingLogger` forwards those calls to `tracing`,
//! carrying the tag as a structured field.

use std::error::Error as StdError;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::ConfigError;

/// Severity levels of the SDK logging interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
}

/// Sink for SDK log calls
pub trait Logger: Send + Sync {
    fn log(
        &self,
        severity: Severity,
        tag: &str,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    );

    fn e(&self, tag: &str, message: &str) {
        self.log(Severity::Error, tag, message, None);
    }

    fn w(&self, tag: &str, message: &str) {
        self.log(Severity::Warn, tag, message, None);
    }

    fn i(&self, tag: &str, message: &str) {
        self.log(Severity::Info, tag, message, None);
    }

    fn d(&self, tag: &str, message: &str) {
        self.log(Severity::Debug, tag, message, None);
    }

    fn v(&self, tag: &str, message: &str) {
        self.log(Severity::Verbose, tag, message, None);
    }
}

/// Forwards SDK log calls to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(
        &self,
        severity: Severity,
        tag: &str,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) {
        match (severity, error) {
            (Severity::Error, Some(e)) => tracing::error!(tag, error = e, "{}", message),
            (Severity::Error, None) => tracing::error!(tag, "{}", message),
            (Severity::Warn, Some(e)) => tracing::warn!(tag, error = e, "{}", message),
            (Severity::Warn, None) => tracing::warn!(tag, "{}", message),
            (Severity::Info, Some(e)) => tracing::info!(tag, error = e, "{}", message),
            (Severity::Info, None) => tracing::info!(tag, "{}", message),
            (Severity::Debug, Some(e)) => tracing::debug!(tag, error = e, "{}", message),
            (Severity::Debug, None) => tracing::debug!(tag, "{}", message),
            (Severity::Verbose, Some(e)) => tracing::trace!(tag, error = e, "{}", message),
            (Severity::Verbose, None) => tracing::trace!(tag, "{}", message),
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|_| ConfigError::InvalidLogFilter(config.filter.clone()))?,
    };

    let json_layer = config.json.then(|| tracing_subscriber::fmt::layer().json());
    let text_layer = (!config.json).then(|| tracing_subscriber::fmt::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture<F: FnOnce()>(f: F) -> String {
        let sink = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        sink.contents()
    }

    #[test]
    fn test_forwards_tag_and_message() {
        let out = capture(|| TracingLogger.w("TrackerService", "GetTrackerInfoResponse: S=3"));
        assert!(out.contains("WARN"));
        assert!(out.contains("TrackerService"));
        assert!(out.contains("GetTrackerInfoResponse: S=3"));
    }

    #[test]
    fn test_forwards_error_cause() {
        let cause = io::Error::new(io::ErrorKind::BrokenPipe, "link dropped");
        let out = capture(|| {
            TracingLogger.log(Severity::Error, "BleuManager", "write failed", Some(&cause))
        });
        assert!(out.contains("ERROR"));
        assert!(out.contains("write failed"));
        assert!(out.contains("link dropped"));
    }

    #[test]
    fn test_verbose_maps_to_trace() {
        let out = capture(|| TracingLogger.v("TrackerManager", "rx frame"));
        assert!(out.contains("TRACE"));
    }
}
