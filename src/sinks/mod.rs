mod console;
mod statsd;
mod tracer;

use async_trait::async_trait;
use thiserror::Error;

pub use self::console::WriteSink;
pub use self::statsd::StatsdSink;
pub use self::tracer::{FileTracer, Tracer};
use crate::event::Tags;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("statsd: {0}")]
    Statsd(#[from] ::statsd::Error),
    #[error("write failed, {0}")]
    Io(#[from] std::io::Error),
}

/// Destination of flattened metrics.
#[async_trait]
pub trait MetricSink: Send {
    /// `tags` is `None` when tagging is disabled.
    async fn emit(&mut self, name: &str, value: f64, tags: Option<&Tags>) -> Result<(), SinkError>;

    async fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Encode a metric as a StatsD gauge line.
pub fn encode_line(buf: &mut String, name: &str, value: f64, tags: Option<&Tags>) {
    let tags = tags
        .into_iter()
        .flatten()
        .map(|(key, value)| (key.as_str(), value.as_str()));

    ::statsd::encode_gauge(buf, name, value, tags);
}
