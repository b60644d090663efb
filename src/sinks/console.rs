use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::{MetricSink, SinkError, encode_line};
use crate::event::Tags;

/// Writes newline delimited StatsD lines to any writer, e.g. stdout for dry runs.
pub struct WriteSink<T> {
    writer: T,
    buf: String,
}

impl<T> WriteSink<T> {
    pub fn new(writer: T) -> Self {
        Self {
            writer,
            buf: String::new(),
        }
    }

    pub fn into_inner(self) -> T {
        self.writer
    }
}

#[async_trait]
impl<T> MetricSink for WriteSink<T>
where
    T: AsyncWrite + Send + Sync + Unpin,
{
    async fn emit(&mut self, name: &str, value: f64, tags: Option<&Tags>) -> Result<(), SinkError> {
        self.buf.clear();
        encode_line(&mut self.buf, name, value, tags);
        self.buf.push('\n');

        self.writer.write_all(self.buf.as_bytes()).await?;

        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush().await?;

        Ok(())
    }
}
