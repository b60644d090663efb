use async_trait::async_trait;
use statsd::Client;

use super::{MetricSink, SinkError, encode_line};
use crate::config::Config;
use crate::event::Tags;

/// Sends every metric as a StatsD gauge.
pub struct StatsdSink {
    client: Client,
    buf: String,
}

impl StatsdSink {
    pub async fn connect(config: &Config) -> Result<Self, SinkError> {
        let client = Client::connect(&config.host, config.port, config.protocol).await?;

        info!(
            message = "Connected to statsd",
            peer = %client.peer_addr(),
            protocol = %client.protocol(),
        );

        Ok(Self::new(client))
    }

    pub fn new(client: Client) -> Self {
        Self {
            client,
            buf: String::with_capacity(256),
        }
    }
}

#[async_trait]
impl MetricSink for StatsdSink {
    async fn emit(&mut self, name: &str, value: f64, tags: Option<&Tags>) -> Result<(), SinkError> {
        self.buf.clear();
        encode_line(&mut self.buf, name, value, tags);

        self.client.send(&self.buf).await?;

        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        self.client.flush().await?;

        Ok(())
    }
}
