use thiserror::Error;

use crate::event::{Event, TraceEntry};
use crate::flatten::{self, FlattenOptions};
use crate::sinks::{MetricSink, SinkError, Tracer};

#[derive(Debug, Error)]
pub enum ConsumerError {
    #[error("emit metric {name} failed, {source}")]
    Emit { name: String, source: SinkError },
    #[error("flush metrics failed, {0}")]
    Flush(#[source] SinkError),
}

/// Turns `systemInfo` events into metrics and hands them to a sink.
pub struct Consumer<S> {
    options: FlattenOptions,
    sink: S,
    tracer: Option<Box<dyn Tracer>>,
}

impl<S: MetricSink> Consumer<S> {
    pub fn new(options: FlattenOptions, sink: S) -> Self {
        Self {
            options,
            sink,
            tracer: None,
        }
    }

    #[must_use]
    pub fn with_tracer(mut self, tracer: impl Tracer + 'static) -> Self {
        self.tracer = Some(Box::new(tracer));
        self
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Returns how many metrics were emitted. Transport failures abort the
    /// event and are not retried.
    pub async fn process(&mut self, event: &Event) -> Result<usize, ConsumerError> {
        if !event.is_system_info() {
            debug!(
                message = "Skip event which is not systemInfo",
                event_type = ?event.event_type
            );

            return Ok(0);
        }

        let records = flatten::collect(&event.data, self.options.convert_booleans);
        if let Some(tracer) = self.tracer.as_mut() {
            let entries = records.iter().map(TraceEntry::from).collect::<Vec<_>>();
            tracer.write(&entries).await;
        }

        let records = flatten::apply_tag_method(records, self.options.tag_method);
        for record in &records {
            if let Err(err) = self
                .sink
                .emit(&record.name, record.value, record.tags.as_ref())
                .await
            {
                error!(
                    message = "Emit metric failed",
                    metric = %record.name,
                    %err
                );

                return Err(ConsumerError::Emit {
                    name: record.name.clone(),
                    source: err,
                });
            }
        }

        if let Err(err) = self.sink.flush().await {
            error!(message = "Flush metrics failed", %err);

            return Err(ConsumerError::Flush(err));
        }

        debug!(message = "Metrics emitted", count = records.len());

        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::event::{EventType, Tags};
    use crate::flatten::TagMethod;

    #[derive(Default)]
    struct Collector {
        emitted: Vec<(String, f64, Option<Tags>)>,
        flushed: usize,
        fail_after: Option<usize>,
    }

    #[async_trait]
    impl MetricSink for Collector {
        async fn emit(
            &mut self,
            name: &str,
            value: f64,
            tags: Option<&Tags>,
        ) -> Result<(), SinkError> {
            if self.fail_after == Some(self.emitted.len()) {
                return Err(std::io::Error::from(std::io::ErrorKind::ConnectionRefused).into());
            }

            self.emitted.push((name.to_string(), value, tags.cloned()));
            Ok(())
        }

        async fn flush(&mut self) -> Result<(), SinkError> {
            self.flushed += 1;
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct MemoryTracer(Arc<Mutex<Vec<TraceEntry>>>);

    #[async_trait]
    impl Tracer for MemoryTracer {
        async fn write(&mut self, entries: &[TraceEntry]) {
            self.0.lock().unwrap().extend_from_slice(entries);
        }
    }

    fn system_info() -> Event {
        Event::system_info(json!({
            "system": {"hostname": "bigip1", "cpu": 12, "version": "15.1.0"},
            "pools": {
                "/Common/pool1": {"name": "/Common/pool1", "tenant": "Common", "serverside.curConns": 2}
            }
        }))
    }

    #[tokio::test]
    async fn skip_other_events() {
        let mut consumer = Consumer::new(FlattenOptions::default(), Collector::default());

        let event = Event::new(EventType::Avr, json!({"system": {"hostname": "h"}, "a": 1}));
        assert_eq!(consumer.process(&event).await.unwrap(), 0);

        let sink = consumer.into_sink();
        assert!(sink.emitted.is_empty());
        assert_eq!(sink.flushed, 0);
    }

    #[tokio::test]
    async fn without_tags() {
        let tracer = MemoryTracer::default();
        let mut consumer = Consumer::new(FlattenOptions::default(), Collector::default())
            .with_tracer(tracer.clone());

        assert_eq!(consumer.process(&system_info()).await.unwrap(), 2);

        let sink = consumer.into_sink();
        assert_eq!(
            sink.emitted,
            vec![
                ("f5telemetry.bigip1.system.cpu".to_string(), 12.0, None),
                (
                    "f5telemetry.bigip1.pools.-Common-pool1.serverside-curConns".to_string(),
                    2.0,
                    None
                ),
            ]
        );
        assert_eq!(sink.flushed, 1);

        // the trace keeps the tags even though the sink does not get them
        let traced = tracer.0.lock().unwrap().clone();
        assert_eq!(
            traced,
            vec![
                TraceEntry {
                    line: "f5telemetry.bigip1.system.cpu: 12".to_string(),
                    tags: Tags::from([
                        ("hostname".to_string(), "bigip1".to_string()),
                        ("version".to_string(), "15.1.0".to_string()),
                    ]),
                },
                TraceEntry {
                    line: "f5telemetry.bigip1.pools.-Common-pool1.serverside-curConns: 2"
                        .to_string(),
                    tags: Tags::from([
                        ("name".to_string(), "/Common/pool1".to_string()),
                        ("tenant".to_string(), "Common".to_string()),
                    ]),
                },
            ]
        );
    }

    #[tokio::test]
    async fn with_sibling_tags() {
        let options = FlattenOptions {
            tag_method: TagMethod::Sibling,
            convert_booleans: false,
        };
        let mut consumer = Consumer::new(options, Collector::default());

        consumer.process(&system_info()).await.unwrap();

        let sink = consumer.into_sink();
        assert_eq!(
            sink.emitted[1].2,
            Some(Tags::from([
                ("name".to_string(), "/Common/pool1".to_string()),
                ("tenant".to_string(), "Common".to_string()),
            ]))
        );
    }

    #[tokio::test]
    async fn sink_failure() {
        let sink = Collector {
            fail_after: Some(1),
            ..Default::default()
        };
        let mut consumer = Consumer::new(FlattenOptions::default(), sink);

        let err = consumer.process(&system_info()).await.unwrap_err();
        assert!(matches!(
            err,
            ConsumerError::Emit { ref name, .. } if name == "f5telemetry.bigip1.pools.-Common-pool1.serverside-curConns"
        ));

        let sink = consumer.into_sink();
        assert_eq!(sink.emitted.len(), 1);
        assert_eq!(sink.flushed, 0);
    }
}
