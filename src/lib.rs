#[macro_use]
extern crate tracing;

pub mod config;
pub mod consumer;
pub mod event;
pub mod flatten;
pub mod sanitize;
pub mod sinks;
pub mod trace;

pub use config::Config;
pub use consumer::Consumer;
pub use event::{Event, EventType, MetricRecord, Tags, TraceEntry};
pub use flatten::{FlattenOptions, TagMethod, flatten};

/// Basic error type, dynamically dispatched and safe to send across threads
pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Basic result type, defined in terms of [`Error`] and generic over `T`
pub type Result<T> = std::result::Result<T, Error>;
