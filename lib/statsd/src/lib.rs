#[macro_use]
extern crate tracing;

mod client;
mod error;
mod line;

pub use client::{Client, Protocol};
pub use error::Error;
pub use line::encode_gauge;

/// Default port of a StatsD daemon.
pub const DEFAULT_PORT: u16 = 8125;
