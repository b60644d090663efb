use std::path::PathBuf;

use async_trait::async_trait;

use crate::event::TraceEntry;

/// Receives every flattened metric, with its tags, before the tag method is applied.
#[async_trait]
pub trait Tracer: Send {
    async fn write(&mut self, entries: &[TraceEntry]);
}

/// Keeps the entries of the latest event in a JSON file.
pub struct FileTracer {
    path: PathBuf,
}

impl FileTracer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Tracer for FileTracer {
    async fn write(&mut self, entries: &[TraceEntry]) {
        let result = match serde_json::to_vec_pretty(entries) {
            Ok(data) => tokio::fs::write(&self.path, data).await,
            Err(err) => Err(std::io::Error::other(err)),
        };

        if let Err(err) = result {
            warn!(
                message = "Write trace file failed",
                path = ?self.path,
                %err
            );
        }
    }
}
