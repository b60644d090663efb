//! Flatten a `systemInfo` payload into StatsD metrics.
//!
//! The payload is walked depth first in key order. Every number (or numeric
//! string) becomes a record named by the sanitized path leading to it:
//!
//! ```text
//! f5telemetry.<hostname>.<key>.<key>...
//! ```
//!
//! The non-numeric strings of an object are its tags. They apply to the
//! metrics of that object and to nested objects which carry no strings of
//! their own; an object with its own strings starts a new tag scope.

mod node;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::event::{MetricRecord, Tags};
use crate::sanitize::sanitize;
use node::Node;

/// First segment of every metric name.
pub const NAMESPACE: &str = "f5telemetry";

/// Used when the payload carries no `system.hostname`.
pub const UNKNOWN_HOSTNAME: &str = "hostname-unknown";

/// Branches nested deeper than this are skipped.
pub const MAX_DEPTH: usize = 64;

/// How tags are attached to the emitted records.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TagMethod {
    /// No tags at all.
    #[default]
    None,

    /// The string siblings of each metric.
    Sibling,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FlattenOptions {
    pub tag_method: TagMethod,

    /// Emit booleans as `1`/`0` instead of dropping them.
    pub convert_booleans: bool,
}

/// Flatten `data` and apply the configured tag method.
pub fn flatten(data: &Value, options: &FlattenOptions) -> Vec<MetricRecord> {
    let records = collect(data, options.convert_booleans);

    apply_tag_method(records, options.tag_method)
}

/// Flatten `data`, every record keeps the full tag set of its scope.
///
/// Anything but an object produces nothing.
pub fn collect(data: &Value, convert_booleans: bool) -> Vec<MetricRecord> {
    let Some(root) = data.as_object() else {
        return Vec::new();
    };

    let path = MetricPath::root(&hostname(data));
    let mut walker = Walker {
        convert_booleans,
        records: Vec::new(),
    };
    walker.walk_object(root, &path, &Tags::new(), 0);

    walker.records
}

pub fn apply_tag_method(mut records: Vec<MetricRecord>, method: TagMethod) -> Vec<MetricRecord> {
    if method == TagMethod::None {
        records.iter_mut().for_each(|record| record.tags = None);
    }

    records
}

/// The sanitized `system.hostname`, or [`UNKNOWN_HOSTNAME`].
pub fn hostname(data: &Value) -> String {
    data.pointer("/system/hostname")
        .and_then(Value::as_str)
        .filter(|hostname| !hostname.is_empty())
        .map_or_else(|| UNKNOWN_HOSTNAME.to_string(), sanitize)
}

/// Dotted name of the node being visited, every call owns its own copy.
#[derive(Clone, Debug)]
struct MetricPath(String);

impl MetricPath {
    fn root(hostname: &str) -> Self {
        Self(format!("{NAMESPACE}.{hostname}"))
    }

    fn child(&self, key: &str) -> Self {
        Self(format!("{}.{}", self.0, sanitize(key)))
    }
}

impl Display for MetricPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

struct Walker {
    convert_booleans: bool,
    records: Vec<MetricRecord>,
}

impl Walker {
    fn walk_object(
        &mut self,
        object: &Map<String, Value>,
        path: &MetricPath,
        inherited: &Tags,
        depth: usize,
    ) {
        let children = object
            .iter()
            .map(|(key, value)| (key.as_str(), Node::classify(value)))
            .collect::<Vec<_>>();

        let local = children
            .iter()
            .filter_map(|(key, node)| match node {
                Node::Text(text) => Some((key.to_string(), text.to_string())),
                _ => None,
            })
            .collect::<Tags>();
        let scope = if local.is_empty() { inherited } else { &local };

        for (key, node) in children {
            self.visit(key, node, path, scope, depth);
        }
    }

    // Arrays are walked as if keyed by index, they never contribute tags.
    fn walk_array(&mut self, array: &[Value], path: &MetricPath, scope: &Tags, depth: usize) {
        for (index, value) in array.iter().enumerate() {
            self.visit(&index.to_string(), Node::classify(value), path, scope, depth);
        }
    }

    fn visit(&mut self, key: &str, node: Node<'_>, path: &MetricPath, scope: &Tags, depth: usize) {
        match node {
            Node::Number(value) => self.emit(path.child(key), value, scope),
            Node::Bool(value) => {
                if self.convert_booleans {
                    self.emit(path.child(key), if value { 1.0 } else { 0.0 }, scope);
                }
            }
            Node::Object(object) => {
                let path = path.child(key);
                if exceeds_depth(&path, depth) {
                    return;
                }

                self.walk_object(object, &path, scope, depth + 1);
            }
            Node::Array(array) => {
                let path = path.child(key);
                if exceeds_depth(&path, depth) {
                    return;
                }

                self.walk_array(array, &path, scope, depth + 1);
            }
            Node::Text(_) | Node::Null => {}
        }
    }

    fn emit(&mut self, path: MetricPath, value: f64, scope: &Tags) {
        self.records.push(MetricRecord {
            name: path.0,
            value,
            tags: Some(scope.clone()),
        });
    }
}

fn exceeds_depth(path: &MetricPath, depth: usize) -> bool {
    if depth < MAX_DEPTH {
        return false;
    }

    debug!(message = "Maximum depth reached, skipping branch", %path);

    true
}
