//! Metric path sanitization.
//!
//! StatsD uses `.` to separate the levels of a metric name, so every raw
//! key is reduced to `[A-Za-z0-9_-]` before it is joined into a path.

/// Substituted for segments which have nothing left after sanitization.
pub const PLACEHOLDER: &str = "unknown";

/// Sanitize a single path segment.
///
/// - whitespace becomes `_`
/// - `.`, `/` and `:` become `-`
/// - any other character outside `[A-Za-z0-9_-]` is dropped
///
/// The result is never empty and sanitizing it again returns it unchanged.
pub fn sanitize(segment: &str) -> String {
    let mut output = String::with_capacity(segment.len());

    for c in segment.chars() {
        if c.is_whitespace() {
            output.push('_');
            continue;
        }

        match c {
            '.' | '/' | ':' => output.push('-'),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => output.push(c),
            _ => {}
        }
    }

    if output.is_empty() {
        output.push_str(PLACEHOLDER);
    }

    output
}
