//! StatsD line encoding.
//!
//! Every metric is written as a gauge, tags use the DogStatsD extension:
//!
//! ```text
//! <name>:<value>|g|#<key>:<value>,<key>:<value>
//! ```

/// Append a gauge line for `name` to `buf`, without the trailing newline.
///
/// The `|#` tag section is only written when `tags` yields at least one pair.
pub fn encode_gauge<'a, I>(buf: &mut String, name: &str, value: f64, tags: I)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    buf.push_str(name);
    buf.push(':');
    buf.push_str(&value.to_string());
    buf.push_str("|g");

    let mut first = true;
    for (key, value) in tags {
        if first {
            buf.push_str("|#");
            first = false;
        } else {
            buf.push(',');
        }

        push_escaped(buf, key, true);
        buf.push(':');
        push_escaped(buf, value, false);
    }
}

// Replace the characters which would break the tag section of a line.
#[inline]
fn push_escaped(buf: &mut String, input: &str, is_key: bool) {
    for c in input.chars() {
        match c {
            '|' | ',' | '#' | '\n' | '\r' => buf.push('_'),
            ':' if is_key => buf.push('_'),
            c => buf.push(c),
        }
    }
}
