use serde_json::{Map, Value};

/// Kind of a single child value, computed once before it is visited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Node<'a> {
    /// Numbers, and strings which hold nothing but a number.
    Number(f64),
    Bool(bool),
    /// Any other string, eligible to become a tag.
    Text(&'a str),
    Object(&'a Map<String, Value>),
    Array(&'a [Value]),
    Null,
}

impl<'a> Node<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(f) if f.is_finite() => Node::Number(f),
                _ => Node::Null,
            },
            Value::Bool(b) => Node::Bool(*b),
            Value::String(s) => match parse_numeric(s) {
                Some(f) => Node::Number(f),
                None => Node::Text(s),
            },
            Value::Object(map) => Node::Object(map),
            Value::Array(array) => Node::Array(array),
            Value::Null => Node::Null,
        }
    }
}

// Plain decimal text only, `-?[0-9]+(.[0-9]+)?`. `7e42`, `+1` and `NaN`
// stay text.
fn parse_numeric(s: &str) -> Option<f64> {
    let s = s.trim();
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    if !is_digits(integer) || fraction.is_some_and(|fraction| !is_digits(fraction)) {
        return None;
    }

    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

#[inline]
fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
