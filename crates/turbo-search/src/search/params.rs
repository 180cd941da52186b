//! Loosely-typed request parameters.

use std::collections::BTreeMap;

/// A parameter as it arrives from a request: one value or a repeated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

impl ParamValue {
    fn push(&mut self, value: String) {
        match self {
            ParamValue::One(first) => {
                *self = ParamValue::Many(vec![std::mem::take(first), value]);
            }
            ParamValue::Many(values) => values.push(value),
        }
    }

    fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            ParamValue::One(v) => std::slice::from_ref(v),
            ParamValue::Many(vs) => vs,
        };
        slice.iter().map(String::as_str)
    }
}

/// Raw query parameters keyed by name.
///
/// Inserting an existing key turns it into a multi-valued parameter, the way
/// repeated query-string keys (`?brand=a&brand=b`) accumulate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    values: BTreeMap<String, ParamValue>,
}

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value under `key`, accumulating repeats.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.values.entry(key.into()) {
            std::collections::btree_map::Entry::Occupied(mut slot) => slot.get_mut().push(value),
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(ParamValue::One(value));
            }
        }
    }

    /// Replace every value under `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), ParamValue::One(value.into()));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Parse a URL query string (`a=1&b=x+y&b=z`), with or without the `?`.
    pub fn from_query_string(qs: &str) -> Self {
        let mut params = Self::new();
        for pair in qs.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = url_decode(key);
            if key.is_empty() {
                continue;
            }
            params.insert(key, url_decode(value));
        }
        params
    }

    /// First value for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.values().next())
    }

    /// All values for `key`, in insertion order.
    pub fn all(&self, key: &str) -> Vec<&str> {
        self.values
            .get(key)
            .map(|v| v.values().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Percent-decode a query component, treating `+` as a space.
///
/// Decodes to bytes first so multi-byte UTF-8 sequences (`bater%C3%ADa`)
/// survive; invalid escapes are kept verbatim.
fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let decoded = bytes
                    .get(i + 1..i + 3)
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match decoded {
                    Some(byte) => {
                        out.push(byte);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}
