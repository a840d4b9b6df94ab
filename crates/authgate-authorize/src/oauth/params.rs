//! Raw authorization request parameters.
//!
//! [`RequestParams`] holds the decoded key/value pairs of a query string or an
//! `application/x-www-form-urlencoded` body. Lookups never fail: a key that is
//! missing or that appears more than once simply has no single value.

use url::form_urlencoded;

/// Result of looking up a parameter by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamValue<'a> {
    /// The key is not present.
    Absent,
    /// The key is present exactly once.
    Single(&'a str),
    /// The key is present more than once.
    Repeated,
}

/// Decoded request parameters, in the order they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    /// Creates a parameter bag from already decoded pairs.
    #[must_use]
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Decodes a query string (without the leading `?`) or a form body.
    #[must_use]
    pub fn from_urlencoded(input: &[u8]) -> Self {
        Self {
            pairs: form_urlencoded::parse(input).into_owned().collect(),
        }
    }

    /// Looks up `key`, distinguishing absent, single and repeated values.
    #[must_use]
    pub fn lookup(&self, key: &str) -> ParamValue<'_> {
        let mut values = self.pairs.iter().filter(|(k, _)| k == key);
        match (values.next(), values.next()) {
            (None, _) => ParamValue::Absent,
            (Some((_, v)), None) => ParamValue::Single(v),
            (Some(_), Some(_)) => ParamValue::Repeated,
        }
    }

    /// Returns the value of `key` only if it is present exactly once.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.lookup(key) {
            ParamValue::Single(v) => Some(v),
            ParamValue::Absent | ParamValue::Repeated => None,
        }
    }

    /// Returns `true` if `key` appears at least once.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Returns `true` if no parameters were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
