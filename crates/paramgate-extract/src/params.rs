//! Path captures supplied by the host router.
//!
//! Uses small-vector storage so the common case of a few captures does not
//! allocate.

use smallvec::SmallVec;

/// Maximum number of captures stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Path captures from a route match, as `(name, value)` pairs.
///
/// # Example
///
/// ```rust
/// use paramgate_extract::PathParams;
///
/// let mut params = PathParams::new();
/// params.push("user_id", "123");
///
/// assert_eq!(params.get("user_id"), Some("123"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathParams {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl PathParams {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a capture. A later capture with the same name shadows earlier ones.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value of a capture by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if there are no captures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of captures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the captures.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_get() {
        let mut params = PathParams::new();
        assert!(params.is_empty());

        params.push("id", "123");
        params.push("name", "alice");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("id"), Some("123"));
        assert_eq!(params.get("name"), Some("alice"));
        assert_eq!(params.get("unknown"), None);
    }

    #[test]
    fn test_later_capture_shadows() {
        let mut params = PathParams::new();
        params.push("id", "1");
        params.push("id", "2");
        assert_eq!(params.get("id"), Some("2"));
    }

    #[test]
    fn test_spills_past_inline_capacity() {
        let params: PathParams = (0..10).map(|i| (format!("p{i}"), i.to_string())).collect();
        assert_eq!(params.len(), 10);
        assert_eq!(params.get("p9"), Some("9"));
        assert_eq!(params.iter().count(), 10);
    }
}
