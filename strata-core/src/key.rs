//! Cache key type.
//!
//! A [`CacheKey`] is an opaque string identifier addressing one cached value
//! across every tier. The orchestrator imposes no structure on it; whatever
//! namespacing scheme the application uses (`"user:42"`, `"session/abc"`)
//! passes through unchanged.
//!
//! Keys use [`SmolStr`] for small string optimization: short keys are stored
//! inline without heap allocation, and cloning is cheap either way.

use smol_str::SmolStr;
use std::fmt;

/// An opaque key identifying one cached value across all tiers.
///
/// # Example
///
/// ```
/// use strata_core::CacheKey;
///
/// let key = CacheKey::new("user:42");
/// assert_eq!(key.as_str(), "user:42");
/// assert_eq!(format!("{}", key), "user:42");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(SmolStr);

impl CacheKey {
    /// Creates a key from any string-like value.
    pub fn new(key: impl AsRef<str>) -> Self {
        CacheKey(SmolStr::new(key))
    }

    /// Returns the key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        CacheKey::new(key)
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        CacheKey(SmolStr::from(key))
    }
}

impl From<SmolStr> for CacheKey {
    fn from(key: SmolStr) -> Self {
        CacheKey(key)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_agree() {
        let a = CacheKey::from("user:42");
        let b = CacheKey::from(String::from("user:42"));
        let c = CacheKey::new("user:42");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn display_is_verbatim() {
        let key = CacheKey::new("sessions/abc/def");
        assert_eq!(key.to_string(), "sessions/abc/def");
    }
}
