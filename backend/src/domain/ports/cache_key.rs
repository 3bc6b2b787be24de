//! Cache key type shared by catalogue cache adapters.
use thiserror::Error;

/// Key under which catalogue snapshots are cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogueCacheKey(String);

impl CatalogueCacheKey {
    /// Key for the full achievement catalogue.
    pub const ALL_ACHIEVEMENTS: &'static str = "achievements:all";

    /// Construct a cache key after validating that it is non-empty and trimmed.
    pub fn new(value: impl Into<String>) -> Result<Self, CatalogueCacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(CatalogueCacheKeyValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(CatalogueCacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Key for the full achievement catalogue.
    pub fn all_achievements() -> Self {
        Self(Self::ALL_ACHIEVEMENTS.to_owned())
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CatalogueCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CatalogueCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`CatalogueCacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueCacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("catalogue cache key must not be empty")]
    Empty,
    /// Key contains whitespace.
    #[error("catalogue cache key must not contain whitespace")]
    ContainsWhitespace,
}
