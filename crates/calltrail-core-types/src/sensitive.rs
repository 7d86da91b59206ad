//! Redaction marker for intercepted arguments
//!
//! Argument values are rendered into debug lines on every call. Wrapping a
//! parameter in `Sensitive<T>` keeps passwords, tokens and keys out of those
//! lines while the wrapped method still gets the real value.

use std::fmt;

/// Placeholder rendered in place of a sensitive value
pub const REDACTED: &str = "***REDACTED***";

/// Wrapper for an argument value that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use calltrail_core_types::{ArgumentBinding, Sensitive};
///
/// let token = Sensitive::new("tok-123");
/// let binding = ArgumentBinding::new("token", 0, &token);
/// assert_eq!(binding.value, "***REDACTED***");
/// assert_eq!(token.expose(), &"tok-123");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the real value for the wrapped method's own use
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}
