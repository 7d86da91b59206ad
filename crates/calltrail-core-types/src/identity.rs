//! Invocation metadata types
//!
//! These types describe a single intercepted call: which method was
//! entered, with which arguments, at which logical nesting depth.
//! They live for exactly one invocation and are never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Correlation identifier for a single intercepted invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(String);

impl InvocationId {
    /// Generate a new InvocationId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the method being intercepted
///
/// Derived once per invocation from whatever metadata the attachment
/// mechanism has at hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodIdentity {
    declaring_type_name: String,
    method_name: String,
    parameter_count: usize,
}

impl MethodIdentity {
    /// Create an identity from explicit names
    pub fn new(
        declaring_type_name: impl Into<String>,
        method_name: impl Into<String>,
        parameter_count: usize,
    ) -> Self {
        Self {
            declaring_type_name: declaring_type_name.into(),
            method_name: method_name.into(),
            parameter_count,
        }
    }

    /// Create an identity whose declaring type is `T`
    ///
    /// The type name is the fully qualified path reported by
    /// [`std::any::type_name`].
    ///
    /// # Example
    ///
    /// ```
    /// use calltrail_core_types::MethodIdentity;
    ///
    /// struct Account;
    /// let identity = MethodIdentity::of::<Account>("deposit", 1);
    /// assert!(identity.declaring_type_name().ends_with("Account"));
    /// ```
    pub fn of<T: ?Sized>(method_name: impl Into<String>, parameter_count: usize) -> Self {
        Self::new(std::any::type_name::<T>(), method_name, parameter_count)
    }

    pub fn declaring_type_name(&self) -> &str {
        &self.declaring_type_name
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// `Type.method` as it appears in the entry line
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.declaring_type_name, self.method_name)
    }
}

/// One named argument of an invocation, already rendered for logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentBinding {
    pub name: String,
    pub position: usize,
    pub value: String,
}

impl ArgumentBinding {
    /// Bind an argument, rendering its value with `Display`
    pub fn new(name: impl Into<String>, position: usize, value: &dyn fmt::Display) -> Self {
        Self {
            name: name.into(),
            position,
            value: value.to_string(),
        }
    }
}

/// Logical call nesting depth
///
/// Threaded explicitly through the interception context instead of being
/// inferred from the physical stack, so it survives thread and `.await` hops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct CallDepth(usize);

impl CallDepth {
    pub const ROOT: CallDepth = CallDepth(0);

    pub fn new(depth: usize) -> Self {
        Self(depth)
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Depth of a call made from inside this one
    pub fn deeper(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for CallDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    #[test]
    fn test_invocation_id_generation() {
        let id1 = InvocationId::new();
        let id2 = InvocationId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
        assert_eq!(format!("{}", id1), id1.as_str());
    }

    #[test]
    fn test_method_identity_of_type() {
        let identity = MethodIdentity::of::<Widget>("spin", 2);

        assert_eq!(
            identity.declaring_type_name(),
            "calltrail_core_types::identity::tests::Widget"
        );
        assert_eq!(identity.method_name(), "spin");
        assert_eq!(identity.parameter_count(), 2);
        assert_eq!(
            identity.qualified_name(),
            "calltrail_core_types::identity::tests::Widget.spin"
        );
    }

    #[test]
    fn test_argument_binding_uses_display() {
        let number = ArgumentBinding::new("first", 0, &42);
        let text = ArgumentBinding::new("second", 1, &"UnitTest");

        assert_eq!(number.value, "42");
        assert_eq!(text.value, "UnitTest");
        assert_eq!(text.position, 1);
    }

    #[test]
    fn test_call_depth_deeper() {
        let root = CallDepth::ROOT;
        assert_eq!(root.get(), 0);
        assert_eq!(root.deeper().deeper().get(), 2);
        assert!(root < root.deeper());
    }

    #[test]
    fn test_serialization() {
        let identity = MethodIdentity::new("a::B", "c", 0);
        let json = serde_json::to_string(&identity).unwrap();
        let deserialized: MethodIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(identity, deserialized);
    }
}
