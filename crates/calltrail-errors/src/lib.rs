//! Error facility for calltrail
//!
//! Two kinds of error live here:
//!
//! - [`InvocationFailure`]: what a wrapped method failed with, reduced to the
//!   kind and message that end up in the `OnException` line. The interceptor
//!   only observes these; the original error keeps propagating to the caller.
//! - [`CalltrailError`]: errors raised by calltrail itself while being
//!   configured.

use calltrail_core_types::schema::PANIC_KIND;
use calltrail_core_types::InvocationId;
use std::any::Any;
use thiserror::Error;

/// Result type alias using CalltrailError
pub type Result<T> = std::result::Result<T, CalltrailError>;

/// How the wrapped method failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOrigin {
    /// The method returned an `Err`
    Returned,
    /// The method panicked
    Panicked,
    /// A pending asynchronous operation resolved to an `Err`
    AsyncReturned,
}

impl FailureOrigin {
    /// Get the stable code for this origin
    pub fn code(&self) -> &'static str {
        match self {
            FailureOrigin::Returned => "FAIL_RETURNED",
            FailureOrigin::Panicked => "FAIL_PANICKED",
            FailureOrigin::AsyncReturned => "FAIL_ASYNC_RETURNED",
        }
    }
}

/// A wrapped-method failure as seen by the interceptor
///
/// Displays as `<kind>: <message>`, which is exactly the tail of the
/// `OnException` line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct InvocationFailure {
    kind: String,
    message: String,
    origin: FailureOrigin,
    invocation_id: Option<InvocationId>,
}

impl InvocationFailure {
    /// Create a failure from an explicit kind and message
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            origin: FailureOrigin::Returned,
            invocation_id: None,
        }
    }

    /// Describe a returned error
    ///
    /// The kind is the fully qualified type name of `E`, the message is its
    /// `Display` output.
    ///
    /// # Example
    ///
    /// ```
    /// use calltrail_errors::InvocationFailure;
    ///
    /// let err = "x".parse::<i32>().unwrap_err();
    /// let failure = InvocationFailure::from_error(&err);
    /// assert!(failure.kind().ends_with("ParseIntError"));
    /// assert_eq!(failure.message(), "invalid digit found in string");
    /// ```
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::fmt::Display + ?Sized,
    {
        Self::new(std::any::type_name::<E>(), error.to_string())
    }

    /// Describe a panic payload
    ///
    /// String payloads (the `panic!("...")` case) become the message;
    /// anything else is reported as an opaque payload.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        Self::new(PANIC_KIND, message).with_origin(FailureOrigin::Panicked)
    }

    /// Set how the method failed
    pub fn with_origin(mut self, origin: FailureOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Attach the invocation this failure belongs to
    pub fn with_invocation_id(mut self, invocation_id: InvocationId) -> Self {
        self.invocation_id = Some(invocation_id);
        self
    }

    /// Get the runtime kind (type or category name)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Get the human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn origin(&self) -> FailureOrigin {
        self.origin
    }

    /// Get the stable origin code
    pub fn code(&self) -> &'static str {
        self.origin.code()
    }

    pub fn invocation_id(&self) -> Option<&InvocationId> {
        self.invocation_id.as_ref()
    }
}

/// Errors raised while configuring calltrail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalltrailError {
    /// Profile name did not match any known profile
    #[error("Unknown logging profile: {value} (expected development, production or test)")]
    UnknownProfile { value: String },

    /// Indentation unit cannot be used
    #[error("Invalid indentation unit: {reason}")]
    InvalidIndentUnit { reason: String },
}

impl CalltrailError {
    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CalltrailError::UnknownProfile { .. } => "ERR_UNKNOWN_PROFILE",
            CalltrailError::InvalidIndentUnit { .. } => "ERR_INVALID_INDENT_UNIT",
        }
    }
}
