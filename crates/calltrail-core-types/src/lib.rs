//! Core types shared across calltrail facilities
//!
//! This crate provides the foundational types used by the interceptor,
//! the error facility and the log sinks:
//!
//! - **Invocation metadata**: MethodIdentity, ArgumentBinding, CallDepth, InvocationId
//! - **Sensitive data**: Sensitive<T> marker for argument redaction
//! - **Schema constants**: Canonical line formats, field keys and event names

pub mod identity;
pub mod schema;
pub mod sensitive;

pub use identity::{ArgumentBinding, CallDepth, InvocationId, MethodIdentity};
pub use sensitive::Sensitive;
