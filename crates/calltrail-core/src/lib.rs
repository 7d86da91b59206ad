//! calltrail core - call-boundary logging
//!
//! This crate wraps method invocations so that entry, exit (including the
//! late exit of pending futures) and failure are logged uniformly, indented
//! by call depth so nested calls read as a tree:
//!
//! ```text
//! Init: shop::Cart.checkout [1] params
//!    Init: shop::Payments.charge [2] params
//!    Exit: [ok]
//! Exit: [order-17]
//! ```
//!
//! - [`indent`]: baseline-relative indentation levels
//! - [`completion`]: line formats and the sink writer
//! - [`interceptor`]: entry / exit / exception notifications and the manual
//!   wrapper attachment (`intercept*`)

pub mod completion;
pub mod indent;
pub mod interceptor;
pub mod macros;

// Re-export commonly used types
pub use calltrail_core_types::{ArgumentBinding, CallDepth, InvocationId, MethodIdentity, Sensitive};
pub use calltrail_errors::{CalltrailError, FailureOrigin, InvocationFailure};
pub use calltrail_logging::{LogLevel, LogSink};
pub use completion::CompletionLogger;
pub use indent::IndentTracker;
pub use interceptor::{
    CallContext, Invocation, InvocationOutcome, InvocationState, MethodInterceptor,
};
