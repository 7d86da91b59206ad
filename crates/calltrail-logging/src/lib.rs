//! Logging facility for calltrail
//!
//! This crate provides the sink side of call-boundary logging:
//! - The [`LogSink`] trait the interceptor writes finished lines to
//! - [`TracingSink`], forwarding lines to the `tracing` ecosystem
//! - [`RecordingSink`], an in-memory sink for tests
//! - Single initialization point via `init(profile)`
//! - Test capture mode for assertions on tracing output
//!
//! # Usage
//!
//! ```rust
//! use calltrail_logging::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod recording_sink;
pub mod sink;
pub mod test_capture;
pub mod tracing_sink;

pub use init::{init, Profile, PROFILE_ENV};
pub use recording_sink::{RecordedLine, RecordingSink};
pub use sink::{LogLevel, LogSink};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
pub use tracing_sink::TracingSink;
