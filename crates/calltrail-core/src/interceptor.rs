//! Method interception
//!
//! [`MethodInterceptor`] receives the three boundary notifications of a
//! wrapped method (entry, exit, failure), works out the indentation and
//! hands the lines to the [`CompletionLogger`]. Exits of pending futures are
//! logged when the future resolves, not when the method returns.
//!
//! Each notification takes the [`Invocation`] returned by `on_entry` by
//! value, so an invocation reaches exactly one terminal state.

use crate::completion::CompletionLogger;
use crate::indent::IndentTracker;
use calltrail_core_types::schema::{
    COMPONENT, EVENT_ENTRY, EVENT_EXCEPTION, EVENT_EXIT, EVENT_EXIT_DEFERRED, EVENT_FORMAT_PANIC,
    INDENT_UNIT,
};
use calltrail_core_types::{ArgumentBinding, CallDepth, InvocationId, MethodIdentity};
use calltrail_errors::{CalltrailError, FailureOrigin, InvocationFailure, Result};
use calltrail_logging::LogSink;
use futures::FutureExt;
use std::fmt::{self, Display};
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Message used for an error whose `Display` panicked
pub const UNPRINTABLE: &str = "<unprintable error>";

/// Logical position of a call in the call tree
///
/// Wrapped methods receive the context of their own body and pass it on to
/// the methods they call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallContext {
    depth: CallDepth,
}

impl CallContext {
    /// Context of a call made from outside any wrapped method
    pub fn root() -> Self {
        Self::default()
    }

    pub fn at_depth(depth: CallDepth) -> Self {
        Self { depth }
    }

    pub fn depth(&self) -> CallDepth {
        self.depth
    }

    /// Context for calls made from inside this one
    pub fn child(&self) -> Self {
        Self {
            depth: self.depth.deeper(),
        }
    }
}

/// Lifecycle of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Entered,
    /// Returned synchronously, exit logged
    Exited,
    /// Returned a future whose exit is logged on completion
    Pending,
    /// Pending future resolved, exit logged
    Completed,
    Failed,
}

impl InvocationState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InvocationState::Exited | InvocationState::Completed | InvocationState::Failed
        )
    }
}

/// Synchronous result of a wrapped method, already reduced for logging
///
/// Pending futures have no variant here; they go through
/// [`MethodInterceptor::on_exit_pending`] and its `_void` / `_result` forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// Returned a value; `None` for `()`
    Value(Option<String>),
    Failure(InvocationFailure),
}

/// Handle for an entered invocation
#[derive(Debug)]
pub struct Invocation {
    id: InvocationId,
    identity: MethodIdentity,
    context: CallContext,
}

impl Invocation {
    pub fn id(&self) -> &InvocationId {
        &self.id
    }

    pub fn identity(&self) -> &MethodIdentity {
        &self.identity
    }

    pub fn context(&self) -> CallContext {
        self.context
    }

    /// Context to hand to the calls made by the wrapped method's body
    pub fn child_context(&self) -> CallContext {
        self.context.child()
    }
}

/// Call-boundary logger
///
/// Cheap to clone; clones share the sink and the indentation tracker.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use calltrail_core::{arguments, CallContext, MethodInterceptor, MethodIdentity};
/// use calltrail_logging::{LogLevel, RecordingSink};
///
/// struct Calculator;
///
/// let sink = RecordingSink::new();
/// let interceptor = MethodInterceptor::new(Arc::new(sink.clone()));
///
/// let (a, b) = (2, 3);
/// let sum = interceptor.intercept(
///     &CallContext::root(),
///     MethodIdentity::of::<Calculator>("add", 2),
///     arguments![a, b],
///     |_| a + b,
/// );
///
/// assert_eq!(sum, 5);
/// assert!(sink.messages(LogLevel::Info).iter().any(|l| l.ends_with("Exit: [5]")));
/// assert_eq!(sink.count(LogLevel::Debug), 2);
/// ```
#[derive(Clone)]
pub struct MethodInterceptor {
    sink: Arc<dyn LogSink>,
    tracker: Arc<IndentTracker>,
    indent_unit: Arc<str>,
}

impl MethodInterceptor {
    /// Create an interceptor writing to `sink`, indenting against the
    /// process-wide baseline
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            tracker: IndentTracker::global(),
            indent_unit: Arc::from(INDENT_UNIT),
        }
    }

    /// Use a private indentation tracker instead of the process-wide one
    pub fn with_tracker(mut self, tracker: Arc<IndentTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    /// Replace the three-space indentation unit
    ///
    /// # Errors
    ///
    /// Returns `InvalidIndentUnit` for an empty unit or one containing a
    /// line break.
    pub fn with_indent_unit(mut self, unit: &str) -> Result<Self> {
        if unit.is_empty() {
            return Err(CalltrailError::InvalidIndentUnit {
                reason: "unit must not be empty".to_string(),
            });
        }
        if unit.contains(|c: char| c == '\n' || c == '\r') {
            return Err(CalltrailError::InvalidIndentUnit {
                reason: "unit must not contain line breaks".to_string(),
            });
        }
        self.indent_unit = Arc::from(unit);
        Ok(self)
    }

    pub fn tracker(&self) -> &Arc<IndentTracker> {
        &self.tracker
    }

    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    fn logger(&self) -> CompletionLogger<'_> {
        CompletionLogger::new(self.sink.as_ref(), &self.indent_unit)
    }

    // ===== Notifications =====

    /// Log the entry line and one line per argument
    pub fn on_entry(
        &self,
        context: &CallContext,
        identity: MethodIdentity,
        bindings: &[ArgumentBinding],
    ) -> Invocation {
        let invocation = Invocation {
            id: InvocationId::new(),
            identity,
            context: *context,
        };
        let level = self.tracker.indent_level(context.depth(), 0);
        self.logger()
            .log_entry(&invocation.identity, bindings, level);
        diagnose(&invocation, EVENT_ENTRY);
        invocation
    }

    /// Log a synchronous exit or failure
    pub fn on_exit(&self, invocation: Invocation, outcome: InvocationOutcome) -> InvocationState {
        match outcome {
            InvocationOutcome::Value(Some(value)) => self.on_exit_value(invocation, &value),
            InvocationOutcome::Value(None) => self.on_exit_void(invocation),
            InvocationOutcome::Failure(failure) => self.on_exception(invocation, &failure),
        }
    }

    /// Log `Exit: [<value>]`
    pub fn on_exit_value<T>(&self, invocation: Invocation, value: &T) -> InvocationState
    where
        T: Display + ?Sized,
    {
        self.exit_now(invocation, Some(&value))
    }

    /// Log `Exit: []`
    pub fn on_exit_void(&self, invocation: Invocation) -> InvocationState {
        self.exit_now(invocation, None)
    }

    /// Log the exit of a pending future once it resolves
    ///
    /// Nothing is logged now. The returned future yields the original output
    /// unchanged; if it is dropped before completion no exit line is written.
    /// A panic while it is polled is logged as an exception and resumed.
    pub fn on_exit_pending<F>(
        &self,
        invocation: Invocation,
        future: F,
    ) -> impl Future<Output = F::Output>
    where
        F: Future,
        F::Output: Display,
    {
        let deferred = self.defer(invocation);
        AssertUnwindSafe(future)
            .catch_unwind()
            .map(move |outcome| deferred.settle(outcome, |d, output| d.complete(Some(output))))
    }

    /// As [`on_exit_pending`](Self::on_exit_pending) for futures without a
    /// value; logs `Exit: []`
    pub fn on_exit_pending_void<F>(
        &self,
        invocation: Invocation,
        future: F,
    ) -> impl Future<Output = ()>
    where
        F: Future<Output = ()>,
    {
        let deferred = self.defer(invocation);
        AssertUnwindSafe(future)
            .catch_unwind()
            .map(move |outcome| deferred.settle(outcome, |d, _| d.complete(None)))
    }

    /// As [`on_exit_pending`](Self::on_exit_pending) for fallible futures
    ///
    /// `Ok(v)` logs `Exit: [v]`; `Err(e)` is reported through the exception
    /// line instead. The result is passed through untouched.
    pub fn on_exit_pending_result<F, T, E>(
        &self,
        invocation: Invocation,
        future: F,
    ) -> impl Future<Output = std::result::Result<T, E>>
    where
        F: Future<Output = std::result::Result<T, E>>,
        T: Display,
        E: Display,
    {
        let deferred = self.defer(invocation);
        AssertUnwindSafe(future).catch_unwind().map(move |outcome| {
            deferred.settle(outcome, |d, result| match result {
                Ok(value) => d.complete(Some(value)),
                Err(err) => {
                    let failure = describe_error(err)
                        .with_origin(FailureOrigin::AsyncReturned)
                        .with_invocation_id(d.invocation.id.clone());
                    d.fail(&failure)
                }
            })
        })
    }

    /// Log `OnException: <kind>: <message>`
    ///
    /// Purely observational; propagating the error is the caller's job.
    pub fn on_exception(
        &self,
        invocation: Invocation,
        failure: &InvocationFailure,
    ) -> InvocationState {
        let level = self.tracker.indent_level(invocation.context.depth(), 0);
        self.logger().log_exception(failure, level);
        diagnose_failure(&invocation, failure);
        InvocationState::Failed
    }

    fn exit_now(&self, invocation: Invocation, value: Option<&dyn Display>) -> InvocationState {
        let level = self.tracker.indent_level(invocation.context.depth(), 0);
        self.logger().log_exit(value, level);
        diagnose(&invocation, EVENT_EXIT);
        InvocationState::Exited
    }

    fn defer(&self, invocation: Invocation) -> DeferredExit {
        tracing::trace!(
            component = COMPONENT,
            op = %invocation.identity.qualified_name(),
            invocation_id = %invocation.id,
            state = ?InvocationState::Pending,
            "exit deferred until completion"
        );
        DeferredExit {
            interceptor: self.clone(),
            invocation,
        }
    }

    // ===== Manual wrapper attachment =====

    /// Run `body` between entry and exit notifications
    ///
    /// `body` receives the context for its own nested calls. A panic in
    /// `body` is logged as an exception and then resumed.
    pub fn intercept<T, F>(
        &self,
        context: &CallContext,
        identity: MethodIdentity,
        bindings: Vec<ArgumentBinding>,
        body: F,
    ) -> T
    where
        F: FnOnce(CallContext) -> T,
        T: Display,
    {
        let invocation = self.on_entry(context, identity, &bindings);
        let (invocation, output) = self.run_observed(invocation, body);
        self.on_exit_value(invocation, &output);
        output
    }

    /// [`intercept`](Self::intercept) for bodies returning `()`
    pub fn intercept_void<F>(
        &self,
        context: &CallContext,
        identity: MethodIdentity,
        bindings: Vec<ArgumentBinding>,
        body: F,
    ) where
        F: FnOnce(CallContext),
    {
        let invocation = self.on_entry(context, identity, &bindings);
        let (invocation, ()) = self.run_observed(invocation, body);
        self.on_exit_void(invocation);
    }

    /// [`intercept`](Self::intercept) for fallible bodies
    ///
    /// `Err(e)` is logged as an exception and returned as is.
    pub fn intercept_result<T, E, F>(
        &self,
        context: &CallContext,
        identity: MethodIdentity,
        bindings: Vec<ArgumentBinding>,
        body: F,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce(CallContext) -> std::result::Result<T, E>,
        T: Display,
        E: Display,
    {
        let invocation = self.on_entry(context, identity, &bindings);
        let (invocation, result) = self.run_observed(invocation, body);
        match &result {
            Ok(value) => self.on_exit_value(invocation, value),
            Err(err) => {
                let failure = describe_error(err).with_invocation_id(invocation.id.clone());
                self.on_exception(invocation, &failure)
            }
        };
        result
    }

    /// [`intercept_result`](Self::intercept_result) for bodies returning
    /// `Result<(), E>`
    pub fn intercept_result_void<E, F>(
        &self,
        context: &CallContext,
        identity: MethodIdentity,
        bindings: Vec<ArgumentBinding>,
        body: F,
    ) -> std::result::Result<(), E>
    where
        F: FnOnce(CallContext) -> std::result::Result<(), E>,
        E: Display,
    {
        let invocation = self.on_entry(context, identity, &bindings);
        let (invocation, result) = self.run_observed(invocation, body);
        match &result {
            Ok(()) => self.on_exit_void(invocation),
            Err(err) => {
                let failure = describe_error(err).with_invocation_id(invocation.id.clone());
                self.on_exception(invocation, &failure)
            }
        };
        result
    }

    /// Entry now, exit when the future built by `body` resolves
    pub fn intercept_async<T, Fut, F>(
        &self,
        context: &CallContext,
        identity: MethodIdentity,
        bindings: Vec<ArgumentBinding>,
        body: F,
    ) -> impl Future<Output = T>
    where
        F: FnOnce(CallContext) -> Fut,
        Fut: Future<Output = T>,
        T: Display,
    {
        let invocation = self.on_entry(context, identity, &bindings);
        let (invocation, future) = self.run_observed(invocation, body);
        self.on_exit_pending(invocation, future)
    }

    /// [`intercept_async`](Self::intercept_async) for futures without a value
    pub fn intercept_async_void<Fut, F>(
        &self,
        context: &CallContext,
        identity: MethodIdentity,
        bindings: Vec<ArgumentBinding>,
        body: F,
    ) -> impl Future<Output = ()>
    where
        F: FnOnce(CallContext) -> Fut,
        Fut: Future<Output = ()>,
    {
        let invocation = self.on_entry(context, identity, &bindings);
        let (invocation, future) = self.run_observed(invocation, body);
        self.on_exit_pending_void(invocation, future)
    }

    /// [`intercept_async`](Self::intercept_async) for fallible futures
    pub fn intercept_async_result<T, E, Fut, F>(
        &self,
        context: &CallContext,
        identity: MethodIdentity,
        bindings: Vec<ArgumentBinding>,
        body: F,
    ) -> impl Future<Output = std::result::Result<T, E>>
    where
        F: FnOnce(CallContext) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        T: Display,
        E: Display,
    {
        let invocation = self.on_entry(context, identity, &bindings);
        let (invocation, future) = self.run_observed(invocation, body);
        self.on_exit_pending_result(invocation, future)
    }

    fn run_observed<T, F>(&self, invocation: Invocation, body: F) -> (Invocation, T)
    where
        F: FnOnce(CallContext) -> T,
    {
        let child = invocation.child_context();
        match panic::catch_unwind(AssertUnwindSafe(|| body(child))) {
            Ok(output) => (invocation, output),
            Err(payload) => {
                let failure = InvocationFailure::from_panic(payload.as_ref())
                    .with_invocation_id(invocation.id.clone());
                self.on_exception(invocation, &failure);
                panic::resume_unwind(payload)
            }
        }
    }
}

impl fmt::Debug for MethodInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInterceptor")
            .field("tracker", &self.tracker)
            .field("indent_unit", &self.indent_unit)
            .finish_non_exhaustive()
    }
}

/// Exit notification parked until a future resolves
struct DeferredExit {
    interceptor: MethodInterceptor,
    invocation: Invocation,
}

impl DeferredExit {
    /// Log the outcome of a polled future, resuming its panic if it had one
    fn settle<T>(self, outcome: std::thread::Result<T>, log: impl FnOnce(Self, &T)) -> T {
        match outcome {
            Ok(output) => {
                log(self, &output);
                output
            }
            Err(payload) => {
                let failure = InvocationFailure::from_panic(payload.as_ref())
                    .with_invocation_id(self.invocation.id.clone());
                self.fail(&failure);
                panic::resume_unwind(payload)
            }
        }
    }

    fn complete(self, value: Option<&dyn Display>) {
        let level = self
            .interceptor
            .tracker
            .deferred_indent_level(self.invocation.context.depth());
        self.interceptor.logger().log_exit(value, level);
        diagnose(&self.invocation, EVENT_EXIT_DEFERRED);
    }

    fn fail(self, failure: &InvocationFailure) {
        let level = self
            .interceptor
            .tracker
            .deferred_indent_level(self.invocation.context.depth());
        self.interceptor.logger().log_exception(failure, level);
        diagnose_failure(&self.invocation, failure);
    }
}

/// Reduce a returned error to a failure without letting its `Display` unwind
fn describe_error<E>(error: &E) -> InvocationFailure
where
    E: Display + ?Sized,
{
    panic::catch_unwind(AssertUnwindSafe(|| InvocationFailure::from_error(error))).unwrap_or_else(
        |_| {
            tracing::warn!(
                component = COMPONENT,
                event = EVENT_FORMAT_PANIC,
                "error Display panicked"
            );
            InvocationFailure::new(std::any::type_name::<E>(), UNPRINTABLE)
        },
    )
}

fn diagnose(invocation: &Invocation, event: &'static str) {
    tracing::trace!(
        component = COMPONENT,
        op = %invocation.identity.qualified_name(),
        event = event,
        invocation_id = %invocation.id,
        depth = invocation.context.depth().get()
    );
}

fn diagnose_failure(invocation: &Invocation, failure: &InvocationFailure) {
    tracing::trace!(
        component = COMPONENT,
        op = %invocation.identity.qualified_name(),
        event = EVENT_EXCEPTION,
        invocation_id = %invocation.id,
        depth = invocation.context.depth().get(),
        code = failure.code()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use calltrail_logging::{LogLevel, RecordingSink};

    struct Widget;

    fn interceptor() -> (MethodInterceptor, RecordingSink) {
        let sink = RecordingSink::new();
        let interceptor = MethodInterceptor::new(Arc::new(sink.clone()))
            .with_tracker(Arc::new(IndentTracker::new()));
        (interceptor, sink)
    }

    #[test]
    fn test_call_context_child_is_one_deeper() {
        let root = CallContext::root();
        assert_eq!(root.depth(), CallDepth::ROOT);
        assert_eq!(root.child().child().depth().get(), 2);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!InvocationState::Entered.is_terminal());
        assert!(!InvocationState::Pending.is_terminal());
        assert!(InvocationState::Exited.is_terminal());
        assert!(InvocationState::Completed.is_terminal());
        assert!(InvocationState::Failed.is_terminal());
    }

    #[test]
    fn test_on_exit_classifies_outcome() {
        let (interceptor, sink) = interceptor();
        let ctx = CallContext::root();

        let inv = interceptor.on_entry(&ctx, MethodIdentity::of::<Widget>("a", 0), &[]);
        let state = interceptor.on_exit(inv, InvocationOutcome::Value(Some("x".into())));
        assert_eq!(state, InvocationState::Exited);

        let inv = interceptor.on_entry(&ctx, MethodIdentity::of::<Widget>("b", 0), &[]);
        let state = interceptor.on_exit(
            inv,
            InvocationOutcome::Failure(InvocationFailure::new("k", "m")),
        );
        assert_eq!(state, InvocationState::Failed);

        assert_eq!(sink.count_exact(LogLevel::Info, "Exit: [x]"), 1);
        assert_eq!(sink.count_exact(LogLevel::Error, "OnException: k: m"), 1);
    }

    #[test]
    fn test_invocation_carries_identity_and_context() {
        let (interceptor, _sink) = interceptor();
        let ctx = CallContext::root().child();

        let inv = interceptor.on_entry(&ctx, MethodIdentity::of::<Widget>("run", 0), &[]);

        assert_eq!(inv.identity().method_name(), "run");
        assert_eq!(inv.context(), ctx);
        assert_eq!(inv.child_context().depth().get(), 2);
        assert!(!inv.id().as_str().is_empty());
    }

    #[test]
    fn test_indent_unit_validation() {
        let (interceptor, _sink) = interceptor();

        assert!(interceptor.clone().with_indent_unit("").is_err());
        assert!(interceptor.clone().with_indent_unit("\n").is_err());

        let custom = interceptor.with_indent_unit("\t").unwrap();
        assert_eq!(custom.indent_unit(), "\t");
    }
}
