use calltrail_core::{arguments, method_identity, CallContext, IndentTracker, MethodInterceptor};
use calltrail_logging::RecordingSink;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[allow(dead_code)]
#[derive(Debug, Error, PartialEq, Eq)]
#[error("UnitTestException")]
pub struct UnitTestError;

/// Type whose methods are all wrapped by the interceptor
pub struct ClassUnderTest {
    interceptor: MethodInterceptor,
}

/// Create a fixture with its own sink and indentation baseline
#[allow(dead_code)]
pub fn fixture() -> (ClassUnderTest, RecordingSink) {
    let sink = RecordingSink::new();
    let interceptor = MethodInterceptor::new(Arc::new(sink.clone()))
        .with_tracker(Arc::new(IndentTracker::new()));
    (ClassUnderTest { interceptor }, sink)
}

/// `Init: <ClassUnderTest>.<method> [<n>] params`
#[allow(dead_code)]
pub fn init_line(method: &str, params: usize) -> String {
    format!(
        "Init: {}.{} [{}] params",
        std::any::type_name::<ClassUnderTest>(),
        method,
        params
    )
}

#[allow(dead_code)]
impl ClassUnderTest {
    pub fn interceptor(&self) -> &MethodInterceptor {
        &self.interceptor
    }

    pub fn method_to_be_tested(&self, ctx: &CallContext) {
        self.interceptor.intercept_void(
            ctx,
            method_identity!(Self, method_to_be_tested()),
            arguments![],
            |_| {},
        )
    }

    pub fn method_with_2_arguments_to_be_tested(
        &self,
        ctx: &CallContext,
        first_argument: i32,
        second_argument: &str,
    ) {
        self.interceptor.intercept_void(
            ctx,
            method_identity!(
                Self,
                method_with_2_arguments_to_be_tested(first_argument, second_argument)
            ),
            arguments![first_argument, second_argument],
            |_| {},
        )
    }

    pub fn method_with_return_value_to_be_tested(&self, ctx: &CallContext) -> i32 {
        self.interceptor.intercept(
            ctx,
            method_identity!(Self, method_with_return_value_to_be_tested()),
            arguments![],
            |_| 42,
        )
    }

    pub fn nested_method_to_be_tested1(&self, ctx: &CallContext) {
        self.interceptor.intercept_void(
            ctx,
            method_identity!(Self, nested_method_to_be_tested1()),
            arguments![],
            |child| self.nested_method_to_be_tested2(&child),
        )
    }

    pub fn nested_method_to_be_tested2(&self, ctx: &CallContext) {
        self.interceptor.intercept_void(
            ctx,
            method_identity!(Self, nested_method_to_be_tested2()),
            arguments![],
            |child| self.nested_method_to_be_tested3(&child),
        )
    }

    pub fn nested_method_to_be_tested3(&self, ctx: &CallContext) {
        self.interceptor.intercept_void(
            ctx,
            method_identity!(Self, nested_method_to_be_tested3()),
            arguments![],
            |child| self.nested_method_to_be_tested4(&child),
        )
    }

    pub fn nested_method_to_be_tested4(&self, ctx: &CallContext) {
        self.interceptor.intercept_void(
            ctx,
            method_identity!(Self, nested_method_to_be_tested4()),
            arguments![],
            |_| {},
        )
    }

    pub fn method_that_throws_exception_to_be_tested(
        &self,
        ctx: &CallContext,
    ) -> Result<(), UnitTestError> {
        self.interceptor.intercept_result_void(
            ctx,
            method_identity!(Self, method_that_throws_exception_to_be_tested()),
            arguments![],
            |_| Err(UnitTestError),
        )
    }

    pub fn method_that_panics_to_be_tested(&self, ctx: &CallContext) {
        self.interceptor.intercept_void(
            ctx,
            method_identity!(Self, method_that_panics_to_be_tested()),
            arguments![],
            |_| panic!("UnitTestPanic"),
        )
    }

    pub fn async_method_to_be_tested(&self, ctx: &CallContext) -> impl Future<Output = i32> {
        self.interceptor.intercept_async(
            ctx,
            method_identity!(Self, async_method_to_be_tested()),
            arguments![],
            |_| async { 42 },
        )
    }

    pub fn async_method_without_return_value_to_be_tested(
        &self,
        ctx: &CallContext,
    ) -> impl Future<Output = ()> {
        self.interceptor.intercept_async_void(
            ctx,
            method_identity!(Self, async_method_without_return_value_to_be_tested()),
            arguments![],
            |_| tokio::time::sleep(Duration::from_millis(20)),
        )
    }

    pub fn async_method_that_throws_exception_to_be_tested(
        &self,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<i32, UnitTestError>> {
        self.interceptor.intercept_async_result(
            ctx,
            method_identity!(Self, async_method_that_throws_exception_to_be_tested()),
            arguments![],
            |_| async { Err::<i32, _>(UnitTestError) },
        )
    }

    pub fn async_method_that_panics_to_be_tested(
        &self,
        ctx: &CallContext,
    ) -> impl Future<Output = ()> {
        self.interceptor.intercept_async_void(
            ctx,
            method_identity!(Self, async_method_that_panics_to_be_tested()),
            arguments![],
            |_| async {
                tokio::task::yield_now().await;
                panic!("UnitTestPanic")
            },
        )
    }

    pub fn async_caller_to_be_tested<'a>(
        &'a self,
        ctx: &CallContext,
    ) -> impl Future<Output = i32> + 'a {
        self.interceptor.intercept_async(
            ctx,
            method_identity!(Self, async_caller_to_be_tested()),
            arguments![],
            move |child| {
                let inner = self.async_method_to_be_tested(&child);
                async move { inner.await + 1 }
            },
        )
    }
}
