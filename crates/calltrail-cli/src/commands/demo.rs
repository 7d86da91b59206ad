//! Demo command
//!
//! Usage: calltrail demo [--profile <PROFILE>] [--depth <N>] [--indent-unit <S>] [--fail] [--async]
//!
//! Builds a chain of `depth` nested calls, each wrapped by the interceptor,
//! and logs the resulting call tree through the tracing subscriber.

use calltrail_core::{arguments, method_identity, CallContext, MethodInterceptor};
use calltrail_logging::{init, Profile, TracingSink};
use clap::Args;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Logging profile (development, production, test); defaults to CALLTRAIL_PROFILE
    #[arg(long)]
    pub profile: Option<Profile>,

    /// Number of nested calls
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=64))]
    pub depth: u32,

    /// Indentation unit (default: three spaces)
    #[arg(long)]
    pub indent_unit: Option<String>,

    /// Make the innermost call fail
    #[arg(long)]
    pub fail: bool,

    /// Run the chain as nested futures
    #[arg(long = "async")]
    pub run_async: bool,
}

/// Failure raised by the innermost call when `--fail` is set
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DemoError {
    #[error("call chain exhausted at level {level}")]
    Exhausted { level: u32 },
}

/// Chain of nested calls, each level wrapped by the interceptor
pub struct CallChain {
    interceptor: MethodInterceptor,
    fail: bool,
}

impl CallChain {
    pub fn new(interceptor: MethodInterceptor, fail: bool) -> Self {
        Self { interceptor, fail }
    }

    /// Sum of the levels from `level` down to the bottom of the chain
    pub fn descend(&self, ctx: &CallContext, level: u32, remaining: u32) -> Result<u32, DemoError> {
        self.interceptor.intercept_result(
            ctx,
            method_identity!(Self, descend(level, remaining)),
            arguments![level, remaining],
            |child| {
                if remaining == 0 {
                    return self.bottom(level);
                }
                Ok(level + self.descend(&child, level + 1, remaining - 1)?)
            },
        )
    }

    /// Async counterpart of [`descend`](Self::descend)
    pub fn descend_async<'a>(
        &'a self,
        ctx: &CallContext,
        level: u32,
        remaining: u32,
    ) -> BoxFuture<'a, Result<u32, DemoError>> {
        self.interceptor
            .intercept_async_result(
                ctx,
                method_identity!(Self, descend_async(level, remaining)),
                arguments![level, remaining],
                move |child| async move {
                    if remaining == 0 {
                        tokio::task::yield_now().await;
                        return self.bottom(level);
                    }
                    Ok::<_, DemoError>(
                        level + self.descend_async(&child, level + 1, remaining - 1).await?,
                    )
                },
            )
            .boxed()
    }

    fn bottom(&self, level: u32) -> Result<u32, DemoError> {
        if self.fail {
            Err(DemoError::Exhausted { level })
        } else {
            Ok(level)
        }
    }
}

/// Execute demo command
pub fn execute(args: DemoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let profile = match args.profile {
        Some(profile) => profile,
        None => Profile::from_env()?,
    };
    init(profile);

    let mut interceptor = MethodInterceptor::new(Arc::new(TracingSink::new()));
    if let Some(unit) = &args.indent_unit {
        interceptor = interceptor.with_indent_unit(unit)?;
    }
    let chain = CallChain::new(interceptor, args.fail);
    let root = CallContext::root();

    let total = if args.run_async {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(chain.descend_async(&root, 1, args.depth - 1))?
    } else {
        chain.descend(&root, 1, args.depth - 1)?
    };

    println!("result: {}", total);
    Ok(())
}
