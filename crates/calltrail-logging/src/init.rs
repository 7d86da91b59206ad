//! Logging initialization module
//!
//! Provides a single initialization point for the tracing subscriber that
//! [`TracingSink`](crate::TracingSink) and the crate's own diagnostics write to.

use calltrail_errors::{CalltrailError, Result};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable consulted by [`Profile::from_env`]
pub const PROFILE_ENV: &str = "CALLTRAIL_PROFILE";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    /// Read the profile from `CALLTRAIL_PROFILE`
    ///
    /// Falls back to `Development` when the variable is unset.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProfile` when the variable holds an unrecognised name.
    pub fn from_env() -> Result<Self> {
        match std::env::var(PROFILE_ENV) {
            Ok(value) => value.parse(),
            Err(_) => Ok(Profile::Development),
        }
    }

    fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development => "calltrail=debug",
            Profile::Production => "calltrail=info",
            Profile::Test => "calltrail=trace",
        }
    }
}

impl FromStr for Profile {
    type Err = CalltrailError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            _ => Err(CalltrailError::UnknownProfile {
                value: s.to_string(),
            }),
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Only the first call has any effect. `RUST_LOG` overrides the profile's
/// default filter.
///
/// # Profiles
///
/// - **Development**: Human-readable call trees at debug level
/// - **Production**: JSON structured lines at info level
/// - **Test**: No output layer, filter at trace; tests install the capture
///   layer instead
///
/// # Example
///
/// ```
/// use calltrail_logging::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()));
        match profile {
            Profile::Development => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_target(false)
                    .init();
            }
            Profile::Production => {
                tracing_subscriber::fmt().json().with_env_filter(filter).init();
            }
            Profile::Test => {
                // Test capture is initialized separately via init_test_capture()
                tracing_subscriber::registry().with(filter).init();
            }
        }
    });
}
