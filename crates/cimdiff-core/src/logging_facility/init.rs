//! Subscriber installation
//!
//! All output goes to stderr; stdout belongs to change files and record
//! streams.

use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Environment variable selecting the profile of the `cimdiff` binary
pub const PROFILE_ENV: &str = "CIMDIFF_LOG_PROFILE";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines, debug level for the cimdiff crates
    Development,
    /// One JSON object per event, info level
    Production,
    /// Events are collected by `init_test_capture` instead
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is unset
    pub fn default_directives(self) -> &'static str {
        match self {
            Profile::Development => "cimdiff_core=debug,cimdiff_cli=debug",
            Profile::Production => "cimdiff_core=info,cimdiff_cli=info",
            Profile::Test => "off",
        }
    }

    /// Profile named by [`PROFILE_ENV`], if set and recognised
    pub fn from_env() -> Option<Self> {
        std::env::var(PROFILE_ENV).ok()?.parse().ok()
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" | "json" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(format!("unknown logging profile '{}'", other)),
        }
    }
}

static INIT_ONCE: Once = Once::new();

fn filter_for(profile: Profile) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(profile.default_directives()))
}

/// Install the global subscriber for `profile`
///
/// Only the first call in a process has an effect.
///
/// ```
/// use cimdiff_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_env_filter(filter_for(profile))
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(filter_for(profile))
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}
