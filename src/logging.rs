//! Logging abstraction layer.
//!
//! Provides macros that dispatch to either the [`log`](https://docs.rs/log)
//! or [`tracing`](https://docs.rs/tracing) crate depending on which feature
//! is enabled. The two features are **mutually exclusive**: enable at most one.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! # Available macros
//!
//! - `trace_log!`: finest-grained diagnostic output.
//! - `debug_log!`: information useful for debugging.
//! - `info_log!`: general informational messages.
//! - `warn_log!`: potentially harmful situations.
//! - `error_log!`: error events that might still allow the app to continue.
//!
//! All macros accept `format!`-style arguments:
//!
//! ```ignore
//! use frame_navigator::{trace_log, debug_log, info_log, warn_log, error_log};
//!
//! trace_log!("Matching '{}' against {} entries", path, table.len());
//! debug_log!("Router {} delegating '{}' to child", router, path);
//! info_log!("Navigation complete: '{}'", path);
//! warn_log!("Async builder requested synchronously, queueing instead");
//! error_log!("Outlet mount failed: {}", err);
//! ```
//!
//! The router logs navigation start and completion at `info`, delegation,
//! suppression and stale build discards at `debug`, and per-entry matching at
//! `trace`.

/// `trace` level: Finest-grained diagnostics (per-entry matching, cache lookups).
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    };
}

/// `debug` level: Delegation, suppression, stale builds.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    };
}

/// `info` level: Navigation start and completion, router instantiation.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    };
}

/// `warn` level: Recoverable misuse, e.g. invalid masks or synchronous async builders.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    };
}

/// `error` level: Fatal configuration errors surfaced during a build.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    };
}
