#![warn(clippy::all, rust_2018_idioms)]

/// Formats a message with its `[file:module:line]` call-site prefix.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_context {
    ($($arg:tt)*) => {
        format!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*))
    };
}

/// Unified logging macros: each message goes to both `log` and `tracing`
/// with the call-site context prepended.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        let message = $crate::__log_context!($($arg)*);
        log::debug!("{}", message);
        tracing::debug!("{}", message);
    }};
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        let message = $crate::__log_context!($($arg)*);
        log::info!("{}", message);
        tracing::info!("{}", message);
    }};
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        let message = $crate::__log_context!($($arg)*);
        log::warn!("{}", message);
        tracing::warn!("{}", message);
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        let message = $crate::__log_context!($($arg)*);
        log::error!("{}", message);
        tracing::error!("{}", message);
    }};
}

/// Tracing-only variants, for per-page and per-resource chatter that should
/// not reach `log` consumers.
#[macro_export]
macro_rules! trace_trace {
    ($($arg:tt)*) => {
        tracing::trace!("{}", $crate::__log_context!($($arg)*));
    };
}

#[macro_export]
macro_rules! trace_debug {
    ($($arg:tt)*) => {
        tracing::debug!("{}", $crate::__log_context!($($arg)*));
    };
}

#[macro_export]
macro_rules! trace_warn {
    ($($arg:tt)*) => {
        tracing::warn!("{}", $crate::__log_context!($($arg)*));
    };
}

/*
Logging conventions for the fetch pipeline:

- log_info!  service fetch start and completion, with resource and error counts
- log_warn!  relation rules that cannot resolve an endpoint (missing policy,
             ambiguous group name), access denied on a single call
- log_error! fatal fetch errors surfaced to the caller
- log_debug! cache producers running, fetch-funcs skipped by sync config
- trace_debug! per-page pagination progress
- trace_trace! per-resource conversion and per-edge relation detail

Example output:
  [src/app/services/relations.rs:awsgraph::app::services::relations:212] no policy named 'nmanaged_policy_X' found for user usr_1

The library never installs a subscriber; the awsgraph binary does.
*/
