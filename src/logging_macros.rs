//! Logging macros that capture the call site.
//!
//! Each macro records `file!()`, `line!()` and the enclosing function's path,
//! substitutes `%1%`, `%2%`, … in the template with the following arguments
//! and hands the result to a [`Dispatcher`](crate::Dispatcher). Arguments are
//! only formatted when some sink accepts the severity; `log_throw!` and
//! `log_failure!` always format. The
//! dispatcher is the process-wide default unless one is given first:
//!
//! ```
//! use sievelog::{Dispatcher, log_info, log_warning};
//!
//! let argc = std::env::args().count();
//! log_info!("argc: %1%", argc);
//!
//! let local = Dispatcher::new();
//! log_warning!(&local, "%1% of %2% workers idle", 3, 8);
//! ```
//!
//! The macros are prefixed with `log_` but take `%N%` templates rather than
//! `format!` strings, so they do not clash with the `log` crate's macros.

/// Log at `Trace` severity.
#[macro_export]
macro_rules! log_trace {
    ($template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_log!($crate::dispatcher(), $crate::Severity::Trace, $template $(, $arg)*)
    };
    ($dispatcher:expr, $template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_log!($dispatcher, $crate::Severity::Trace, $template $(, $arg)*)
    };
}

/// Log at `Debug` severity.
#[macro_export]
macro_rules! log_debug {
    ($template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_log!($crate::dispatcher(), $crate::Severity::Debug, $template $(, $arg)*)
    };
    ($dispatcher:expr, $template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_log!($dispatcher, $crate::Severity::Debug, $template $(, $arg)*)
    };
}

/// Log at `Info` severity.
#[macro_export]
macro_rules! log_info {
    ($template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_log!($crate::dispatcher(), $crate::Severity::Info, $template $(, $arg)*)
    };
    ($dispatcher:expr, $template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_log!($dispatcher, $crate::Severity::Info, $template $(, $arg)*)
    };
}

/// Log at `Warning` severity.
#[macro_export]
macro_rules! log_warning {
    ($template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_log!($crate::dispatcher(), $crate::Severity::Warning, $template $(, $arg)*)
    };
    ($dispatcher:expr, $template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_log!($dispatcher, $crate::Severity::Warning, $template $(, $arg)*)
    };
}

/// Log at `Error` severity.
#[macro_export]
macro_rules! log_error {
    ($template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_log!($crate::dispatcher(), $crate::Severity::Error, $template $(, $arg)*)
    };
    ($dispatcher:expr, $template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_log!($dispatcher, $crate::Severity::Error, $template $(, $arg)*)
    };
}

/// Log at `Throw` severity and evaluate to the resulting
/// [`ThrownError`](crate::ThrownError).
///
/// ```
/// use sievelog::{Dispatcher, ThrownError, log_throw};
///
/// fn parse_port(text: &str) -> Result<u16, ThrownError> {
///     text.parse()
///         .map_err(|_| log_throw!(&Dispatcher::new(), "bad port `%1%`", text))
/// }
///
/// assert_eq!(parse_port("http").unwrap_err().message(), "bad port `http`");
/// ```
#[macro_export]
macro_rules! log_throw {
    ($template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_throw!($crate::dispatcher(), $template $(, $arg)*)
    };
    ($dispatcher:expr, $template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_throw!($dispatcher, $template $(, $arg)*)
    };
}

/// Log at `Failure` severity, flush every backend and terminate.
///
/// Evaluates to `!`.
#[macro_export]
macro_rules! log_failure {
    ($template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_fail!($crate::dispatcher(), $template $(, $arg)*)
    };
    ($dispatcher:expr, $template:literal $(, $arg:expr)* $(,)?) => {
        $crate::__sievelog_fail!($dispatcher, $template $(, $arg)*)
    };
}

/// Render a template with its arguments. Not part of the public API.
#[doc(hidden)]
#[macro_export]
macro_rules! __sievelog_render {
    ($template:literal $(, $arg:expr)*) => {
        $crate::message::render($template, &[$(&$arg as &dyn ::core::fmt::Display),*])
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __sievelog_log {
    ($dispatcher:expr, $severity:expr, $template:literal $(, $arg:expr)*) => {{
        let dispatcher = &$dispatcher;
        let severity = $severity;
        if dispatcher.enabled(severity) {
            let _ = dispatcher.log(
                severity,
                $crate::location!(),
                &$crate::__sievelog_render!($template $(, $arg)*),
            );
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __sievelog_throw {
    ($dispatcher:expr, $template:literal $(, $arg:expr)*) => {
        ($dispatcher).throw(
            $crate::location!(),
            &$crate::__sievelog_render!($template $(, $arg)*),
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __sievelog_fail {
    ($dispatcher:expr, $template:literal $(, $arg:expr)*) => {
        ($dispatcher).fail(
            $crate::location!(),
            &$crate::__sievelog_render!($template $(, $arg)*),
        )
    };
}
