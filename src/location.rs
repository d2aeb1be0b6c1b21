//! Call-site metadata attached to each log call.

use std::fmt;

/// Source location of a log call.
///
/// Built by the caller, usually through [`location!`](crate::location!), and
/// passed into [`Dispatcher::log`](crate::Dispatcher::log) by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location<'a> {
    pub file: &'a str,
    pub line: u32,
    pub function: &'a str,
}

impl<'a> Location<'a> {
    pub const fn new(file: &'a str, line: u32, function: &'a str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// Placeholder used when a bridged record carries no location.
    pub const fn unknown() -> Location<'static> {
        Location::new("<unknown>", 0, "<unknown>")
    }
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} [{}]", self.file, self.line, self.function)
    }
}

/// Path of the enclosing function, e.g. `my_crate::server::start`.
///
/// Closure frames are stripped so a call inside a closure reports the
/// function that defines it.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __sievelog_here() {}
        fn __sievelog_type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __sievelog_type_name_of(__sievelog_here);
        let mut name = name.strip_suffix("::__sievelog_here").unwrap_or(name);
        while let Some(outer) = name.strip_suffix("::{{closure}}") {
            name = outer;
        }
        name
    }};
}

/// [`Location`] of the macro invocation.
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new(::std::file!(), ::std::line!(), $crate::function_name!())
    };
}
