//! Positional message templates.
//!
//! `%1%`, `%2%`, … are replaced by the matching argument's `Display` output
//! and `%%` produces a literal `%`. Rendering never fails: a directive with no
//! argument renders as nothing, surplus arguments are ignored and malformed
//! directives are copied through unchanged.
//!
//! ```
//! use sievelog::message::render;
//!
//! assert_eq!(render("argc: %1%", &[&5]), "argc: 5");
//! assert_eq!(render("only %1%", &[&1, &"unused"]), "only 1");
//! assert_eq!(render("missing %2%!", &[&1]), "missing !");
//! ```

use std::fmt::{self, Write};

use thiserror::Error;

/// Something in a template or its arguments that did not line up.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatAnomaly {
    /// A `%` that does not start a `%N%` or `%%` directive.
    #[error("malformed directive at byte {offset}")]
    Malformed { offset: usize },
    /// A directive referenced an argument that was not supplied.
    #[error("directive %{index}% has no argument ({supplied} supplied)")]
    MissingArgument { index: usize, supplied: usize },
    /// More arguments were supplied than the template references.
    #[error("{unused} argument(s) not referenced by the template")]
    UnusedArguments { unused: usize },
    /// An argument's `Display` implementation reported an error.
    #[error("argument {index} failed to format")]
    ArgumentFailed { index: usize },
}

/// Substitute `args` into `template`, absorbing every anomaly.
pub fn render(template: &str, args: &[&dyn fmt::Display]) -> String {
    substitute(template, args, |_| {})
}

/// Like [`render`] but report the first anomaly instead of absorbing it.
pub fn render_checked(template: &str, args: &[&dyn fmt::Display]) -> Result<String, FormatAnomaly> {
    let mut first = None;
    let out = substitute(template, args, |anomaly| {
        first.get_or_insert(anomaly);
    });
    match first {
        Some(anomaly) => Err(anomaly),
        None => Ok(out),
    }
}

fn substitute(
    template: &str,
    args: &[&dyn fmt::Display],
    mut report: impl FnMut(FormatAnomaly),
) -> String {
    let mut out = String::with_capacity(template.len());
    let mut highest = 0;
    let mut rest = template;
    let mut offset = 0;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let consumed = match directive(after) {
            Some(Directive::Percent) => {
                out.push('%');
                2
            }
            Some(Directive::Argument { index, len }) => {
                highest = highest.max(index);
                match args.get(index - 1) {
                    Some(arg) => {
                        let mark = out.len();
                        if write!(out, "{arg}").is_err() {
                            out.truncate(mark);
                            report(FormatAnomaly::ArgumentFailed { index });
                        }
                    }
                    None => report(FormatAnomaly::MissingArgument {
                        index,
                        supplied: args.len(),
                    }),
                }
                len + 2
            }
            None => {
                report(FormatAnomaly::Malformed {
                    offset: offset + start,
                });
                out.push('%');
                1
            }
        };
        offset += start + consumed;
        rest = &rest[start + consumed..];
    }
    out.push_str(rest);
    if args.len() > highest {
        report(FormatAnomaly::UnusedArguments {
            unused: args.len() - highest,
        });
    }
    out
}

enum Directive {
    Percent,
    Argument { index: usize, len: usize },
}

/// Classify the text following a `%`.
fn directive(after: &str) -> Option<Directive> {
    if after.starts_with('%') {
        return Some(Directive::Percent);
    }
    let len = after.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 || after.as_bytes().get(len) != Some(&b'%') {
        return None;
    }
    match after[..len].parse::<usize>() {
        Ok(index) if index > 0 => Some(Directive::Argument { index, len }),
        _ => None,
    }
}
