//! Record layouts: how a frontend arranges the parts of a log line.
//!
//! A layout is a template with named slots in braces:
//! `{severity}`, `{file}`, `{line}`, `{function}`, `{time}`, `{thread}` and
//! `{message}`. `{{` and `}}` produce literal braces. Layouts are parsed once
//! when a frontend is built so rendering itself cannot fail.

use std::fmt::{self, Write};
use std::thread;

use chrono::{DateTime, Local};

use crate::error::ConfigError;
use crate::location::Location;
use crate::severity::Severity;

/// Layout used by [`LightFrontend`](crate::LightFrontend) unless overridden.
pub const LIGHT_LAYOUT: &str = "{severity} {file}:{line} [{function}] {message}";
/// Layout used by [`FullFrontend`](crate::FullFrontend) unless overridden.
pub const FULL_LAYOUT: &str = "{severity} {time} {thread} {file}:{line} [{function}] {message}";
/// Default `strftime` pattern for the `{time}` slot.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Severity,
    File,
    Line,
    Function,
    Time,
    Thread,
    Message,
}

impl Slot {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "severity" => Some(Self::Severity),
            "file" => Some(Self::File),
            "line" => Some(Self::Line),
            "function" => Some(Self::Function),
            "time" => Some(Self::Time),
            "thread" => Some(Self::Thread),
            "message" => Some(Self::Message),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Severity => "severity",
            Self::File => "file",
            Self::Line => "line",
            Self::Function => "function",
            Self::Time => "time",
            Self::Thread => "thread",
            Self::Message => "message",
        }
    }

    /// Slots whose value costs a clock read or thread lookup.
    pub fn needs_clock(self) -> bool {
        matches!(self, Self::Time | Self::Thread)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Slot),
}

/// A parsed record layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordLayout {
    source: String,
    segments: Vec<Segment>,
}

impl RecordLayout {
    /// Parse `layout`, rejecting unknown or unterminated slots.
    pub fn parse(layout: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidLayout {
            layout: layout.to_owned(),
            reason,
        };
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = layout.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '{' if chars.next_if_eq(&'{').is_some() => literal.push('{'),
                '}' if chars.next_if_eq(&'}').is_some() => literal.push('}'),
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(n) => name.push(n),
                            None => return Err(invalid(format!("unterminated slot `{{{name}`"))),
                        }
                    }
                    let slot = Slot::from_name(name.trim())
                        .ok_or_else(|| invalid(format!("unknown slot `{{{name}}}`")))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(slot));
                }
                '}' => return Err(invalid("unmatched `}`".to_owned())),
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self {
            source: layout.to_owned(),
            segments,
        })
    }

    pub fn light() -> Self {
        Self::built_in(LIGHT_LAYOUT)
    }

    pub fn full() -> Self {
        Self::built_in(FULL_LAYOUT)
    }

    fn built_in(layout: &str) -> Self {
        Self::parse(layout).unwrap_or_else(|_| Self {
            source: layout.to_owned(),
            segments: vec![Segment::Literal(layout.to_owned())],
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Slots referenced by this layout, in order of appearance.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot(slot) => Some(*slot),
            Segment::Literal(_) => None,
        })
    }

    /// First slot that needs the clock or the current thread, if any.
    pub fn clock_slot(&self) -> Option<Slot> {
        self.slots().find(|slot| slot.needs_clock())
    }

    /// Write the record into a fresh string.
    ///
    /// Slots whose value is missing from `context` render as nothing.
    pub fn render(&self, context: &RenderContext<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + context.message.len() + 32);
        for segment in &self.segments {
            let mark = out.len();
            if context.write_segment(&mut out, segment).is_err() {
                out.truncate(mark);
            }
        }
        out
    }
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self::light()
    }
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Wall-clock time and thread identity captured for one record.
#[derive(Clone, Debug)]
pub struct Stamp {
    pub time: DateTime<Local>,
    pub thread: String,
}

impl Stamp {
    /// Read the clock and identify the calling thread.
    pub fn capture() -> Self {
        let current = thread::current();
        let thread = match current.name() {
            Some(name) => name.to_owned(),
            None => format!("{:?}", current.id()),
        };
        Self {
            time: Local::now(),
            thread,
        }
    }
}

/// Everything a layout can draw on for one record.
#[derive(Clone, Debug)]
pub struct RenderContext<'a> {
    pub severity: Severity,
    pub location: Location<'a>,
    pub message: &'a str,
    pub stamp: Option<Stamp>,
    pub time_format: &'a str,
}

impl RenderContext<'_> {
    fn write_segment(&self, out: &mut String, segment: &Segment) -> fmt::Result {
        match segment {
            Segment::Literal(text) => out.write_str(text),
            Segment::Slot(Slot::Severity) => out.write_str(self.severity.tag()),
            Segment::Slot(Slot::File) => out.write_str(self.location.file),
            Segment::Slot(Slot::Line) => write!(out, "{}", self.location.line),
            Segment::Slot(Slot::Function) => out.write_str(self.location.function),
            Segment::Slot(Slot::Message) => out.write_str(self.message),
            Segment::Slot(Slot::Time) => match &self.stamp {
                Some(stamp) => write!(out, "{}", stamp.time.format(self.time_format)),
                None => Ok(()),
            },
            Segment::Slot(Slot::Thread) => match &self.stamp {
                Some(stamp) => out.write_str(&stamp.thread),
                None => Ok(()),
            },
        }
    }
}
