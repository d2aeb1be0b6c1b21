//! Boolean filters over [`Severity`].
//!
//! A [`Predicate`] is either a constant, produced when both sides of a
//! comparison are concrete levels, or a dynamic test of the severity under
//! evaluation against one threshold, produced when one side is the
//! [`Placeholder`]. Predicates compose with `&`, `|` and `!` and stay within
//! the same representation.
//!
//! ```
//! use sievelog::{Placeholder, Predicate, Severity};
//!
//! let chatty = Predicate::from(Severity::Debug) | Predicate::from(Severity::Info);
//! assert!(chatty.evaluate(Severity::Info));
//! assert!(!chatty.evaluate(Severity::Error));
//!
//! let loud = Placeholder.at_least(Severity::Warning);
//! assert!(loud.evaluate(Severity::Error));
//! ```

mod parse;

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use crate::error::ConfigError;
use crate::severity::Severity;

/// Stand-in for "the severity under test" when building a predicate.
///
/// It is never carried by an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Placeholder;

/// One side of a severity comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Placeholder,
    Level(Severity),
}

impl From<Severity> for Operand {
    fn from(value: Severity) -> Self {
        Self::Level(value)
    }
}

impl From<Placeholder> for Operand {
    fn from(_: Placeholder) -> Self {
        Self::Placeholder
    }
}

/// The six relational operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Relation {
    /// Apply the relation to two concrete levels.
    pub fn holds(self, lhs: Severity, rhs: Severity) -> bool {
        match self {
            Relation::Eq => lhs == rhs,
            Relation::Ne => lhs != rhs,
            Relation::Lt => lhs < rhs,
            Relation::Gt => lhs > rhs,
            Relation::Le => lhs <= rhs,
            Relation::Ge => lhs >= rhs,
        }
    }

    /// Relation with its operands swapped: `a R b` iff `b R.mirrored() a`.
    pub fn mirrored(self) -> Self {
        match self {
            Relation::Eq => Relation::Eq,
            Relation::Ne => Relation::Ne,
            Relation::Lt => Relation::Gt,
            Relation::Gt => Relation::Lt,
            Relation::Le => Relation::Ge,
            Relation::Ge => Relation::Le,
        }
    }

    /// Logical complement: `a R b` iff `!(a R.negated() b)`.
    pub fn negated(self) -> Self {
        match self {
            Relation::Eq => Relation::Ne,
            Relation::Ne => Relation::Eq,
            Relation::Lt => Relation::Ge,
            Relation::Gt => Relation::Le,
            Relation::Le => Relation::Gt,
            Relation::Ge => Relation::Lt,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Eq => "=",
            Relation::Ne => "!=",
            Relation::Lt => "<",
            Relation::Gt => ">",
            Relation::Le => "<=",
            Relation::Ge => ">=",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A pure function from [`Severity`] to `bool`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// Always true or always false.
    Const(bool),
    /// `severity <relation> threshold` for the severity under test.
    Dynamic {
        relation: Relation,
        threshold: Severity,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

/// Build a predicate from a comparison between two operands.
///
/// Two concrete levels are compared immediately and give a constant. A
/// placeholder on either side gives a dynamic predicate on the other operand.
/// Two placeholders are rejected.
pub fn compare(
    lhs: impl Into<Operand>,
    relation: Relation,
    rhs: impl Into<Operand>,
) -> Result<Predicate, ConfigError> {
    match (lhs.into(), rhs.into()) {
        (Operand::Level(lhs), Operand::Level(rhs)) => {
            Ok(Predicate::Const(relation.holds(lhs, rhs)))
        }
        (Operand::Placeholder, Operand::Level(threshold)) => Ok(Predicate::Dynamic {
            relation,
            threshold,
        }),
        (Operand::Level(threshold), Operand::Placeholder) => Ok(Predicate::Dynamic {
            relation: relation.mirrored(),
            threshold,
        }),
        (Operand::Placeholder, Operand::Placeholder) => Err(ConfigError::NoConcreteOperand),
    }
}

impl Placeholder {
    fn against(self, relation: Relation, threshold: Severity) -> Predicate {
        Predicate::Dynamic {
            relation,
            threshold,
        }
    }

    /// `_ == threshold`
    pub fn equal_to(self, threshold: Severity) -> Predicate {
        self.against(Relation::Eq, threshold)
    }

    /// `_ != threshold`
    pub fn not_equal_to(self, threshold: Severity) -> Predicate {
        self.against(Relation::Ne, threshold)
    }

    /// `_ < threshold`
    pub fn less_than(self, threshold: Severity) -> Predicate {
        self.against(Relation::Lt, threshold)
    }

    /// `_ > threshold`
    pub fn greater_than(self, threshold: Severity) -> Predicate {
        self.against(Relation::Gt, threshold)
    }

    /// `_ <= threshold`
    pub fn at_most(self, threshold: Severity) -> Predicate {
        self.against(Relation::Le, threshold)
    }

    /// `_ >= threshold`
    pub fn at_least(self, threshold: Severity) -> Predicate {
        self.against(Relation::Ge, threshold)
    }
}

impl Severity {
    /// Compare two concrete levels, yielding a constant predicate.
    pub fn compare(self, relation: Relation, other: Severity) -> Predicate {
        Predicate::Const(relation.holds(self, other))
    }
}

impl Predicate {
    pub const ALWAYS: Predicate = Predicate::Const(true);
    pub const NEVER: Predicate = Predicate::Const(false);

    /// Evaluate the predicate for `severity`.
    pub fn evaluate(&self, severity: Severity) -> bool {
        match self {
            Predicate::Const(value) => *value,
            Predicate::Dynamic {
                relation,
                threshold,
            } => relation.holds(severity, *threshold),
            Predicate::And(lhs, rhs) => lhs.evaluate(severity) && rhs.evaluate(severity),
            Predicate::Or(lhs, rhs) => lhs.evaluate(severity) || rhs.evaluate(severity),
        }
    }

    /// Return `true` if at least one real severity passes.
    pub fn is_satisfiable(&self) -> bool {
        Severity::ALL.iter().any(|s| self.evaluate(*s))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Predicate::Const(_))
    }

    /// Severities accepted by this predicate, in ascending order.
    pub fn accepted(&self) -> Vec<Severity> {
        Severity::ALL
            .into_iter()
            .filter(|s| self.evaluate(*s))
            .collect()
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::And(..) | Predicate::Or(..) => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

impl Default for Predicate {
    /// `_ >= Info`
    fn default() -> Self {
        Placeholder.at_least(Severity::Info)
    }
}

/// A bare severity reads as an equality test.
impl From<Severity> for Predicate {
    fn from(value: Severity) -> Self {
        Placeholder.equal_to(value)
    }
}

impl From<bool> for Predicate {
    fn from(value: bool) -> Self {
        Predicate::Const(value)
    }
}

impl Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        match self {
            Predicate::Const(value) => Predicate::Const(!value),
            Predicate::Dynamic {
                relation,
                threshold,
            } => Predicate::Dynamic {
                relation: relation.negated(),
                threshold,
            },
            Predicate::And(lhs, rhs) => !*lhs | !*rhs,
            Predicate::Or(lhs, rhs) => !*lhs & !*rhs,
        }
    }
}

/// `!severity` is `_ != severity`.
impl Not for Severity {
    type Output = Predicate;

    fn not(self) -> Predicate {
        Placeholder.not_equal_to(self)
    }
}

impl BitAnd for Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Predicate) -> Predicate {
        match (self, rhs) {
            (Predicate::Const(false), _) | (_, Predicate::Const(false)) => Predicate::NEVER,
            (Predicate::Const(true), other) | (other, Predicate::Const(true)) => other,
            (lhs, rhs) => Predicate::And(Box::new(lhs), Box::new(rhs)),
        }
    }
}

impl BitOr for Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Predicate) -> Predicate {
        match (self, rhs) {
            (Predicate::Const(true), _) | (_, Predicate::Const(true)) => Predicate::ALWAYS,
            (Predicate::Const(false), other) | (other, Predicate::Const(false)) => other,
            (lhs, rhs) => Predicate::Or(Box::new(lhs), Box::new(rhs)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Const(value) => write!(f, "{value}"),
            Predicate::Dynamic {
                relation,
                threshold,
            } => write!(f, "{relation} {threshold}"),
            Predicate::And(lhs, rhs) => {
                lhs.fmt_operand(f)?;
                f.write_str(" & ")?;
                rhs.fmt_operand(f)
            }
            Predicate::Or(lhs, rhs) => {
                lhs.fmt_operand(f)?;
                f.write_str(" | ")?;
                rhs.fmt_operand(f)
            }
        }
    }
}

#[cfg(test)]
mod tests;
