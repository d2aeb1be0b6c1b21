//! Textual filter expressions.
//!
//! ```text
//! expr  := or
//! or    := and (('|' | '||') and)*
//! and   := unary (('&' | '&&') unary)*
//! unary := '!' unary | '(' expr ')' | 'true' | 'false' | [relation] SEVERITY
//! ```
//!
//! A severity without a relation is an equality test, so `debug | info`
//! accepts exactly those two levels. `Display` for [`Predicate`] produces text
//! this parser accepts.
//! `!` and parentheses nest at most 64 levels deep.

use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

use super::{Placeholder, Predicate, Relation};
use crate::error::ConfigError;
use crate::severity::Severity;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Not,
    And,
    Or,
    Open,
    Close,
    Relation(Relation),
    Word(String),
}

fn next_is(chars: &mut Peekable<CharIndices<'_>>, want: char) -> bool {
    chars.next_if(|(_, n)| *n == want).is_some()
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '(' => Token::Open,
            ')' => Token::Close,
            '&' => {
                next_is(&mut chars, '&');
                Token::And
            }
            '|' => {
                next_is(&mut chars, '|');
                Token::Or
            }
            '!' if next_is(&mut chars, '=') => Token::Relation(Relation::Ne),
            '!' => Token::Not,
            '=' => {
                next_is(&mut chars, '=');
                Token::Relation(Relation::Eq)
            }
            '<' if next_is(&mut chars, '=') => Token::Relation(Relation::Le),
            '<' => Token::Relation(Relation::Lt),
            '>' if next_is(&mut chars, '=') => Token::Relation(Relation::Ge),
            '>' => Token::Relation(Relation::Gt),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut word = String::from(c);
                while let Some((_, n)) =
                    chars.next_if(|(_, n)| n.is_ascii_alphanumeric() || *n == '_')
                {
                    word.push(n);
                }
                Token::Word(word)
            }
            other => return Err(format!("unexpected character `{other}` at offset {pos}")),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

/// Deepest nesting of `!` and parentheses accepted in one expression.
const MAX_DEPTH: usize = 64;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, want: &Token) -> bool {
        if self.peek() == Some(want) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Predicate, String> {
        let mut lhs = self.and()?;
        while self.eat(&Token::Or) {
            lhs = lhs | self.and()?;
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Predicate, String> {
        let mut lhs = self.unary()?;
        while self.eat(&Token::And) {
            lhs = lhs & self.unary()?;
        }
        Ok(lhs)
    }

    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, String>,
    ) -> Result<T, String> {
        if self.depth >= MAX_DEPTH {
            return Err("expression nested too deeply".to_owned());
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn unary(&mut self) -> Result<Predicate, String> {
        match self.bump() {
            Some(Token::Not) => Ok(!self.nested(Self::unary)?),
            Some(Token::Open) => {
                let inner = self.nested(Self::or)?;
                if self.eat(&Token::Close) {
                    Ok(inner)
                } else {
                    Err("missing `)`".to_owned())
                }
            }
            Some(Token::Relation(relation)) => match self.bump() {
                Some(Token::Word(word)) => Ok(Predicate::Dynamic {
                    relation,
                    threshold: severity(&word)?,
                }),
                _ => Err(format!("expected a severity after `{relation}`")),
            },
            Some(Token::Word(word)) => match word.to_ascii_lowercase().as_str() {
                "true" => Ok(Predicate::ALWAYS),
                "false" => Ok(Predicate::NEVER),
                _ => Ok(Placeholder.equal_to(severity(&word)?)),
            },
            Some(other) => Err(format!("unexpected token {other:?}")),
            None => Err("unexpected end of expression".to_owned()),
        }
    }
}

fn severity(word: &str) -> Result<Severity, String> {
    word.parse::<Severity>().map_err(|e| e.to_string())
}

impl FromStr for Predicate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ConfigError::InvalidFilter {
            expression: s.to_owned(),
            reason,
        };
        let tokens = tokenize(s).map_err(invalid)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let predicate = parser.or().map_err(invalid)?;
        match parser.peek() {
            None => Ok(predicate),
            Some(token) => Err(invalid(format!("trailing input at {token:?}"))),
        }
    }
}
