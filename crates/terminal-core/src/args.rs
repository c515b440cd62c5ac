//! Command-line argument parsing
//!
//! [`parse`] validates the raw tail of a command line against a
//! [`FlagSchema`] and produces typed [`ParsedArgs`] or a structured
//! [`ParseError`]. The parser is a pure function: no I/O, no session state,
//! fully deterministic for a given schema and input.

use crate::flags::{FlagKind, FlagSchema, FlagSpec, FlagValue};
use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;

/// Structured parse failure, always recovered by the dispatch loop
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    /// `-h`/`--help` was present; carries the rendered help text
    #[error("help requested")]
    HelpRequested(String),

    /// Input contained an unterminated quoted substring
    #[error("unclosed quote in arguments")]
    UnclosedQuote,

    /// A `-x`/`--xxx` token matched no declared flag
    #[error("unknown flag '{0}'")]
    UnknownFlag(String),

    /// A bare token appeared where only flags are accepted
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    /// A value-taking flag was the last token on the line
    #[error("flag {flag} expects a value")]
    MissingValue { flag: String },

    /// The value token could not be converted to the flag's kind
    #[error("invalid value '{literal}' for flag {flag}: expected {expected}")]
    InvalidValue {
        flag: String,
        literal: String,
        expected: String,
    },

    /// Conversion succeeded but the flag's validity predicate rejected it
    #[error("invalid value for flag {flag}: {reason}")]
    PredicateFailed { flag: String, reason: String },

    /// A required flag was not supplied
    #[error("missing required flag {flag}")]
    MissingRequired { flag: String },
}

/// Typed, validated arguments handed to a command handler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    values: HashMap<String, FlagValue>,
}

impl ParsedArgs {
    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.values.get(key)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.values
            .get(key)
            .and_then(FlagValue::as_bool)
            .unwrap_or(false)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(FlagValue::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(FlagValue::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(FlagValue::as_f64)
    }

    pub fn get_date(&self, key: &str) -> Option<NaiveDate> {
        self.values.get(key).and_then(FlagValue::as_date)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parse the raw tail of a command line against a flag schema
///
/// Tokenization is shell-like: whitespace separates tokens and quoted
/// substrings stay whole. `-h`/`--help` anywhere short-circuits every other
/// check and yields [`ParseError::HelpRequested`] carrying the rendered
/// help, so the caller never invokes the handler.
pub fn parse(schema: &FlagSchema, raw_tail: &str) -> Result<ParsedArgs, ParseError> {
    let tokens = shlex::split(raw_tail).ok_or(ParseError::UnclosedQuote)?;

    if tokens.iter().any(|t| t == "-h" || t == "--help") {
        return Err(ParseError::HelpRequested(schema.render_help()));
    }

    let mut values: HashMap<String, FlagValue> = HashMap::new();
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        let spec = match schema.match_token(&token) {
            Some(spec) => spec,
            None if token.starts_with('-') && token.len() > 1 => {
                return Err(ParseError::UnknownFlag(token));
            }
            None => return Err(ParseError::UnexpectedArgument(token)),
        };

        let value = if spec.kind() == FlagKind::Switch {
            FlagValue::Bool(true)
        } else {
            let literal = iter.next().ok_or_else(|| ParseError::MissingValue {
                flag: spec.display_name(),
            })?;
            convert(spec, &literal)?
        };

        spec.validate(&value)
            .map_err(|reason| ParseError::PredicateFailed {
                flag: spec.display_name(),
                reason,
            })?;

        // Repeated flags keep the last occurrence
        values.insert(spec.key(), value);
    }

    for spec in schema.flags() {
        if values.contains_key(&spec.key()) {
            continue;
        }
        if spec.is_required() {
            return Err(ParseError::MissingRequired {
                flag: spec.display_name(),
            });
        }
        if let Some(default) = spec.default() {
            values.insert(spec.key(), default.clone());
        } else if spec.kind() == FlagKind::Switch {
            values.insert(spec.key(), FlagValue::Bool(false));
        }
    }

    Ok(ParsedArgs { values })
}

fn convert(spec: &FlagSpec, literal: &str) -> Result<FlagValue, ParseError> {
    let invalid = |expected: String| ParseError::InvalidValue {
        flag: spec.display_name(),
        literal: literal.to_string(),
        expected,
    };

    match spec.kind() {
        FlagKind::Switch => Ok(FlagValue::Bool(true)),
        FlagKind::Str => Ok(FlagValue::Str(literal.to_string())),
        FlagKind::Int => literal
            .parse::<i64>()
            .map(FlagValue::Int)
            .map_err(|_| invalid("an integer".to_string())),
        FlagKind::Float => literal
            .parse::<f64>()
            .map(FlagValue::Float)
            .map_err(|_| invalid("a number".to_string())),
        FlagKind::Date => NaiveDate::parse_from_str(literal, "%Y-%m-%d")
            .map(FlagValue::Date)
            .map_err(|_| invalid("a date in YYYY-MM-DD form".to_string())),
        FlagKind::Choice(choices) => {
            if choices.contains(&literal) {
                Ok(FlagValue::Str(literal.to_string()))
            } else {
                Err(invalid(format!("one of {}", choices.join(", "))))
            }
        }
    }
}
