//! Session context shared by every command handler
//!
//! One [`SessionContext`] lives for the whole terminal session. Handlers
//! read and write it in place; the dispatch loop owns it exclusively, so no
//! locking is involved. Handlers follow a validate-then-commit discipline:
//! all preconditions are checked and all new values computed before any
//! field is written, so a failing handler never leaves the context partially
//! updated.

use chrono::{Local, Months, NaiveDate};
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised by context accessors
#[derive(Debug, Error)]
pub enum ContextError {
    /// A command needing a loaded ticker ran before `load`
    #[error("no ticker loaded, use 'load -t <ticker>' first")]
    TickerNotLoaded,

    /// Sub-state (de)serialization failed
    #[error("sub-state error for key '{key}': {source}")]
    SubState {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolved data interval for the loaded window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
pub enum Interval {
    I1Min,
    I5Min,
    I15Min,
    I30Min,
    I60Min,
    #[default]
    Daily,
}

impl Interval {
    /// The accepted spellings, used as the `--interval` choice list
    pub const CHOICES: &'static [&'static str] =
        &["1min", "5min", "15min", "30min", "60min", "daily"];
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::I1Min => "1min",
            Self::I5Min => "5min",
            Self::I15Min => "15min",
            Self::I30Min => "30min",
            Self::I60Min => "60min",
            Self::Daily => "daily",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1min" => Ok(Self::I1Min),
            "5min" => Ok(Self::I5Min),
            "15min" => Ok(Self::I15Min),
            "30min" => Ok(Self::I30Min),
            "60min" => Ok(Self::I60Min),
            "daily" => Ok(Self::Daily),
            other => Err(format!("unknown interval '{other}'")),
        }
    }
}

/// Mutable state shared across all commands during one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    ticker: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    interval: Interval,
    sub_state: HashMap<String, serde_json::Value>,
}

impl SessionContext {
    /// Create a context with every field unset/default
    pub fn new() -> Self {
        Self::default()
    }

    /// The default date window: one year back from today
    pub fn default_window() -> (NaiveDate, NaiveDate) {
        let end = Local::now().date_naive();
        let start = end
            .checked_sub_months(Months::new(12))
            .unwrap_or(end);
        (start, end)
    }

    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    /// The loaded ticker, or a clear precondition error when unset
    pub fn require_ticker(&self) -> Result<&str, ContextError> {
        self.ticker.as_deref().ok_or(ContextError::TickerNotLoaded)
    }

    pub fn window(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Interval) {
        self.interval = interval;
    }

    pub fn set_window(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start = Some(start);
        self.end = Some(end);
    }

    /// Commit a newly loaded ticker, window and interval in one step
    pub fn load(
        &mut self,
        ticker: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) {
        self.ticker = Some(ticker.into());
        self.start = Some(start);
        self.end = Some(end);
        self.interval = interval;
    }

    /// Return every field to its unset/default state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Store a typed value in the per-domain sub-state
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), ContextError> {
        let key = key.into();
        let json = serde_json::to_value(value).map_err(|source| ContextError::SubState {
            key: key.clone(),
            source,
        })?;
        self.sub_state.insert(key, json);
        Ok(())
    }

    /// Read a typed value back from the per-domain sub-state
    pub fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.sub_state
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.sub_state.remove(key).is_some()
    }

    /// One-line status fragment for the prompt/banner, e.g. `GME (daily)`
    pub fn status_line(&self) -> Option<String> {
        let ticker = self.ticker.as_deref()?;
        match self.window() {
            Some((start, end)) => Some(format!(
                "{ticker} ({}) from {start} to {end}",
                self.interval
            )),
            None => Some(format!("{ticker} ({})", self.interval)),
        }
    }
}
