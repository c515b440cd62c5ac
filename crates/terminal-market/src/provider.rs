//! Market data collaborator interface
//!
//! Handlers never reach the network themselves; every lookup goes through
//! [`MarketDataProvider`]. Provider failures surface as
//! [`HandlerError::Collaborator`] at the dispatch boundary, so a slow or
//! broken data source can fail a command but never the session.

use async_trait::async_trait;
use chrono::NaiveDate;
use terminal_core::Interval;
use terminal_engine::HandlerError;
use thiserror::Error;

/// Provider-side failures
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The symbol does not resolve to a tradable instrument
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    /// The coin id is not listed
    #[error("unknown coin '{0}'")]
    UnknownCoin(String),

    /// Data exists but not for the requested parameters
    #[error("no data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Anything else the upstream source reported
    #[error("{0}")]
    Other(String),
}

impl From<ProviderError> for HandlerError {
    fn from(err: ProviderError) -> Self {
        Self::Collaborator(err.to_string())
    }
}

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// One OHLCV bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Technical indicators exposed through the ta menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Sma,
    Ema,
    Rsi,
}

impl Indicator {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sma => "SMA",
            Self::Ema => "EMA",
            Self::Rsi => "RSI",
        }
    }
}

/// Financial statements exposed through the fa menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement {
    Overview,
    Income,
    Balance,
    CashFlow,
}

impl Statement {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Income => "Income statement",
            Self::Balance => "Balance sheet",
            Self::CashFlow => "Cash flow statement",
        }
    }
}

/// Screener views exposed through the ca menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Valuation,
    Financial,
    Ownership,
    Performance,
    Technical,
}

impl Screen {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Valuation => "Valuation",
            Self::Financial => "Financial",
            Self::Ownership => "Ownership",
            Self::Performance => "Performance",
            Self::Technical => "Technical",
        }
    }

    /// Column headers for this view, in render order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Valuation => &["P/E", "Fwd P/E", "P/S", "P/B"],
            Self::Financial => &["ROA", "ROE", "Profit margin", "Debt/Eq"],
            Self::Ownership => &["Insider own", "Inst own", "Float short", "Avg volume"],
            Self::Performance => &["Perf week", "Perf month", "Perf year", "Volatility"],
            Self::Technical => &["RSI", "SMA20 dist", "SMA50 dist", "Beta"],
        }
    }
}

/// External market-data collaborator
///
/// Analytic computation lives behind this trait, not in the terminal:
/// handlers pass parameters through and format what comes back.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Check that a ticker resolves before anything is loaded
    async fn validate_symbol(&self, symbol: &str) -> Result<()>;

    /// OHLCV bars over the window
    async fn ohlc(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<Candle>>;

    /// Indicator series over the window
    async fn indicator_series(
        &self,
        symbol: &str,
        indicator: Indicator,
        length: usize,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>>;

    /// Key/value rows for one financial statement
    async fn fundamentals(&self, symbol: &str, statement: Statement)
    -> Result<Vec<(String, String)>>;

    /// Tickers of comparable companies
    async fn similar_companies(&self, symbol: &str) -> Result<Vec<String>>;

    /// Pairwise close-price correlation, row/column order follows `symbols`
    async fn correlation_matrix(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Vec<f64>>>;

    /// Daily sentiment score in `[-1, 1]` over the last `days` days
    async fn sentiment_series(&self, symbol: &str, days: u32) -> Result<Vec<(NaiveDate, f64)>>;

    /// Pairwise sentiment correlation, row/column order follows `symbols`
    async fn sentiment_correlation(
        &self,
        symbols: &[String],
        days: u32,
    ) -> Result<Vec<Vec<f64>>>;

    /// One screener row for `symbol`, aligned with [`Screen::columns`]
    async fn screener_row(&self, symbol: &str, screen: Screen) -> Result<Vec<String>>;

    /// Check that a coin id is listed
    async fn validate_coin(&self, coin: &str) -> Result<()>;

    /// Daily close prices for a coin over the last `days` days
    async fn coin_prices(&self, coin: &str, days: u32) -> Result<Vec<(NaiveDate, f64)>>;
}
