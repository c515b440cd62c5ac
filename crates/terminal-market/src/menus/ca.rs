//! Comparison-analysis menu: get, select, historical, hcorr, sentiment,
//! scorr and the screener views (valuation, financial, ownership,
//! performance, technical)
//!
//! The selected similar-company list lives in session sub-state under
//! [`keys::SIMILAR`], so it survives navigating out of and back into this
//! menu.

use crate::keys;
use crate::menus::two_column_table;
use crate::provider::{MarketDataProvider, Screen};
use async_trait::async_trait;
use comfy_table::{Table, presets};
use std::sync::Arc;
use terminal_core::{FlagSchema, FlagSpec, FlagValue, ParsedArgs, SessionContext};
use terminal_engine::{
    CommandHandler, CommandSpec, HandlerError, HandlerOutcome, Result as EngineResult,
};

/// Hard cap on the comparison set, mirroring the data sources' limits
const MAX_SIMILAR: usize = 10;

/// Upper bound on the sentiment lookback window
const MAX_SENTIMENT_DAYS: i64 = 365;

fn sentiment_days(value: &FlagValue) -> std::result::Result<(), String> {
    match value.as_i64() {
        Some(i) if (1..=MAX_SENTIMENT_DAYS).contains(&i) => Ok(()),
        _ => Err(format!("must be between 1 and {MAX_SENTIMENT_DAYS}")),
    }
}

fn similar_of(ctx: &SessionContext) -> std::result::Result<Vec<String>, HandlerError> {
    ctx.get_typed::<Vec<String>>(keys::SIMILAR)
        .filter(|list| !list.is_empty())
        .ok_or_else(|| {
            HandlerError::Precondition(
                "no similar companies selected, run 'get' or 'select' first".to_string(),
            )
        })
}

struct GetSimilarCommand {
    provider: Arc<dyn MarketDataProvider>,
}

#[async_trait]
impl CommandHandler for GetSimilarCommand {
    async fn run(
        &self,
        _args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let ticker = ctx.require_ticker()?.to_string();
        let mut similar = self.provider.similar_companies(&ticker).await?;
        similar.retain(|s| s != &ticker);
        similar.sort();
        similar.dedup();

        let capped = similar.len() > MAX_SIMILAR;
        similar.truncate(MAX_SIMILAR);

        ctx.insert_typed(keys::SIMILAR, &similar)?;
        let note = if capped {
            format!(" (capped at {MAX_SIMILAR})")
        } else {
            String::new()
        };
        Ok(HandlerOutcome::message(format!(
            "Similar to {ticker}{note}: {}",
            similar.join(", ")
        )))
    }
}

/// `get` command spec
pub fn get_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    let schema = FlagSchema::new("get", "Fetch similar companies from the data source");
    CommandSpec::builder(schema, Arc::new(GetSimilarCommand { provider })).build()
}

struct SelectCommand;

#[async_trait]
impl CommandHandler for SelectCommand {
    async fn run(
        &self,
        args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let raw = args.get_str("similar").unwrap_or_default();
        let mut similar: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        // Sort first so dedup catches non-adjacent repeats
        similar.sort();
        similar.dedup();

        if similar.is_empty() {
            return Err(HandlerError::Precondition(
                "no tickers given, e.g. select -s AMC,BB,KOSS".to_string(),
            ));
        }
        similar.truncate(MAX_SIMILAR);

        ctx.insert_typed(keys::SIMILAR, &similar)?;
        Ok(HandlerOutcome::message(format!(
            "Selected: {}",
            similar.join(", ")
        )))
    }
}

/// `select` command spec
pub fn select_spec() -> EngineResult<CommandSpec> {
    let schema = FlagSchema::new("select", "Select similar companies by hand").flag(
        FlagSpec::string(
            's',
            Some("similar"),
            "Comma-separated tickers, e.g. AMC,BB,KOSS",
        )
        .required(),
    );
    CommandSpec::builder(schema, Arc::new(SelectCommand)).build()
}

struct HistoricalCommand {
    provider: Arc<dyn MarketDataProvider>,
}

#[async_trait]
impl CommandHandler for HistoricalCommand {
    async fn run(
        &self,
        _args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let ticker = ctx.require_ticker()?.to_string();
        let similar = similar_of(ctx)?;
        let (start, end) = ctx
            .window()
            .unwrap_or_else(SessionContext::default_window);

        let mut rows = Vec::with_capacity(similar.len() + 1);
        for symbol in std::iter::once(&ticker).chain(similar.iter()) {
            let candles = self
                .provider
                .ohlc(symbol, start, end, ctx.interval())
                .await?;
            let (first, last) = match (candles.first(), candles.last()) {
                (Some(f), Some(l)) => (f.close, l.close),
                _ => continue,
            };
            let change = (last / first - 1.0) * 100.0;
            rows.push((symbol.clone(), format!("{first:.2} -> {last:.2} ({change:+.1}%)")));
        }

        Ok(HandlerOutcome::message(format!(
            "Price comparison {start} to {end}\n{}",
            two_column_table(["ticker", "close (change)"], &rows),
        )))
    }
}

/// `historical` command spec
pub fn historical_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    let schema = FlagSchema::new(
        "historical",
        "Compare price history against the similar list",
    );
    CommandSpec::builder(schema, Arc::new(HistoricalCommand { provider })).build()
}

fn correlation_table(symbols: &[String], matrix: &[Vec<f64>]) -> String {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    let mut header = vec![String::new()];
    header.extend(symbols.iter().cloned());
    table.set_header(header);
    for (symbol, row) in symbols.iter().zip(matrix.iter()) {
        let mut cells = vec![symbol.clone()];
        cells.extend(row.iter().map(|v| format!("{v:.2}")));
        table.add_row(cells);
    }
    table.to_string()
}

struct HcorrCommand {
    provider: Arc<dyn MarketDataProvider>,
}

#[async_trait]
impl CommandHandler for HcorrCommand {
    async fn run(
        &self,
        _args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let ticker = ctx.require_ticker()?.to_string();
        let similar = similar_of(ctx)?;
        let (start, end) = ctx
            .window()
            .unwrap_or_else(SessionContext::default_window);

        let mut symbols = vec![ticker];
        symbols.extend(similar);
        let matrix = self
            .provider
            .correlation_matrix(&symbols, start, end)
            .await?;

        Ok(HandlerOutcome::message(format!(
            "Close-price correlation {start} to {end}\n{}",
            correlation_table(&symbols, &matrix)
        )))
    }
}

/// `hcorr` command spec
pub fn hcorr_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    let schema = FlagSchema::new("hcorr", "Correlation matrix against the similar list");
    CommandSpec::builder(schema, Arc::new(HcorrCommand { provider })).build()
}

struct SentimentCommand {
    provider: Arc<dyn MarketDataProvider>,
}

#[async_trait]
impl CommandHandler for SentimentCommand {
    async fn run(
        &self,
        args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let ticker = ctx.require_ticker()?.to_string();
        let similar = similar_of(ctx)?;
        let days = u32::try_from(args.get_i64("days").unwrap_or(10)).map_err(|_| {
            HandlerError::Precondition(format!("days must be between 1 and {MAX_SENTIMENT_DAYS}"))
        })?;

        let mut rows = Vec::with_capacity(similar.len() + 1);
        for symbol in std::iter::once(&ticker).chain(similar.iter()) {
            let series = self.provider.sentiment_series(symbol, days).await?;
            if series.is_empty() {
                continue;
            }
            let avg = series.iter().map(|(_, s)| s).sum::<f64>() / series.len() as f64;
            let (date, latest) = series[series.len() - 1];
            rows.push((
                symbol.clone(),
                format!("avg {avg:+.2}, latest {latest:+.2} on {date}"),
            ));
        }

        Ok(HandlerOutcome::message(format!(
            "Sentiment over the last {days} days\n{}",
            two_column_table(["ticker", "sentiment"], &rows),
        )))
    }
}

/// `sentiment` command spec
pub fn sentiment_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    let schema = FlagSchema::new("sentiment", "Sentiment scores against the similar list").flag(
        FlagSpec::int('d', Some("days"), "Days of sentiment history")
            .default_value(FlagValue::Int(10))
            .validator(sentiment_days),
    );
    CommandSpec::builder(schema, Arc::new(SentimentCommand { provider })).build()
}

struct ScorrCommand {
    provider: Arc<dyn MarketDataProvider>,
}

#[async_trait]
impl CommandHandler for ScorrCommand {
    async fn run(
        &self,
        args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let ticker = ctx.require_ticker()?.to_string();
        let similar = similar_of(ctx)?;
        let days = u32::try_from(args.get_i64("days").unwrap_or(10)).map_err(|_| {
            HandlerError::Precondition(format!("days must be between 1 and {MAX_SENTIMENT_DAYS}"))
        })?;

        let mut symbols = vec![ticker];
        symbols.extend(similar);
        let matrix = self.provider.sentiment_correlation(&symbols, days).await?;

        Ok(HandlerOutcome::message(format!(
            "Sentiment correlation over the last {days} days\n{}",
            correlation_table(&symbols, &matrix)
        )))
    }
}

/// `scorr` command spec
pub fn scorr_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    let schema = FlagSchema::new("scorr", "Sentiment correlation against the similar list").flag(
        FlagSpec::int('d', Some("days"), "Days of sentiment history")
            .default_value(FlagValue::Int(10))
            .validator(sentiment_days),
    );
    CommandSpec::builder(schema, Arc::new(ScorrCommand { provider })).build()
}

/// One handler covers all screener views; the view is fixed per
/// registration.
struct ScreenerCommand {
    provider: Arc<dyn MarketDataProvider>,
    screen: Screen,
}

#[async_trait]
impl CommandHandler for ScreenerCommand {
    async fn run(
        &self,
        _args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let ticker = ctx.require_ticker()?.to_string();
        let similar = similar_of(ctx)?;

        let mut table = Table::new();
        table.load_preset(presets::UTF8_BORDERS_ONLY);
        let mut header = vec!["ticker".to_string()];
        header.extend(self.screen.columns().iter().map(ToString::to_string));
        table.set_header(header);
        for symbol in std::iter::once(&ticker).chain(similar.iter()) {
            let row = self.provider.screener_row(symbol, self.screen).await?;
            let mut cells = vec![symbol.clone()];
            cells.extend(row);
            table.add_row(cells);
        }

        Ok(HandlerOutcome::message(format!(
            "{} screen\n{table}",
            self.screen.label()
        )))
    }
}

fn screen_spec(
    provider: Arc<dyn MarketDataProvider>,
    screen: Screen,
    name: &'static str,
    summary: &'static str,
) -> EngineResult<CommandSpec> {
    CommandSpec::builder(
        FlagSchema::new(name, summary),
        Arc::new(ScreenerCommand { provider, screen }),
    )
    .build()
}

/// `valuation` command spec
pub fn valuation_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    screen_spec(
        provider,
        Screen::Valuation,
        "valuation",
        "Valuation screen for the comparison set",
    )
}

/// `financial` command spec
pub fn financial_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    screen_spec(
        provider,
        Screen::Financial,
        "financial",
        "Financial screen for the comparison set",
    )
}

/// `ownership` command spec
pub fn ownership_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    screen_spec(
        provider,
        Screen::Ownership,
        "ownership",
        "Ownership screen for the comparison set",
    )
}

/// `performance` command spec
pub fn performance_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    screen_spec(
        provider,
        Screen::Performance,
        "performance",
        "Performance screen for the comparison set",
    )
}

/// `technical` command spec
pub fn technical_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    screen_spec(
        provider,
        Screen::Technical,
        "technical",
        "Technical screen for the comparison set",
    )
}
