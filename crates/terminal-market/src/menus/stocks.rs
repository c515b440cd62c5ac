//! Root (stocks) menu: load, view, reset

use crate::menus::{tail, two_column_table};
use crate::provider::MarketDataProvider;
use async_trait::async_trait;
use comfy_table::{Table, presets};
use std::sync::Arc;
use terminal_core::{FlagSchema, FlagSpec, FlagValue, Interval, ParsedArgs, SessionContext};
use terminal_engine::{
    CommandHandler, CommandSpec, HandlerError, HandlerOutcome, Result as EngineResult,
};

struct LoadCommand {
    provider: Arc<dyn MarketDataProvider>,
}

#[async_trait]
impl CommandHandler for LoadCommand {
    async fn run(
        &self,
        args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let ticker = args
            .get_str("ticker")
            .unwrap_or_default()
            .to_ascii_uppercase();
        let (default_start, default_end) = SessionContext::default_window();
        let start = args.get_date("start").unwrap_or(default_start);
        let end = args.get_date("end").unwrap_or(default_end);
        let interval: Interval = args
            .get_str("interval")
            .unwrap_or("daily")
            .parse()
            .map_err(HandlerError::Precondition)?;

        if start > end {
            return Err(HandlerError::Precondition(format!(
                "start date {start} is after end date {end}"
            )));
        }

        // Validate against the data source before touching the context
        self.provider.validate_symbol(&ticker).await?;

        ctx.load(&ticker, start, end, interval);
        Ok(HandlerOutcome::message(format!(
            "Loaded {ticker} from {start} to {end} ({interval})"
        )))
    }
}

/// `load` command spec
pub fn load_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    let schema = FlagSchema::new("load", "Load a ticker and date window into the session")
        .flag(FlagSpec::string('t', Some("ticker"), "Ticker to load").required())
        .flag(FlagSpec::date('s', Some("start"), "Window start (default: one year ago)"))
        .flag(FlagSpec::date('e', Some("end"), "Window end (default: today)"))
        .flag(
            FlagSpec::choice('i', Some("interval"), Interval::CHOICES, "Data interval")
                .default_value(FlagValue::Str("daily".to_string())),
        );
    CommandSpec::builder(schema, Arc::new(LoadCommand { provider }))
        .alias("l")
        .help_body(
            "Validates the ticker against the data source, then commits the\n\
             ticker, window and interval to the session in one step.",
        )
        .build()
}

struct ViewCommand {
    provider: Arc<dyn MarketDataProvider>,
}

#[async_trait]
impl CommandHandler for ViewCommand {
    async fn run(
        &self,
        _args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let ticker = ctx.require_ticker()?.to_string();
        let (start, end) = ctx
            .window()
            .unwrap_or_else(SessionContext::default_window);

        let candles = self
            .provider
            .ohlc(&ticker, start, end, ctx.interval())
            .await?;

        let mut table = Table::new();
        table.load_preset(presets::UTF8_BORDERS_ONLY);
        table.set_header(vec!["date", "open", "high", "low", "close", "volume"]);
        for candle in tail(&candles) {
            table.add_row(vec![
                candle.date.to_string(),
                format!("{:.2}", candle.open),
                format!("{:.2}", candle.high),
                format!("{:.2}", candle.low),
                format!("{:.2}", candle.close),
                candle.volume.to_string(),
            ]);
        }
        Ok(HandlerOutcome::message(format!(
            "{ticker} ({} bars, showing last {})\n{table}",
            candles.len(),
            tail(&candles).len(),
        )))
    }
}

/// `view` command spec
pub fn view_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    let schema = FlagSchema::new("view", "Show OHLC data for the loaded ticker");
    CommandSpec::builder(schema, Arc::new(ViewCommand { provider })).build()
}

struct ResetCommand;

#[async_trait]
impl CommandHandler for ResetCommand {
    async fn run(
        &self,
        _args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        ctx.reset();
        Ok(HandlerOutcome::message("Session reset."))
    }
}

/// `reset` command spec
pub fn reset_spec() -> EngineResult<CommandSpec> {
    let schema = FlagSchema::new("reset", "Clear the loaded ticker, window and sub-state");
    CommandSpec::builder(schema, Arc::new(ResetCommand)).build()
}

/// Quick status readout, useful after navigating around
struct StatusCommand;

#[async_trait]
impl CommandHandler for StatusCommand {
    async fn run(
        &self,
        _args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let rows = vec![
            (
                "ticker".to_string(),
                ctx.ticker().unwrap_or("(not loaded)").to_string(),
            ),
            (
                "window".to_string(),
                ctx.window()
                    .map_or("(default)".to_string(), |(s, e)| format!("{s} to {e}")),
            ),
            ("interval".to_string(), ctx.interval().to_string()),
        ];
        Ok(HandlerOutcome::message(two_column_table(
            ["field", "value"],
            &rows,
        )))
    }
}

/// `status` command spec
pub fn status_spec() -> EngineResult<CommandSpec> {
    let schema = FlagSchema::new("status", "Show the current session state");
    CommandSpec::builder(schema, Arc::new(StatusCommand)).build()
}
