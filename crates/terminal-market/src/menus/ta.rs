//! Technical-analysis menu: sma, ema, rsi

use crate::menus::{tail, two_column_table};
use crate::provider::{Indicator, MarketDataProvider};
use async_trait::async_trait;
use std::sync::Arc;
use terminal_core::{FlagSchema, FlagSpec, FlagValue, ParsedArgs, SessionContext};
use terminal_engine::{
    CommandHandler, CommandSpec, HandlerError, HandlerOutcome, Result as EngineResult,
};

fn positive(value: &FlagValue) -> std::result::Result<(), String> {
    match value.as_i64() {
        Some(i) if i > 0 => Ok(()),
        _ => Err("must be a positive integer".to_string()),
    }
}

/// One handler covers all window-based indicators; the indicator itself is
/// fixed per registration.
struct IndicatorCommand {
    provider: Arc<dyn MarketDataProvider>,
    indicator: Indicator,
}

#[async_trait]
impl CommandHandler for IndicatorCommand {
    async fn run(
        &self,
        args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let ticker = ctx.require_ticker()?.to_string();
        let (start, end) = ctx
            .window()
            .unwrap_or_else(SessionContext::default_window);
        // The length flag always carries a default, so this cannot be None
        let length = args.get_i64("length").unwrap_or(14) as usize;

        let series = self
            .provider
            .indicator_series(&ticker, self.indicator, length, start, end)
            .await?;

        let rows: Vec<(String, String)> = tail(&series)
            .iter()
            .map(|(date, value)| (date.to_string(), format!("{value:.2}")))
            .collect();
        let latest = series
            .last()
            .map_or(String::new(), |(date, value)| {
                format!("\nlatest: {value:.2} on {date}")
            });
        Ok(HandlerOutcome::message(format!(
            "{}({length}) for {ticker}\n{}{latest}",
            self.indicator.label(),
            two_column_table(["date", self.indicator.label()], &rows),
        )))
    }
}

fn indicator_spec(
    provider: Arc<dyn MarketDataProvider>,
    indicator: Indicator,
    name: &'static str,
    summary: &'static str,
    default_length: i64,
) -> EngineResult<CommandSpec> {
    let schema = FlagSchema::new(name, summary).flag(
        FlagSpec::int('l', Some("length"), "Window length in trading days")
            .default_value(FlagValue::Int(default_length))
            .validator(positive),
    );
    CommandSpec::builder(
        schema,
        Arc::new(IndicatorCommand {
            provider,
            indicator,
        }),
    )
    .build()
}

/// `sma` command spec
pub fn sma_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    indicator_spec(provider, Indicator::Sma, "sma", "Simple moving average", 20)
}

/// `ema` command spec
pub fn ema_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    indicator_spec(
        provider,
        Indicator::Ema,
        "ema",
        "Exponential moving average",
        20,
    )
}

/// `rsi` command spec
pub fn rsi_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    indicator_spec(
        provider,
        Indicator::Rsi,
        "rsi",
        "Relative strength index",
        14,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleDataProvider;
    use chrono::NaiveDate;
    use terminal_core::{Interval, ParseError, parse};

    fn provider() -> Arc<dyn MarketDataProvider> {
        Arc::new(SampleDataProvider::new())
    }

    fn loaded_ctx() -> SessionContext {
        let mut ctx = SessionContext::new();
        ctx.load(
            "GME",
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            Interval::Daily,
        );
        ctx
    }

    #[tokio::test]
    async fn test_sma_with_explicit_length() {
        let spec = sma_spec(provider()).unwrap();
        let args = parse(spec.schema(), "-l 10").unwrap();
        let mut ctx = loaded_ctx();

        let outcome = spec.handler().run(&args, &mut ctx).await.unwrap();
        assert!(outcome.text().unwrap().contains("SMA(10) for GME"));
    }

    #[tokio::test]
    async fn test_sma_default_length() {
        let spec = sma_spec(provider()).unwrap();
        let args = parse(spec.schema(), "").unwrap();
        let mut ctx = loaded_ctx();

        let outcome = spec.handler().run(&args, &mut ctx).await.unwrap();
        assert!(outcome.text().unwrap().contains("SMA(20)"));
    }

    #[tokio::test]
    async fn test_sma_type_error_names_flag() {
        let spec = sma_spec(provider()).unwrap();
        let err = parse(spec.schema(), "-l abc").unwrap_err();
        match err {
            ParseError::InvalidValue { flag, literal, .. } => {
                assert_eq!(flag, "-l/--length");
                assert_eq!(literal, "abc");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_indicator_requires_ticker() {
        let spec = rsi_spec(provider()).unwrap();
        let args = parse(spec.schema(), "").unwrap();
        let mut ctx = SessionContext::new();
        let before = ctx.clone();

        let err = spec.handler().run(&args, &mut ctx).await.unwrap_err();
        assert!(err.to_string().contains("no ticker loaded"));
        assert_eq!(ctx, before);
    }
}
