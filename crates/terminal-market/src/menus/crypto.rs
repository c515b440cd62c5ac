//! Crypto menu: load, chart
//!
//! The loaded coin id lives in session sub-state under [`keys::COIN`],
//! separate from the equity ticker, so switching menus never clobbers the
//! stock session.

use crate::keys;
use crate::menus::{tail, two_column_table};
use crate::provider::MarketDataProvider;
use async_trait::async_trait;
use std::sync::Arc;
use terminal_core::{FlagSchema, FlagSpec, FlagValue, ParsedArgs, SessionContext};
use terminal_engine::{
    CommandHandler, CommandSpec, HandlerError, HandlerOutcome, Result as EngineResult,
};

/// Upper bound on chart history, roughly ten years of daily prices
const MAX_CHART_DAYS: i64 = 3650;

fn days_in_range(value: &FlagValue) -> std::result::Result<(), String> {
    match value.as_i64() {
        Some(i) if (1..=MAX_CHART_DAYS).contains(&i) => Ok(()),
        _ => Err(format!("must be between 1 and {MAX_CHART_DAYS}")),
    }
}

struct CoinLoadCommand {
    provider: Arc<dyn MarketDataProvider>,
}

#[async_trait]
impl CommandHandler for CoinLoadCommand {
    async fn run(
        &self,
        args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let coin = args
            .get_str("coin")
            .unwrap_or_default()
            .to_ascii_lowercase();
        self.provider.validate_coin(&coin).await?;
        ctx.insert_typed(keys::COIN, &coin)?;
        Ok(HandlerOutcome::message(format!("Loaded coin {coin}")))
    }
}

/// `load` command spec for the crypto menu
pub fn load_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    let schema = FlagSchema::new("load", "Load a coin into the session")
        .flag(FlagSpec::string('c', Some("coin"), "Coin id, e.g. bitcoin").required());
    CommandSpec::builder(schema, Arc::new(CoinLoadCommand { provider })).build()
}

struct ChartCommand {
    provider: Arc<dyn MarketDataProvider>,
}

#[async_trait]
impl CommandHandler for ChartCommand {
    async fn run(
        &self,
        args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let coin: String = ctx.get_typed(keys::COIN).ok_or_else(|| {
            HandlerError::Precondition("no coin loaded, use 'load -c <coin>' first".to_string())
        })?;
        let days = u32::try_from(args.get_i64("days").unwrap_or(30)).map_err(|_| {
            HandlerError::Precondition(format!("days must be between 1 and {MAX_CHART_DAYS}"))
        })?;

        let prices = self.provider.coin_prices(&coin, days).await?;
        let rows: Vec<(String, String)> = tail(&prices)
            .iter()
            .map(|(date, price)| (date.to_string(), format!("{price:.2}")))
            .collect();

        let (min, max) = prices.iter().fold((f64::MAX, f64::MIN), |(lo, hi), (_, p)| {
            (lo.min(*p), hi.max(*p))
        });
        Ok(HandlerOutcome::message(format!(
            "{coin} over {days} days (min {min:.2}, max {max:.2})\n{}",
            two_column_table(["date", "price"], &rows),
        )))
    }
}

/// `chart` command spec
pub fn chart_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    let schema = FlagSchema::new("chart", "Price history for the loaded coin").flag(
        FlagSpec::int('d', Some("days"), "Days of history")
            .default_value(FlagValue::Int(30))
            .validator(days_in_range),
    );
    CommandSpec::builder(schema, Arc::new(ChartCommand { provider })).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleDataProvider;
    use terminal_core::parse;

    fn provider() -> Arc<dyn MarketDataProvider> {
        Arc::new(SampleDataProvider::new())
    }

    #[tokio::test]
    async fn test_load_known_coin() {
        let spec = load_spec(provider()).unwrap();
        let args = parse(spec.schema(), "-c Bitcoin").unwrap();
        let mut ctx = SessionContext::new();

        spec.handler().run(&args, &mut ctx).await.unwrap();
        assert_eq!(
            ctx.get_typed::<String>(keys::COIN).as_deref(),
            Some("bitcoin")
        );
    }

    #[tokio::test]
    async fn test_load_unknown_coin_leaves_context() {
        let spec = load_spec(provider()).unwrap();
        let args = parse(spec.schema(), "-c beaniecoin").unwrap();
        let mut ctx = SessionContext::new();
        let before = ctx.clone();

        let err = spec.handler().run(&args, &mut ctx).await.unwrap_err();
        assert!(matches!(err, HandlerError::Collaborator(_)));
        assert_eq!(ctx, before);
    }

    #[tokio::test]
    async fn test_chart_requires_loaded_coin() {
        let spec = chart_spec(provider()).unwrap();
        let args = parse(spec.schema(), "").unwrap();
        let mut ctx = SessionContext::new();

        let err = spec.handler().run(&args, &mut ctx).await.unwrap_err();
        assert!(err.to_string().contains("no coin loaded"));
    }

    #[tokio::test]
    async fn test_chart_rejects_out_of_range_days() {
        let spec = chart_spec(provider()).unwrap();

        // A value past u32::MAX must fail at parse time, not wrap around
        let err = parse(spec.schema(), "-d 4294967303").unwrap_err();
        match err {
            terminal_core::ParseError::PredicateFailed { flag, reason } => {
                assert_eq!(flag, "-d/--days");
                assert!(reason.contains("3650"));
            }
            other => panic!("expected PredicateFailed, got {other:?}"),
        }

        assert!(parse(spec.schema(), "-d 1000000000").is_err());
        assert!(parse(spec.schema(), "-d 0").is_err());
        assert!(parse(spec.schema(), "-d 3650").is_ok());
    }

    #[tokio::test]
    async fn test_chart_renders_prices() {
        let mut ctx = SessionContext::new();
        ctx.insert_typed(keys::COIN, &"bitcoin".to_string()).unwrap();

        let spec = chart_spec(provider()).unwrap();
        let args = parse(spec.schema(), "-d 10").unwrap();
        let outcome = spec.handler().run(&args, &mut ctx).await.unwrap();
        let text = outcome.text().unwrap();
        assert!(text.contains("bitcoin over 10 days"));
        assert!(text.contains("price"));
    }
}
