//! Fundamental-analysis menu: overview, income, balance, cashflow

use crate::menus::two_column_table;
use crate::provider::{MarketDataProvider, Statement};
use async_trait::async_trait;
use std::sync::Arc;
use terminal_core::{FlagSchema, ParsedArgs, SessionContext};
use terminal_engine::{
    CommandHandler, CommandSpec, HandlerError, HandlerOutcome, Result as EngineResult,
};

struct StatementCommand {
    provider: Arc<dyn MarketDataProvider>,
    statement: Statement,
}

#[async_trait]
impl CommandHandler for StatementCommand {
    async fn run(
        &self,
        _args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        let ticker = ctx.require_ticker()?.to_string();
        let rows = self.provider.fundamentals(&ticker, self.statement).await?;
        Ok(HandlerOutcome::message(format!(
            "{} for {ticker}\n{}",
            self.statement.label(),
            two_column_table(["field", "value"], &rows),
        )))
    }
}

fn statement_spec(
    provider: Arc<dyn MarketDataProvider>,
    statement: Statement,
    name: &'static str,
    summary: &'static str,
) -> EngineResult<CommandSpec> {
    CommandSpec::builder(
        FlagSchema::new(name, summary),
        Arc::new(StatementCommand {
            provider,
            statement,
        }),
    )
    .build()
}

/// `overview` command spec
pub fn overview_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    statement_spec(
        provider,
        Statement::Overview,
        "overview",
        "Company overview and key ratios",
    )
}

/// `income` command spec
pub fn income_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    statement_spec(provider, Statement::Income, "income", "Income statement")
}

/// `balance` command spec
pub fn balance_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    statement_spec(provider, Statement::Balance, "balance", "Balance sheet")
}

/// `cashflow` command spec
pub fn cashflow_spec(provider: Arc<dyn MarketDataProvider>) -> EngineResult<CommandSpec> {
    statement_spec(
        provider,
        Statement::CashFlow,
        "cashflow",
        "Cash flow statement",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleDataProvider;
    use terminal_core::{Interval, parse};

    #[tokio::test]
    async fn test_overview_renders_rows() {
        let spec = overview_spec(Arc::new(SampleDataProvider::new())).unwrap();
        let args = parse(spec.schema(), "").unwrap();
        let mut ctx = SessionContext::new();
        let (start, end) = SessionContext::default_window();
        ctx.load("GME", start, end, Interval::Daily);

        let outcome = spec.handler().run(&args, &mut ctx).await.unwrap();
        let text = outcome.text().unwrap();
        assert!(text.contains("Overview for GME"));
        assert!(text.contains("P/E"));
    }

    #[tokio::test]
    async fn test_statement_requires_ticker() {
        let spec = income_spec(Arc::new(SampleDataProvider::new())).unwrap();
        let args = parse(spec.schema(), "").unwrap();
        let mut ctx = SessionContext::new();

        let err = spec.handler().run(&args, &mut ctx).await.unwrap_err();
        assert!(matches!(err, HandlerError::Precondition(_)));
    }
}
