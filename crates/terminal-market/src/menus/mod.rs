//! Command handlers per menu
//!
//! Each submodule owns the handlers and command specs of one menu. Handlers
//! follow the validate-then-commit discipline: every provider call and every
//! argument check happens before the first context write.

pub mod ca;
pub mod crypto;
pub mod fa;
pub mod stocks;
pub mod ta;

use async_trait::async_trait;
use comfy_table::{Table, presets};
use std::sync::Arc;
use terminal_core::{FlagSchema, ParsedArgs, SessionContext};
use terminal_engine::{
    CommandHandler, CommandSpec, HandlerError, HandlerOutcome, Result as EngineResult,
};

/// Rows shown by table-producing commands before truncation
pub(crate) const MAX_TABLE_ROWS: usize = 12;

/// Handler that enters a statically registered submenu
struct EnterMenu {
    target: &'static str,
}

#[async_trait]
impl CommandHandler for EnterMenu {
    async fn run(
        &self,
        _args: &ParsedArgs,
        _ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError> {
        Ok(HandlerOutcome::enter(self.target))
    }
}

/// Spec for a submenu-entry command (`ta`, `fa`, `ca`, `crypto`)
pub(crate) fn enter_spec(target: &'static str, summary: &'static str) -> EngineResult<CommandSpec> {
    CommandSpec::builder(FlagSchema::new(target, summary), Arc::new(EnterMenu { target })).build()
}

/// Render a headed two-column table
pub(crate) fn two_column_table(header: [&str; 2], rows: &[(String, String)]) -> String {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_header(vec![header[0], header[1]]);
    for (key, value) in rows {
        table.add_row(vec![key.clone(), value.clone()]);
    }
    table.to_string()
}

/// Keep only the most recent `MAX_TABLE_ROWS` entries of a series
pub(crate) fn tail<T>(rows: &[T]) -> &[T] {
    let skip = rows.len().saturating_sub(MAX_TABLE_ROWS);
    &rows[skip..]
}
