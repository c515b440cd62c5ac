//! Handler capability interface
//!
//! Every command is bound to one [`CommandHandler`]. Handlers receive the
//! parsed arguments and the mutable session context, and return either a
//! normal outcome (optionally requesting a submenu push) or a
//! [`HandlerError`]. Errors never cross this boundary unwrapped: the
//! dispatch loop catches them, reports them, and keeps the session alive.
//!
//! Handlers must not partially mutate the context: validate every
//! precondition and compute every new value first, then commit all
//! mutations at once.

use async_trait::async_trait;
use terminal_core::{ContextError, ParsedArgs, SessionContext};
use thiserror::Error;

/// Failure surfaced by a command handler
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A session precondition was not met (e.g. no ticker loaded)
    #[error("{0}")]
    Precondition(String),

    /// The external collaborator the handler called failed
    #[error("{0}")]
    Collaborator(String),
}

impl From<ContextError> for HandlerError {
    fn from(err: ContextError) -> Self {
        Self::Precondition(err.to_string())
    }
}

/// Normal completion of a command handler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerOutcome {
    message: Option<String>,
    enter_menu: Option<String>,
}

impl HandlerOutcome {
    /// Complete with no output
    pub fn silent() -> Self {
        Self::default()
    }

    /// Complete with user-visible text
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            enter_menu: None,
        }
    }

    /// Request a push into the named child menu
    pub fn enter(menu: impl Into<String>) -> Self {
        Self {
            message: None,
            enter_menu: Some(menu.into()),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn submenu(&self) -> Option<&str> {
        self.enter_menu.as_deref()
    }
}

/// The capability a command name is bound to
///
/// Implementations live in domain crates and are registered once at
/// startup. `Send + Sync` because descriptors are shared behind `Arc`s;
/// execution itself is strictly one command at a time.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Execute the command with validated arguments and the session context
    async fn run(
        &self,
        args: &ParsedArgs,
        ctx: &mut SessionContext,
    ) -> std::result::Result<HandlerOutcome, HandlerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_constructors() {
        let outcome = HandlerOutcome::message("done");
        assert_eq!(outcome.text(), Some("done"));
        assert_eq!(outcome.submenu(), None);

        let outcome = HandlerOutcome::enter("ta");
        assert_eq!(outcome.text(), None);
        assert_eq!(outcome.submenu(), Some("ta"));

        assert_eq!(HandlerOutcome::silent(), HandlerOutcome::default());
    }

    #[test]
    fn test_context_error_becomes_precondition() {
        let err: HandlerError = ContextError::TickerNotLoaded.into();
        assert!(matches!(err, HandlerError::Precondition(_)));
        assert!(err.to_string().contains("no ticker loaded"));
    }
}
