//! Session and command-dispatch engine
//!
//! This crate is the navigable heart of the terminal:
//!
//! - [`registry`]: per-menu command tables with aliases and flag schemas
//! - [`menu`]: the statically constructed menu tree and the navigation stack
//! - [`handler`]: the capability interface domain commands implement
//! - [`dispatch`]: the single-threaded dispatch loop state machine
//! - [`config`]: presentation knobs for the interactive front end
//!
//! The engine knows nothing about market data. Domain crates register
//! handlers at startup and the dispatcher invokes them with parsed,
//! validated arguments and the shared session context.
//!
//! # Example
//!
//! ```rust,ignore
//! use terminal_engine::{Dispatcher, TerminalConfig};
//!
//! let tree = build_menu_tree(provider)?;
//! let mut dispatcher = Dispatcher::new(tree, TerminalConfig::default());
//! let reply = dispatcher.dispatch_line("load -t GME").await;
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod menu;
pub mod registry;

// Re-export main types for convenience
pub use config::TerminalConfig;
pub use dispatch::{DispatchReply, Dispatcher, LoopState};
pub use error::{EngineError, Result};
pub use handler::{CommandHandler, HandlerError, HandlerOutcome};
pub use menu::{Menu, MenuId, MenuStack, MenuTree};
pub use registry::{CommandRegistry, CommandSpec};
