//! Core types for the market-analysis terminal
//!
//! This crate holds the side-effect-free building blocks of the terminal:
//!
//! - Flag specifications and typed flag values ([`flags`])
//! - The command-line argument parser and help renderer ([`args`])
//! - The shared session context mutated by command handlers ([`context`])
//!
//! Nothing in this crate performs I/O. The dispatch engine and the domain
//! menus build on these types from separate crates.

pub mod args;
pub mod context;
pub mod flags;

// Re-export main types for convenience
pub use args::{ParseError, ParsedArgs, parse};
pub use context::{ContextError, Interval, SessionContext};
pub use flags::{FlagKind, FlagSchema, FlagSpec, FlagValue};
