//! Market domain menus for the analysis terminal
//!
//! This crate supplies everything the dispatch engine needs to become a
//! market terminal:
//!
//! - [`provider`]: the `MarketDataProvider` collaborator trait all handlers
//!   call through, plus the data types it returns
//! - [`sample`]: a deterministic offline provider so the terminal runs with
//!   no network access or API keys
//! - [`menus`]: the command handlers per menu (stocks root, technical
//!   analysis, fundamentals, comparison analysis, crypto)
//! - [`tree`]: wiring of the full menu tree at startup
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use terminal_engine::{Dispatcher, TerminalConfig};
//! use terminal_market::{sample::SampleDataProvider, tree::build_menu_tree};
//!
//! let provider = Arc::new(SampleDataProvider::new());
//! let tree = build_menu_tree(provider)?;
//! let mut dispatcher = Dispatcher::new(tree, TerminalConfig::default());
//! ```

pub mod menus;
pub mod provider;
pub mod sample;
pub mod tree;

// Re-export main types for convenience
pub use provider::{Candle, Indicator, MarketDataProvider, ProviderError, Screen, Statement};
pub use sample::SampleDataProvider;
pub use tree::build_menu_tree;

/// Well-known session sub-state keys used by the domain menus
pub mod keys {
    /// Similar-company list selected in the comparison menu
    pub const SIMILAR: &str = "ca.similar";
    /// Coin id loaded in the crypto menu
    pub const COIN: &str = "crypto.coin";
}
