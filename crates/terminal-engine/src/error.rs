//! Error types for the dispatch engine

use thiserror::Error;

/// Engine construction and lookup errors
///
/// Registration errors surface at startup while the menu tree is being
/// wired; they never occur mid-session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A command with this name is already registered in the menu
    #[error("command '{0}' is already registered in this menu")]
    DuplicateCommand(String),

    /// An alias collides with an existing name or alias in the menu
    #[error("alias '{alias}' on command '{command}' collides with an existing registration")]
    DuplicateAlias { command: String, alias: String },

    /// The name or alias is a reserved navigation word
    #[error("'{0}' is a reserved navigation word and cannot name a command")]
    ReservedWord(String),

    /// A flag key appears twice within one command's schema
    #[error("flag '{flag}' is declared twice on command '{command}'")]
    DuplicateFlag { command: String, flag: String },

    /// A menu already has a child with this name
    #[error("menu '{menu}' already has a submenu named '{child}'")]
    DuplicateMenu { menu: String, child: String },

    /// A handler asked to enter a submenu the tree does not know
    #[error("unknown submenu '{0}'")]
    UnknownMenu(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
