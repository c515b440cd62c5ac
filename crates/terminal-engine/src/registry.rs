//! Per-menu command registry
//!
//! Each menu owns one [`CommandRegistry`]: an ordered table of
//! [`CommandSpec`]s. Registration happens once at startup and fails fast on
//! duplicate names, duplicate aliases, duplicate flag keys, or collisions
//! with the reserved navigation words; lookups at runtime can therefore
//! never be ambiguous.

use crate::error::{EngineError, Result};
use crate::handler::CommandHandler;
use std::sync::Arc;
use terminal_core::FlagSchema;

/// Navigation words resolved by the dispatch loop before any registry
/// lookup. No command name or alias may shadow them.
pub const RESERVED_WORDS: &[&str] = &["home", "up", "q", "..", "quit", "exit", "help", "?"];

/// Static description of one registered command
#[derive(Clone)]
pub struct CommandSpec {
    aliases: Vec<String>,
    schema: FlagSchema,
    help_body: String,
    handler: Arc<dyn CommandHandler>,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("aliases", &self.aliases)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl CommandSpec {
    /// Create a builder for a command named after its schema
    pub fn builder(schema: FlagSchema, handler: Arc<dyn CommandHandler>) -> CommandSpecBuilder {
        CommandSpecBuilder {
            aliases: Vec::new(),
            help_body: None,
            schema,
            handler,
        }
    }

    pub fn name(&self) -> &str {
        self.schema.name()
    }

    pub fn summary(&self) -> &str {
        self.schema.summary()
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn schema(&self) -> &FlagSchema {
        &self.schema
    }

    pub fn handler(&self) -> &Arc<dyn CommandHandler> {
        &self.handler
    }

    /// Full help: the schema-rendered flag table plus the detailed body
    pub fn render_help(&self) -> String {
        if self.help_body.is_empty() {
            self.schema.render_help()
        } else {
            format!("{}\n{}\n", self.schema.render_help(), self.help_body)
        }
    }

    fn answers_to(&self, token: &str) -> bool {
        self.name().eq_ignore_ascii_case(token)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(token))
    }
}

/// Builder for [`CommandSpec`]
pub struct CommandSpecBuilder {
    aliases: Vec<String>,
    help_body: Option<String>,
    schema: FlagSchema,
    handler: Arc<dyn CommandHandler>,
}

impl CommandSpecBuilder {
    /// Add an alias for the canonical name
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the detailed help body shown under the flag table
    pub fn help_body(mut self, body: impl Into<String>) -> Self {
        self.help_body = Some(body.into());
        self
    }

    /// Finish the spec, checking the flag-uniqueness invariant
    pub fn build(self) -> Result<CommandSpec> {
        let name = self.schema.name().to_string();
        if let Some(flag) = self.schema.duplicate_key() {
            return Err(EngineError::DuplicateFlag {
                command: name,
                flag,
            });
        }
        Ok(CommandSpec {
            aliases: self.aliases,
            schema: self.schema,
            help_body: self.help_body.unwrap_or_default(),
            handler: self.handler,
        })
    }
}

/// Ordered mapping from command name to descriptor for one menu
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, failing at startup on any collision
    pub fn register(&mut self, spec: CommandSpec) -> Result<()> {
        let lowered = spec.name().to_ascii_lowercase();
        if RESERVED_WORDS.contains(&lowered.as_str()) {
            return Err(EngineError::ReservedWord(lowered));
        }
        if self.resolve(spec.name()).is_some() {
            return Err(EngineError::DuplicateCommand(spec.name().to_string()));
        }
        for alias in spec.aliases() {
            let lowered = alias.to_ascii_lowercase();
            if RESERVED_WORDS.contains(&lowered.as_str()) {
                return Err(EngineError::ReservedWord(lowered));
            }
            if self.resolve(alias).is_some() {
                return Err(EngineError::DuplicateAlias {
                    command: spec.name().to_string(),
                    alias: alias.clone(),
                });
            }
        }
        self.commands.push(spec);
        Ok(())
    }

    /// Look up a command by name or alias, case-insensitively
    pub fn resolve(&self, token: &str) -> Option<&CommandSpec> {
        // Canonical names win over aliases
        self.commands
            .iter()
            .find(|spec| spec.name().eq_ignore_ascii_case(token))
            .or_else(|| self.commands.iter().find(|spec| spec.answers_to(token)))
    }

    /// Registered commands in registration order
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{HandlerError, HandlerOutcome};
    use async_trait::async_trait;
    use terminal_core::{FlagSpec, ParsedArgs, SessionContext};

    struct NoopHandler;

    #[async_trait]
    impl CommandHandler for NoopHandler {
        async fn run(
            &self,
            _args: &ParsedArgs,
            _ctx: &mut SessionContext,
        ) -> std::result::Result<HandlerOutcome, HandlerError> {
            Ok(HandlerOutcome::silent())
        }
    }

    fn spec(name: &'static str, aliases: &[&str]) -> CommandSpec {
        let mut builder =
            CommandSpec::builder(FlagSchema::new(name, "test command"), Arc::new(NoopHandler));
        for alias in aliases {
            builder = builder.alias(*alias);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_resolve_by_name_and_alias() {
        let mut registry = CommandRegistry::new();
        registry.register(spec("load", &["l"])).unwrap();

        assert!(registry.resolve("load").is_some());
        assert!(registry.resolve("LOAD").is_some());
        assert!(registry.resolve("l").is_some());
        assert!(registry.resolve("unload").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register(spec("load", &[])).unwrap();
        let err = registry.register(spec("load", &[])).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateCommand(_)));
    }

    #[test]
    fn test_alias_colliding_with_name_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register(spec("load", &[])).unwrap();
        let err = registry.register(spec("list", &["load"])).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateAlias { .. }));
    }

    #[test]
    fn test_reserved_word_rejected() {
        let mut registry = CommandRegistry::new();
        let err = registry.register(spec("quit", &[])).unwrap_err();
        assert!(matches!(err, EngineError::ReservedWord(_)));

        let err = registry.register(spec("list", &["q"])).unwrap_err();
        assert!(matches!(err, EngineError::ReservedWord(_)));
    }

    #[test]
    fn test_duplicate_flag_key_rejected_at_build() {
        let schema = FlagSchema::new("sma", "Simple moving average")
            .flag(FlagSpec::int('l', Some("length"), "Window length"))
            .flag(FlagSpec::int('n', Some("length"), "Window length again"));
        let err = CommandSpec::builder(schema, Arc::new(NoopHandler))
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateFlag { .. }));
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = CommandRegistry::new();
        registry.register(spec("load", &[])).unwrap();
        registry.register(spec("view", &[])).unwrap();
        let names: Vec<&str> = registry.commands().iter().map(CommandSpec::name).collect();
        assert_eq!(names, vec!["load", "view"]);
    }
}
