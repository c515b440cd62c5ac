//! The dispatch loop state machine
//!
//! [`Dispatcher`] processes exactly one command line at a time against the
//! current menu: navigation meta-commands first, then registry lookup,
//! argument parsing, and handler invocation. Every recoverable failure is
//! rendered into the reply text and the loop stays in the same menu with
//! the session context untouched; only `quit` (or EOF at the caller)
//! terminates the session.
//!
//! Single-threaded and cooperative: the session context and menu stack have
//! exactly one mutator, so no synchronization is needed.

use crate::config::TerminalConfig;
use crate::handler::HandlerError;
use crate::menu::{MenuStack, MenuTree};
use crate::registry::CommandSpec;
use comfy_table::{Table, presets};
use terminal_core::{ParseError, SessionContext, parse};
use tracing::{debug, warn};

/// Dispatch loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Blocked on the next input line
    AwaitingInput,
    /// Processing one command to completion
    Dispatching,
    /// Session over; no further lines are accepted
    Terminated,
}

/// Outcome of dispatching one line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReply {
    /// User-visible output, if any
    pub text: Option<String>,
    /// Whether the session should end
    pub quit: bool,
}

impl DispatchReply {
    fn none() -> Self {
        Self::default()
    }

    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            quit: false,
        }
    }

    fn quit(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            quit: true,
        }
    }
}

/// The session/command-dispatch engine
pub struct Dispatcher {
    tree: MenuTree,
    stack: MenuStack,
    ctx: SessionContext,
    config: TerminalConfig,
    state: LoopState,
}

impl Dispatcher {
    /// Create a dispatcher positioned at the tree's root menu
    pub fn new(tree: MenuTree, config: TerminalConfig) -> Self {
        let stack = MenuStack::new(tree.root());
        let mut ctx = SessionContext::new();
        ctx.set_interval(config.default_interval);
        Self {
            tree,
            stack,
            ctx,
            config,
            state: LoopState::AwaitingInput,
        }
    }

    /// Current loop state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Read access to the session context (prompt decoration, tests)
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// The prompt for the current menu, e.g. `(stocks/ta)> `
    pub fn prompt(&self) -> String {
        let path: Vec<&str> = self
            .stack
            .path()
            .iter()
            .map(|id| self.tree.menu(*id).name())
            .collect();
        format!("({}){}", path.join("/"), self.config.prompt_suffix)
    }

    /// Render the current menu's command table
    pub fn render_menu(&self) -> String {
        let menu = self.tree.menu(self.stack.current());
        let mut out = format!("{} menu", menu.name());
        if let Some(status) = self.ctx.status_line() {
            out.push_str(&format!("  [{status}]"));
        }
        out.push('\n');

        let mut table = Table::new();
        table.load_preset(presets::NOTHING);
        for spec in menu.registry().commands() {
            let name = if spec.aliases().is_empty() {
                spec.name().to_string()
            } else {
                format!("{} ({})", spec.name(), spec.aliases().join(", "))
            };
            table.add_row(vec![name, spec.summary().to_string()]);
        }
        out.push_str(&table.to_string());
        out.push_str("\n\nnavigation: help, up, home, quit; <command> -h for flags");
        out
    }

    /// Process one full line: one `AWAITING_INPUT -> DISPATCHING ->
    /// AWAITING_INPUT | TERMINATED` cycle of the state machine.
    pub async fn dispatch_line(&mut self, line: &str) -> DispatchReply {
        if self.state == LoopState::Terminated {
            return DispatchReply {
                text: None,
                quit: true,
            };
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return DispatchReply::none();
        }

        self.state = LoopState::Dispatching;
        let reply = self.dispatch_trimmed(trimmed).await;
        self.state = if reply.quit {
            LoopState::Terminated
        } else {
            LoopState::AwaitingInput
        };
        reply
    }

    async fn dispatch_trimmed(&mut self, trimmed: &str) -> DispatchReply {
        // Only the command token is lower-cased; argument values keep
        // their original case.
        let (token, tail) = trimmed
            .split_once(char::is_whitespace)
            .map_or((trimmed, ""), |(head, rest)| (head, rest));
        let token = token.to_ascii_lowercase();

        let menu_name = self.tree.menu(self.stack.current()).name();
        debug!(command = %token, menu = %menu_name, "dispatching");

        // Reserved navigation words win over every menu command
        match token.as_str() {
            "home" => {
                self.stack.reset_to_root();
                return DispatchReply::text(self.render_menu());
            }
            "up" | "q" | ".." => {
                if self.stack.pop() {
                    return DispatchReply::text(self.render_menu());
                }
                // Informational, not an error
                return DispatchReply::text("Already at the root menu.");
            }
            "quit" | "exit" => return DispatchReply::quit("Goodbye."),
            "help" | "?" => return DispatchReply::text(self.render_menu()),
            _ => {}
        }

        let menu = self.tree.menu(self.stack.current());
        let Some(spec) = menu.registry().resolve(&token) else {
            return DispatchReply::text(format!(
                "Unknown command '{token}'. Type 'help' to list commands."
            ));
        };

        let args = match parse(spec.schema(), tail) {
            Ok(args) => args,
            Err(ParseError::HelpRequested(_)) => {
                // Full help including the detailed body; the handler is
                // never invoked and the context is untouched.
                return DispatchReply::text(spec.render_help());
            }
            Err(err) => {
                return DispatchReply::text(format!("{err}\n\n{}", spec.render_help()));
            }
        };

        let handler = spec.handler().clone();
        match handler.run(&args, &mut self.ctx).await {
            Ok(outcome) => {
                let mut text = outcome.text().map(ToString::to_string);
                if let Some(child) = outcome.submenu() {
                    match self.tree.child_named(self.stack.current(), child) {
                        Some(id) => {
                            self.stack.push(id);
                            if self.config.show_menu_on_entry {
                                text = Some(self.render_menu());
                            }
                        }
                        // Unreachable when the tree is wired correctly;
                        // reported rather than panicking regardless.
                        None => {
                            text = Some(format!("{}: unknown submenu '{child}'", spec.name()));
                        }
                    }
                }
                DispatchReply { text, quit: false }
            }
            Err(err) => {
                warn!(command = %spec.name(), error = %err, "command failed");
                let prefix = match err {
                    HandlerError::Precondition(_) => "",
                    HandlerError::Collaborator(_) => "command failed: ",
                };
                DispatchReply::text(format!("{}: {prefix}{err}", spec.name()))
            }
        }
    }

    /// Resolve a command spec in the current menu (help rendering, tests)
    pub fn resolve(&self, token: &str) -> Option<&CommandSpec> {
        self.tree
            .menu(self.stack.current())
            .registry()
            .resolve(token)
    }

    /// Depth of the navigation stack (root = 1)
    pub fn menu_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Name of the menu currently accepting commands
    pub fn current_menu(&self) -> &str {
        self.tree.menu(self.stack.current()).name()
    }
}
