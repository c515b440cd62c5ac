//! Presentation configuration for the terminal

use terminal_core::Interval;

/// Knobs for the interactive front end
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Welcome message printed once at startup
    pub welcome_message: String,
    /// Suffix appended to the menu path in the prompt
    pub prompt_suffix: String,
    /// Interval a fresh session starts with
    pub default_interval: Interval,
    /// Redisplay the command table after entering a submenu
    pub show_menu_on_entry: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            welcome_message: "Market analysis terminal - type 'help' for commands".to_string(),
            prompt_suffix: "> ".to_string(),
            default_interval: Interval::Daily,
            show_menu_on_entry: true,
        }
    }
}

impl TerminalConfig {
    /// Create a builder
    pub fn builder() -> TerminalConfigBuilder {
        TerminalConfigBuilder::default()
    }
}

/// Builder for [`TerminalConfig`]
#[derive(Debug, Default)]
pub struct TerminalConfigBuilder {
    welcome_message: Option<String>,
    prompt_suffix: Option<String>,
    default_interval: Option<Interval>,
    show_menu_on_entry: Option<bool>,
}

impl TerminalConfigBuilder {
    /// Set the welcome message
    pub fn welcome_message(mut self, msg: impl Into<String>) -> Self {
        self.welcome_message = Some(msg.into());
        self
    }

    /// Set the prompt suffix
    pub fn prompt_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.prompt_suffix = Some(suffix.into());
        self
    }

    /// Set the starting interval
    pub fn default_interval(mut self, interval: Interval) -> Self {
        self.default_interval = Some(interval);
        self
    }

    /// Toggle menu redisplay on submenu entry
    pub fn show_menu_on_entry(mut self, show: bool) -> Self {
        self.show_menu_on_entry = Some(show);
        self
    }

    /// Build the config
    pub fn build(self) -> TerminalConfig {
        let defaults = TerminalConfig::default();
        TerminalConfig {
            welcome_message: self.welcome_message.unwrap_or(defaults.welcome_message),
            prompt_suffix: self.prompt_suffix.unwrap_or(defaults.prompt_suffix),
            default_interval: self.default_interval.unwrap_or(defaults.default_interval),
            show_menu_on_entry: self
                .show_menu_on_entry
                .unwrap_or(defaults.show_menu_on_entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = TerminalConfig::default();
        assert!(!config.welcome_message.is_empty());
        assert_eq!(config.prompt_suffix, "> ");
        assert_eq!(config.default_interval, Interval::Daily);
    }

    #[test]
    fn test_config_builder() {
        let config = TerminalConfig::builder()
            .prompt_suffix("$ ")
            .default_interval(Interval::I5Min)
            .show_menu_on_entry(false)
            .build();

        assert_eq!(config.prompt_suffix, "$ ");
        assert_eq!(config.default_interval, Interval::I5Min);
        assert!(!config.show_menu_on_entry);
    }
}
