//! Flag specifications for terminal commands
//!
//! Every command declares the flags it accepts as a [`FlagSchema`]: an
//! ordered list of [`FlagSpec`]s plus the command's name and summary. The
//! argument parser validates raw input against the schema and the help
//! renderer builds `-h` output from it.

use chrono::NaiveDate;

/// Validity predicate applied to a converted flag value.
///
/// Returns a human-readable reason on rejection.
pub type Validator = fn(&FlagValue) -> std::result::Result<(), String>;

/// The value kind a flag accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Boolean switch, consumes no value token
    Switch,
    /// Free-form string
    Str,
    /// Signed integer
    Int,
    /// Floating point number
    Float,
    /// Calendar date in `%Y-%m-%d` form
    Date,
    /// One of a fixed set of choices
    Choice(&'static [&'static str]),
}

impl FlagKind {
    /// Short label used in help output and conversion errors
    pub fn label(&self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Str => "string",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Date => "date (YYYY-MM-DD)",
            Self::Choice(_) => "choice",
        }
    }
}

/// A typed flag value produced by the parser
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Bool(bool),
    Str(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
}

impl FlagValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Render the value the way it appeared (or would appear) on the line
    pub fn render(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Str(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Declaration of one accepted command-line flag
#[derive(Debug, Clone)]
pub struct FlagSpec {
    short: char,
    long: Option<&'static str>,
    kind: FlagKind,
    required: bool,
    default: Option<FlagValue>,
    description: &'static str,
    validator: Option<Validator>,
}

impl FlagSpec {
    fn new(short: char, long: Option<&'static str>, kind: FlagKind, description: &'static str) -> Self {
        Self {
            short,
            long,
            kind,
            required: false,
            default: None,
            description,
            validator: None,
        }
    }

    /// Boolean switch; defaults to `false` when absent
    pub fn switch(short: char, long: Option<&'static str>, description: &'static str) -> Self {
        Self::new(short, long, FlagKind::Switch, description)
    }

    /// String-valued flag
    pub fn string(short: char, long: Option<&'static str>, description: &'static str) -> Self {
        Self::new(short, long, FlagKind::Str, description)
    }

    /// Integer-valued flag
    pub fn int(short: char, long: Option<&'static str>, description: &'static str) -> Self {
        Self::new(short, long, FlagKind::Int, description)
    }

    /// Float-valued flag
    pub fn float(short: char, long: Option<&'static str>, description: &'static str) -> Self {
        Self::new(short, long, FlagKind::Float, description)
    }

    /// Date-valued flag (`%Y-%m-%d`)
    pub fn date(short: char, long: Option<&'static str>, description: &'static str) -> Self {
        Self::new(short, long, FlagKind::Date, description)
    }

    /// Enumerated-choice flag
    pub fn choice(
        short: char,
        long: Option<&'static str>,
        choices: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self::new(short, long, FlagKind::Choice(choices), description)
    }

    /// Mark the flag as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the value used when the flag is absent
    pub fn default_value(mut self, value: FlagValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Attach a validity predicate, run after type conversion
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Canonical key used in [`ParsedArgs`](crate::args::ParsedArgs)
    ///
    /// The long form when declared, otherwise the short character.
    pub fn key(&self) -> String {
        self.long
            .map_or_else(|| self.short.to_string(), ToString::to_string)
    }

    /// User-facing name for error messages, e.g. `-l` or `-s/--start`
    pub fn display_name(&self) -> String {
        match self.long {
            Some(long) => format!("-{}/--{}", self.short, long),
            None => format!("-{}", self.short),
        }
    }

    /// Whether `token` is this flag's short or long form
    pub fn matches(&self, token: &str) -> bool {
        if let Some(rest) = token.strip_prefix("--") {
            return self.long == Some(rest);
        }
        if let Some(rest) = token.strip_prefix('-') {
            let mut chars = rest.chars();
            return chars.next() == Some(self.short) && chars.next().is_none();
        }
        false
    }

    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> Option<&FlagValue> {
        self.default.as_ref()
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn validate(&self, value: &FlagValue) -> std::result::Result<(), String> {
        match self.validator {
            Some(validator) => validator(value),
            None => Ok(()),
        }
    }
}

/// A command's declared flag surface: name, summary and flag list
#[derive(Debug, Clone, Default)]
pub struct FlagSchema {
    name: String,
    summary: String,
    flags: Vec<FlagSpec>,
}

impl FlagSchema {
    pub fn new(name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            flags: Vec::new(),
        }
    }

    /// Append a flag declaration
    pub fn flag(mut self, spec: FlagSpec) -> Self {
        self.flags.push(spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    /// Flag keys declared more than once, if any
    ///
    /// Checked at registration time; duplicate keys within one command are
    /// a startup error, never a runtime one.
    pub fn duplicate_key(&self) -> Option<String> {
        let mut seen = Vec::with_capacity(self.flags.len());
        for spec in &self.flags {
            let key = spec.key();
            if seen.contains(&key) {
                return Some(key);
            }
            seen.push(key);
        }
        None
    }

    /// Find the flag spec matching a `-x` / `--xxx` token
    pub fn match_token(&self, token: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|spec| spec.matches(token))
    }

    /// Render `-h` help text: name, summary, one line per flag
    pub fn render_help(&self) -> String {
        let mut out = format!("{}\n  {}\n", self.name, self.summary);
        if self.flags.is_empty() {
            out.push_str("\n  (no flags)\n");
            return out;
        }
        out.push('\n');
        for spec in &self.flags {
            let default = spec
                .default()
                .map_or_else(String::new, |value| format!(" [default: {}]", value.render()));
            let required = if spec.is_required() { " (required)" } else { "" };
            out.push_str(&format!(
                "  {:<16} {:<18} {}{}{}\n",
                spec.display_name(),
                spec.kind().label(),
                spec.description(),
                default,
                required,
            ));
        }
        out
    }
}
