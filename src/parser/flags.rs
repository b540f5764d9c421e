//! Argument declarations and parse values.

use std::fmt;

/// Conversion applied to a raw token before it lands in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgType {
    #[default]
    Str,
    Int,
    Float,
    Bool,
}

impl ArgType {
    /// Convert a raw token, surfacing the underlying parse error's message.
    pub fn convert(self, raw: &str) -> Result<Value, String> {
        match self {
            ArgType::Str => Ok(Value::Str(raw.to_string())),
            ArgType::Int => raw.parse::<i64>().map(Value::Int).map_err(|e| e.to_string()),
            ArgType::Float => raw.parse::<f64>().map(Value::Float).map_err(|e| e.to_string()),
            ArgType::Bool => raw.parse::<bool>().map(Value::Bool).map_err(|e| e.to_string()),
        }
    }
}

/// What encountering a flag token does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgAction {
    /// Consume the next token as the flag's value.
    #[default]
    Store,
    /// Set the canonical name to `true`; no value token is consumed.
    StoreTrue,
}

/// A parsed argument value, tagged by type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    /// Human-readable tag, used in type-mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One declared argument, positional or flag.
///
/// Aliases of a flag all point at one shared spec, so they resolve to the
/// same canonical `name` in the parse result.
#[derive(Debug, Clone)]
pub struct FlagSpec {
    /// Canonical name: the primary token with leading dashes stripped.
    pub name: String,
    pub kind: ArgType,
    /// Used verbatim (never re-converted) when the argument is absent.
    /// `None` means the canonical key stays absent from the result.
    pub default: Option<Value>,
    /// Enforced for positionals only.
    pub required: bool,
    pub action: ArgAction,
    pub help_text: Option<String>,
}

/// Options for [`ArgumentParser::add_argument`](super::ArgumentParser::add_argument).
///
/// Everything defaults off, so call sites spell out only what they need:
///
/// ```ignore
/// parser.add_argument("file", ArgOptions { required: true, ..Default::default() })?;
/// parser.add_argument(
///     "--verbose",
///     ArgOptions { aliases: vec!["-v".into()], ..ArgOptions::store_true() },
/// )?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArgOptions {
    pub kind: ArgType,
    pub default: Option<Value>,
    pub required: bool,
    pub help_text: Option<String>,
    pub action: ArgAction,
    pub aliases: Vec<String>,
}

impl ArgOptions {
    /// Shorthand for a boolean presence flag.
    pub fn store_true() -> Self {
        Self {
            action: ArgAction::StoreTrue,
            ..Self::default()
        }
    }
}

/// A named, display-only bucket of argument names.
///
/// Groups carry help-text organization intent and never affect parsing or
/// validation; the parser stores and returns them but does not consult them.
#[derive(Debug, Clone)]
pub struct ArgumentGroup {
    pub name: String,
    pub description: Option<String>,
    members: Vec<String>,
}

impl ArgumentGroup {
    pub(super) fn new(name: &str, description: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            description: description.map(str::to_string),
            members: Vec::new(),
        }
    }

    /// Record an argument name as belonging to this group.
    pub fn add(&mut self, argument: &str) {
        self.members.push(argument.to_string());
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }
}
