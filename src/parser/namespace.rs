//! Parse results.

use std::collections::HashMap;

use thiserror::Error;

use super::flags::Value;

/// Typed lookup failure on a [`Namespace`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamespaceError {
    /// No value under that canonical name. Optional arguments without a
    /// default simply never appear, so this is the common miss.
    #[error("No such argument: {0}")]
    Missing(String),
    #[error("Argument '{name}' is {actual}, not {expected}")]
    WrongType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// The result of a successful parse: canonical names mapped to typed values,
/// plus the chosen subcommand when dispatch happened.
///
/// Accessors come in two shapes. [`Namespace::get`] answers "was it given at
/// all", while the typed getters ([`Namespace::get_str`] and friends) are for
/// call sites that know what they declared and want the value or a precise
/// error.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    values: HashMap<String, Value>,
    subcommand: Option<String>,
}

impl Namespace {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub(super) fn set_subcommand(&mut self, name: &str) {
        self.subcommand = Some(name.to_string());
    }

    /// Fold a subparser's result into this one. Child values overwrite on
    /// name collision, and a child's subcommand marker (from deeper nesting)
    /// wins over our own.
    pub(super) fn merge(&mut self, child: Namespace) {
        self.values.extend(child.values);
        if child.subcommand.is_some() {
            self.subcommand = child.subcommand;
        }
    }

    /// The subcommand chosen during parsing, if dispatch happened. With
    /// nested subcommands this is the deepest one.
    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// True when the parse produced nothing at all, as a help request does.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.subcommand.is_none()
    }

    pub fn get_str(&self, name: &str) -> Result<&str, NamespaceError> {
        match self.lookup(name)? {
            Value::Str(s) => Ok(s),
            other => Err(self.mismatch(name, "string", other)),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<i64, NamespaceError> {
        match self.lookup(name)? {
            Value::Int(i) => Ok(*i),
            other => Err(self.mismatch(name, "int", other)),
        }
    }

    pub fn get_float(&self, name: &str) -> Result<f64, NamespaceError> {
        match self.lookup(name)? {
            Value::Float(x) => Ok(*x),
            other => Err(self.mismatch(name, "float", other)),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, NamespaceError> {
        match self.lookup(name)? {
            Value::Bool(b) => Ok(*b),
            other => Err(self.mismatch(name, "bool", other)),
        }
    }

    fn lookup(&self, name: &str) -> Result<&Value, NamespaceError> {
        self.values
            .get(name)
            .ok_or_else(|| NamespaceError::Missing(name.to_string()))
    }

    fn mismatch(&self, name: &str, expected: &'static str, actual: &Value) -> NamespaceError {
        NamespaceError::WrongType {
            name: name.to_string(),
            expected,
            actual: actual.type_name(),
        }
    }
}
