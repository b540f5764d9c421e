//! Command registry - session-wide command registration and lookup.
//!
//! To contribute a command:
//! 1. Build a [`CommandRegistration`] binding a handler closure
//! 2. Hand it to [`Registry::register`]
//! 3. The primary name and every alias resolve to one shared
//!    [`CommandDescriptor`], so invoking via an alias is indistinguishable
//!
//! Owners are recorded per name so disabling a plugin can remove exactly
//! the commands it contributed, in registration order.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::error::FerroResult;
use crate::shell::Shell;

/// Owner recorded for commands the shell registers itself.
pub const CORE_OWNER: &str = "core";

/// Handler invoked by dispatch with the session and the tokens after the
/// command name.
pub type Handler = Rc<dyn Fn(&mut Shell, &[String]) -> FerroResult<()>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The name or one of its aliases is already taken. The registry is
    /// left untouched.
    #[error("Command \"{0}\" is already registered")]
    Conflict(String),
}

/// A registered command: the handler plus its display metadata.
pub struct CommandDescriptor {
    pub handler: Handler,
    pub description: Option<String>,
    pub doc: Option<String>,
    pub extradata: HashMap<String, String>,
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("description", &self.description)
            .field("doc", &self.doc)
            .field("extradata", &self.extradata)
            .finish_non_exhaustive()
    }
}

/// Everything needed to install one command.
pub struct CommandRegistration {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: Option<String>,
    pub doc: Option<String>,
    pub extradata: HashMap<String, String>,
    /// Plugin name, or [`CORE_OWNER`] for built-ins.
    pub owner: String,
    pub handler: Handler,
}

impl CommandRegistration {
    /// Registration with empty metadata; callers fill in what they have.
    pub fn new<F>(name: &str, owner: &str, handler: F) -> Self
    where
        F: Fn(&mut Shell, &[String]) -> FerroResult<()> + 'static,
    {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            description: None,
            doc: None,
            extradata: HashMap::new(),
            owner: owner.to_string(),
            handler: Rc::new(handler),
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_string());
        self
    }
}

/// Session-wide command table.
#[derive(Default)]
pub struct Registry {
    commands: HashMap<String, Rc<CommandDescriptor>>,
    /// Owner -> names contributed, in registration order.
    contributions: HashMap<String, Vec<String>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a command under its primary name and every alias. Every name
    /// is checked before any is inserted, so a conflict changes nothing.
    pub fn register(
        &mut self,
        registration: CommandRegistration,
    ) -> Result<Rc<CommandDescriptor>, RegistryError> {
        let CommandRegistration {
            name,
            aliases,
            description,
            doc,
            extradata,
            owner,
            handler,
        } = registration;

        for candidate in std::iter::once(&name).chain(aliases.iter()) {
            if self.commands.contains_key(candidate) {
                return Err(RegistryError::Conflict(candidate.clone()));
            }
        }

        let descriptor = Rc::new(CommandDescriptor {
            handler,
            description,
            doc,
            extradata,
        });
        let owned = self.contributions.entry(owner).or_default();
        self.commands.insert(name.clone(), Rc::clone(&descriptor));
        owned.push(name);
        for alias in aliases {
            self.commands.insert(alias.clone(), Rc::clone(&descriptor));
            owned.push(alias);
        }
        Ok(descriptor)
    }

    /// Look up a command by name or alias.
    pub fn get(&self, name: &str) -> Option<&Rc<CommandDescriptor>> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Names an owner contributed, in registration order.
    pub fn owned_by(&self, owner: &str) -> &[String] {
        self.contributions
            .get(owner)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Remove every name an owner contributed. Returns the removed names in
    /// registration order.
    pub fn remove_owned(&mut self, owner: &str) -> Vec<String> {
        let names = self.contributions.remove(owner).unwrap_or_default();
        for name in &names {
            self.commands.remove(name);
        }
        names
    }

    /// All registered names, aliases included, sorted for display.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
