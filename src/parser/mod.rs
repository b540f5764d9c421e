//! Argument parsing - declarative specs, subcommand dispatch, help rendering.
//!
//! Command handlers build an [`ArgumentParser`] per invocation:
//! 1. Declare positionals and flags with [`ArgumentParser::add_argument`]
//! 2. Optionally nest subcommands with [`ArgumentParser::add_subcommand`]
//! 3. Hand the raw tokens to [`ArgumentParser::parse_args`]
//! 4. Check [`ArgumentParser::help_requested`] before acting on the result
//!
//! Parsing follows a fixed order: help scan over the whole token list,
//! subcommand dispatch on the first token, positionals in declaration order,
//! flag scan, then default fill for flags never seen.

mod errors;
mod flags;
mod namespace;


pub use errors::{ArgumentRequiredError, ConfigurationError, ParseError};
pub use flags::{ArgAction, ArgOptions, ArgType, ArgumentGroup, FlagSpec, Value};
pub use namespace::{Namespace, NamespaceError};

use std::collections::HashSet;

use colored::Colorize;

/// Declarative parser for one command's argument surface.
#[derive(Debug)]
pub struct ArgumentParser {
    description: Option<String>,
    include_help: bool,
    help_requested: bool,
    /// Positionals in declaration order. Consumed greedily before flags.
    positionals: Vec<FlagSpec>,
    /// Flag token -> index into `flag_specs`, in insertion order. Aliases
    /// are separate entries pointing at one shared spec.
    flag_tokens: Vec<(String, usize)>,
    flag_specs: Vec<FlagSpec>,
    /// Subparsers in insertion order. Dispatch is on the first token only.
    subcommands: Vec<(String, ArgumentParser)>,
    groups: Vec<ArgumentGroup>,
}

impl ArgumentParser {
    pub fn new(description: Option<&str>) -> Self {
        Self {
            description: description.map(str::to_string),
            include_help: true,
            help_requested: false,
            positionals: Vec::new(),
            flag_tokens: Vec::new(),
            flag_specs: Vec::new(),
            subcommands: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Suppress the implicit `--help, -h` line in rendered help. The help
    /// scan in [`parse_args`](Self::parse_args) still fires either way.
    pub fn set_include_help(&mut self, include_help: bool) {
        self.include_help = include_help;
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// True once a parse saw `--help` or `-h`. The matching parse returned
    /// an empty namespace that must not be acted on.
    pub fn help_requested(&self) -> bool {
        self.help_requested
    }

    /// Declare a positional (bare `name`) or a flag (leading dash). Aliases
    /// join the primary name; dashed aliases become spellings of the same
    /// flag, resolving to the primary name with leading dashes stripped.
    ///
    /// The declaration is validated as a whole before any table changes, so
    /// a rejected call leaves the parser untouched.
    pub fn add_argument(
        &mut self,
        name: &str,
        options: ArgOptions,
    ) -> Result<(), ConfigurationError> {
        let mut tokens: Vec<&str> = Vec::with_capacity(1 + options.aliases.len());
        tokens.push(name);
        tokens.extend(options.aliases.iter().map(String::as_str));

        let mut new_flags: Vec<&str> = Vec::new();
        let mut positional = false;
        for token in &tokens {
            if token.starts_with('-') {
                if self.find_flag(token).is_some() || new_flags.contains(token) {
                    return Err(ConfigurationError::DuplicateFlag(token.to_string()));
                }
                new_flags.push(token);
            } else {
                if positional || self.positionals.iter().any(|p| p.name == name) {
                    return Err(ConfigurationError::DuplicateArgument(name.to_string()));
                }
                positional = true;
            }
        }

        if positional {
            self.positionals.push(FlagSpec {
                name: name.to_string(),
                kind: options.kind,
                default: options.default.clone(),
                required: options.required,
                action: options.action,
                help_text: options.help_text.clone(),
            });
        }
        if !new_flags.is_empty() {
            let spec_index = self.flag_specs.len();
            self.flag_specs.push(FlagSpec {
                name: name.trim_start_matches('-').to_string(),
                kind: options.kind,
                default: options.default,
                required: options.required,
                action: options.action,
                help_text: options.help_text,
            });
            for token in new_flags {
                self.flag_tokens.push((token.to_string(), spec_index));
            }
        }
        Ok(())
    }

    /// Register a nested parser dispatched on `name` as the first token.
    /// Returns the subparser so arguments can be declared on it.
    pub fn add_subcommand(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<&mut ArgumentParser, ConfigurationError> {
        if self.subcommands.iter().any(|(existing, _)| existing == name) {
            return Err(ConfigurationError::DuplicateSubcommand(name.to_string()));
        }
        self.subcommands
            .push((name.to_string(), ArgumentParser::new(description)));
        let last = self.subcommands.len() - 1;
        Ok(&mut self.subcommands[last].1)
    }

    /// Create a display-only argument group. Grouping never changes how
    /// tokens parse.
    pub fn add_argument_group(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> &mut ArgumentGroup {
        self.groups.push(ArgumentGroup::new(name, description));
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    pub fn groups(&self) -> &[ArgumentGroup] {
        &self.groups
    }

    /// Parse a token list into a [`Namespace`].
    ///
    /// Help wins over everything: if any token is `--help` or `-h`, help is
    /// printed and an empty namespace comes back, with
    /// [`help_requested`](Self::help_requested) set. The scan looks at every
    /// token, so a flag value that happens to be `-h` also triggers it.
    pub fn parse_args<S: AsRef<str>>(&mut self, args: &[S]) -> Result<Namespace, ParseError> {
        let tokens: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let mut parsed = Namespace::new();

        if tokens.iter().any(|t| *t == "--help" || *t == "-h") {
            self.print_help();
            self.help_requested = true;
            return Ok(parsed);
        }

        // A parser with subcommands dispatches on the first token or fails;
        // its own arguments are reachable only through a subparser.
        if !self.subcommands.is_empty() {
            let first = tokens.first().copied();
            let position = first.and_then(|first| {
                self.subcommands
                    .iter()
                    .position(|(name, _)| name.as_str() == first)
            });
            let Some(position) = position else {
                return Err(ParseError::SubcommandRequired);
            };
            let (name, subparser) = &mut self.subcommands[position];
            let chosen = name.clone();
            let child = subparser.parse_args(&tokens[1..])?;
            parsed.set_subcommand(&chosen);
            parsed.merge(child);
            return Ok(parsed);
        }

        // Positionals consume from the front in declaration order. Missing
        // required names are collected so the error reports all of them.
        let mut index = 0;
        let mut missing: Vec<String> = Vec::new();
        for spec in &self.positionals {
            if index < tokens.len() {
                let raw = tokens[index];
                let value = spec.kind.convert(raw).map_err(|message| {
                    ParseError::InvalidValue {
                        name: spec.name.clone(),
                        value: raw.to_string(),
                        message,
                    }
                })?;
                parsed.set(&spec.name, value);
                index += 1;
            } else if spec.required {
                missing.push(spec.name.clone());
            } else if let Some(default) = &spec.default {
                parsed.set(&spec.name, default.clone());
            }
        }
        if !missing.is_empty() {
            return Err(ArgumentRequiredError::MissingArguments(missing).into());
        }

        let mut used: HashSet<String> = HashSet::new();
        while index < tokens.len() {
            let token = tokens[index];
            let Some(spec_index) = self.find_flag(token) else {
                return Err(ParseError::UnrecognizedArgument(token.to_string()));
            };
            let spec = &self.flag_specs[spec_index];
            used.insert(spec.name.clone());
            match spec.action {
                ArgAction::StoreTrue => {
                    parsed.set(&spec.name, Value::Bool(true));
                }
                ArgAction::Store => {
                    if index + 1 < tokens.len() {
                        index += 1;
                        let raw = tokens[index];
                        let value = spec.kind.convert(raw).map_err(|message| {
                            ParseError::InvalidValue {
                                name: spec.name.clone(),
                                value: raw.to_string(),
                                message,
                            }
                        })?;
                        parsed.set(&spec.name, value);
                    } else {
                        return Err(
                            ArgumentRequiredError::FlagRequiresValue(token.to_string()).into()
                        );
                    }
                }
            }
            index += 1;
        }

        // Flags never seen fall back: presence flags to false, value flags
        // to their declared default, verbatim and unconverted.
        for spec in &self.flag_specs {
            if used.contains(&spec.name) {
                continue;
            }
            match spec.action {
                ArgAction::StoreTrue => parsed.set(&spec.name, Value::Bool(false)),
                ArgAction::Store => {
                    if let Some(default) = &spec.default {
                        parsed.set(&spec.name, default.clone());
                    }
                }
            }
        }

        Ok(parsed)
    }

    /// Render the help message: description, positionals, the implicit help
    /// line, flags with aliases merged, then subcommands one level deep.
    pub fn render_help(&self) -> String {
        let mut out = String::new();
        if let Some(description) = &self.description {
            out.push_str(&format!("{}\n", description.bright_green().bold()));
        }
        out.push_str("\nUsage:\n");
        self.write_positional_lines(&mut out, "  ");
        if self.include_help {
            out.push_str(&format!(
                "  {}  Opens this message\n",
                "--help, -h".bright_yellow().bold()
            ));
        }
        self.write_flag_lines(&mut out, "  ");

        if !self.subcommands.is_empty() {
            out.push_str("\nSubcommands:\n");
            for (name, subparser) in &self.subcommands {
                out.push_str(&format!(
                    "\n  {}  {}\n",
                    name.bright_magenta().bold(),
                    subparser.description.as_deref().unwrap_or("")
                ));
                subparser.write_positional_lines(&mut out, "    ");
                subparser.write_flag_lines(&mut out, "    ");
            }
        }
        out
    }

    pub fn print_help(&self) {
        print!("{}", self.render_help());
    }

    fn find_flag(&self, token: &str) -> Option<usize> {
        self.flag_tokens
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, index)| *index)
    }

    fn write_positional_lines(&self, out: &mut String, indent: &str) {
        for spec in &self.positionals {
            out.push_str(&format!(
                "{indent}{}  {} (required={})\n",
                spec.name.bright_blue().bold(),
                spec.help_text.as_deref().unwrap_or(""),
                spec.required
            ));
        }
    }

    fn write_flag_lines(&self, out: &mut String, indent: &str) {
        let mut seen: HashSet<&str> = HashSet::new();
        for (token, index) in &self.flag_tokens {
            if seen.contains(token.as_str()) {
                continue;
            }
            let spec = &self.flag_specs[*index];
            let spellings: Vec<&str> = self
                .flag_tokens
                .iter()
                .filter(|(_, i)| self.flag_specs[*i].name == spec.name)
                .map(|(t, _)| t.as_str())
                .collect();
            out.push_str(&format!(
                "{indent}{}  {} (default={})\n",
                spellings.join(", ").bright_yellow().bold(),
                spec.help_text.as_deref().unwrap_or(""),
                match &spec.default {
                    Some(value) => value.to_string(),
                    None => "None".to_string(),
                }
            ));
            seen.extend(spellings);
        }
    }
}
