//! Shell session and command dispatch.

use std::path::PathBuf;
use std::rc::Rc;

use crate::config::ShellConfig;
use crate::error::{ExitCode, ExitCodeError};
use crate::parser::ParseError;
use crate::plugins::{PluginContext, PluginHost};
use crate::registry::Registry;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Per-session facts handlers read and update.
pub struct SessionState {
    /// Name shown at the front of the prompt.
    pub environment: String,
    pub version: String,
    /// Directory the shell was started from; `data/` lives here.
    pub start_dir: PathBuf,
    /// Working directory shown in the prompt, tracked by `chdir`.
    pub cwd: PathBuf,
    /// Set by `exit` and the interrupt path; the REPL stops after the
    /// current command.
    pub exit_requested: bool,
}

/// One interactive session: configuration, state, the command table, and
/// the plugin host. Handlers receive `&mut Shell`, so a command can reach
/// all of it.
pub struct Shell {
    pub config: ShellConfig,
    pub state: SessionState,
    pub registry: Registry,
    pub plugins: PluginHost,
}

impl Shell {
    /// Build a session rooted at the current directory. Scaffolding and
    /// config loading are `main`'s job, not the constructor's.
    pub fn new(config: ShellConfig) -> Self {
        let start_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let context = PluginContext::new(&start_dir, &config, VERSION);
        let state = SessionState {
            environment: config.environment.clone(),
            version: VERSION.to_string(),
            start_dir: start_dir.clone(),
            cwd: start_dir,
            exit_requested: false,
        };
        Self {
            config,
            state,
            registry: Registry::new(),
            plugins: PluginHost::new(context),
        }
    }

    /// Resolve `tokens[0]`, run its handler on the remaining tokens, and
    /// fold any failure into an exit code plus a rendered message.
    pub fn dispatch(&mut self, tokens: &[String]) -> (ExitCode, String) {
        let Some((command, rest)) = tokens.split_first() else {
            return (ExitCode::Success, String::new());
        };
        let Some(descriptor) = self.registry.get(command) else {
            return (ExitCode::CommandNotFound, String::new());
        };

        // The handler is cloned out of the registry first: commands like
        // `plugins` mutate the registry while they run.
        let handler = Rc::clone(&descriptor.handler);
        match handler(self, rest) {
            Ok(()) => (ExitCode::Success, String::new()),
            Err(err) => {
                debug!("command {command} failed: {err:#}");
                (classify(&err), render_chain(&err))
            }
        }
    }
}

/// Exit code for a handler failure: an explicit [`ExitCodeError`] anywhere
/// in the chain wins, a parse failure is improper usage, anything else is a
/// generic error.
fn classify(err: &anyhow::Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(exit) = cause.downcast_ref::<ExitCodeError>() {
            return exit.code();
        }
        if cause.is::<ParseError>() {
            return ExitCode::ImproperUsage;
        }
    }
    ExitCode::Error
}

/// One line per cause, outermost first.
fn render_chain(err: &anyhow::Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
