//! Interactive loop - prompt, line editing, completion, error rendering.

use std::sync::{Arc, RwLock};

use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::commands::print_error;
use crate::error::{ExitCode, FerroResult};
use crate::shell::Shell;

/// Completes the first token against command names and later tokens
/// against the filesystem.
struct ShellHelper {
    files: FilenameCompleter,
    commands: Arc<RwLock<Vec<String>>>,
}

impl ShellHelper {
    fn new(commands: Arc<RwLock<Vec<String>>>) -> Self {
        Self {
            files: FilenameCompleter::new(),
            commands,
        }
    }
}

impl Helper for ShellHelper {}
impl Highlighter for ShellHelper {}
impl Validator for ShellHelper {}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &line[start..pos];

        // Nothing but whitespace before the word means it is the command.
        if line[..start].split_whitespace().next().is_none() {
            let Ok(commands) = self.commands.read() else {
                return Ok((start, Vec::new()));
            };
            let pairs = commands
                .iter()
                .filter(|name| name.starts_with(word))
                .map(|name| Pair {
                    display: name.clone(),
                    replacement: name.clone(),
                })
                .collect();
            return Ok((start, pairs));
        }

        self.files.complete(line, pos, ctx)
    }
}

/// Plugins add and remove commands mid-session, so the candidate list is
/// rebuilt from the registry before every prompt.
fn refresh_completions(commands: &Arc<RwLock<Vec<String>>>, shell: &Shell) {
    let names: Vec<String> = shell
        .registry
        .names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    if let Ok(mut slot) = commands.write() {
        *slot = names;
    }
}

/// Read and dispatch lines until `exit` or end of input.
pub fn run(shell: &mut Shell) -> FerroResult<()> {
    let commands = Arc::new(RwLock::new(Vec::new()));
    let mut editor: Editor<ShellHelper, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(ShellHelper::new(Arc::clone(&commands))));

    loop {
        refresh_completions(&commands, shell);

        let prompt = format!("{} {}> ", shell.state.environment, shell.state.cwd.display());
        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => {
                println!();
                shell.dispatch(&["exit".to_string()]);
                break;
            }
            Err(e) => return Err(e.into()),
        };

        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        let Some(command) = tokens.first().cloned() else {
            continue;
        };
        editor.add_history_entry(line.as_str())?;

        let (code, message) = shell.dispatch(&tokens);
        match code {
            ExitCode::Success => {}
            ExitCode::CommandNotFound => {
                print_error(&format!("Error: Command \"{command}\" not found"));
            }
            _ => {
                print_error(&format!(
                    "Error: Command \"{command}\" encountered an error\n{message}"
                ));
            }
        }

        if shell.state.exit_requested {
            break;
        }
    }
    Ok(())
}
