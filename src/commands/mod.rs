//! Built-in commands.
//!
//! Each submodule registers a family of commands into the session registry
//! under the core owner. Handlers print their own user-level errors (in
//! red, like everything user-facing) and return `Ok`; only unexpected
//! failures propagate to dispatch.

pub mod fs_commands;
pub mod plugins_cmd;
pub mod system;

use colored::Colorize;

use crate::error::FerroResult;
use crate::shell::Shell;

/// Install every built-in into the session registry.
pub fn register_builtins(shell: &mut Shell) -> FerroResult<()> {
    system::register(shell)?;
    fs_commands::register(shell)?;
    plugins_cmd::register(shell)?;
    Ok(())
}

/// User-facing error line, bright red like the dispatch error path.
pub fn print_error(message: &str) {
    println!("{}", message.bright_red().bold());
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::config::ShellConfig;
    use crate::error::ExitCode;

    fn shell_with_builtins() -> Shell {
        let mut shell = Shell::new(ShellConfig::default());
        register_builtins(&mut shell).expect("register builtins");
        shell
    }

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn builtins_answer_under_every_spelling() {
        let shell = shell_with_builtins();
        for name in [
            "exit", "chdir", "cd", "mkdir", "clear", "cls", "plugins", "pl", "ls", "list", "l",
            "touch", "remove", "rm",
        ] {
            assert!(shell.registry.contains(name), "missing builtin {name}");
        }
    }

    #[test]
    fn exit_requests_shutdown_through_dispatch() {
        let mut shell = shell_with_builtins();
        let (code, message) = shell.dispatch(&tokens(&["exit"]));
        assert_eq!(code, ExitCode::Success);
        assert!(message.is_empty());
        assert!(shell.state.exit_requested);
    }

    #[test]
    fn missing_arguments_surface_as_improper_usage() {
        let mut shell = shell_with_builtins();
        let (code, message) = shell.dispatch(&tokens(&["touch"]));
        assert_eq!(code, ExitCode::ImproperUsage);
        assert_eq!(message, "Missing required argument: file");
    }

    #[test]
    fn plugins_without_a_subcommand_is_improper_usage() {
        let mut shell = shell_with_builtins();
        let (code, message) = shell.dispatch(&tokens(&["plugins"]));
        assert_eq!(code, ExitCode::ImproperUsage);
        assert_eq!(
            message,
            "A subcommand is required. Use --help for usage information."
        );
    }

    #[test]
    fn touch_and_remove_round_trip_through_dispatch() {
        let root = TempDir::new().expect("temp root");
        let mut shell = shell_with_builtins();
        shell.state.start_dir = root.path().to_path_buf();

        let target = root.path().join("note.txt");
        let target_str = target.to_string_lossy().into_owned();

        let (code, _) = shell.dispatch(&tokens(&["touch", target_str.as_str()]));
        assert_eq!(code, ExitCode::Success);
        assert!(target.is_file());

        // remove resolves relative names against the start directory.
        let (code, _) = shell.dispatch(&tokens(&["remove", "note.txt"]));
        assert_eq!(code, ExitCode::Success);
        assert!(!target.exists());
    }
}
