//! The `plugins` command: lifecycle control over loaded plugins.

use colored::Colorize;

use crate::error::FerroResult;
use crate::parser::{ArgOptions, ArgumentParser, ParseError};
use crate::plugins::PluginError;
use crate::registry::{CommandRegistration, CORE_OWNER};
use crate::shell::Shell;

pub fn register(shell: &mut Shell) -> FerroResult<()> {
    shell.registry.register(
        CommandRegistration::new("plugins", CORE_OWNER, plugins)
            .with_aliases(&["pl"])
            .with_description("Manage loaded plugins")
            .with_doc("Subcommands: reloadall, disable, enable, list, info."),
    )?;
    Ok(())
}

fn build_parser() -> FerroResult<ArgumentParser> {
    let mut parser = ArgumentParser::new(Some("Manage loaded plugins"));
    parser.add_subcommand("reloadall", Some("Disable and re-enable every plugin"))?;
    let disable = parser.add_subcommand("disable", Some("Disable a plugin and remove its commands"))?;
    disable.add_argument(
        "name",
        ArgOptions {
            required: true,
            help_text: Some("Plugin to disable".into()),
            ..Default::default()
        },
    )?;
    let enable = parser.add_subcommand("enable", Some("Enable a plugin and restore its commands"))?;
    enable.add_argument(
        "name",
        ArgOptions {
            required: true,
            help_text: Some("Plugin to enable".into()),
            ..Default::default()
        },
    )?;
    parser.add_subcommand("list", Some("List loaded plugins"))?;
    let info = parser.add_subcommand("info", Some("Show a plugin's details"))?;
    info.add_argument(
        "name",
        ArgOptions {
            required: true,
            help_text: Some("Plugin to describe".into()),
            ..Default::default()
        },
    )?;
    Ok(parser)
}

fn plugins(shell: &mut Shell, args: &[String]) -> FerroResult<()> {
    let mut parser = build_parser()?;
    let ns = parser.parse_args(args)?;
    if parser.help_requested() {
        return Ok(());
    }

    let Shell {
        registry, plugins, ..
    } = shell;
    match ns.subcommand() {
        Some("reloadall") => {
            println!("Reloading all plugins");
            plugins.reload_all(registry)?;
            println!("Reload complete");
        }
        Some("disable") => plugins.disable(registry, ns.get_str("name")?)?,
        Some("enable") => plugins.enable(registry, ns.get_str("name")?)?,
        Some("list") => {
            let mut any = false;
            for (name, description, enabled) in plugins.list() {
                any = true;
                let status = if enabled {
                    "enabled".green()
                } else {
                    "disabled".bright_black()
                };
                println!("{}  {status}  {description}", name.bold());
            }
            if !any {
                println!("No plugins loaded");
            }
        }
        Some("info") => {
            let name = ns.get_str("name")?;
            let Some((name, description, enabled)) = plugins.describe(name) else {
                return Err(PluginError::NotFound(name.to_string()).into());
            };
            println!("{}", name.bold());
            println!("Status: {}", if enabled { "enabled" } else { "disabled" });
            if !description.is_empty() {
                println!("Description: {description}");
            }
            let commands = registry.owned_by(name);
            if commands.is_empty() {
                println!("Commands: (none)");
            } else {
                println!("Commands: {}", commands.join(", "));
            }
        }
        // The parser guarantees one of the five; anything else is a usage
        // failure.
        _ => return Err(ParseError::SubcommandRequired.into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands;
    use crate::config::ShellConfig;
    use crate::error::ExitCode;
    use crate::plugins::neofetch::Neofetch;

    fn shell_with_neofetch() -> Shell {
        let mut shell = Shell::new(ShellConfig::default());
        commands::register_builtins(&mut shell).expect("builtins");
        let Shell {
            registry, plugins, ..
        } = &mut shell;
        plugins
            .load(registry, Box::new(Neofetch), true)
            .expect("load neofetch");
        shell
    }

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn disabling_makes_commands_unknown_and_enabling_restores_them() {
        let mut shell = shell_with_neofetch();
        let (code, _) = shell.dispatch(&tokens(&["neofetch"]));
        assert_eq!(code, ExitCode::Success);

        let (code, _) = shell.dispatch(&tokens(&["pl", "disable", "neofetch"]));
        assert_eq!(code, ExitCode::Success);
        let (code, _) = shell.dispatch(&tokens(&["neofetch"]));
        assert_eq!(code, ExitCode::CommandNotFound);

        let (code, _) = shell.dispatch(&tokens(&["plugins", "enable", "neofetch"]));
        assert_eq!(code, ExitCode::Success);
        let (code, _) = shell.dispatch(&tokens(&["neofetch"]));
        assert_eq!(code, ExitCode::Success);
    }

    #[test]
    fn reloadall_brings_every_plugin_back() {
        let mut shell = shell_with_neofetch();
        let (code, _) = shell.dispatch(&tokens(&["pl", "disable", "neofetch"]));
        assert_eq!(code, ExitCode::Success);

        let (code, _) = shell.dispatch(&tokens(&["plugins", "reloadall"]));
        assert_eq!(code, ExitCode::Success);
        assert!(shell.registry.contains("neofetch"));
        assert_eq!(shell.plugins.is_enabled("neofetch"), Some(true));
    }

    #[test]
    fn unknown_plugin_names_fail_with_a_clear_message() {
        let mut shell = shell_with_neofetch();
        let (code, message) = shell.dispatch(&tokens(&["plugins", "disable", "ghost"]));
        assert_eq!(code, ExitCode::Error);
        assert_eq!(message, "Plugin not found: ghost");
    }

    #[test]
    fn list_and_info_run_cleanly() {
        let mut shell = shell_with_neofetch();
        let (code, _) = shell.dispatch(&tokens(&["plugins", "list"]));
        assert_eq!(code, ExitCode::Success);
        let (code, _) = shell.dispatch(&tokens(&["plugins", "info", "neofetch"]));
        assert_eq!(code, ExitCode::Success);
    }

    #[test]
    fn missing_subcommand_argument_is_improper_usage() {
        let mut shell = shell_with_neofetch();
        let (code, message) = shell.dispatch(&tokens(&["plugins", "disable"]));
        assert_eq!(code, ExitCode::ImproperUsage);
        assert_eq!(message, "Missing required argument: name");
    }
}
