//! FerroShell - interactive command shell entry point.

mod commands;
mod config;
mod error;
mod parser;
mod plugins;
mod registry;
mod repl;
mod shell;

#[macro_use]
extern crate log;

use std::env;
use std::process::exit;

use colored::Colorize;

use commands::print_error;
use error::FerroResult;
use plugins::neofetch::Neofetch;
use plugins::Plugin;
use shell::Shell;

const BANNER: &str = r" ___                      ___  _          _   _
| __| ___  _ _  _ _  ___ / __|| |_   ___ | | | |
| _| / -_)| '_|| '_|/ _ \\__ \| ' \ / -_)| | | |
|_|  \___||_|  |_|  \___/|___/|_||_|\___||_| |_|";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    if let Err(e) = try_main() {
        log::error!("{e:#}");
        exit(1);
    }
}

fn try_main() -> FerroResult<()> {
    println!("Starting FerroShell...");

    let start_dir = env::current_dir()?;
    config::scaffold(&start_dir)?;
    let shell_config = config::load_config(&start_dir)?;

    let mut shell = Shell::new(shell_config);
    commands::register_builtins(&mut shell)?;
    load_bundled_plugins(&mut shell);

    print_banner(&shell);
    repl::run(&mut shell)
}

fn bundled_plugins() -> Vec<Box<dyn Plugin>> {
    vec![Box::new(Neofetch)]
}

/// A plugin that fails to load is reported and skipped; the shell still
/// starts with the rest.
fn load_bundled_plugins(shell: &mut Shell) {
    for plugin in bundled_plugins() {
        let name = plugin.name().to_string();
        let enabled = !shell.config.disabled_plugins.contains(&name);
        if let Err(e) = shell.plugins.load(&mut shell.registry, plugin, enabled) {
            print_error(&format!("Error: Plugin '{name}' failed to load"));
            debug!("plugin {name}: {e:#}");
        }
    }
}

fn print_banner(shell: &Shell) {
    println!("{}", BANNER.magenta());
    println!();
    println!("{} v{}", shell.state.environment, shell.state.version);
}
