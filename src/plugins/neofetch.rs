//! Bundled system-information plugin.

use colored::Colorize;

use crate::plugins::{Plugin, PluginContext};
use crate::registry::CommandRegistration;

const NAME: &str = "neofetch";

/// Prints OS, architecture, and host details for the running session.
pub struct Neofetch;

impl Plugin for Neofetch {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Shows system information"
    }

    fn commands(&self, ctx: &PluginContext) -> Vec<CommandRegistration> {
        // `show_host = false` under [plugins.neofetch] drops the host line.
        let show_host = ctx
            .settings(NAME)
            .and_then(|table| table.get("show_host"))
            .and_then(|value| value.as_bool())
            .unwrap_or(true);

        vec![CommandRegistration::new(NAME, NAME, move |shell, _args| {
            let state = &shell.state;
            println!(
                "{} v{}",
                state.environment.bright_cyan().bold(),
                state.version
            );
            println!("OS: {} {}", std::env::consts::OS, std::env::consts::ARCH);
            if show_host {
                println!("Host: {}", hostname());
            }
            Ok(())
        })
        .with_description("Shows system information")
        .with_doc("Prints the session name, OS, architecture, and host.")]
    }

    fn on_enable(&self, _ctx: &PluginContext) -> crate::error::FerroResult<()> {
        println!("neofetch enabled.");
        Ok(())
    }

    fn on_disable(&self, _ctx: &PluginContext) -> crate::error::FerroResult<()> {
        println!("neofetch disabled.");
        Ok(())
    }
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
