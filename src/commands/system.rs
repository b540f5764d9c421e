//! Session commands.

use std::io::{self, Write};

use crate::error::FerroResult;
use crate::registry::{CommandRegistration, CORE_OWNER};
use crate::shell::Shell;

pub fn register(shell: &mut Shell) -> FerroResult<()> {
    shell.registry.register(
        CommandRegistration::new("exit", CORE_OWNER, exit)
            .with_description("Close the shell")
            .with_doc("Requests a graceful shutdown once the current command finishes."),
    )?;
    shell.registry.register(
        CommandRegistration::new("clear", CORE_OWNER, clear)
            .with_aliases(&["cls"])
            .with_description("Clear the screen"),
    )?;
    Ok(())
}

/// Ask the REPL to stop. The interrupt path funnels into the same flag.
fn exit(shell: &mut Shell, _args: &[String]) -> FerroResult<()> {
    println!("Closing {}", shell.state.environment);
    shell.state.exit_requested = true;
    Ok(())
}

fn clear(_shell: &mut Shell, _args: &[String]) -> FerroResult<()> {
    // Full terminal reset.
    print!("\x1bc");
    io::stdout().flush()?;
    Ok(())
}
