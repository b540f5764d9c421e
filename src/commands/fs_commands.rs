//! Filesystem commands.

use std::fs;
use std::io;
use std::path::PathBuf;

use colored::Colorize;

use crate::commands::print_error;
use crate::error::FerroResult;
use crate::parser::{ArgOptions, ArgumentParser};
use crate::registry::{CommandRegistration, CORE_OWNER};
use crate::shell::Shell;

pub fn register(shell: &mut Shell) -> FerroResult<()> {
    shell.registry.register(
        CommandRegistration::new("ls", CORE_OWNER, ls)
            .with_aliases(&["list", "l"])
            .with_description("List directory contents"),
    )?;
    shell.registry.register(
        CommandRegistration::new("chdir", CORE_OWNER, chdir)
            .with_aliases(&["cd"])
            .with_description("Change the working directory"),
    )?;
    shell.registry.register(
        CommandRegistration::new("mkdir", CORE_OWNER, mkdir)
            .with_description("Create a directory"),
    )?;
    shell.registry.register(
        CommandRegistration::new("touch", CORE_OWNER, touch)
            .with_description("Create an empty file"),
    )?;
    shell.registry.register(
        CommandRegistration::new("remove", CORE_OWNER, remove)
            .with_aliases(&["rm"])
            .with_description("Delete a file"),
    )?;
    Ok(())
}

/// List a directory: folders first in blue, then files in green.
fn ls(shell: &mut Shell, args: &[String]) -> FerroResult<()> {
    let mut parser = ArgumentParser::new(Some("List directory contents"));
    parser.add_argument(
        "path",
        ArgOptions {
            help_text: Some("Directory to list, defaults to the working directory".into()),
            ..Default::default()
        },
    )?;
    let ns = parser.parse_args(args)?;
    if parser.help_requested() {
        return Ok(());
    }

    let path = if ns.contains("path") {
        PathBuf::from(ns.get_str("path")?)
    } else {
        shell.state.cwd.clone()
    };

    let entries = match fs::read_dir(&path) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            print_error(&format!(
                "Error: The directory '{}' does not exist.",
                path.display()
            ));
            return Ok(());
        }
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            print_error(&format!(
                "Error: Permission denied to access '{}'.",
                path.display()
            ));
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let mut folders = Vec::new();
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let full = entry.path();
        if full.is_dir() {
            folders.push(name);
        } else if full.is_file() {
            files.push(name);
        }
    }
    folders.sort();
    files.sort();
    for name in folders {
        println!("{}", format!("{name}/").blue());
    }
    for name in files {
        println!("{}", name.green());
    }
    Ok(())
}

/// Change the working directory, keeping the session's idea of it in sync
/// with the process.
fn chdir(shell: &mut Shell, args: &[String]) -> FerroResult<()> {
    let mut parser = ArgumentParser::new(Some("Change the working directory"));
    parser.add_argument(
        "path",
        ArgOptions {
            required: true,
            help_text: Some("Directory to move into".into()),
            ..Default::default()
        },
    )?;
    let ns = parser.parse_args(args)?;
    if parser.help_requested() {
        return Ok(());
    }

    let raw = ns.get_str("path")?;
    let target = shell.state.cwd.join(raw);
    if target.is_dir() {
        std::env::set_current_dir(&target)?;
        shell.state.cwd = std::env::current_dir()?;
    } else if target.exists() {
        print_error(&format!("Error: {raw} is a file"));
    } else {
        print_error(&format!("Error: The directory '{raw}' does not exist."));
    }
    Ok(())
}

fn mkdir(shell: &mut Shell, args: &[String]) -> FerroResult<()> {
    let mut parser = ArgumentParser::new(Some("Create a directory"));
    parser.add_argument(
        "path",
        ArgOptions {
            required: true,
            help_text: Some("Directory to create".into()),
            ..Default::default()
        },
    )?;
    let ns = parser.parse_args(args)?;
    if parser.help_requested() {
        return Ok(());
    }

    let raw = ns.get_str("path")?;
    let target = shell.state.cwd.join(raw);
    if target.exists() {
        print_error(&format!("Error: {raw} exists"));
    } else {
        fs::create_dir(&target)?;
    }
    Ok(())
}

fn touch(shell: &mut Shell, args: &[String]) -> FerroResult<()> {
    let mut parser = ArgumentParser::new(Some("Create an empty file"));
    parser.add_argument(
        "file",
        ArgOptions {
            required: true,
            help_text: Some("File to create".into()),
            ..Default::default()
        },
    )?;
    let ns = parser.parse_args(args)?;
    if parser.help_requested() {
        return Ok(());
    }

    let raw = ns.get_str("file")?;
    let target = shell.state.cwd.join(raw);
    if target.exists() {
        print_error(&format!("Error: {raw} exists"));
    } else {
        fs::File::create(&target)?;
        println!("Created file {raw}");
    }
    Ok(())
}

fn remove(shell: &mut Shell, args: &[String]) -> FerroResult<()> {
    let mut parser = ArgumentParser::new(Some("Delete a file"));
    parser.add_argument(
        "file",
        ArgOptions {
            required: true,
            help_text: Some("File to delete, relative to the start directory".into()),
            ..Default::default()
        },
    )?;
    let ns = parser.parse_args(args)?;
    if parser.help_requested() {
        return Ok(());
    }

    let raw = ns.get_str("file")?;
    // Relative names resolve against the start directory, not the working
    // directory.
    let target = shell.state.start_dir.join(raw);
    match fs::remove_file(&target) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            print_error(&format!("Error: '{raw}' does not exist."));
        }
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            print_error(&format!("Error: Permission to delete '{raw}' denied"));
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    use tempfile::TempDir;

    use super::*;
    use crate::config::ShellConfig;

    static CWD_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn cwd_lock() -> MutexGuard<'static, ()> {
        CWD_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn chdir_moves_the_session_and_the_process() {
        let _guard = cwd_lock();
        let original = std::env::current_dir().expect("cwd");
        let root = TempDir::new().expect("temp root");

        let mut shell = Shell::new(ShellConfig::default());
        let target = root.path().to_string_lossy().into_owned();
        chdir(&mut shell, &tokens(&[target.as_str()])).expect("chdir");
        assert_eq!(
            shell.state.cwd,
            root.path().canonicalize().expect("canonical")
        );

        std::env::set_current_dir(&original).expect("restore");
    }

    #[test]
    fn chdir_to_a_missing_directory_reports_without_failing() {
        let mut shell = Shell::new(ShellConfig::default());
        let before = shell.state.cwd.clone();
        chdir(&mut shell, &tokens(&["__definitely_missing__"])).expect("chdir");
        assert_eq!(shell.state.cwd, before);
    }

    #[test]
    fn chdir_to_a_file_reports_without_failing() {
        let root = TempDir::new().expect("temp root");
        let file = root.path().join("plain.txt");
        std::fs::write(&file, "x").expect("write");
        let file_str = file.to_string_lossy().into_owned();

        let mut shell = Shell::new(ShellConfig::default());
        let before = shell.state.cwd.clone();
        chdir(&mut shell, &tokens(&[file_str.as_str()])).expect("chdir");
        assert_eq!(shell.state.cwd, before);
    }

    #[test]
    fn mkdir_creates_once_and_refuses_twice() {
        let root = TempDir::new().expect("temp root");
        let target = root.path().join("fresh");
        let target_str = target.to_string_lossy().into_owned();

        let mut shell = Shell::new(ShellConfig::default());
        mkdir(&mut shell, &tokens(&[target_str.as_str()])).expect("mkdir");
        assert!(target.is_dir());
        // Second call reports and succeeds; the directory survives.
        mkdir(&mut shell, &tokens(&[target_str.as_str()])).expect("mkdir again");
        assert!(target.is_dir());
    }

    #[test]
    fn touch_creates_once_and_refuses_twice() {
        let root = TempDir::new().expect("temp root");
        let target = root.path().join("note.txt");
        let target_str = target.to_string_lossy().into_owned();

        let mut shell = Shell::new(ShellConfig::default());
        touch(&mut shell, &tokens(&[target_str.as_str()])).expect("touch");
        assert!(target.is_file());
        touch(&mut shell, &tokens(&[target_str.as_str()])).expect("touch again");
        assert!(target.is_file());
    }

    #[test]
    fn remove_of_a_missing_file_reports_without_failing() {
        let root = TempDir::new().expect("temp root");
        let mut shell = Shell::new(ShellConfig::default());
        shell.state.start_dir = root.path().to_path_buf();
        remove(&mut shell, &tokens(&["ghost.txt"])).expect("remove");
    }

    #[test]
    fn ls_of_a_missing_directory_reports_without_failing() {
        let mut shell = Shell::new(ShellConfig::default());
        ls(&mut shell, &tokens(&["__definitely_missing__"])).expect("ls");
    }

    #[test]
    fn ls_help_short_circuits_the_listing() {
        let mut shell = Shell::new(ShellConfig::default());
        colored::control::set_override(false);
        ls(&mut shell, &tokens(&["--help"])).expect("ls help");
    }
}
