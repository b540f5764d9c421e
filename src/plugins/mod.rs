//! Plugin interface and lifecycle.
//!
//! A plugin is a value implementing [`Plugin`]. The host hands every hook
//! one shared [`PluginContext`] (paths, per-plugin settings, session
//! identity); plugins keep no global state of their own.
//!
//! Lifecycle: [`PluginHost::load`] installs a plugin and, unless it is
//! disabled in the config, enables it. Enabling asks the plugin for its
//! [`CommandRegistration`]s and installs them; disabling removes exactly the
//! names the plugin contributed, in registration order. Re-enabling runs
//! registration again rather than restoring a snapshot.

pub mod neofetch;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{self, ShellConfig};
use crate::error::FerroResult;
use crate::registry::{CommandRegistration, Registry, RegistryError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PluginError {
    #[error("Plugin not found: {0}")]
    NotFound(String),
    #[error("Plugin already loaded: {0}")]
    AlreadyLoaded(String),
    #[error("Plugin already enabled: {0}")]
    AlreadyEnabled(String),
    #[error("Plugin already disabled: {0}")]
    AlreadyDisabled(String),
}

/// Everything a plugin may consult, passed explicitly to every hook.
pub struct PluginContext {
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub config_dir: PathBuf,
    /// Session name shown in the prompt.
    pub environment: String,
    /// Shell version string.
    pub version: String,
    settings: HashMap<String, toml::Table>,
}

impl PluginContext {
    pub fn new(start_dir: &Path, shell_config: &ShellConfig, version: &str) -> Self {
        Self {
            data_dir: start_dir.join(config::DATA_DIR),
            cache_dir: start_dir.join(config::CACHE_DIR),
            config_dir: start_dir.join(config::CONFIG_DIR),
            environment: shell_config.environment.clone(),
            version: version.to_string(),
            settings: shell_config.plugins.clone(),
        }
    }

    /// The `[plugins.<name>]` table from the shell config, if present.
    pub fn settings(&self, plugin: &str) -> Option<&toml::Table> {
        self.settings.get(plugin)
    }
}

/// A bundled command provider.
pub trait Plugin {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Registrations to install when the plugin is enabled. Called on every
    /// enable, so captured settings are re-read from the context.
    fn commands(&self, ctx: &PluginContext) -> Vec<CommandRegistration>;

    /// Called after the plugin's commands are installed.
    fn on_enable(&self, _ctx: &PluginContext) -> FerroResult<()> {
        Ok(())
    }

    /// Called after the plugin's commands are removed.
    fn on_disable(&self, _ctx: &PluginContext) -> FerroResult<()> {
        Ok(())
    }
}

struct PluginSlot {
    plugin: Box<dyn Plugin>,
    enabled: bool,
}

/// Owns the loaded plugins and the context handed to them.
pub struct PluginHost {
    context: PluginContext,
    /// Load order, kept for `reloadall` and listing.
    plugins: Vec<PluginSlot>,
}

impl PluginHost {
    pub fn new(context: PluginContext) -> Self {
        Self {
            context,
            plugins: Vec::new(),
        }
    }

    pub fn context(&self) -> &PluginContext {
        &self.context
    }

    /// Install a plugin; enables it immediately unless `start_enabled` is
    /// false (the config's `disabled_plugins` list).
    pub fn load(
        &mut self,
        registry: &mut Registry,
        plugin: Box<dyn Plugin>,
        start_enabled: bool,
    ) -> FerroResult<()> {
        let name = plugin.name().to_string();
        if self.index_of(&name).is_some() {
            return Err(PluginError::AlreadyLoaded(name).into());
        }
        debug!("loading plugin {name}");
        self.plugins.push(PluginSlot {
            plugin,
            enabled: false,
        });
        if start_enabled {
            let index = self.plugins.len() - 1;
            self.install(registry, index)?;
        }
        Ok(())
    }

    pub fn enable(&mut self, registry: &mut Registry, name: &str) -> FerroResult<()> {
        let index = self
            .index_of(name)
            .ok_or_else(|| PluginError::NotFound(name.to_string()))?;
        if self.plugins[index].enabled {
            return Err(PluginError::AlreadyEnabled(name.to_string()).into());
        }
        self.install(registry, index)
    }

    pub fn disable(&mut self, registry: &mut Registry, name: &str) -> FerroResult<()> {
        let index = self
            .index_of(name)
            .ok_or_else(|| PluginError::NotFound(name.to_string()))?;
        if !self.plugins[index].enabled {
            return Err(PluginError::AlreadyDisabled(name.to_string()).into());
        }
        self.uninstall(registry, index)
    }

    /// Disable every enabled plugin, then enable all loaded plugins. The
    /// same path a fresh process would take, so plugins disabled mid-session
    /// come back too.
    pub fn reload_all(&mut self, registry: &mut Registry) -> FerroResult<()> {
        for index in 0..self.plugins.len() {
            if self.plugins[index].enabled {
                self.uninstall(registry, index)?;
            }
        }
        for index in 0..self.plugins.len() {
            self.install(registry, index)?;
        }
        Ok(())
    }

    /// (name, description, enabled) for every loaded plugin, in load order.
    pub fn list(&self) -> impl Iterator<Item = (&str, &str, bool)> {
        self.plugins
            .iter()
            .map(|slot| (slot.plugin.name(), slot.plugin.description(), slot.enabled))
    }

    pub fn describe(&self, name: &str) -> Option<(&str, &str, bool)> {
        self.index_of(name).map(|index| {
            let slot = &self.plugins[index];
            (slot.plugin.name(), slot.plugin.description(), slot.enabled)
        })
    }

    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.index_of(name).map(|index| self.plugins[index].enabled)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.plugins
            .iter()
            .position(|slot| slot.plugin.name() == name)
    }

    /// Register the plugin's commands and fire `on_enable`. All names are
    /// checked up front so a conflict installs nothing.
    fn install(&mut self, registry: &mut Registry, index: usize) -> FerroResult<()> {
        let slot = &self.plugins[index];
        let owner = slot.plugin.name().to_string();
        let registrations = slot.plugin.commands(&self.context);

        let mut claimed: HashSet<&str> = HashSet::new();
        for registration in &registrations {
            let names = std::iter::once(registration.name.as_str())
                .chain(registration.aliases.iter().map(String::as_str));
            for candidate in names {
                if registry.contains(candidate) || !claimed.insert(candidate) {
                    return Err(RegistryError::Conflict(candidate.to_string()).into());
                }
            }
        }

        for mut registration in registrations {
            // The host assigns ownership; a plugin cannot register on
            // another plugin's behalf.
            registration.owner = owner.clone();
            registry.register(registration)?;
        }
        debug!("enabled plugin {owner}");
        self.plugins[index].enabled = true;
        self.plugins[index].plugin.on_enable(&self.context)
    }

    /// Remove the plugin's contributed names and fire `on_disable`.
    fn uninstall(&mut self, registry: &mut Registry, index: usize) -> FerroResult<()> {
        let owner = self.plugins[index].plugin.name().to_string();
        let removed = registry.remove_owned(&owner);
        debug!("disabled plugin {owner}, removed {} commands", removed.len());
        self.plugins[index].enabled = false;
        self.plugins[index].plugin.on_disable(&self.context)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn context() -> PluginContext {
        PluginContext::new(Path::new("."), &ShellConfig::default(), "0.0.0")
    }

    /// Registers `cmd_one` (+ alias) and `cmd_two`, recording hook firings.
    struct Recording {
        name: String,
        hooks: Rc<RefCell<Vec<String>>>,
    }

    impl Plugin for Recording {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "records lifecycle hooks"
        }

        fn commands(&self, _ctx: &PluginContext) -> Vec<CommandRegistration> {
            vec![
                CommandRegistration::new("cmd_one", &self.name, |_, _| Ok(()))
                    .with_aliases(&["c1"]),
                CommandRegistration::new("cmd_two", &self.name, |_, _| Ok(())),
            ]
        }

        fn on_enable(&self, _ctx: &PluginContext) -> FerroResult<()> {
            self.hooks.borrow_mut().push(format!("{}:enable", self.name));
            Ok(())
        }

        fn on_disable(&self, _ctx: &PluginContext) -> FerroResult<()> {
            self.hooks
                .borrow_mut()
                .push(format!("{}:disable", self.name));
            Ok(())
        }
    }

    fn recording(name: &str, hooks: &Rc<RefCell<Vec<String>>>) -> Box<Recording> {
        Box::new(Recording {
            name: name.to_string(),
            hooks: Rc::clone(hooks),
        })
    }

    #[test]
    fn load_registers_commands_and_fires_enable() {
        let hooks = Rc::new(RefCell::new(Vec::new()));
        let mut registry = Registry::new();
        let mut host = PluginHost::new(context());

        host.load(&mut registry, recording("rec", &hooks), true)
            .expect("load");

        assert!(registry.contains("cmd_one"));
        assert!(registry.contains("c1"));
        assert!(registry.contains("cmd_two"));
        assert_eq!(registry.owned_by("rec"), &["cmd_one", "c1", "cmd_two"]);
        assert_eq!(host.is_enabled("rec"), Some(true));
        assert_eq!(*hooks.borrow(), &["rec:enable"]);
    }

    #[test]
    fn start_disabled_plugins_register_nothing() {
        let hooks = Rc::new(RefCell::new(Vec::new()));
        let mut registry = Registry::new();
        let mut host = PluginHost::new(context());

        host.load(&mut registry, recording("rec", &hooks), false)
            .expect("load");

        assert!(registry.is_empty());
        assert_eq!(host.is_enabled("rec"), Some(false));
        assert!(hooks.borrow().is_empty());
    }

    #[test]
    fn disable_removes_contributed_names_and_enable_restores_them() {
        let hooks = Rc::new(RefCell::new(Vec::new()));
        let mut registry = Registry::new();
        let mut host = PluginHost::new(context());
        host.load(&mut registry, recording("rec", &hooks), true)
            .expect("load");

        host.disable(&mut registry, "rec").expect("disable");
        assert!(!registry.contains("cmd_one"));
        assert!(!registry.contains("c1"));
        assert_eq!(host.is_enabled("rec"), Some(false));

        let err = host.disable(&mut registry, "rec").expect_err("twice");
        assert_eq!(
            err.downcast_ref::<PluginError>(),
            Some(&PluginError::AlreadyDisabled("rec".into()))
        );

        host.enable(&mut registry, "rec").expect("enable");
        assert!(registry.contains("cmd_one"));
        assert_eq!(
            *hooks.borrow(),
            &["rec:enable", "rec:disable", "rec:enable"]
        );
    }

    #[test]
    fn reload_all_reenables_everything() {
        let hooks = Rc::new(RefCell::new(Vec::new()));
        let mut registry = Registry::new();
        let mut host = PluginHost::new(context());
        host.load(&mut registry, recording("one", &hooks), true)
            .expect("load one");
        // A second plugin would collide on command names; give it its own.
        struct Solo;
        impl Plugin for Solo {
            fn name(&self) -> &str {
                "solo"
            }
            fn commands(&self, _ctx: &PluginContext) -> Vec<CommandRegistration> {
                vec![CommandRegistration::new("solo_cmd", "solo", |_, _| Ok(()))]
            }
        }
        host.load(&mut registry, Box::new(Solo), false)
            .expect("load solo");
        assert!(!registry.contains("solo_cmd"));

        host.reload_all(&mut registry).expect("reload");
        assert!(registry.contains("cmd_one"));
        assert!(registry.contains("solo_cmd"));
        assert_eq!(host.is_enabled("solo"), Some(true));
    }

    #[test]
    fn conflicting_plugin_installs_nothing() {
        let hooks = Rc::new(RefCell::new(Vec::new()));
        let mut registry = Registry::new();
        let mut host = PluginHost::new(context());
        host.load(&mut registry, recording("first", &hooks), true)
            .expect("load first");

        struct Clash;
        impl Plugin for Clash {
            fn name(&self) -> &str {
                "clash"
            }
            fn commands(&self, _ctx: &PluginContext) -> Vec<CommandRegistration> {
                vec![
                    CommandRegistration::new("fresh", "clash", |_, _| Ok(())),
                    CommandRegistration::new("cmd_one", "clash", |_, _| Ok(())),
                ]
            }
        }

        let err = host
            .load(&mut registry, Box::new(Clash), true)
            .expect_err("conflict");
        assert_eq!(
            err.downcast_ref::<RegistryError>(),
            Some(&RegistryError::Conflict("cmd_one".into()))
        );
        // Nothing from the clashing plugin landed, not even `fresh`.
        assert!(!registry.contains("fresh"));
        assert!(registry.owned_by("clash").is_empty());
        assert_eq!(host.is_enabled("clash"), Some(false));
    }

    #[test]
    fn context_hands_out_per_plugin_settings() {
        let mut shell_config = ShellConfig::default();
        let mut table = toml::Table::new();
        table.insert("show_host".into(), toml::Value::Boolean(false));
        shell_config.plugins.insert("neofetch".into(), table);

        let ctx = PluginContext::new(Path::new("/tmp"), &shell_config, "1.2.3");
        let settings = ctx.settings("neofetch").expect("table");
        assert_eq!(
            settings.get("show_host").and_then(|v| v.as_bool()),
            Some(false)
        );
        assert!(ctx.settings("missing").is_none());
        assert!(ctx.data_dir.ends_with("data"));
        assert!(ctx.cache_dir.ends_with("data/cache"));
    }
}
