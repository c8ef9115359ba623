use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use eyre::Context;
use log::LevelFilter;

use crate::command::{self, Selection};
use crate::export::DEFAULT_ROUTES_DIRECTORY;
use crate::routes::RouteBook;
use crate::waypoints::Offset;

pub const CONFIG_FILE_NAME: &str = "grotto_config.json";
pub const CONFIG_BACKUP_FILE_NAME: &str = "grotto_config.json.bak";
pub const DEFAULT_CHAT_PREFIX: &str = "&0&l[&d&lAuto&d&lGrotto&0&l]&r ";

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct GrottoConfig {
    pub log_level: LevelFilter,
    /// Directory the `custom<N>.txt` route files are written to.
    pub routes_directory: PathBuf,
    /// Minimum time between two accepted sneaks.
    pub debounce_ms: u64,
    pub keybinds: KeybindsConfig,
    /// If set, setup can be started without running `/setroute` first.
    ///
    /// `mansion` in slot `8` reproduces the old single-route behaviour.
    pub default_selection: Option<Selection>,
    /// Replacement offset tables for the built-in routes.
    #[serde(default)]
    pub route_overrides: BTreeMap<String, Vec<Offset>>,
    pub chat_prefix: String,
}

impl Default for GrottoConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Info,
            routes_directory: DEFAULT_ROUTES_DIRECTORY.into(),
            debounce_ms: 500,
            keybinds: Default::default(),
            default_selection: None,
            route_overrides: BTreeMap::new(),
            chat_prefix: DEFAULT_CHAT_PREFIX.into(),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct KeybindsConfig {
    pub toggle_setup: KeyBinding,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        Self {
            toggle_setup: KeyBinding {
                description: "Start/Cancel Setup".into(),
                category: "AutoGrotto".into(),
                key_code: 0,
            },
        }
    }
}

/// A host key binding. `key_code` `0` leaves the key unbound until the player assigns it.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub description: String,
    pub category: String,
    pub key_code: i32,
}

pub fn load_config(directory: impl AsRef<Path>) -> eyre::Result<GrottoConfig> {
    let path = directory.as_ref().join(CONFIG_FILE_NAME);
    let file = std::fs::read(&path)?;

    match serde_json::from_slice(&file) {
        Ok(conf) => {
            validate_config(&conf)?;
            Ok(conf)
        }
        Err(e) => {
            // Keep the player's edits around instead of silently dropping them.
            let backup = directory.as_ref().join(CONFIG_BACKUP_FILE_NAME);
            log::warn!(
                "Config at `{}` couldn't be parsed ({e}), moved it to `{}` and restoring defaults",
                path.display(),
                backup.display()
            );
            std::fs::rename(&path, &backup)
                .with_context(|| format!("Couldn't back up broken config to `{}`", backup.display()))?;
            create_initial_config(directory.as_ref())?;
            let file = std::fs::read(&path)?;
            serde_json::from_slice(&file).context("Couldn't load restored default config.")
        }
    }
}

pub fn create_initial_config(directory: impl AsRef<Path>) -> eyre::Result<()> {
    let default_conf = GrottoConfig::default();
    let path = directory.as_ref().join(CONFIG_FILE_NAME);

    if !path.exists() {
        let mut file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(&mut file, &default_conf)?;
    }

    Ok(())
}

pub fn validate_config(conf: &GrottoConfig) -> eyre::Result<()> {
    if conf.debounce_ms == 0 {
        eyre::bail!("`debounce_ms` must be greater than zero");
    }
    if conf.routes_directory.as_os_str().is_empty() {
        eyre::bail!("`routes_directory` can't be empty");
    }

    let routes = RouteBook::with_overrides(&conf.route_overrides)?;

    if let Some(selection) = &conf.default_selection {
        if !routes.contains(&selection.route) {
            eyre::bail!(
                "Default selection uses unknown route `{}`, expected one of {:?}",
                selection.route,
                routes.names()
            );
        }
        if !command::is_valid_slot(selection.slot) {
            eyre::bail!("Default selection slot must be between 1 and 9, got {}", selection.slot);
        }
    }

    Ok(())
}
