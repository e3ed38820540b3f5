use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::ui::diff_view::DiffViewMode;
use crate::ui::theme::{hex, Palette, DEFAULT_THEME_NAME};

const CONFIG_DIR_NAME: &str = "gitdeck";
const CONFIG_FILE_NAME: &str = "config.toml";
const THEMES_DIR_NAME: &str = "themes";
const REPO_CONFIG_FILE_NAME: &str = ".gitdeck.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitdeckConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// [display] section configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Diff layout at startup: "auto", "split" or "unified"
    #[serde(default)]
    pub diff_view: DiffViewMode,
}

/// [watch] section configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_theme() -> String {
    DEFAULT_THEME_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    200
}

impl Default for GitdeckConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            display: DisplayConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// `<config_dir>/gitdeck`, when the platform has a config directory
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME))
}

/// Load config by merging the global file with per-repo overrides.
/// Priority: `<repo>/.gitdeck.toml` > `<config_dir>/gitdeck/config.toml` > built-in defaults.
pub fn load_config(repo_root: &Path) -> GitdeckConfig {
    let global = config_dir().map(|d| d.join(CONFIG_FILE_NAME));
    load_config_from(global.as_deref(), &repo_root.join(REPO_CONFIG_FILE_NAME))
}

fn load_config_from(global_path: Option<&Path>, local_path: &Path) -> GitdeckConfig {
    let global_table = global_path.and_then(read_table);
    let local_table = read_table(local_path);

    let merged = match (global_table, local_table) {
        (Some(mut global), Some(local)) => {
            deep_merge(&mut global, local);
            global
        }
        (Some(global), None) => global,
        (None, Some(local)) => local,
        (None, None) => return GitdeckConfig::default(),
    };

    match toml::Value::Table(merged).try_into() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "invalid config, using defaults");
            GitdeckConfig::default()
        }
    }
}

fn read_table(path: &Path) -> Option<toml::Table> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<toml::Table>(&content) {
        Ok(table) => Some(table),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config");
            None
        }
    }
}

/// Recursively merge `overlay` into `base`. Overlay values win; nested tables are merged recursively.
fn deep_merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Create the config directory, its themes directory and a default
/// config file when missing.
pub fn ensure_config_files(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir.join(THEMES_DIR_NAME))
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        let content = toml::to_string_pretty(&GitdeckConfig::default())?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote default config");
    }
    Ok(())
}

/// A custom theme file: `fg`, `bg` and color tables keyed by
/// `Black`, `Red`, `Green`, `Yellow`, `Blue`, `Magenta`, `Cyan`, `White`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeFile {
    #[serde(default)]
    pub fg: String,
    #[serde(default)]
    pub bg: String,
    #[serde(default)]
    pub normal: HashMap<String, String>,
    #[serde(default)]
    pub bright: HashMap<String, String>,
    #[serde(default)]
    pub dark: HashMap<String, String>,
}

impl ThemeFile {
    pub fn palette(&self) -> Palette {
        let color = |table: &HashMap<String, String>, name: &str| {
            hex(table.get(name).map(String::as_str).unwrap_or(""))
        };
        Palette {
            black: color(&self.normal, "Black"),
            red: color(&self.normal, "Red"),
            green: color(&self.normal, "Green"),
            yellow: color(&self.normal, "Yellow"),
            blue: color(&self.normal, "Blue"),
            magenta: color(&self.normal, "Magenta"),
            cyan: color(&self.normal, "Cyan"),
            white: color(&self.normal, "White"),

            bright_black: color(&self.bright, "Black"),
            bright_red: color(&self.bright, "Red"),
            bright_green: color(&self.bright, "Green"),
            bright_yellow: color(&self.bright, "Yellow"),
            bright_blue: color(&self.bright, "Blue"),
            bright_magenta: color(&self.bright, "Magenta"),
            bright_cyan: color(&self.bright, "Cyan"),
            bright_white: color(&self.bright, "White"),

            dark_black: color(&self.dark, "Black"),
            dark_red: color(&self.dark, "Red"),
            dark_green: color(&self.dark, "Green"),
            dark_yellow: color(&self.dark, "Yellow"),
            dark_blue: color(&self.dark, "Blue"),
            dark_magenta: color(&self.dark, "Magenta"),
            dark_cyan: color(&self.dark, "Cyan"),
            dark_white: color(&self.dark, "White"),

            bg: hex(&self.bg),
            fg: hex(&self.fg),
        }
    }
}

/// Every `<name>.toml` in `<dir>/themes`, as (name, palette), sorted by name.
/// Files that fail to parse are skipped.
pub fn load_custom_palettes(dir: &Path) -> Vec<(String, Palette)> {
    let entries = match std::fs::read_dir(dir.join(THEMES_DIR_NAME)) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut palettes: Vec<(String, Palette)> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .filter_map(|path| {
            let name = path.file_stem()?.to_string_lossy().to_string();
            let content = std::fs::read_to_string(&path).ok()?;
            match toml::from_str::<ThemeFile>(&content) {
                Ok(file) => Some((name, file.palette())),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping theme");
                    None
                }
            }
        })
        .collect();
    palettes.sort_by(|a, b| a.0.cmp(&b.0));
    palettes
}
