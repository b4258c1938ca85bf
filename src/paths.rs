//! Path resolution for the four configuration stores.
//!
//! Uses env vars when set, otherwise the home directory and the current
//! working directory.

use std::path::{Path, PathBuf};

/// Resolved locations of every store this tool reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub global_config: PathBuf,
    pub plugins_registry: PathBuf,
    pub project_dir: PathBuf,
}

impl Paths {
    /// Resolve paths from environment, falling back to `~` and the cwd.
    pub fn resolve() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| expand_tilde("~"));
        let defaults = Self::for_roots(&home, &current_dir());

        let global_config = resolve_path("MCP_TOGGLE_GLOBAL_CONFIG", defaults.global_config);
        let plugins_registry =
            resolve_path("MCP_TOGGLE_PLUGINS_REGISTRY", defaults.plugins_registry);
        let project_dir = absolute(&resolve_path("MCP_TOGGLE_PROJECT_DIR", defaults.project_dir));

        Self {
            global_config,
            plugins_registry,
            project_dir,
        }
    }

    /// Paths rooted at an explicit home directory and project directory.
    pub fn for_roots(home: &Path, project_dir: &Path) -> Self {
        Self {
            global_config: home.join(".claude.json"),
            plugins_registry: home.join(".claude").join("plugins").join("installed_plugins.json"),
            project_dir: project_dir.to_path_buf(),
        }
    }

    /// Replace the project directory (e.g. from `--project-dir`).
    pub fn with_project_dir(mut self, project_dir: &Path) -> Self {
        self.project_dir = absolute(&expand_tilde(&project_dir.to_string_lossy()));
        self
    }

    /// Machine-wide store (`~/.claude.json`).
    pub fn global_config_path(&self) -> &Path {
        &self.global_config
    }

    /// Installed-plugins registry.
    pub fn plugins_registry_path(&self) -> &Path {
        &self.plugins_registry
    }

    /// Project-owned, usually git-ignored settings.
    pub fn local_settings_path(&self) -> PathBuf {
        self.project_dir.join(".claude").join("settings.local.json")
    }

    /// Checked-in project server declarations.
    pub fn project_mcp_path(&self) -> PathBuf {
        self.project_dir.join(".mcp.json")
    }

    /// Key of this project's section inside the global store's `projects` map.
    pub fn project_key(&self) -> String {
        self.project_dir.to_string_lossy().into_owned()
    }
}

/// Bundled server declarations of one installed plugin.
pub fn plugin_mcp_path(install_path: &Path) -> PathBuf {
    install_path.join(".mcp.json")
}

fn resolve_path(env_var: &str, default: PathBuf) -> PathBuf {
    if let Ok(val) = std::env::var(env_var) {
        let trimmed = val.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }
    default
}

fn expand_tilde(path: &str) -> PathBuf {
    let expanded = shellexpand::tilde(path);
    PathBuf::from(expanded.as_ref())
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        current_dir().join(path)
    }
}
