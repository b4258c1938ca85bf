//! Discovery of MCP servers bundled with installed plugins.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::trace;

use crate::models::McpServersFile;
use crate::paths::plugin_mcp_path;
use crate::readers::Stores;
use crate::store::StoreIo;

/// Plugin name from a registry key: `"name@marketplace"` → `"name"`.
pub fn extract_plugin_name(plugin_key: &str) -> &str {
    plugin_key
        .split_once('@')
        .map_or(plugin_key, |(name, _)| name)
}

impl<S: StoreIo> Stores<S> {
    /// Server declarations bundled with one plugin.
    ///
    /// Plugin data is less authoritative than the user's own stores, so
    /// absence and parse failures are silent and yield an empty mapping.
    pub fn read_plugin_mcp_config(&self, install_path: &Path) -> Map<String, Value> {
        let path = plugin_mcp_path(install_path);
        let content = match self.io().read(&path) {
            Ok(Some(content)) => content,
            Ok(None) | Err(_) => return Map::new(),
        };
        match serde_json::from_str::<McpServersFile>(&content) {
            Ok(file) => file.mcp_servers.unwrap_or_default(),
            Err(e) => {
                trace!(path = %path.display(), error = %e, "Ignoring unparsable plugin config");
                Map::new()
            }
        }
    }

    /// Server name → owning plugin name.
    ///
    /// Only the first installation of each plugin is consulted. When two
    /// plugins declare the same server, the one listed first in the
    /// registry keeps it.
    pub fn plugin_mcp_servers(&self) -> BTreeMap<String, String> {
        let registry = self.read_installed_plugins();
        let mut owners = BTreeMap::new();

        for (key, install) in registry.first_installations() {
            let plugin = extract_plugin_name(key);
            for name in self.read_plugin_mcp_config(&install.install_path).keys() {
                owners
                    .entry(name.clone())
                    .or_insert_with(|| plugin.to_string());
            }
        }

        owners
    }
}
