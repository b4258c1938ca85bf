//! Typed views of the on-disk documents.
//!
//! These are only used for resolution. Mutation edits the raw JSON so that
//! keys this tool does not know about survive a rewrite.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Machine-wide store at `~/.claude.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    #[serde(default, deserialize_with = "object_or_none")]
    pub mcp_servers: Option<Map<String, Value>>,
    /// Keyed by absolute project path. Sections are decoded lazily so one
    /// odd-looking project cannot hide the others.
    #[serde(default, deserialize_with = "object_or_none")]
    pub projects: Option<Map<String, Value>>,
}

impl GlobalConfig {
    /// Top-level server declarations.
    pub fn servers(&self) -> impl Iterator<Item = &String> {
        self.mcp_servers.iter().flat_map(|m| m.keys())
    }

    /// Section for one project; default when missing or malformed.
    pub fn project(&self, key: &str) -> ProjectSection {
        self.projects
            .as_ref()
            .and_then(|p| p.get(key))
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// Per-project section of the global store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSection {
    #[serde(default, deserialize_with = "object_or_none")]
    pub mcp_servers: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "array_or_none")]
    pub disabled_mcp_servers: Option<Vec<Value>>,
}

impl ProjectSection {
    pub fn servers(&self) -> impl Iterator<Item = &String> {
        self.mcp_servers.iter().flat_map(|m| m.keys())
    }

    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled_mcp_servers
            .as_ref()
            .is_some_and(|list| list.iter().any(|n| n.as_str() == Some(name)))
    }
}

/// Project-owned settings at `.claude/settings.local.json`.
///
/// Denial entries are kept raw; an entry of neither accepted shape is
/// ignored without hiding the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSettings {
    #[serde(
        default,
        deserialize_with = "array_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub denied_mcp_servers: Option<Vec<Value>>,
}

impl LocalSettings {
    pub fn is_denied(&self, name: &str) -> bool {
        self.denied_names().any(|n| n == name)
    }

    pub fn denied_names(&self) -> impl Iterator<Item = &str> {
        self.denied_mcp_servers
            .iter()
            .flatten()
            .filter_map(denied_name)
    }
}

/// Server name of a `deniedMcpServers` entry, either `{"serverName": …}`
/// or a bare string.
pub fn denied_name(entry: &Value) -> Option<&str> {
    entry
        .get("serverName")
        .and_then(Value::as_str)
        .or_else(|| entry.as_str())
}

fn object_or_none<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => Some(map),
        _ => None,
    })
}

fn array_or_none<'de, D>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(list) => Some(list),
        _ => None,
    })
}

/// `.mcp.json`, both the checked-in project file and the per-plugin file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServersFile {
    pub mcp_servers: Option<Map<String, Value>>,
}

impl McpServersFile {
    pub fn servers(&self) -> impl Iterator<Item = &String> {
        self.mcp_servers.iter().flat_map(|m| m.keys())
    }
}

/// Installed-plugins registry (`installed_plugins.json`, version 2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledPlugins {
    #[serde(default = "registry_version")]
    pub version: u32,
    /// `"name@marketplace"` → installations, in file order.
    #[serde(default)]
    pub plugins: Map<String, Value>,
}

impl Default for InstalledPlugins {
    fn default() -> Self {
        Self {
            version: registry_version(),
            plugins: Map::new(),
        }
    }
}

fn registry_version() -> u32 {
    2
}

impl InstalledPlugins {
    /// First installation record of every plugin, in registry order.
    /// Plugins without a usable first record are skipped.
    pub fn first_installations(&self) -> Vec<(&str, PluginInstallation)> {
        self.plugins
            .iter()
            .filter_map(|(key, installs)| {
                let first = installs.as_array()?.first()?;
                let install = serde_json::from_value(first.clone()).ok()?;
                Some((key.as_str(), install))
            })
            .collect()
    }
}

/// A single installation of a plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInstallation {
    pub install_path: PathBuf,
}
