//! Merged, origin-tagged catalog of every known server name.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::models::GlobalConfig;
use crate::readers::Stores;
use crate::server_id::ServerId;
use crate::store::StoreIo;

/// Store category that first produced a server name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "plugin", rename_all = "lowercase")]
pub enum ServerOrigin {
    /// Top-level `mcpServers` of `~/.claude.json`.
    Global,
    /// This project's section of `~/.claude.json`.
    Project,
    /// The checked-in `.mcp.json`.
    Local,
    /// Bundled with the named plugin.
    Plugin(String),
}

impl fmt::Display for ServerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Project => f.write_str("project"),
            Self::Local => f.write_str("local"),
            Self::Plugin(name) => write!(f, "plugin:{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerRecord {
    pub name: String,
    pub origin: ServerOrigin,
}

impl ServerRecord {
    pub fn new(name: impl Into<String>, origin: ServerOrigin) -> Self {
        Self {
            name: name.into(),
            origin,
        }
    }

    /// Target used to disable or enable this server.
    pub fn server_id(&self) -> ServerId {
        match &self.origin {
            ServerOrigin::Plugin(plugin) => ServerId::plugin(plugin, &self.name),
            _ => ServerId::local(&self.name),
        }
    }
}

/// A place server names are declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    GlobalServers,
    ProjectSection,
    ProjectFile,
    Plugins,
}

/// Attribution order: a name keeps the origin of the earliest source here.
pub const SOURCE_PRIORITY: [Source; 4] = [
    Source::GlobalServers,
    Source::ProjectSection,
    Source::ProjectFile,
    Source::Plugins,
];

/// First-write-wins merge. Later duplicates neither add a record nor
/// change the origin. The result is sorted by name, byte-wise.
pub fn merge_first_wins<I>(entries: I) -> Vec<ServerRecord>
where
    I: IntoIterator<Item = ServerRecord>,
{
    let mut seen: BTreeMap<String, ServerOrigin> = BTreeMap::new();
    for record in entries {
        seen.entry(record.name).or_insert(record.origin);
    }
    seen.into_iter()
        .map(|(name, origin)| ServerRecord { name, origin })
        .collect()
}

impl<S: StoreIo> Stores<S> {
    /// Every known server with the origin that first declared it.
    pub fn servers_with_origins(&self) -> Vec<ServerRecord> {
        let global = self.read_global();
        let project_key = self.paths().project_key();

        merge_first_wins(
            SOURCE_PRIORITY
                .iter()
                .flat_map(|source| self.source_records(*source, &global, &project_key)),
        )
    }

    /// Sorted server names.
    pub fn available_servers(&self) -> Vec<String> {
        self.servers_with_origins()
            .into_iter()
            .map(|record| record.name)
            .collect()
    }

    pub fn has_mcp_servers(&self) -> bool {
        !self.servers_with_origins().is_empty()
    }

    fn source_records(
        &self,
        source: Source,
        global: &GlobalConfig,
        project_key: &str,
    ) -> Vec<ServerRecord> {
        match source {
            Source::GlobalServers => global
                .servers()
                .map(|name| ServerRecord::new(name, ServerOrigin::Global))
                .collect(),
            Source::ProjectSection => global
                .project(project_key)
                .servers()
                .map(|name| ServerRecord::new(name, ServerOrigin::Project))
                .collect(),
            Source::ProjectFile => self
                .read_project_mcp()
                .servers()
                .map(|name| ServerRecord::new(name, ServerOrigin::Local))
                .collect(),
            Source::Plugins => self
                .plugin_mcp_servers()
                .into_iter()
                .map(|(name, plugin)| ServerRecord::new(name, ServerOrigin::Plugin(plugin)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::tests::{global_path, project_mcp_path, registry_path, stores, PROJECT};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn origins(records: &[ServerRecord]) -> Vec<(&str, String)> {
        records
            .iter()
            .map(|r| (r.name.as_str(), r.origin.to_string()))
            .collect()
    }

    #[test]
    fn merge_keeps_first_origin() {
        let merged = merge_first_wins([
            ServerRecord::new("b", ServerOrigin::Global),
            ServerRecord::new("a", ServerOrigin::Project),
            ServerRecord::new("b", ServerOrigin::Plugin("p".into())),
            ServerRecord::new("a", ServerOrigin::Local),
        ]);

        assert_eq!(
            merged,
            [
                ServerRecord::new("a", ServerOrigin::Project),
                ServerRecord::new("b", ServerOrigin::Global),
            ]
        );
    }

    #[test]
    fn sorting_is_byte_wise() {
        let merged = merge_first_wins(
            ["beta", "Zeta", "alpha", "_x", "10", "9"]
                .into_iter()
                .map(|n| ServerRecord::new(n, ServerOrigin::Global)),
        );
        let names: Vec<_> = merged.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, ["10", "9", "Zeta", "_x", "alpha", "beta"]);
    }

    #[test]
    fn global_declaration_beats_plugin() {
        let mem = MemoryStore::new()
            .with_file(
                global_path(),
                json!({"mcpServers": {"github": {}}}).to_string(),
            )
            .with_file(
                registry_path(),
                json!({"version": 2, "plugins": {"gh@m": [{"installPath": "/p/gh"}]}})
                    .to_string(),
            )
            .with_file(
                "/p/gh/.mcp.json",
                json!({"mcpServers": {"github": {}, "issues": {}}}).to_string(),
            );

        let records = stores(&mem).servers_with_origins();

        assert_eq!(
            origins(&records),
            [
                ("github", "global".to_string()),
                ("issues", "plugin:gh".to_string())
            ]
        );
    }

    #[test]
    fn merges_all_four_sources_in_priority_order() {
        let mem = MemoryStore::new()
            .with_file(
                global_path(),
                json!({
                    "mcpServers": {"zed": {}},
                    "projects": {
                        PROJECT: {"mcpServers": {"db": {}, "zed": {}}},
                        "/elsewhere": {"mcpServers": {"unrelated": {}}}
                    }
                })
                .to_string(),
            )
            .with_file(
                project_mcp_path(),
                json!({"mcpServers": {"db": {}, "cache": {}}}).to_string(),
            );

        let records = stores(&mem).servers_with_origins();

        assert_eq!(
            origins(&records),
            [
                ("cache", "local".to_string()),
                ("db", "project".to_string()),
                ("zed", "global".to_string())
            ]
        );
    }

    #[test]
    fn empty_when_nothing_exists() {
        let mem = MemoryStore::new();
        let stores = stores(&mem);

        assert!(!stores.has_mcp_servers());
        assert!(stores.available_servers().is_empty());
    }

    #[test]
    fn available_servers_are_sorted() {
        let mem = MemoryStore::new().with_file(
            global_path(),
            json!({"mcpServers": {"zulu": {}, "alpha": {}, "mike": {}}}).to_string(),
        );

        assert_eq!(stores(&mem).available_servers(), ["alpha", "mike", "zulu"]);
    }

    #[test]
    fn plugin_records_disable_through_qualified_id() {
        let record = ServerRecord::new("y", ServerOrigin::Plugin("p".into()));
        assert_eq!(record.server_id(), ServerId::plugin("p", "y"));

        let record = ServerRecord::new("x", ServerOrigin::Project);
        assert_eq!(record.server_id(), ServerId::local("x"));
    }
}
