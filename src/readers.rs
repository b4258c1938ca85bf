//! Store readers and the raw document read/write used by the mutator.
//!
//! Reads are total: a missing, unreadable or malformed document becomes the
//! structural default. Only user-owned stores log about it.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::error::StoreError;
use crate::models::{GlobalConfig, InstalledPlugins, LocalSettings, McpServersFile};
use crate::paths::Paths;
use crate::store::{FsStore, StoreIo};

/// The four stores of one project, read fresh on every call.
#[derive(Debug, Clone)]
pub struct Stores<S = FsStore> {
    paths: Paths,
    io: S,
}

impl Stores<FsStore> {
    /// Filesystem-backed stores at the environment-resolved paths.
    pub fn from_env() -> Self {
        Self::new(Paths::resolve(), FsStore)
    }
}

impl<S: StoreIo> Stores<S> {
    pub fn new(paths: Paths, io: S) -> Self {
        Self { paths, io }
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn io(&self) -> &S {
        &self.io
    }

    /// `~/.claude.json`.
    pub fn read_global(&self) -> GlobalConfig {
        self.read_typed(self.paths.global_config_path())
    }

    /// `.claude/settings.local.json` of the current project.
    pub fn read_local(&self) -> LocalSettings {
        self.read_typed(&self.paths.local_settings_path())
    }

    /// `.mcp.json` of the current project.
    pub fn read_project_mcp(&self) -> McpServersFile {
        self.read_typed(&self.paths.project_mcp_path())
    }

    /// `installed_plugins.json`.
    pub fn read_installed_plugins(&self) -> InstalledPlugins {
        self.read_typed(self.paths.plugins_registry_path())
    }

    fn read_typed<T: DeserializeOwned + Default>(&self, path: &Path) -> T {
        let Some(content) = self.read_logged(path) else {
            return T::default();
        };
        match serde_json::from_str(&content) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                T::default()
            }
        }
    }

    fn read_logged(&self, path: &Path) -> Option<String> {
        match self.io.read(path) {
            Ok(Some(content)) => {
                debug!(path = %path.display(), "Read config");
                Some(content)
            }
            Ok(None) => {
                debug!(path = %path.display(), "Config not found, using defaults");
                None
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read config, using defaults");
                None
            }
        }
    }

    /// Raw document for read-modify-write. Anything that is not a JSON
    /// object is treated as an empty one.
    pub(crate) fn read_document(&self, path: &Path) -> Option<Map<String, Value>> {
        let content = self.read_logged(path)?;
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => {
                error!(path = %path.display(), "Config root is not an object, treating as empty");
                Some(Map::new())
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to parse config, treating as empty");
                Some(Map::new())
            }
        }
    }

    /// Serialize with two-space indentation and a trailing newline.
    pub(crate) fn write_document(
        &self,
        path: &Path,
        doc: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut output = serde_json::to_string_pretty(doc)?;
        output.push('\n');
        self.io
            .write(path, &output)
            .map_err(|e| StoreError::io(path, e))?;
        debug!(path = %path.display(), "Wrote config");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::path::PathBuf;

    pub(crate) const HOME: &str = "/home/u";
    pub(crate) const PROJECT: &str = "/work/app";

    pub(crate) fn paths() -> Paths {
        Paths::for_roots(Path::new(HOME), Path::new(PROJECT))
    }

    pub(crate) fn stores(mem: &MemoryStore) -> Stores<&MemoryStore> {
        Stores::new(paths(), mem)
    }

    pub(crate) fn global_path() -> PathBuf {
        paths().global_config
    }

    pub(crate) fn local_path() -> PathBuf {
        paths().local_settings_path()
    }

    pub(crate) fn project_mcp_path() -> PathBuf {
        paths().project_mcp_path()
    }

    pub(crate) fn registry_path() -> PathBuf {
        paths().plugins_registry
    }

    #[test]
    fn missing_stores_read_as_defaults() {
        let mem = MemoryStore::new();
        let stores = stores(&mem);

        assert!(stores.read_global().mcp_servers.is_none());
        assert!(stores.read_local().denied_mcp_servers.is_none());
        assert!(stores.read_project_mcp().mcp_servers.is_none());
        let registry = stores.read_installed_plugins();
        assert_eq!(registry.version, 2);
        assert!(registry.plugins.is_empty());
    }

    #[test]
    fn corrupt_stores_read_as_defaults() {
        let mem = MemoryStore::new()
            .with_file(global_path(), "{ not json")
            .with_file(local_path(), "[1, 2")
            .with_file(registry_path(), "\"just a string\"");
        let stores = stores(&mem);

        assert!(stores.read_global().projects.is_none());
        assert!(!stores.read_local().is_denied("x"));
        assert!(stores.read_installed_plugins().plugins.is_empty());
    }

    #[test]
    fn reads_declared_servers() {
        let mem = MemoryStore::new().with_file(
            project_mcp_path(),
            json!({"mcpServers": {"db": {"command": "pg"}}}).to_string(),
        );

        let names: Vec<_> = stores(&mem).read_project_mcp().servers().cloned().collect();
        assert_eq!(names, ["db"]);
    }

    #[test]
    fn non_object_document_is_treated_as_empty() {
        let mem = MemoryStore::new().with_file(global_path(), "[]");

        let doc = stores(&mem).read_document(&global_path()).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn written_documents_end_with_newline() {
        let mem = MemoryStore::new();
        let mut doc = Map::new();
        doc.insert("a".into(), json!(1));

        stores(&mem).write_document(&local_path(), &doc).unwrap();

        assert_eq!(mem.get(&local_path()).unwrap(), "{\n  \"a\": 1\n}\n");
    }
}
