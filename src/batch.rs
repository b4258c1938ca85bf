//! Per-name enable/disable over a list of user-supplied names.
//!
//! Each name is validated against the catalog and applied on its own; an
//! unknown name or a failed write is recorded and the rest still run.

use tracing::error;

use crate::catalog::ServerRecord;
use crate::readers::Stores;
use crate::server_id::ServerId;
use crate::store::StoreIo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Enable,
    Disable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    Changed,
    /// Already enabled/disabled; nothing was written.
    AlreadyInState,
    Unknown,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub name: String,
    pub kind: OutcomeKind,
}

impl BatchOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self.kind, OutcomeKind::Unknown | OutcomeKind::Failed(_))
    }
}

pub fn enable_servers<S: StoreIo>(stores: &Stores<S>, names: &[String]) -> Vec<BatchOutcome> {
    apply(stores, names, Action::Enable)
}

pub fn disable_servers<S: StoreIo>(stores: &Stores<S>, names: &[String]) -> Vec<BatchOutcome> {
    apply(stores, names, Action::Disable)
}

/// Map a user-supplied name onto a catalog entry.
///
/// A bare name resolves to whatever declared it; `plugin:<p>:<s>` must
/// match a server `s` bundled by plugin `p`.
pub fn resolve_target(catalog: &[ServerRecord], name: &str) -> Option<ServerId> {
    let wanted = ServerId::parse(name);
    catalog
        .iter()
        .find(|record| match &wanted {
            ServerId::Local(bare) => record.name == *bare,
            ServerId::Plugin { .. } => record.server_id() == wanted,
        })
        .map(ServerRecord::server_id)
}

fn apply<S: StoreIo>(stores: &Stores<S>, names: &[String], action: Action) -> Vec<BatchOutcome> {
    let catalog = stores.servers_with_origins();

    names
        .iter()
        .map(|name| {
            let kind = match resolve_target(&catalog, name) {
                None => OutcomeKind::Unknown,
                Some(id) => {
                    let result = match action {
                        Action::Enable => stores.enable_server(&id),
                        Action::Disable => stores.disable_server(&id),
                    };
                    match result {
                        Ok(true) => OutcomeKind::Changed,
                        Ok(false) => OutcomeKind::AlreadyInState,
                        Err(e) => {
                            error!(server = %id, error = %e, "Failed to update MCP server");
                            OutcomeKind::Failed(e.to_string())
                        }
                    }
                }
            };
            BatchOutcome {
                name: name.clone(),
                kind,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ServerOrigin;
    use crate::readers::tests::{global_path, local_path, registry_path, stores, PROJECT};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn seeded() -> MemoryStore {
        MemoryStore::new()
            .with_file(
                global_path(),
                json!({"mcpServers": {"github": {}, "linear": {}}}).to_string(),
            )
            .with_file(
                registry_path(),
                json!({"version": 2, "plugins": {"p@m": [{"installPath": "/p"}]}}).to_string(),
            )
            .with_file("/p/.mcp.json", json!({"mcpServers": {"y": {}}}).to_string())
    }

    #[test]
    fn resolves_bare_and_qualified_names() {
        let catalog = vec![
            ServerRecord::new("github", ServerOrigin::Global),
            ServerRecord::new("y", ServerOrigin::Plugin("p".into())),
        ];

        assert_eq!(resolve_target(&catalog, "github"), Some(ServerId::local("github")));
        assert_eq!(resolve_target(&catalog, "y"), Some(ServerId::plugin("p", "y")));
        assert_eq!(resolve_target(&catalog, "plugin:p:y"), Some(ServerId::plugin("p", "y")));
        assert_eq!(resolve_target(&catalog, "plugin:q:y"), None);
        assert_eq!(resolve_target(&catalog, "nope"), None);
    }

    #[test]
    fn each_name_is_reported_independently() {
        let mem = seeded();
        let stores = stores(&mem);

        let outcomes = disable_servers(&stores, &names(&["github", "missing", "y", "github"]));

        let kinds: Vec<_> = outcomes.iter().map(|o| o.kind.clone()).collect();
        assert_eq!(
            kinds,
            [
                OutcomeKind::Changed,
                OutcomeKind::Unknown,
                OutcomeKind::Changed,
                OutcomeKind::AlreadyInState,
            ]
        );
        assert_eq!(
            mem.json(&local_path()).unwrap(),
            json!({"deniedMcpServers": [{"serverName": "github"}]})
        );
        assert_eq!(
            mem.json(&global_path()).unwrap()["projects"][PROJECT],
            json!({"disabledMcpServers": ["plugin:p:y"]})
        );
    }

    #[test]
    fn enabling_an_enabled_server_is_not_an_error() {
        let mem = seeded();

        let outcomes = enable_servers(&stores(&mem), &names(&["linear"]));

        assert_eq!(outcomes[0].kind, OutcomeKind::AlreadyInState);
        assert!(!outcomes[0].is_error());
        assert!(mem.get(&local_path()).is_none());
    }

    #[test]
    fn write_failure_does_not_stop_the_batch() {
        let mem = seeded();
        mem.set_read_only(true);

        let outcomes = disable_servers(&stores(&mem), &names(&["github", "linear"]));

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| matches!(o.kind, OutcomeKind::Failed(_))));
        assert!(outcomes.iter().all(BatchOutcome::is_error));
    }
}
