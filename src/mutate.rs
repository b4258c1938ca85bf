//! Enable/disable edits, routed to the store that owns each target.
//!
//! Every edit is a read-modify-write of the whole document. Keys this tool
//! does not manage are carried through untouched.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::denied_name;
use crate::readers::Stores;
use crate::server_id::ServerId;
use crate::store::StoreIo;

const DENIED_KEY: &str = "deniedMcpServers";
const DISABLED_KEY: &str = "disabledMcpServers";
const PROJECTS_KEY: &str = "projects";

impl<S: StoreIo> Stores<S> {
    /// Replace both denial lists with `denied`.
    ///
    /// Local targets go to `deniedMcpServers` in the local settings, plugin
    /// targets to this project's `disabledMcpServers` in the global store.
    /// Both documents are written even when a list ends up empty or
    /// unchanged.
    pub fn update_local_config(&self, denied: &[ServerId]) -> Result<(), StoreError> {
        let (plugin, local): (Vec<&ServerId>, Vec<&ServerId>) =
            denied.iter().partition(|id| id.is_plugin());

        let local_path = self.paths().local_settings_path();
        let mut doc = self.read_document(&local_path).unwrap_or_default();
        let entries = local
            .iter()
            .map(|id| json!({ "serverName": id.server_name() }))
            .collect();
        doc.insert(DENIED_KEY.to_string(), Value::Array(entries));
        self.write_document(&local_path, &doc)?;

        let global_path = self.paths().global_config_path().to_path_buf();
        let mut doc = self.read_document(&global_path).unwrap_or_default();
        let entries = plugin.iter().map(|id| Value::String(id.encoded())).collect();
        self.with_project_section(&mut doc, |section| {
            section.insert(DISABLED_KEY.to_string(), Value::Array(entries));
        });
        self.write_document(&global_path, &doc)?;

        debug!(
            local = local.len(),
            plugin = plugin.len(),
            "Replaced MCP denial lists"
        );
        Ok(())
    }

    /// Remove `id` from its denial list. Returns whether anything changed.
    ///
    /// A missing document, section or list is left missing, and a list the
    /// removal empties is dropped together with any section it leaves empty.
    pub fn enable_server(&self, id: &ServerId) -> Result<bool, StoreError> {
        let path = match id {
            ServerId::Local(_) => self.paths().local_settings_path(),
            ServerId::Plugin { .. } => self.paths().global_config_path().to_path_buf(),
        };
        let Some(mut doc) = self.read_document(&path) else {
            return Ok(false);
        };

        let removed = match id {
            ServerId::Local(name) => remove_entry(&mut doc, DENIED_KEY, |v| {
                denied_name(v) == Some(name.as_str())
            }),
            ServerId::Plugin { .. } => {
                let encoded = id.encoded();
                let project = self.paths().project_key();
                match doc.get_mut(PROJECTS_KEY).and_then(Value::as_object_mut) {
                    Some(projects) => {
                        let removed = projects
                            .get_mut(&project)
                            .and_then(Value::as_object_mut)
                            .is_some_and(|section| {
                                remove_entry(section, DISABLED_KEY, |v| {
                                    v.as_str() == Some(encoded.as_str())
                                })
                            });
                        if removed {
                            drop_if_empty(projects, &project);
                        }
                        removed
                    }
                    None => false,
                }
            }
        };

        if removed {
            if id.is_plugin() {
                drop_if_empty(&mut doc, PROJECTS_KEY);
            }
            self.write_document(&path, &doc)?;
            debug!(server = %id, "Enabled MCP server");
        }
        Ok(removed)
    }

    /// Add `id` to its denial list, creating the document and structure as
    /// needed. Returns whether anything changed; duplicates are never added.
    pub fn disable_server(&self, id: &ServerId) -> Result<bool, StoreError> {
        let (path, added) = match id {
            ServerId::Local(name) => {
                let path = self.paths().local_settings_path();
                let mut doc = self.read_document(&path).unwrap_or_default();
                let added = with_array(&mut doc, DENIED_KEY, |list| {
                    push_unique(list, json!({ "serverName": name }), |v| {
                        denied_name(v) == Some(name.as_str())
                    })
                });
                (path, added.then_some(doc))
            }
            ServerId::Plugin { .. } => {
                let path = self.paths().global_config_path().to_path_buf();
                let mut doc = self.read_document(&path).unwrap_or_default();
                let encoded = id.encoded();
                let added = self.with_project_section(&mut doc, |section| {
                    with_array(section, DISABLED_KEY, |list| {
                        push_unique(list, Value::String(encoded.clone()), |v| {
                            v.as_str() == Some(encoded.as_str())
                        })
                    })
                });
                (path, added.then_some(doc))
            }
        };

        let Some(doc) = added else {
            return Ok(false);
        };
        self.write_document(&path, &doc)?;
        debug!(server = %id, "Disabled MCP server");
        Ok(true)
    }

    /// Run `f` on this project's section of the global document, created if
    /// absent.
    fn with_project_section<R>(
        &self,
        doc: &mut Map<String, Value>,
        f: impl FnOnce(&mut Map<String, Value>) -> R,
    ) -> R {
        let project = self.paths().project_key();
        with_object(doc, PROJECTS_KEY, |projects| with_object(projects, &project, f))
    }
}

fn push_unique(list: &mut Vec<Value>, entry: Value, is_same: impl Fn(&Value) -> bool) -> bool {
    if list.iter().any(is_same) {
        return false;
    }
    list.push(entry);
    true
}

/// Remove matching entries from the array at `key`, dropping the array if
/// that empties it.
fn remove_entry(
    parent: &mut Map<String, Value>,
    key: &str,
    matches: impl Fn(&Value) -> bool,
) -> bool {
    let Some(list) = parent.get_mut(key).and_then(Value::as_array_mut) else {
        return false;
    };
    let before = list.len();
    list.retain(|v| !matches(v));
    let removed = list.len() != before;
    if removed {
        drop_if_empty(parent, key);
    }
    removed
}

fn drop_if_empty(parent: &mut Map<String, Value>, key: &str) {
    let empty = match parent.get(key) {
        Some(Value::Array(list)) => list.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        _ => false,
    };
    if empty {
        parent.shift_remove(key);
    }
}

/// Run `f` on the object at `key`, inserting one (or replacing a value of
/// another type) first.
fn with_object<R>(
    parent: &mut Map<String, Value>,
    key: &str,
    f: impl FnOnce(&mut Map<String, Value>) -> R,
) -> R {
    let slot = parent
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    let mut map = match slot.take() {
        Value::Object(map) => map,
        _ => {
            warn!(key, "Replacing non-object config section");
            Map::new()
        }
    };
    let out = f(&mut map);
    *slot = Value::Object(map);
    out
}

/// Run `f` on the array at `key`, inserting one (or replacing a value of
/// another type) first.
fn with_array<R>(
    parent: &mut Map<String, Value>,
    key: &str,
    f: impl FnOnce(&mut Vec<Value>) -> R,
) -> R {
    let slot = parent.entry(key).or_insert_with(|| Value::Array(Vec::new()));
    let mut list = match slot.take() {
        Value::Array(list) => list,
        _ => {
            warn!(key, "Replacing non-array config list");
            Vec::new()
        }
    };
    let out = f(&mut list);
    *slot = Value::Array(list);
    out
}
