//! Enabled/disabled resolution and attribution.

use std::fmt;

use serde::Serialize;

use crate::catalog::ServerOrigin;
use crate::readers::Stores;
use crate::server_id::ServerId;
use crate::store::StoreIo;

/// Store responsible for a server being disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisabledBy {
    Local,
    Global,
    None,
}

impl fmt::Display for DisabledBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Global => "global",
            Self::None => "none",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerStatus {
    pub name: String,
    pub enabled: bool,
    pub source: DisabledBy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<ServerOrigin>,
}

impl ServerStatus {
    /// Target used to flip this server, based on its catalog origin.
    pub fn server_id(&self) -> ServerId {
        match &self.origin {
            Some(ServerOrigin::Plugin(plugin)) => ServerId::plugin(plugin, &self.name),
            _ => ServerId::local(&self.name),
        }
    }
}

impl<S: StoreIo> Stores<S> {
    /// Status of a name as written in the denial lists.
    ///
    /// The local denial list is checked first; a name denied in both
    /// stores is attributed to `local` only.
    pub fn server_status(&self, name: &str) -> ServerStatus {
        let source = if self.read_local().is_denied(name) {
            DisabledBy::Local
        } else if self
            .read_global()
            .project(&self.paths().project_key())
            .is_disabled(name)
        {
            DisabledBy::Global
        } else {
            DisabledBy::None
        };

        ServerStatus {
            name: name.to_string(),
            enabled: source == DisabledBy::None,
            source,
            origin: None,
        }
    }

    /// Status of every catalog entry, in catalog order.
    ///
    /// Plugin servers are looked up by their `plugin:<plugin>:<name>` key,
    /// which is how their disables are persisted.
    pub fn all_server_statuses(&self) -> Vec<ServerStatus> {
        self.servers_with_origins()
            .into_iter()
            .map(|record| {
                let status = self.server_status(&record.server_id().encoded());
                ServerStatus {
                    name: record.name,
                    origin: Some(record.origin),
                    ..status
                }
            })
            .collect()
    }
}
