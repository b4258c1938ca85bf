//! Identity of a disable/enable target.
//!
//! On disk a plugin-scoped target is the string `plugin:<plugin>:<server>`
//! stored in the global store; everything else is a bare name stored in the
//! local settings. The string is parsed once here and the mutator only sees
//! the structured form.

use std::fmt;

const PLUGIN_PREFIX: &str = "plugin:";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServerId {
    /// Persisted in `.claude/settings.local.json` → `deniedMcpServers`.
    Local(String),
    /// Persisted in `~/.claude.json` → `projects[<dir>].disabledMcpServers`.
    Plugin { plugin: String, server: String },
}

impl ServerId {
    /// Decode the on-disk form. Anything not matching
    /// `plugin:<non-empty>:<non-empty>` is a local name.
    pub fn parse(raw: &str) -> Self {
        raw.strip_prefix(PLUGIN_PREFIX)
            .and_then(|rest| rest.split_once(':'))
            .filter(|(plugin, server)| !plugin.is_empty() && !server.is_empty())
            .map(|(plugin, server)| Self::Plugin {
                plugin: plugin.to_string(),
                server: server.to_string(),
            })
            .unwrap_or_else(|| Self::Local(raw.to_string()))
    }

    pub fn local(name: impl Into<String>) -> Self {
        Self::Local(name.into())
    }

    pub fn plugin(plugin: impl Into<String>, server: impl Into<String>) -> Self {
        Self::Plugin {
            plugin: plugin.into(),
            server: server.into(),
        }
    }

    /// Name of the server itself, without the plugin qualifier.
    pub fn server_name(&self) -> &str {
        match self {
            Self::Local(name) => name,
            Self::Plugin { server, .. } => server,
        }
    }

    pub fn is_plugin(&self) -> bool {
        matches!(self, Self::Plugin { .. })
    }

    /// The string written to disk.
    pub fn encoded(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(name) => f.write_str(name),
            Self::Plugin { plugin, server } => write!(f, "{PLUGIN_PREFIX}{plugin}:{server}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plugin_scoped_names() {
        assert_eq!(
            ServerId::parse("plugin:linear:tracker"),
            ServerId::plugin("linear", "tracker")
        );
        // Only the first separator after the plugin name splits.
        assert_eq!(
            ServerId::parse("plugin:p:a:b"),
            ServerId::plugin("p", "a:b")
        );
    }

    #[test]
    fn incomplete_prefix_stays_local() {
        for raw in ["plugin:", "plugin:p", "plugin::s", "plugin:p:", "github", "plugins:p:s"] {
            assert_eq!(ServerId::parse(raw), ServerId::local(raw), "{raw}");
        }
    }

    #[test]
    fn display_restores_the_on_disk_form() {
        assert_eq!(ServerId::plugin("p", "y").encoded(), "plugin:p:y");
        assert_eq!(ServerId::local("x").encoded(), "x");
        assert_eq!(ServerId::plugin("p", "y").server_name(), "y");
    }
}
