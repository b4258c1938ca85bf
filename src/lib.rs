//! mcp-toggle - MCP server enable/disable across Claude's config stores
//!
//! Resolves server declarations from the machine-wide config, this
//! project's section of it, the checked-in `.mcp.json` and installed
//! plugins, and edits the denial lists that switch them off.

pub mod batch;
pub mod catalog;
pub mod error;
pub mod models;
pub mod mutate;
pub mod paths;
pub mod plugins;
pub mod readers;
pub mod server_id;
pub mod status;
pub mod store;

pub use batch::{disable_servers, enable_servers, resolve_target, BatchOutcome, OutcomeKind};
pub use catalog::{merge_first_wins, ServerOrigin, ServerRecord, Source, SOURCE_PRIORITY};
pub use error::StoreError;
pub use paths::Paths;
pub use plugins::extract_plugin_name;
pub use readers::Stores;
pub use server_id::ServerId;
pub use status::{DisabledBy, ServerStatus};
pub use store::{FsStore, MemoryStore, StoreIo};
