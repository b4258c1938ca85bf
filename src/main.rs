//! mcp-toggle CLI

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::MultiSelect;
use mcp_toggle::{
    disable_servers, enable_servers, BatchOutcome, DisabledBy, OutcomeKind, Paths, ServerId,
    ServerStatus, Stores,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mcp-toggle")]
#[command(about = "Enable and disable MCP servers for the current project")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Project directory (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    project_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every known MCP server and where it is declared
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Enable one or more servers
    Enable {
        /// Server names (`plugin:<plugin>:<server>` for plugin servers)
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Disable one or more servers
    Disable {
        /// Server names (`plugin:<plugin>:<server>` for plugin servers)
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show which servers are enabled and what disabled the rest
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pick enabled servers from a checklist (default)
    Interactive,

    /// Show resolved store paths (for debugging)
    Paths,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut paths = Paths::resolve();
    if let Some(dir) = &cli.project_dir {
        paths = paths.with_project_dir(dir);
    }
    let stores = Stores::new(paths, mcp_toggle::FsStore);

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Paths => {
            let p = stores.paths();
            print_path("Global config:   ", p.global_config_path());
            print_path("Local settings:  ", &p.local_settings_path());
            print_path("Project .mcp.json:", &p.project_mcp_path());
            print_path("Plugin registry: ", p.plugins_registry_path());
            println!("Project key:       {}", p.project_key());
        }
        Commands::List { json } => {
            let servers = stores.servers_with_origins();
            if json {
                print_json(&servers);
                return;
            }
            if servers.is_empty() {
                println!("No MCP servers configured.");
                return;
            }
            println!("{:<32} {}", "NAME", "ORIGIN");
            println!("{}", "-".repeat(60));
            for s in &servers {
                println!("{:<32} {}", s.name, s.origin);
            }
        }
        Commands::Status { json } => {
            let statuses = stores.all_server_statuses();
            if json {
                print_json(&statuses);
                return;
            }
            if statuses.is_empty() {
                println!("No MCP servers configured.");
                return;
            }
            print_status_table(&statuses);
        }
        Commands::Enable { names } => {
            let outcomes = enable_servers(&stores, &names);
            report(&outcomes, "Enabled", "already enabled");
        }
        Commands::Disable { names } => {
            let outcomes = disable_servers(&stores, &names);
            report(&outcomes, "Disabled", "already disabled");
        }
        Commands::Interactive => run_interactive(&stores),
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_interactive(stores: &Stores) {
    let statuses = stores.all_server_statuses();
    if statuses.is_empty() {
        println!("No MCP servers configured.");
        return;
    }

    let items: Vec<String> = statuses
        .iter()
        .map(|s| match &s.origin {
            Some(origin) => format!("{} ({})", s.name, origin),
            None => s.name.clone(),
        })
        .collect();
    let defaults: Vec<bool> = statuses.iter().map(|s| s.enabled).collect();

    let selection = MultiSelect::new()
        .with_prompt("Select MCP servers to enable (space to toggle, enter to save)")
        .items(&items)
        .defaults(&defaults)
        .interact_opt();

    let selected = match selection {
        Ok(Some(indices)) => indices,
        Ok(None) => {
            println!("Cancelled, no changes made.");
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let denied: Vec<ServerId> = statuses
        .iter()
        .enumerate()
        .filter(|(i, _)| !selected.contains(i))
        .map(|(_, s)| s.server_id())
        .collect();

    match stores.update_local_config(&denied) {
        Ok(()) => println!(
            "{} {} enabled, {} disabled",
            "✓".green(),
            statuses.len() - denied.len(),
            denied.len()
        ),
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
    }
}

fn report(outcomes: &[BatchOutcome], done: &str, already: &str) {
    for o in outcomes {
        match &o.kind {
            OutcomeKind::Changed => println!("{} {} {}", "✓".green(), done, o.name),
            OutcomeKind::AlreadyInState => {
                println!("{} {} is {}", "!".yellow(), o.name, already)
            }
            OutcomeKind::Unknown => {
                eprintln!("{} Unknown MCP server: {}", "✗".red(), o.name)
            }
            OutcomeKind::Failed(message) => {
                eprintln!("{} {}: {}", "✗".red(), o.name, message)
            }
        }
    }
    if outcomes.iter().any(BatchOutcome::is_error) {
        std::process::exit(1);
    }
}

fn print_status_table(statuses: &[ServerStatus]) {
    println!("  {:<32} {:<20} {}", "NAME", "ORIGIN", "DISABLED BY");
    println!("{}", "-".repeat(72));
    for s in statuses {
        let marker = if s.enabled { "✓".green() } else { "✗".red() };
        let origin = s.origin.as_ref().map(ToString::to_string).unwrap_or_default();
        let by = match s.source {
            DisabledBy::None => String::new(),
            other => other.to_string(),
        };
        println!("{} {:<32} {:<20} {}", marker, s.name, origin, by);
    }

    let enabled = statuses.iter().filter(|s| s.enabled).count();
    println!();
    println!("{} enabled, {} disabled", enabled, statuses.len() - enabled);
}

fn print_path(label: &str, path: &std::path::Path) {
    println!("{} {} (exists: {})", label, path.display(), path.exists());
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
