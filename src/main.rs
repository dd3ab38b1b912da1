use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docgraph::config::Config;
use docgraph::dataset::{Dataset, DatasetError};
use docgraph::{NewUser, Store, StoreError, logging, snapshot};

/// docgraph - documents, tags and the semantic links between them
#[derive(Parser)]
#[command(name = "docgraph")]
#[command(about = "Inspect a document knowledge graph")]
#[command(version)]
struct Cli {
    /// Log filter (overrides DOCGRAPH_LOG)
    #[arg(long, global = true, value_name = "LEVEL")]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Manage the user snapshot
    #[command(subcommand)]
    Users(UsersCommand),
    /// Print the deduplicated graph of a dataset as JSON
    Graph(GraphCommand),
    /// Print graph statistics for a dataset as JSON
    Stats(GraphCommand),
}

#[derive(Subcommand)]
enum UsersCommand {
    /// Register a user in the snapshot
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        /// Pre-hashed credential, stored as given
        #[arg(long)]
        credential: String,
        /// Snapshot file (overrides DOCGRAPH_SNAPSHOT_PATH)
        #[arg(long, value_name = "PATH")]
        snapshot: Option<PathBuf>,
    },
    /// List users in the snapshot
    List {
        /// Snapshot file (overrides DOCGRAPH_SNAPSHOT_PATH)
        #[arg(long, value_name = "PATH")]
        snapshot: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GraphCommand {
    /// JSON dataset to load
    #[arg(long, value_name = "FILE")]
    dataset: PathBuf,

    /// Only include this user's documents (default: every document)
    #[arg(long, value_name = "USERNAME")]
    user: Option<String>,

    /// Drop edges weaker than this
    #[arg(long, value_name = "N")]
    min_strength: Option<u32>,

    /// Keep documents that have no edges
    #[arg(long)]
    keep_isolated: bool,
}

fn main() {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = Config::from_env();

    let level = cli.log.clone().unwrap_or_else(|| config.log_level.clone());
    if let Err(e) = logging::init(&level) {
        eprintln!("Warning: {e}");
    }

    let result = match &cli.command {
        Commands::Users(cmd) => handle_users(cmd, &config),
        Commands::Graph(cmd) => handle_graph(cmd, &config, false),
        Commands::Stats(cmd) => handle_graph(cmd, &config, true),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error was caused by the user's input rather than by
/// the environment (I/O, database).
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        if let Some(store) = cause.downcast_ref::<StoreError>() {
            return store.is_user_error();
        }
        cause
            .downcast_ref::<DatasetError>()
            .is_some_and(DatasetError::is_user_error)
    })
}

fn snapshot_path(flag: Option<&PathBuf>, config: &Config) -> Result<PathBuf> {
    flag.cloned()
        .or_else(|| config.snapshot_path.clone())
        .ok_or_else(|| anyhow::anyhow!("Failed to determine data directory; pass --snapshot"))
}

fn handle_users(cmd: &UsersCommand, config: &Config) -> Result<()> {
    match cmd {
        UsersCommand::Add {
            username,
            email,
            credential,
            snapshot,
        } => {
            let path = snapshot_path(snapshot.as_ref(), config)?;
            let store = load_store(&path)?;

            let user = store
                .create_user(NewUser::new(username, email, credential))
                .context("Failed to register user")?;
            snapshot::save_users(&store, &path)
                .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;

            println!("User created (id: {})", user.id);
            Ok(())
        }
        UsersCommand::List { snapshot } => {
            let path = snapshot_path(snapshot.as_ref(), config)?;
            let store = load_store(&path)?;

            for user in store.list_users() {
                println!("{}\t{}\t{}", user.id, user.username, user.email);
            }
            Ok(())
        }
    }
}

fn load_store(path: &Path) -> Result<Store> {
    let store = Store::new();
    snapshot::load_users(&store, path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    Ok(store)
}

fn handle_graph(cmd: &GraphCommand, config: &Config, stats_only: bool) -> Result<()> {
    let dataset = Dataset::from_path(&cmd.dataset)
        .with_context(|| format!("Failed to load dataset: {}", cmd.dataset.display()))?;

    let store = Store::new();
    let ids = dataset
        .load_into(&store)
        .context("Failed to import dataset")?;

    let mut options = config.graph_options();
    if let Some(min_strength) = cmd.min_strength {
        options = options.min_strength(min_strength);
    }
    if cmd.keep_isolated {
        options = options.keep_isolated(true);
    }

    let output = match &cmd.user {
        Some(username) => {
            let owner = ids
                .users
                .get(username)
                .copied()
                .ok_or_else(|| DatasetError::UnknownKey {
                    what: "user",
                    key: username.clone(),
                })?;
            let graph = store.document_graph(owner, options)?;
            if stats_only {
                serde_json::to_string_pretty(&graph.stats())?
            } else {
                serde_json::to_string_pretty(&graph)?
            }
        }
        None => {
            let all: Vec<_> = ids.documents.values().copied().collect();
            let graph = store.graph_for(&all, options);
            if stats_only {
                serde_json::to_string_pretty(&graph.stats())?
            } else {
                serde_json::to_string_pretty(&graph)?
            }
        }
    };

    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(json: &str) -> Result<()> {
        let dataset = Dataset::from_json(json).context("Failed to load dataset")?;
        dataset
            .load_into(&Store::new())
            .context("Failed to import dataset")?;
        Ok(())
    }

    #[test]
    fn email_clash_in_dataset_is_user_error() {
        let err = import(
            r#"{"users": [
                {"username": "x", "email": "x@e.com"},
                {"username": "y", "email": "X@E.com"}
            ]}"#,
        )
        .unwrap_err();

        assert!(is_user_error(&err), "{err:#}");
    }

    #[test]
    fn zero_strength_link_in_dataset_is_user_error() {
        let err = import(
            r#"{
                "users": [{"username": "ada", "email": "ada@example.com"}],
                "documents": [
                    {"key": "a", "owner": "ada", "title": "A", "filename": "a", "file_type": "md"},
                    {"key": "b", "owner": "ada", "title": "B", "filename": "b", "file_type": "md"}
                ],
                "links": [{"source": "a", "target": "b", "link_type": "x", "strength": 0}]
            }"#,
        )
        .unwrap_err();

        assert!(is_user_error(&err), "{err:#}");
    }

    #[test]
    fn empty_tag_name_in_dataset_is_user_error() {
        let err = import(
            r#"{
                "users": [{"username": "ada", "email": "ada@example.com"}],
                "documents": [
                    {"key": "a", "owner": "ada", "title": "A", "filename": "a", "file_type": "md",
                     "tags": ["ok", "  "]}
                ]
            }"#,
        )
        .unwrap_err();

        assert!(is_user_error(&err), "{err:#}");
    }

    #[test]
    fn unknown_dataset_key_is_user_error() {
        let err = import(r#"{"links": [{"source": "a", "target": "b", "link_type": "x"}]}"#)
            .unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn missing_dataset_file_is_not_user_error() {
        let err = Dataset::from_path(Path::new("/nonexistent/docgraph/dataset.json"))
            .context("Failed to load dataset")
            .unwrap_err();
        assert!(!is_user_error(&err));
    }
}
