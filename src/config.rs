//! Runtime configuration read from the environment.

use std::path::PathBuf;

use crate::graph::GraphOptions;

/// Gets the cross-platform default snapshot path.
///
/// Returns `{data_dir}/docgraph/users.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// Returns `None` if the data directory cannot be determined.
pub fn default_snapshot_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("docgraph").join("users.db"))
}

/// Settings for the `docgraph` binary.
///
/// Parsed from environment variables with fallback defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where the user snapshot is kept. `None` if no data directory could
    /// be determined and none was configured.
    pub snapshot_path: Option<PathBuf>,
    /// Log filter directive (default `warn`).
    pub log_level: String,
    /// Default edge threshold for graph output.
    pub min_strength: Option<u32>,
    /// Whether graph output keeps documents without edges.
    pub keep_isolated: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            log_level: "warn".to_string(),
            min_strength: None,
            keep_isolated: false,
        }
    }
}

impl Config {
    /// Parses configuration from environment variables.
    ///
    /// Falls back to defaults when env vars are not set or invalid.
    ///
    /// # Environment Variables
    ///
    /// - `DOCGRAPH_SNAPSHOT_PATH` (path, default `{data_dir}/docgraph/users.db`)
    /// - `DOCGRAPH_LOG` (log filter, default `warn`)
    /// - `DOCGRAPH_MIN_STRENGTH` (u32, default unset)
    /// - `DOCGRAPH_KEEP_ISOLATED` (bool, default `false`)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let snapshot_path = std::env::var_os("DOCGRAPH_SNAPSHOT_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or(defaults.snapshot_path);

        let log_level = std::env::var("DOCGRAPH_LOG")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.log_level);

        let min_strength = std::env::var("DOCGRAPH_MIN_STRENGTH")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        let keep_isolated = std::env::var("DOCGRAPH_KEEP_ISOLATED")
            .ok()
            .and_then(|s| parse_bool(&s))
            .unwrap_or(defaults.keep_isolated);

        Self {
            snapshot_path,
            log_level,
            min_strength,
            keep_isolated,
        }
    }

    /// Graph options from the configured defaults.
    pub fn graph_options(&self) -> GraphOptions {
        GraphOptions {
            min_strength: self.min_strength,
            keep_isolated: self.keep_isolated,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
