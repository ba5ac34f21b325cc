//! Runtime configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first; variables already
//! set in the process environment take precedence over it.

use std::path::PathBuf;

/// GraphQL endpoint serving the three tables.
pub const ENV_GRAPHQL_URL: &str = "REACHCHECK_GRAPHQL_URL";
/// Admin secret sent with GraphQL requests.
pub const ENV_ADMIN_SECRET: &str = "REACHCHECK_ADMIN_SECRET";
/// JSON snapshot file used instead of the endpoint.
pub const ENV_SNAPSHOT: &str = "REACHCHECK_SNAPSHOT";
/// Directory reports are written to.
pub const ENV_REPORT_DIR: &str = "REACHCHECK_REPORT_DIR";
/// When set, every port interaction is recorded under this directory.
pub const ENV_RECORD: &str = "REACHCHECK_RECORD";

const DEFAULT_REPORT_DIR: &str = ".reachcheck/reports";

/// Where rows come from and where reports go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// GraphQL endpoint URL.
    pub graphql_url: Option<String>,
    /// Admin secret for the endpoint.
    pub admin_secret: Option<String>,
    /// Snapshot file; wins over `graphql_url` when both are set.
    pub snapshot: Option<PathBuf>,
    /// Report output directory.
    pub report_dir: PathBuf,
    /// Cassette recording directory.
    pub record_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graphql_url: None,
            admin_secret: None,
            snapshot: None,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            record_dir: None,
        }
    }
}

/// Where the row source reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// A JSON snapshot file.
    Snapshot(PathBuf),
    /// A GraphQL endpoint.
    Graphql {
        /// Endpoint URL.
        url: String,
        /// Optional admin secret.
        admin_secret: Option<String>,
    },
}

impl Config {
    /// Loads `.env` (if present) and reads the `REACHCHECK_*` variables.
    #[must_use]
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            graphql_url: var(ENV_GRAPHQL_URL),
            admin_secret: var(ENV_ADMIN_SECRET),
            snapshot: var(ENV_SNAPSHOT).map(PathBuf::from),
            report_dir: var(ENV_REPORT_DIR)
                .map_or_else(|| PathBuf::from(DEFAULT_REPORT_DIR), PathBuf::from),
            record_dir: var(ENV_RECORD).map(PathBuf::from),
        }
    }

    /// Picks the row source: a snapshot if configured, otherwise the endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when neither is configured.
    pub fn source(&self) -> Result<SourceSpec, String> {
        if let Some(path) = &self.snapshot {
            return Ok(SourceSpec::Snapshot(path.clone()));
        }
        if let Some(url) = &self.graphql_url {
            return Ok(SourceSpec::Graphql {
                url: url.clone(),
                admin_secret: self.admin_secret.clone(),
            });
        }
        Err(format!(
            "No row source configured: pass --snapshot or --endpoint, \
             or set {ENV_SNAPSHOT} or {ENV_GRAPHQL_URL}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.report_dir, PathBuf::from(".reachcheck/reports"));
        assert!(config.source().is_err());
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            (ENV_GRAPHQL_URL, "http://localhost:8080/v1/graphql"),
            (ENV_ADMIN_SECRET, "s3cret"),
            (ENV_REPORT_DIR, "/tmp/reports"),
            (ENV_RECORD, "/tmp/cassettes"),
        ]));
        assert_eq!(
            config.source().unwrap(),
            SourceSpec::Graphql {
                url: "http://localhost:8080/v1/graphql".into(),
                admin_secret: Some("s3cret".into()),
            }
        );
        assert_eq!(config.report_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.record_dir, Some(PathBuf::from("/tmp/cassettes")));
    }

    #[test]
    fn snapshot_wins_over_endpoint() {
        let config = Config::from_lookup(lookup(&[
            (ENV_GRAPHQL_URL, "http://localhost:8080/v1/graphql"),
            (ENV_SNAPSHOT, "rows.json"),
        ]));
        assert_eq!(config.source().unwrap(), SourceSpec::Snapshot(PathBuf::from("rows.json")));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = Config::from_lookup(lookup(&[(ENV_GRAPHQL_URL, "  "), (ENV_REPORT_DIR, "")]));
        assert_eq!(config, Config::default());
    }
}
