//! Command dispatch and handlers.

pub mod check;
pub mod stats;

use std::path::Path;

use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::cli::{Command, SourceArgs};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::graph::Rows;

/// Dispatch a parsed command to its handler.
///
/// When `REACHCHECK_RECORD` is set to a directory, every port interaction
/// is recorded to per-port cassettes in a timestamped subdirectory.
///
/// # Errors
///
/// Returns an error string if the context cannot be built, the handler
/// fails, or the check produced findings.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let mut config = Config::from_env();
    let source = match command {
        Command::Check(args) => {
            if let Some(dir) = &args.report_dir {
                config.report_dir.clone_from(dir);
            }
            &args.source
        }
        Command::Stats(source) => source,
    };
    apply_source_overrides(&mut config, source);

    let (ctx, session) = if let Some(cassette) = &source.replay {
        (replaying_context(cassette)?, None)
    } else {
        open_live_context(&config)?
    };

    let result = dispatch_with_context(command, &ctx);

    // Finish recording even when the command failed
    if let Some(session) = session {
        // Recording adapters hold Arc clones of the recorders
        drop(ctx);
        return finish_recording(result, session);
    }

    result
}

/// Builds the live context, wrapped for recording when `record_dir` is set.
///
/// The session directory is only created once the live context is known to work.
fn open_live_context(
    config: &Config,
) -> Result<(ServiceContext, Option<RecordingSession>), String> {
    let ctx = ServiceContext::live(config)?;
    match &config.record_dir {
        Some(dir) => {
            let session = RecordingSession::new(dir)?;
            Ok((ctx.recorded_by(&session), Some(session)))
        }
        None => Ok((ctx, None)),
    }
}

/// Writes the session's cassettes. The command's own error takes precedence
/// over a failure to save the recording.
fn finish_recording(result: Result<(), String>, session: RecordingSession) -> Result<(), String> {
    let saved = session.finish();
    match &saved {
        Ok(dir) => tracing::info!(dir = %dir.display(), "recording saved"),
        Err(e) => tracing::error!("{e}"),
    }
    result.and(saved.map(|_| ()))
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    match command {
        Command::Check(args) => check::run(ctx, args.always_report),
        Command::Stats(_) => stats::run(ctx),
    }
}

fn apply_source_overrides(config: &mut Config, source: &SourceArgs) {
    if let Some(path) = &source.snapshot {
        config.snapshot = Some(path.clone());
    }
    if let Some(url) = &source.endpoint {
        config.graphql_url = Some(url.clone());
        // An explicit endpoint beats a snapshot from the environment
        config.snapshot = None;
    }
}

/// A recording directory replays per port; anything else is one cassette.
fn replaying_context(cassette: &Path) -> Result<ServiceContext, String> {
    if cassette.is_dir() {
        ServiceContext::replaying_from(&CassetteConfig::from_session_dir(cassette))
    } else {
        ServiceContext::replaying(cassette)
    }
}

/// Fetches a snapshot from the row source, blocking on a current-thread runtime.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or the fetch fails.
pub fn fetch_rows(ctx: &ServiceContext) -> Result<Rows, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    let rows = runtime
        .block_on(ctx.rows.fetch_all())
        .map_err(|e| format!("Failed to fetch rows: {e}"))?;
    tracing::info!(
        nodes = rows.nodes.len(),
        links = rows.links.len(),
        indexes = rows.indexes.len(),
        "fetched rows"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn endpoint_flag_clears_env_snapshot() {
        let mut config = Config { snapshot: Some("env.json".into()), ..Config::default() };
        let source = SourceArgs { endpoint: Some("http://h".into()), ..SourceArgs::default() };
        apply_source_overrides(&mut config, &source);
        assert_eq!(config.snapshot, None);
        assert_eq!(config.graphql_url.as_deref(), Some("http://h"));
    }

    #[test]
    fn snapshot_flag_overrides_env() {
        let mut config = Config { snapshot: Some("env.json".into()), ..Config::default() };
        let source = SourceArgs { snapshot: Some("flag.json".into()), ..SourceArgs::default() };
        apply_source_overrides(&mut config, &source);
        assert_eq!(config.snapshot, Some(PathBuf::from("flag.json")));
    }

    #[test]
    fn missing_replay_cassette_is_an_error() {
        let Err(err) = replaying_context(Path::new("/nonexistent/reachcheck.cassette.yaml")) else {
            panic!("expected an error");
        };
        assert!(err.contains("Failed to read cassette file"));
    }

    #[test]
    fn missing_source_leaves_no_session_directory() {
        let root = std::env::temp_dir().join("reachcheck_dispatch_no_source");
        let _ = std::fs::remove_dir_all(&root);
        let config = Config { record_dir: Some(root.clone()), ..Config::default() };

        let Err(err) = open_live_context(&config) else {
            panic!("expected an error without a row source");
        };
        assert!(err.contains("No row source configured"));
        assert!(!root.exists());
    }

    #[test]
    fn recording_context_starts_a_session() {
        let root = std::env::temp_dir().join("reachcheck_dispatch_records");
        let _ = std::fs::remove_dir_all(&root);
        let config = Config {
            snapshot: Some(root.join("rows.json")),
            record_dir: Some(root.clone()),
            ..Config::default()
        };

        let (ctx, session) = open_live_context(&config).unwrap();
        let session = session.unwrap();
        assert!(session.output_dir().starts_with(&root));
        drop(ctx);
        assert!(finish_recording(Ok(()), session).is_ok());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn command_error_wins_over_finish_error() {
        let root = std::env::temp_dir().join("reachcheck_dispatch_finish_error");
        let _ = std::fs::remove_dir_all(&root);
        let session = RecordingSession::new(&root).unwrap();
        // An outstanding recorder handle makes finishing fail
        let held = session.rows.clone();

        let err = finish_recording(Err("Index check failed with 1 finding(s)".into()), session)
            .unwrap_err();
        assert_eq!(err, "Index check failed with 1 finding(s)");
        drop(held);

        let session = RecordingSession::new(&root.join("second")).unwrap();
        let held = session.clock.clone();
        let err = finish_recording(Ok(()), session).unwrap_err();
        assert!(err.contains("still has references"));
        drop(held);

        let _ = std::fs::remove_dir_all(&root);
    }
}
