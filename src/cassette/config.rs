//! Per-port cassette configuration for composable replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a cassette panic when
/// called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Cassette for the row source.
    pub rows: Option<PathBuf>,
    /// Cassette for the report sink.
    pub reports: Option<PathBuf>,
    /// Cassette for the clock.
    pub clock: Option<PathBuf>,
    /// Cassette for the ID generator.
    pub id_gen: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
#[derive(Debug, Default)]
pub struct PortReplayers {
    /// Replayer for the row source.
    pub rows: Option<CassetteReplayer>,
    /// Replayer for the report sink.
    pub reports: Option<CassetteReplayer>,
    /// Replayer for the clock.
    pub clock: Option<CassetteReplayer>,
    /// Replayer for the ID generator.
    pub id_gen: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Returns a config where every port is unconfigured.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Returns a config that serves every port from one cassette file.
    #[must_use]
    pub fn monolithic(path: &Path) -> Self {
        Self {
            rows: Some(path.to_path_buf()),
            reports: Some(path.to_path_buf()),
            clock: Some(path.to_path_buf()),
            id_gen: Some(path.to_path_buf()),
        }
    }

    /// Returns a config reading `<dir>/<port>.cassette.yaml` for each port
    /// whose file exists, the layout a recording session writes.
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        let port = |name: &str| {
            let path = dir.join(format!("{name}.cassette.yaml"));
            path.exists().then_some(path)
        };
        Self {
            rows: port("rows"),
            reports: port("reports"),
            clock: port("clock"),
            id_gen: port("id_gen"),
        }
    }

    /// Load one cassette file and create a replayer for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_port_cassette(path: &Path) -> Result<CassetteReplayer, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette = Cassette::from_yaml(&content)
            .map_err(|e| format!("{e} ({})", path.display()))?;
        Ok(CassetteReplayer::new(&cassette))
    }

    /// Load all configured cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            rows: self.rows.as_deref().map(Self::load_port_cassette).transpose()?,
            reports: self.reports.as_deref().map(Self::load_port_cassette).transpose()?,
            clock: self.clock.as_deref().map(Self::load_port_cassette).transpose()?,
            id_gen: self.id_gen.as_deref().map(Self::load_port_cassette).transpose()?,
        })
    }
}
