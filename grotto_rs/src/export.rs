use std::path::{Path, PathBuf};

use eyre::Context;

use crate::waypoints::Segment;

/// Where the route walker looks for custom routes, relative to the game directory.
pub static DEFAULT_ROUTES_DIRECTORY: &str = "./config/ChatTriggers/modules/PolarConfigV2/gemstoneroutes";

/// Writes generated routes as pretty printed JSON files into a single directory.
#[derive(Debug, Clone)]
pub struct RouteExporter {
    routes_directory: PathBuf,
}

impl RouteExporter {
    pub fn new(routes_directory: impl Into<PathBuf>) -> Self {
        Self {
            routes_directory: routes_directory.into(),
        }
    }

    pub fn routes_directory(&self) -> &Path {
        &self.routes_directory
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.routes_directory.join(file_name)
    }

    /// Write `segments` to `file_name`, replacing whatever was there before.
    ///
    /// Missing parent directories are created first.
    pub fn write(&self, file_name: &str, segments: &[Segment]) -> eyre::Result<PathBuf> {
        let path = self.path_for(file_name);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Couldn't create route directory `{}`", parent.display()))?;
        }

        let out = serde_json::to_string_pretty(segments)?;
        std::fs::write(&path, out).with_context(|| format!("Couldn't write route file `{}`", path.display()))?;

        log::info!("Wrote {} segments to `{}`", segments.len(), path.display());

        Ok(path)
    }

    pub fn read(path: impl AsRef<Path>) -> eyre::Result<Vec<Segment>> {
        let file = std::fs::read(path.as_ref())?;
        Ok(serde_json::from_slice(&file)?)
    }
}

impl Default for RouteExporter {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTES_DIRECTORY)
    }
}
