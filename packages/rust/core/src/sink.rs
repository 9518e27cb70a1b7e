//! Persistence of the enriched collection.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use cims_shared::{CimsError, EnrichedMountainRecord, Result};

/// Destination for the final record collection.
pub trait RecordSink: Send + Sync {
    /// Persist the whole collection in one go.
    fn write(&self, records: &[EnrichedMountainRecord]) -> Result<()>;

    /// Human-readable destination for summaries and logs.
    fn describe(&self) -> String;
}

/// Writes the collection as a single JSON array, replacing any previous file.
///
/// The document is first written next to the target and then renamed over
/// it, so a failed write never leaves a truncated output behind.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordSink for JsonFileSink {
    fn write(&self, records: &[EnrichedMountainRecord]) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_vec_pretty(records)
        } else {
            serde_json::to_vec(records)
        }
        .map_err(|e| CimsError::persistence(&self.path, std::io::Error::other(e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CimsError::persistence(parent, e))?;
        }

        let tmp = self.temp_path();
        let written = std::fs::File::create(&tmp).and_then(|mut file| {
            file.write_all(&json)?;
            file.sync_all()
        });
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(CimsError::persistence(&tmp, e));
        }

        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            CimsError::persistence(&self.path, e)
        })?;

        info!(path = %self.path.display(), records = records.len(), bytes = json.len(), "output written");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
