use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::fs;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Finds a writable, version-namespaced cache directory.
///
/// Candidates are tried in the order given. A candidate is accepted only
/// after a probe file has actually been written to it and removed again.
#[derive(Debug, Clone)]
pub struct CacheLocator {
    roots: Vec<PathBuf>,
    tool: String,
}

impl CacheLocator {
    pub fn new(roots: Vec<PathBuf>, tool: impl Into<String>) -> CacheLocator {
        CacheLocator {
            roots,
            tool: tool.into(),
        }
    }

    /// Returns `<root>/<version>/<tool>` for the first root that passes the write test.
    pub async fn locate(&self, version: &str) -> Result<PathBuf> {
        let mut tried = Vec::with_capacity(self.roots.len());
        for root in &self.roots {
            // one directory per version avoids collisions across the dependency tree
            let candidate = root.join(version).join(&self.tool);
            match write_test(&candidate).await {
                Ok(()) => {
                    debug!("using cache directory {}", candidate.display());
                    return Ok(candidate);
                }
                Err(e) => {
                    warn!("{} is not writable: {}", candidate.display(), e);
                    tried.push(candidate);
                }
            }
        }
        Err(Error::NoWritableCache { tried })
    }
}

async fn write_test(dir: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o777);
    builder.create(dir).await?;

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let probe = dir.join(format!("{}-{}.tmp", stamp, std::process::id()));
    fs::write(&probe, b"test").await?;
    fs::remove_file(&probe).await
}
