use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::{Chromedriver, Driver};

/// Unpacks a downloaded `.zip` into `dest_dir`. Anything else is taken to be
/// the driver itself and is copied to its binary path inside `dest_dir`.
pub async fn extract(downloaded: &Path, dest_dir: &Path) -> Result<()> {
    if !is_zip(downloaded) {
        let binary = Chromedriver.binary_path(dest_dir);
        if binary != downloaded {
            tokio::fs::create_dir_all(dest_dir)
                .await
                .map_err(|e| Error::io("create directory", dest_dir, e))?;
            tokio::fs::copy(downloaded, &binary)
                .await
                .map_err(|e| Error::io("copy", downloaded, e))?;
        }
        info!("Skipping zip extraction - binary file found.");
        return Ok(());
    }

    info!("Extracting zip contents to {}.", dest_dir.display());
    let archive_path = downloaded.to_path_buf();
    let dest_dir = dest_dir.to_path_buf();
    tokio::task::spawn_blocking(move || unzip(&archive_path, &dest_dir)).await?
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

fn unzip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file =
        std::fs::File::open(archive_path).map_err(|e| Error::io("open", archive_path, e))?;
    let extract_err = |source| Error::Extract {
        path: archive_path.to_path_buf(),
        source,
    };
    let mut archive = zip::ZipArchive::new(file).map_err(extract_err)?;
    archive.extract(dest_dir).map_err(extract_err)
}
