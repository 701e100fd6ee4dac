use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, FutureExt, try_join_all};
use tokio::fs;
use tracing::info;

use crate::error::{Error, Result};

/// Replaces `target_dir` with a copy of every entry in `source_dir`.
///
/// Entries are copied concurrently; the call returns once all of them have
/// finished, or with the first failure.
pub async fn place(source_dir: &Path, target_dir: &Path) -> Result<()> {
    match fs::remove_dir_all(target_dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io("remove", target_dir, e)),
    }
    info!("Copying to target path {}", target_dir.display());
    fs::create_dir_all(target_dir)
        .await
        .map_err(|e| Error::io("create directory", target_dir, e))?;

    copy_children(source_dir.to_path_buf(), target_dir.to_path_buf()).await
}

fn copy_children(source_dir: PathBuf, target_dir: PathBuf) -> BoxFuture<'static, Result<()>> {
    async move {
        let mut entries = fs::read_dir(&source_dir)
            .await
            .map_err(|e| Error::io("read directory", &source_dir, e))?;
        let mut copies = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::io("read directory", &source_dir, e))?
        {
            copies.push(copy_entry(entry.path(), target_dir.join(entry.file_name())));
        }
        try_join_all(copies).await.map(|_| ())
    }
    .boxed()
}

async fn copy_entry(source: PathBuf, target: PathBuf) -> Result<()> {
    let meta = fs::metadata(&source)
        .await
        .map_err(|e| Error::io("stat", &source, e))?;
    if meta.is_dir() {
        fs::create_dir_all(&target)
            .await
            .map_err(|e| Error::io("create directory", &target, e))?;
        return copy_children(source, target).await;
    }
    fs::copy(&source, &target)
        .await
        .map(|_| ())
        .map_err(|e| Error::io("copy", &source, e))
}

/// Restores the user-executable bit that some archive tools drop.
#[cfg(not(target_os = "windows"))]
pub async fn fix_permissions(binary: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let meta = fs::metadata(binary)
        .await
        .map_err(|e| Error::io("stat", binary, e))?;
    if meta.permissions().mode() & 0o100 == 0 {
        info!("Fixing file permissions.");
        fs::set_permissions(binary, std::fs::Permissions::from_mode(0o755))
            .await
            .map_err(|e| Error::io("set permissions on", binary, e))?;
    }
    Ok(())
}

#[cfg(target_os = "windows")]
pub async fn fix_permissions(_binary: &Path) -> Result<()> {
    Ok(())
}
