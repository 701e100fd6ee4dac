use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::{Chromedriver, Driver};

/// Reports whether `dir` already holds a driver whose `--version` output
/// matches `expected`.
///
/// Every failure along the way (missing file, missing exec bit, spawn error,
/// non-zero exit, unexpected output) means "not available", never an error.
pub async fn is_available(dir: &Path, expected: &str) -> bool {
    let binary = Chromedriver.binary_path(dir);
    if !tokio::fs::try_exists(&binary).await.unwrap_or(false) {
        return false;
    }
    info!("ChromeDriver binary exists. Validating...");

    if !is_executable(&binary).await {
        debug!("{} is not executable", binary.display());
        return false;
    }

    // kill_on_drop reaps the child if the caller drops this future
    let output = Command::new(&binary)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await;
    let output = match output {
        Ok(output) => output,
        Err(e) => {
            debug!("failed to spawn {}: {}", binary.display(), e);
            return false;
        }
    };
    if !output.status.success() {
        debug!("{} --version exited with {}", binary.display(), output.status);
        return false;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let matches = parse_version_output(&stdout, expected);
    if matches {
        info!("ChromeDriver is already available at '{}'.", binary.display());
    }
    matches
}

/// Checks `<name> <version> <extra...>` output against a version prefix.
pub fn parse_version_output(output: &str, expected: &str) -> bool {
    let parts: Vec<&str> = output.split_whitespace().collect();
    if parts.len() < 3 {
        return false;
    }
    parts[1].starts_with(expected)
}

#[cfg(unix)]
async fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
async fn is_executable(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
