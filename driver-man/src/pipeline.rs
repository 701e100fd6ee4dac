//! The provisioning run: resolve platform, locate cache, probe, download,
//! extract, install, fix permissions.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::cache::CacheLocator;
use crate::download::{fetch_text, fetch_to_file};
use crate::error::{Error, Result};
use crate::extract::extract;
use crate::install::{fix_permissions, place};
use crate::platform::Platform;
use crate::probe::is_available;
use crate::request::RequestConfig;
use crate::settings::{LATEST_VERSION, Settings};
use crate::{Chromedriver, Driver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub binary_path: PathBuf,
    pub version: String,
    /// False when a cached driver was reused.
    pub downloaded: bool,
}

/// Inputs shared by every stage of a run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    settings: Settings,
    platform: Platform,
    install_dir: PathBuf,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Result<Pipeline> {
        let platform = Platform::resolve()?;
        Pipeline::with_platform(settings, platform)
    }

    pub fn with_platform(settings: Settings, platform: Platform) -> Result<Pipeline> {
        let install_dir = match &settings.install_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()
                .map_err(|e| Error::io("read current directory", ".", e))?
                .join("lib")
                .join(Chromedriver.name()),
        };
        Ok(Pipeline {
            settings,
            platform,
            install_dir,
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Turns `LATEST` (or an explicit `LATEST_RELEASE*` pointer) into a
    /// concrete version by asking the CDN.
    pub async fn resolve_version(&self) -> Result<String> {
        let requested = self.settings.version.as_str();
        let pointer = if requested == LATEST_VERSION {
            "LATEST_RELEASE"
        } else if requested.starts_with("LATEST_RELEASE") {
            requested
        } else {
            return Ok(requested.to_string());
        };

        info!("Finding Chromedriver version.");
        let url = format!("{}/{}", self.settings.cdn_url, pointer);
        let version = fetch_text(&RequestConfig::build(&url, &self.settings)?).await?;
        if version.is_empty() {
            return Err(Error::EmptyVersion { url });
        }
        info!("Chromedriver version is {}.", version);
        Ok(version)
    }

    pub async fn locate_cache(&self, version: &str) -> Result<PathBuf> {
        CacheLocator::new(self.settings.cache_roots(), Chromedriver.name())
            .locate(version)
            .await
    }

    /// Returns the file to extract from: the configured local driver, or a
    /// fresh download placed in `cache_dir`.
    pub async fn download(&self, version: &str, cache_dir: &Path) -> Result<PathBuf> {
        if let Some(local) = self.settings.local_driver() {
            info!("Using file: {}", local.display());
            return Ok(local.clone());
        }

        let file_name = Chromedriver.archive_name(self.platform);
        let dest = cache_dir.join(&file_name);
        let url = format!("{}/{}/{}", self.settings.cdn_url, version, file_name);
        info!("Downloading from file: {}", url);
        info!("Saving to file: {}", dest.display());
        fetch_to_file(&RequestConfig::build(&url, &self.settings)?, &dest).await?;
        Ok(dest)
    }

    pub async fn install(&self, cache_dir: &Path) -> Result<PathBuf> {
        place(cache_dir, &self.install_dir).await?;
        let binary = Chromedriver.binary_path(&self.install_dir);
        fix_permissions(&binary).await?;
        Ok(binary)
    }

    pub async fn run(&self) -> Result<InstallReport> {
        let version = self.resolve_version().await?;
        let cache_dir = self.locate_cache(&version).await?;

        let downloaded = !is_available(&cache_dir, &version).await;
        if downloaded {
            let file = self.download(&version, &cache_dir).await?;
            extract(&file, &cache_dir).await?;
        }

        let binary_path = self.install(&cache_dir).await?;
        info!("Done. ChromeDriver binary available at {}", binary_path.display());
        Ok(InstallReport {
            binary_path,
            version,
            downloaded,
        })
    }
}
