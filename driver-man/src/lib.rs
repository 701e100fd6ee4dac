mod cache;
mod download;
mod error;
mod extract;
mod install;
mod pipeline;
mod platform;
mod probe;
mod request;
mod settings;

use std::path::{Path, PathBuf};

pub use cache::CacheLocator;
pub use download::{fetch_text, fetch_to_file};
pub use error::{Error, Result};
pub use extract::extract;
pub use install::{fix_permissions, place};
pub use pipeline::{InstallReport, Pipeline};
pub use platform::Platform;
pub use probe::{is_available, parse_version_output};
pub use request::{ProxyDescriptor, RequestConfig, TlsAgent};
pub use settings::Settings;

#[cfg(target_os = "windows")]
const WINDOWS_SUFFIX: &str = ".exe";

pub trait Driver {
    fn name(&self) -> &str;
    fn binary_name(&self) -> String {
        #[cfg(target_os = "windows")]
        return format!("{}{}", self.name(), WINDOWS_SUFFIX);
        #[cfg(not(target_os = "windows"))]
        return self.name().to_string();
    }
    /// Archive published on the CDN for `platform`, e.g. `chromedriver_linux64.zip`.
    fn archive_name(&self, platform: Platform) -> String {
        format!("{}_{}.zip", self.name(), platform)
    }
    /// Location of the executable inside `dir`.
    fn binary_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.binary_name())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Chromedriver;

impl Driver for Chromedriver {
    fn name(&self) -> &str {
        "chromedriver"
    }
}
