//! Environment-derived configuration.
//!
//! Every value comes from an environment variable. npm exposes its config to
//! install scripts as `npm_config_*`, so those names take priority over the
//! upper-case aliases.

use std::path::PathBuf;

pub const DEFAULT_CDN_URL: &str = "https://chromedriver.storage.googleapis.com";
pub const LATEST_VERSION: &str = "LATEST";

#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Local driver to use instead of downloading one.
    pub configured_file_path: Option<PathBuf>,
    /// Download even when `configured_file_path` is set. Read from
    /// `detect_chromedriver_version`; `true`, `1` and `yes` (any case) enable it.
    pub force_download: bool,
    pub cdn_url: String,
    pub version: String,
    pub install_dir: Option<PathBuf>,

    pub tmp: Option<PathBuf>,
    pub xdg_cache_home: Option<PathBuf>,

    pub https_proxy: Option<String>,
    pub proxy: Option<String>,
    pub http_proxy: Option<String>,

    pub ca: Option<String>,
    pub cafile: Option<PathBuf>,
    pub strict_ssl: bool,
    pub user_agent: Option<String>,
}

impl Settings {
    pub fn from_env() -> Settings {
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        // npm passes unset or false config values as empty strings
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let first = |key: &str, alias: &str| get(key).or_else(|| get(alias));

        Settings {
            configured_file_path: first(
                "npm_config_chromedriver_filepath",
                "CHROMEDRIVER_FILEPATH",
            )
            .map(PathBuf::from),
            force_download: first(
                "npm_config_detect_chromedriver_version",
                "DETECT_CHROMEDRIVER_VERSION",
            )
            .is_some_and(|value| parse_flag(&value)),
            cdn_url: first("npm_config_chromedriver_cdnurl", "CHROMEDRIVER_CDNURL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_CDN_URL.to_string()),
            version: first("npm_config_chromedriver_version", "CHROMEDRIVER_VERSION")
                .unwrap_or_else(|| LATEST_VERSION.to_string()),
            install_dir: get("CHROMEDRIVER_INSTALL_DIR").map(PathBuf::from),
            tmp: get("npm_config_tmp").map(PathBuf::from),
            xdg_cache_home: get("XDG_CACHE_HOME").map(PathBuf::from),
            https_proxy: get("npm_config_https_proxy"),
            proxy: get("npm_config_proxy"),
            http_proxy: get("npm_config_http_proxy"),
            ca: get("npm_config_ca"),
            cafile: get("npm_config_cafile").map(PathBuf::from),
            strict_ssl: get("npm_config_strict_ssl").is_some_and(|value| parse_flag(&value)),
            user_agent: get("npm_config_user_agent"),
        }
    }

    /// The override path, unless version detection forces a download.
    pub fn local_driver(&self) -> Option<&PathBuf> {
        if self.force_download {
            return None;
        }
        self.configured_file_path.as_ref()
    }

    /// Cache roots in priority order: npm tmp, XDG cache, OS temp, `./tmp`.
    pub fn cache_roots(&self) -> Vec<PathBuf> {
        let mut roots = Vec::with_capacity(4);
        roots.extend(self.tmp.clone());
        roots.extend(self.xdg_cache_home.clone());
        roots.push(std::env::temp_dir());
        if let Ok(cwd) = std::env::current_dir() {
            roots.push(cwd.join("tmp"));
        }
        roots
    }
}

pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}
