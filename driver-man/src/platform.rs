use std::fmt;

use crate::error::{Error, Result};

/// Platform token used in CDN archive names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux64,
    Mac64,
    Win32,
}

impl Platform {
    /// Resolves the platform of the running process.
    pub fn resolve() -> Result<Platform> {
        Platform::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Maps a Rust `target_os`/`target_arch` pair onto a platform token.
    pub fn from_parts(os: &str, arch: &str) -> Result<Platform> {
        let unsupported = || Error::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        };
        match os {
            "linux" => match arch {
                "x86_64" | "aarch64" => Ok(Platform::Linux64),
                _ => Err(unsupported()),
            },
            "macos" | "freebsd" => match arch {
                "x86_64" => Ok(Platform::Mac64),
                _ => Err(unsupported()),
            },
            "windows" => Ok(Platform::Win32),
            _ => Err(unsupported()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux64 => "linux64",
            Platform::Mac64 => "mac64",
            Platform::Win32 => "win32",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
