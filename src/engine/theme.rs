// Dark/light theme and its single persisted preference string.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("no user config directory on this platform")]
    NoConfigDir,
    #[error("failed to write theme preference to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unknown theme {0:?}")]
    UnknownTheme(String),
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Toast shown after switching to this theme.
    pub fn announcement(self) -> &'static str {
        match self {
            Theme::Dark => "Switched to Dark Mode",
            Theme::Light => "Switched to Light Mode",
        }
    }

    /// Surface clear color, sRGB.
    pub fn background(self) -> [u8; 3] {
        match self {
            Theme::Dark => [0x0B, 0x0B, 0x17],
            Theme::Light => [0xF4, 0xF5, 0xFB],
        }
    }

    pub fn text(self) -> [u8; 3] {
        match self {
            Theme::Dark => [0xE2, 0xE8, 0xF0],
            Theme::Light => [0x1E, 0x1B, 0x4B],
        }
    }

    pub fn accent(self) -> [u8; 3] {
        [0x63, 0x66, 0xF1]
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(PreferenceError::UnknownTheme(other.to_string())),
        }
    }
}

/// Where the theme string lives. Read once at startup, written on toggle.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/hero_backdrop/theme`
    pub fn in_config_dir() -> Result<Self, PreferenceError> {
        let dir = dirs::config_dir().ok_or(PreferenceError::NoConfigDir)?;
        Ok(Self::new(dir.join(env!("CARGO_PKG_NAME")).join("theme")))
    }

    /// Stored theme, or the dark default when nothing usable is stored.
    pub fn load(&self) -> Theme {
        match fs::read_to_string(&self.path) {
            Ok(raw) => raw.parse().unwrap_or_else(|err| {
                log::warn!("ignoring theme preference in {}: {err}", self.path.display());
                Theme::default()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Theme::default(),
            Err(err) => {
                log::warn!("could not read {}: {err}", self.path.display());
                Theme::default()
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<(), PreferenceError> {
        let write = || -> io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, theme.as_str())
        };
        write().map_err(|source| PreferenceError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
