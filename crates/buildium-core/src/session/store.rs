//! Load and persist the session config file

use super::SessionConfig;
use crate::error::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "BUILDIUM_CONFIG";

const CONFIG_DIR: &str = ".buildium";
const CONFIG_FILE: &str = "config.json";

/// Where a loaded session came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// The file was missing; defaults were used
    Missing,
    /// The file could not be read or parsed; defaults were used
    Unreadable(String),
}

#[derive(Debug, Clone)]
pub struct LoadedSession {
    pub config: SessionConfig,
    pub source: ConfigSource,
}

impl LoadedSession {
    pub fn used_defaults(&self) -> bool {
        self.source != ConfigSource::File
    }
}

/// Reads and writes the session config at a fixed path
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store at an explicit file path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `$BUILDIUM_CONFIG`, or `.buildium/config.json` beside the executable
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) if !path.is_empty() => Self::at(path),
            _ => Self::at(default_config_path()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the session, falling back to defaults on any failure
    pub fn load(&self) -> LoadedSession {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no config file, using defaults");
                return LoadedSession {
                    config: SessionConfig::default(),
                    source: ConfigSource::Missing,
                };
            }
            Err(e) => return self.defaulted(e.to_string()),
        };

        match serde_json::from_str::<SessionConfig>(&content) {
            Ok(config) => LoadedSession {
                config,
                source: ConfigSource::File,
            },
            Err(e) => self.defaulted(e.to_string()),
        }
    }

    fn defaulted(&self, reason: String) -> LoadedSession {
        tracing::warn!(
            path = %self.path.display(),
            %reason,
            "failed to load config file, using defaults"
        );
        LoadedSession {
            config: SessionConfig::default(),
            source: ConfigSource::Unreadable(reason),
        }
    }

    /// Persist the session, creating the config directory if needed
    pub fn save(&self, config: &SessionConfig) -> Result<()> {
        let content = serde_json::to_vec_pretty(config)
            .map_err(|e| Error::io(&self.path, io::Error::new(io::ErrorKind::InvalidData, e)))?;

        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_private_dir(dir).map_err(|e| Error::io(dir, e))?;
        }

        // Write a sibling and rename it into place
        let tmp_path = self.path.with_extension("json.tmp");
        write_private_file(&tmp_path, &content).map_err(|e| Error::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            Error::io(&self.path, e)
        })?;

        tracing::debug!(path = %self.path.display(), "saved config");
        Ok(())
    }
}

fn default_config_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join(CONFIG_DIR).join(CONFIG_FILE)
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    if dir.is_dir() {
        return Ok(());
    }
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn write_private_file(path: &Path, content: &[u8]) -> io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation; tighten a leftover temp file too
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}
