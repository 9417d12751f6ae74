//! Cross-platform directory path resolution
//!
//! - Linux/macOS: XDG Base Directory specification (~/.config, ~/.local/share)
//! - Windows: Known Folder API (AppData\Roaming, AppData\Local)

use std::path::{Path, PathBuf};

const APP_NAME: &str = "kubedash";

/// Get the configuration directory path
///
/// Checks KUBEDASH_CONFIG_DIR environment variable first, then falls back to:
/// - Unix (Linux/macOS): XDG_CONFIG_HOME/kubedash or ~/.config/kubedash
/// - Windows: %APPDATA%\kubedash\config
pub fn config_dir() -> PathBuf {
    std::env::var("KUBEDASH_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            #[cfg(windows)]
            {
                use directories::ProjectDirs;
                ProjectDirs::from("", "", APP_NAME)
                    .map(|dirs| dirs.config_dir().to_path_buf())
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            }
            #[cfg(not(windows))]
            {
                xdg_dir("XDG_CONFIG_HOME", &[".config"])
            }
        })
}

/// Get the data directory path
///
/// Checks KUBEDASH_DATA_DIR environment variable first, then falls back to:
/// - Unix (Linux/macOS): XDG_DATA_HOME/kubedash or ~/.local/share/kubedash
/// - Windows: %LOCALAPPDATA%\kubedash\data
pub fn data_dir() -> PathBuf {
    std::env::var("KUBEDASH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            #[cfg(windows)]
            {
                use directories::ProjectDirs;
                ProjectDirs::from("", "", APP_NAME)
                    .map(|dirs| dirs.data_dir().to_path_buf())
                    .unwrap_or_else(|| {
                        PathBuf::from(".")
                            .join(".local")
                            .join("share")
                            .join(APP_NAME)
                    })
            }
            #[cfg(not(windows))]
            {
                xdg_dir("XDG_DATA_HOME", &[".local", "share"])
            }
        })
}

#[cfg(not(windows))]
fn xdg_dir(env: &str, home_relative: &[&str]) -> PathBuf {
    use directories::BaseDirs;
    std::env::var(env)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let base = BaseDirs::new()
                .map(|dirs| dirs.home_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            home_relative.iter().fold(base, |path, part| path.join(part))
        })
        .join(APP_NAME)
}

/// Get the root configuration file path
pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

/// Get the context-specific config directory path
pub fn context_config_dir(context: &str) -> PathBuf {
    data_dir().join("contexts").join(context)
}

/// Get the context-specific config file path
pub fn context_config_path(context: &str) -> PathBuf {
    context_config_dir(context).join("config.yaml")
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
