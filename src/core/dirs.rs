use crate::core::error::Result;
use std::path::PathBuf;

const APP_DIR: &str = "git-loom";

pub fn get_config_directory() -> Result<PathBuf> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".config")),
        "macos" => dirs::home_dir()
            .unwrap_or_default()
            .join("Library/Application Support"),
        _ => dirs::config_dir().unwrap_or_default(),
    };

    Ok(base.join(APP_DIR))
}

/// Per-repository cache directory, keyed by a hash of the repository path
pub fn get_cache_directory(repo_path: &std::path::Path) -> Result<PathBuf> {
    // XDG_CACHE_HOME wins on every platform so tests can isolate the cache
    let cache_home = std::env::var("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs::cache_dir().unwrap_or_else(std::env::temp_dir));

    let repo_hash = format!("{:x}", md5::compute(repo_path.to_string_lossy().as_bytes()));
    log::debug!("Cache for {} lives under {repo_hash}", repo_path.display());

    Ok(cache_home.join(APP_DIR).join(repo_hash))
}
