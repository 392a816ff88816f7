//! Platform-specific paths for configuration files.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/octoechos/` (Linux), `~/Library/Application Support/octoechos/` (macOS), `%APPDATA%\octoechos\` (Windows)
//! - **Session file**: `session.toml` inside the user config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use octoechos_config::paths;
//!
//! if let Some(path) = paths::find_session(None) {
//!     println!("Session file: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "octoechos";

/// File name of the session config.
const SESSION_FILE: &str = "session.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the session file.
pub fn default_session_path() -> PathBuf {
    user_config_dir().join(SESSION_FILE)
}

/// Locate the session file to load.
///
/// Searches in the following order:
/// 1. `explicit`, returned as given even if it does not exist, so that
///    loading it reports the missing file
/// 2. The user config directory
///
/// Returns `None` when no explicit path is given and no user session exists.
pub fn find_session(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let user_path = default_session_path();
    user_path.is_file().then_some(user_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_config_dir_ends_with_app_name() {
        assert!(user_config_dir().ends_with(APP_NAME));
    }

    #[test]
    fn test_default_session_path() {
        let path = default_session_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(SESSION_FILE));
        assert!(path.starts_with(user_config_dir()));
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = Path::new("/tmp/does-not-exist/octoechos.toml");
        assert_eq!(find_session(Some(explicit)), Some(explicit.to_path_buf()));
    }
}
