use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::{TaskError, TaskResult, config};

pub const API_KEY_ENV: &str = "DASHSCOPE_API_KEY";

/// Resolves the API key from `--api-key`, then `DASHSCOPE_API_KEY`, then the key file.
pub fn resolve_api_key(explicit: Option<&str>) -> TaskResult<String> {
    let key_file = config::api_key_path()
        .unwrap_or_else(|_| PathBuf::from("~/.config").join(config::APP_DIR).join("api_key.txt"));
    resolve_with_env(explicit, |name| std::env::var(name).ok(), &key_file)
}

fn resolve_with_env(
    explicit: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    key_file: &Path,
) -> TaskResult<String> {
    let from_env = env(API_KEY_ENV);
    resolve(explicit, from_env.as_deref(), key_file)
}

/// Empty values at any level count as absent.
pub fn resolve(
    explicit: Option<&str>,
    from_env: Option<&str>,
    key_file: &Path,
) -> TaskResult<String> {
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        debug!("Using API key from --api-key");
        return Ok(key.to_string());
    }

    if let Some(key) = from_env.filter(|k| !k.is_empty()) {
        debug!("Using API key from {API_KEY_ENV}");
        return Ok(key.to_string());
    }

    if key_file.exists() {
        match fs::read_to_string(key_file) {
            Ok(content) => {
                let key = content.trim();
                if !key.is_empty() {
                    debug!("Using API key from {}", key_file.display());
                    return Ok(key.to_string());
                }
            }
            Err(e) => warn!("Couldn't read {}: {e}", key_file.display()),
        }
    }

    Err(TaskError::MissingCredential {
        env_var: API_KEY_ENV,
        key_file: key_file.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn key_file(content: Option<&str>) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_key.txt");
        if let Some(content) = content {
            fs::write(&path, content).unwrap();
        }
        (dir, path)
    }

    #[test]
    fn explicit_key_wins_over_env_and_file() {
        let (_dir, path) = key_file(Some("from-file"));
        let key = resolve(Some("from-flag"), Some("from-env"), &path).unwrap();
        assert_eq!(key, "from-flag");
    }

    #[test]
    fn env_wins_over_file() {
        let (_dir, path) = key_file(Some("from-file"));
        assert_eq!(resolve(None, Some("from-env"), &path).unwrap(), "from-env");
        assert_eq!(resolve(Some(""), Some("from-env"), &path).unwrap(), "from-env");
    }

    #[test]
    fn file_content_is_trimmed() {
        let (_dir, path) = key_file(Some("  sk-123\n"));
        assert_eq!(resolve(None, Some(""), &path).unwrap(), "sk-123");
    }

    #[test]
    fn nothing_found_names_every_source() {
        let (_dir, path) = key_file(None);
        let err = resolve(None, None, &path).unwrap_err();
        assert!(matches!(err, TaskError::MissingCredential { .. }));

        let msg = err.to_string();
        assert!(msg.contains(API_KEY_ENV));
        assert!(msg.contains("--api-key"));
        assert!(msg.contains(&path.display().to_string()));
    }

    #[test]
    fn environment_is_read_under_the_documented_name() {
        let (_dir, path) = key_file(Some("from-file"));
        let env = |name: &str| (name == API_KEY_ENV).then(|| "from-env".to_string());
        assert_eq!(resolve_with_env(None, env, &path).unwrap(), "from-env");
        assert_eq!(resolve_with_env(None, |_| None, &path).unwrap(), "from-file");
    }

    #[test]
    fn api_key_flag_needs_no_environment() {
        assert_eq!(resolve_api_key(Some("sk-flag")).unwrap(), "sk-flag");
    }

    #[test]
    fn blank_file_counts_as_missing() {
        let (_dir, path) = key_file(Some(" \n\t"));
        assert!(matches!(
            resolve(None, None, &path),
            Err(TaskError::MissingCredential { .. })
        ));
    }
}
