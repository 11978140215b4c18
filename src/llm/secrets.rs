use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use dialoguer::{Password, theme::ColorfulTheme};
use serde::{Deserialize, Serialize};

use crate::palette::Palette;
use crate::utils::{get_data_dir, strip_controls_and_escapes, trim_line};

pub const API_KEY_ENV: &str = "REDNOTE_API_KEY";

const AUTH_FILE_NAME: &str = "auth.json";

#[cfg(test)]
const TEST_AUTH_PATH_ENV: &str = "REDNOTE_TEST_AUTH_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment,
    AuthFile,
}

impl ApiKeySource {
    pub fn description(&self) -> &'static str {
        match self {
            ApiKeySource::Environment => "environment variable",
            ApiKeySource::AuthFile => "local auth file",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct AuthFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// Environment variable first, then the auth file.
pub fn lookup_api_key() -> Result<Option<(String, ApiKeySource)>> {
    if let Ok(value) = env::var(API_KEY_ENV)
        && !value.trim().is_empty()
    {
        return Ok(Some((value, ApiKeySource::Environment)));
    }

    let auth_path = auth_file_path()?;
    let Some(auth) = read_auth_file(&auth_path)? else {
        return Ok(None);
    };

    let key = auth
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    Ok(key.map(|key| (key, ApiKeySource::AuthFile)))
}

/// Resolve a key for a generation run, prompting and storing one if none is
/// configured yet.
pub fn ensure_api_key() -> Result<String> {
    if let Some((key, _)) = lookup_api_key()? {
        return Ok(key);
    }

    let key = prompt_for_api_key()?;
    if key.is_empty() {
        bail!(
            "No API key provided. Set {} or run `rednote key --set <KEY>`.",
            API_KEY_ENV
        );
    }

    store_api_key(&key)?;
    Ok(key)
}

pub fn prompt_for_api_key() -> Result<String> {
    println!(
        "\n{} to generate posts. It's stored locally for future use.",
        Palette::paint(Palette::SUCCESS, "Enter your API key")
    );
    let raw_password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("API Key")
        .allow_empty_password(true)
        .interact()
        .unwrap();

    let password = strip_controls_and_escapes(&raw_password);
    Ok(password.trim().to_string())
}

pub fn store_api_key(api_key: &str) -> Result<()> {
    let trimmed = trim_line(api_key).with_context(|| "Cannot store an empty API key")?;

    let auth_path = auth_file_path()?;
    let auth = AuthFile {
        api_key: Some(trimmed.to_string()),
    };

    write_auth_file(&auth_path, &auth)
}

pub fn clear_api_key() -> Result<bool> {
    let auth_path = auth_file_path()?;
    let Some(auth) = read_auth_file(&auth_path)? else {
        return Ok(false);
    };

    if auth.api_key.is_none() {
        return Ok(false);
    }

    fs::remove_file(&auth_path)
        .with_context(|| format!("Failed to remove auth file at {}", auth_path.display()))?;
    Ok(true)
}

fn auth_file_path() -> Result<PathBuf> {
    #[cfg(test)]
    {
        if let Ok(path) = env::var(TEST_AUTH_PATH_ENV)
            && !path.trim().is_empty()
        {
            return Ok(PathBuf::from(path));
        }
    }

    let data_dir = get_data_dir()?;
    Ok(data_dir.join(AUTH_FILE_NAME))
}

fn read_auth_file(path: &Path) -> Result<Option<AuthFile>> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            if contents.trim().is_empty() {
                return Ok(Some(AuthFile::default()));
            }
            let parsed: AuthFile = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse auth file at {}", path.display()))?;
            Ok(Some(parsed))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to read auth file at {}", path.display()))
        }
    }
}

fn write_auth_file(path: &Path, value: &AuthFile) -> Result<()> {
    let contents = format!("{}\n", serde_json::to_string_pretty(value)?);
    fs::write(path, contents)
        .with_context(|| format!("Failed to write auth file at {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("auth.json");
        assert!(read_auth_file(&path).unwrap().is_none());
    }

    #[test]
    fn empty_file_reads_as_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("auth.json");
        fs::write(&path, "   \n").unwrap();
        let auth = read_auth_file(&path).unwrap().expect("auth file expected");
        assert!(auth.api_key.is_none());
    }

    #[test]
    fn auth_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("auth.json");
        let auth = AuthFile {
            api_key: Some("saved-key".to_string()),
        };

        write_auth_file(&path, &auth).unwrap();
        let read_back = read_auth_file(&path).unwrap().expect("auth file expected");
        assert_eq!(read_back.api_key.as_deref(), Some("saved-key"));
    }

    #[test]
    fn store_overwrite_and_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("auth.json");

        unsafe {
            env::set_var(TEST_AUTH_PATH_ENV, &path);
        }

        store_api_key("fake_key").unwrap();
        store_api_key("real_key").unwrap();

        let lookup = lookup_api_key().unwrap();
        let (key, source) = lookup.expect("key expected");
        assert_eq!(key, "real_key");
        assert_eq!(source, ApiKeySource::AuthFile);

        assert!(clear_api_key().unwrap());
        assert!(lookup_api_key().unwrap().is_none());
        assert!(!clear_api_key().unwrap());
    }
}
