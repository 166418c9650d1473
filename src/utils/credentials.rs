use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::utils::errors::{Result, TranslatorError};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

const CONFIG_DIR_NAME: &str = ".excel-gpt-translator";
const CONFIG_FILE_NAME: &str = "config.env";

/// `KEY=value` file holding the API credential.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl CredentialStore {
    /// Opens `~/.excel-gpt-translator/config.env`, creating it empty if absent.
    pub fn open_default() -> Result<Self> {
        let base = BaseDirs::new().ok_or_else(|| {
            TranslatorError::ConfigError("could not determine home directory".to_string())
        })?;
        Self::open_in(base.home_dir().join(CONFIG_DIR_NAME))
    }

    pub fn open_in(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            std::fs::File::create(&path)?;
        }

        let content = std::fs::read_to_string(&path)?;
        Ok(Self {
            path,
            values: parse_env(&content),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The process environment wins over the file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.get(API_KEY_VAR).map(str::to_string))
            .filter(|k| !k.trim().is_empty())
    }

    /// Rewrites the file with only the API key.
    pub fn save_api_key(&mut self, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        std::fs::write(&self.path, format!("{}={}\n", API_KEY_VAR, api_key))?;
        self.values.clear();
        self.values
            .insert(API_KEY_VAR.to_string(), api_key.to_string());
        Ok(())
    }
}

fn parse_env(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Some((key.trim().to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_empty_file_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open_in(dir.path().join("cfg")).unwrap();

        assert!(store.path().exists());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "");
        assert!(store.get(API_KEY_VAR).is_none());
    }

    #[test]
    fn saved_key_is_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CredentialStore::open_in(dir.path()).unwrap();
        store.save_api_key(" sk-test ").unwrap();

        let reopened = CredentialStore::open_in(dir.path()).unwrap();
        assert_eq!(reopened.get(API_KEY_VAR), Some("sk-test"));
        assert_eq!(
            std::fs::read_to_string(reopened.path()).unwrap(),
            "OPENAI_API_KEY=sk-test\n"
        );
    }

    #[test]
    fn parses_comments_quotes_and_export() {
        let values = parse_env(
            "# comment\nexport OPENAI_API_KEY=\"sk-quoted\"\nOTHER = 'x y'\nbroken line\n",
        );
        assert_eq!(values.get("OPENAI_API_KEY").map(String::as_str), Some("sk-quoted"));
        assert_eq!(values.get("OTHER").map(String::as_str), Some("x y"));
        assert_eq!(values.len(), 2);
    }
}
