use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Access tokens on disk, a JSON object keyed by `identity@service`.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
    tokens: BTreeMap<String, String>,
}

impl TokenStore {
    /// Read the store at `path`. A missing file is an empty store.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tokens = match tokio::fs::read(&path).await {
            Ok(content) => serde_json::from_slice(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, tokens })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(identity: &str, service: &str) -> String {
        format!("{}@{}", identity, service)
    }

    pub fn get(&self, identity: &str, service: &str) -> Option<&str> {
        self.tokens.get(&Self::key(identity, service)).map(String::as_str)
    }

    pub fn set(&mut self, identity: &str, service: &str, token: &str) {
        self.tokens.insert(Self::key(identity, service), token.to_string());
    }

    pub fn unset(&mut self, identity: &str, service: &str) -> Option<String> {
        self.tokens.remove(&Self::key(identity, service))
    }

    /// Write the store back. The content goes to a sibling file first and is renamed over the
    /// store, so a concurrent reader sees either the old or the new tokens.
    pub async fn save(&self) -> Result<()> {
        let content = serde_json::to_vec_pretty(&self.tokens)?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(format!(".{}.tmp", std::process::id()));
        let tmp_path = self.path.with_file_name(tmp_name);

        tokio::fs::write(&tmp_path, &content).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600)).await?;
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            tokio::fs::remove_file(&tmp_path).await.ok();
            return Err(e.into());
        }
        tracing::debug!("Saved {} tokens to {}", self.tokens.len(), self.path.display());
        Ok(())
    }
}
