//! JSON file session store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use roomfinder_core::{AuthSession, CoreError, CoreResult, SessionStore};

/// Keeps the signed-in session in a JSON file so it survives restarts.
///
/// The file is read lazily on first access and rewritten on every change.
/// Writes go through a sibling temp file and a rename. On Unix the file is
/// readable by its owner only, since it holds the bearer token.
pub struct FileSessionStore {
    path: PathBuf,
    cache: RwLock<Option<Option<AuthSession>>>,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    /// `<data dir>/roomfinder/session.json`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("roomfinder").join("session.json"))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> CoreResult<Option<AuthSession>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(&self.path, &e)),
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable session file {}: {e}",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    async fn write_file(&self, session: &AuthSession) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error(parent, &e))?;
        }
        let json = serde_json::to_vec_pretty(session)
            .map_err(|e| CoreError::StorageError(format!("Cannot encode session: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        write_private(&tmp, &json)
            .await
            .map_err(|e| storage_error(&tmp, &e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| storage_error(&self.path, &e))
    }
}

/// Write `bytes` to `path`, owner read/write only on Unix.
async fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);
    let mut file = options.open(path).await?;
    // mode only applies on creation; a stale temp file keeps its bits
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .await?;
    }
    file.write_all(bytes).await?;
    file.flush().await
}

fn storage_error(path: &Path, err: &std::io::Error) -> CoreError {
    CoreError::StorageError(format!("{}: {err}", path.display()))
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> CoreResult<Option<AuthSession>> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            return Ok(cached.clone());
        }
        let mut cache = self.cache.write().await;
        if let Some(cached) = cache.as_ref() {
            return Ok(cached.clone());
        }
        let session = self.read_file().await?;
        *cache = Some(session.clone());
        Ok(session)
    }

    async fn save(&self, session: &AuthSession) -> CoreResult<()> {
        let mut cache = self.cache.write().await;
        self.write_file(session).await?;
        *cache = Some(Some(session.clone()));
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        let mut cache = self.cache.write().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(storage_error(&self.path, &e)),
        }
        *cache = Some(None);
        Ok(())
    }
}
