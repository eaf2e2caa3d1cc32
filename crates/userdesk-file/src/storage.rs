//! JSON file storage for the session.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, instrument};

use userdesk_core::error::{Error, StorageError};
use userdesk_core::{Result, SessionStorage, StoredSession};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

fn map_io(path: &Path) -> impl Fn(io::Error) -> Error + '_ {
    move |err| {
        Error::Storage(StorageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }
}

/// Session storage backed by one JSON file.
///
/// Writes go to a temporary sibling and are renamed into place, so a crash
/// never leaves a half-written session behind. An exclusive lock on a
/// `.lock` sibling serialises concurrent processes. On Unix the file is
/// readable by its owner only.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Storage at `path`. Parent directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    /// Hold the storage lock until the returned file is dropped.
    fn lock(&self) -> Result<File> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(map_io(parent))?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(map_io(&lock_path))?;

        lock_file.lock_exclusive().map_err(map_io(&lock_path))?;
        Ok(lock_file)
    }

    fn write_private(path: &Path, content: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.create(true).write(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(path)?;
        file.write_all(content)?;
        file.sync_all()
    }
}

impl SessionStorage for FileSessionStorage {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Option<StoredSession>> {
        let _lock = self.lock()?;

        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(map_io(&self.path)(e)),
        };

        let stored: StoredSession = serde_json::from_str(&json).map_err(|e| {
            Error::Storage(StorageError::Format {
                message: format!("{}: {}", self.path.display(), e),
            })
        })?;

        debug!("Loaded session");
        Ok(Some(stored))
    }

    #[instrument(skip(self, session), fields(path = %self.path.display()))]
    fn save(&self, session: &StoredSession) -> Result<()> {
        let _lock = self.lock()?;

        let json = serde_json::to_string_pretty(session).map_err(|e| {
            Error::Storage(StorageError::Format {
                message: e.to_string(),
            })
        })?;

        let temp_path = self.temp_path();
        Self::write_private(&temp_path, json.as_bytes()).map_err(map_io(&temp_path))?;
        fs::rename(&temp_path, &self.path).map_err(map_io(&self.path))?;

        debug!("Saved session");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn clear(&self) -> Result<()> {
        let _lock = self.lock()?;

        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed session file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(&self.path)(e)),
        }
    }
}
