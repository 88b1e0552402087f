use super::backend::Backend;
use crate::error::{InvError, Result};
use crate::model::Data;
use fs2::FileExt;
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File-backed storage: the whole aggregate lives in one JSON document.
///
/// Opening takes an exclusive OS lock on a sidecar `<file>.lock`, held until
/// the backend is dropped, so two stores never write the same file.
#[derive(Debug)]
pub struct FsBackend {
    path: PathBuf,
    _lock: File,
}

impl FsBackend {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.as_os_str().is_empty() {
            return Err(InvError::InvalidArgument(
                "store file path was empty".to_string(),
            ));
        }
        if let Some(dir) = parent_dir(&path) {
            ensure_dir(dir)?;
        }

        let lock_path = lock_path_for(&path);
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        match lock.try_lock_exclusive() {
            Ok(()) => {
                debug!("event=lock_acquired path={}", lock_path.display());
                Ok(Self { path, _lock: lock })
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Err(InvError::Locked(path)),
            Err(e) => Err(InvError::Io(e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("data");
        let tmp_name = format!(".{}-{}.tmp", file_name, Uuid::new_v4());
        match parent_dir(&self.path) {
            Some(dir) => dir.join(tmp_name),
            None => PathBuf::from(tmp_name),
        }
    }
}

impl Backend for FsBackend {
    fn load(&self) -> Result<Option<Data>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(InvError::Io(e)),
        };
        let data: Data = serde_json::from_str(&content).map_err(InvError::Serialization)?;
        Ok(Some(data))
    }

    fn save(&self, data: &Data) -> Result<()> {
        let content = serde_json::to_string_pretty(data).map_err(InvError::Serialization)?;

        // Atomic write
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, content).map_err(InvError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(InvError::Io(e));
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|dir| !dir.as_os_str().is_empty())
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(InvError::Io)?;
    }
    Ok(())
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}
