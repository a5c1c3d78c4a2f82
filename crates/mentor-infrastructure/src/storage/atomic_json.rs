//! Atomic JSON file operations.
//!
//! Every save goes through a unique sibling temp file, an fsync and a
//! rename, so a concurrent reader (another surface) sees either the old
//! document or the new one, never a torn write.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Errors that can occur during atomic JSON operations.
#[derive(Debug)]
pub enum AtomicFileError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON serialization/deserialization error.
    JsonError(serde_json::Error),
}

impl std::fmt::Display for AtomicFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicFileError::IoError(e) => write!(f, "I/O error: {}", e),
            AtomicFileError::JsonError(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for AtomicFileError {}

impl From<std::io::Error> for AtomicFileError {
    fn from(e: std::io::Error) -> Self {
        AtomicFileError::IoError(e)
    }
}

impl From<serde_json::Error> for AtomicFileError {
    fn from(e: serde_json::Error) -> Self {
        AtomicFileError::JsonError(e)
    }
}

impl From<AtomicFileError> for mentor_core::MentorError {
    fn from(e: AtomicFileError) -> Self {
        match e {
            AtomicFileError::IoError(io) => io.into(),
            AtomicFileError::JsonError(json) => json.into(),
        }
    }
}

/// A handle to a JSON document replaced atomically on every save.
///
/// Provides:
/// - **Atomicity**: tmp file + rename
/// - **Durability**: explicit fsync before rename
///
/// There is no locking: concurrent writers race and the last rename wins.
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    private: bool,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            private: false,
            _phantom: PhantomData,
        }
    }

    /// Restricts the file to its owner (600) on Unix.
    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicFileError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Serializes `data` and atomically replaces the file.
    ///
    /// Each save writes its own uniquely named temp file, so concurrent
    /// writers never share an inode.
    pub fn save(&self, data: &T) -> Result<(), AtomicFileError> {
        let file_name = self.path.file_name().ok_or_else(|| {
            AtomicFileError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(data)?;

        let mut tmp_file = tempfile::Builder::new()
            .prefix(&format!(".{}.", file_name.to_string_lossy()))
            .suffix(".tmp")
            .tempfile_in(dir)?;
        if self.private {
            restrict_permissions(tmp_file.as_file())?;
        }
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.as_file().sync_all()?;

        // On failure the temp file is removed when the handle drops.
        tmp_file.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Doc>::new(temp_dir.path().join("nested/doc.json"));

        let doc = Doc {
            name: "test".to_string(),
            count: 42,
        };
        file.save(&doc).unwrap();

        assert_eq!(file.load().unwrap(), Some(doc));
    }

    #[test]
    fn test_missing_and_empty_files_load_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");
        let file = AtomicJsonFile::<Doc>::new(path.clone());
        assert!(file.load().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");
        fs::write(&path, "{ not json").unwrap();

        let file = AtomicJsonFile::<Doc>::new(path);
        assert!(matches!(file.load(), Err(AtomicFileError::JsonError(_))));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");
        let file = AtomicJsonFile::<Doc>::new(path.clone());

        file.save(&Doc {
            name: "a".into(),
            count: 1,
        })
        .unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("doc.json")]);
    }

    #[test]
    fn test_concurrent_writers_all_succeed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");

        let writers: Vec<_> = ["left", "right"]
            .into_iter()
            .map(|name| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let file = AtomicJsonFile::<Doc>::new(path);
                    for count in 0..100 {
                        file.save(&Doc {
                            name: name.to_string(),
                            count,
                        })
                        .unwrap();
                    }
                })
            })
            .collect();

        let reader = AtomicJsonFile::<Doc>::new(path.clone());
        for _ in 0..200 {
            // Readers only ever see a whole document.
            let _ = reader.load().unwrap();
        }
        for writer in writers {
            writer.join().unwrap();
        }

        let last = reader.load().unwrap().unwrap();
        assert_eq!(last.count, 99);
        assert!(last.name == "left" || last.name == "right");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_private_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        let file = AtomicJsonFile::<Doc>::new(path.clone()).private();
        file.save(&Doc {
            name: "k".into(),
            count: 0,
        })
        .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
