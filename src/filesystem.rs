//! Gallery - Local Filesystem
//!
//! File storage under a root directory with one folder per [`Directory`].
//! Payloads arrive base64-encoded and are stored as raw bytes.

use std::path::{Path, PathBuf};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use uuid::Uuid;

use crate::error::{GalleryError, GalleryResult};
use crate::platform::{Directory, FilesystemPlugin};

const URI_SCHEME: &str = "file://";

/// Local filesystem handler
pub struct LocalFilesystem {
    /// Root directory (absolute)
    root: PathBuf,
}

impl LocalFilesystem {
    /// Create handler rooted at `root`, creating the folder if needed
    pub fn new(root: &Path) -> GalleryResult<Self> {
        let root = if root.is_relative() {
            std::env::current_dir()?.join(root)
        } else {
            root.to_path_buf()
        };
        fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder backing a directory
    pub fn dir_path(&self, directory: Directory) -> PathBuf {
        self.root.join(directory.dir_name())
    }

    /// URI for an absolute path
    pub fn uri_for(path: &Path) -> String {
        format!("{}{}", URI_SCHEME, path.display())
    }

    /// Resolve a URI, absolute path, or Data-relative path
    fn resolve(&self, reference: &str) -> PathBuf {
        let raw = reference.strip_prefix(URI_SCHEME).unwrap_or(reference);
        let path = Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir_path(Directory::Data).join(path)
        }
    }
}

impl FilesystemPlugin for LocalFilesystem {
    fn write_file(&self, path: &str, data: &str, directory: Directory) -> GalleryResult<String> {
        let bytes = STANDARD.decode(data)?;
        let target = self.dir_path(directory).join(path);

        if target.exists() {
            return Err(GalleryError::FileAlreadyExists(target.display().to_string()));
        }

        let parent = target
            .parent()
            .ok_or_else(|| GalleryError::StorageWrite(format!("no parent for {}", target.display())))?;
        fs::create_dir_all(parent)?;

        // Write to temp file first, then link into place
        let temp_path = parent.join(format!(".{}.tmp", Uuid::new_v4()));

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;

        if let Err(e) = file.write_all(&bytes).and_then(|_| file.sync_all()) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        // hard_link refuses an existing target, unlike rename
        let linked = fs::hard_link(&temp_path, &target);
        let _ = fs::remove_file(&temp_path);
        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(GalleryError::FileAlreadyExists(target.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        }
        log::debug!("Wrote {} bytes to {}", bytes.len(), target.display());

        Ok(Self::uri_for(&target))
    }

    fn read_file(&self, reference: &str) -> GalleryResult<String> {
        let path = self.resolve(reference);

        if !path.is_file() {
            return Err(GalleryError::FileNotFound(path.display().to_string()));
        }

        let mut file = File::open(&path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        Ok(STANDARD.encode(data))
    }

    fn list_files(&self, directory: Directory) -> GalleryResult<Vec<String>> {
        let dir = self.dir_path(directory);
        let mut files = Vec::new();

        if dir.exists() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                if !entry.file_type()?.is_file() {
                    continue;
                }
                // Skip in-flight temp files
                if entry.file_name().to_string_lossy().starts_with('.') {
                    continue;
                }
                files.push(entry.path());
            }
        }

        files.sort();
        Ok(files.iter().map(|p| Self::uri_for(p)).collect())
    }

    fn delete_file(&self, reference: &str) -> GalleryResult<()> {
        let path = self.resolve(reference);

        if path.exists() {
            fs::remove_file(&path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_local_filesystem() {
        let dir = tempdir().unwrap();
        let fs = LocalFilesystem::new(dir.path()).unwrap();

        let payload = STANDARD.encode(b"not really a jpeg");
        let uri = fs.write_file("1.jpeg", &payload, Directory::Data).unwrap();
        assert!(uri.starts_with("file://"));
        assert!(uri.ends_with("/data/1.jpeg"));

        // By URI and by bare name
        assert_eq!(fs.read_file(&uri).unwrap(), payload);
        assert_eq!(fs.read_file("1.jpeg").unwrap(), payload);

        assert_eq!(fs.list_files(Directory::Data).unwrap(), vec![uri.clone()]);

        fs.delete_file(&uri).unwrap();
        assert!(matches!(fs.read_file(&uri), Err(GalleryError::FileNotFound(_))));
    }

    #[test]
    fn test_no_overwrite() {
        let dir = tempdir().unwrap();
        let fs = LocalFilesystem::new(dir.path()).unwrap();
        let payload = STANDARD.encode(b"one");

        fs.write_file("a.png", &payload, Directory::Data).unwrap();
        let second = fs.write_file("a.png", &STANDARD.encode(b"two"), Directory::Data);
        assert!(matches!(second, Err(GalleryError::FileAlreadyExists(_))));
        assert_eq!(fs.read_file("a.png").unwrap(), payload);
    }

    #[test]
    fn test_racing_writers_never_overwrite() {
        let dir = tempdir().unwrap();
        let fs = std::sync::Arc::new(LocalFilesystem::new(dir.path()).unwrap());

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let fs = fs.clone();
                std::thread::spawn(move || {
                    fs.write_file("same.png", &STANDARD.encode([i; 4]), Directory::Data)
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, GalleryError::FileAlreadyExists(_))));

        // Winner's bytes intact, no temp files left behind
        let winner = results.iter().find_map(|r| r.as_ref().ok()).unwrap();
        let stored = STANDARD.decode(fs.read_file(winner).unwrap()).unwrap();
        assert!(stored.iter().all(|&b| b == stored[0]));
        let leftovers = std::fs::read_dir(fs.dir_path(Directory::Data)).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_rejects_bad_base64() {
        let dir = tempdir().unwrap();
        let fs = LocalFilesystem::new(dir.path()).unwrap();

        let result = fs.write_file("bad.png", "not base64!", Directory::Data);
        assert!(matches!(result, Err(GalleryError::InvalidPayload(_))));
        assert!(fs.list_files(Directory::Data).unwrap().is_empty());
    }
}
