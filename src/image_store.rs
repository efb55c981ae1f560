//! Gallery - Image Store
//!
//! Saves captured payloads as new files named `<unix-millis>.<ext>` in the
//! application-private data directory.

use std::sync::Arc;
use chrono::Utc;
use parking_lot::Mutex;

use crate::error::{GalleryError, GalleryResult};
use crate::platform::{Directory, FilesystemPlugin};

/// Name attempts before giving up on a crowded directory
const MAX_NAME_ATTEMPTS: usize = 8;

/// Image Store
pub struct ImageStore {
    fs: Arc<dyn FilesystemPlugin>,
    /// Last timestamp handed out
    last_stamp: Mutex<i64>,
}

impl ImageStore {
    pub fn new(fs: Arc<dyn FilesystemPlugin>) -> Self {
        Self {
            fs,
            last_stamp: Mutex::new(0),
        }
    }

    /// Current millis, strictly increasing per store
    fn next_stamp(&self) -> i64 {
        let mut last = self.last_stamp.lock();
        let now = Utc::now().timestamp_millis();
        *last = if now > *last { now } else { *last + 1 };
        *last
    }

    /// Persist a base64 payload and return its storage reference
    pub fn save(&self, payload: &str, extension: &str) -> GalleryResult<String> {
        if payload.is_empty() {
            return Err(GalleryError::StorageWrite("no photo data available".into()));
        }
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(GalleryError::StorageWrite(format!("invalid extension {:?}", extension)));
        }

        for _ in 0..MAX_NAME_ATTEMPTS {
            let file_name = format!("{}.{}", self.next_stamp(), extension);

            match self.fs.write_file(&file_name, payload, Directory::Data) {
                Ok(uri) => {
                    log::info!("Saved photo {}", uri);
                    return Ok(uri);
                }
                Err(GalleryError::FileAlreadyExists(existing)) => {
                    log::debug!("{} already taken, trying next name", existing);
                }
                Err(e @ GalleryError::StorageWrite(_)) => return Err(e),
                Err(e) => return Err(GalleryError::StorageWrite(e.to_string())),
            }
        }

        Err(GalleryError::StorageWrite("could not find a free file name".into()))
    }

    /// Read back the base64 payload behind a reference
    pub fn load(&self, reference: &str) -> GalleryResult<String> {
        match self.fs.read_file(reference) {
            Ok(data) => Ok(data),
            Err(e @ (GalleryError::StorageRead(_) | GalleryError::FileNotFound(_))) => Err(e),
            Err(e) => Err(GalleryError::StorageRead(format!("{}: {}", reference, e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::LocalFilesystem;
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use tempfile::tempdir;

    fn store(dir: &std::path::Path) -> ImageStore {
        ImageStore::new(Arc::new(LocalFilesystem::new(dir).unwrap()))
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let payload = STANDARD.encode([0xFFu8, 0xD8, 0xFF, 0xE0, 0x00, 0x10]);

        let reference = store.save(&payload, "jpeg").unwrap();
        assert!(reference.ends_with(".jpeg"));
        assert_eq!(store.load(&reference).unwrap(), payload);
    }

    #[test]
    fn test_same_millisecond_saves_do_not_collide() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let payload = STANDARD.encode(b"pixels");

        let refs: Vec<String> = (0..5).map(|_| store.save(&payload, "png").unwrap()).collect();
        let mut unique = refs.clone();
        unique.dedup();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_empty_payload_rejected() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        assert!(matches!(store.save("", "png"), Err(GalleryError::StorageWrite(_))));
        assert!(matches!(store.save("AAAA", ""), Err(GalleryError::StorageWrite(_))));
        assert!(matches!(store.save("%%%", "png"), Err(GalleryError::StorageWrite(_))));
    }

    #[test]
    fn test_missing_reference() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        assert!(matches!(store.load("1699999999999.png"), Err(GalleryError::FileNotFound(_))));
    }
}
