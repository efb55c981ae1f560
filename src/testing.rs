//! Test doubles for the device services.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Arc;
use parking_lot::Mutex;

use crate::error::{GalleryError, GalleryResult};
use crate::platform::{
    CameraPermissions, CameraPlugin, CameraSource, CapturedPhoto, Directory, FilesystemPlugin,
    ImageOptions, PermissionKind, PreferencesPlugin,
};

/// Camera with scripted grants and pictures
#[derive(Default)]
pub struct ScriptedCamera {
    current: Mutex<CameraPermissions>,
    /// Grants after a prompt; `None` leaves them as they are
    on_request: Mutex<Option<CameraPermissions>>,
    unavailable: Mutex<bool>,
    photos: Mutex<VecDeque<CapturedPhoto>>,
    requests: Mutex<usize>,
    captures: Mutex<Vec<ImageOptions>>,
}

impl ScriptedCamera {
    pub fn new(current: CameraPermissions) -> Self {
        Self {
            current: Mutex::new(current),
            ..Default::default()
        }
    }

    pub fn answer_requests_with(&self, perms: CameraPermissions) {
        *self.on_request.lock() = Some(perms);
    }

    pub fn set_permissions_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock() = unavailable;
    }

    pub fn queue_photo(&self, base64: &str, format: &str) {
        self.photos.lock().push_back(CapturedPhoto {
            base64: Some(base64.to_string()),
            format: format.to_string(),
        });
    }

    pub fn request_count(&self) -> usize {
        *self.requests.lock()
    }

    pub fn capture_count(&self) -> usize {
        self.captures.lock().len()
    }

    pub fn last_source(&self) -> Option<CameraSource> {
        self.captures.lock().last().map(|o| o.source)
    }

    pub fn last_options(&self) -> Option<ImageOptions> {
        self.captures.lock().last().cloned()
    }
}

impl CameraPlugin for ScriptedCamera {
    fn check_permissions(&self) -> GalleryResult<CameraPermissions> {
        if *self.unavailable.lock() {
            return Err(GalleryError::PermissionUnavailable("not implemented".into()));
        }
        Ok(*self.current.lock())
    }

    fn request_permissions(&self, _kinds: &[PermissionKind]) -> GalleryResult<CameraPermissions> {
        if *self.unavailable.lock() {
            return Err(GalleryError::PermissionUnavailable("not implemented".into()));
        }
        *self.requests.lock() += 1;
        let mut current = self.current.lock();
        if let Some(answer) = *self.on_request.lock() {
            *current = answer;
        }
        Ok(*current)
    }

    fn get_photo(&self, options: &ImageOptions) -> GalleryResult<CapturedPhoto> {
        self.captures.lock().push(options.clone());
        Ok(self.photos.lock().pop_front().unwrap_or(CapturedPhoto {
            base64: None,
            format: "jpeg".into(),
        }))
    }
}

/// In-memory preferences whose writes can be made to fail
#[derive(Default)]
pub struct FailingPreferences {
    values: Mutex<HashMap<String, String>>,
    fail_writes: Mutex<bool>,
}

impl FailingPreferences {
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }
}

impl PreferencesPlugin for FailingPreferences {
    fn get(&self, key: &str) -> GalleryResult<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> GalleryResult<()> {
        if *self.fail_writes.lock() {
            return Err(GalleryError::Preferences("disk I/O error".into()));
        }
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> GalleryResult<()> {
        if *self.fail_writes.lock() {
            return Err(GalleryError::Preferences("disk I/O error".into()));
        }
        self.values.lock().remove(key);
        Ok(())
    }
}

/// Filesystem whose reads can be made to fail with an I/O error
pub struct FlakyFilesystem {
    inner: Arc<dyn FilesystemPlugin>,
    fail_reads: Mutex<bool>,
}

impl FlakyFilesystem {
    pub fn new(inner: Arc<dyn FilesystemPlugin>) -> Self {
        Self {
            inner,
            fail_reads: Mutex::new(false),
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock() = fail;
    }
}

impl FilesystemPlugin for FlakyFilesystem {
    fn write_file(&self, path: &str, data: &str, directory: Directory) -> GalleryResult<String> {
        self.inner.write_file(path, data, directory)
    }

    fn read_file(&self, reference: &str) -> GalleryResult<String> {
        if *self.fail_reads.lock() {
            return Err(io::Error::new(io::ErrorKind::Other, "EIO").into());
        }
        self.inner.read_file(reference)
    }

    fn list_files(&self, directory: Directory) -> GalleryResult<Vec<String>> {
        self.inner.list_files(directory)
    }

    fn delete_file(&self, reference: &str) -> GalleryResult<()> {
        self.inner.delete_file(reference)
    }
}
