//! Gallery - Desktop Platform
//!
//! Stand-in device services for running the workflow off-device. The
//! "camera" imports an image file; permission prompts are answered from
//! preset choices.

use std::path::{Path, PathBuf};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use parking_lot::Mutex;

use crate::error::{GalleryError, GalleryResult};
use crate::platform::{
    CameraPermissions, CameraPlugin, CapturedPhoto, ImageOptions, PermissionKind,
    PermissionState, PlatformInfo,
};

/// Desktop camera
pub struct DesktopCamera {
    /// Current grants
    grants: Mutex<CameraPermissions>,
    /// How the "user" answers a prompt
    answers: CameraPermissions,
    /// File returned by the next capture
    pending: Mutex<Option<PathBuf>>,
}

impl DesktopCamera {
    /// Camera that starts un-asked and answers prompts with `answers`
    pub fn new(answers: CameraPermissions) -> Self {
        Self {
            grants: Mutex::new(CameraPermissions::default()),
            answers,
            pending: Mutex::new(None),
        }
    }

    /// Queue the file the next capture returns
    pub fn load_from(&self, path: &Path) {
        *self.pending.lock() = Some(path.to_path_buf());
    }

    /// Image extension from file content, falling back to the file name
    fn detect_format(path: &Path, data: &[u8]) -> GalleryResult<String> {
        if let Ok(format) = image::guess_format(data) {
            if let Some(ext) = format.extensions_str().first() {
                return Ok((*ext).to_string());
            }
        }

        path.extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| {
                GalleryError::CaptureFailed(format!("unrecognized image: {}", path.display()))
            })
    }
}

impl CameraPlugin for DesktopCamera {
    fn check_permissions(&self) -> GalleryResult<CameraPermissions> {
        Ok(*self.grants.lock())
    }

    fn request_permissions(&self, kinds: &[PermissionKind]) -> GalleryResult<CameraPermissions> {
        let mut grants = self.grants.lock();
        for &kind in kinds {
            if grants.get(kind) != PermissionState::Granted {
                grants.set(kind, self.answers.get(kind));
            }
        }
        Ok(*grants)
    }

    fn get_photo(&self, options: &ImageOptions) -> GalleryResult<CapturedPhoto> {
        let Some(path) = self.pending.lock().take() else {
            log::info!("Capture dismissed (source: {})", options.source);
            return Ok(CapturedPhoto {
                base64: None,
                format: "jpeg".into(),
            });
        };

        let data = std::fs::read(&path)
            .map_err(|e| GalleryError::CaptureFailed(format!("{}: {}", path.display(), e)))?;
        let format = Self::detect_format(&path, &data)?;

        log::debug!(
            "Captured {} ({} bytes, {}) from {}",
            path.display(), data.len(), format, options.source
        );

        Ok(CapturedPhoto {
            base64: Some(STANDARD.encode(&data)),
            format,
        })
    }
}

/// Desktop runtime identity
pub struct DesktopPlatform {
    native: bool,
}

impl DesktopPlatform {
    pub fn native() -> Self {
        Self { native: true }
    }

    /// Behave like a plain web view
    pub fn web() -> Self {
        Self { native: false }
    }
}

impl PlatformInfo for DesktopPlatform {
    fn is_native_platform(&self) -> bool {
        self.native
    }

    fn platform(&self) -> &str {
        if self.native { "desktop" } else { "web" }
    }
}
