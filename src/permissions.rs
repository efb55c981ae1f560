//! Gallery - Permission Gateway
//!
//! Caches the last known camera/photo-library grants. Platform failures are
//! logged and never reach the caller.

use std::sync::Arc;
use serde::{Deserialize, Serialize};

use crate::platform::{CameraPermissions, CameraPlugin, PermissionKind};

/// Minimum grants needed before a capture may start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionPolicy {
    /// Camera or photo library
    #[default]
    RequireAny,
    /// Camera and photo library
    RequireBoth,
}

impl PermissionPolicy {
    pub fn is_satisfied(self, perms: &CameraPermissions) -> bool {
        let camera = perms.camera.is_granted();
        let photos = perms.photos.is_granted();
        match self {
            PermissionPolicy::RequireAny => camera || photos,
            PermissionPolicy::RequireBoth => camera && photos,
        }
    }
}

/// Permission Gateway
pub struct PermissionGateway {
    camera: Arc<dyn CameraPlugin>,
    /// Platform name, for log lines
    platform: String,
    state: CameraPermissions,
}

impl PermissionGateway {
    pub fn new(camera: Arc<dyn CameraPlugin>, platform: impl Into<String>) -> Self {
        Self {
            camera,
            platform: platform.into(),
            state: CameraPermissions::default(),
        }
    }

    /// Last known grants
    pub fn state(&self) -> CameraPermissions {
        self.state
    }

    pub fn has_camera(&self) -> bool {
        self.state.camera.is_granted()
    }

    pub fn has_photos(&self) -> bool {
        self.state.photos.is_granted()
    }

    /// Both capabilities granted
    pub fn has_all(&self) -> bool {
        self.has_camera() && self.has_photos()
    }

    /// Refresh cached grants from the platform
    pub fn query(&mut self) -> CameraPermissions {
        match self.camera.check_permissions() {
            Ok(perms) => {
                log::debug!("Permissions checked: {:?}", perms);
                self.state = perms;
            }
            Err(e) => {
                log::error!(
                    "Permissions are not enabled on this device ({} platform): {}",
                    self.platform, e
                );
            }
        }
        self.state
    }

    /// Prompt for camera and photo library access
    pub fn request(&mut self) -> CameraPermissions {
        match self
            .camera
            .request_permissions(&[PermissionKind::Camera, PermissionKind::Photos])
        {
            Ok(perms) => {
                log::info!("Permissions after request: {:?}", perms);
                self.state = perms;
            }
            Err(e) => {
                log::error!(
                    "Permissions are not enabled on this device ({} platform): {}",
                    self.platform, e
                );
            }
        }
        self.state
    }
}
