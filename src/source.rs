//! Gallery - Capture Source Selection

use crate::platform::{CameraPermissions, CameraSource};

/// Pick the capture source for the current runtime and grants.
///
/// A plain web view always uses the camera. Natively, both grants let the
/// user choose at capture time, a photo-library-only grant opens the picker,
/// anything else falls back to the camera.
pub fn select_source(is_native: bool, camera_granted: bool, photos_granted: bool) -> CameraSource {
    if !is_native {
        return CameraSource::Camera;
    }

    if camera_granted && photos_granted {
        CameraSource::Prompt
    } else if photos_granted {
        CameraSource::Photos
    } else {
        CameraSource::Camera
    }
}

/// [`select_source`] from cached grants
pub fn source_for(is_native: bool, perms: &CameraPermissions) -> CameraSource {
    select_source(is_native, perms.camera.is_granted(), perms.photos.is_granted())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_table() {
        let cases = [
            (true, true, true, CameraSource::Prompt),
            (true, false, true, CameraSource::Photos),
            (true, true, false, CameraSource::Camera),
            (true, false, false, CameraSource::Camera),
        ];
        for (native, camera, photos, expected) in cases {
            assert_eq!(select_source(native, camera, photos), expected);
        }
    }

    #[test]
    fn test_web_always_camera() {
        for camera in [false, true] {
            for photos in [false, true] {
                assert_eq!(select_source(false, camera, photos), CameraSource::Camera);
            }
        }
    }
}
