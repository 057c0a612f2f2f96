#[cfg(test)]
#[path = "noop_test.rs"]
mod tests;

use async_trait::async_trait;

use crate::domain::models::Camera;
use crate::domain::models::CameraName;
use crate::domain::models::CameraStreamBox;
use crate::domain::models::CaptureError;
use crate::domain::models::Facing;

#[derive(Default)]
pub struct NoopCamera {}

#[async_trait]
impl Camera for NoopCamera {
    fn name(&self) -> CameraName {
        return CameraName::None;
    }

    #[allow(clippy::implicit_return)]
    async fn acquire(&self, _facing: Facing) -> Result<CameraStreamBox, CaptureError> {
        return Err(CaptureError::Unavailable(
            "camera is disabled. Set 'camera' to 'ffmpeg' to enable it".to_string(),
        ));
    }
}
