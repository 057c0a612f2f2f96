pub mod ffmpeg;
pub mod noop;

use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::Camera;
use crate::domain::models::CameraName;

pub type CameraBox = Arc<dyn Camera + Send + Sync>;

pub struct CameraManager {}

impl CameraManager {
    pub fn get(name: CameraName) -> Result<CameraBox> {
        if name == CameraName::Ffmpeg {
            return Ok(Arc::<ffmpeg::FfmpegCamera>::default());
        }

        if name == CameraName::None {
            return Ok(Arc::<noop::NoopCamera>::default());
        }

        bail!(format!("No camera implemented for {name}"))
    }
}
