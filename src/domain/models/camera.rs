#[cfg(test)]
#[path = "camera_test.rs"]
mod tests;

use async_trait::async_trait;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

use super::CaptureError;

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum CameraName {
    Ffmpeg,
    None,
}

impl CameraName {
    pub fn parse(text: String) -> Option<CameraName> {
        return CameraName::iter().find(|e| return e.to_string() == text);
    }
}

/// Camera orientation. Rear is the environment-facing camera.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Facing {
    Front,
    Rear,
}

impl Facing {
    pub fn parse(text: String) -> Option<Facing> {
        return Facing::iter().find(|e| return e.to_string() == text);
    }

    pub fn flip(self) -> Facing {
        match self {
            Facing::Front => return Facing::Rear,
            Facing::Rear => return Facing::Front,
        }
    }
}

/// A live video stream. Dropping a stream must release the device as well,
/// but owners call `release` explicitly so the hand-off is visible.
#[async_trait]
pub trait CameraStream: Send + Sync {
    fn facing(&self) -> Facing;

    /// Most recent JPEG encoded frame, if the device produced one yet.
    fn frame(&mut self) -> Option<Vec<u8>>;

    /// Stops the stream. Calling it more than once is a no-op.
    fn release(&mut self);

    /// Stops the stream and resolves once the device is free again.
    #[allow(clippy::implicit_return)]
    async fn shutdown(&mut self) {
        self.release();
    }
}

pub type CameraStreamBox = Box<dyn CameraStream>;

#[async_trait]
pub trait Camera {
    fn name(&self) -> CameraName;

    /// Opens a stream for the given facing mode. Resolves once the device is
    /// delivering frames, or fails with `PermissionDenied` / `Unavailable`.
    async fn acquire(&self, facing: Facing) -> Result<CameraStreamBox, CaptureError>;
}

/// Issued when an acquisition starts. Completions carrying an outdated
/// ticket id are released instead of being installed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AcquireTicket {
    pub id: u64,
    pub facing: Facing,
}

/// A rotation hands back the stream it replaced. It has to be shut down
/// before the new ticket is acquired so the device is never held twice.
pub struct Rotation {
    pub ticket: AcquireTicket,
    pub previous: CameraStreamBox,
}
