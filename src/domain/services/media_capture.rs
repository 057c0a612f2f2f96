#[cfg(test)]
#[path = "media_capture_test.rs"]
mod tests;

use crate::domain::models::AcquireTicket;
use crate::domain::models::CameraStreamBox;
use crate::domain::models::CaptureError;
use crate::domain::models::Facing;
use crate::domain::models::ImagePayload;
use crate::domain::models::Rotation;

enum CaptureState {
    Closed,
    Opening {
        ticket: u64,
        facing: Facing,
    },
    Open {
        facing: Facing,
        stream: CameraStreamBox,
    },
}

/// What the UI should show for the camera.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CaptureStatus {
    Closed,
    Starting(Facing),
    Live(Facing),
}

/// Owns the camera stream and sequences open, rotate, capture and close.
///
/// Acquisition is split in two: `open`/`rotate` hand out a ticket and the
/// caller acquires the stream elsewhere, then reports the result through
/// `complete`. While a ticket is outstanding, `rotate` and `capture` are
/// rejected with `CaptureError::Busy`. Closing invalidates the ticket, so a
/// stream that shows up afterwards gets released on arrival.
pub struct MediaCaptureSession {
    state: CaptureState,
    last_ticket: u64,
}

impl Default for MediaCaptureSession {
    fn default() -> MediaCaptureSession {
        return MediaCaptureSession {
            state: CaptureState::Closed,
            last_ticket: 0,
        };
    }
}

impl Drop for MediaCaptureSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl MediaCaptureSession {
    fn issue(&mut self, facing: Facing) -> AcquireTicket {
        self.last_ticket += 1;
        self.state = CaptureState::Opening {
            ticket: self.last_ticket,
            facing,
        };

        return AcquireTicket {
            id: self.last_ticket,
            facing,
        };
    }

    pub fn status(&self) -> CaptureStatus {
        match &self.state {
            CaptureState::Closed => return CaptureStatus::Closed,
            CaptureState::Opening { facing, .. } => return CaptureStatus::Starting(*facing),
            CaptureState::Open { facing, .. } => return CaptureStatus::Live(*facing),
        }
    }

    pub fn is_closed(&self) -> bool {
        return matches!(self.state, CaptureState::Closed);
    }

    pub fn open(&mut self, facing: Facing) -> Result<AcquireTicket, CaptureError> {
        if !self.is_closed() {
            return Err(CaptureError::AlreadyOpen);
        }

        tracing::debug!(facing = %facing, "Opening camera");
        return Ok(self.issue(facing));
    }

    /// Gives up the live stream and asks for one facing the other way. The
    /// old stream comes back in the `Rotation` for the caller to shut down.
    pub fn rotate(&mut self) -> Result<Rotation, CaptureError> {
        match &self.state {
            CaptureState::Closed => return Err(CaptureError::NotOpen),
            CaptureState::Opening { .. } => return Err(CaptureError::Busy),
            CaptureState::Open { .. } => {}
        }

        let (facing, previous) = match std::mem::replace(&mut self.state, CaptureState::Closed) {
            CaptureState::Open { facing, stream } => (facing, stream),
            _ => return Err(CaptureError::NotOpen),
        };

        tracing::debug!(from = %facing, to = %facing.flip(), "Rotating camera");
        return Ok(Rotation {
            ticket: self.issue(facing.flip()),
            previous,
        });
    }

    /// Installs the result of acquiring `ticket`. Errors are returned for the
    /// current ticket only, stale completions are released silently.
    pub fn complete(
        &mut self,
        ticket: u64,
        result: Result<CameraStreamBox, CaptureError>,
    ) -> Result<(), CaptureError> {
        let current = match &self.state {
            CaptureState::Opening {
                ticket: expected,
                facing,
            } if *expected == ticket => Some(*facing),
            _ => None,
        };

        match (current, result) {
            (Some(facing), Ok(stream)) => {
                self.state = CaptureState::Open { facing, stream };
                return Ok(());
            }
            (Some(facing), Err(err)) => {
                tracing::warn!(error = ?err, facing = %facing, "Camera acquisition failed");
                self.state = CaptureState::Closed;
                return Err(err);
            }
            (None, Ok(mut stream)) => {
                tracing::debug!(ticket, "Releasing stream for a cancelled acquisition");
                stream.release();
                return Ok(());
            }
            (None, Err(_)) => {
                return Ok(());
            }
        }
    }

    /// Takes the current frame as a JPEG payload and closes the camera.
    pub fn capture(&mut self) -> Result<ImagePayload, CaptureError> {
        let frame = match &mut self.state {
            CaptureState::Closed => return Err(CaptureError::NotOpen),
            CaptureState::Opening { .. } => return Err(CaptureError::Busy),
            CaptureState::Open { stream, .. } => stream.frame(),
        };

        let bytes = frame.ok_or(CaptureError::NoFrame)?;
        self.close();

        return Ok(ImagePayload::jpeg(bytes));
    }

    pub fn close(&mut self) {
        let state = std::mem::replace(&mut self.state, CaptureState::Closed);
        if let CaptureState::Open { mut stream, .. } = state {
            stream.release();
        }
    }
}
