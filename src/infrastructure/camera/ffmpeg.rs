#[cfg(test)]
#[path = "ffmpeg_test.rs"]
mod tests;

use std::process::Stdio;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::process::Child;
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Camera;
use crate::domain::models::CameraName;
use crate::domain::models::CameraStream;
use crate::domain::models::CameraStreamBox;
use crate::domain::models::CaptureError;
use crate::domain::models::Facing;

const JPEG_START: [u8; 2] = [0xFF, 0xD8];
const JPEG_END: [u8; 2] = [0xFF, 0xD9];

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }

    return haystack[from..]
        .windows(needle.len())
        .position(|window| return window == needle)
        .map(|idx| return idx + from);
}

/// Pops the first complete JPEG image out of an MJPEG byte stream. Bytes
/// before the image are discarded, a partial image is left in place.
pub fn next_jpeg_frame(buf: &mut Vec<u8>) -> Option<Vec<u8>> {
    let start = match find(buf, &JPEG_START, 0) {
        Some(start) => start,
        None => {
            // A trailing 0xFF may be the first half of the next marker.
            let keep = buf.len().min(1);
            buf.drain(..buf.len() - keep);
            return None;
        }
    };

    let end = find(buf, &JPEG_END, start + JPEG_START.len())? + JPEG_END.len();
    let frame = buf[start..end].to_vec();
    buf.drain(..end);

    return Some(frame);
}

/// Reads until a whole frame is buffered. `None` once the stream ends.
pub async fn read_frame<R: AsyncRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> Option<Vec<u8>> {
    let mut chunk = [0u8; 8192];
    loop {
        if let Some(frame) = next_jpeg_frame(buf) {
            return Some(frame);
        }

        match reader.read(&mut chunk).await {
            Ok(0) => return None,
            Ok(len) => buf.extend_from_slice(&chunk[..len]),
            Err(err) => {
                tracing::error!(error = ?err, "Failed reading from ffmpeg");
                return None;
            }
        }
    }
}

/// Maps ffmpeg's diagnostics for a stream that never produced a frame.
pub fn classify_failure(stderr: &str) -> CaptureError {
    if stderr.contains("Permission denied") {
        return CaptureError::PermissionDenied;
    }

    let reason = stderr
        .lines()
        .map(|line| return line.trim())
        .filter(|line| return !line.is_empty())
        .last()
        .unwrap_or("ffmpeg exited without producing a frame");

    return CaptureError::Unavailable(reason.to_string());
}

pub struct FfmpegStream {
    facing: Facing,
    child: Child,
    latest: Arc<Mutex<Option<Vec<u8>>>>,
    reader: JoinHandle<()>,
    released: bool,
}

#[async_trait]
impl CameraStream for FfmpegStream {
    fn facing(&self) -> Facing {
        return self.facing;
    }

    fn frame(&mut self) -> Option<Vec<u8>> {
        match self.latest.lock() {
            Ok(latest) => return latest.clone(),
            Err(_) => return None,
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }

        self.released = true;
        self.reader.abort();
        if let Err(err) = self.child.start_kill() {
            tracing::warn!(error = ?err, "Failed to stop ffmpeg");
        }
        tracing::debug!(facing = %self.facing, "Released camera stream");
    }

    /// Kills ffmpeg and reaps it, so the device is closed on return.
    #[allow(clippy::implicit_return)]
    async fn shutdown(&mut self) {
        self.reader.abort();
        if let Err(err) = self.child.kill().await {
            tracing::warn!(error = ?err, "Failed to stop ffmpeg");
        }
        self.released = true;
        tracing::debug!(facing = %self.facing, "Camera stream shut down");
    }
}

impl Drop for FfmpegStream {
    fn drop(&mut self) {
        self.release();
    }
}

pub struct FfmpegCamera {
    binary: String,
    front_device: String,
    rear_device: String,
}

impl Default for FfmpegCamera {
    fn default() -> FfmpegCamera {
        return FfmpegCamera {
            binary: Config::get(ConfigKey::FfmpegPath),
            front_device: Config::get(ConfigKey::CameraFrontDevice),
            rear_device: Config::get(ConfigKey::CameraRearDevice),
        };
    }
}

impl FfmpegCamera {
    pub fn device(&self, facing: Facing) -> &str {
        match facing {
            Facing::Front => return &self.front_device,
            Facing::Rear => return &self.rear_device,
        }
    }

    pub fn args(&self, facing: Facing) -> Vec<String> {
        return [
            "-hide_banner",
            "-nostats",
            "-loglevel",
            "error",
            "-f",
            "v4l2",
            "-i",
            self.device(facing),
            "-f",
            "image2pipe",
            "-vcodec",
            "mjpeg",
            "-",
        ]
        .iter()
        .map(|arg| return arg.to_string())
        .collect();
    }
}

#[async_trait]
impl Camera for FfmpegCamera {
    fn name(&self) -> CameraName {
        return CameraName::Ffmpeg;
    }

    #[allow(clippy::implicit_return)]
    async fn acquire(&self, facing: Facing) -> Result<CameraStreamBox, CaptureError> {
        tracing::debug!(device = self.device(facing), %facing, "Starting ffmpeg");
        let mut child = Command::new(&self.binary)
            .args(self.args(facing))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| return CaptureError::Unavailable(err.to_string()))?;

        let (mut stdout, mut stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                return Err(CaptureError::Unavailable(
                    "ffmpeg pipes were not opened".to_string(),
                ))
            }
        };

        let mut buf = Vec::new();
        let first = match read_frame(&mut stdout, &mut buf).await {
            Some(frame) => frame,
            None => {
                let mut diagnostics = String::new();
                if let Err(err) = stderr.read_to_string(&mut diagnostics).await {
                    tracing::warn!(error = ?err, "Failed reading ffmpeg diagnostics");
                }
                if let Err(err) = child.kill().await {
                    tracing::warn!(error = ?err, "Failed to stop ffmpeg");
                }
                tracing::error!(stderr = %diagnostics, "Camera stream failed to start");
                return Err(classify_failure(&diagnostics));
            }
        };

        let latest = Arc::new(Mutex::new(Some(first)));
        let reader_latest = latest.clone();
        let reader = tokio::spawn(async move {
            let mut sink = tokio::io::sink();
            let _ = tokio::join!(
                async {
                    while let Some(frame) = read_frame(&mut stdout, &mut buf).await {
                        if let Ok(mut latest) = reader_latest.lock() {
                            *latest = Some(frame);
                        }
                    }
                },
                tokio::io::copy(&mut stderr, &mut sink)
            );
            tracing::debug!("ffmpeg stream ended");
        });

        return Ok(Box::new(FfmpegStream {
            facing,
            child,
            latest,
            reader,
            released: false,
        }));
    }
}
