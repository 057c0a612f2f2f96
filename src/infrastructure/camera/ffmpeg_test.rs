use anyhow::bail;
use anyhow::Result;
use test_utils::jpeg_fixture;

use super::classify_failure;
use super::next_jpeg_frame;
use super::read_frame;
use super::FfmpegCamera;
use crate::domain::models::Camera;
use crate::domain::models::CameraStream;
use crate::domain::models::CaptureError;
use crate::domain::models::Facing;

impl FfmpegCamera {
    fn with_binary(binary: &str) -> FfmpegCamera {
        return FfmpegCamera {
            binary: binary.to_string(),
            front_device: "/dev/video1".to_string(),
            rear_device: "/dev/video0".to_string(),
        };
    }
}

#[test]
fn it_extracts_a_frame_and_drops_leading_noise() {
    let mut buf = vec![0x00, 0x01];
    buf.extend(jpeg_fixture());
    buf.extend([0xFF, 0xD8, 0x12]);

    let frame = next_jpeg_frame(&mut buf);

    assert_eq!(frame, Some(jpeg_fixture()));
    assert_eq!(buf, vec![0xFF, 0xD8, 0x12]);
}

#[test]
fn it_waits_for_the_end_of_a_partial_frame() {
    let mut buf = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00];

    assert_eq!(next_jpeg_frame(&mut buf), None);
    assert_eq!(buf.len(), 5);
}

#[test]
fn it_keeps_a_trailing_marker_byte() {
    let mut buf = vec![0x10, 0x20, 0xFF];

    assert_eq!(next_jpeg_frame(&mut buf), None);
    assert_eq!(buf, vec![0xFF]);
}

#[tokio::test]
async fn it_reads_frames_split_across_chunks() -> Result<()> {
    let mut stream: &[u8] = &[jpeg_fixture(), jpeg_fixture()].concat();
    let mut buf = Vec::new();

    assert_eq!(read_frame(&mut stream, &mut buf).await, Some(jpeg_fixture()));
    assert_eq!(read_frame(&mut stream, &mut buf).await, Some(jpeg_fixture()));
    assert_eq!(read_frame(&mut stream, &mut buf).await, None);
    return Ok(());
}

#[test]
fn it_maps_permission_failures() {
    let err = classify_failure("[video4linux2,v4l2 @ 0x1] Cannot open video device /dev/video0: Permission denied\n");
    assert_eq!(err, CaptureError::PermissionDenied);
}

#[test]
fn it_maps_other_failures_to_unavailable() {
    let err = classify_failure("first line\n/dev/video9: No such file or directory\n\n");
    assert_eq!(
        err,
        CaptureError::Unavailable("/dev/video9: No such file or directory".to_string())
    );

    let err = classify_failure("");
    assert_eq!(
        err,
        CaptureError::Unavailable("ffmpeg exited without producing a frame".to_string())
    );
}

#[test]
fn it_picks_the_device_for_the_facing_mode() {
    let camera = FfmpegCamera::with_binary("ffmpeg");

    assert_eq!(camera.device(Facing::Front), "/dev/video1");
    assert_eq!(camera.device(Facing::Rear), "/dev/video0");
    insta::assert_snapshot!(camera.args(Facing::Rear).join(" "), @"-hide_banner -nostats -loglevel error -f v4l2 -i /dev/video0 -f image2pipe -vcodec mjpeg -");
}

#[tokio::test]
async fn it_fails_when_ffmpeg_is_missing() -> Result<()> {
    let camera = FfmpegCamera::with_binary("/nonexistent/lenschat-ffmpeg");

    match camera.acquire(Facing::Rear).await {
        Err(CaptureError::Unavailable(_)) => {}
        _ => bail!("Expected the camera to be unavailable"),
    }
    return Ok(());
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn it_waits_for_ffmpeg_to_exit_on_shutdown() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir()?;
    let pid_file = dir.path().join("ffmpeg.pid");
    let script = dir.path().join("ffmpeg");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\necho $$ > '{}'\nprintf '\\377\\330\\377\\331'\nexec sleep 30\n",
            pid_file.display()
        ),
    )?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;

    let camera = FfmpegCamera::with_binary(&script.to_string_lossy());
    let mut stream = match camera.acquire(Facing::Front).await {
        Ok(stream) => stream,
        Err(err) => bail!("Expected a stream, got {err}"),
    };
    assert_eq!(stream.frame(), Some(vec![0xFF, 0xD8, 0xFF, 0xD9]));

    let pid = std::fs::read_to_string(&pid_file)?.trim().to_string();
    let proc_dir = std::path::PathBuf::from(format!("/proc/{pid}"));
    assert!(proc_dir.exists());

    stream.shutdown().await;
    assert!(!proc_dir.exists());
    return Ok(());
}
