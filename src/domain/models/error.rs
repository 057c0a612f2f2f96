use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("sign-in was rejected: {}", .0.as_deref().unwrap_or("no reason given"))]
    AuthRejected(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Error accessing the camera. Please make sure you've granted camera permissions.")]
    PermissionDenied,
    #[error("No camera is available: {0}")]
    Unavailable(String),
    #[error("The camera is already open.")]
    AlreadyOpen,
    #[error("The camera is not open.")]
    NotOpen,
    #[error("The camera is still starting, try again in a moment.")]
    Busy,
    #[error("The camera has not produced a frame yet.")]
    NoFrame,
}
