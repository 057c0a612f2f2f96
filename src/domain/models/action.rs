use std::path::PathBuf;

use super::AcquireTicket;
use super::CameraStreamBox;
use super::ChatRequest;
use super::ThemePreference;

pub enum Action {
    /// Carries the stream being replaced, if any, to shut down first.
    AcquireCamera(AcquireTicket, Option<CameraStreamBox>),
    ChatRequest(ChatRequest),
    ClaimReferral(),
    CopyToClipboard(String),
    FetchProfile(),
    LoadAttachment(PathBuf),
    Logout(),
    SaveTheme(ThemePreference),
}
