use anyhow::Error;
use tui_textarea::Input;

use super::ApiError;
use super::CameraStreamBox;
use super::CaptureError;
use super::ChatReply;
use super::ImagePayload;
use super::PlaceholderHandle;
use super::UserProfile;
use crate::domain::services::ClaimOutcome;
use crate::domain::services::ReferralStatus;

pub enum Event {
    AttachmentLoaded(Result<ImagePayload, Error>),
    CameraAcquired(u64, Result<CameraStreamBox, CaptureError>),
    ChatSettled(PlaceholderHandle, Result<ChatReply, ApiError>),
    ClipboardCopied(Result<(), Error>),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardEsc(),
    KeyboardPaste(String),
    LoggedOut(Result<bool, ApiError>),
    ProfileLoaded(Result<UserProfile, ApiError>),
    ReferralClaimed(ClaimOutcome),
    ReferralLink(String),
    ReferralStatus(ReferralStatus),
    UIResize(),
    UIScrollDown(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UIScrollUp(),
    UITick(),
}
