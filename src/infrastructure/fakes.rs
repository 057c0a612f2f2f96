use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use test_utils::jpeg_fixture;

use crate::domain::models::ApiError;
use crate::domain::models::Camera;
use crate::domain::models::CameraName;
use crate::domain::models::CameraStream;
use crate::domain::models::CameraStreamBox;
use crate::domain::models::CaptureError;
use crate::domain::models::ChatApi;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequestBody;
use crate::domain::models::ClaimResponse;
use crate::domain::models::Facing;
use crate::domain::models::SignIn;
use crate::domain::models::UserProfile;

pub struct FakeStream {
    facing: Facing,
    frame: Option<Vec<u8>>,
    live: Arc<AtomicUsize>,
    released: bool,
}

#[async_trait]
impl CameraStream for FakeStream {
    fn facing(&self) -> Facing {
        return self.facing;
    }

    fn frame(&mut self) -> Option<Vec<u8>> {
        return self.frame.clone();
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for FakeStream {
    fn drop(&mut self) {
        self.release();
    }
}

/// Counts an acquisition for as long as it is in flight.
struct Pending(Arc<AtomicUsize>);

impl Pending {
    fn new(count: Arc<AtomicUsize>) -> Pending {
        count.fetch_add(1, Ordering::SeqCst);
        return Pending(count);
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Camera that hands out counted streams so tests can check for leaks.
/// `peak` is the most streams that were ever live at once. A `stalled`
/// camera never finishes acquiring, like a device that blocks.
#[derive(Clone, Default)]
pub struct FakeCamera {
    pub live: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
    pub pending: Arc<AtomicUsize>,
    pub denied: bool,
    pub blank: bool,
    pub stalled: bool,
}

impl FakeCamera {
    pub fn denied() -> FakeCamera {
        return FakeCamera {
            denied: true,
            ..FakeCamera::default()
        };
    }

    pub fn live_streams(&self) -> usize {
        return self.live.load(Ordering::SeqCst);
    }

    pub fn peak_streams(&self) -> usize {
        return self.peak.load(Ordering::SeqCst);
    }

    pub fn pending_acquisitions(&self) -> usize {
        return self.pending.load(Ordering::SeqCst);
    }

    pub fn stream(&self, facing: Facing) -> Result<CameraStreamBox, CaptureError> {
        if self.denied {
            return Err(CaptureError::PermissionDenied);
        }

        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(live, Ordering::SeqCst);
        let mut frame = Some(jpeg_fixture());
        if self.blank {
            frame = None;
        }

        return Ok(Box::new(FakeStream {
            facing,
            frame,
            live: self.live.clone(),
            released: false,
        }));
    }
}

#[async_trait]
impl Camera for FakeCamera {
    fn name(&self) -> CameraName {
        return CameraName::None;
    }

    #[allow(clippy::implicit_return)]
    async fn acquire(&self, facing: Facing) -> Result<CameraStreamBox, CaptureError> {
        if self.stalled {
            let _pending = Pending::new(self.pending.clone());
            futures::future::pending::<()>().await;
        }
        return self.stream(facing);
    }
}

/// Canned backend. Each endpoint answers with whatever the test configured
/// and chat bodies are recorded.
#[derive(Default)]
pub struct FakeApi {
    pub chat_reply: Option<ChatReply>,
    pub profile: Option<UserProfile>,
    pub logout: Option<bool>,
    pub referral_link: Option<String>,
    pub claimable: Option<u64>,
    pub claim: Option<ClaimResponse>,
    pub chat_bodies: Mutex<Vec<ChatRequestBody>>,
    pub claimable_calls: AtomicUsize,
}

fn or_unavailable<T: Clone>(value: &Option<T>) -> Result<T, ApiError> {
    return value.clone().ok_or(ApiError::Status(503));
}

#[async_trait]
impl ChatApi for FakeApi {
    #[allow(clippy::implicit_return)]
    async fn chat(&self, body: ChatRequestBody) -> Result<ChatReply, ApiError> {
        self.chat_bodies.lock().unwrap().push(body);
        return or_unavailable(&self.chat_reply);
    }

    #[allow(clippy::implicit_return)]
    async fn user(&self) -> Result<UserProfile, ApiError> {
        return or_unavailable(&self.profile);
    }

    #[allow(clippy::implicit_return)]
    async fn logout(&self) -> Result<bool, ApiError> {
        return or_unavailable(&self.logout);
    }

    #[allow(clippy::implicit_return)]
    async fn referral_code(&self) -> Result<String, ApiError> {
        return or_unavailable(&self.referral_link);
    }

    #[allow(clippy::implicit_return)]
    async fn claimable_referrals(&self) -> Result<u64, ApiError> {
        self.claimable_calls.fetch_add(1, Ordering::SeqCst);
        return or_unavailable(&self.claimable);
    }

    #[allow(clippy::implicit_return)]
    async fn claim_referral(&self) -> Result<ClaimResponse, ApiError> {
        return or_unavailable(&self.claim);
    }

    #[allow(clippy::implicit_return)]
    async fn sign_in(&self, _token: &str, _referral_code: &str) -> Result<SignIn, ApiError> {
        return Ok(SignIn {
            cookie: Some("sid=fake".to_string()),
        });
    }
}
