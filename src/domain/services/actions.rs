#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use tokio::fs;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::clipboard::ClipboardService;
use super::ClaimOutcome;
use super::Preferences;
use super::ReferralPoller;
use super::SessionStore;
use super::ThemeStore;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::ImagePayload;
use crate::infrastructure::api::ApiBox;
use crate::infrastructure::camera::CameraBox;

/// Reads an image from disk for the pending attachment.
pub async fn load_attachment(path: &Path) -> Result<ImagePayload> {
    let mime = ImagePayload::mime_for_path(path).ok_or_else(|| {
        return anyhow!("Please choose an image file (png, jpg, jpeg, gif or webp).");
    })?;

    let bytes = fs::read(path)
        .await
        .map_err(|err| return anyhow!("Could not read {}: {err}", path.display()))?;
    if bytes.is_empty() {
        bail!("{} is empty.", path.display());
    }

    tracing::debug!(path = ?path, mime, size = bytes.len(), "Loaded attachment");
    return Ok(ImagePayload::new(mime, bytes));
}

fn send(tx: &mpsc::UnboundedSender<Event>, event: Event) {
    if tx.send(event).is_err() {
        tracing::debug!("UI is gone, dropping event");
    }
}

/// Fetches the referral link, then polls eligibility for as long as the
/// process runs. Only the first successful profile load starts it.
async fn start_referrals(
    api: ApiBox,
    tx: mpsc::UnboundedSender<Event>,
    started: Arc<AtomicBool>,
) -> Result<()> {
    if started.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    match api.referral_code().await {
        Ok(link) => send(&tx, Event::ReferralLink(link)),
        Err(err) => tracing::error!(error = ?err, "Error fetching referral code"),
    }

    return ReferralPoller::new(api).start(tx).await;
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs until every action sender is gone. Camera acquisitions still in
    /// flight at that point are cancelled, which stops their processes.
    pub async fn start(
        api: ApiBox,
        camera: CameraBox,
        preferences: Preferences,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let referrals_started = Arc::new(AtomicBool::new(false));
        let mut acquisitions = JoinSet::new();

        loop {
            let action = tokio::select! {
                action = rx.recv() => action,
                Some(_) = acquisitions.join_next(), if !acquisitions.is_empty() => continue,
            };
            let action = match action {
                Some(action) => action,
                None => break,
            };

            let worker_tx = tx.clone();
            let worker_api = api.clone();

            match action {
                Action::AcquireCamera(ticket, previous) => {
                    let worker_camera = camera.clone();
                    acquisitions.spawn(async move {
                        if let Some(mut previous) = previous {
                            previous.shutdown().await;
                        }
                        let res = worker_camera.acquire(ticket.facing).await;
                        // A stream that can't be delivered is released by its Drop.
                        send(&worker_tx, Event::CameraAcquired(ticket.id, res));
                    });
                }
                Action::ChatRequest(request) => {
                    tokio::spawn(async move {
                        let res = worker_api.chat(request.body()).await;
                        send(&worker_tx, Event::ChatSettled(request.handle, res));
                    });
                }
                Action::ClaimReferral() => {
                    tokio::spawn(async move {
                        let poller = ReferralPoller::new(worker_api);
                        let outcome = poller.claim().await;
                        let claimed = matches!(outcome, ClaimOutcome::Claimed { .. });
                        send(&worker_tx, Event::ReferralClaimed(outcome));

                        if claimed {
                            match poller.check().await {
                                Ok(status) => send(&worker_tx, Event::ReferralStatus(status)),
                                Err(err) => {
                                    tracing::error!(error = ?err, "Error checking claimable referrals")
                                }
                            }
                        }
                    });
                }
                Action::CopyToClipboard(text) => {
                    tokio::spawn(async move {
                        let res = ClipboardService::copy(text).await;
                        send(&worker_tx, Event::ClipboardCopied(res));
                    });
                }
                Action::FetchProfile() => {
                    let started = referrals_started.clone();
                    tokio::spawn(async move {
                        let res = worker_api.user().await;
                        let signed_in = res.is_ok();
                        if let Err(err) = &res {
                            tracing::error!(error = ?err, "Error fetching user profile");
                        }
                        send(&worker_tx, Event::ProfileLoaded(res));

                        if signed_in {
                            return start_referrals(worker_api, worker_tx, started).await;
                        }
                        return Ok(());
                    });
                }
                Action::LoadAttachment(path) => {
                    tokio::spawn(async move {
                        let res = load_attachment(&path).await;
                        send(&worker_tx, Event::AttachmentLoaded(res));
                    });
                }
                Action::Logout() => {
                    let sessions = SessionStore::new(preferences.clone());
                    tokio::spawn(async move {
                        let res = worker_api.logout().await;
                        if let Ok(true) = res {
                            if let Err(err) = sessions.forget().await {
                                tracing::error!(error = ?err, "Failed to clear the stored session");
                            }
                        }
                        if let Err(err) = &res {
                            tracing::error!(error = ?err, "Logout failed");
                        }
                        send(&worker_tx, Event::LoggedOut(res));
                    });
                }
                Action::SaveTheme(preference) => {
                    // Saved in order so the file always ends on the last pick.
                    let themes = ThemeStore::new(preferences.clone());
                    if let Err(err) = themes.set(preference).await {
                        tracing::error!(error = ?err, "Failed to save theme preference");
                    }
                }
            }
        }

        acquisitions.shutdown().await;
        return Ok(());
    }
}
