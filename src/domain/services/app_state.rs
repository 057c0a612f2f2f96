#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::path::PathBuf;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::logout_message;
use super::BubbleList;
use super::CaptureStatus;
use super::ChatSession;
use super::ClaimOutcome;
use super::MediaCaptureSession;
use super::ReferralStatus;
use super::Scroll;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Facing;
use crate::domain::models::Message;
use crate::domain::models::PendingAttachment;
use crate::domain::models::Role;
use crate::domain::models::SlashCommand;
use crate::domain::models::ThemePreference;
use crate::domain::models::UserProfile;

pub const NOT_SIGNED_IN_TEXT: &str = "You're not signed in. Run 'lenschat login' first.";
pub const COMING_SOON_TEXT: &str = "This feature is coming soon!";
pub const COPIED_TEXT: &str = "Referral link copied to clipboard!";

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /new (/n) - Starts a new conversation. Clears the transcript and any attachment.
- /camera (/cam) - Opens the camera panel to take a photo.
- /upload (/u) [PATH] - Attaches an image file (png, jpg, jpeg, gif or webp).
- /delete (/d) - Removes the pending attachment.
- /theme (/t) [light,dark] - Toggles the theme, or sets it when a value is given.
- /referral (/ref) - Shows your referral link.
- /copy (/c) - Copies your referral link to the clipboard.
- /claim - Claims credits earned through referrals.
- /credits - Get more credits.
- /logout - Signs out and exits.
- /quit /exit (/q) - Exits lenschat.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+C - Exit.

CAMERA:
- Enter - Take the photo and attach it.
- r - Switch between the front and rear camera.
- Esc - Close the camera.
        "#;

    return text.trim().to_string();
}

pub struct AppState {
    pub alert: Option<String>,
    pub attachment: PendingAttachment,
    pub bubble_list: BubbleList,
    pub capture: MediaCaptureSession,
    pub chat: ChatSession,
    pub last_known_height: usize,
    pub last_known_width: usize,
    pub profile: Option<UserProfile>,
    pub referral_link: Option<String>,
    pub referral_status: Option<ReferralStatus>,
    pub scroll: Scroll,
    pub theme: ThemePreference,
}

impl AppState {
    pub fn new(theme: ThemePreference) -> AppState {
        return AppState {
            alert: None,
            attachment: PendingAttachment::default(),
            bubble_list: BubbleList::new(theme.palette()),
            capture: MediaCaptureSession::default(),
            chat: ChatSession::default(),
            last_known_height: 0,
            last_known_width: 0,
            profile: None,
            referral_link: None,
            referral_status: None,
            scroll: Scroll::default(),
            theme,
        };
    }

    fn display_name(&self) -> Option<String> {
        return self
            .profile
            .as_ref()
            .map(|profile| return profile.first_name().to_string());
    }

    pub fn header(&self) -> String {
        let mut parts = vec!["lenschat".to_string()];
        match &self.profile {
            Some(profile) => parts.push(profile.name.to_string()),
            None => parts.push("Not signed in".to_string()),
        }
        if let Some(credits) = self.chat.credits() {
            parts.push(format!("Credits: {credits}"));
        }
        if let Some(status) = &self.referral_status {
            parts.push(status.describe());
        }

        return parts.join(" · ");
    }

    /// The alert if there is one, otherwise the pending attachment.
    pub fn status_line(&self) -> Option<String> {
        if let Some(alert) = &self.alert {
            return Some(alert.to_string());
        }

        return self
            .attachment
            .get()
            .map(|image| return format!("Attached: {image} (/delete to remove)"));
    }

    pub fn alert(&mut self, text: &str) {
        tracing::debug!(alert = text, "Alert");
        self.alert = Some(text.to_string());
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width.into();
        self.last_known_height = rect.height.into();
        self.sync_dependants();
    }

    pub fn set_theme(&mut self, theme: ThemePreference, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        self.theme = theme;
        self.bubble_list.set_palette(theme.palette());
        self.sync_dependants();
        tx.send(Action::SaveTheme(theme))?;

        return Ok(());
    }

    pub fn reset(&mut self) {
        let name = self.display_name();
        self.chat.reset(name.as_deref());
        self.attachment.clear();
        self.capture.close();
        self.alert = None;
        self.scroll = Scroll::default();
        self.sync_dependants();
    }

    pub fn open_camera(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        let facing = Facing::parse(Config::get(ConfigKey::CameraFacing)).unwrap_or(Facing::Rear);
        match self.capture.open(facing) {
            Ok(ticket) => tx.send(Action::AcquireCamera(ticket, None))?,
            Err(err) => self.alert(&err.to_string()),
        }

        return Ok(());
    }

    pub fn rotate_camera(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        match self.capture.rotate() {
            Ok(rotation) => tx.send(Action::AcquireCamera(
                rotation.ticket,
                Some(rotation.previous),
            ))?,
            Err(err) => self.alert(&err.to_string()),
        }

        return Ok(());
    }

    pub fn take_photo(&mut self) {
        match self.capture.capture() {
            Ok(image) => {
                self.alert = None;
                self.attachment.set(image);
            }
            Err(err) => self.alert(&err.to_string()),
        }
    }

    pub fn close_camera(&mut self) {
        self.capture.close();
    }

    pub fn camera_open(&self) -> bool {
        return self.capture.status() != CaptureStatus::Closed;
    }

    /// Enter sends when there's text or a pending image.
    pub fn can_submit(&self, text: &str) -> bool {
        return !text.trim().is_empty() || self.attachment.is_some();
    }

    /// Sends text to the chat unless it's a slash command. Returns true when
    /// the app should exit.
    pub fn submit(&mut self, text: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        self.alert = None;

        let (should_break, should_continue) = self.handle_slash_commands(text, tx)?;
        if should_break {
            return Ok(true);
        }
        if should_continue {
            return Ok(false);
        }

        if let Some(request) = self.chat.send(text, self.attachment.take()) {
            tx.send(Action::ChatRequest(request))?;
            self.add_entries();
        }

        return Ok(false);
    }

    /// Returns (should_break, should_continue).
    pub fn handle_slash_commands(
        &mut self,
        text: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<(bool, bool)> {
        let command = match SlashCommand::parse(text) {
            Some(command) => command,
            None => return Ok((false, false)),
        };

        if command.is_quit() {
            return Ok((true, false));
        }

        if command.is_new_chat() {
            self.reset();
        } else if command.is_camera() {
            self.open_camera(tx)?;
        } else if command.is_upload() {
            let path = command.rest();
            if path.is_empty() {
                self.alert("Usage: /upload PATH");
            } else {
                tx.send(Action::LoadAttachment(PathBuf::from(path)))?;
            }
        } else if command.is_delete_attachment() {
            self.attachment.clear();
        } else if command.is_theme() {
            let arg = command.rest();
            if arg.is_empty() {
                self.set_theme(self.theme.toggle(), tx)?;
            } else if let Some(theme) = ThemePreference::parse(&arg) {
                self.set_theme(theme, tx)?;
            } else {
                self.alert(&format!("Unknown theme '{arg}'. Use light or dark."));
            }
        } else if command.is_claim() {
            tx.send(Action::ClaimReferral())?;
        } else if command.is_referral() {
            match self.referral_link.clone() {
                Some(link) => self.alert = Some(format!("Your referral link: {link}")),
                None => self.alert("Your referral link isn't available yet."),
            }
        } else if command.is_copy_referral() {
            match self.referral_link.clone() {
                Some(link) => tx.send(Action::CopyToClipboard(link))?,
                None => self.alert("Your referral link isn't available yet."),
            }
        } else if command.is_credits() {
            self.alert(COMING_SOON_TEXT);
        } else if command.is_logout() {
            tx.send(Action::Logout())?;
        } else if command.is_help() {
            self.chat
                .append_message(Message::plain(Role::Assistant, &help_text()));
            self.add_entries();
        }

        return Ok((false, true));
    }

    /// Applies a worker result. Returns true when the app should exit.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::AttachmentLoaded(Ok(image)) => {
                self.attachment.set(image);
            }
            Event::AttachmentLoaded(Err(err)) => {
                self.alert(&err.to_string());
            }
            Event::CameraAcquired(ticket, res) => {
                if let Err(err) = self.capture.complete(ticket, res) {
                    self.alert(&err.to_string());
                }
            }
            Event::ChatSettled(handle, res) => {
                self.chat.settle(handle, res);
                self.add_entries();
            }
            Event::ClipboardCopied(Ok(())) => {
                self.alert(COPIED_TEXT);
            }
            Event::ClipboardCopied(Err(err)) => {
                tracing::error!(error = ?err, "Failed to copy referral link");
                self.alert("Failed to copy the referral link.");
            }
            Event::LoggedOut(res) => {
                match logout_message(&res) {
                    Some(message) => self.alert(message),
                    None => return true,
                }
            }
            Event::ProfileLoaded(Ok(profile)) => {
                self.chat.set_credits(profile.credits);
                self.chat.greet(Some(profile.first_name()));
                self.profile = Some(profile);
                self.add_entries();
            }
            Event::ProfileLoaded(Err(_)) => {
                self.alert(NOT_SIGNED_IN_TEXT);
                self.chat.greet(None);
                self.add_entries();
            }
            Event::ReferralClaimed(outcome) => {
                if let ClaimOutcome::Claimed {
                    new_credits: Some(new_credits),
                    ..
                } = outcome
                {
                    self.chat.set_credits(new_credits);
                }
                self.alert(&outcome.message());
            }
            Event::ReferralLink(link) => {
                self.referral_link = Some(link);
            }
            Event::ReferralStatus(status) => {
                self.referral_status = Some(status);
            }
            _ => {}
        }

        return false;
    }

    fn add_entries(&mut self) {
        self.sync_dependants();
        self.scroll.last();
    }

    fn sync_dependants(&mut self) {
        self.bubble_list
            .set_entries(self.chat.transcript().entries(), self.last_known_width);
        self.scroll
            .set_state(self.bubble_list.len(), self.last_known_height);
    }
}
