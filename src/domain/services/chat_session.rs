#[cfg(test)]
#[path = "chat_session_test.rs"]
mod tests;

use chrono::Utc;

use super::Transcript;
use crate::domain::models::ApiError;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequest;
use crate::domain::models::ImagePayload;
use crate::domain::models::Message;
use crate::domain::models::PlaceholderHandle;
use crate::domain::models::Role;

pub const CHAT_FAILED_TEXT: &str = "Failed to get response from the server.";

pub fn greeting(display_name: Option<&str>) -> String {
    if let Some(name) = display_name {
        if !name.is_empty() {
            return format!("Hello {name}! How can I assist you today?");
        }
    }

    return "Hello! How can I assist you today?".to_string();
}

pub struct ChatSession {
    id: String,
    last_stamp: i64,
    transcript: Transcript,
    credits: Option<i64>,
}

impl Default for ChatSession {
    fn default() -> ChatSession {
        let mut session = ChatSession {
            id: "".to_string(),
            last_stamp: 0,
            transcript: Transcript::default(),
            credits: None,
        };
        session.id = session.next_id();

        return session;
    }
}

impl ChatSession {
    /// Millisecond clock token, bumped when the clock hasn't moved since the
    /// previous one so two resets never share an id.
    fn next_id(&mut self) -> String {
        let mut stamp = Utc::now().timestamp_millis();
        if stamp <= self.last_stamp {
            stamp = self.last_stamp + 1;
        }
        self.last_stamp = stamp;

        return stamp.to_string();
    }

    pub fn id(&self) -> &str {
        return &self.id;
    }

    pub fn transcript(&self) -> &Transcript {
        return &self.transcript;
    }

    pub fn credits(&self) -> Option<i64> {
        return self.credits;
    }

    pub fn set_credits(&mut self, credits: i64) {
        self.credits = Some(credits);
    }

    pub fn greet(&mut self, display_name: Option<&str>) {
        self.transcript
            .append(Role::Assistant, &greeting(display_name));
    }

    pub fn append_message(&mut self, message: Message) {
        self.transcript.append_message(message);
    }

    /// Renders the user turn and a loading placeholder, returning the request
    /// to dispatch. Nothing happens when there is neither text nor an image.
    pub fn send(&mut self, text: &str, attachment: Option<ImagePayload>) -> Option<ChatRequest> {
        let text = text.trim();
        if text.is_empty() && attachment.is_none() {
            return None;
        }

        let message = match &attachment {
            Some(image) => Message::with_image(Role::User, text, image.clone()),
            None => Message::new(Role::User, text),
        };
        self.transcript.append_message(message);
        let handle = self.transcript.show_loading_placeholder();

        tracing::debug!(
            chat_id = %self.id,
            handle = handle.0,
            has_image = attachment.is_some(),
            "Dispatching chat message"
        );

        return Some(ChatRequest {
            handle,
            chat_id: self.id.to_string(),
            text: text.to_string(),
            image: attachment,
        });
    }

    /// Applies the outcome of a request issued by `send`. Replies that arrive
    /// after a reset only update the balance.
    pub fn settle(&mut self, handle: PlaceholderHandle, result: Result<ChatReply, ApiError>) {
        let current = self.transcript.remove_placeholder(handle);

        match result {
            Ok(reply) => {
                self.credits = Some(reply.credits_left);
                if !current {
                    tracing::debug!(handle = handle.0, "Dropping reply for a previous session");
                    return;
                }
                self.transcript.append(Role::Assistant, &reply.response);
            }
            Err(err) => {
                tracing::error!(error = ?err, handle = handle.0, "Chat request failed");
                if current {
                    self.transcript.append(Role::Error, CHAT_FAILED_TEXT);
                }
            }
        }
    }

    pub fn reset(&mut self, display_name: Option<&str>) {
        self.transcript.clear();
        self.id = self.next_id();
        self.greet(display_name);
    }
}
