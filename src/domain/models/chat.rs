use super::ChatMessageBody;
use super::ChatRequestBody;
use super::ImagePayload;

/// Identifies one loading placeholder in the transcript.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlaceholderHandle(pub u64);

/// A user turn ready to be dispatched to the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatRequest {
    pub handle: PlaceholderHandle,
    pub chat_id: String,
    pub text: String,
    pub image: Option<ImagePayload>,
}

impl ChatRequest {
    pub fn body(&self) -> ChatRequestBody {
        return ChatRequestBody {
            chat_id: self.chat_id.to_string(),
            message: ChatMessageBody {
                text: self.text.to_string(),
                image_url: self.image.as_ref().map(|e| return e.to_data_uri()),
            },
        };
    }
}
