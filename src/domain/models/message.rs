#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use super::ImagePayload;
use super::Role;
use crate::domain::services::format_reply;

/// One rendered unit of a message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    List(Vec<String>),
    Labeled { label: String, body: String },
}

impl Block {
    pub fn text_len(&self) -> usize {
        match self {
            Block::Paragraph(text) => return text.len(),
            Block::List(items) => return items.iter().map(|e| return e.len()).sum(),
            Block::Labeled { label, body } => return label.len() + body.len() + 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub image: Option<ImagePayload>,
    blocks: Vec<Block>,
}

impl Message {
    pub fn new(role: Role, text: &str) -> Message {
        let text = text.replace('\t', "  ");
        let blocks = match role {
            Role::Assistant => format_reply(&text),
            _ => vec![Block::Paragraph(text.to_string())],
        };

        return Message {
            role,
            text,
            image: None,
            blocks,
        };
    }

    /// Skips reply formatting. Used for text the client writes itself.
    pub fn plain(role: Role, text: &str) -> Message {
        let text = text.replace('\t', "  ");
        return Message {
            role,
            image: None,
            blocks: vec![Block::Paragraph(text.to_string())],
            text,
        };
    }

    pub fn with_image(role: Role, text: &str, image: ImagePayload) -> Message {
        let mut message = Message::new(role, text);
        if text.is_empty() {
            message.blocks = vec![];
        }
        message.image = Some(image);

        return message;
    }

    pub fn blocks(&self) -> &[Block] {
        return &self.blocks;
    }
}
