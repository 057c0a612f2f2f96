#[cfg(test)]
#[path = "attachment_test.rs"]
mod tests;

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as b64;
use base64::Engine;

/// An encoded image waiting to be sent or already attached to a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePayload {
    mime: String,
    bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(mime: &str, bytes: Vec<u8>) -> ImagePayload {
        return ImagePayload {
            mime: mime.to_string(),
            bytes,
        };
    }

    pub fn jpeg(bytes: Vec<u8>) -> ImagePayload {
        return ImagePayload::new("image/jpeg", bytes);
    }

    /// Resolves the image mime type from a file extension. Only formats the
    /// chat backend accepts are recognised.
    pub fn mime_for_path(path: &Path) -> Option<&'static str> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => return Some("image/jpeg"),
            "png" => return Some("image/png"),
            "gif" => return Some("image/gif"),
            "webp" => return Some("image/webp"),
            _ => return None,
        }
    }

    pub fn mime(&self) -> &str {
        return &self.mime;
    }

    pub fn len(&self) -> usize {
        return self.bytes.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.bytes.is_empty();
    }

    pub fn to_data_uri(&self) -> String {
        return format!("data:{};base64,{}", self.mime, b64.encode(&self.bytes));
    }
}

impl fmt::Display for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kb = (self.bytes.len() as f64 / 1024.0).ceil() as usize;
        return write!(f, "{}, {kb} KB", self.mime);
    }
}

/// Holds the single image queued for the next message.
#[derive(Default)]
pub struct PendingAttachment {
    current: Option<ImagePayload>,
}

impl PendingAttachment {
    pub fn set(&mut self, image: ImagePayload) {
        self.current = Some(image);
    }

    pub fn get(&self) -> Option<&ImagePayload> {
        return self.current.as_ref();
    }

    pub fn take(&mut self) -> Option<ImagePayload> {
        return self.current.take();
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_some(&self) -> bool {
        return self.current.is_some();
    }
}
