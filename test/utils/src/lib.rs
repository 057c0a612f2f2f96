/// A typical assistant reply mixing emphasis, labels and bullet lists.
pub fn reply_fixture() -> &'static str {
    return r#"
**Summary:** The photo shows a *ripe* tomato plant.

Things to check:
- Leaves for yellow spots
- Soil moisture
- Sun exposure

Let me know if you want watering tips.
"#
    .trim();
}

/// Smallest byte sequence that passes as a JPEG frame (SOI ... EOI).
pub fn jpeg_fixture() -> Vec<u8> {
    return vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0xFF, 0xD9];
}
