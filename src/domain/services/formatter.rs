#[cfg(test)]
#[path = "formatter_test.rs"]
mod tests;

use crate::domain::models::Block;

/// Turns assistant text into display blocks.
///
/// Emphasis markers are dropped and the text is split into blank-line
/// separated paragraphs. A paragraph holding `\n- ` bullets becomes a list,
/// one holding a colon becomes a bold label followed by the remainder, and
/// anything else stays a plain paragraph. The colon rule also fires on
/// ordinary sentences that happen to contain one.
pub fn format_reply(text: &str) -> Vec<Block> {
    let text = text.replace('*', "");

    return text
        .split("\n\n")
        .map(|paragraph| {
            if paragraph.contains("\n- ") {
                let items = paragraph
                    .split("\n- ")
                    .filter(|item| return !item.trim().is_empty())
                    .map(|item| return item.trim().to_string())
                    .collect::<Vec<String>>();

                return Block::List(items);
            }

            if let Some((label, body)) = paragraph.split_once(':') {
                return Block::Labeled {
                    label: label.trim().to_string(),
                    body: body.to_string(),
                };
            }

            return Block::Paragraph(paragraph.to_string());
        })
        .collect();
}
