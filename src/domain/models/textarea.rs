use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;

use super::Palette;

const PROMPT_TITLE: &str = "Message";
const PROMPT_PLACEHOLDER: &str = "Ask about a photo, or /help for commands";

/// Builds the prompt box in the current palette.
pub struct TextArea {}

impl<'a> TextArea {
    pub fn new(palette: Palette) -> tui_textarea::TextArea<'a> {
        return TextArea::with_lines(palette, vec![]);
    }

    /// Same box, pre-filled. Used to repaint a draft after a theme change.
    pub fn with_lines(palette: Palette, lines: Vec<String>) -> tui_textarea::TextArea<'a> {
        let mut prompt = tui_textarea::TextArea::new(lines);
        prompt.set_block(
            Block::default()
                .title(PROMPT_TITLE)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.user))
                .padding(Padding::horizontal(1)),
        );
        prompt.set_style(Style::default().fg(palette.foreground));
        prompt.set_placeholder_text(PROMPT_PLACEHOLDER);
        prompt.set_placeholder_style(
            Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::ITALIC),
        );
        prompt.set_cursor_line_style(Style::default());

        return prompt;
    }
}
