use ratatui::prelude::Alignment;
use ratatui::prelude::Rect;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Palette;

/// Boxed, centred notice used in place of the prompt box.
pub struct Panel<'a> {
    title: &'a str,
    text: String,
}

impl<'a> Panel<'a> {
    pub fn new(title: &'a str, text: String) -> Panel<'a> {
        return Panel { title, text };
    }

    pub fn render(&self, frame: &mut Frame, rect: Rect, palette: Palette) {
        frame.render_widget(
            Paragraph::new(self.text.to_string())
                .style(Style::default().fg(palette.foreground))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Double)
                        .border_style(Style::default().fg(palette.accent))
                        .title(self.title)
                        .padding(Padding::new(1, 1, 0, 0)),
                )
                .alignment(Alignment::Center),
            rect,
        );
    }
}
