#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use super::Entry;
use super::EntryKind;
use crate::domain::models::Block;
use crate::domain::models::Palette;
use crate::domain::models::Role;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct Bubble<'a> {
    entry: &'a Entry,
    alignment: BubbleAlignment,
    window_max_width: usize,
    palette: Palette,
}

pub struct BubbleConfig {
    pub bubble_padding: usize,
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
}

type Row = Vec<Span<'static>>;

fn padding(total: usize, used: usize) -> String {
    return " ".repeat(total.saturating_sub(used));
}

fn row_width(row: &Row) -> usize {
    return row.iter().map(|span| return span.content.chars().count()).sum();
}

/// Word wraps one logical line. Words longer than `max` are split.
fn wrap(row: Row, max: usize) -> Vec<Row> {
    let mut rows = vec![];
    let mut current: Row = vec![];
    let mut width = 0;
    let mut pending_space = false;

    for span in row {
        for (idx, word) in span.content.split(' ').enumerate() {
            if idx > 0 {
                pending_space = true;
            }
            if word.is_empty() {
                continue;
            }

            let mut chars: Vec<char> = word.chars().collect();
            let mut space = usize::from(pending_space && width > 0);
            if width > 0 && width + space + chars.len() > max {
                rows.push(std::mem::take(&mut current));
                width = 0;
                space = 0;
            }

            while chars.len() > max {
                let rest = chars.split_off(max);
                if width > 0 {
                    rows.push(std::mem::take(&mut current));
                }
                current.push(Span::styled(chars.iter().collect::<String>(), span.style));
                rows.push(std::mem::take(&mut current));
                width = 0;
                space = 0;
                chars = rest;
            }

            let text: String = chars.iter().collect();
            width += space + chars.len();
            if space > 0 {
                current.push(Span::styled(format!(" {text}"), span.style));
            } else {
                current.push(Span::styled(text, span.style));
            }
            pending_space = false;
        }
    }

    rows.push(current);
    return rows;
}

impl<'a> Bubble<'a> {
    pub fn new(entry: &'a Entry, window_max_width: usize, palette: Palette) -> Bubble<'a> {
        let mut bubble = Bubble {
            entry,
            alignment: BubbleAlignment::Left,
            window_max_width,
            palette,
        };
        if bubble.role() == Role::User {
            bubble.alignment = BubbleAlignment::Right;
        }

        return bubble;
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            // Unicode character border + padding.
            bubble_padding: 8,
            // left border + left padding + (text, not counted) + right padding + right border +
            // scrollbar.
            border_elements_length: 5,
            outer_padding_percentage: 0.04,
        };
    }

    fn role(&self) -> Role {
        match &self.entry.kind {
            EntryKind::Message(message) => return message.role,
            EntryKind::Placeholder(_) => return Role::Assistant,
        }
    }

    fn text_style(&self) -> Style {
        let mut fg = self.palette.foreground;
        if self.role() == Role::Error {
            fg = self.palette.error;
        }

        return Style::default().fg(fg);
    }

    fn border_style(&self) -> Style {
        let fg = match self.role() {
            Role::User => self.palette.user,
            Role::Assistant => self.palette.accent,
            Role::Error => self.palette.error,
        };

        return Style::default().fg(fg);
    }

    fn plain(&self, text: &str) -> Row {
        return vec![Span::styled(text.to_string(), self.text_style())];
    }

    /// Logical lines before wrapping. Blocks are separated by a blank line.
    fn content(&self) -> Vec<Row> {
        let message = match &self.entry.kind {
            EntryKind::Message(message) => message,
            EntryKind::Placeholder(_) => {
                return vec![vec![Span::styled(
                    "...".to_string(),
                    Style::default().fg(self.palette.muted),
                )]];
            }
        };

        let mut rows: Vec<Row> = vec![];
        if let Some(image) = &message.image {
            rows.push(vec![Span::styled(
                format!("[image: {image}]"),
                Style::default()
                    .fg(self.palette.muted)
                    .add_modifier(Modifier::ITALIC),
            )]);
        }

        for (idx, block) in message.blocks().iter().enumerate() {
            if idx > 0 {
                rows.push(vec![]);
            }

            match block {
                Block::Paragraph(text) => {
                    rows.extend(text.lines().map(|line| return self.plain(line)));
                }
                Block::List(items) => {
                    for item in items {
                        for (line_idx, line) in item.lines().enumerate() {
                            let mut prefix = "  ";
                            if line_idx == 0 {
                                prefix = "• ";
                            }
                            rows.push(self.plain(&format!("{prefix}{line}")));
                        }
                    }
                }
                Block::Labeled { label, body } => {
                    let mut lines = body.lines();
                    let mut first = vec![Span::styled(
                        format!("{label}:"),
                        self.text_style().add_modifier(Modifier::BOLD),
                    )];
                    if let Some(line) = lines.next() {
                        first.extend(self.plain(line));
                    }
                    rows.push(first);
                    rows.extend(lines.map(|line| return self.plain(line)));
                }
            }
        }

        if rows.is_empty() {
            rows.push(vec![]);
        }

        return rows;
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let content = self.content();
        let max_line_length = self.get_max_line_length(&content);

        let lines = content
            .into_iter()
            .flat_map(|row| return wrap(row, max_line_length))
            .map(|row| return self.spans_to_line(row, max_line_length))
            .collect();

        return self.wrap_lines_in_bubble(lines, max_line_length);
    }

    fn spans_to_line(&self, mut spans: Row, max_line_length: usize) -> Line<'static> {
        let line_str_len = row_width(&spans);
        let fill = padding(max_line_length, line_str_len);
        let formatted_line_length =
            line_str_len + fill.len() + Bubble::style_config().bubble_padding;

        let mut wrapped_spans = vec![Span::styled("│ ".to_string(), self.border_style())];
        wrapped_spans.append(&mut spans);
        wrapped_spans.push(Span::styled(format!("{fill} │"), self.border_style()));

        let outer_bubble_padding = padding(self.window_max_width, formatted_line_length);

        if self.alignment == BubbleAlignment::Left {
            wrapped_spans.push(Span::from(outer_bubble_padding));
            return Line::from(wrapped_spans);
        }

        let mut line_spans = vec![Span::from(outer_bubble_padding)];
        line_spans.extend(wrapped_spans);

        return Line::from(line_spans);
    }

    fn get_max_line_length(&self, content: &[Row]) -> usize {
        let style_config = Bubble::style_config();
        // Add a minimum 4% of padding on the side.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;

        // Border elements + minimum bubble padding.
        let line_border_width = style_config.border_elements_length + min_bubble_padding_length;
        let available = self
            .window_max_width
            .saturating_sub(line_border_width)
            .max(1);

        let mut max_line_length = content.iter().map(row_width).max().unwrap_or_default();
        if max_line_length > available {
            max_line_length = available;
        }

        let title = self.role().to_string();
        if max_line_length < title.len() {
            max_line_length = title.len();
        }

        return max_line_length;
    }

    fn wrap_lines_in_bubble(
        &self,
        lines: Vec<Line<'static>>,
        max_line_length: usize,
    ) -> Vec<Line<'static>> {
        let title = self.role().to_string();
        // Add 2 for the vertical bars.
        let inner_bar = "─".repeat(max_line_length + 2);
        let top_bar = format!(
            "╭{title}{}╮",
            "─".repeat((max_line_length + 2).saturating_sub(title.len()))
        );
        let bottom_bar = format!("╰{inner_bar}╯");
        let bar_bubble_padding = padding(
            self.window_max_width,
            max_line_length + Bubble::style_config().bubble_padding,
        );

        let mut res = vec![];
        if self.alignment == BubbleAlignment::Left {
            res.push(self.border_line(format!("{top_bar}{bar_bubble_padding}")));
            res.extend(lines);
            res.push(self.border_line(format!("{bottom_bar}{bar_bubble_padding}")));
        } else {
            res.push(self.border_line(format!("{bar_bubble_padding}{top_bar}")));
            res.extend(lines);
            res.push(self.border_line(format!("{bar_bubble_padding}{bottom_bar}")));
        }

        return res;
    }

    fn border_line(&self, text: String) -> Line<'static> {
        return Line::from(Span::styled(text, self.border_style()));
    }
}
