use std::collections::HashMap;

use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use super::Entry;
use crate::domain::models::Palette;

#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

/// Rendered transcript lines. Entries never change once appended, so lines
/// are cached by entry id until the width or palette changes.
pub struct BubbleList {
    cache: HashMap<u64, Vec<Line<'static>>>,
    order: Vec<u64>,
    line_width: usize,
    lines_len: usize,
    palette: Palette,
}

impl BubbleList {
    pub fn new(palette: Palette) -> BubbleList {
        return BubbleList {
            cache: HashMap::new(),
            order: vec![],
            line_width: 0,
            lines_len: 0,
            palette,
        };
    }

    pub fn set_palette(&mut self, palette: Palette) {
        if self.palette != palette {
            self.cache.clear();
            self.palette = palette;
        }
    }

    pub fn set_entries(&mut self, entries: &[Entry], line_width: usize) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }

        self.order = entries.iter().map(|entry| return entry.id).collect();
        let order = &self.order;
        self.cache.retain(|id, _| return order.contains(id));

        self.lines_len = entries
            .iter()
            .map(|entry| {
                if let Some(lines) = self.cache.get(&entry.id) {
                    return lines.len();
                }

                let lines = Bubble::new(entry, line_width, self.palette).as_lines();
                let lines_len = lines.len();
                self.cache.insert(entry.id, lines);

                return lines_len;
            })
            .sum();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn is_empty(&self) -> bool {
        return self.lines_len == 0;
    }

    pub fn render(&self, frame: &mut Frame, rect: Rect, scroll: usize) {
        let lines: Vec<Line> = self
            .order
            .iter()
            .filter_map(|id| return self.cache.get(id))
            .flat_map(|lines| return lines.to_owned())
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default())
                .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
            rect,
        );
    }
}
