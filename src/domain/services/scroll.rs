#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;

use ratatui::widgets::ScrollbarState;

const PAGE: usize = 10;

#[derive(Default)]
pub struct Scroll {
    list_length: usize,
    viewport_length: usize,
    pub position: usize,
    pub scrollbar_state: ScrollbarState,
}

impl Scroll {
    fn max_position(&self) -> usize {
        return self.list_length.saturating_sub(self.viewport_length);
    }

    fn sync(&mut self) {
        self.scrollbar_state = self.scrollbar_state.position(self.position);
    }

    pub fn up(&mut self) {
        self.position = self.position.saturating_sub(1);
        self.sync();
    }

    pub fn up_page(&mut self) {
        self.position = self.position.saturating_sub(PAGE);
        self.sync();
    }

    pub fn down(&mut self) {
        self.position = self.position.saturating_add(1).min(self.max_position());
        self.sync();
    }

    pub fn down_page(&mut self) {
        self.position = self.position.saturating_add(PAGE).min(self.max_position());
        self.sync();
    }

    pub fn last(&mut self) {
        self.position = self.max_position();
        self.sync();
    }

    pub fn set_state(&mut self, list_length: usize, viewport_length: usize) {
        self.list_length = list_length;
        self.viewport_length = viewport_length;
        self.position = self.position.min(self.max_position());
        self.scrollbar_state = self
            .scrollbar_state
            .content_length(self.max_position())
            .viewport_content_length(viewport_length)
            .position(self.position);
    }
}
