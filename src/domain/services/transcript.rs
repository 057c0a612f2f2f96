#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use crate::domain::models::Message;
use crate::domain::models::PlaceholderHandle;
use crate::domain::models::Role;

pub enum EntryKind {
    Message(Message),
    Placeholder(PlaceholderHandle),
}

/// A transcript row. `id` is unique for the lifetime of the transcript and
/// is what the bubble cache keys on.
pub struct Entry {
    pub id: u64,
    pub kind: EntryKind,
}

#[derive(Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Transcript {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        return self.next_id;
    }

    pub fn append(&mut self, role: Role, text: &str) {
        self.append_message(Message::new(role, text));
    }

    pub fn append_message(&mut self, message: Message) {
        let id = self.next_id();
        self.entries.push(Entry {
            id,
            kind: EntryKind::Message(message),
        });
    }

    pub fn show_loading_placeholder(&mut self) -> PlaceholderHandle {
        let id = self.next_id();
        let handle = PlaceholderHandle(id);
        self.entries.push(Entry {
            id,
            kind: EntryKind::Placeholder(handle),
        });

        return handle;
    }

    /// Removes the placeholder for `handle`. Returns false when it's already
    /// gone, which happens after a reset.
    pub fn remove_placeholder(&mut self, handle: PlaceholderHandle) -> bool {
        let position = self.entries.iter().position(|entry| {
            return matches!(entry.kind, EntryKind::Placeholder(e) if e == handle);
        });

        if let Some(idx) = position {
            self.entries.remove(idx);
            return true;
        }

        return false;
    }

    pub fn placeholders(&self) -> usize {
        return self
            .entries
            .iter()
            .filter(|entry| return matches!(entry.kind, EntryKind::Placeholder(_)))
            .count();
    }

    pub fn messages(&self) -> Vec<&Message> {
        return self
            .entries
            .iter()
            .filter_map(|entry| match &entry.kind {
                EntryKind::Message(message) => return Some(message),
                EntryKind::Placeholder(_) => return None,
            })
            .collect();
    }

    pub fn entries(&self) -> &[Entry] {
        return &self.entries;
    }

    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
