#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

const TICK: time::Duration = time::Duration::from_millis(500);

/// Folds key presses into UI events. Anything unbound goes to the prompt.
fn key_event(input: Input) -> Event {
    match (input.key, input.ctrl) {
        (Key::Char('c'), true) => return Event::KeyboardCTRLC(),
        (Key::Char('d'), true) | (Key::PageDown, _) => return Event::UIScrollPageDown(),
        (Key::Char('u'), true) | (Key::PageUp, _) => return Event::UIScrollPageUp(),
        (Key::Down, _) | (Key::MouseScrollDown, _) => return Event::UIScrollDown(),
        (Key::Up, _) | (Key::MouseScrollUp, _) => return Event::UIScrollUp(),
        (Key::Enter, _) => return Event::KeyboardEnter(),
        (Key::Esc, _) => return Event::KeyboardEsc(),
        _ => return Event::KeyboardCharInput(input),
    }
}

/// Single queue the UI loop reads from: terminal input, worker results and a
/// periodic tick so the header redraws while nothing else happens.
pub struct EventsService {
    terminal: EventStream,
    workers: mpsc::UnboundedReceiver<Event>,
    ticks: time::Interval,
}

impl EventsService {
    pub fn new(workers: mpsc::UnboundedReceiver<Event>) -> EventsService {
        let mut ticks = time::interval(TICK);
        ticks.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        return EventsService {
            terminal: EventStream::new(),
            workers,
            ticks,
        };
    }

    fn handle_crossterm(event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Key(keyevent) => return Some(key_event(keyevent.into())),
            CrosstermEvent::Paste(text) => return Some(Event::KeyboardPaste(text)),
            CrosstermEvent::Resize(_, _) => return Some(Event::UIResize()),
            CrosstermEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => return Some(Event::UIScrollUp()),
                MouseEventKind::ScrollDown => return Some(Event::UIScrollDown()),
                _ => return None,
            },
            _ => return None,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            tokio::select! {
                event = self.workers.recv() => match event {
                    Some(event) => return Ok(event),
                    None => bail!("Worker channel closed"),
                },
                event = self.terminal.next() => match event {
                    Some(Ok(input)) => {
                        if let Some(event) = EventsService::handle_crossterm(input) {
                            return Ok(event);
                        }
                    }
                    Some(Err(err)) => tracing::warn!(error = ?err, "Failed to read terminal event"),
                    None => bail!("Terminal event stream ended"),
                },
                _ = self.ticks.tick() => return Ok(Event::UITick()),
            }
        }
    }
}
