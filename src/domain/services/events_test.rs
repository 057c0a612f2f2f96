use anyhow::bail;
use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use tui_textarea::Key;

use super::EventsService;
use crate::domain::models::Event;

fn key(code: KeyCode, modifiers: KeyModifiers) -> Option<Event> {
    return EventsService::handle_crossterm(CrosstermEvent::Key(KeyEvent::new(code, modifiers)));
}

#[test]
fn it_maps_control_keys() {
    assert!(matches!(
        key(KeyCode::Char('c'), KeyModifiers::CONTROL),
        Some(Event::KeyboardCTRLC())
    ));
    assert!(matches!(
        key(KeyCode::Char('u'), KeyModifiers::CONTROL),
        Some(Event::UIScrollPageUp())
    ));
    assert!(matches!(
        key(KeyCode::Enter, KeyModifiers::NONE),
        Some(Event::KeyboardEnter())
    ));
    assert!(matches!(
        key(KeyCode::Esc, KeyModifiers::NONE),
        Some(Event::KeyboardEsc())
    ));
}

#[test]
fn it_passes_through_characters() -> Result<()> {
    match key(KeyCode::Char('r'), KeyModifiers::NONE) {
        Some(Event::KeyboardCharInput(input)) => assert_eq!(input.key, Key::Char('r')),
        _ => bail!("Expected a character input"),
    }
    return Ok(());
}

#[test]
fn it_maps_resizes_and_pastes() {
    assert!(matches!(
        EventsService::handle_crossterm(CrosstermEvent::Resize(80, 24)),
        Some(Event::UIResize())
    ));
    assert!(matches!(
        EventsService::handle_crossterm(CrosstermEvent::Paste("hi".to_string())),
        Some(Event::KeyboardPaste(text)) if text == "hi"
    ));
}

#[test]
fn it_maps_scroll_keys() {
    assert!(matches!(
        key(KeyCode::PageDown, KeyModifiers::NONE),
        Some(Event::UIScrollPageDown())
    ));
    assert!(matches!(
        key(KeyCode::Char('d'), KeyModifiers::CONTROL),
        Some(Event::UIScrollPageDown())
    ));
    assert!(matches!(
        key(KeyCode::Up, KeyModifiers::NONE),
        Some(Event::UIScrollUp())
    ));
}
