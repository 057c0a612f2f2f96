use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Panel;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::CaptureStatus;
use crate::domain::services::ThemeStore;

fn camera_text(status: CaptureStatus) -> String {
    match status {
        CaptureStatus::Starting(facing) => {
            return format!("Starting the {facing} camera...\n\nEsc to cancel");
        }
        CaptureStatus::Live(facing) => {
            return format!(
                "Camera is live ({facing}).\n\nEnter to take the photo · r to switch camera · Esc to close"
            );
        }
        CaptureStatus::Closed => return "".to_string(),
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut textarea = TextArea::new(app_state.theme.palette());
    let mut textarea_theme = app_state.theme;

    loop {
        if textarea_theme != app_state.theme {
            textarea = TextArea::with_lines(app_state.theme.palette(), textarea.lines().to_vec());
            textarea_theme = app_state.theme;
        }

        terminal.draw(|frame| {
            let palette = app_state.theme.palette();
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(1),
                    Constraint::Max(4),
                ])
                .split(frame.size());

            if usize::from(layout[1].width) != app_state.last_known_width
                || usize::from(layout[1].height) != app_state.last_known_height
            {
                app_state.set_rect(layout[1]);
            }

            frame.render_widget(
                Paragraph::new(app_state.header())
                    .style(Style::default().fg(palette.accent).bg(palette.background)),
                layout[0],
            );

            app_state
                .bubble_list
                .render(frame, layout[1], app_state.scroll.position);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                layout[1].inner(&Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut app_state.scroll.scrollbar_state,
            );

            frame.render_widget(
                Paragraph::new(app_state.status_line().unwrap_or_default())
                    .style(Style::default().fg(palette.muted)),
                layout[2],
            );

            if app_state.camera_open() {
                Panel::new("Camera", camera_text(app_state.capture.status()))
                    .render(frame, layout[3], palette);
            } else {
                frame.render_widget(textarea.widget(), layout[3]);
            }
        })?;

        let event = events.next().await?;

        if app_state.camera_open() {
            match event {
                Event::KeyboardEnter() => {
                    app_state.take_photo();
                    continue;
                }
                Event::KeyboardEsc() => {
                    app_state.close_camera();
                    continue;
                }
                Event::KeyboardCharInput(Input {
                    key: Key::Char('r'),
                    ..
                }) => {
                    app_state.rotate_camera(&tx)?;
                    continue;
                }
                Event::KeyboardCharInput(_) | Event::KeyboardPaste(_) => {
                    continue;
                }
                _ => {}
            }
        }

        match event {
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardEsc() => {
                app_state.alert = None;
            }
            Event::KeyboardEnter() => {
                let input_str = textarea.lines().join("\n");
                if !app_state.can_submit(&input_str) {
                    continue;
                }

                textarea = TextArea::new(app_state.theme.palette());
                if app_state.submit(&input_str, &tx)? {
                    break;
                }
            }
            Event::KeyboardCharInput(input) => {
                textarea.input(input);
            }
            Event::KeyboardPaste(text) => {
                textarea.insert_str(text);
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UIResize() | Event::UITick() => {}
            event => {
                if app_state.handle_event(event) {
                    break;
                }
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let theme = ThemeStore::default().load().await;
    let mut app_state = AppState::new(theme);
    tx.send(Action::FetchProfile())?;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    start_loop(&mut terminal, &mut app_state, tx, rx).await?;
    app_state.close_camera();

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
