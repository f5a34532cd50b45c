use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::App;
use crate::tui::AppEvent;

const WHEEL_LINES: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Reply(reply) => app.on_reply(reply),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        // Quit
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Esc => app.should_quit = true,

        KeyCode::Enter => app.submit(),
        KeyCode::Tab => app.toggle_view_mode(),

        // Transcript scrolling
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(app.half_page()),
        KeyCode::PageDown => app.scroll_down(app.half_page()),
        KeyCode::Char('u') if ctrl => app.scroll_up(app.half_page()),
        KeyCode::Char('d') if ctrl => app.scroll_down(app.half_page()),

        // Input editing
        KeyCode::Backspace => app.session.backspace(),
        KeyCode::Delete => app.session.delete(),
        KeyCode::Left => app.session.cursor_left(),
        KeyCode::Right => app.session.cursor_right(),
        KeyCode::Home => app.session.cursor_home(),
        KeyCode::End => app.session.cursor_end(),
        KeyCode::Char(c) if !ctrl => app.session.insert_char(c),

        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(WHEEL_LINES),
        MouseEventKind::ScrollUp => app.scroll_up(WHEEL_LINES),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ViewMode};
    use crate::message::{Message, Sender};
    use crate::recommend::RecommendClient;
    use crate::session::ChatSession;
    use crossterm::event::KeyEventState;
    use crossterm::event::KeyEventKind;
    use std::sync::Arc;

    fn test_app() -> App {
        // Port 9 (discard) is never serving HTTP, so stray requests fail fast
        let mut config = Config::new();
        config.endpoint = "http://127.0.0.1:9/recommend".to_string();
        let client = RecommendClient::from_config(&config);
        let (session, _replies) = ChatSession::new(Arc::new(client));
        App::new(session, &config)
    }

    fn press(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, press(KeyCode::Char(c)));
        }
    }

    #[tokio::test]
    async fn test_typing_and_enter_submits() {
        let mut app = test_app();
        type_text(&mut app, "phone under 15000");
        assert_eq!(app.session.input(), "phone under 15000");

        handle_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.session.input(), "");
        assert_eq!(app.session.messages(), &[Message::user("phone under 15000")]);
        assert!(app.is_loading());
    }

    #[tokio::test]
    async fn test_enter_on_blank_input_does_nothing() {
        let mut app = test_app();
        type_text(&mut app, "   ");
        handle_event(&mut app, press(KeyCode::Enter));
        assert!(app.session.messages().is_empty());
        assert!(!app.is_loading());
    }

    #[test]
    fn test_reply_event_appends() {
        let mut app = test_app();
        handle_event(&mut app, AppEvent::Reply(Message::bot_text("No matches")));
        assert_eq!(app.session.messages().len(), 1);
        assert_eq!(app.session.messages()[0].sender, Sender::Bot);
    }

    #[test]
    fn test_control_keys_do_not_type() {
        let mut app = test_app();
        type_text(&mut app, "ab");
        handle_event(&mut app, ctrl('d'));
        handle_event(&mut app, ctrl('u'));
        assert_eq!(app.session.input(), "ab");
        assert!(!app.should_quit);

        handle_event(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_tab_toggles_view_and_esc_quits() {
        let mut app = test_app();
        handle_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.view_mode, ViewMode::Table);
        handle_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.view_mode, ViewMode::Cards);

        handle_event(&mut app, press(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_editing_keys() {
        let mut app = test_app();
        type_text(&mut app, "8 gb rm");
        handle_event(&mut app, press(KeyCode::Left));
        type_text(&mut app, "a");
        assert_eq!(app.session.input(), "8 gb ram");

        handle_event(&mut app, press(KeyCode::Home));
        handle_event(&mut app, press(KeyCode::Delete));
        handle_event(&mut app, press(KeyCode::End));
        handle_event(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.session.input(), " gb ra");
    }
}
