use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, FocusPane, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Popups capture all input
    if app.show_scenario_form {
        handle_scenario_form(app, key);
        return;
    }
    if app.show_mood_picker {
        handle_mood_picker(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Tab => app.focus = app.focus.next(),

        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            FocusPane::Scenarios => app.scenario_nav_down(),
            FocusPane::Chat => app.scroll_chat_down(),
            FocusPane::Input => {}
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            FocusPane::Scenarios => app.scenario_nav_up(),
            FocusPane::Chat => app.scroll_chat_up(),
            FocusPane::Input => {}
        },

        KeyCode::Enter => match app.focus {
            FocusPane::Scenarios => app.select_highlighted_scenario(),
            FocusPane::Chat => {}
            FocusPane::Input => app.input_mode = InputMode::Editing,
        },

        KeyCode::Char('i') => {
            app.focus = FocusPane::Input;
            app.input_mode = InputMode::Editing;
        }

        KeyCode::Char('u') => app.use_script(),
        KeyCode::Char('n') => app.open_scenario_form(),
        KeyCode::Char('m') => app.open_mood_picker(),

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    let draft = &mut app.session.draft;
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => app.send_draft(),
        KeyCode::Backspace => {
            if app.draft_cursor > 0 {
                app.draft_cursor -= 1;
                let byte_pos = char_to_byte_index(draft, app.draft_cursor);
                draft.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            if app.draft_cursor < draft.chars().count() {
                let byte_pos = char_to_byte_index(draft, app.draft_cursor);
                draft.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.draft_cursor = app.draft_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            app.draft_cursor = (app.draft_cursor + 1).min(draft.chars().count());
        }
        KeyCode::Home => {
            app.draft_cursor = 0;
        }
        KeyCode::End => {
            app.draft_cursor = draft.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(draft, app.draft_cursor);
            draft.insert(byte_pos, c);
            app.draft_cursor += 1;
        }
        _ => {}
    }
}

fn handle_scenario_form(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_scenario_form(),
        KeyCode::Tab | KeyCode::Down => app.form_field = app.form_field.next(),
        KeyCode::Enter => app.submit_scenario_form(),
        KeyCode::Backspace => {
            app.form_field_mut().pop();
        }
        KeyCode::Char(c) => app.form_field_mut().push(c),
        _ => {}
    }
}

fn handle_mood_picker(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.show_mood_picker = false,
        KeyCode::Char('j') | KeyCode::Down => app.mood_picker_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.mood_picker_nav_up(),
        KeyCode::Enter => app.select_mood(),
        _ => {}
    }
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.show_scenario_form || app.show_mood_picker {
        return;
    }

    let (x, y) = (mouse.column, mouse.row);
    let in_chat = app.chat_area.is_some_and(|r| point_in_rect(x, y, r));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.scenarios_area.is_some_and(|r| point_in_rect(x, y, r)) {
                app.focus = FocusPane::Scenarios;
                app.input_mode = InputMode::Normal;
            } else if in_chat {
                app.focus = FocusPane::Chat;
                app.input_mode = InputMode::Normal;
            } else if app.input_area.is_some_and(|r| point_in_rect(x, y, r)) {
                app.focus = FocusPane::Input;
                app.input_mode = InputMode::Editing;
            }
        }
        MouseEventKind::ScrollDown if in_chat => app.scroll_chat_down(),
        MouseEventKind::ScrollUp if in_chat => app.scroll_chat_up(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crossterm::event::KeyEventState;
    use rehearsal_room::{ReplyPolicy, Speaker};

    fn press(app: &mut App, code: KeyCode) {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        handle_event(app, AppEvent::Key(key)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_char_to_byte_index_handles_multibyte() {
        assert_eq!(char_to_byte_index("héllo", 2), 3);
        assert_eq!(char_to_byte_index("abc", 10), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_sends_typed_message() {
        let (mut app, mut rx) = test_app(ReplyPolicy::Cancel);
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.input_mode, InputMode::Editing);

        type_text(&mut app, "hi");
        press(&mut app, KeyCode::Enter);
        assert!(app.session.draft.is_empty());
        assert_eq!(app.session.transcript().len(), 1);

        let reply = rx.recv().await.unwrap();
        app.deliver_reply(reply);
        let speakers: Vec<Speaker> = app.session.transcript().iter().map(|t| t.from).collect();
        assert_eq!(speakers, vec![Speaker::User, Speaker::Ai]);
    }

    #[tokio::test]
    async fn test_enter_on_blank_sends_nothing() {
        let (mut app, _rx) = test_app(ReplyPolicy::Cancel);
        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert!(app.session.transcript().is_empty());
        assert!(!app.replies_pending());
    }

    #[tokio::test]
    async fn test_cursor_editing_mid_string() {
        let (mut app, _rx) = test_app(ReplyPolicy::Cancel);
        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "hllo");
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.session.draft, "hello");

        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.session.draft, "ell");
    }

    #[tokio::test]
    async fn test_scenario_list_selection_keys() {
        let (mut app, _rx) = test_app(ReplyPolicy::Cancel);
        press(&mut app, KeyCode::Tab); // Input -> Scenarios
        assert_eq!(app.focus, FocusPane::Scenarios);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.active_id(), "rejection");
    }

    #[tokio::test]
    async fn test_form_keys_add_scenario() {
        let (mut app, _rx) = test_app(ReplyPolicy::Cancel);
        press(&mut app, KeyCode::Char('n'));
        assert!(app.show_scenario_form);

        // 'q' is text inside the form, not quit
        type_text(&mut app, "Quit job");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Tell my boss");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "I have decided to move on.");
        press(&mut app, KeyCode::Enter);

        assert!(!app.should_quit);
        assert!(!app.show_scenario_form);
        let active = app.session.active_scenario();
        assert_eq!(active.title, "Quit job");
        assert!(active.id.starts_with("quit-job-"));

        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.session.draft, "I have decided to move on.");
    }

    #[tokio::test]
    async fn test_mood_picker_keys() {
        let (mut app, _rx) = test_app(ReplyPolicy::Cancel);
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.mood, rehearsal_room::Tone::Assertive);

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session.mood, rehearsal_room::Tone::Assertive);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_editing() {
        let (mut app, _rx) = test_app(ReplyPolicy::Cancel);
        press(&mut app, KeyCode::Char('i'));
        let key = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        handle_event(&mut app, AppEvent::Key(key)).unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_click_focuses_pane() {
        let (mut app, _rx) = test_app(ReplyPolicy::Cancel);
        app.scenarios_area = Some(Rect::new(0, 1, 30, 10));
        app.input_area = Some(Rect::new(30, 20, 50, 3));

        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };

        handle_event(&mut app, AppEvent::Mouse(click(5, 5))).unwrap();
        assert_eq!(app.focus, FocusPane::Scenarios);
        handle_event(&mut app, AppEvent::Mouse(click(40, 21))).unwrap();
        assert_eq!(app.focus, FocusPane::Input);
        assert_eq!(app.input_mode, InputMode::Editing);
    }
}
