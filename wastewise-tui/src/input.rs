use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, LogField, Screen};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
    /// Reload the data of the current screen
    Refresh,
    /// Store the entry typed into the log form
    SubmitLog,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    // Global shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    match key.code {
        Tab => return switch_screen(app, app.screen.next()),
        BackTab => return switch_screen(app, app.screen.previous()),
        _ => {}
    }

    if app.screen != Screen::Log {
        return match key.code {
            Char('q') => Action::Quit,
            Char('r') => Action::Refresh,
            Char(digit @ '1'..='5') => {
                let index = digit.to_digit(10).map_or(0, |value| value as usize - 1);
                Screen::ALL
                    .get(index)
                    .copied()
                    .map_or(Action::None, |screen| switch_screen(app, screen))
            }
            _ => Action::None,
        };
    }

    let mut action = Action::None;

    match key.code {
        Up => app.focus = app.focus.previous(),
        Down => app.focus = app.focus.next(),
        Left if app.focus == LogField::Category => app.cycle_category(false),
        Right if app.focus == LogField::Category => app.cycle_category(true),
        Char(character)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            match app.focus {
                LogField::Category => {
                    if character == ' ' {
                        app.cycle_category(true);
                    }
                }
                LogField::Amount => {
                    if character.is_ascii_digit() || character == '.' || character == ',' {
                        app.amount_input.push(character);
                    }
                }
                LogField::Note => app.note_input.push(character),
            }
        }
        Backspace => match app.focus {
            LogField::Category => {}
            LogField::Amount => {
                app.amount_input.pop();
            }
            LogField::Note => {
                app.note_input.pop();
            }
        },
        Enter => action = Action::SubmitLog,
        Esc => action = switch_screen(app, Screen::Dashboard),
        _ => {}
    }

    action
}

fn switch_screen(app: &mut App, screen: Screen) -> Action {
    app.screen = screen;
    app.error_message = None;
    Action::Refresh
}
