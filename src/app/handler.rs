use crate::app::action::Action;
use crate::app::commands::{parse_input, ParsedInput};
use crate::app::event::AppEvent;
use crate::app::state::*;
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, cevent)
        }
        AppEvent::HttpResponse { id, result } => vec![Action::Deliver { id, result }],
        AppEvent::Tick => vec![Action::Tick],
    }
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) if key.kind != KeyEventKind::Release => handle_key(state, key),
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    // Global keybindings
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![Action::Quit];
    }
    if key.modifiers.contains(KeyModifiers::ALT) && key.code == KeyCode::Left {
        return vec![Action::Back];
    }
    match key.code {
        KeyCode::F(5) => return vec![Action::Reload],
        KeyCode::F(n @ 1..=4) => {
            return vec![Action::OpenModule {
                index: usize::from(n - 1),
            }]
        }
        KeyCode::Tab | KeyCode::BackTab => {
            state.cycle_focus();
            return vec![];
        }
        _ => {}
    }

    match state.focus {
        Focus::Input => handle_input_key(state, key),
        Focus::Content => handle_content_key(state, key),
    }
}

fn handle_input_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Enter => {
            let line = state.input.take_text();
            submit(state, &line)
        }
        KeyCode::Char(c) => {
            state.input.insert_char(c);
            vec![]
        }
        KeyCode::Backspace => {
            state.input.delete_back();
            vec![]
        }
        KeyCode::Delete => {
            state.input.delete_forward();
            vec![]
        }
        KeyCode::Left => {
            state.input.move_left();
            vec![]
        }
        KeyCode::Right => {
            state.input.move_right();
            vec![]
        }
        KeyCode::Home => {
            state.input.move_home();
            vec![]
        }
        KeyCode::End => {
            state.input.move_end();
            vec![]
        }
        KeyCode::Up => {
            state.input.history_up();
            vec![]
        }
        KeyCode::Down => {
            state.input.history_down();
            vec![]
        }
        KeyCode::Esc => {
            state.input.take_text();
            state.focus = Focus::Content;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_content_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => vec![Action::GridPrev],
        KeyCode::Down | KeyCode::Char('j') => vec![Action::GridNext],
        KeyCode::PageUp => vec![Action::GridPrevPage],
        KeyCode::PageDown => vec![Action::GridNextPage],
        KeyCode::Enter => vec![Action::GridOpen],
        KeyCode::Char(' ') => vec![Action::GridToggleMark],
        KeyCode::Backspace => vec![Action::Back],
        KeyCode::Char(c @ '1'..='9') => vec![Action::GridSort {
            column: (c as usize) - ('1' as usize),
        }],
        KeyCode::Char('q') => vec![Action::Quit],
        KeyCode::Char(c @ ('/' | '#' | ':')) => {
            // ':' is shorthand for '/'
            state.focus = Focus::Input;
            state.input.insert_char(if c == ':' { '/' } else { c });
            vec![]
        }
        _ => vec![],
    }
}

fn submit(state: &mut AppState, line: &str) -> Vec<Action> {
    match parse_input(line) {
        ParsedInput::Route(fragment) => vec![Action::Navigate { fragment }],
        ParsedInput::Quit => vec![Action::Quit],
        ParsedInput::Back => vec![Action::Back],
        ParsedInput::Reload => vec![Action::Reload],
        ParsedInput::Search { keyword } => vec![Action::Search { keyword }],
        ParsedInput::Delete => vec![Action::DeleteMarked],
        ParsedInput::Help => vec![Action::Help],
        ParsedInput::Unknown { name } => vec![Action::UnknownCommand { name }],
        ParsedInput::Empty => {
            state.focus = Focus::Content;
            vec![]
        }
    }
}
