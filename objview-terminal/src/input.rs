/// Keyboard mapping from terminal events to transform commands
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use objview_core::Command;
use std::collections::BTreeSet;

/// What a single key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Command(Command),
    Quit,
}

/// Map a key press to an action.
///
/// Arrows or WASD translate, Q/E scale up/down, R/F rotate forwards/back,
/// Esc or Ctrl-C quits.
pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    let command = match key.code {
        KeyCode::Esc => return Some(Action::Quit),
        KeyCode::Up => Command::TranslateUp,
        KeyCode::Down => Command::TranslateDown,
        KeyCode::Left => Command::TranslateLeft,
        KeyCode::Right => Command::TranslateRight,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Command::TranslateUp,
            's' => Command::TranslateDown,
            'a' => Command::TranslateLeft,
            'd' => Command::TranslateRight,
            'q' => Command::ScaleUp,
            'e' => Command::ScaleDown,
            'r' => Command::Rotate,
            'f' => Command::RotateBack,
            _ => return None,
        },
        _ => return None,
    };
    Some(Action::Command(command))
}

/// Everything the user asked for during one frame.
///
/// Commands are deduplicated: holding a key that auto-repeats several times
/// between two frames still applies its command once.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InputFrame {
    commands: BTreeSet<Command>,
    quit: bool,
    resize: Option<(u16, u16)>,
}

impl InputFrame {
    pub fn collect(events: impl IntoIterator<Item = Event>) -> Self {
        let mut frame = Self::default();
        for event in events {
            match event {
                Event::Key(key) => match action_for(&key) {
                    Some(Action::Command(command)) => {
                        frame.commands.insert(command);
                    }
                    Some(Action::Quit) => frame.quit = true,
                    None => {}
                },
                Event::Resize(width, height) => frame.resize = Some((width, height)),
                _ => {}
            }
        }
        frame
    }

    pub fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.commands.iter().copied()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Last terminal size reported during the frame
    pub fn resize(&self) -> Option<(u16, u16)> {
        self.resize
    }
}
