//! Key mapping from terminal events to game commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_blast_types::GameCommand;

/// Map a key code to a game command.
///
/// Arrows and hjkl/wasd move the cell cursor; space or enter activates the
/// tile under it. Row 0 is the bottom row, so "up" moves toward higher rows.
pub fn command_for_key(code: KeyCode) -> Option<GameCommand> {
    match code {
        // Cursor movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(GameCommand::CursorLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(GameCommand::CursorRight)
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(GameCommand::CursorUp)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(GameCommand::CursorDown)
        }

        // Actions
        KeyCode::Char(' ') | KeyCode::Enter => Some(GameCommand::Activate),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameCommand::Restart),

        _ => None,
    }
}

/// True for commands that auto-repeat while held.
pub fn repeats(command: GameCommand) -> bool {
    matches!(
        command,
        GameCommand::CursorLeft
            | GameCommand::CursorRight
            | GameCommand::CursorUp
            | GameCommand::CursorDown
    )
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_cursor_keys() {
        assert_eq!(command_for_key(KeyCode::Left), Some(GameCommand::CursorLeft));
        assert_eq!(command_for_key(KeyCode::Right), Some(GameCommand::CursorRight));
        assert_eq!(command_for_key(KeyCode::Up), Some(GameCommand::CursorUp));
        assert_eq!(command_for_key(KeyCode::Down), Some(GameCommand::CursorDown));

        assert_eq!(command_for_key(KeyCode::Char('H')), Some(GameCommand::CursorLeft));
        assert_eq!(command_for_key(KeyCode::Char('l')), Some(GameCommand::CursorRight));
        assert_eq!(command_for_key(KeyCode::Char('w')), Some(GameCommand::CursorUp));
        assert_eq!(command_for_key(KeyCode::Char('J')), Some(GameCommand::CursorDown));
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(command_for_key(KeyCode::Char(' ')), Some(GameCommand::Activate));
        assert_eq!(command_for_key(KeyCode::Enter), Some(GameCommand::Activate));
        assert_eq!(command_for_key(KeyCode::Char('r')), Some(GameCommand::Restart));
        assert_eq!(command_for_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_only_cursor_commands_repeat() {
        assert!(repeats(GameCommand::CursorLeft));
        assert!(repeats(GameCommand::CursorDown));
        assert!(!repeats(GameCommand::Activate));
        assert!(!repeats(GameCommand::Restart));
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
