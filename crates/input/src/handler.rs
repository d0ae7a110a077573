//! DAS/ARR repeat handler for held cursor keys.
//!
//! Supports terminals that do not emit key release events by using a timeout.
//! Only cursor movement repeats; activate and restart fire on the press.

use crossterm::event::KeyCode;

use arrayvec::ArrayVec;

use tui_blast_types::{GameCommand, CURSOR_ARR_MS, CURSOR_DAS_MS};

use crate::map::{command_for_key, repeats};

// In terminals without key-release events, a short timeout prevents a single
// tap from turning into a sustained "held" state that triggers repeats.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Tracks the held cursor direction for DAS/ARR handling.
#[derive(Debug, Clone)]
pub struct InputHandler {
    held: Option<GameCommand>,
    last_key_time: std::time::Instant,
    das_timer: u32,
    arr_accumulator: u32,
    das_delay: u32,
    arr_rate: u32,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(CURSOR_DAS_MS, CURSOR_ARR_MS)
    }

    pub fn with_config(das_delay: u32, arr_rate: u32) -> Self {
        Self {
            held: None,
            last_key_time: std::time::Instant::now(),
            das_timer: 0,
            arr_accumulator: 0,
            das_delay,
            arr_rate,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    /// Handle a key press; returns the command to apply immediately.
    ///
    /// A newly held cursor direction fires once here; subsequent repeats
    /// come from [`InputHandler::update`]. Non-repeating commands pass
    /// straight through.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<GameCommand> {
        let command = command_for_key(code)?;
        if !repeats(command) {
            return Some(command);
        }

        self.last_key_time = std::time::Instant::now();
        if self.held == Some(command) {
            return None;
        }
        self.held = Some(command);
        self.das_timer = 0;
        self.arr_accumulator = 0;
        Some(command)
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if let Some(command) = command_for_key(code) {
            if self.held == Some(command) {
                self.release();
            }
        }
    }

    /// Advance repeat timers; returns the repeats due this tick.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<GameCommand, 16> {
        let mut commands = ArrayVec::<GameCommand, 16>::new();

        // Auto-release when the terminal does not emit release events.
        let time_since_last_key = self.last_key_time.elapsed().as_millis() as u32;
        if self.held.is_some() && time_since_last_key > self.key_release_timeout_ms {
            self.release();
        }

        let Some(held) = self.held else {
            return commands;
        };

        let prev_das = self.das_timer;
        self.das_timer += elapsed_ms;
        if self.das_timer >= self.das_delay {
            let excess = if prev_das < self.das_delay {
                self.das_timer - self.das_delay
            } else {
                elapsed_ms
            };
            self.arr_accumulator += excess;
            while self.arr_accumulator >= self.arr_rate {
                let _ = commands.try_push(held);
                self.arr_accumulator -= self.arr_rate;
            }
        }

        commands
    }

    pub fn reset(&mut self) {
        self.release();
        self.last_key_time = std::time::Instant::now();
    }

    fn release(&mut self) {
        self.held = None;
        self.das_timer = 0;
        self.arr_accumulator = 0;
    }

    #[cfg(test)]
    fn backdate_last_key(&mut self, ms: u64) {
        self.last_key_time = std::time::Instant::now() - std::time::Duration::from_millis(ms);
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeats_start_after_das_then_follow_arr() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);

        assert_eq!(
            ih.handle_key_press(KeyCode::Left),
            Some(GameCommand::CursorLeft)
        );

        // Before DAS expires: no repeats.
        assert!(ih.update(99).is_empty());

        // Exactly at DAS: still none (ARR needs excess past the delay).
        assert!(ih.update(1).is_empty());

        // One ARR interval past DAS: one repeat.
        assert_eq!(ih.update(25).as_slice(), &[GameCommand::CursorLeft]);

        // Two intervals at once: two repeats.
        assert_eq!(
            ih.update(50).as_slice(),
            &[GameCommand::CursorLeft, GameCommand::CursorLeft]
        );
    }

    #[test]
    fn test_holding_same_key_does_not_refire_on_press() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(10_000);
        assert!(ih.handle_key_press(KeyCode::Down).is_some());
        assert!(ih.handle_key_press(KeyCode::Down).is_none());
    }

    #[test]
    fn test_direction_change_fires_and_restarts_das() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);
        assert!(ih.handle_key_press(KeyCode::Left).is_some());
        let _ = ih.update(150);

        // Switching direction fires immediately and resets timers.
        assert_eq!(
            ih.handle_key_press(KeyCode::Right),
            Some(GameCommand::CursorRight)
        );
        assert!(ih.update(99).is_empty());
    }

    #[test]
    fn test_activate_is_never_held() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(10_000);
        assert_eq!(
            ih.handle_key_press(KeyCode::Char(' ')),
            Some(GameCommand::Activate)
        );
        // Pressing again fires again; update produces no repeats.
        assert_eq!(
            ih.handle_key_press(KeyCode::Char(' ')),
            Some(GameCommand::Activate)
        );
        assert!(ih.update(10_000).is_empty());
    }

    #[test]
    fn test_auto_release_without_release_events() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(50);
        assert!(ih.handle_key_press(KeyCode::Left).is_some());

        // Simulate no key-release events by moving the last key time back.
        ih.backdate_last_key(51);
        assert!(ih.update(0).is_empty());

        // Released: even a long update produces nothing.
        assert!(ih.update(1000).is_empty());
    }

    #[test]
    fn test_explicit_release_stops_repeats() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);
        assert!(ih.handle_key_press(KeyCode::Left).is_some());
        ih.handle_key_release(KeyCode::Left);
        assert!(ih.update(500).is_empty());
    }

    #[test]
    fn test_reset_clears_held_state() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);
        assert!(ih.handle_key_press(KeyCode::Right).is_some());
        assert!(!ih.update(200).is_empty());

        ih.reset();
        assert!(ih.update(200).is_empty());
    }
}
