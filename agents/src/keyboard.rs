//! Keyboard-driven player

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use game_core::{Action, MatchState, Side};

use crate::{AgentError, Controller};

/// Key names (as reported by `KeyboardEvent.key`) for each direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub up: Vec<String>,
    pub down: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: vec!["ArrowUp".into(), "w".into(), "W".into()],
            down: vec!["ArrowDown".into(), "s".into(), "S".into()],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
}

impl KeyState {
    /// Up wins when both keys are held
    pub fn action(self) -> Action {
        if self.up {
            Action::Up
        } else if self.down {
            Action::Down
        } else {
            Action::Stay
        }
    }
}

/// Moves the paddle while a bound key is held
#[derive(Debug, Clone)]
pub struct KeyController {
    side: Side,
    bindings: KeyBindings,
    keys: Rc<Cell<KeyState>>,
}

impl KeyController {
    pub fn new(side: Side, bindings: KeyBindings) -> Self {
        Self {
            side,
            bindings,
            keys: Rc::new(Cell::new(KeyState::default())),
        }
    }

    pub fn key_state(&self) -> KeyState {
        self.keys.get()
    }

    /// Returns whether `key` is bound
    pub fn handle_key_down(&self, key: &str) -> bool {
        self.set_key(key, true)
    }

    /// Returns whether `key` is bound
    pub fn handle_key_up(&self, key: &str) -> bool {
        self.set_key(key, false)
    }

    fn set_key(&self, key: &str, pressed: bool) -> bool {
        let mut state = self.keys.get();
        if self.bindings.up.iter().any(|k| k == key) {
            state.up = pressed;
        } else if self.bindings.down.iter().any(|k| k == key) {
            state.down = pressed;
        } else {
            return false;
        }
        self.keys.set(state);
        true
    }
}

impl Controller for KeyController {
    fn side(&self) -> Side {
        self.side
    }

    async fn select_action(&mut self, _state: &Arc<MatchState>) -> Result<Action, AgentError> {
        Ok(self.keys.get().action())
    }

    /// The mirror listens to the same keys
    fn mirror_controller(&self) -> Self {
        Self {
            side: self.side.opposite(),
            bindings: self.bindings.clone(),
            keys: Rc::clone(&self.keys),
        }
    }
}
