use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::entity::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    TogglePacing,
    Quit,
}

const ACTION_COUNT: usize = 6;

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::TogglePacing => 4,
            InputAction::Quit => 5,
        }
    }

    pub const fn direction(self) -> Option<Direction> {
        match self {
            InputAction::MoveUp => Some(Direction::Up),
            InputAction::MoveDown => Some(Direction::Down),
            InputAction::MoveLeft => Some(Direction::Left),
            InputAction::MoveRight => Some(Direction::Right),
            InputAction::TogglePacing | InputAction::Quit => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Steer { direction: Direction, pressed: bool },
    TogglePacing,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

const BINDINGS: [(KeyCode, InputAction); 10] = [
    (KeyCode::KeyW, InputAction::MoveUp),
    (KeyCode::ArrowUp, InputAction::MoveUp),
    (KeyCode::KeyS, InputAction::MoveDown),
    (KeyCode::ArrowDown, InputAction::MoveDown),
    (KeyCode::KeyA, InputAction::MoveLeft),
    (KeyCode::ArrowLeft, InputAction::MoveLeft),
    (KeyCode::KeyD, InputAction::MoveRight),
    (KeyCode::ArrowRight, InputAction::MoveRight),
    (KeyCode::KeyP, InputAction::TogglePacing),
    (KeyCode::Escape, InputAction::Quit),
];

/// Turns raw key events into commands. Auto-repeat is dropped and held state
/// is tracked per physical key; an action only changes when its first key
/// goes down or its last key comes up, so steering presses and releases
/// always arrive in pairs.
#[derive(Debug, Default)]
pub(crate) struct InputCollector {
    keys: [bool; BINDINGS.len()],
    actions: ActionStates,
}

impl InputCollector {
    pub(crate) fn handle_key_event(&mut self, key_event: &KeyEvent) -> Option<InputCommand> {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.handle_physical_key(key_event.physical_key, is_pressed, key_event.repeat)
    }

    pub(crate) fn handle_physical_key(
        &mut self,
        key: PhysicalKey,
        is_pressed: bool,
        repeat: bool,
    ) -> Option<InputCommand> {
        if repeat {
            return None;
        }
        let slot = binding_slot(key)?;
        if self.keys[slot] == is_pressed {
            return None;
        }
        self.keys[slot] = is_pressed;

        let action = BINDINGS[slot].1;
        let action_down = self.any_key_held(action);
        if self.actions.is_down(action) == action_down {
            return None;
        }
        self.actions.set(action, action_down);

        if let Some(direction) = action.direction() {
            return Some(InputCommand::Steer {
                direction,
                pressed: action_down,
            });
        }
        match action {
            InputAction::TogglePacing if action_down => Some(InputCommand::TogglePacing),
            InputAction::Quit if action_down => Some(InputCommand::Quit),
            _ => None,
        }
    }

    /// Releases every held direction, e.g. when the window loses focus and
    /// the matching key-up events will never arrive.
    pub(crate) fn release_all(&mut self) -> Vec<InputCommand> {
        let mut released = Vec::new();
        for action in [
            InputAction::MoveUp,
            InputAction::MoveDown,
            InputAction::MoveLeft,
            InputAction::MoveRight,
        ] {
            if !self.actions.is_down(action) {
                continue;
            }
            if let Some(direction) = action.direction() {
                released.push(InputCommand::Steer {
                    direction,
                    pressed: false,
                });
            }
        }
        self.keys = [false; BINDINGS.len()];
        self.actions = ActionStates::default();
        released
    }

    fn any_key_held(&self, action: InputAction) -> bool {
        BINDINGS
            .iter()
            .zip(self.keys.iter())
            .any(|((_, bound), held)| *held && *bound == action)
    }
}

fn binding_slot(key: PhysicalKey) -> Option<usize> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    BINDINGS.iter().position(|(bound, _)| *bound == code)
}
