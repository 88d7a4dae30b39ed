//! Mouse input primitives.

use crate::{event::key, geom::Point};

bitflags::bitflags! {
    /// Mouse buttons held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        /// Primary (left) button.
        const LEFT = 0x01;
        /// Secondary (right) button.
        const RIGHT = 0x02;
        /// Middle button.
        const MIDDLE = 0x04;
    }
}

/// Mouse action kinds.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Action {
    /// A button was pressed.
    Down,
    /// A button was released.
    Up,
    /// The pointer moved, with or without buttons held.
    Move,
    /// A button is being held still; repeated by the driver.
    Auto,
    /// The wheel turned upward.
    WheelUp,
    /// The wheel turned downward.
    WheelDown,
}

/// A mouse event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// What happened.
    pub action: Action,
    /// Buttons held, or the button that changed for `Down`/`Up`.
    pub buttons: Buttons,
    /// Pointer position in global (root) coordinates.
    pub location: Point,
    /// Set on the second press of a double click.
    pub double: bool,
    /// Keyboard modifiers.
    pub modifiers: key::Mods,
}

impl MouseEvent {
    /// A press of the given buttons at a global location.
    pub fn down(buttons: Buttons, location: impl Into<Point>) -> Self {
        Self {
            action: Action::Down,
            buttons,
            location: location.into(),
            double: false,
            modifiers: key::Mods::NONE,
        }
    }

    /// A press of the primary button at a global location.
    pub fn click(location: impl Into<Point>) -> Self {
        Self::down(Buttons::LEFT, location)
    }

    /// The same event with a different action.
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Is this a press of the primary button?
    pub fn is_primary_down(&self) -> bool {
        self.action == Action::Down && self.buttons.contains(Buttons::LEFT)
    }
}
