//! Keyboard input primitives.
use std::ops::Add;

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is held.
    pub shift: bool,
    /// Control is held.
    pub ctrl: bool,
    /// Alt is held.
    pub alt: bool,
}

impl Mods {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };
    /// Control only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };
    /// Alt only.
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };

    /// Is no modifier held?
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl Add<Self> for Mods {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
        }
    }
}

impl Add<KeyCode> for Mods {
    type Output = Key;

    fn add(self, code: KeyCode) -> Self::Output {
        Key { mods: self, code }
    }
}

impl Add<char> for Mods {
    type Output = Key;

    fn add(self, c: char) -> Self::Output {
        Key {
            mods: self,
            code: KeyCode::Char(c),
        }
    }
}

/// Logical key codes, already translated from terminal scan codes.
#[derive(Debug, PartialOrd, PartialEq, Hash, Eq, Clone, Copy)]
pub enum KeyCode {
    /// Backspace.
    Backspace,
    /// Enter/return.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Tab.
    Tab,
    /// Shift + Tab.
    BackTab,
    /// Delete.
    Delete,
    /// Insert.
    Insert,
    /// Escape.
    Esc,
    /// Function key; `F(1)` is F1.
    F(u8),
    /// A character.
    Char(char),
    /// A key the driver could not name.
    Null,
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

/// A keystroke along with modifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Key {
    /// Modifier state.
    pub mods: Mods,
    /// Key code.
    pub code: KeyCode,
}

impl Key {
    /// The character of an unmodified or shifted printable key.
    pub fn char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.mods.ctrl && !self.mods.alt => Some(c),
            _ => None,
        }
    }
}

impl PartialEq<KeyCode> for Key {
    fn eq(&self, c: &KeyCode) -> bool {
        // A modified key never equals a bare code.
        self.mods.is_empty() && *c == self.code
    }
}

impl PartialEq<char> for Key {
    fn eq(&self, c: &char) -> bool {
        *self == KeyCode::Char(*c)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        KeyCode::Char(c).into()
    }
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        Self {
            mods: Mods::NONE,
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparisons() {
        assert_eq!(Key::from('a'), 'a');
        assert_ne!(Mods::CTRL + 'a', 'a');
        assert_eq!((Mods::SHIFT + 'A').char(), Some('A'));
        assert_eq!((Mods::ALT + 'x').char(), None);
        assert_eq!(Mods::CTRL + Mods::ALT, Mods { shift: false, ctrl: true, alt: true });
        assert_eq!(Key::from(KeyCode::Enter), KeyCode::Enter);
    }
}
