//! Application command codes and the command-set gate.

use std::{
    fmt,
    ops::{BitAnd, BitOr, Sub},
};

use bitvec::prelude::*;

/// Number of command codes covered by a [`CommandSet`].
pub const UNIVERSE: usize = 256;

/// An application command code.
///
/// Codes below 256 can be enabled and disabled through a [`CommandSet`].
/// Codes at or above 256 lie outside the gated range and are always enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Command(pub u16);

impl Command {
    /// The bit index of a gated command, or `None` for an ungated one.
    fn index(self) -> Option<usize> {
        let i = usize::from(self.0);
        (i < UNIVERSE).then_some(i)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmd:{}", self.0)
    }
}

/// Ask every view whether the loop may end. Never a valid `end_modal` code.
pub const VALID: Command = Command(0);
/// Leave the application.
pub const QUIT: Command = Command(1);
/// Reports a failure to start a modal view.
pub const ERROR: Command = Command(2);
/// Open the menu bar.
pub const MENU: Command = Command(3);
/// Close the current window.
pub const CLOSE: Command = Command(4);
/// Zoom the current window.
pub const ZOOM: Command = Command(5);
/// Resize the current window.
pub const RESIZE: Command = Command(6);
/// Select the next window.
pub const NEXT: Command = Command(7);
/// Select the previous window.
pub const PREV: Command = Command(8);
/// Show help.
pub const HELP: Command = Command(9);
/// Accept a dialog.
pub const OK: Command = Command(10);
/// Abandon a dialog. Always ends a modal loop, whatever `valid` says.
pub const CANCEL: Command = Command(11);
/// Answer yes.
pub const YES: Command = Command(12);
/// Answer no.
pub const NO: Command = Command(13);
/// Press the default button.
pub const DEFAULT: Command = Command(14);

/// Broadcast: the sender gained focus.
pub const RECEIVED_FOCUS: Command = Command(50);
/// Broadcast: the sender released focus. Also passed to `valid` when focus
/// is about to move away from a validating view.
pub const RELEASED_FOCUS: Command = Command(51);
/// Broadcast: the active command set changed.
pub const COMMAND_SET_CHANGED: Command = Command(52);
/// Broadcast: a scroll bar's value changed.
pub const SCROLLBAR_CHANGED: Command = Command(53);
/// Broadcast: a scroll bar was clicked.
pub const SCROLLBAR_CLICKED: Command = Command(54);
/// Broadcast: select the window with the number in the info field.
pub const SELECT_WINDOW_NUM: Command = Command(55);
/// Broadcast: a list item was chosen.
pub const LIST_ITEM_SELECTED: Command = Command(56);
/// Broadcast: the screen changed size. The info field carries the new size.
pub const SCREEN_RESIZED: Command = Command(57);

/// Commands disabled in a fresh kernel: the window affordances that make no
/// sense until a window exists.
pub const INITIALLY_DISABLED: [Command; 5] = [ZOOM, CLOSE, RESIZE, NEXT, PREV];

/// A set of enabled command codes over a fixed 0-255 universe. Equality
/// compares membership only.
#[derive(Clone)]
pub struct CommandSet {
    /// One bit per gated command.
    bits: BitVec,
    /// Set whenever `enable` or `disable` actually flips a bit.
    changed: bool,
}

impl PartialEq for CommandSet {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl Eq for CommandSet {}

impl Default for CommandSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for CommandSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.bits.iter_ones()).finish()
    }
}

impl CommandSet {
    /// A set with nothing enabled.
    pub fn empty() -> Self {
        Self {
            bits: BitVec::repeat(false, UNIVERSE),
            changed: false,
        }
    }

    /// A set with every gated command enabled.
    pub fn full() -> Self {
        Self {
            bits: BitVec::repeat(true, UNIVERSE),
            changed: false,
        }
    }

    /// The set a new kernel starts with: everything except
    /// [`INITIALLY_DISABLED`].
    pub fn initial() -> Self {
        let mut s = Self::full();
        for c in INITIALLY_DISABLED {
            s.disable(c);
        }
        s.changed = false;
        s
    }

    /// Build a set enabling exactly the listed commands.
    pub fn of(commands: &[Command]) -> Self {
        let mut s = Self::empty();
        for c in commands {
            s.enable(*c);
        }
        s.changed = false;
        s
    }

    /// Is the command enabled? Ungated commands always are.
    pub fn enabled(&self, command: Command) -> bool {
        command.index().is_none_or(|i| self.bits[i])
    }

    /// Enable a command. Returns true if membership changed.
    pub fn enable(&mut self, command: Command) -> bool {
        self.put(command, true)
    }

    /// Disable a command. Returns true if membership changed.
    pub fn disable(&mut self, command: Command) -> bool {
        self.put(command, false)
    }

    /// Set a command's membership. Returns true if membership changed.
    pub fn put(&mut self, command: Command, enable: bool) -> bool {
        let Some(i) = command.index() else {
            return false;
        };
        if self.bits[i] == enable {
            return false;
        }
        self.bits.set(i, enable);
        self.changed = true;
        true
    }

    /// Enable every command of `other`.
    pub fn enable_all(&mut self, other: &Self) {
        for i in other.bits.iter_ones() {
            if !self.bits[i] {
                self.bits.set(i, true);
                self.changed = true;
            }
        }
    }

    /// Disable every command of `other`.
    pub fn disable_all(&mut self, other: &Self) {
        for i in other.bits.iter_ones() {
            if self.bits[i] {
                self.bits.set(i, false);
                self.changed = true;
            }
        }
    }

    /// Commands enabled in either set.
    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.changed = false;
        out.enable_all(other);
        out.changed = false;
        out
    }

    /// Commands enabled in both sets.
    pub fn intersection(&self, other: &Self) -> Self {
        let mut out = Self::empty();
        for i in self.bits.iter_ones().filter(|i| other.bits[*i]) {
            out.bits.set(i, true);
        }
        out
    }

    /// Commands enabled in `self` but not in `other`.
    pub fn difference(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.disable_all(other);
        out.changed = false;
        out
    }

    /// Are no gated commands enabled?
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Does every command of `other` also belong to `self`?
    pub fn contains_all(&self, other: &Self) -> bool {
        other.bits.iter_ones().all(|i| self.bits[i])
    }

    /// The enabled gated commands in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Command> + '_ {
        self.bits
            .iter_ones()
            .filter_map(|i| u16::try_from(i).ok().map(Command))
    }

    /// Has membership changed since the flag was last cleared?
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Return and clear the changed flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Replace membership with `other`'s, flagging a change if it differs.
    pub fn assign(&mut self, other: &Self) {
        if self.bits != other.bits {
            self.bits.clone_from(&other.bits);
            self.changed = true;
        }
    }
}

impl BitOr for &CommandSet {
    type Output = CommandSet;

    fn bitor(self, rhs: Self) -> CommandSet {
        self.union(rhs)
    }
}

impl BitAnd for &CommandSet {
    type Output = CommandSet;

    fn bitand(self, rhs: Self) -> CommandSet {
        self.intersection(rhs)
    }
}

impl Sub for &CommandSet {
    type Output = CommandSet;

    fn sub(self, rhs: Self) -> CommandSet {
        self.difference(rhs)
    }
}
