//! Events routed through the view tree.

pub mod key;
pub mod mouse;

use crate::{
    commands::{self, Command},
    core::id::ViewId,
    geom::Expanse,
};

bitflags::bitflags! {
    /// Event class tags. A view's event mask is a set of these.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventClass: u16 {
        /// A mouse button was pressed.
        const MOUSE_DOWN = 0x0001;
        /// A mouse button was released.
        const MOUSE_UP = 0x0002;
        /// The mouse moved.
        const MOUSE_MOVE = 0x0004;
        /// A mouse button is held still.
        const MOUSE_AUTO = 0x0008;
        /// A key was pressed.
        const KEY_DOWN = 0x0010;
        /// The mouse wheel turned.
        const MOUSE_WHEEL = 0x0020;
        /// An application command.
        const COMMAND = 0x0100;
        /// A message for every view.
        const BROADCAST = 0x0200;

        /// All mouse classes.
        const MOUSE = 0x002f;
        /// All keyboard classes.
        const KEYBOARD = 0x0010;
        /// All message classes, including application-defined ones.
        const MESSAGE = 0xff00;
        /// Message classes left for applications.
        const USER = 0xfc00;
        /// Classes routed to the view under the pointer.
        const POSITIONAL = Self::MOUSE.bits();
        /// Classes routed down the focus chain.
        const FOCUSED = Self::KEYBOARD.bits() | Self::COMMAND.bits();
        /// The mask a plain view starts with.
        const DEFAULT_MASK = Self::MOUSE_DOWN.bits() | Self::KEY_DOWN.bits() | Self::COMMAND.bits();
    }
}

/// Payload carried by a message event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Info {
    /// Nothing attached.
    #[default]
    None,
    /// A view, usually the sender.
    View(ViewId),
    /// A number.
    Int(i64),
    /// A screen size.
    Size(Expanse),
}

/// A command or broadcast payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Message {
    /// Command code.
    pub command: Command,
    /// Attached data.
    pub info: Info,
}

impl Message {
    /// A message with no attached data.
    pub fn new(command: Command) -> Self {
        Self {
            command,
            info: Info::None,
        }
    }
}

/// The body of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Cleared; a handler consumed the event.
    Nothing,
    /// Mouse input.
    Mouse(mouse::MouseEvent),
    /// Keyboard input.
    Key(key::Key),
    /// An application command, routed down the focus chain.
    Command(Message),
    /// A broadcast, delivered to every view.
    Broadcast(Message),
    /// An application-defined message class. Always routed as a broadcast.
    User(EventClass, Message),
}

/// An event travelling through the view tree.
///
/// Handlers signal consumption by calling [`Event::clear`]; the kernel then
/// records which view consumed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    /// The body.
    kind: EventKind,
    /// The view that cleared the event, if any.
    consumer: Option<ViewId>,
}

impl Event {
    /// Wrap an event body.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            consumer: None,
        }
    }

    /// An empty event.
    pub fn nothing() -> Self {
        Self::new(EventKind::Nothing)
    }

    /// A key event.
    pub fn key(k: impl Into<key::Key>) -> Self {
        Self::new(EventKind::Key(k.into()))
    }

    /// A mouse event.
    pub fn mouse(m: mouse::MouseEvent) -> Self {
        Self::new(EventKind::Mouse(m))
    }

    /// A command event with no attached data.
    pub fn command(command: Command) -> Self {
        Self::new(EventKind::Command(Message::new(command)))
    }

    /// A broadcast event.
    pub fn broadcast(command: Command, info: Info) -> Self {
        Self::new(EventKind::Broadcast(Message { command, info }))
    }

    /// An application-defined message. Bits outside `EventClass::USER` are
    /// dropped so the class can never collide with input, command or
    /// broadcast classes.
    pub fn user(class: EventClass, message: Message) -> Self {
        Self::new(EventKind::User(class & EventClass::USER, message))
    }

    /// The event body.
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// The class tag used for routing and masking.
    pub fn class(&self) -> EventClass {
        match &self.kind {
            EventKind::Nothing => EventClass::empty(),
            EventKind::Mouse(m) => match m.action {
                mouse::Action::Down => EventClass::MOUSE_DOWN,
                mouse::Action::Up => EventClass::MOUSE_UP,
                mouse::Action::Move => EventClass::MOUSE_MOVE,
                mouse::Action::Auto => EventClass::MOUSE_AUTO,
                mouse::Action::WheelUp | mouse::Action::WheelDown => EventClass::MOUSE_WHEEL,
            },
            EventKind::Key(_) => EventClass::KEY_DOWN,
            EventKind::Command(_) => EventClass::COMMAND,
            EventKind::Broadcast(_) => EventClass::BROADCAST,
            EventKind::User(class, _) => *class,
        }
    }

    /// Has the event been consumed?
    pub fn is_nothing(&self) -> bool {
        self.kind == EventKind::Nothing
    }

    /// Mark the event consumed.
    pub fn clear(&mut self) {
        self.kind = EventKind::Nothing;
    }

    /// The view that consumed the event, once it has been cleared.
    pub fn consumer(&self) -> Option<ViewId> {
        self.consumer
    }

    /// Record the consuming view. Called by the kernel only.
    pub(crate) fn set_consumer(&mut self, id: ViewId) {
        self.consumer = Some(id);
    }

    /// The mouse body, if this is a mouse event.
    pub fn as_mouse(&self) -> Option<&mouse::MouseEvent> {
        match &self.kind {
            EventKind::Mouse(m) => Some(m),
            _ => None,
        }
    }

    /// The key body, if this is a key event.
    pub fn as_key(&self) -> Option<&key::Key> {
        match &self.kind {
            EventKind::Key(k) => Some(k),
            _ => None,
        }
    }

    /// The message of a command, broadcast or user event.
    pub fn message(&self) -> Option<&Message> {
        match &self.kind {
            EventKind::Command(m) | EventKind::Broadcast(m) | EventKind::User(_, m) => Some(m),
            _ => None,
        }
    }

    /// Is this a command event carrying `command`?
    pub fn is_command(&self, command: Command) -> bool {
        matches!(&self.kind, EventKind::Command(m) if m.command == command)
    }

    /// Is this a broadcast carrying `command`?
    pub fn is_broadcast(&self, command: Command) -> bool {
        matches!(&self.kind, EventKind::Broadcast(m) if m.command == command)
    }

    /// The new size, if this is a `SCREEN_RESIZED` broadcast.
    pub fn resized(&self) -> Option<Expanse> {
        match &self.kind {
            EventKind::Broadcast(Message {
                command: commands::SCREEN_RESIZED,
                info: Info::Size(size),
            }) => Some(*size),
            _ => None,
        }
    }
}

impl From<EventKind> for Event {
    fn from(kind: EventKind) -> Self {
        Self::new(kind)
    }
}
