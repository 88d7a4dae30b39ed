//! Terminal input through crossterm.
//!
//! Only input is translated here. Output goes through whatever
//! [`ScreenWriter`](super::ScreenWriter) the application installs.

use std::time::{Duration, Instant};

use crossterm::event as cevent;
use tracing::trace;

use crate::{
    Config,
    backend::EventSource,
    commands,
    error::Result,
    event::{
        Event, Info,
        key::{self, KeyCode},
        mouse::{self, Buttons},
    },
    geom::{Expanse, Point},
};

/// Translate crossterm modifiers.
fn translate_key_modifiers(mods: cevent::KeyModifiers) -> key::Mods {
    key::Mods {
        shift: mods.contains(cevent::KeyModifiers::SHIFT),
        ctrl: mods.contains(cevent::KeyModifiers::CONTROL),
        alt: mods.contains(cevent::KeyModifiers::ALT),
    }
}

/// Translate a crossterm key code. Keys the kernel has no code for are
/// dropped.
fn translate_key_code(code: cevent::KeyCode) -> Option<KeyCode> {
    Some(match code {
        cevent::KeyCode::Backspace => KeyCode::Backspace,
        cevent::KeyCode::Enter => KeyCode::Enter,
        cevent::KeyCode::Left => KeyCode::Left,
        cevent::KeyCode::Right => KeyCode::Right,
        cevent::KeyCode::Up => KeyCode::Up,
        cevent::KeyCode::Down => KeyCode::Down,
        cevent::KeyCode::Home => KeyCode::Home,
        cevent::KeyCode::End => KeyCode::End,
        cevent::KeyCode::PageUp => KeyCode::PageUp,
        cevent::KeyCode::PageDown => KeyCode::PageDown,
        cevent::KeyCode::Tab => KeyCode::Tab,
        cevent::KeyCode::BackTab => KeyCode::BackTab,
        cevent::KeyCode::Delete => KeyCode::Delete,
        cevent::KeyCode::Insert => KeyCode::Insert,
        cevent::KeyCode::F(x) => KeyCode::F(x),
        cevent::KeyCode::Char(c) => KeyCode::Char(c),
        cevent::KeyCode::Null => KeyCode::Null,
        cevent::KeyCode::Esc => KeyCode::Esc,
        _ => return None,
    })
}

/// Translate a crossterm mouse button.
fn translate_button(b: cevent::MouseButton) -> Buttons {
    match b {
        cevent::MouseButton::Left => Buttons::LEFT,
        cevent::MouseButton::Right => Buttons::RIGHT,
        cevent::MouseButton::Middle => Buttons::MIDDLE,
    }
}

/// Reads terminal input through crossterm, synthesizing double clicks.
#[derive(Debug)]
pub struct CrosstermSource {
    /// How long to wait before reporting idle.
    poll: Duration,
    /// Largest gap between presses of a double click.
    double_click: Duration,
    /// The previous press.
    last_press: Option<(Instant, Point, Buttons)>,
}

impl CrosstermSource {
    /// A source using the kernel's poll and double click intervals.
    pub fn new(config: &Config) -> Self {
        Self {
            poll: config.poll_interval,
            double_click: config.double_click,
            last_press: None,
        }
    }

    /// Translate one crossterm event.
    fn translate(&mut self, e: cevent::Event) -> Option<Event> {
        match e {
            cevent::Event::Key(k) => {
                if k.kind == cevent::KeyEventKind::Release {
                    return None;
                }
                Some(Event::key(key::Key {
                    mods: translate_key_modifiers(k.modifiers),
                    code: translate_key_code(k.code)?,
                }))
            }
            cevent::Event::Mouse(m) => {
                let location = Point::new(i32::from(m.column), i32::from(m.row));
                let (action, buttons) = match m.kind {
                    cevent::MouseEventKind::Down(b) => (mouse::Action::Down, translate_button(b)),
                    cevent::MouseEventKind::Up(b) => (mouse::Action::Up, translate_button(b)),
                    cevent::MouseEventKind::Drag(b) => (mouse::Action::Move, translate_button(b)),
                    cevent::MouseEventKind::Moved => (mouse::Action::Move, Buttons::empty()),
                    cevent::MouseEventKind::ScrollDown => {
                        (mouse::Action::WheelDown, Buttons::empty())
                    }
                    cevent::MouseEventKind::ScrollUp => (mouse::Action::WheelUp, Buttons::empty()),
                    cevent::MouseEventKind::ScrollLeft | cevent::MouseEventKind::ScrollRight => {
                        return None;
                    }
                };
                let double = action == mouse::Action::Down && self.is_double(location, buttons);
                Some(Event::mouse(mouse::MouseEvent {
                    action,
                    buttons,
                    location,
                    double,
                    modifiers: translate_key_modifiers(m.modifiers),
                }))
            }
            cevent::Event::Resize(w, h) => {
                trace!(w, h, "terminal resize");
                let size = Expanse::new(u32::from(w), u32::from(h));
                Some(Event::broadcast(commands::SCREEN_RESIZED, Info::Size(size)))
            }
            cevent::Event::FocusGained | cevent::Event::FocusLost | cevent::Event::Paste(_) => {
                None
            }
        }
    }

    /// Record a press and report whether it completes a double click.
    fn is_double(&mut self, at: Point, buttons: Buttons) -> bool {
        let now = Instant::now();
        let double = self.last_press.is_some_and(|(t, p, b)| {
            p == at && b == buttons && now.duration_since(t) <= self.double_click
        });
        self.last_press = if double { None } else { Some((now, at, buttons)) };
        double
    }
}

impl EventSource for CrosstermSource {
    fn get_event(&mut self) -> Result<Option<Event>> {
        if !cevent::poll(self.poll)? {
            return Ok(None);
        }
        Ok(self.translate(cevent::read()?))
    }
}
