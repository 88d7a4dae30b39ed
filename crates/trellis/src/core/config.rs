//! Kernel configuration.

use std::time::Duration;

use crate::{
    commands::{self, Command},
    geom::Expanse,
    palette::PaletteScheme,
};

/// Settings fixed when a [`Core`](crate::Core) is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Initial size of the root view.
    pub size: Expanse,
    /// Application palette installed on the root view.
    pub palette: PaletteScheme,
    /// Gated commands that start out disabled.
    pub disabled_commands: Vec<Command>,
    /// Largest gap between two presses that still counts as a double click.
    pub double_click: Duration,
    /// Width of the right shadow band and height of the bottom one.
    pub shadow_size: Expanse,
    /// How long the terminal source waits for input before reporting idle.
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: Expanse::new(80, 25),
            palette: PaletteScheme::default(),
            disabled_commands: commands::INITIALLY_DISABLED.to_vec(),
            double_click: Duration::from_millis(400),
            shadow_size: Expanse::new(2, 1),
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl Config {
    /// Use a different root size.
    pub fn with_size(mut self, size: impl Into<Expanse>) -> Self {
        self.size = size.into();
        self
    }

    /// Use a different application palette.
    pub fn with_palette(mut self, palette: PaletteScheme) -> Self {
        self.palette = palette;
        self
    }

    /// Start with exactly these gated commands disabled.
    pub fn with_disabled_commands(mut self, disabled: &[Command]) -> Self {
        self.disabled_commands = disabled.to_vec();
        self
    }

    /// Use a different double click interval.
    pub fn with_double_click(mut self, interval: Duration) -> Self {
        self.double_click = interval;
        self
    }

    /// Use a different shadow size.
    pub fn with_shadow_size(mut self, size: impl Into<Expanse>) -> Self {
        self.shadow_size = size.into();
        self
    }
}
