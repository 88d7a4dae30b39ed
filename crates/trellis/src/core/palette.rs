//! Color palettes and display attributes.

use std::fmt;

/// A final display attribute: background in the high nibble, foreground in
/// the low nibble.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attr(pub u8);

impl Attr {
    /// Returned whenever palette resolution fails: blinking white on red.
    pub const ERROR: Self = Self(0xcf);
    /// Light gray on black.
    pub const NORMAL: Self = Self(0x07);
    /// Painted under a view's shadow.
    pub const SHADOW: Self = Self(0x08);

    /// Build an attribute from foreground and background color numbers.
    pub fn new(fg: u8, bg: u8) -> Self {
        Self(((bg & 0x0f) << 4) | (fg & 0x0f))
    }

    /// Foreground color number.
    pub fn fg(self) -> u8 {
        self.0 & 0x0f
    }

    /// Background color number.
    pub fn bg(self) -> u8 {
        self.0 >> 4
    }
}

impl fmt::Debug for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attr({:#04x})", self.0)
    }
}

/// An ordered byte table mapping a view's local color index to an index in
/// its owner's palette, or to a display attribute at the root.
///
/// Indices are 1-based; index 0 never resolves. An empty palette is
/// transparent and passes indices through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Palette {
    /// Entries; `entries[0]` holds index 1.
    entries: Vec<u8>,
}

impl Palette {
    /// A palette over the given entries.
    pub fn new(entries: impl Into<Vec<u8>>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// The pass-through palette.
    pub fn transparent() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Does this palette pass indices through?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Translate a 1-based index. Transparent palettes return the index
    /// itself. Index 0 and indices past the end do not resolve.
    pub fn map(&self, index: u8) -> Option<u8> {
        if index == 0 {
            return None;
        }
        if self.entries.is_empty() {
            return Some(index);
        }
        self.entries.get(usize::from(index) - 1).copied()
    }

    /// The raw entries.
    pub fn as_bytes(&self) -> &[u8] {
        &self.entries
    }
}

impl From<&[u8]> for Palette {
    fn from(b: &[u8]) -> Self {
        Self::new(b)
    }
}

/// Which built-in root palette a kernel resolves colors against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaletteScheme {
    /// Sixteen-color display.
    #[default]
    Color,
    /// Black and white display.
    BlackWhite,
    /// Monochrome display.
    Monochrome,
    /// An application-supplied root palette.
    Custom(Palette),
}

/// Root palette for color displays.
///
/// Entries 1-7 cover the background and menus, 8-15 blue windows, 16-23
/// gray windows and dialogs.
const COLOR: [u8; 23] = [
    0x71, 0x70, 0x78, 0x74, 0x20, 0x28, 0x24, 0x17, 0x1f, 0x1a, 0x31, 0x31, 0x1e, 0x71, 0x1f, 0x37,
    0x3f, 0x3a, 0x13, 0x13, 0x3e, 0x21, 0x3f,
];

/// Root palette for black and white displays.
const BLACK_WHITE: [u8; 23] = [
    0x70, 0x70, 0x78, 0x7f, 0x07, 0x07, 0x0f, 0x07, 0x0f, 0x07, 0x70, 0x70, 0x07, 0x70, 0x0f, 0x07,
    0x0f, 0x07, 0x70, 0x70, 0x07, 0x70, 0x0f,
];

/// Root palette for monochrome displays.
const MONOCHROME: [u8; 23] = [
    0x70, 0x07, 0x07, 0x0f, 0x70, 0x70, 0x70, 0x07, 0x0f, 0x07, 0x70, 0x70, 0x07, 0x70, 0x0f, 0x07,
    0x0f, 0x07, 0x70, 0x70, 0x07, 0x70, 0x0f,
];

impl PaletteScheme {
    /// The root palette for this scheme.
    pub fn palette(&self) -> Palette {
        match self {
            Self::Color => Palette::new(COLOR),
            Self::BlackWhite => Palette::new(BLACK_WHITE),
            Self::Monochrome => Palette::new(MONOCHROME),
            Self::Custom(p) => p.clone(),
        }
    }
}
