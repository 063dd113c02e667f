//! Style attributes for the preedit string

use bitflags::bitflags;

bitflags! {
    /// Style flags applied to a preedit segment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FontStyle: u32 {
        const UNDERLINE = 1 << 0;
        const HIGHLIGHT = 1 << 1;
        const REVERSAL = 1 << 2;
    }
}

/// What a [`PreeditAttribute`] value describes.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeKind {
    #[default]
    None = 0,
    FontStyle = 1,
}

impl AttributeKind {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::FontStyle,
            _ => Self::None,
        }
    }
}

/// One styled segment of the preedit string.
///
/// `start` and `length` are in characters of the preedit text. The segment
/// list handed to the preedit update call is consumed by the conversion into
/// the engine's representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreeditAttribute {
    pub start: u32,
    pub length: u32,
    pub kind: AttributeKind,
    pub value: FontStyle,
}

impl PreeditAttribute {
    pub fn font_style(start: u32, length: u32, value: FontStyle) -> Self {
        Self {
            start,
            length,
            kind: AttributeKind::FontStyle,
            value,
        }
    }
}
