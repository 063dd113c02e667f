//! Input context snapshot delivered with the show event
//!
//! Each edit field carries a set of attributes the keyboard needs to draw
//! itself (layout, return key, hints, ...). The engine hands those over as a
//! raw record; [`InputContext`] is the copied, immutable view the show
//! callback receives.

use bitflags::bitflags;

use crate::engine::RawInputContext;

/// Keyboard layout requested by the focused edit field.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPanelLayout {
    #[default]
    Normal = 0,
    Number = 1,
    Email = 2,
    Url = 3,
    PhoneNumber = 4,
    Ip = 5,
    Month = 6,
    NumberOnly = 7,
    Invalid = 8,
    Hex = 9,
    Terminal = 10,
    Password = 11,
    DateTime = 12,
    Emoticon = 13,
}

impl InputPanelLayout {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::Number,
            2 => Self::Email,
            3 => Self::Url,
            4 => Self::PhoneNumber,
            5 => Self::Ip,
            6 => Self::Month,
            7 => Self::NumberOnly,
            8 => Self::Invalid,
            9 => Self::Hex,
            10 => Self::Terminal,
            11 => Self::Password,
            12 => Self::DateTime,
            13 => Self::Emoticon,
            _ => Self::Normal,
        }
    }
}

/// Variation within a layout.
///
/// Values overlap across layouts (each layout numbers its variations from
/// zero), so this is a plain wrapped integer with named constants rather
/// than one enum.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutVariation(pub u32);

impl LayoutVariation {
    pub const NORMAL: LayoutVariation = LayoutVariation(0);
    pub const NORMAL_FILENAME: LayoutVariation = LayoutVariation(1);
    pub const NORMAL_PERSON_NAME: LayoutVariation = LayoutVariation(2);
    pub const NUMBER_ONLY_SIGNED: LayoutVariation = LayoutVariation(1);
    pub const NUMBER_ONLY_DECIMAL: LayoutVariation = LayoutVariation(2);
    pub const NUMBER_ONLY_SIGNED_AND_DECIMAL: LayoutVariation = LayoutVariation(3);
    pub const PASSWORD_NUMBER_ONLY: LayoutVariation = LayoutVariation(1);

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Auto-capitalization behaviour of the edit field.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutocapitalType {
    #[default]
    None = 0,
    Word = 1,
    Sentence = 2,
    AllCharacter = 3,
}

impl AutocapitalType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::Word,
            2 => Self::Sentence,
            3 => Self::AllCharacter,
            _ => Self::None,
        }
    }
}

/// Label shown on the return key.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnKeyType {
    #[default]
    Default = 0,
    Done = 1,
    Go = 2,
    Join = 3,
    Login = 4,
    Next = 5,
    Search = 6,
    Send = 7,
    Signin = 8,
}

impl ReturnKeyType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::Done,
            2 => Self::Go,
            3 => Self::Join,
            4 => Self::Login,
            5 => Self::Next,
            6 => Self::Search,
            7 => Self::Send,
            8 => Self::Signin,
            _ => Self::Default,
        }
    }
}

/// Preferred input language of the edit field.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPanelLanguage {
    #[default]
    Automatic = 0,
    Alphabet = 1,
}

impl InputPanelLanguage {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::Alphabet,
            _ => Self::Automatic,
        }
    }
}

/// Text direction of the edit field.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BidiDirection {
    #[default]
    Neutral = 0,
    Ltr = 1,
    Rtl = 2,
}

impl BidiDirection {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::Ltr,
            2 => Self::Rtl,
            _ => Self::Neutral,
        }
    }
}

bitflags! {
    /// Hints the edit field gives about desirable input behaviour.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InputHint: u32 {
        const AUTO_COMPLETE = 1 << 0;
        const SENSITIVE_DATA = 1 << 1;
        const MULTILINE = 1 << 2;
    }
}

/// Who asked for the option window to open.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionWindowType {
    Keyboard = 0,
    SettingApplication = 1,
}

impl OptionWindowType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::SettingApplication,
            _ => Self::Keyboard,
        }
    }
}

/// Snapshot of the focused edit field's attributes.
///
/// Built fresh from the engine's record before every show dispatch; the
/// callback gets a borrowed view and must clone whatever it wants to keep.
/// Mutating a clone has no effect on the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct InputContext {
    layout: InputPanelLayout,
    layout_variation: LayoutVariation,
    cursor_pos: i32,
    autocapital_type: AutocapitalType,
    return_key_type: ReturnKeyType,
    return_key_disabled: bool,
    prediction_allow: bool,
    password_mode: bool,
    imdata_size: u32,
    input_hint: InputHint,
    bidi_direction: BidiDirection,
    language: InputPanelLanguage,
    client_window: u32,
}

impl InputContext {
    /// Copies every field out of the engine's native record.
    pub fn from_raw(raw: &RawInputContext) -> Self {
        Self {
            layout: InputPanelLayout::from_raw(raw.layout),
            layout_variation: LayoutVariation(raw.layout_variation),
            cursor_pos: raw.cursor_pos,
            autocapital_type: AutocapitalType::from_raw(raw.autocapital_type),
            return_key_type: ReturnKeyType::from_raw(raw.return_key_type),
            return_key_disabled: raw.return_key_disabled,
            prediction_allow: raw.prediction_allow,
            password_mode: raw.password_mode,
            imdata_size: raw.imdata_size,
            input_hint: InputHint::from_bits_truncate(raw.input_hint),
            bidi_direction: BidiDirection::from_raw(raw.bidi_direction),
            language: InputPanelLanguage::from_raw(raw.language),
            client_window: raw.client_window,
        }
    }

    pub fn layout(&self) -> InputPanelLayout {
        self.layout
    }

    pub fn layout_variation(&self) -> LayoutVariation {
        self.layout_variation
    }

    pub fn cursor_position(&self) -> i32 {
        self.cursor_pos
    }

    pub fn autocapital_type(&self) -> AutocapitalType {
        self.autocapital_type
    }

    pub fn return_key_type(&self) -> ReturnKeyType {
        self.return_key_type
    }

    /// `true` when the return key button should be drawn enabled.
    pub fn return_key_state(&self) -> bool {
        !self.return_key_disabled
    }

    pub fn prediction_mode(&self) -> bool {
        self.prediction_allow
    }

    pub fn password_mode(&self) -> bool {
        self.password_mode
    }

    /// Size in bytes of the application data delivered separately.
    pub fn imdata_size(&self) -> u32 {
        self.imdata_size
    }

    pub fn input_hint(&self) -> InputHint {
        self.input_hint
    }

    pub fn bidi_direction(&self) -> BidiDirection {
        self.bidi_direction
    }

    pub fn language(&self) -> InputPanelLanguage {
        self.language
    }

    /// Window id of the client application owning the edit field.
    pub fn client_window(&self) -> u32 {
        self.client_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_layout_falls_back_to_normal() {
        assert_eq!(InputPanelLayout::from_raw(99), InputPanelLayout::Normal);
    }

    #[test]
    fn snapshot_copies_all_fields() {
        let raw = RawInputContext {
            layout: 11,
            layout_variation: 1,
            cursor_pos: 7,
            autocapital_type: 2,
            return_key_type: 6,
            return_key_disabled: true,
            prediction_allow: false,
            password_mode: true,
            imdata_size: 16,
            input_hint: 0b011,
            bidi_direction: 2,
            language: 1,
            client_window: 0xBEEF,
        };
        let ctx = InputContext::from_raw(&raw);
        assert_eq!(ctx.layout(), InputPanelLayout::Password);
        assert_eq!(ctx.layout_variation(), LayoutVariation::PASSWORD_NUMBER_ONLY);
        assert_eq!(ctx.cursor_position(), 7);
        assert_eq!(ctx.autocapital_type(), AutocapitalType::Sentence);
        assert_eq!(ctx.return_key_type(), ReturnKeyType::Search);
        assert!(!ctx.return_key_state());
        assert!(!ctx.prediction_mode());
        assert!(ctx.password_mode());
        assert_eq!(ctx.imdata_size(), 16);
        assert_eq!(
            ctx.input_hint(),
            InputHint::AUTO_COMPLETE | InputHint::SENSITIVE_DATA
        );
        assert_eq!(ctx.bidi_direction(), BidiDirection::Rtl);
        assert_eq!(ctx.language(), InputPanelLanguage::Alphabet);
        assert_eq!(ctx.client_window(), 0xBEEF);
    }
}
