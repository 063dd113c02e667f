//! Registry of optional per-event callbacks
//!
//! One slot per event kind, each holding a boxed closure (any per-callback
//! user data lives in the closure's capture). The registry itself is a dumb
//! table; the session lifecycle decides when mutation is allowed and clears
//! the whole table at session end.

use crate::engine::{Geometry, WindowHandle};
use crate::types::{
    DeviceInfo, InputDeviceEvent, InputDeviceType, InputPanelLanguage, InputPanelLayout, KeyCode,
    KeyMask, OptionWindowType, ReturnKeyType,
};

/// Identifies an optional event callback slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    FocusIn,
    FocusOut,
    SurroundingTextUpdated,
    InputContextReset,
    CursorPositionUpdated,
    LanguageRequested,
    LanguageSet,
    ImdataSet,
    ImdataRequested,
    LayoutSet,
    ReturnKeyTypeSet,
    ReturnKeyStateSet,
    GeometryRequested,
    ProcessKeyEvent,
    DisplayLanguageChanged,
    RotationDegreeChanged,
    AccessibilityStateChanged,
    OptionWindowCreated,
    OptionWindowDestroyed,
    ProcessInputDeviceEvent,
}

#[derive(Default)]
pub struct CallbackRegistry {
    pub(crate) focus_in: Option<Box<dyn FnMut(i32)>>,
    pub(crate) focus_out: Option<Box<dyn FnMut(i32)>>,
    pub(crate) surrounding_text_updated: Option<Box<dyn FnMut(i32, &str, i32)>>,
    pub(crate) input_context_reset: Option<Box<dyn FnMut()>>,
    pub(crate) cursor_position_updated: Option<Box<dyn FnMut(i32)>>,
    pub(crate) language_requested: Option<Box<dyn FnMut() -> Option<String>>>,
    pub(crate) language_set: Option<Box<dyn FnMut(InputPanelLanguage)>>,
    pub(crate) imdata_set: Option<Box<dyn FnMut(&[u8])>>,
    pub(crate) imdata_requested: Option<Box<dyn FnMut() -> Vec<u8>>>,
    pub(crate) layout_set: Option<Box<dyn FnMut(InputPanelLayout)>>,
    pub(crate) return_key_type_set: Option<Box<dyn FnMut(ReturnKeyType)>>,
    pub(crate) return_key_state_set: Option<Box<dyn FnMut(bool)>>,
    pub(crate) geometry_requested: Option<Box<dyn FnMut() -> Geometry>>,
    pub(crate) process_key_event: Option<Box<dyn FnMut(KeyCode, KeyMask, &DeviceInfo) -> bool>>,
    pub(crate) display_language_changed: Option<Box<dyn FnMut(&str)>>,
    pub(crate) rotation_degree_changed: Option<Box<dyn FnMut(i32)>>,
    pub(crate) accessibility_state_changed: Option<Box<dyn FnMut(bool)>>,
    pub(crate) option_window_created: Option<Box<dyn FnMut(WindowHandle, OptionWindowType)>>,
    pub(crate) option_window_destroyed: Option<Box<dyn FnMut(WindowHandle)>>,
    pub(crate) process_input_device_event:
        Option<Box<dyn FnMut(InputDeviceType, &InputDeviceEvent)>>,
}

impl CallbackRegistry {
    /// Empties every slot.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Empties one slot; a no-op when the slot is already empty.
    pub fn unset(&mut self, kind: EventKind) {
        match kind {
            EventKind::FocusIn => self.focus_in = None,
            EventKind::FocusOut => self.focus_out = None,
            EventKind::SurroundingTextUpdated => self.surrounding_text_updated = None,
            EventKind::InputContextReset => self.input_context_reset = None,
            EventKind::CursorPositionUpdated => self.cursor_position_updated = None,
            EventKind::LanguageRequested => self.language_requested = None,
            EventKind::LanguageSet => self.language_set = None,
            EventKind::ImdataSet => self.imdata_set = None,
            EventKind::ImdataRequested => self.imdata_requested = None,
            EventKind::LayoutSet => self.layout_set = None,
            EventKind::ReturnKeyTypeSet => self.return_key_type_set = None,
            EventKind::ReturnKeyStateSet => self.return_key_state_set = None,
            EventKind::GeometryRequested => self.geometry_requested = None,
            EventKind::ProcessKeyEvent => self.process_key_event = None,
            EventKind::DisplayLanguageChanged => self.display_language_changed = None,
            EventKind::RotationDegreeChanged => self.rotation_degree_changed = None,
            EventKind::AccessibilityStateChanged => self.accessibility_state_changed = None,
            EventKind::OptionWindowCreated => self.option_window_created = None,
            EventKind::OptionWindowDestroyed => self.option_window_destroyed = None,
            EventKind::ProcessInputDeviceEvent => self.process_input_device_event = None,
        }
    }

    /// Whether a slot currently holds a callback.
    pub fn is_set(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::FocusIn => self.focus_in.is_some(),
            EventKind::FocusOut => self.focus_out.is_some(),
            EventKind::SurroundingTextUpdated => self.surrounding_text_updated.is_some(),
            EventKind::InputContextReset => self.input_context_reset.is_some(),
            EventKind::CursorPositionUpdated => self.cursor_position_updated.is_some(),
            EventKind::LanguageRequested => self.language_requested.is_some(),
            EventKind::LanguageSet => self.language_set.is_some(),
            EventKind::ImdataSet => self.imdata_set.is_some(),
            EventKind::ImdataRequested => self.imdata_requested.is_some(),
            EventKind::LayoutSet => self.layout_set.is_some(),
            EventKind::ReturnKeyTypeSet => self.return_key_type_set.is_some(),
            EventKind::ReturnKeyStateSet => self.return_key_state_set.is_some(),
            EventKind::GeometryRequested => self.geometry_requested.is_some(),
            EventKind::ProcessKeyEvent => self.process_key_event.is_some(),
            EventKind::DisplayLanguageChanged => self.display_language_changed.is_some(),
            EventKind::RotationDegreeChanged => self.rotation_degree_changed.is_some(),
            EventKind::AccessibilityStateChanged => self.accessibility_state_changed.is_some(),
            EventKind::OptionWindowCreated => self.option_window_created.is_some(),
            EventKind::OptionWindowDestroyed => self.option_window_destroyed.is_some(),
            EventKind::ProcessInputDeviceEvent => self.process_input_device_event.is_some(),
        }
    }

    /// Whether no slot holds a callback.
    pub fn is_empty(&self) -> bool {
        !EventKind::ALL.iter().any(|kind| self.is_set(*kind))
    }
}

impl EventKind {
    /// Every slot, for whole-table checks.
    pub const ALL: [EventKind; 20] = [
        EventKind::FocusIn,
        EventKind::FocusOut,
        EventKind::SurroundingTextUpdated,
        EventKind::InputContextReset,
        EventKind::CursorPositionUpdated,
        EventKind::LanguageRequested,
        EventKind::LanguageSet,
        EventKind::ImdataSet,
        EventKind::ImdataRequested,
        EventKind::LayoutSet,
        EventKind::ReturnKeyTypeSet,
        EventKind::ReturnKeyStateSet,
        EventKind::GeometryRequested,
        EventKind::ProcessKeyEvent,
        EventKind::DisplayLanguageChanged,
        EventKind::RotationDegreeChanged,
        EventKind::AccessibilityStateChanged,
        EventKind::OptionWindowCreated,
        EventKind::OptionWindowDestroyed,
        EventKind::ProcessInputDeviceEvent,
    ];
}
