//! Interface to the external rendering/event-loop core
//!
//! The shim never renders or decodes anything itself; it drives an
//! [`EngineCore`] and listens to it through [`EngineListener`]. The engine's
//! native event shapes are plain records here so the marshalling layer can
//! adapt them into the public callback vocabulary.

use crate::error::Result;
use crate::types::{KeyCode, KeyMask};

/// Edit-field attribute record as the engine delivers it with a show event.
///
/// All fields are raw platform values; [`crate::types::InputContext`] is the
/// decoded snapshot built from this.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInputContext {
    pub layout: u32,
    pub layout_variation: u32,
    pub cursor_pos: i32,
    pub autocapital_type: u32,
    pub return_key_type: u32,
    pub return_key_disabled: bool,
    pub prediction_allow: bool,
    pub password_mode: bool,
    pub imdata_size: u32,
    pub input_hint: u32,
    pub bidi_direction: u32,
    pub language: u32,
    pub client_window: u32,
}

/// Key event record as the engine delivers it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawKeyEvent {
    pub key_code: u32,
    pub key_mask: u32,
    pub device_name: String,
    pub device_class: u32,
    pub device_subclass: u32,
}

/// Unconventional input device event record as the engine delivers it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDeviceEvent {
    pub device_type: u32,
    pub direction: u32,
    pub time_stamp: u32,
}

/// Styled-text attribute in the engine's representation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreAttribute {
    pub start: u32,
    pub length: u32,
    pub kind: u32,
    pub value: u32,
}

/// Opaque window object owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub usize);

/// Keyboard surface size for one orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowSize {
    pub width: i32,
    pub height: i32,
}

/// Position and size of the keyboard surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Receives engine notifications during a running session.
///
/// One method per engine event kind. Implemented by the shim's marshalling
/// layer; the engine calls these from its event loop, on the loop's thread.
pub trait EngineListener {
    fn on_init(&mut self);
    fn on_run(&mut self, args: &[String]);
    fn on_exit(&mut self);
    fn on_focus_in(&mut self, context_id: i32);
    fn on_focus_out(&mut self, context_id: i32);
    fn on_ise_show(&mut self, context_id: i32, degree: i32, context: &RawInputContext);
    fn on_ise_hide(&mut self, context_id: i32);
    fn on_update_cursor_position(&mut self, context_id: i32, cursor_pos: i32);
    fn on_update_surrounding_text(&mut self, context_id: i32, text: &str, cursor_pos: i32);
    /// Returns the geometry the keyboard wants; zeroed when unknown.
    fn on_get_geometry(&mut self) -> Geometry;
    fn on_set_language(&mut self, language: u32);
    fn on_set_imdata(&mut self, data: &[u8]);
    /// Returns the keyboard's application data; empty when none.
    fn on_get_imdata(&mut self) -> Vec<u8>;
    /// Returns the keyboard's input language locale, if it reports one.
    fn on_get_language_locale(&mut self, context_id: i32) -> Option<String>;
    fn on_set_return_key_type(&mut self, return_key_type: u32);
    fn on_set_return_key_disable(&mut self, disabled: bool);
    fn on_set_layout(&mut self, layout: u32);
    fn on_reset_input_context(&mut self, context_id: i32);
    /// Returns `true` when the keyboard consumed the key event.
    fn on_process_key_event(&mut self, event: &RawKeyEvent) -> bool;
    fn on_process_input_device_event(&mut self, event: &RawDeviceEvent);
    fn on_set_display_language(&mut self, language: &str);
    fn on_set_rotation_degree(&mut self, degree: i32);
    fn on_set_accessibility_state(&mut self, state: bool);
    fn on_create_option_window(&mut self, window: WindowHandle, window_type: u32);
    fn on_destroy_option_window(&mut self, window: WindowHandle);
    /// Returns `true` when an option window can currently be created.
    fn on_check_option_window_availability(&mut self) -> bool;
}

/// Operations the shim invokes on the external core.
///
/// `run` blocks for the lifetime of the session and calls back into the
/// listener for every event. Everything else is a fire-and-forget request
/// into the engine's input context.
pub trait EngineCore {
    fn run(&self, listener: &mut dyn EngineListener) -> Result<()>;
    fn forward_key_event(&self, context_id: i32, key_code: KeyCode, key_mask: KeyMask);
    fn send_key_event(&self, context_id: i32, key_code: KeyCode, key_mask: KeyMask);
    fn commit_string(&self, context_id: i32, text: &str);
    fn show_preedit_string(&self, context_id: i32);
    fn hide_preedit_string(&self, context_id: i32);
    fn update_preedit_string(&self, context_id: i32, text: &str, attributes: Vec<CoreAttribute>);
    fn request_surrounding_text(&self, maxlen_before: i32, maxlen_after: i32);
    fn delete_surrounding_text(&self, offset: i32, length: i32);
    fn set_keyboard_size_hints(&self, portrait: WindowSize, landscape: WindowSize);
    /// Returns the created option window, or `None` when creation failed.
    fn create_option_window(&self) -> Option<WindowHandle>;
    fn destroy_option_window(&self, window: WindowHandle);
    /// Returns the keyboard main window once the engine has created it.
    fn main_window(&self) -> Option<WindowHandle>;
}
