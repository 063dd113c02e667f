//! Marshalling of engine events onto the registered callbacks
//!
//! The marshaller is the [`EngineListener`] handed to the engine loop. Every
//! event either maps onto the mandatory lifecycle bundle or onto one optional
//! registry slot; events with no registered callback are dropped (queries
//! answer with their neutral value).
//!
//! Callbacks may re-enter the session's runtime calls, so a slot is taken out
//! of the registry for the duration of its invocation and put back after.
//! Registration is rejected while a session runs, which keeps the restore
//! unconditional.

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::{EngineListener, Geometry, RawDeviceEvent, RawInputContext, RawKeyEvent, WindowHandle};
use crate::registry::EventKind;
use crate::session::{ImeCallbacks, SessionState};
use crate::types::{
    DeviceClass, DeviceInfo, DeviceSubclass, InputContext, InputDeviceEvent, InputDeviceType,
    InputPanelLanguage, InputPanelLayout, KeyCode, KeyMask, OptionWindowType, ReturnKeyType,
    RotaryDirection, RotaryEvent,
};

/// Takes the slot out for the call, restores it after, and yields the
/// callback's result (or the result type's default when the slot is empty).
macro_rules! with_slot {
    ($self:ident, $slot:ident, |$cb:ident| $body:expr) => {{
        let taken = $self.state.borrow_mut().registry.$slot.take();
        match taken {
            Some(mut $cb) => {
                let out = $body;
                $self.state.borrow_mut().registry.$slot = Some($cb);
                out
            }
            None => Default::default(),
        }
    }};
}

pub(crate) struct EventMarshaller {
    state: Rc<RefCell<SessionState>>,
}

impl EventMarshaller {
    pub(crate) fn new(state: Rc<RefCell<SessionState>>) -> Self {
        Self { state }
    }

    fn with_lifecycle(&mut self, call: impl FnOnce(&mut dyn ImeCallbacks)) {
        let taken = self.state.borrow_mut().lifecycle.take();
        if let Some(mut bundle) = taken {
            call(bundle.as_mut());
            self.state.borrow_mut().lifecycle = Some(bundle);
        }
    }
}

impl EngineListener for EventMarshaller {
    fn on_init(&mut self) {
        self.with_lifecycle(|bundle| bundle.on_create());
    }

    fn on_run(&mut self, args: &[String]) {
        let taken = self.state.borrow_mut().main_entry.take();
        if let Some(mut entry) = taken {
            entry(args);
            self.state.borrow_mut().main_entry = Some(entry);
        }
    }

    fn on_exit(&mut self) {
        self.with_lifecycle(|bundle| bundle.on_terminate());
    }

    fn on_focus_in(&mut self, context_id: i32) {
        with_slot!(self, focus_in, |cb| cb(context_id))
    }

    fn on_focus_out(&mut self, context_id: i32) {
        with_slot!(self, focus_out, |cb| cb(context_id))
    }

    fn on_ise_show(&mut self, context_id: i32, _degree: i32, context: &RawInputContext) {
        let snapshot = InputContext::from_raw(context);
        self.with_lifecycle(|bundle| bundle.on_show(context_id, &snapshot));
    }

    fn on_ise_hide(&mut self, context_id: i32) {
        self.with_lifecycle(|bundle| bundle.on_hide(context_id));
    }

    fn on_update_cursor_position(&mut self, _context_id: i32, cursor_pos: i32) {
        with_slot!(self, cursor_position_updated, |cb| cb(cursor_pos))
    }

    fn on_update_surrounding_text(&mut self, context_id: i32, text: &str, cursor_pos: i32) {
        with_slot!(self, surrounding_text_updated, |cb| cb(
            context_id, text, cursor_pos
        ))
    }

    fn on_get_geometry(&mut self) -> Geometry {
        with_slot!(self, geometry_requested, |cb| cb())
    }

    fn on_set_language(&mut self, language: u32) {
        with_slot!(self, language_set, |cb| cb(InputPanelLanguage::from_raw(
            language
        )))
    }

    fn on_set_imdata(&mut self, data: &[u8]) {
        with_slot!(self, imdata_set, |cb| cb(data))
    }

    fn on_get_imdata(&mut self) -> Vec<u8> {
        with_slot!(self, imdata_requested, |cb| cb())
    }

    fn on_get_language_locale(&mut self, _context_id: i32) -> Option<String> {
        with_slot!(self, language_requested, |cb| cb())
    }

    fn on_set_return_key_type(&mut self, return_key_type: u32) {
        with_slot!(self, return_key_type_set, |cb| cb(ReturnKeyType::from_raw(
            return_key_type
        )))
    }

    fn on_set_return_key_disable(&mut self, disabled: bool) {
        with_slot!(self, return_key_state_set, |cb| cb(disabled))
    }

    fn on_set_layout(&mut self, layout: u32) {
        with_slot!(self, layout_set, |cb| cb(InputPanelLayout::from_raw(layout)))
    }

    fn on_reset_input_context(&mut self, _context_id: i32) {
        with_slot!(self, input_context_reset, |cb| cb())
    }

    fn on_process_key_event(&mut self, event: &RawKeyEvent) -> bool {
        let device = DeviceInfo::new(
            event.device_name.clone(),
            DeviceClass::from_raw(event.device_class),
            DeviceSubclass::from_raw(event.device_subclass),
        );
        with_slot!(self, process_key_event, |cb| cb(
            KeyCode::from_raw(event.key_code),
            KeyMask::from_bits_truncate(event.key_mask),
            &device
        ))
    }

    fn on_process_input_device_event(&mut self, event: &RawDeviceEvent) {
        let decoded = if event.device_type == InputDeviceType::Rotary as u32 {
            InputDeviceEvent::Rotary(RotaryEvent::new(
                RotaryDirection::from_raw(event.direction),
                event.time_stamp,
            ))
        } else {
            InputDeviceEvent::Unknown
        };
        with_slot!(self, process_input_device_event, |cb| cb(
            decoded.device_type(),
            &decoded
        ))
    }

    fn on_set_display_language(&mut self, language: &str) {
        with_slot!(self, display_language_changed, |cb| cb(language))
    }

    fn on_set_rotation_degree(&mut self, degree: i32) {
        with_slot!(self, rotation_degree_changed, |cb| cb(degree))
    }

    fn on_set_accessibility_state(&mut self, state: bool) {
        with_slot!(self, accessibility_state_changed, |cb| cb(state))
    }

    fn on_create_option_window(&mut self, window: WindowHandle, window_type: u32) {
        with_slot!(self, option_window_created, |cb| cb(
            window,
            OptionWindowType::from_raw(window_type)
        ))
    }

    fn on_destroy_option_window(&mut self, window: WindowHandle) {
        with_slot!(self, option_window_destroyed, |cb| cb(window))
    }

    fn on_check_option_window_availability(&mut self) -> bool {
        self.state.borrow().registry.is_set(EventKind::OptionWindowCreated)
    }
}
