//! Session lifecycle and the public entry surface
//!
//! [`InputMethod`] is the session context object the hosting keyboard owns:
//! it carries the callback registry and the running flag, gates every
//! privileged operation through the policy service, and drives the engine's
//! blocking loop. There is exactly one state transition, idle -> running ->
//! idle, and all registrations are wiped when a session ends.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

use crate::engine::{CoreAttribute, EngineCore, Geometry, WindowHandle, WindowSize};
use crate::error::{ImeError, Result};
use crate::marshal::EventMarshaller;
use crate::preedit::convert_attributes;
use crate::privilege::{Authorization, PolicyService, PrivilegeGate};
use crate::registry::{CallbackRegistry, EventKind};
use crate::types::{
    DeviceInfo, InputContext, InputDeviceEvent, InputDeviceType, InputPanelLanguage,
    InputPanelLayout, KeyCode, KeyMask, OptionWindowType, PreeditAttribute, ReturnKeyType,
};

/// Mandatory lifecycle callbacks every keyboard must provide to `run`.
pub trait ImeCallbacks {
    /// The input panel was created; build the keyboard UI here.
    fn on_create(&mut self);
    /// The input panel is being terminated.
    fn on_terminate(&mut self);
    /// An edit field asked the panel to show itself.
    fn on_show(&mut self, context_id: i32, context: &InputContext);
    /// An edit field asked the panel to hide itself.
    fn on_hide(&mut self, context_id: i32);
}

/// Shared per-process session state.
pub(crate) struct SessionState {
    pub(crate) running: bool,
    pub(crate) registry: CallbackRegistry,
    pub(crate) lifecycle: Option<Box<dyn ImeCallbacks>>,
    pub(crate) main_entry: Option<Box<dyn FnMut(&[String])>>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            running: false,
            registry: CallbackRegistry::default(),
            lifecycle: None,
            main_entry: None,
        }
    }
}

/// Entry shim handle.
///
/// Clones share the same session; all use is single-threaded, driven by the
/// engine's event loop.
pub struct InputMethod<E: EngineCore, P: PolicyService> {
    engine: Rc<E>,
    policy: Rc<P>,
    state: Rc<RefCell<SessionState>>,
}

impl<E: EngineCore, P: PolicyService> Clone for InputMethod<E, P> {
    fn clone(&self) -> Self {
        Self {
            engine: Rc::clone(&self.engine),
            policy: Rc::clone(&self.policy),
            state: Rc::clone(&self.state),
        }
    }
}

impl<E: EngineCore, P: PolicyService> InputMethod<E, P> {
    pub fn new(engine: E, policy: P) -> Self {
        Self {
            engine: Rc::new(engine),
            policy: Rc::new(policy),
            state: Rc::new(RefCell::new(SessionState::new())),
        }
    }

    /// The wrapped engine core.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Whether a session is currently running.
    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// Entry function invoked with the process argument vector when the
    /// engine loop starts. Survives session end, unlike event callbacks.
    pub fn set_main_entry(&self, entry: impl FnMut(&[String]) + 'static) {
        self.state.borrow_mut().main_entry = Some(Box::new(entry));
    }

    // --- lifecycle ---------------------------------------------------------

    /// Runs the keyboard's main loop; blocks until the engine loop exits.
    ///
    /// The `on_create` callback fires before the loop accepts events and
    /// `on_terminate` fires when the loop is asked to stop. Whatever way the
    /// loop exits, every registration and the stored bundle are cleared
    /// before this returns.
    pub fn run(&self, callbacks: impl ImeCallbacks + 'static) -> Result<()> {
        self.run_session(
            || Ok(()),
            move || Ok(Box::new(callbacks) as Box<dyn ImeCallbacks>),
        )
    }

    /// Staged run used by both the Rust and the C surface.
    ///
    /// Check order is part of the contract: re-entrancy, argument
    /// validation, privilege, then mandatory-callback verification. A
    /// verification failure clears all previous registrations.
    pub(crate) fn run_session(
        &self,
        validate: impl FnOnce() -> Result<()>,
        build: impl FnOnce() -> Result<Box<dyn ImeCallbacks>>,
    ) -> Result<()> {
        if self.state.borrow().running {
            warn!("run rejected: session already running");
            return Err(ImeError::OperationFailed);
        }
        validate()?;
        self.authorize()?;
        let bundle = match build() {
            Ok(bundle) => bundle,
            Err(err) => {
                self.state.borrow_mut().registry.clear();
                return Err(err);
            }
        };
        {
            let mut state = self.state.borrow_mut();
            state.lifecycle = Some(bundle);
            state.running = true;
        }
        debug!("input method session started");

        let mut marshaller = EventMarshaller::new(Rc::clone(&self.state));
        let result = self.engine.run(&mut marshaller);

        let mut state = self.state.borrow_mut();
        state.registry.clear();
        state.lifecycle = None;
        state.running = false;
        debug!("input method session ended");
        result
    }

    // --- registration ------------------------------------------------------

    /// Clears one optional callback slot. Rejected while running.
    pub fn unset_event_cb(&self, kind: EventKind) -> Result<()> {
        self.register(|registry| registry.unset(kind))
    }

    pub fn set_focus_in_cb(&self, cb: impl FnMut(i32) + 'static) -> Result<()> {
        self.register(|r| r.focus_in = Some(Box::new(cb)))
    }

    pub fn set_focus_out_cb(&self, cb: impl FnMut(i32) + 'static) -> Result<()> {
        self.register(|r| r.focus_out = Some(Box::new(cb)))
    }

    pub fn set_surrounding_text_updated_cb(
        &self,
        cb: impl FnMut(i32, &str, i32) + 'static,
    ) -> Result<()> {
        self.register(|r| r.surrounding_text_updated = Some(Box::new(cb)))
    }

    pub fn set_input_context_reset_cb(&self, cb: impl FnMut() + 'static) -> Result<()> {
        self.register(|r| r.input_context_reset = Some(Box::new(cb)))
    }

    pub fn set_cursor_position_updated_cb(&self, cb: impl FnMut(i32) + 'static) -> Result<()> {
        self.register(|r| r.cursor_position_updated = Some(Box::new(cb)))
    }

    pub fn set_language_requested_cb(
        &self,
        cb: impl FnMut() -> Option<String> + 'static,
    ) -> Result<()> {
        self.register(|r| r.language_requested = Some(Box::new(cb)))
    }

    pub fn set_language_set_cb(&self, cb: impl FnMut(InputPanelLanguage) + 'static) -> Result<()> {
        self.register(|r| r.language_set = Some(Box::new(cb)))
    }

    pub fn set_imdata_set_cb(&self, cb: impl FnMut(&[u8]) + 'static) -> Result<()> {
        self.register(|r| r.imdata_set = Some(Box::new(cb)))
    }

    pub fn set_imdata_requested_cb(&self, cb: impl FnMut() -> Vec<u8> + 'static) -> Result<()> {
        self.register(|r| r.imdata_requested = Some(Box::new(cb)))
    }

    pub fn set_layout_set_cb(&self, cb: impl FnMut(InputPanelLayout) + 'static) -> Result<()> {
        self.register(|r| r.layout_set = Some(Box::new(cb)))
    }

    pub fn set_return_key_type_set_cb(
        &self,
        cb: impl FnMut(ReturnKeyType) + 'static,
    ) -> Result<()> {
        self.register(|r| r.return_key_type_set = Some(Box::new(cb)))
    }

    pub fn set_return_key_state_set_cb(&self, cb: impl FnMut(bool) + 'static) -> Result<()> {
        self.register(|r| r.return_key_state_set = Some(Box::new(cb)))
    }

    pub fn set_geometry_requested_cb(&self, cb: impl FnMut() -> Geometry + 'static) -> Result<()> {
        self.register(|r| r.geometry_requested = Some(Box::new(cb)))
    }

    pub fn set_process_key_event_cb(
        &self,
        cb: impl FnMut(KeyCode, KeyMask, &DeviceInfo) -> bool + 'static,
    ) -> Result<()> {
        self.register(|r| r.process_key_event = Some(Box::new(cb)))
    }

    pub fn set_display_language_changed_cb(&self, cb: impl FnMut(&str) + 'static) -> Result<()> {
        self.register(|r| r.display_language_changed = Some(Box::new(cb)))
    }

    pub fn set_rotation_degree_changed_cb(&self, cb: impl FnMut(i32) + 'static) -> Result<()> {
        self.register(|r| r.rotation_degree_changed = Some(Box::new(cb)))
    }

    pub fn set_accessibility_state_changed_cb(&self, cb: impl FnMut(bool) + 'static) -> Result<()> {
        self.register(|r| r.accessibility_state_changed = Some(Box::new(cb)))
    }

    pub fn set_option_window_created_cb(
        &self,
        cb: impl FnMut(WindowHandle, OptionWindowType) + 'static,
    ) -> Result<()> {
        self.register(|r| r.option_window_created = Some(Box::new(cb)))
    }

    pub fn set_option_window_destroyed_cb(
        &self,
        cb: impl FnMut(WindowHandle) + 'static,
    ) -> Result<()> {
        self.register(|r| r.option_window_destroyed = Some(Box::new(cb)))
    }

    pub fn set_process_input_device_event_cb(
        &self,
        cb: impl FnMut(InputDeviceType, &InputDeviceEvent) + 'static,
    ) -> Result<()> {
        self.register(|r| r.process_input_device_event = Some(Box::new(cb)))
    }

    // --- privileged runtime calls ------------------------------------------

    /// Sends a key event to the focused edit field. `forward` replays the
    /// event to the client application instead of synthesizing one.
    pub fn send_key_event(&self, key_code: KeyCode, key_mask: KeyMask, forward: bool) -> Result<()> {
        self.ensure_running()?;
        self.authorize()?;
        if forward {
            self.engine.forward_key_event(-1, key_code, key_mask);
        } else {
            self.engine.send_key_event(-1, key_code, key_mask);
        }
        Ok(())
    }

    /// Commits text to the focused edit field.
    pub fn commit_string(&self, text: &str) -> Result<()> {
        self.ensure_running()?;
        self.authorize()?;
        self.engine.commit_string(-1, text);
        Ok(())
    }

    pub fn show_preedit_string(&self) -> Result<()> {
        self.ensure_running()?;
        self.authorize()?;
        self.engine.show_preedit_string(-1);
        Ok(())
    }

    pub fn hide_preedit_string(&self) -> Result<()> {
        self.ensure_running()?;
        self.authorize()?;
        self.engine.hide_preedit_string(-1);
        Ok(())
    }

    /// Replaces the preedit string, consuming the attribute list.
    pub fn update_preedit_string(
        &self,
        text: &str,
        attributes: Vec<PreeditAttribute>,
    ) -> Result<()> {
        self.ensure_running()?;
        self.authorize()?;
        let attributes: Vec<CoreAttribute> = convert_attributes(attributes);
        self.engine.update_preedit_string(-1, text, attributes);
        Ok(())
    }

    /// Asks for the text around the cursor; the reply arrives through the
    /// surrounding-text-updated callback, which must be registered.
    pub fn request_surrounding_text(&self, maxlen_before: i32, maxlen_after: i32) -> Result<()> {
        self.ensure_running()?;
        self.authorize()?;
        if !self.state.borrow().registry.is_set(EventKind::SurroundingTextUpdated) {
            return Err(ImeError::NoCallbackFunction);
        }
        self.engine.request_surrounding_text(maxlen_before, maxlen_after);
        Ok(())
    }

    /// Deletes `length` characters starting `offset` characters from the
    /// cursor.
    pub fn delete_surrounding_text(&self, offset: i32, length: i32) -> Result<()> {
        self.ensure_running()?;
        self.authorize()?;
        if length <= 0 {
            return Err(ImeError::InvalidParameter);
        }
        self.engine.delete_surrounding_text(offset, length);
        Ok(())
    }

    /// Updates the keyboard surface size hints for both orientations.
    pub fn set_size(
        &self,
        portrait_width: i32,
        portrait_height: i32,
        landscape_width: i32,
        landscape_height: i32,
    ) -> Result<()> {
        self.ensure_running()?;
        self.authorize()?;
        self.engine.set_keyboard_size_hints(
            WindowSize {
                width: portrait_width,
                height: portrait_height,
            },
            WindowSize {
                width: landscape_width,
                height: landscape_height,
            },
        );
        Ok(())
    }

    /// Asks the engine to open the option window. Both option-window
    /// callbacks must be registered; the created callback fires through the
    /// engine's notification path.
    pub fn create_option_window(&self) -> Result<WindowHandle> {
        self.ensure_running()?;
        self.authorize()?;
        {
            let registry = &self.state.borrow().registry;
            if !registry.is_set(EventKind::OptionWindowCreated)
                || !registry.is_set(EventKind::OptionWindowDestroyed)
            {
                return Err(ImeError::NoCallbackFunction);
            }
        }
        match self.engine.create_option_window() {
            Some(window) => Ok(window),
            None => {
                warn!("engine failed to create option window");
                Err(ImeError::OperationFailed)
            }
        }
    }

    /// Asks the engine to close an option window.
    pub fn destroy_option_window(&self, window: WindowHandle) -> Result<()> {
        self.ensure_running()?;
        self.authorize()?;
        {
            let registry = &self.state.borrow().registry;
            if !registry.is_set(EventKind::OptionWindowCreated)
                || !registry.is_set(EventKind::OptionWindowDestroyed)
            {
                return Err(ImeError::NoCallbackFunction);
            }
        }
        self.engine.destroy_option_window(window);
        Ok(())
    }

    /// The keyboard's main window, once the engine has created it.
    pub fn main_window(&self) -> Result<WindowHandle> {
        self.ensure_running()?;
        self.authorize()?;
        self.engine.main_window().ok_or(ImeError::OperationFailed)
    }

    // --- guards ------------------------------------------------------------

    fn register(&self, apply: impl FnOnce(&mut CallbackRegistry)) -> Result<()> {
        self.authorize()?;
        let mut state = self.state.borrow_mut();
        if state.running {
            warn!("callback registration rejected while session is running");
            return Err(ImeError::OperationFailed);
        }
        apply(&mut state.registry);
        Ok(())
    }

    fn ensure_running(&self) -> Result<()> {
        if self.state.borrow().running {
            Ok(())
        } else {
            Err(ImeError::NotRunning)
        }
    }

    /// Per-call privilege gate; denial and service outage both fail closed.
    pub(crate) fn authorize(&self) -> Result<()> {
        match PrivilegeGate::authorize(self.policy.as_ref()) {
            Authorization::Granted => Ok(()),
            Authorization::Denied | Authorization::ServiceUnavailable => {
                Err(ImeError::PermissionDenied)
            }
        }
    }

    /// Combined guard for the C context and device accessors.
    pub(crate) fn guard_accessor(&self) -> Result<()> {
        self.ensure_running()?;
        self.authorize()
    }
}
