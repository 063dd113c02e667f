use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;

use inputmethod_core::engine::{
    CoreAttribute, EngineCore, EngineListener, Geometry, RawDeviceEvent, RawInputContext,
    RawKeyEvent, WindowHandle, WindowSize,
};
use inputmethod_core::privilege::{Decision, PolicyRequest, PolicyService, PolicySession};
use inputmethod_core::{
    ImeCallbacks, ImeError, InputContext, InputMethod, InputPanelLayout, KeyCode, KeyMask, Result,
    IME_PRIVILEGE,
};

/// One engine event replayed into the listener while `run` blocks.
#[allow(dead_code)]
pub enum Script {
    Init,
    Run(Vec<String>),
    Exit,
    FocusIn(i32),
    FocusOut(i32),
    Show {
        context_id: i32,
        degree: i32,
        context: RawInputContext,
    },
    Hide(i32),
    CursorPosition {
        context_id: i32,
        cursor_pos: i32,
    },
    SurroundingText {
        context_id: i32,
        text: String,
        cursor_pos: i32,
    },
    GetGeometry,
    SetLanguage(u32),
    SetImdata(Vec<u8>),
    GetImdata,
    GetLanguageLocale(i32),
    SetReturnKeyType(u32),
    SetReturnKeyDisable(bool),
    SetLayout(u32),
    ResetInputContext(i32),
    KeyEvent(RawKeyEvent),
    DeviceEvent(RawDeviceEvent),
    DisplayLanguage(String),
    RotationDegree(i32),
    AccessibilityState(bool),
    OptionWindowCreated {
        window: usize,
        window_type: u32,
    },
    OptionWindowDestroyed(usize),
    CheckOptionWindow,
}

/// Requests the shim issued against the engine.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum EngineCall {
    ForwardKey { key_code: u32, key_mask: u32 },
    SendKey { key_code: u32, key_mask: u32 },
    Commit(String),
    ShowPreedit,
    HidePreedit,
    UpdatePreedit {
        text: String,
        attributes: Vec<CoreAttribute>,
    },
    RequestSurrounding { before: i32, after: i32 },
    DeleteSurrounding { offset: i32, length: i32 },
    SetSizeHints {
        portrait: WindowSize,
        landscape: WindowSize,
    },
    CreateOptionWindow,
    DestroyOptionWindow(usize),
}

/// Answers the listener gave to the engine's query events.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum QueryResult {
    Geometry(Geometry),
    Imdata(Vec<u8>),
    Locale(Option<String>),
    KeyConsumed(bool),
    OptionWindowAvailable(bool),
}

pub struct MockEngine {
    script: RefCell<Vec<Script>>,
    pub calls: RefCell<Vec<EngineCall>>,
    pub queries: RefCell<Vec<QueryResult>>,
    pub option_window: usize,
    pub main_window_handle: usize,
    pub run_error: Option<ImeError>,
}

impl MockEngine {
    /// Queues more events for a later `run`.
    #[allow(dead_code)]
    pub fn enqueue(&self, steps: Vec<Script>) {
        self.script.borrow_mut().extend(steps);
    }

    pub fn scripted(script: Vec<Script>) -> Self {
        Self {
            script: RefCell::new(script),
            calls: RefCell::new(Vec::new()),
            queries: RefCell::new(Vec::new()),
            option_window: 40,
            main_window_handle: 10,
            run_error: None,
        }
    }
}

impl EngineCore for MockEngine {
    fn run(&self, listener: &mut dyn EngineListener) -> Result<()> {
        let script = std::mem::take(&mut *self.script.borrow_mut());
        for step in script {
            match step {
                Script::Init => listener.on_init(),
                Script::Run(args) => listener.on_run(&args),
                Script::Exit => listener.on_exit(),
                Script::FocusIn(context_id) => listener.on_focus_in(context_id),
                Script::FocusOut(context_id) => listener.on_focus_out(context_id),
                Script::Show {
                    context_id,
                    degree,
                    context,
                } => listener.on_ise_show(context_id, degree, &context),
                Script::Hide(context_id) => listener.on_ise_hide(context_id),
                Script::CursorPosition {
                    context_id,
                    cursor_pos,
                } => listener.on_update_cursor_position(context_id, cursor_pos),
                Script::SurroundingText {
                    context_id,
                    text,
                    cursor_pos,
                } => listener.on_update_surrounding_text(context_id, &text, cursor_pos),
                Script::GetGeometry => {
                    let geometry = listener.on_get_geometry();
                    self.queries.borrow_mut().push(QueryResult::Geometry(geometry));
                }
                Script::SetLanguage(language) => listener.on_set_language(language),
                Script::SetImdata(data) => listener.on_set_imdata(&data),
                Script::GetImdata => {
                    let data = listener.on_get_imdata();
                    self.queries.borrow_mut().push(QueryResult::Imdata(data));
                }
                Script::GetLanguageLocale(context_id) => {
                    let locale = listener.on_get_language_locale(context_id);
                    self.queries.borrow_mut().push(QueryResult::Locale(locale));
                }
                Script::SetReturnKeyType(kind) => listener.on_set_return_key_type(kind),
                Script::SetReturnKeyDisable(disabled) => {
                    listener.on_set_return_key_disable(disabled)
                }
                Script::SetLayout(layout) => listener.on_set_layout(layout),
                Script::ResetInputContext(context_id) => {
                    listener.on_reset_input_context(context_id)
                }
                Script::KeyEvent(event) => {
                    let consumed = listener.on_process_key_event(&event);
                    self.queries
                        .borrow_mut()
                        .push(QueryResult::KeyConsumed(consumed));
                }
                Script::DeviceEvent(event) => listener.on_process_input_device_event(&event),
                Script::DisplayLanguage(language) => listener.on_set_display_language(&language),
                Script::RotationDegree(degree) => listener.on_set_rotation_degree(degree),
                Script::AccessibilityState(state) => listener.on_set_accessibility_state(state),
                Script::OptionWindowCreated {
                    window,
                    window_type,
                } => listener.on_create_option_window(WindowHandle(window), window_type),
                Script::OptionWindowDestroyed(window) => {
                    listener.on_destroy_option_window(WindowHandle(window))
                }
                Script::CheckOptionWindow => {
                    let available = listener.on_check_option_window_availability();
                    self.queries
                        .borrow_mut()
                        .push(QueryResult::OptionWindowAvailable(available));
                }
            }
        }
        match self.run_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn forward_key_event(&self, _context_id: i32, key_code: KeyCode, key_mask: KeyMask) {
        self.calls.borrow_mut().push(EngineCall::ForwardKey {
            key_code: key_code.raw(),
            key_mask: key_mask.bits(),
        });
    }

    fn send_key_event(&self, _context_id: i32, key_code: KeyCode, key_mask: KeyMask) {
        self.calls.borrow_mut().push(EngineCall::SendKey {
            key_code: key_code.raw(),
            key_mask: key_mask.bits(),
        });
    }

    fn commit_string(&self, _context_id: i32, text: &str) {
        self.calls
            .borrow_mut()
            .push(EngineCall::Commit(text.to_string()));
    }

    fn show_preedit_string(&self, _context_id: i32) {
        self.calls.borrow_mut().push(EngineCall::ShowPreedit);
    }

    fn hide_preedit_string(&self, _context_id: i32) {
        self.calls.borrow_mut().push(EngineCall::HidePreedit);
    }

    fn update_preedit_string(&self, _context_id: i32, text: &str, attributes: Vec<CoreAttribute>) {
        self.calls.borrow_mut().push(EngineCall::UpdatePreedit {
            text: text.to_string(),
            attributes,
        });
    }

    fn request_surrounding_text(&self, maxlen_before: i32, maxlen_after: i32) {
        self.calls.borrow_mut().push(EngineCall::RequestSurrounding {
            before: maxlen_before,
            after: maxlen_after,
        });
    }

    fn delete_surrounding_text(&self, offset: i32, length: i32) {
        self.calls
            .borrow_mut()
            .push(EngineCall::DeleteSurrounding { offset, length });
    }

    fn set_keyboard_size_hints(&self, portrait: WindowSize, landscape: WindowSize) {
        self.calls
            .borrow_mut()
            .push(EngineCall::SetSizeHints { portrait, landscape });
    }

    fn create_option_window(&self) -> Option<WindowHandle> {
        self.calls.borrow_mut().push(EngineCall::CreateOptionWindow);
        if self.option_window == 0 {
            None
        } else {
            Some(WindowHandle(self.option_window))
        }
    }

    fn destroy_option_window(&self, window: WindowHandle) {
        self.calls
            .borrow_mut()
            .push(EngineCall::DestroyOptionWindow(window.0));
    }

    fn main_window(&self) -> Option<WindowHandle> {
        if self.main_window_handle == 0 {
            None
        } else {
            Some(WindowHandle(self.main_window_handle))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyMode {
    Allow,
    Deny,
    Unavailable,
}

/// Policy service whose decision can be flipped mid-test.
pub struct MockPolicy {
    pub mode: Rc<Cell<PolicyMode>>,
    pub checks: Rc<Cell<usize>>,
}

#[allow(dead_code)]
impl MockPolicy {
    pub fn allow() -> Self {
        Self::with_mode(PolicyMode::Allow)
    }

    pub fn deny() -> Self {
        Self::with_mode(PolicyMode::Deny)
    }

    pub fn unavailable() -> Self {
        Self::with_mode(PolicyMode::Unavailable)
    }

    fn with_mode(mode: PolicyMode) -> Self {
        Self {
            mode: Rc::new(Cell::new(mode)),
            checks: Rc::new(Cell::new(0)),
        }
    }
}

struct MockSession {
    allow: bool,
    checks: Rc<Cell<usize>>,
}

impl PolicySession for MockSession {
    fn check(&mut self, request: &PolicyRequest) -> Decision {
        assert_eq!(request.privilege, IME_PRIVILEGE);
        self.checks.set(self.checks.get() + 1);
        if self.allow {
            Decision::Allowed
        } else {
            Decision::Denied
        }
    }
}

impl PolicyService for MockPolicy {
    fn connect(&self) -> io::Result<Box<dyn PolicySession + '_>> {
        match self.mode.get() {
            PolicyMode::Unavailable => Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "policy service down",
            )),
            mode => Ok(Box::new(MockSession {
                allow: mode == PolicyMode::Allow,
                checks: Rc::clone(&self.checks),
            })),
        }
    }
}

/// Shim over a scripted engine with an always-allowing policy.
pub fn new_ime(script: Vec<Script>) -> InputMethod<MockEngine, MockPolicy> {
    InputMethod::new(MockEngine::scripted(script), MockPolicy::allow())
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum LifecycleEvent {
    Create,
    Terminate,
    Show(i32, InputPanelLayout),
    Hide(i32),
}

/// Lifecycle bundle that records invocations and runs an optional hook on
/// create, used to issue runtime calls from inside a session.
pub struct RecordingCallbacks {
    events: Rc<RefCell<Vec<LifecycleEvent>>>,
    create_hook: Option<Box<dyn FnMut()>>,
}

impl ImeCallbacks for RecordingCallbacks {
    fn on_create(&mut self) {
        self.events.borrow_mut().push(LifecycleEvent::Create);
        if let Some(hook) = self.create_hook.as_mut() {
            hook();
        }
    }

    fn on_terminate(&mut self) {
        self.events.borrow_mut().push(LifecycleEvent::Terminate);
    }

    fn on_show(&mut self, context_id: i32, context: &InputContext) {
        self.events
            .borrow_mut()
            .push(LifecycleEvent::Show(context_id, context.layout()));
    }

    fn on_hide(&mut self, context_id: i32) {
        self.events.borrow_mut().push(LifecycleEvent::Hide(context_id));
    }
}

pub fn recording() -> (RecordingCallbacks, Rc<RefCell<Vec<LifecycleEvent>>>) {
    let events = Rc::new(RefCell::new(Vec::new()));
    (
        RecordingCallbacks {
            events: Rc::clone(&events),
            create_hook: None,
        },
        events,
    )
}

#[allow(dead_code)]
pub fn recording_with_hook(
    hook: impl FnMut() + 'static,
) -> (RecordingCallbacks, Rc<RefCell<Vec<LifecycleEvent>>>) {
    let events = Rc::new(RefCell::new(Vec::new()));
    (
        RecordingCallbacks {
            events: Rc::clone(&events),
            create_hook: Some(Box::new(hook)),
        },
        events,
    )
}

/// An edit-field context with a few recognizable values.
#[allow(dead_code)]
pub fn sample_context() -> RawInputContext {
    RawInputContext {
        layout: 2,
        layout_variation: 1,
        cursor_pos: 5,
        autocapital_type: 1,
        return_key_type: 3,
        return_key_disabled: false,
        prediction_allow: true,
        password_mode: false,
        imdata_size: 0,
        input_hint: 2,
        bidi_direction: 1,
        language: 1,
        client_window: 77,
    }
}
