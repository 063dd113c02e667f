//! C function-call surface
//!
//! The embedder supplies the engine and the policy service as vtables of
//! function pointers, gets back an opaque shim handle, and drives the whole
//! API through `ime_*` calls against that handle. Ownership rules follow the
//! usual pattern: everything returned as a pointer is owned by the shim
//! except strings, which are malloc'd copies released with
//! [`ime_free_string`].
//!
//! All status-returning functions yield `0` on success and a negative
//! [`ImeError`] code on failure. The two pointer-returning functions stash
//! their status in a per-handle last-error slot read via
//! [`ime_get_last_error`].

use std::cell::Cell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};
use std::slice;

use crate::engine::{
    CoreAttribute, EngineCore, EngineListener, Geometry, RawDeviceEvent, RawInputContext,
    RawKeyEvent, WindowHandle, WindowSize,
};
use crate::error::{ImeError, Result, IME_ERROR_NONE};
use crate::privilege::{Decision, PolicyService, PolicySession};
use crate::registry::EventKind;
use crate::session::{ImeCallbacks, InputMethod};
use crate::types::{
    AttributeKind, DeviceInfo, FontStyle, InputContext, InputDeviceEvent, KeyCode, KeyMask,
    PreeditAttribute,
};

// --- embedder-supplied vtables ---------------------------------------------

/// Edit-field attribute record in the C layout, as delivered with a show
/// event.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ImeRawInputContext {
    pub layout: u32,
    pub layout_variation: u32,
    pub cursor_pos: c_int,
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

/// Key event record in the C layout.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ImeRawKeyEvent {
    pub key_code: u32,
    pub key_mask: u32,
    pub device_name: *const c_char,
    pub device_class: u32,
    pub device_subclass: u32,
}

/// Unconventional input device event record in the C layout.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ImeRawDeviceEvent {
    pub device_type: u32,
    pub direction: u32,
    pub time_stamp: u32,
}

/// Preedit attribute record in the C layout.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ImePreeditAttribute {
    pub start: u32,
    pub length: u32,
    pub kind: u32,
    pub value: u32,
}

/// Listener vtable the shim hands to the engine's `run`.
///
/// The engine calls each entry with `ctx` as the first argument for the
/// duration of the loop; both the table and `ctx` are invalid once `run`
/// returns.
#[repr(C)]
pub struct ImeListenerVtable {
    pub ctx: *mut c_void,
    pub on_init: unsafe extern "C" fn(ctx: *mut c_void),
    pub on_run: unsafe extern "C" fn(ctx: *mut c_void, argc: c_int, argv: *const *const c_char),
    pub on_exit: unsafe extern "C" fn(ctx: *mut c_void),
    pub on_focus_in: unsafe extern "C" fn(ctx: *mut c_void, context_id: c_int),
    pub on_focus_out: unsafe extern "C" fn(ctx: *mut c_void, context_id: c_int),
    pub on_ise_show: unsafe extern "C" fn(
        ctx: *mut c_void,
        context_id: c_int,
        degree: c_int,
        context: *const ImeRawInputContext,
    ),
    pub on_ise_hide: unsafe extern "C" fn(ctx: *mut c_void, context_id: c_int),
    pub on_update_cursor_position:
        unsafe extern "C" fn(ctx: *mut c_void, context_id: c_int, cursor_pos: c_int),
    pub on_update_surrounding_text: unsafe extern "C" fn(
        ctx: *mut c_void,
        context_id: c_int,
        text: *const c_char,
        cursor_pos: c_int,
    ),
    pub on_get_geometry: unsafe extern "C" fn(
        ctx: *mut c_void,
        x: *mut c_int,
        y: *mut c_int,
        width: *mut c_int,
        height: *mut c_int,
    ),
    pub on_set_language: unsafe extern "C" fn(ctx: *mut c_void, language: u32),
    pub on_set_imdata: unsafe extern "C" fn(ctx: *mut c_void, data: *const u8, length: u32),
    /// Copies up to `capacity` bytes of application data into `buffer` and
    /// returns the number of bytes written.
    pub on_get_imdata:
        unsafe extern "C" fn(ctx: *mut c_void, buffer: *mut u8, capacity: u32) -> u32,
    /// Returns a malloc'd locale string (release with `ime_free_string`), or
    /// null when the keyboard reports none.
    pub on_get_language_locale:
        unsafe extern "C" fn(ctx: *mut c_void, context_id: c_int) -> *mut c_char,
    pub on_set_return_key_type: unsafe extern "C" fn(ctx: *mut c_void, return_key_type: u32),
    pub on_set_return_key_disable: unsafe extern "C" fn(ctx: *mut c_void, disabled: bool),
    pub on_set_layout: unsafe extern "C" fn(ctx: *mut c_void, layout: u32),
    pub on_reset_input_context: unsafe extern "C" fn(ctx: *mut c_void, context_id: c_int),
    pub on_process_key_event:
        unsafe extern "C" fn(ctx: *mut c_void, event: *const ImeRawKeyEvent) -> bool,
    pub on_process_input_device_event:
        unsafe extern "C" fn(ctx: *mut c_void, event: *const ImeRawDeviceEvent),
    pub on_set_display_language: unsafe extern "C" fn(ctx: *mut c_void, language: *const c_char),
    pub on_set_rotation_degree: unsafe extern "C" fn(ctx: *mut c_void, degree: c_int),
    pub on_set_accessibility_state: unsafe extern "C" fn(ctx: *mut c_void, state: bool),
    pub on_create_option_window:
        unsafe extern "C" fn(ctx: *mut c_void, window: usize, window_type: u32),
    pub on_destroy_option_window: unsafe extern "C" fn(ctx: *mut c_void, window: usize),
    pub on_check_option_window_availability: unsafe extern "C" fn(ctx: *mut c_void) -> bool,
}

/// Engine vtable supplied by the embedder.
///
/// Every entry is required. `run` must block for the session lifetime and
/// report events through the listener table; a zero return means the loop
/// exited cleanly. Window handles are engine-defined nonzero values; `0`
/// signals absence or failure.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ImeEngineOps {
    pub engine: *mut c_void,
    pub run:
        unsafe extern "C" fn(engine: *mut c_void, listener: *const ImeListenerVtable) -> c_int,
    pub forward_key_event:
        unsafe extern "C" fn(engine: *mut c_void, context_id: c_int, key_code: u32, key_mask: u32),
    pub send_key_event:
        unsafe extern "C" fn(engine: *mut c_void, context_id: c_int, key_code: u32, key_mask: u32),
    pub commit_string:
        unsafe extern "C" fn(engine: *mut c_void, context_id: c_int, text: *const c_char),
    pub show_preedit: unsafe extern "C" fn(engine: *mut c_void, context_id: c_int),
    pub hide_preedit: unsafe extern "C" fn(engine: *mut c_void, context_id: c_int),
    pub update_preedit: unsafe extern "C" fn(
        engine: *mut c_void,
        context_id: c_int,
        text: *const c_char,
        attributes: *const CoreAttribute,
        attribute_count: usize,
    ),
    pub request_surrounding_text:
        unsafe extern "C" fn(engine: *mut c_void, maxlen_before: c_int, maxlen_after: c_int),
    pub delete_surrounding_text:
        unsafe extern "C" fn(engine: *mut c_void, offset: c_int, length: c_int),
    pub set_size_hints: unsafe extern "C" fn(
        engine: *mut c_void,
        portrait_width: c_int,
        portrait_height: c_int,
        landscape_width: c_int,
        landscape_height: c_int,
    ),
    pub create_option_window: unsafe extern "C" fn(engine: *mut c_void) -> usize,
    pub destroy_option_window: unsafe extern "C" fn(engine: *mut c_void, window: usize),
    pub main_window: unsafe extern "C" fn(engine: *mut c_void) -> usize,
}

/// Decision returned by [`ImePolicyOps::check`]: access granted.
pub const IME_POLICY_ALLOWED: c_int = 1;
/// Decision returned by [`ImePolicyOps::check`]: access denied.
pub const IME_POLICY_DENIED: c_int = 0;

/// Policy service vtable supplied by the embedder.
///
/// `check` receives the caller identity and the privilege string and returns
/// [`IME_POLICY_ALLOWED`], [`IME_POLICY_DENIED`], or a negative value when
/// the service is unreachable. A missing `check` entry counts as
/// unreachable; both fail closed.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ImePolicyOps {
    pub policy: *mut c_void,
    pub check: Option<
        unsafe extern "C" fn(
            policy: *mut c_void,
            client: *const c_char,
            session: *const c_char,
            user: *const c_char,
            privilege: *const c_char,
        ) -> c_int,
    >,
}

// --- vtable adapters -------------------------------------------------------

struct ListenerCtx<'a> {
    listener: &'a mut dyn EngineListener,
}

unsafe fn listener<'a>(ctx: *mut c_void) -> &'a mut dyn EngineListener {
    (*(ctx as *mut ListenerCtx)).listener
}

unsafe fn cstr_or_empty<'a>(text: *const c_char) -> std::borrow::Cow<'a, str> {
    if text.is_null() {
        std::borrow::Cow::Borrowed("")
    } else {
        CStr::from_ptr(text).to_string_lossy()
    }
}

unsafe extern "C" fn listener_on_init(ctx: *mut c_void) {
    listener(ctx).on_init();
}

unsafe extern "C" fn listener_on_run(ctx: *mut c_void, argc: c_int, argv: *const *const c_char) {
    let mut args = Vec::new();
    if !argv.is_null() {
        for i in 0..argc.max(0) as usize {
            let arg = *argv.add(i);
            args.push(cstr_or_empty(arg).into_owned());
        }
    }
    listener(ctx).on_run(&args);
}

unsafe extern "C" fn listener_on_exit(ctx: *mut c_void) {
    listener(ctx).on_exit();
}

unsafe extern "C" fn listener_on_focus_in(ctx: *mut c_void, context_id: c_int) {
    listener(ctx).on_focus_in(context_id);
}

unsafe extern "C" fn listener_on_focus_out(ctx: *mut c_void, context_id: c_int) {
    listener(ctx).on_focus_out(context_id);
}

unsafe extern "C" fn listener_on_ise_show(
    ctx: *mut c_void,
    context_id: c_int,
    degree: c_int,
    context: *const ImeRawInputContext,
) {
    // A null context still shows the panel, with every field defaulted.
    let raw = if context.is_null() {
        RawInputContext::default()
    } else {
        let c = &*context;
        RawInputContext {
            layout: c.layout,
            layout_variation: c.layout_variation,
            cursor_pos: c.cursor_pos,
            autocapital_type: c.autocapital_type,
            return_key_type: c.return_key_type,
            return_key_disabled: c.return_key_disabled,
            prediction_allow: c.prediction_allow,
            password_mode: c.password_mode,
            imdata_size: c.imdata_size,
            input_hint: c.input_hint,
            bidi_direction: c.bidi_direction,
            language: c.language,
            client_window: c.client_window,
        }
    };
    listener(ctx).on_ise_show(context_id, degree, &raw);
}

unsafe extern "C" fn listener_on_ise_hide(ctx: *mut c_void, context_id: c_int) {
    listener(ctx).on_ise_hide(context_id);
}

unsafe extern "C" fn listener_on_update_cursor_position(
    ctx: *mut c_void,
    context_id: c_int,
    cursor_pos: c_int,
) {
    listener(ctx).on_update_cursor_position(context_id, cursor_pos);
}

unsafe extern "C" fn listener_on_update_surrounding_text(
    ctx: *mut c_void,
    context_id: c_int,
    text: *const c_char,
    cursor_pos: c_int,
) {
    let text = cstr_or_empty(text);
    listener(ctx).on_update_surrounding_text(context_id, &text, cursor_pos);
}

unsafe extern "C" fn listener_on_get_geometry(
    ctx: *mut c_void,
    x: *mut c_int,
    y: *mut c_int,
    width: *mut c_int,
    height: *mut c_int,
) {
    let geometry = listener(ctx).on_get_geometry();
    if !x.is_null() {
        *x = geometry.x;
    }
    if !y.is_null() {
        *y = geometry.y;
    }
    if !width.is_null() {
        *width = geometry.width;
    }
    if !height.is_null() {
        *height = geometry.height;
    }
}

unsafe extern "C" fn listener_on_set_language(ctx: *mut c_void, language: u32) {
    listener(ctx).on_set_language(language);
}

unsafe extern "C" fn listener_on_set_imdata(ctx: *mut c_void, data: *const u8, length: u32) {
    let data = if data.is_null() || length == 0 {
        &[][..]
    } else {
        slice::from_raw_parts(data, length as usize)
    };
    listener(ctx).on_set_imdata(data);
}

unsafe extern "C" fn listener_on_get_imdata(
    ctx: *mut c_void,
    buffer: *mut u8,
    capacity: u32,
) -> u32 {
    let data = listener(ctx).on_get_imdata();
    if buffer.is_null() {
        return 0;
    }
    let n = data.len().min(capacity as usize);
    std::ptr::copy_nonoverlapping(data.as_ptr(), buffer, n);
    n as u32
}

unsafe extern "C" fn listener_on_get_language_locale(
    ctx: *mut c_void,
    context_id: c_int,
) -> *mut c_char {
    match listener(ctx).on_get_language_locale(context_id) {
        Some(locale) => match CString::new(locale) {
            Ok(locale) => locale.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        None => std::ptr::null_mut(),
    }
}

unsafe extern "C" fn listener_on_set_return_key_type(ctx: *mut c_void, return_key_type: u32) {
    listener(ctx).on_set_return_key_type(return_key_type);
}

unsafe extern "C" fn listener_on_set_return_key_disable(ctx: *mut c_void, disabled: bool) {
    listener(ctx).on_set_return_key_disable(disabled);
}

unsafe extern "C" fn listener_on_set_layout(ctx: *mut c_void, layout: u32) {
    listener(ctx).on_set_layout(layout);
}

unsafe extern "C" fn listener_on_reset_input_context(ctx: *mut c_void, context_id: c_int) {
    listener(ctx).on_reset_input_context(context_id);
}

unsafe extern "C" fn listener_on_process_key_event(
    ctx: *mut c_void,
    event: *const ImeRawKeyEvent,
) -> bool {
    if event.is_null() {
        return false;
    }
    let raw = &*event;
    let event = RawKeyEvent {
        key_code: raw.key_code,
        key_mask: raw.key_mask,
        device_name: cstr_or_empty(raw.device_name).into_owned(),
        device_class: raw.device_class,
        device_subclass: raw.device_subclass,
    };
    listener(ctx).on_process_key_event(&event)
}

unsafe extern "C" fn listener_on_process_input_device_event(
    ctx: *mut c_void,
    event: *const ImeRawDeviceEvent,
) {
    if event.is_null() {
        return;
    }
    let raw = &*event;
    listener(ctx).on_process_input_device_event(&RawDeviceEvent {
        device_type: raw.device_type,
        direction: raw.direction,
        time_stamp: raw.time_stamp,
    });
}

unsafe extern "C" fn listener_on_set_display_language(ctx: *mut c_void, language: *const c_char) {
    let language = cstr_or_empty(language);
    listener(ctx).on_set_display_language(&language);
}

unsafe extern "C" fn listener_on_set_rotation_degree(ctx: *mut c_void, degree: c_int) {
    listener(ctx).on_set_rotation_degree(degree);
}

unsafe extern "C" fn listener_on_set_accessibility_state(ctx: *mut c_void, state: bool) {
    listener(ctx).on_set_accessibility_state(state);
}

unsafe extern "C" fn listener_on_create_option_window(
    ctx: *mut c_void,
    window: usize,
    window_type: u32,
) {
    listener(ctx).on_create_option_window(WindowHandle(window), window_type);
}

unsafe extern "C" fn listener_on_destroy_option_window(ctx: *mut c_void, window: usize) {
    listener(ctx).on_destroy_option_window(WindowHandle(window));
}

unsafe extern "C" fn listener_on_check_option_window_availability(ctx: *mut c_void) -> bool {
    listener(ctx).on_check_option_window_availability()
}

/// [`EngineCore`] over an embedder vtable.
pub struct ExternEngine {
    ops: ImeEngineOps,
}

impl EngineCore for ExternEngine {
    fn run(&self, listener: &mut dyn EngineListener) -> Result<()> {
        let mut ctx = ListenerCtx { listener };
        let vtable = ImeListenerVtable {
            ctx: &mut ctx as *mut ListenerCtx as *mut c_void,
            on_init: listener_on_init,
            on_run: listener_on_run,
            on_exit: listener_on_exit,
            on_focus_in: listener_on_focus_in,
            on_focus_out: listener_on_focus_out,
            on_ise_show: listener_on_ise_show,
            on_ise_hide: listener_on_ise_hide,
            on_update_cursor_position: listener_on_update_cursor_position,
            on_update_surrounding_text: listener_on_update_surrounding_text,
            on_get_geometry: listener_on_get_geometry,
            on_set_language: listener_on_set_language,
            on_set_imdata: listener_on_set_imdata,
            on_get_imdata: listener_on_get_imdata,
            on_get_language_locale: listener_on_get_language_locale,
            on_set_return_key_type: listener_on_set_return_key_type,
            on_set_return_key_disable: listener_on_set_return_key_disable,
            on_set_layout: listener_on_set_layout,
            on_reset_input_context: listener_on_reset_input_context,
            on_process_key_event: listener_on_process_key_event,
            on_process_input_device_event: listener_on_process_input_device_event,
            on_set_display_language: listener_on_set_display_language,
            on_set_rotation_degree: listener_on_set_rotation_degree,
            on_set_accessibility_state: listener_on_set_accessibility_state,
            on_create_option_window: listener_on_create_option_window,
            on_destroy_option_window: listener_on_destroy_option_window,
            on_check_option_window_availability: listener_on_check_option_window_availability,
        };
        let status = unsafe { (self.ops.run)(self.ops.engine, &vtable) };
        if status == 0 {
            Ok(())
        } else {
            Err(ImeError::OperationFailed)
        }
    }

    fn forward_key_event(&self, context_id: i32, key_code: KeyCode, key_mask: KeyMask) {
        unsafe {
            (self.ops.forward_key_event)(
                self.ops.engine,
                context_id,
                key_code.raw(),
                key_mask.bits(),
            )
        }
    }

    fn send_key_event(&self, context_id: i32, key_code: KeyCode, key_mask: KeyMask) {
        unsafe {
            (self.ops.send_key_event)(self.ops.engine, context_id, key_code.raw(), key_mask.bits())
        }
    }

    fn commit_string(&self, context_id: i32, text: &str) {
        if let Ok(text) = CString::new(text) {
            unsafe { (self.ops.commit_string)(self.ops.engine, context_id, text.as_ptr()) }
        }
    }

    fn show_preedit_string(&self, context_id: i32) {
        unsafe { (self.ops.show_preedit)(self.ops.engine, context_id) }
    }

    fn hide_preedit_string(&self, context_id: i32) {
        unsafe { (self.ops.hide_preedit)(self.ops.engine, context_id) }
    }

    fn update_preedit_string(&self, context_id: i32, text: &str, attributes: Vec<CoreAttribute>) {
        if let Ok(text) = CString::new(text) {
            unsafe {
                (self.ops.update_preedit)(
                    self.ops.engine,
                    context_id,
                    text.as_ptr(),
                    attributes.as_ptr(),
                    attributes.len(),
                )
            }
        }
    }

    fn request_surrounding_text(&self, maxlen_before: i32, maxlen_after: i32) {
        unsafe { (self.ops.request_surrounding_text)(self.ops.engine, maxlen_before, maxlen_after) }
    }

    fn delete_surrounding_text(&self, offset: i32, length: i32) {
        unsafe { (self.ops.delete_surrounding_text)(self.ops.engine, offset, length) }
    }

    fn set_keyboard_size_hints(&self, portrait: WindowSize, landscape: WindowSize) {
        unsafe {
            (self.ops.set_size_hints)(
                self.ops.engine,
                portrait.width,
                portrait.height,
                landscape.width,
                landscape.height,
            )
        }
    }

    fn create_option_window(&self) -> Option<WindowHandle> {
        let window = unsafe { (self.ops.create_option_window)(self.ops.engine) };
        if window == 0 {
            None
        } else {
            Some(WindowHandle(window))
        }
    }

    fn destroy_option_window(&self, window: WindowHandle) {
        unsafe { (self.ops.destroy_option_window)(self.ops.engine, window.0) }
    }

    fn main_window(&self) -> Option<WindowHandle> {
        let window = unsafe { (self.ops.main_window)(self.ops.engine) };
        if window == 0 {
            None
        } else {
            Some(WindowHandle(window))
        }
    }
}

/// [`PolicyService`] over an embedder vtable.
pub struct ExternPolicy {
    ops: ImePolicyOps,
}

struct ExternPolicySession {
    ops: ImePolicyOps,
    check: unsafe extern "C" fn(
        *mut c_void,
        *const c_char,
        *const c_char,
        *const c_char,
        *const c_char,
    ) -> c_int,
}

impl PolicySession for ExternPolicySession {
    fn check(&mut self, request: &crate::privilege::PolicyRequest) -> Decision {
        let client = CString::new(request.client.as_str()).unwrap_or_default();
        let session = CString::new(request.session.as_str()).unwrap_or_default();
        let user = CString::new(request.user.as_str()).unwrap_or_default();
        let privilege = CString::new(request.privilege).unwrap_or_default();
        let decision = unsafe {
            (self.check)(
                self.ops.policy,
                client.as_ptr(),
                session.as_ptr(),
                user.as_ptr(),
                privilege.as_ptr(),
            )
        };
        if decision == IME_POLICY_ALLOWED {
            Decision::Allowed
        } else {
            Decision::Denied
        }
    }
}

impl PolicyService for ExternPolicy {
    fn connect(&self) -> std::io::Result<Box<dyn PolicySession + '_>> {
        match self.ops.check {
            Some(check) => Ok(Box::new(ExternPolicySession {
                ops: self.ops,
                check,
            })),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "no policy check entry",
            )),
        }
    }
}

// --- shim handle -----------------------------------------------------------

/// Opaque shim handle returned by [`ime_shim_new`].
pub struct ImeShim {
    ime: InputMethod<ExternEngine, ExternPolicy>,
    last_error: Cell<c_int>,
}

fn status(result: Result<()>) -> c_int {
    match result {
        Ok(()) => IME_ERROR_NONE,
        Err(err) => err.code(),
    }
}

const INVALID: c_int = ImeError::InvalidParameter.code();

/// Creates a shim over the given engine and policy vtables.
///
/// Both vtables are copied; the opaque `engine`/`policy` pointers inside
/// must stay valid for the life of the handle. Returns null when either
/// argument is null. Release with [`ime_shim_free`].
#[no_mangle]
pub unsafe extern "C" fn ime_shim_new(
    engine_ops: *const ImeEngineOps,
    policy_ops: *const ImePolicyOps,
) -> *mut ImeShim {
    if engine_ops.is_null() || policy_ops.is_null() {
        return std::ptr::null_mut();
    }
    let shim = ImeShim {
        ime: InputMethod::new(
            ExternEngine { ops: *engine_ops },
            ExternPolicy { ops: *policy_ops },
        ),
        last_error: Cell::new(IME_ERROR_NONE),
    };
    Box::into_raw(Box::new(shim))
}

/// Destroys a shim handle. Must not be called while `ime_run` is blocking.
#[no_mangle]
pub unsafe extern "C" fn ime_shim_free(shim: *mut ImeShim) {
    if !shim.is_null() {
        drop(Box::from_raw(shim));
    }
}

/// Reads the status of the most recent pointer-returning call.
#[no_mangle]
pub unsafe extern "C" fn ime_get_last_error(shim: *const ImeShim) -> c_int {
    if shim.is_null() {
        return INVALID;
    }
    (*shim).last_error.get()
}

// --- lifecycle -------------------------------------------------------------

/// Mandatory lifecycle callbacks for [`ime_run`]. All four entries are
/// required.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ImeCallbackBundle {
    pub create: Option<unsafe extern "C" fn(user_data: *mut c_void)>,
    pub terminate: Option<unsafe extern "C" fn(user_data: *mut c_void)>,
    pub show: Option<
        unsafe extern "C" fn(context_id: c_int, context: *const InputContext, user_data: *mut c_void),
    >,
    pub hide: Option<unsafe extern "C" fn(context_id: c_int, user_data: *mut c_void)>,
}

struct ExternCallbacks {
    create: unsafe extern "C" fn(*mut c_void),
    terminate: unsafe extern "C" fn(*mut c_void),
    show: unsafe extern "C" fn(c_int, *const InputContext, *mut c_void),
    hide: unsafe extern "C" fn(c_int, *mut c_void),
    user_data: *mut c_void,
}

impl ImeCallbacks for ExternCallbacks {
    fn on_create(&mut self) {
        unsafe { (self.create)(self.user_data) }
    }

    fn on_terminate(&mut self) {
        unsafe { (self.terminate)(self.user_data) }
    }

    fn on_show(&mut self, context_id: i32, context: &InputContext) {
        unsafe { (self.show)(context_id, context as *const InputContext, self.user_data) }
    }

    fn on_hide(&mut self, context_id: i32) {
        unsafe { (self.hide)(context_id, self.user_data) }
    }
}

/// Runs the input method main loop; blocks until the engine loop exits.
///
/// `callbacks` must carry all four lifecycle entries; a bundle with any
/// missing member fails with the no-callback status and clears every
/// registration made so far.
#[no_mangle]
pub unsafe extern "C" fn ime_run(
    shim: *mut ImeShim,
    callbacks: *const ImeCallbackBundle,
    user_data: *mut c_void,
) -> c_int {
    if shim.is_null() {
        return INVALID;
    }
    let shim = &*shim;
    let result = shim.ime.run_session(
        || {
            if callbacks.is_null() {
                Err(ImeError::InvalidParameter)
            } else {
                Ok(())
            }
        },
        || {
            let bundle = *callbacks;
            match (bundle.create, bundle.terminate, bundle.show, bundle.hide) {
                (Some(create), Some(terminate), Some(show), Some(hide)) => {
                    Ok(Box::new(ExternCallbacks {
                        create,
                        terminate,
                        show,
                        hide,
                        user_data,
                    }) as Box<dyn ImeCallbacks>)
                }
                _ => Err(ImeError::NoCallbackFunction),
            }
        },
    );
    status(result)
}

macro_rules! require {
    ($ptr:expr) => {
        if $ptr.is_null() {
            return INVALID;
        }
    };
}

/// Registers the hosting application's entry function, invoked with the
/// process argument vector when the engine loop starts. The argv strings are
/// only valid for the duration of the call. Unlike event callbacks, the
/// registration survives session end.
#[no_mangle]
pub unsafe extern "C" fn ime_set_main_entry_cb(
    shim: *mut ImeShim,
    callback: Option<
        unsafe extern "C" fn(argc: c_int, argv: *const *const c_char, user_data: *mut c_void),
    >,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    (*shim).ime.set_main_entry(move |args| {
        let owned: Vec<CString> = args
            .iter()
            .map(|arg| CString::new(arg.as_str()).unwrap_or_default())
            .collect();
        let argv: Vec<*const c_char> = owned.iter().map(|arg| arg.as_ptr()).collect();
        unsafe { callback(argv.len() as c_int, argv.as_ptr(), user_data) }
    });
    IME_ERROR_NONE
}

// --- event callback registration -------------------------------------------

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_focus_in_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(context_id: c_int, user_data: *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status((*shim).ime.set_focus_in_cb(move |context_id| unsafe {
        callback(context_id, user_data)
    }))
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_focus_out_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(context_id: c_int, user_data: *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status((*shim).ime.set_focus_out_cb(move |context_id| unsafe {
        callback(context_id, user_data)
    }))
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_surrounding_text_updated_cb(
    shim: *mut ImeShim,
    callback: Option<
        unsafe extern "C" fn(
            context_id: c_int,
            text: *const c_char,
            cursor_pos: c_int,
            user_data: *mut c_void,
        ),
    >,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status(
        (*shim)
            .ime
            .set_surrounding_text_updated_cb(move |context_id, text, cursor_pos| {
                if let Ok(text) = CString::new(text) {
                    unsafe { callback(context_id, text.as_ptr(), cursor_pos, user_data) }
                }
            }),
    )
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_input_context_reset_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(user_data: *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status(
        (*shim)
            .ime
            .set_input_context_reset_cb(move || unsafe { callback(user_data) }),
    )
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_cursor_position_updated_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(cursor_pos: c_int, user_data: *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status((*shim).ime.set_cursor_position_updated_cb(
        move |cursor_pos| unsafe { callback(cursor_pos, user_data) },
    ))
}

/// The callback returns a pointer to the keyboard's locale string, or null
/// when it has none. The pointed-to data is copied before the callback's
/// next invocation and is never freed by the shim.
#[no_mangle]
pub unsafe extern "C" fn ime_event_set_language_requested_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(user_data: *mut c_void) -> *const c_char>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status((*shim).ime.set_language_requested_cb(move || {
        let locale = unsafe { callback(user_data) };
        if locale.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(locale) }.to_string_lossy().into_owned())
        }
    }))
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_language_set_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(language: u32, user_data: *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status((*shim).ime.set_language_set_cb(move |language| unsafe {
        callback(language as u32, user_data)
    }))
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_imdata_set_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(data: *const u8, length: u32, user_data: *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status((*shim).ime.set_imdata_set_cb(move |data| unsafe {
        callback(data.as_ptr(), data.len() as u32, user_data)
    }))
}

/// The callback fills `*data`/`*length` with a pointer to the keyboard's
/// application data; the pointed-to bytes are copied before the callback's
/// next invocation and never freed by the shim.
#[no_mangle]
pub unsafe extern "C" fn ime_event_set_imdata_requested_cb(
    shim: *mut ImeShim,
    callback: Option<
        unsafe extern "C" fn(user_data: *mut c_void, data: *mut *const u8, length: *mut u32),
    >,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status((*shim).ime.set_imdata_requested_cb(move || {
        let mut data: *const u8 = std::ptr::null();
        let mut length: u32 = 0;
        unsafe { callback(user_data, &mut data, &mut length) };
        if data.is_null() || length == 0 {
            Vec::new()
        } else {
            unsafe { slice::from_raw_parts(data, length as usize) }.to_vec()
        }
    }))
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_layout_set_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(layout: u32, user_data: *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status((*shim).ime.set_layout_set_cb(move |layout| unsafe {
        callback(layout as u32, user_data)
    }))
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_return_key_type_set_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(return_key_type: u32, user_data: *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status(
        (*shim)
            .ime
            .set_return_key_type_set_cb(move |return_key_type| unsafe {
                callback(return_key_type as u32, user_data)
            }),
    )
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_return_key_state_set_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(disabled: bool, user_data: *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status((*shim).ime.set_return_key_state_set_cb(
        move |disabled| unsafe { callback(disabled, user_data) },
    ))
}

/// The callback writes the keyboard geometry through the four out
/// parameters; values it leaves untouched stay zero.
#[no_mangle]
pub unsafe extern "C" fn ime_event_set_geometry_requested_cb(
    shim: *mut ImeShim,
    callback: Option<
        unsafe extern "C" fn(
            user_data: *mut c_void,
            x: *mut c_int,
            y: *mut c_int,
            width: *mut c_int,
            height: *mut c_int,
        ),
    >,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status((*shim).ime.set_geometry_requested_cb(move || {
        let mut geometry = Geometry::default();
        unsafe {
            callback(
                user_data,
                &mut geometry.x,
                &mut geometry.y,
                &mut geometry.width,
                &mut geometry.height,
            )
        };
        geometry
    }))
}

/// The callback returns true when the keyboard consumed the event. The
/// device handle is only valid for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn ime_event_set_process_key_event_cb(
    shim: *mut ImeShim,
    callback: Option<
        unsafe extern "C" fn(
            key_code: u32,
            key_mask: u32,
            device: *const DeviceInfo,
            user_data: *mut c_void,
        ) -> bool,
    >,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status(
        (*shim)
            .ime
            .set_process_key_event_cb(move |key_code, key_mask, device| unsafe {
                callback(
                    key_code.raw(),
                    key_mask.bits(),
                    device as *const DeviceInfo,
                    user_data,
                )
            }),
    )
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_display_language_changed_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(language: *const c_char, user_data: *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status(
        (*shim)
            .ime
            .set_display_language_changed_cb(move |language| {
                if let Ok(language) = CString::new(language) {
                    unsafe { callback(language.as_ptr(), user_data) }
                }
            }),
    )
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_rotation_degree_changed_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(degree: c_int, user_data: *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status((*shim).ime.set_rotation_degree_changed_cb(
        move |degree| unsafe { callback(degree, user_data) },
    ))
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_accessibility_state_changed_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(state: bool, user_data: *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status((*shim).ime.set_accessibility_state_changed_cb(
        move |state| unsafe { callback(state, user_data) },
    ))
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_option_window_created_cb(
    shim: *mut ImeShim,
    callback: Option<
        unsafe extern "C" fn(window: usize, window_type: u32, user_data: *mut c_void),
    >,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status(
        (*shim)
            .ime
            .set_option_window_created_cb(move |window, window_type| unsafe {
                callback(window.0, window_type as u32, user_data)
            }),
    )
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_set_option_window_destroyed_cb(
    shim: *mut ImeShim,
    callback: Option<unsafe extern "C" fn(window: usize, user_data: *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status((*shim).ime.set_option_window_destroyed_cb(
        move |window| unsafe { callback(window.0, user_data) },
    ))
}

/// The event handle is only valid for the duration of the call; query it
/// with the device accessors.
#[no_mangle]
pub unsafe extern "C" fn ime_event_set_process_input_device_event_cb(
    shim: *mut ImeShim,
    callback: Option<
        unsafe extern "C" fn(
            device_type: u32,
            event: *const InputDeviceEvent,
            user_data: *mut c_void,
        ),
    >,
    user_data: *mut c_void,
) -> c_int {
    require!(shim);
    let callback = match callback {
        Some(callback) => callback,
        None => return INVALID,
    };
    status(
        (*shim)
            .ime
            .set_process_input_device_event_cb(move |device_type, event| unsafe {
                callback(
                    device_type as u32,
                    event as *const InputDeviceEvent,
                    user_data,
                )
            }),
    )
}

#[no_mangle]
pub unsafe extern "C" fn ime_event_unset_process_input_device_event_cb(
    shim: *mut ImeShim,
) -> c_int {
    require!(shim);
    status((*shim).ime.unset_event_cb(EventKind::ProcessInputDeviceEvent))
}

// --- runtime calls ---------------------------------------------------------

#[no_mangle]
pub unsafe extern "C" fn ime_send_key_event(
    shim: *mut ImeShim,
    key_code: u32,
    key_mask: u32,
    forward: bool,
) -> c_int {
    require!(shim);
    status((*shim).ime.send_key_event(
        KeyCode::from_raw(key_code),
        KeyMask::from_bits_truncate(key_mask),
        forward,
    ))
}

#[no_mangle]
pub unsafe extern "C" fn ime_commit_string(shim: *mut ImeShim, text: *const c_char) -> c_int {
    require!(shim);
    require!(text);
    let text = CStr::from_ptr(text).to_string_lossy();
    status((*shim).ime.commit_string(&text))
}

#[no_mangle]
pub unsafe extern "C" fn ime_show_preedit_string(shim: *mut ImeShim) -> c_int {
    require!(shim);
    status((*shim).ime.show_preedit_string())
}

#[no_mangle]
pub unsafe extern "C" fn ime_hide_preedit_string(shim: *mut ImeShim) -> c_int {
    require!(shim);
    status((*shim).ime.hide_preedit_string())
}

/// Replaces the preedit string. The attribute array is copied and converted;
/// the caller keeps ownership of its memory.
#[no_mangle]
pub unsafe extern "C" fn ime_update_preedit_string(
    shim: *mut ImeShim,
    text: *const c_char,
    attributes: *const ImePreeditAttribute,
    attribute_count: usize,
) -> c_int {
    require!(shim);
    require!(text);
    if attributes.is_null() && attribute_count != 0 {
        return INVALID;
    }
    let text = CStr::from_ptr(text).to_string_lossy();
    let attributes = if attribute_count == 0 {
        Vec::new()
    } else {
        slice::from_raw_parts(attributes, attribute_count)
            .iter()
            .map(|attr| PreeditAttribute {
                start: attr.start,
                length: attr.length,
                kind: AttributeKind::from_raw(attr.kind),
                value: FontStyle::from_bits_truncate(attr.value),
            })
            .collect()
    };
    status((*shim).ime.update_preedit_string(&text, attributes))
}

#[no_mangle]
pub unsafe extern "C" fn ime_request_surrounding_text(
    shim: *mut ImeShim,
    maxlen_before: c_int,
    maxlen_after: c_int,
) -> c_int {
    require!(shim);
    status((*shim).ime.request_surrounding_text(maxlen_before, maxlen_after))
}

#[no_mangle]
pub unsafe extern "C" fn ime_delete_surrounding_text(
    shim: *mut ImeShim,
    offset: c_int,
    length: c_int,
) -> c_int {
    require!(shim);
    status((*shim).ime.delete_surrounding_text(offset, length))
}

#[no_mangle]
pub unsafe extern "C" fn ime_set_size(
    shim: *mut ImeShim,
    portrait_width: c_int,
    portrait_height: c_int,
    landscape_width: c_int,
    landscape_height: c_int,
) -> c_int {
    require!(shim);
    status((*shim).ime.set_size(
        portrait_width,
        portrait_height,
        landscape_width,
        landscape_height,
    ))
}

/// Creates the option window and returns its handle, or `0` on failure with
/// the status in the last-error slot.
#[no_mangle]
pub unsafe extern "C" fn ime_create_option_window(shim: *mut ImeShim) -> usize {
    if shim.is_null() {
        return 0;
    }
    let shim = &*shim;
    match shim.ime.create_option_window() {
        Ok(window) => {
            shim.last_error.set(IME_ERROR_NONE);
            window.0
        }
        Err(err) => {
            shim.last_error.set(err.code());
            0
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn ime_destroy_option_window(shim: *mut ImeShim, window: usize) -> c_int {
    require!(shim);
    if window == 0 {
        return INVALID;
    }
    status((*shim).ime.destroy_option_window(WindowHandle(window)))
}

/// Returns the keyboard main window handle, or `0` with the status in the
/// last-error slot.
#[no_mangle]
pub unsafe extern "C" fn ime_get_main_window(shim: *mut ImeShim) -> usize {
    if shim.is_null() {
        return 0;
    }
    let shim = &*shim;
    match shim.ime.main_window() {
        Ok(window) => {
            shim.last_error.set(IME_ERROR_NONE);
            window.0
        }
        Err(err) => {
            shim.last_error.set(err.code());
            0
        }
    }
}

// --- input context accessors -----------------------------------------------

unsafe fn context_get<T>(
    shim: *mut ImeShim,
    context: *const InputContext,
    out: *mut T,
    read: impl FnOnce(&InputContext) -> T,
) -> c_int {
    require!(shim);
    require!(context);
    require!(out);
    if let Err(err) = (*shim).ime.guard_accessor() {
        return err.code();
    }
    *out = read(&*context);
    IME_ERROR_NONE
}

#[no_mangle]
pub unsafe extern "C" fn ime_context_get_layout(
    shim: *mut ImeShim,
    context: *const InputContext,
    layout: *mut u32,
) -> c_int {
    context_get(shim, context, layout, |c| c.layout() as u32)
}

#[no_mangle]
pub unsafe extern "C" fn ime_context_get_layout_variation(
    shim: *mut ImeShim,
    context: *const InputContext,
    layout_variation: *mut u32,
) -> c_int {
    context_get(shim, context, layout_variation, |c| {
        c.layout_variation().raw()
    })
}

#[no_mangle]
pub unsafe extern "C" fn ime_context_get_cursor_position(
    shim: *mut ImeShim,
    context: *const InputContext,
    cursor_pos: *mut c_int,
) -> c_int {
    context_get(shim, context, cursor_pos, |c| c.cursor_position())
}

#[no_mangle]
pub unsafe extern "C" fn ime_context_get_autocapital_type(
    shim: *mut ImeShim,
    context: *const InputContext,
    autocapital_type: *mut u32,
) -> c_int {
    context_get(shim, context, autocapital_type, |c| {
        c.autocapital_type() as u32
    })
}

#[no_mangle]
pub unsafe extern "C" fn ime_context_get_return_key_type(
    shim: *mut ImeShim,
    context: *const InputContext,
    return_key_type: *mut u32,
) -> c_int {
    context_get(shim, context, return_key_type, |c| {
        c.return_key_type() as u32
    })
}

#[no_mangle]
pub unsafe extern "C" fn ime_context_get_return_key_state(
    shim: *mut ImeShim,
    context: *const InputContext,
    return_key_state: *mut bool,
) -> c_int {
    context_get(shim, context, return_key_state, |c| c.return_key_state())
}

#[no_mangle]
pub unsafe extern "C" fn ime_context_get_prediction_mode(
    shim: *mut ImeShim,
    context: *const InputContext,
    prediction_mode: *mut bool,
) -> c_int {
    context_get(shim, context, prediction_mode, |c| c.prediction_mode())
}

#[no_mangle]
pub unsafe extern "C" fn ime_context_get_password_mode(
    shim: *mut ImeShim,
    context: *const InputContext,
    password_mode: *mut bool,
) -> c_int {
    context_get(shim, context, password_mode, |c| c.password_mode())
}

#[no_mangle]
pub unsafe extern "C" fn ime_context_get_input_hint(
    shim: *mut ImeShim,
    context: *const InputContext,
    input_hint: *mut u32,
) -> c_int {
    context_get(shim, context, input_hint, |c| c.input_hint().bits())
}

#[no_mangle]
pub unsafe extern "C" fn ime_context_get_bidi_direction(
    shim: *mut ImeShim,
    context: *const InputContext,
    bidi_direction: *mut u32,
) -> c_int {
    context_get(shim, context, bidi_direction, |c| c.bidi_direction() as u32)
}

#[no_mangle]
pub unsafe extern "C" fn ime_context_get_language(
    shim: *mut ImeShim,
    context: *const InputContext,
    language: *mut u32,
) -> c_int {
    context_get(shim, context, language, |c| c.language() as u32)
}

// --- device info accessors -------------------------------------------------

/// Copies the device name into a malloc'd string; release with
/// [`ime_free_string`].
#[no_mangle]
pub unsafe extern "C" fn ime_device_info_get_name(
    shim: *mut ImeShim,
    device: *const DeviceInfo,
    name: *mut *mut c_char,
) -> c_int {
    require!(shim);
    require!(device);
    require!(name);
    if let Err(err) = (*shim).ime.guard_accessor() {
        return err.code();
    }
    match CString::new((*device).name()) {
        Ok(copy) => {
            *name = copy.into_raw();
            IME_ERROR_NONE
        }
        Err(_) => ImeError::OperationFailed.code(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn ime_device_info_get_class(
    shim: *mut ImeShim,
    device: *const DeviceInfo,
    class: *mut u32,
) -> c_int {
    require!(shim);
    require!(device);
    require!(class);
    if let Err(err) = (*shim).ime.guard_accessor() {
        return err.code();
    }
    *class = (*device).class() as u32;
    IME_ERROR_NONE
}

#[no_mangle]
pub unsafe extern "C" fn ime_device_info_get_subclass(
    shim: *mut ImeShim,
    device: *const DeviceInfo,
    subclass: *mut u32,
) -> c_int {
    require!(shim);
    require!(device);
    require!(subclass);
    if let Err(err) = (*shim).ime.guard_accessor() {
        return err.code();
    }
    *subclass = (*device).subclass() as u32;
    IME_ERROR_NONE
}

/// Reads the rotation direction of a rotary event handle. Fails with the
/// invalid-parameter status when the event did not come from a rotary
/// device.
#[no_mangle]
pub unsafe extern "C" fn ime_input_device_rotary_get_direction(
    shim: *mut ImeShim,
    event: *const InputDeviceEvent,
    direction: *mut u32,
) -> c_int {
    require!(shim);
    require!(event);
    require!(direction);
    if let Err(err) = (*shim).ime.guard_accessor() {
        return err.code();
    }
    match (*event).rotary() {
        Some(rotary) => {
            *direction = rotary.direction() as u32;
            IME_ERROR_NONE
        }
        None => INVALID,
    }
}

/// Releases a string allocated by the shim.
#[no_mangle]
pub unsafe extern "C" fn ime_free_string(string: *mut c_char) {
    if !string.is_null() {
        drop(CString::from_raw(string));
    }
}
