//! Tests driving the shim through the C surface.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};
use std::ptr;

use inputmethod_core::engine::{CoreAttribute, RawInputContext};
use inputmethod_core::ffi::*;
use inputmethod_core::{DeviceInfo, InputContext, InputDeviceEvent, IME_ERROR_NONE};

#[derive(Default)]
struct TestEngine {
    committed: Vec<String>,
    sent_keys: Vec<(u32, u32)>,
    preedits: Vec<(String, Vec<CoreAttribute>)>,
    focus_events: Vec<i32>,
    run_args: Vec<CString>,
    show_context: Option<ImeRawInputContext>,
    fire_key_event: bool,
    fire_device_events: bool,
    key_consumed: Vec<bool>,
}

unsafe extern "C" fn eng_run(engine: *mut c_void, listener: *const ImeListenerVtable) -> c_int {
    let eng = engine as *mut TestEngine;
    let run_args = (*eng).run_args.clone();
    let focus_events = (*eng).focus_events.clone();
    let show_context = (*eng).show_context;
    let fire_key_event = (*eng).fire_key_event;
    let fire_device_events = (*eng).fire_device_events;
    let vt = &*listener;
    (vt.on_init)(vt.ctx);
    if !run_args.is_empty() {
        let argv: Vec<*const c_char> = run_args.iter().map(|arg| arg.as_ptr()).collect();
        (vt.on_run)(vt.ctx, argv.len() as c_int, argv.as_ptr());
    }
    for context_id in focus_events {
        (vt.on_focus_in)(vt.ctx, context_id);
    }
    if let Some(raw) = show_context {
        (vt.on_ise_show)(vt.ctx, 5, 0, &raw);
    }
    if fire_key_event {
        let name = CString::new("wl-keyboard").unwrap();
        let raw = ImeRawKeyEvent {
            key_code: 0xFF0D,
            key_mask: 1,
            device_name: name.as_ptr(),
            device_class: 2,
            device_subclass: 12,
        };
        let consumed = (vt.on_process_key_event)(vt.ctx, &raw);
        (*eng).key_consumed.push(consumed);
    }
    if fire_device_events {
        let rotary = ImeRawDeviceEvent {
            device_type: 1,
            direction: 1,
            time_stamp: 88,
        };
        (vt.on_process_input_device_event)(vt.ctx, &rotary);
        let unknown = ImeRawDeviceEvent {
            device_type: 0,
            direction: 0,
            time_stamp: 89,
        };
        (vt.on_process_input_device_event)(vt.ctx, &unknown);
    }
    (vt.on_exit)(vt.ctx);
    0
}

unsafe extern "C" fn eng_forward_key(engine: *mut c_void, _ic: c_int, code: u32, mask: u32) {
    (*(engine as *mut TestEngine)).sent_keys.push((code, mask));
}

unsafe extern "C" fn eng_send_key(engine: *mut c_void, _ic: c_int, code: u32, mask: u32) {
    (*(engine as *mut TestEngine)).sent_keys.push((code, mask));
}

unsafe extern "C" fn eng_commit(engine: *mut c_void, _ic: c_int, text: *const c_char) {
    let text = std::ffi::CStr::from_ptr(text).to_string_lossy().into_owned();
    (*(engine as *mut TestEngine)).committed.push(text);
}

unsafe extern "C" fn eng_show_preedit(_engine: *mut c_void, _ic: c_int) {}
unsafe extern "C" fn eng_hide_preedit(_engine: *mut c_void, _ic: c_int) {}

unsafe extern "C" fn eng_update_preedit(
    engine: *mut c_void,
    _ic: c_int,
    text: *const c_char,
    attributes: *const CoreAttribute,
    attribute_count: usize,
) {
    let text = CStr::from_ptr(text).to_string_lossy().into_owned();
    let attributes = if attribute_count == 0 {
        Vec::new()
    } else {
        std::slice::from_raw_parts(attributes, attribute_count).to_vec()
    };
    (*(engine as *mut TestEngine)).preedits.push((text, attributes));
}

unsafe extern "C" fn eng_request_surrounding(_engine: *mut c_void, _before: c_int, _after: c_int) {}
unsafe extern "C" fn eng_delete_surrounding(_engine: *mut c_void, _offset: c_int, _length: c_int) {}

unsafe extern "C" fn eng_set_size_hints(
    _engine: *mut c_void,
    _pw: c_int,
    _ph: c_int,
    _lw: c_int,
    _lh: c_int,
) {
}

unsafe extern "C" fn eng_create_option_window(_engine: *mut c_void) -> usize {
    41
}

unsafe extern "C" fn eng_destroy_option_window(_engine: *mut c_void, _window: usize) {}

unsafe extern "C" fn eng_main_window(_engine: *mut c_void) -> usize {
    17
}

fn engine_ops(engine: *mut TestEngine) -> ImeEngineOps {
    ImeEngineOps {
        engine: engine as *mut c_void,
        run: eng_run,
        forward_key_event: eng_forward_key,
        send_key_event: eng_send_key,
        commit_string: eng_commit,
        show_preedit: eng_show_preedit,
        hide_preedit: eng_hide_preedit,
        update_preedit: eng_update_preedit,
        request_surrounding_text: eng_request_surrounding,
        delete_surrounding_text: eng_delete_surrounding,
        set_size_hints: eng_set_size_hints,
        create_option_window: eng_create_option_window,
        destroy_option_window: eng_destroy_option_window,
        main_window: eng_main_window,
    }
}

unsafe extern "C" fn allow_check(
    _policy: *mut c_void,
    _client: *const c_char,
    _session: *const c_char,
    _user: *const c_char,
    _privilege: *const c_char,
) -> c_int {
    IME_POLICY_ALLOWED
}

unsafe extern "C" fn deny_check(
    _policy: *mut c_void,
    _client: *const c_char,
    _session: *const c_char,
    _user: *const c_char,
    _privilege: *const c_char,
) -> c_int {
    IME_POLICY_DENIED
}

fn policy_ops(
    check: unsafe extern "C" fn(
        *mut c_void,
        *const c_char,
        *const c_char,
        *const c_char,
        *const c_char,
    ) -> c_int,
) -> ImePolicyOps {
    ImePolicyOps {
        policy: ptr::null_mut(),
        check: Some(check),
    }
}

// The decision is read through the opaque policy pointer, so a test can
// flip it mid-session.
unsafe extern "C" fn mode_check(
    policy: *mut c_void,
    _client: *const c_char,
    _session: *const c_char,
    _user: *const c_char,
    _privilege: *const c_char,
) -> c_int {
    *(policy as *const c_int)
}

struct Host {
    shim: *mut ImeShim,
    log: Vec<String>,
}

unsafe extern "C" fn cb_create(user_data: *mut c_void) {
    let host = &mut *(user_data as *mut Host);
    host.log.push("create".to_string());
    let text = CString::new("hi").unwrap();
    assert_eq!(ime_commit_string(host.shim, text.as_ptr()), IME_ERROR_NONE);
    assert_eq!(ime_send_key_event(host.shim, 0xFF08, 1, false), IME_ERROR_NONE);
    let window = ime_get_main_window(host.shim);
    host.log.push(format!("main:{window}"));
}

unsafe extern "C" fn cb_terminate(user_data: *mut c_void) {
    let host = &mut *(user_data as *mut Host);
    host.log.push("terminate".to_string());
}

unsafe extern "C" fn cb_show(
    context_id: c_int,
    _context: *const InputContext,
    user_data: *mut c_void,
) {
    let host = &mut *(user_data as *mut Host);
    host.log.push(format!("show:{context_id}"));
}

unsafe extern "C" fn cb_hide(context_id: c_int, user_data: *mut c_void) {
    let host = &mut *(user_data as *mut Host);
    host.log.push(format!("hide:{context_id}"));
}

unsafe extern "C" fn cb_focus_in(context_id: c_int, user_data: *mut c_void) {
    let host = &mut *(user_data as *mut Host);
    host.log.push(format!("focus:{context_id}"));
}

unsafe extern "C" fn cb_main_entry(
    argc: c_int,
    argv: *const *const c_char,
    user_data: *mut c_void,
) {
    let host = &mut *(user_data as *mut Host);
    let mut args = Vec::new();
    for i in 0..argc as usize {
        args.push(CStr::from_ptr(*argv.add(i)).to_string_lossy().into_owned());
    }
    host.log.push(format!("entry:{}", args.join(" ")));
}

fn full_bundle() -> ImeCallbackBundle {
    ImeCallbackBundle {
        create: Some(cb_create),
        terminate: Some(cb_terminate),
        show: Some(cb_show),
        hide: Some(cb_hide),
    }
}

unsafe extern "C" fn cb_quiet(_user_data: *mut c_void) {}

unsafe extern "C" fn cb_quiet_show(
    _context_id: c_int,
    _context: *const InputContext,
    _user_data: *mut c_void,
) {
}

unsafe extern "C" fn cb_quiet_hide(_context_id: c_int, _user_data: *mut c_void) {}

fn quiet_bundle(
    show: unsafe extern "C" fn(c_int, *const InputContext, *mut c_void),
) -> ImeCallbackBundle {
    ImeCallbackBundle {
        create: Some(cb_quiet),
        terminate: Some(cb_quiet),
        show: Some(show),
        hide: Some(cb_quiet_hide),
    }
}

#[test]
fn test_run_dispatches_and_allows_reentrant_calls() {
    unsafe {
        let mut engine = TestEngine {
            focus_events: vec![7],
            ..TestEngine::default()
        };
        let ops = engine_ops(&mut engine);
        let policy = policy_ops(allow_check);
        let shim = ime_shim_new(&ops, &policy);
        assert!(!shim.is_null());

        let mut host = Host {
            shim,
            log: Vec::new(),
        };
        let user_data = &mut host as *mut Host as *mut c_void;
        assert_eq!(
            ime_event_set_focus_in_cb(shim, Some(cb_focus_in), user_data),
            IME_ERROR_NONE
        );

        let bundle = full_bundle();
        assert_eq!(ime_run(shim, &bundle, user_data), IME_ERROR_NONE);

        assert_eq!(host.log, vec!["create", "main:17", "focus:7", "terminate"]);
        assert_eq!(engine.committed, vec!["hi"]);
        assert_eq!(engine.sent_keys, vec![(0xFF08, 1)]);
        ime_shim_free(shim);
    }
}

#[test]
fn test_runtime_calls_fail_when_idle() {
    unsafe {
        let mut engine = TestEngine::default();
        let ops = engine_ops(&mut engine);
        let policy = policy_ops(allow_check);
        let shim = ime_shim_new(&ops, &policy);

        let text = CString::new("x").unwrap();
        assert_eq!(ime_commit_string(shim, text.as_ptr()), -3);
        assert_eq!(ime_send_key_event(shim, 0xFF0D, 0, false), -3);

        assert_eq!(ime_get_main_window(shim), 0);
        assert_eq!(ime_get_last_error(shim), -3);

        ime_shim_free(shim);
    }
}

#[test]
fn test_incomplete_bundle_clears_registrations() {
    unsafe {
        let mut engine = TestEngine {
            focus_events: vec![1],
            ..TestEngine::default()
        };
        let ops = engine_ops(&mut engine);
        let policy = policy_ops(allow_check);
        let shim = ime_shim_new(&ops, &policy);

        let mut host = Host {
            shim,
            log: Vec::new(),
        };
        let user_data = &mut host as *mut Host as *mut c_void;
        assert_eq!(
            ime_event_set_focus_in_cb(shim, Some(cb_focus_in), user_data),
            IME_ERROR_NONE
        );

        let incomplete = ImeCallbackBundle {
            hide: None,
            ..full_bundle()
        };
        assert_eq!(ime_run(shim, &incomplete, user_data), -2);

        // registrations were wiped: this session sees the focus event but
        // the callback no longer fires
        let bundle = full_bundle();
        assert_eq!(ime_run(shim, &bundle, user_data), IME_ERROR_NONE);
        assert!(!host.log.iter().any(|entry| entry.starts_with("focus")));

        ime_shim_free(shim);
    }
}

#[test]
fn test_argument_errors() {
    unsafe {
        let mut engine = TestEngine::default();
        let ops = engine_ops(&mut engine);
        let policy = policy_ops(allow_check);

        assert!(ime_shim_new(ptr::null(), &policy).is_null());
        assert!(ime_shim_new(&ops, ptr::null()).is_null());
        assert_eq!(ime_get_last_error(ptr::null()), -1);

        let shim = ime_shim_new(&ops, &policy);
        assert_eq!(ime_run(ptr::null_mut(), &full_bundle(), ptr::null_mut()), -1);
        assert_eq!(ime_run(shim, ptr::null(), ptr::null_mut()), -1);
        assert_eq!(
            ime_event_set_focus_in_cb(shim, None, ptr::null_mut()),
            -1
        );
        assert_eq!(ime_commit_string(shim, ptr::null()), -1);

        ime_free_string(ptr::null_mut());
        ime_shim_free(shim);
        ime_shim_free(ptr::null_mut());
    }
}

#[test]
fn test_main_entry_registered_through_the_c_surface() {
    unsafe {
        let mut engine = TestEngine {
            run_args: vec![
                CString::new("ime").unwrap(),
                CString::new("--demo").unwrap(),
            ],
            ..TestEngine::default()
        };
        let ops = engine_ops(&mut engine);
        let policy = policy_ops(allow_check);
        let shim = ime_shim_new(&ops, &policy);

        let mut host = Host {
            shim,
            log: Vec::new(),
        };
        let user_data = &mut host as *mut Host as *mut c_void;
        assert_eq!(ime_set_main_entry_cb(shim, None, user_data), -1);
        assert_eq!(
            ime_set_main_entry_cb(shim, Some(cb_main_entry), user_data),
            IME_ERROR_NONE
        );

        let bundle = quiet_bundle(cb_quiet_show);
        assert_eq!(ime_run(shim, &bundle, user_data), IME_ERROR_NONE);
        // not an event registration: the hook survives session end
        assert_eq!(ime_run(shim, &bundle, user_data), IME_ERROR_NONE);

        assert_eq!(host.log, vec!["entry:ime --demo", "entry:ime --demo"]);
        ime_shim_free(shim);
    }
}

struct AccessorHost {
    shim: *mut ImeShim,
    mode: *mut c_int,
    log: Vec<String>,
}

unsafe extern "C" fn cb_show_reads_context(
    context_id: c_int,
    context: *const InputContext,
    user_data: *mut c_void,
) {
    let host = &mut *(user_data as *mut AccessorHost);
    let mut layout = 0u32;
    assert_eq!(
        ime_context_get_layout(host.shim, context, &mut layout),
        IME_ERROR_NONE
    );
    let mut variation = 0u32;
    assert_eq!(
        ime_context_get_layout_variation(host.shim, context, &mut variation),
        IME_ERROR_NONE
    );
    let mut cursor = 0;
    assert_eq!(
        ime_context_get_cursor_position(host.shim, context, &mut cursor),
        IME_ERROR_NONE
    );
    let mut autocapital = 0u32;
    assert_eq!(
        ime_context_get_autocapital_type(host.shim, context, &mut autocapital),
        IME_ERROR_NONE
    );
    let mut return_key = 0u32;
    assert_eq!(
        ime_context_get_return_key_type(host.shim, context, &mut return_key),
        IME_ERROR_NONE
    );
    let mut return_enabled = true;
    assert_eq!(
        ime_context_get_return_key_state(host.shim, context, &mut return_enabled),
        IME_ERROR_NONE
    );
    let mut prediction = false;
    assert_eq!(
        ime_context_get_prediction_mode(host.shim, context, &mut prediction),
        IME_ERROR_NONE
    );
    let mut password = false;
    assert_eq!(
        ime_context_get_password_mode(host.shim, context, &mut password),
        IME_ERROR_NONE
    );
    let mut hint = 0u32;
    assert_eq!(
        ime_context_get_input_hint(host.shim, context, &mut hint),
        IME_ERROR_NONE
    );
    let mut bidi = 0u32;
    assert_eq!(
        ime_context_get_bidi_direction(host.shim, context, &mut bidi),
        IME_ERROR_NONE
    );
    let mut language = 0u32;
    assert_eq!(
        ime_context_get_language(host.shim, context, &mut language),
        IME_ERROR_NONE
    );
    host.log.push(format!(
        "ctx:{context_id} layout:{layout} var:{variation} cur:{cursor} cap:{autocapital} \
         ret:{return_key} enab:{return_enabled} pred:{prediction} pass:{password} \
         hint:{hint} bidi:{bidi} lang:{language}"
    ));

    // a denial blocks the accessor even with a valid handle
    *host.mode = IME_POLICY_DENIED;
    assert_eq!(ime_context_get_layout(host.shim, context, &mut layout), -5);
    *host.mode = IME_POLICY_ALLOWED;
}

#[test]
fn test_context_accessors_read_show_snapshot() {
    unsafe {
        let mut engine = TestEngine {
            show_context: Some(ImeRawInputContext {
                layout: 2,
                layout_variation: 1,
                cursor_pos: 4,
                autocapital_type: 1,
                return_key_type: 6,
                return_key_disabled: true,
                prediction_allow: true,
                password_mode: true,
                imdata_size: 0,
                input_hint: 3,
                bidi_direction: 2,
                language: 1,
                client_window: 9,
            }),
            ..TestEngine::default()
        };
        let ops = engine_ops(&mut engine);
        let mut mode: c_int = IME_POLICY_ALLOWED;
        let policy = ImePolicyOps {
            policy: &mut mode as *mut c_int as *mut c_void,
            check: Some(mode_check),
        };
        let shim = ime_shim_new(&ops, &policy);

        let mut host = AccessorHost {
            shim,
            mode: &mut mode,
            log: Vec::new(),
        };
        let user_data = &mut host as *mut AccessorHost as *mut c_void;
        let bundle = quiet_bundle(cb_show_reads_context);
        assert_eq!(ime_run(shim, &bundle, user_data), IME_ERROR_NONE);

        assert_eq!(
            host.log,
            vec![
                "ctx:5 layout:2 var:1 cur:4 cap:1 ret:6 enab:false pred:true pass:true \
                 hint:3 bidi:2 lang:1"
            ]
        );
        ime_shim_free(shim);
    }
}

unsafe extern "C" fn cb_process_key(
    key_code: u32,
    key_mask: u32,
    device: *const DeviceInfo,
    user_data: *mut c_void,
) -> bool {
    let host = &mut *(user_data as *mut Host);
    let mut name: *mut c_char = ptr::null_mut();
    assert_eq!(
        ime_device_info_get_name(host.shim, device, &mut name),
        IME_ERROR_NONE
    );
    let owned = CStr::from_ptr(name).to_string_lossy().into_owned();
    ime_free_string(name);
    let mut class = 0u32;
    assert_eq!(
        ime_device_info_get_class(host.shim, device, &mut class),
        IME_ERROR_NONE
    );
    let mut subclass = 0u32;
    assert_eq!(
        ime_device_info_get_subclass(host.shim, device, &mut subclass),
        IME_ERROR_NONE
    );
    host.log
        .push(format!("key:{key_code:#X}:{key_mask} dev:{owned}:{class}:{subclass}"));
    true
}

unsafe extern "C" fn cb_device_event(
    device_type: u32,
    event: *const InputDeviceEvent,
    user_data: *mut c_void,
) {
    let host = &mut *(user_data as *mut Host);
    let mut direction = 0u32;
    let status = ime_input_device_rotary_get_direction(host.shim, event, &mut direction);
    if device_type == 1 {
        assert_eq!(status, IME_ERROR_NONE);
        host.log.push(format!("rotary:{direction}"));
    } else {
        assert_eq!(status, -1);
        host.log.push("nonrotary".to_string());
    }
}

#[test]
fn test_device_and_rotary_accessors() {
    unsafe {
        let mut engine = TestEngine {
            fire_key_event: true,
            fire_device_events: true,
            ..TestEngine::default()
        };
        let ops = engine_ops(&mut engine);
        let policy = policy_ops(allow_check);
        let shim = ime_shim_new(&ops, &policy);

        let mut host = Host {
            shim,
            log: Vec::new(),
        };
        let user_data = &mut host as *mut Host as *mut c_void;
        assert_eq!(
            ime_event_set_process_key_event_cb(shim, Some(cb_process_key), user_data),
            IME_ERROR_NONE
        );
        assert_eq!(
            ime_event_set_process_input_device_event_cb(shim, Some(cb_device_event), user_data),
            IME_ERROR_NONE
        );

        let bundle = quiet_bundle(cb_quiet_show);
        assert_eq!(ime_run(shim, &bundle, user_data), IME_ERROR_NONE);

        assert_eq!(
            host.log,
            vec!["key:0xFF0D:1 dev:wl-keyboard:2:12", "rotary:1", "nonrotary"]
        );
        assert_eq!(engine.key_consumed, vec![true]);
        ime_shim_free(shim);
    }
}

unsafe extern "C" fn cb_create_updates_preedit(user_data: *mut c_void) {
    let host = &mut *(user_data as *mut Host);
    let text = CString::new("ka").unwrap();
    let attributes = [
        ImePreeditAttribute {
            start: 0,
            length: 1,
            kind: 1,
            value: 1,
        },
        ImePreeditAttribute {
            start: 1,
            length: 1,
            kind: 1,
            value: 2,
        },
    ];
    assert_eq!(
        ime_update_preedit_string(host.shim, text.as_ptr(), attributes.as_ptr(), attributes.len()),
        IME_ERROR_NONE
    );
    // a null array with a nonzero count is rejected
    assert_eq!(
        ime_update_preedit_string(host.shim, text.as_ptr(), ptr::null(), 2),
        -1
    );
}

#[test]
fn test_update_preedit_converts_the_attribute_array() {
    unsafe {
        let mut engine = TestEngine::default();
        let ops = engine_ops(&mut engine);
        let policy = policy_ops(allow_check);
        let shim = ime_shim_new(&ops, &policy);

        let mut host = Host {
            shim,
            log: Vec::new(),
        };
        let user_data = &mut host as *mut Host as *mut c_void;
        let bundle = ImeCallbackBundle {
            create: Some(cb_create_updates_preedit),
            terminate: Some(cb_quiet),
            show: Some(cb_quiet_show),
            hide: Some(cb_quiet_hide),
        };
        assert_eq!(ime_run(shim, &bundle, user_data), IME_ERROR_NONE);

        assert_eq!(
            engine.preedits,
            vec![(
                "ka".to_string(),
                vec![
                    CoreAttribute {
                        start: 0,
                        length: 1,
                        kind: 1,
                        value: 1,
                    },
                    CoreAttribute {
                        start: 1,
                        length: 1,
                        kind: 1,
                        value: 2,
                    },
                ]
            )]
        );
        ime_shim_free(shim);
    }
}

#[test]
fn test_accessors_fail_when_idle() {
    unsafe {
        let mut engine = TestEngine::default();
        let ops = engine_ops(&mut engine);
        let policy = policy_ops(allow_check);
        let shim = ime_shim_new(&ops, &policy);

        let context = InputContext::from_raw(&RawInputContext::default());
        let mut layout = 0u32;
        assert_eq!(ime_context_get_layout(shim, &context, &mut layout), -3);
        assert_eq!(ime_context_get_layout(ptr::null_mut(), &context, &mut layout), -1);
        assert_eq!(ime_context_get_layout(shim, ptr::null(), &mut layout), -1);
        assert_eq!(ime_context_get_layout(shim, &context, ptr::null_mut()), -1);

        ime_shim_free(shim);
    }
}

#[test]
fn test_denied_policy_blocks_the_c_surface() {
    unsafe {
        let mut engine = TestEngine::default();
        let ops = engine_ops(&mut engine);
        let policy = policy_ops(deny_check);
        let shim = ime_shim_new(&ops, &policy);

        assert_eq!(
            ime_event_set_focus_in_cb(shim, Some(cb_focus_in), ptr::null_mut()),
            -5
        );
        assert_eq!(ime_run(shim, &full_bundle(), ptr::null_mut()), -5);

        ime_shim_free(shim);
    }
}
