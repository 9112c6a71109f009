//! FFI bindings for Symptom Flux
//!
//! This module provides C-compatible functions for driving a tracker session from
//! a mobile or web shell. All functions use C strings (null-terminated) and
//! return allocated memory that must be freed by the caller using
//! `tracker_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::{Local, NaiveDate};

use crate::config::TrackerConfig;
use crate::cycle::resolve_phase;
use crate::error::TrackerError;
use crate::pipeline::TrackerSession;
use crate::types::{CyclePhase, SymptomKey};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Hand a JSON result back across the boundary, recording any error
fn json_result(result: Result<String, TrackerError>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Capture date from an optional `YYYY-MM-DD` string; NULL means today
unsafe fn capture_date(date: *const c_char) -> Result<NaiveDate, TrackerError> {
    if date.is_null() {
        return Ok(Local::now().date_naive());
    }
    let text = cstr_to_string(date)
        .ok_or_else(|| TrackerError::DateParseError("Invalid date string pointer".to_string()))?;
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| TrackerError::DateParseError(format!("{text}: {e}")))
}

// ============================================================================
// Stateless API
// ============================================================================

/// Resolve a cycle-day label to its phase name.
///
/// # Safety
/// - `cycle_day` must be a valid null-terminated C string, or NULL (treated as empty).
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn tracker_resolve_phase(cycle_day: *const c_char) -> *const c_char {
    let label = cstr_to_string(cycle_day).unwrap_or_default();
    let name: &'static [u8] = match resolve_phase(&label) {
        CyclePhase::Follicular => b"Follicular\0",
        CyclePhase::Ovulation => b"Ovulation\0",
        CyclePhase::Luteal => b"Luteal\0",
        CyclePhase::Menstrual => b"Menstrual\0",
        CyclePhase::Unknown => b"\0",
    };
    name.as_ptr() as *const c_char
}

// ============================================================================
// Session API
// ============================================================================

/// Opaque handle to a TrackerSession
pub struct TrackerSessionHandle {
    session: TrackerSession,
}

/// Create a new session with default configuration.
///
/// # Safety
/// - Returns a pointer to a newly allocated session.
/// - Must be freed with `tracker_session_free`.
#[no_mangle]
pub unsafe extern "C" fn tracker_session_new() -> *mut TrackerSessionHandle {
    clear_last_error();
    Box::into_raw(Box::new(TrackerSessionHandle {
        session: TrackerSession::new(),
    }))
}

/// Create a new session from a TOML configuration document.
///
/// # Safety
/// - `config_toml` must be a valid null-terminated C string.
/// - Must be freed with `tracker_session_free`.
/// - Returns NULL on error; call `tracker_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn tracker_session_with_config(
    config_toml: *const c_char,
) -> *mut TrackerSessionHandle {
    clear_last_error();

    let toml = match cstr_to_string(config_toml) {
        Some(s) => s,
        None => {
            set_last_error("Invalid config string pointer");
            return ptr::null_mut();
        }
    };

    match TrackerConfig::from_toml_str(&toml) {
        Ok(config) => Box::into_raw(Box::new(TrackerSessionHandle {
            session: TrackerSession::with_config(config),
        })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `tracker_session_new` or
///   `tracker_session_with_config`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn tracker_session_free(session: *mut TrackerSessionHandle) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Normalize a raw entry and append it to the session.
///
/// # Safety
/// - `session` must be a valid session pointer.
/// - `json` must be a valid null-terminated C string.
/// - `date` is a `YYYY-MM-DD` C string used when the entry has no date, or NULL
///   for today.
/// - Returns the stored entry as JSON; free it with `tracker_free_string`.
/// - Returns NULL on error; call `tracker_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn tracker_session_log_entry(
    session: *mut TrackerSessionHandle,
    json: *const c_char,
    date: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let handle = &mut *session;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let result = capture_date(date).and_then(|day| {
        let entry = handle.session.log_entry_json(&json_str, day)?;
        Ok(serde_json::to_string(entry)?)
    });
    json_result(result)
}

/// Dashboard report for the session.
///
/// # Safety
/// - `session` must be a valid session pointer.
/// - Returns a newly allocated string that must be freed with `tracker_free_string`.
/// - Returns NULL on error; call `tracker_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn tracker_session_dashboard(
    session: *const TrackerSessionHandle,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    json_result((*session).session.dashboard_json())
}

/// Single-symptom chart report over the session's wide window.
///
/// # Safety
/// - `session` must be a valid session pointer.
/// - `symptom` must be a valid null-terminated C string naming a symptom.
/// - Returns a newly allocated string that must be freed with `tracker_free_string`.
/// - Returns NULL on error; call `tracker_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn tracker_session_symptom_chart(
    session: *const TrackerSessionHandle,
    symptom: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let symptom_str = match cstr_to_string(symptom) {
        Some(s) => s,
        None => {
            set_last_error("Invalid symptom string pointer");
            return ptr::null_mut();
        }
    };

    let handle = &*session;
    let result = symptom_str
        .parse::<SymptomKey>()
        .and_then(|key| handle.session.symptom_chart_json(key));
    json_result(result)
}

/// All-symptom overview chart report.
///
/// # Safety
/// - `session` must be a valid session pointer.
/// - Returns a newly allocated string that must be freed with `tracker_free_string`.
/// - Returns NULL on error; call `tracker_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn tracker_session_overview_chart(
    session: *const TrackerSessionHandle,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    json_result((*session).session.overview_chart_json())
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by tracker functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a tracker function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn tracker_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next tracker call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn tracker_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn tracker_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
