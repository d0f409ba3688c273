//! FFI bindings for Synheart Balance
//!
//! This module provides C-compatible functions for calling Balance from other languages.
//! All functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `balance_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::pipeline::{day_to_derived_json, range_to_summary_json, DayProcessor};

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

/// Read two required JSON arguments, recording which one was invalid
unsafe fn read_json_pair(
    first: *const c_char,
    first_name: &str,
    second: *const c_char,
    second_name: &str,
) -> Option<(String, String)> {
    let Some(a) = cstr_to_string(first) else {
        set_last_error(&format!("Invalid {first_name} string pointer"));
        return None;
    };
    let Some(b) = cstr_to_string(second) else {
        set_last_error(&format!("Invalid {second_name} string pointer"));
        return None;
    };
    Some((a, b))
}

// ============================================================================
// Stateless API
// ============================================================================

/// Compute derived stats for one day.
///
/// # Safety
/// - `day_json` and `profile_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `balance_free_string`.
/// - Returns NULL on error; call `balance_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn balance_day_derived(
    day_json: *const c_char,
    profile_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some((day, profile)) = read_json_pair(day_json, "day JSON", profile_json, "profile JSON")
    else {
        return ptr::null_mut();
    };

    match day_to_derived_json(day, profile) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Compute a range summary for a document of day records.
///
/// # Safety
/// - `days_json` and `profile_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `balance_free_string`.
/// - Returns NULL on error; call `balance_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn balance_range_summary(
    days_json: *const c_char,
    profile_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some((days, profile)) = read_json_pair(days_json, "days JSON", profile_json, "profile JSON")
    else {
        return ptr::null_mut();
    };

    match range_to_summary_json(days, profile) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Profile-bound Processor API
// ============================================================================

/// Opaque handle to a DayProcessor
pub struct DayProcessorHandle {
    processor: DayProcessor,
}

/// Create a processor bound to a profile.
///
/// # Safety
/// - `profile_json` must be a valid null-terminated C string.
/// - Returns a pointer that must be freed with `balance_processor_free`.
/// - Returns NULL on error.
#[no_mangle]
pub unsafe extern "C" fn balance_processor_new(
    profile_json: *const c_char,
) -> *mut DayProcessorHandle {
    clear_last_error();

    let Some(profile) = cstr_to_string(profile_json) else {
        set_last_error("Invalid profile JSON string pointer");
        return ptr::null_mut();
    };

    match DayProcessor::from_json(&profile) {
        Ok(processor) => Box::into_raw(Box::new(DayProcessorHandle { processor })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `balance_processor_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn balance_processor_free(processor: *mut DayProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Compute derived stats for one day with a profile-bound processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `balance_processor_new`.
/// - `day_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `balance_free_string`.
/// - Returns NULL on error; call `balance_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn balance_processor_process(
    processor: *const DayProcessorHandle,
    day_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    let Some(day) = cstr_to_string(day_json) else {
        set_last_error("Invalid day JSON string pointer");
        return ptr::null_mut();
    };

    match handle.processor.process_json(&day) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Balance functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Balance function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn balance_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next Balance function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn balance_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Balance library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn balance_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn sample_day_json() -> CString {
        CString::new(
            r#"{
                "date": "2024-01-15",
                "activityMode": "advanced_full",
                "activities": [{ "id": "w1", "type": "walk", "distanceKm": 2, "durationMin": 30 }],
                "steps": 3000,
                "survey": { "subjective": 60 },
                "meals": [{ "mealType": "lunch", "totalKcal": 500 }]
            }"#,
        )
        .unwrap()
    }

    fn sample_profile_json() -> CString {
        CString::new(r#"{ "bmr": 1800, "weightKg": 80 }"#).unwrap()
    }

    #[test]
    fn test_ffi_day_derived() {
        let day = sample_day_json();
        let profile = sample_profile_json();

        unsafe {
            let result = balance_day_derived(day.as_ptr(), profile.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            let payload: serde_json::Value = serde_json::from_str(result_str).unwrap();
            assert_eq!(payload["tdeeBreakdown"]["eat"], 87);
            assert_eq!(payload["totalIntake"], 500);

            balance_free_string(result);
        }
    }

    #[test]
    fn test_ffi_range_summary() {
        let days = CString::new("{\"activityFactor\": 1.0}\n{\"activityFactor\": 1.5}").unwrap();
        let profile = CString::new(r#"{ "bmr": 2000 }"#).unwrap();

        unsafe {
            let result = balance_range_summary(days.as_ptr(), profile.as_ptr());
            assert!(!result.is_null());

            let payload: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(payload["days"], 2);
            assert_eq!(payload["avgTdee"], 2500);

            balance_free_string(result);
        }
    }

    #[test]
    fn test_ffi_processor_lifecycle() {
        let profile = sample_profile_json();
        let day = sample_day_json();

        unsafe {
            let processor = balance_processor_new(profile.as_ptr());
            assert!(!processor.is_null());

            let first = balance_processor_process(processor, day.as_ptr());
            let second = balance_processor_process(processor, day.as_ptr());
            assert!(!first.is_null() && !second.is_null());
            assert_eq!(CStr::from_ptr(first), CStr::from_ptr(second));

            balance_free_string(first);
            balance_free_string(second);
            balance_processor_free(processor);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let invalid = CString::new("not json").unwrap();
        let profile = sample_profile_json();

        unsafe {
            let result = balance_day_derived(invalid.as_ptr(), profile.as_ptr());
            assert!(result.is_null());

            let error = balance_last_error();
            assert!(!error.is_null());
            assert!(!CStr::from_ptr(error).to_str().unwrap().is_empty());

            let null_processor = balance_processor_process(ptr::null(), invalid.as_ptr());
            assert!(null_processor.is_null());

            let null_arg = balance_day_derived(ptr::null(), profile.as_ptr());
            assert!(null_arg.is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = balance_version();
            assert!(!version.is_null());
            assert!(!CStr::from_ptr(version).to_str().unwrap().is_empty());
        }
    }
}
