use crate::ffi::{av_strerror, is_eagain, is_eof};
use anyhow::{bail, Result};
use std::ffi::{c_char, c_int, CStr};

/// Human-readable text for an FFmpeg error code.
pub fn error_string(code: c_int) -> String {
    let mut buf = [0 as c_char; 256];
    unsafe {
        av_strerror(code, buf.as_mut_ptr(), buf.len());
        CStr::from_ptr(buf.as_ptr()).to_string_lossy().into_owned()
    }
}

/// Check a native return value, keeping non-negative results.
pub(crate) fn check(code: c_int, operation: &'static str) -> Result<c_int> {
    if code < 0 {
        bail!(
            "Error when calling native function `{}`, error code: {}, error message: {}.",
            operation,
            code,
            error_string(code)
        );
    }

    Ok(code)
}

/// Check a send/receive style return value: `Ok(true)` when data moved,
/// `Ok(false)` on EAGAIN or EOF.
pub(crate) fn check_drain(code: c_int, operation: &'static str) -> Result<bool> {
    if code >= 0 {
        return Ok(true);
    }

    if is_eagain(code) || is_eof(code) {
        return Ok(false);
    }

    bail!(
        "Error when calling native function `{}`, error code: {}, error message: {}.",
        operation,
        code,
        error_string(code)
    );
}

#[test]
fn test_error_string() {
    let message = error_string(crate::ffi::AVERROR_EOF);
    assert!(message.contains("End of file"), "got: {}", message);
    assert!(is_eof(crate::ffi::AVERROR_EOF));
    assert!(is_eagain(crate::ffi::AVERROR_EAGAIN));
}

#[test]
fn test_check_drain() {
    assert!(check_drain(0, "test").unwrap());
    assert!(!check_drain(crate::ffi::AVERROR_EOF, "test").unwrap());
    assert!(!check_drain(crate::ffi::AVERROR_EAGAIN, "test").unwrap());
    assert!(check_drain(-22, "test").is_err());
}
