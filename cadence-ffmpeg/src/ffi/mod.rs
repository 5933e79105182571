//! Raw declarations generated from `ffi/ffmpeg.h`.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));

use std::ffi::c_int;

// The AVERROR_* family expands through FFERRTAG, which bindgen cannot
// evaluate, so the codes the wrapper branches on are computed here.
const fn fferrtag(a: u8, b: u8, c: u8, d: u8) -> c_int {
    -((a as c_int) | (b as c_int) << 8 | (c as c_int) << 16 | (d as c_int) << 24)
}

pub const AVERROR_EOF: c_int = fferrtag(b'E', b'O', b'F', b' ');
pub const AVERROR_EAGAIN: c_int = -libc::EAGAIN;

pub fn is_eof(code: c_int) -> bool {
    code == AVERROR_EOF
}

pub fn is_eagain(code: c_int) -> bool {
    code == AVERROR_EAGAIN
}

#[test]
fn test_linked_library_versions() {
    assert!(unsafe { avformat_version() } > 0);
    assert!(unsafe { avcodec_version() } > 0);
    assert!(unsafe { avfilter_version() } > 0);
}
