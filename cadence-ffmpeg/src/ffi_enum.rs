//! Enums extracted from the generated bindings at build time.
//!
//! Bindgen constifies FFmpeg's enums; `build.rs` turns the two the wrapper
//! passes around by value back into real Rust enums.

include!(concat!(env!("OUT_DIR"), "/codec_id.rs"));
include!(concat!(env!("OUT_DIR"), "/sample_fmt.rs"));
