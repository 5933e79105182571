//! Safe wrappers over the FFmpeg libav* audio stack.
//!
//! The raw declarations come from bindgen over `ffi/ffmpeg.h`; every other
//! module wraps one of the aggregated subsystems with owned pointers and
//! `Result`-based error mapping.

#[macro_use]
mod util;

pub mod ffi;
pub mod ffi_enum;

pub mod audio_fifo;
pub mod av_dict;
pub mod av_io_context;
pub mod av_mem_alloc;
pub mod av_opt;
pub mod avcodec;
pub mod avfilter_context;
pub mod avfilter_graph;
pub mod avformat;
pub mod avframe;
pub mod avpacket;
pub mod channel_layout;
pub mod samplefmt;
pub mod swr;

pub use util::error_handler::error_string;
