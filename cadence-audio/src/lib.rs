//! One-shot, in-memory audio transcoding on top of `cadence-ffmpeg`.
//!
//! Feed bytes in, get bytes in another container/codec out, optionally
//! running a filter chain, resampling, trimming and tagging on the way.

mod format;
mod processor;

pub use format::OutputFormat;
pub use processor::{AudioProcessor, ProcessOptions};
