use std::collections::HashMap;

pub mod av_stream;
pub mod open_input;
pub mod open_output;

#[repr(i32)]
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum AVMediaType {
    UNKNOWN = -1,
    VIDEO = 0,
    AUDIO = 1,
    DATA = 2,
    SUBTITLE = 3,
    ATTACHMENT = 4,
    NB = 5,
}

wrap!(
    AVInputContext as AVFormatContext {
        io: Option<crate::av_io_context::AVIOContext>,
        reader: Option<Box<crate::av_io_context::MemoryReader>>,
        opened: bool,
        scanned_stream: HashMap<AVMediaType, Vec<u32>>,
    } drop2 avformat_close_input,
    AVOutputContext as AVFormatContext {
        io: Option<crate::av_io_context::AVIOContext>,
        writer: Option<Box<crate::av_io_context::MemoryWriter>>,
        header_written: bool,
    } drop avformat_free_context
);

unsafe impl Send for AVInputContext {}
unsafe impl Send for AVOutputContext {}
