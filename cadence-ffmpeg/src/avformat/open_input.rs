use crate::av_dict;
use crate::av_io_context::{AVIOContext, MemoryReader};
use crate::avformat::{AVInputContext, AVInputContextRaw};
use crate::avpacket::AVPacket;
use crate::ffi::{
    av_read_frame, avformat_alloc_context, avformat_open_input, AVDictionary, AVInputFormat,
    AVFMT_FLAG_CUSTOM_IO,
};
use crate::util::error_handler::check_drain;
use anyhow::{anyhow, bail, Result};
use std::ffi::{c_int, CString};
use std::path::Path;
use std::ptr::{null, null_mut};

pub trait OpenInputToAVInputContext {
    fn open_file(path: impl AsRef<Path>, format: Option<&AVInputFormat>) -> Result<Self>
    where
        Self: Sized;

    fn open_buffer(data: Vec<u8>) -> Result<Self>
    where
        Self: Sized;
}

impl OpenInputToAVInputContext for AVInputContext {
    fn open_file(path: impl AsRef<Path>, format: Option<&AVInputFormat>) -> Result<Self> {
        let path = CString::new(
            path.as_ref()
                .to_str()
                .ok_or(anyhow!("Fail to parse path."))?,
        )?;

        let mut inner = unsafe { avformat_alloc_context() };
        if inner.is_null() {
            bail!("Failed to allocate memory by 'avformat_alloc_context'.");
        }

        // On failure avformat_open_input frees the context itself.
        ffmpeg! {
            avformat_open_input(
                &mut inner as *mut *mut AVInputContextRaw,
                path.as_ptr(),
                format
                    .map(|x| x as *const AVInputFormat)
                    .unwrap_or_else(|| null::<AVInputFormat>()),
                null_mut::<*mut AVDictionary>(),
            ) or "Failed to open input file"
        }

        Ok(AVInputContext {
            inner,
            io: None,
            reader: None,
            opened: false,
            scanned_stream: Default::default(),
        })
    }

    /// Open an in-memory buffer, probing the container format from content.
    fn open_buffer(data: Vec<u8>) -> Result<Self> {
        let mut reader = Box::new(MemoryReader::new(data));
        let io = AVIOContext::reading(&mut reader)?;

        let mut inner = unsafe { avformat_alloc_context() };
        if inner.is_null() {
            bail!("Failed to allocate memory by 'avformat_alloc_context'.");
        }

        unsafe {
            (*inner).pb = io.inner;
            (*inner).flags |= AVFMT_FLAG_CUSTOM_IO as c_int;
        }

        ffmpeg! {
            avformat_open_input(
                &mut inner as *mut *mut AVInputContextRaw,
                null(),
                null::<AVInputFormat>(),
                null_mut::<*mut AVDictionary>(),
            ) or "Failed to probe input buffer"
        }

        log::trace!("Probed {} byte input buffer", reader.len());

        Ok(AVInputContext {
            inner,
            io: Some(io),
            reader: Some(reader),
            opened: false,
            scanned_stream: Default::default(),
        })
    }
}

impl AVInputContext {
    /// Read the next packet. `Ok(false)` at end of input.
    pub fn read_frame(&mut self, packet: &mut AVPacket) -> Result<bool> {
        let code = unsafe { av_read_frame(self.inner, packet.inner) };
        check_drain(code, "av_read_frame")
    }

    /// Container-level metadata tag, e.g. "title".
    pub fn metadata(&self, key: &str) -> Option<String> {
        av_dict::entry_value(self.metadata, key)
    }
}

#[test]
fn test_missing_file_is_rejected() {
    assert!(AVInputContext::open_file("/no/such/input.wav", None).is_err());
}

#[test]
fn test_garbage_buffer_is_rejected() {
    assert!(AVInputContext::open_buffer(vec![0u8; 256]).is_err());
}
