use crate::av_io_context::{AVIOContext, MemoryWriter};
use crate::avcodec::{AVCodec, AVCodecContext};
use crate::avformat::{AVOutputContext, AVOutputContextRaw};
use crate::avpacket::AVPacket;
use crate::ffi::{
    av_dict_set, av_interleaved_write_frame, av_packet_rescale_ts, av_write_trailer,
    avformat_alloc_output_context2, avformat_new_stream, avformat_write_header,
};
use anyhow::{bail, Result};
use std::ffi::CString;
use std::ptr::{null, null_mut};

impl AVOutputContext {
    /// Allocate a muxer for the named container, writing into memory.
    pub fn open(format_name: &str) -> Result<Self> {
        let format_c = CString::new(format_name)?;

        let mut inner: *mut AVOutputContextRaw = null_mut();
        ffmpeg! {
            avformat_alloc_output_context2(
                &mut inner as *mut *mut AVOutputContextRaw,
                null_mut(),
                format_c.as_ptr(),
                null(),
            ) or "Failed to allocate output context"
        }

        if inner.is_null() {
            bail!("Unsupported output format '{}'", format_name);
        }

        let mut output = AVOutputContext {
            inner,
            io: None,
            writer: None,
            header_written: false,
        };

        let mut writer = Box::new(MemoryWriter::new());
        let io = AVIOContext::writing(&mut writer)?;
        output.pb = io.inner;
        output.io = Some(io);
        output.writer = Some(writer);

        Ok(output)
    }

    /// Add an audio stream configured from an opened encoder.
    /// Returns the stream index.
    pub fn add_audio_stream(&mut self, encoder: &AVCodecContext, codec: &AVCodec) -> Result<u32> {
        let stream = unsafe { avformat_new_stream(self.inner, codec.inner.cast_const()) };
        if stream.is_null() {
            bail!("Failed to allocate memory by 'avformat_new_stream'.");
        }

        encoder.apply_to_stream(stream)?;

        Ok(unsafe { (*stream).index as u32 })
    }

    /// Container-level metadata tag.
    pub fn set_metadata(&mut self, key: &str, value: &str) -> Result<()> {
        let key = CString::new(key)?;
        let value = CString::new(value)?;

        ffmpeg! {
            av_dict_set(
                &mut self.metadata,
                key.as_ptr(),
                value.as_ptr(),
                0,
            )
        }

        Ok(())
    }

    pub fn write_header(&mut self) -> Result<()> {
        ffmpeg! {
            avformat_write_header(self.inner, null_mut()) or "Failed to write container header"
        }
        self.header_written = true;

        Ok(())
    }

    /// Rescale the packet from the encoder's time base to the stream's and
    /// write it interleaved.
    pub fn write_packet(
        &mut self,
        packet: &mut AVPacket,
        encoder: &AVCodecContext,
        stream_index: u32,
    ) -> Result<()> {
        let stream = unsafe { *self.streams.add(stream_index as usize) };

        unsafe {
            av_packet_rescale_ts(packet.inner, encoder.time_base, (*stream).time_base);
            (*packet.inner).stream_index = stream_index as i32;
        }

        ffmpeg! {
            av_interleaved_write_frame(self.inner, packet.inner)
        }

        Ok(())
    }

    pub fn write_trailer(&mut self) -> Result<()> {
        if self.header_written {
            ffmpeg! {
                av_write_trailer(self.inner)
            }
        }

        Ok(())
    }

    /// Flush the AVIO layer and take the muxed bytes.
    pub fn take_output(&mut self) -> Vec<u8> {
        if let Some(io) = self.io.as_mut() {
            io.flush();
        }

        self.writer
            .as_mut()
            .map(|writer| writer.take())
            .unwrap_or_default()
    }
}

#[test]
fn test_open_known_and_unknown_formats() {
    assert!(AVOutputContext::open("wav").is_ok());
    assert!(AVOutputContext::open("flac").is_ok());
    assert!(AVOutputContext::open("definitely_not_a_muxer").is_err());
}
