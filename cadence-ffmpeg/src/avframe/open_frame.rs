use crate::avframe::AVFrame;
use crate::channel_layout::ChannelLayout;
use crate::ffi::{av_channel_layout_copy, av_frame_alloc, av_frame_get_buffer, av_frame_unref};
use crate::ffi_enum::AVSampleFormat;
use anyhow::{bail, Result};

impl AVFrame {
    pub fn new() -> Result<Self> {
        let frame = unsafe { av_frame_alloc() };

        if frame.is_null() {
            bail!("Failed to allocate memory by 'av_frame_alloc'.");
        }

        Ok(AVFrame { inner: frame })
    }

    /// Describe the audio this frame will carry without allocating buffers.
    /// The resampler allocates on demand when converting into such a frame.
    pub fn set_audio_parameters(
        &mut self,
        format: AVSampleFormat,
        layout: &ChannelLayout,
        sample_rate: i32,
    ) -> Result<()> {
        self.format = format as i32;
        self.sample_rate = sample_rate;

        ffmpeg! {
            av_channel_layout_copy(&mut self.ch_layout, layout.as_ptr())
        }

        Ok(())
    }

    /// Allocate sample buffers for `nb_samples` of audio.
    pub fn alloc_samples(
        &mut self,
        format: AVSampleFormat,
        layout: &ChannelLayout,
        sample_rate: i32,
        nb_samples: i32,
    ) -> Result<()> {
        self.set_audio_parameters(format, layout, sample_rate)?;
        self.nb_samples = nb_samples;

        ffmpeg! {
            av_frame_get_buffer(self.inner, 0) or "Failed to allocate sample buffers"
        }

        Ok(())
    }

    /// Unreference the data, keeping the frame itself reusable.
    pub fn release(&mut self) {
        unsafe {
            av_frame_unref(self.inner);
        }
    }
}
