use crate::avframe::AVFrame;
use crate::ffi::{
    av_audio_fifo_alloc, av_audio_fifo_read, av_audio_fifo_size, av_audio_fifo_space,
    av_audio_fifo_write,
};
use crate::ffi_enum::AVSampleFormat;
use anyhow::{bail, Result};
use std::ffi::c_void;

wrap!(
    AVAudioFifo drop av_audio_fifo_free
);

unsafe impl Send for AVAudioFifo {}

impl AVAudioFifo {
    /// Allocate a sample queue. The capacity only seeds the allocation;
    /// writes grow it as needed.
    pub fn new(format: AVSampleFormat, channels: i32, capacity: i32) -> Result<Self> {
        let inner = unsafe { av_audio_fifo_alloc(format as i32, channels, capacity.max(1)) };

        if inner.is_null() {
            bail!("Failed to allocate memory by 'av_audio_fifo_alloc'.");
        }

        Ok(Self { inner })
    }

    /// Queue every sample of the frame. Returns the sample count written.
    pub fn write_frame(&mut self, frame: &AVFrame) -> Result<i32> {
        let written = native! {
            av_audio_fifo_write(
                self.inner,
                frame.extended_data as *mut *mut c_void,
                frame.nb_samples(),
            )
        };

        Ok(written)
    }

    /// Dequeue up to `nb_samples` into an allocated frame. The frame's
    /// sample count is set to what actually came out.
    pub fn read_frame(&mut self, frame: &mut AVFrame, nb_samples: i32) -> Result<i32> {
        let read = native! {
            av_audio_fifo_read(
                self.inner,
                frame.extended_data as *mut *mut c_void,
                nb_samples,
            )
        };

        frame.nb_samples = read;

        Ok(read)
    }

    /// Samples currently queued.
    pub fn size(&self) -> i32 {
        unsafe { av_audio_fifo_size(self.inner) }
    }

    /// Samples that fit without reallocation.
    pub fn space(&self) -> i32 {
        unsafe { av_audio_fifo_space(self.inner) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel_layout::ChannelLayout;

    #[test]
    fn test_fifo_accounting() {
        let stereo = ChannelLayout::default_for(2);
        let mut fifo = AVAudioFifo::new(AVSampleFormat::Fltp, 2, 1).unwrap();
        assert_eq!(fifo.size(), 0);

        let mut frame = AVFrame::new().unwrap();
        frame
            .alloc_samples(AVSampleFormat::Fltp, &stereo, 44100, 1024)
            .unwrap();
        for channel in 0..2 {
            let plane = frame.plane_mut::<f32>(channel).unwrap();
            for (i, sample) in plane.iter_mut().enumerate() {
                *sample = i as f32;
            }
        }

        assert_eq!(fifo.write_frame(&frame).unwrap(), 1024);
        assert_eq!(fifo.size(), 1024);

        let mut chunk = AVFrame::new().unwrap();
        chunk
            .alloc_samples(AVSampleFormat::Fltp, &stereo, 44100, 600)
            .unwrap();
        assert_eq!(fifo.read_frame(&mut chunk, 600).unwrap(), 600);
        assert_eq!(chunk.nb_samples(), 600);
        assert_eq!(fifo.size(), 424);

        // Samples come out in order.
        let plane = chunk.plane::<f32>(0).unwrap();
        assert_eq!(plane[0], 0.0);
        assert_eq!(plane[599], 599.0);

        // Short read at the tail.
        chunk.release();
        chunk
            .alloc_samples(AVSampleFormat::Fltp, &stereo, 44100, 600)
            .unwrap();
        assert_eq!(fifo.read_frame(&mut chunk, 600).unwrap(), 424);
        assert_eq!(chunk.nb_samples(), 424);
        assert_eq!(fifo.size(), 0);
    }
}
