use crate::avframe::AVFrame;
use crate::channel_layout::ChannelLayout;
use crate::ffi_enum::AVSampleFormat;
use crate::samplefmt;
use anyhow::{ensure, Result};
use std::slice;

impl AVFrame {
    pub fn nb_samples(&self) -> i32 {
        self.nb_samples
    }

    pub fn sample_rate(&self) -> i32 {
        self.sample_rate
    }

    pub fn nb_channels(&self) -> i32 {
        self.ch_layout.nb_channels
    }

    pub fn sample_fmt(&self) -> Result<AVSampleFormat> {
        Ok(AVSampleFormat::try_from(self.format)?)
    }

    pub fn ch_layout(&self) -> Result<ChannelLayout> {
        ChannelLayout::copy_from(&self.ch_layout)
    }

    pub fn pts(&self) -> i64 {
        self.pts
    }

    pub fn set_pts(&mut self, pts: i64) {
        self.pts = pts;
    }

    fn plane_len(&self, format: AVSampleFormat) -> usize {
        if samplefmt::is_planar(format) {
            self.nb_samples as usize
        } else {
            (self.nb_samples * self.nb_channels()) as usize
        }
    }

    /// View one plane as samples. For packed formats plane 0 holds all
    /// channels interleaved.
    pub fn plane<T: Copy>(&self, index: usize) -> Result<&[T]> {
        let format = self.sample_fmt()?;
        ensure!(
            std::mem::size_of::<T>() == samplefmt::bytes_per_sample(format),
            "Sample type width does not match format {:?}",
            format
        );
        ensure!(!self.extended_data.is_null(), "Frame has no sample buffers");

        unsafe {
            let data = *self.extended_data.add(index);
            ensure!(!data.is_null(), "Frame plane {} is not allocated", index);
            Ok(slice::from_raw_parts(data as *const T, self.plane_len(format)))
        }
    }

    pub fn plane_mut<T: Copy>(&mut self, index: usize) -> Result<&mut [T]> {
        let format = self.sample_fmt()?;
        ensure!(
            std::mem::size_of::<T>() == samplefmt::bytes_per_sample(format),
            "Sample type width does not match format {:?}",
            format
        );
        ensure!(!self.extended_data.is_null(), "Frame has no sample buffers");

        let len = self.plane_len(format);
        unsafe {
            let data = *self.extended_data.add(index);
            ensure!(!data.is_null(), "Frame plane {} is not allocated", index);
            Ok(slice::from_raw_parts_mut(data as *mut T, len))
        }
    }
}

#[test]
fn test_alloc_and_fill_planar() {
    use crate::ffi_enum::AVSampleFormat;

    let stereo = ChannelLayout::default_for(2);
    let mut frame = AVFrame::new().unwrap();
    frame
        .alloc_samples(AVSampleFormat::Fltp, &stereo, 44100, 1024)
        .unwrap();

    assert_eq!(frame.nb_samples(), 1024);
    assert_eq!(frame.sample_rate(), 44100);
    assert_eq!(frame.nb_channels(), 2);
    assert_eq!(frame.sample_fmt().unwrap(), AVSampleFormat::Fltp);

    for channel in 0..2 {
        let plane = frame.plane_mut::<f32>(channel).unwrap();
        assert_eq!(plane.len(), 1024);
        for (i, sample) in plane.iter_mut().enumerate() {
            *sample = i as f32 / 1024.0;
        }
    }

    let plane = frame.plane::<f32>(1).unwrap();
    assert!((plane[512] - 0.5).abs() < 1e-6);

    // Wrong sample width is rejected.
    assert!(frame.plane::<i16>(0).is_err());

    frame.release();
    assert_eq!(frame.nb_samples(), 0);
}

#[test]
fn test_packed_plane_len() {
    use crate::ffi_enum::AVSampleFormat;

    let stereo = ChannelLayout::default_for(2);
    let mut frame = AVFrame::new().unwrap();
    frame
        .alloc_samples(AVSampleFormat::S16, &stereo, 48000, 256)
        .unwrap();

    // Packed: one plane, channels interleaved.
    assert_eq!(frame.plane::<i16>(0).unwrap().len(), 512);
}
