use crate::avframe::AVFrame;
use crate::channel_layout::ChannelLayout;
use crate::ffi::{swr_alloc_set_opts2, swr_convert_frame, swr_init};
use crate::ffi_enum::AVSampleFormat;
use crate::swr::{SwrContext, SwrContextRaw};
use crate::util::error_handler::check;
use anyhow::Result;
use std::ptr::{null, null_mut};

impl SwrContext {
    /// Allocate and initialize a resampler for the given conversion.
    pub fn new(
        in_layout: &ChannelLayout,
        in_fmt: AVSampleFormat,
        in_rate: i32,
        out_layout: &ChannelLayout,
        out_fmt: AVSampleFormat,
        out_rate: i32,
    ) -> Result<Self> {
        let mut inner = null_mut::<SwrContextRaw>();

        check(
            unsafe {
                swr_alloc_set_opts2(
                    &mut inner as *mut *mut SwrContextRaw,
                    out_layout.as_ptr(),
                    out_fmt as i32,
                    out_rate,
                    in_layout.as_ptr(),
                    in_fmt as i32,
                    in_rate,
                    0,
                    null_mut(),
                )
            },
            "swr_alloc_set_opts2",
        )?;

        let mut swr = SwrContext { inner };

        ffmpeg! {
            swr_init(swr.inner) or "Failed to initialize resampler"
        }

        log::trace!("Resampler configured: {} Hz -> {} Hz", in_rate, out_rate);

        Ok(swr)
    }

    /// Convert into `output`, which must carry the target format, layout and
    /// rate; sample buffers are allocated on demand.
    pub fn convert_frame(&mut self, output: &mut AVFrame, input: &AVFrame) -> Result<()> {
        ffmpeg! {
            swr_convert_frame(self.inner, output.inner, input.inner.cast_const())
        }

        Ok(())
    }

    /// Drain buffered tail samples into `output`.
    pub fn flush(&mut self, output: &mut AVFrame) -> Result<()> {
        ffmpeg! {
            swr_convert_frame(self.inner, output.inner, null())
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downsample_ratio() {
        let stereo = ChannelLayout::default_for(2);
        let mono = ChannelLayout::default_for(1);

        let mut swr = SwrContext::new(
            &stereo,
            AVSampleFormat::Fltp,
            44100,
            &mono,
            AVSampleFormat::S16,
            22050,
        )
        .unwrap();

        let mut input = AVFrame::new().unwrap();
        input
            .alloc_samples(AVSampleFormat::Fltp, &stereo, 44100, 1024)
            .unwrap();
        for channel in 0..2 {
            input.plane_mut::<f32>(channel).unwrap().fill(0.25);
        }

        let mut output = AVFrame::new().unwrap();
        output
            .set_audio_parameters(AVSampleFormat::S16, &mono, 22050)
            .unwrap();
        swr.convert_frame(&mut output, &input).unwrap();
        let converted = output.nb_samples();
        output.release();

        output
            .set_audio_parameters(AVSampleFormat::S16, &mono, 22050)
            .unwrap();
        swr.flush(&mut output).unwrap();
        let tail = output.nb_samples();

        let total = converted + tail;
        assert!((450..=580).contains(&total), "total samples: {}", total);
    }

    #[test]
    fn test_mismatched_input_rejected() {
        let mono = ChannelLayout::default_for(1);
        let mut swr = SwrContext::new(
            &mono,
            AVSampleFormat::S16,
            8000,
            &mono,
            AVSampleFormat::S16,
            8000,
        )
        .unwrap();

        // Frame advertises a different format than the resampler expects;
        // swr_convert_frame reports input changed.
        let stereo = ChannelLayout::default_for(2);
        let mut input = AVFrame::new().unwrap();
        input
            .alloc_samples(AVSampleFormat::Fltp, &stereo, 44100, 64)
            .unwrap();

        let mut output = AVFrame::new().unwrap();
        output
            .set_audio_parameters(AVSampleFormat::S16, &mono, 8000)
            .unwrap();

        assert!(swr.convert_frame(&mut output, &input).is_err());
    }
}
