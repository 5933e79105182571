use crate::av_dict::AVDictionary;
use crate::avcodec::{AVCodec, AVCodecContext};
use crate::avformat::AVInputContext;
use crate::avframe::AVFrame;
use crate::avpacket::AVPacket;
use crate::channel_layout::ChannelLayout;
use crate::ffi::{
    av_channel_layout_copy, avcodec_alloc_context3, avcodec_open2, avcodec_parameters_to_context,
    avcodec_receive_frame, avcodec_receive_packet, avcodec_send_frame, avcodec_send_packet,
    AVRational, AV_CODEC_FLAG_QSCALE,
};
use crate::ffi_enum::AVSampleFormat;
use crate::util::error_handler::check_drain;
use anyhow::{bail, Result};
use std::ffi::c_int;
use std::ptr::{null, null_mut};

impl AVCodecContext {
    pub fn new(codec: Option<&AVCodec>) -> Result<Self> {
        let codec_ptr = codec.map(|c| c.inner.cast_const()).unwrap_or(null());

        let inner = unsafe { avcodec_alloc_context3(codec_ptr) };
        if inner.is_null() {
            bail!("Failed to allocate memory by 'avcodec_alloc_context3'.");
        }

        Ok(AVCodecContext { inner })
    }

    pub fn open(&mut self, codec: &AVCodec) -> Result<()> {
        ffmpeg! {
            avcodec_open2(self.inner, codec.inner.cast_const(), null_mut())
        }

        Ok(())
    }

    pub fn open_with_options(&mut self, codec: &AVCodec, options: &mut AVDictionary) -> Result<()> {
        ffmpeg! {
            avcodec_open2(self.inner, codec.inner.cast_const(), options.as_mut_ptr())
        }

        Ok(())
    }

    /// Copy the codec parameters of an input stream into this context.
    pub fn apply_stream_parameters(
        &mut self,
        input: &AVInputContext,
        stream_index: u32,
    ) -> Result<()> {
        let parameters = input.stream_parameters(stream_index);

        ffmpeg! {
            avcodec_parameters_to_context(self.inner, parameters) or "Failed to apply stream parameters"
        }

        Ok(())
    }

    pub fn sample_rate(&self) -> i32 {
        self.sample_rate
    }

    pub fn nb_channels(&self) -> i32 {
        self.ch_layout.nb_channels
    }

    pub fn frame_size(&self) -> i32 {
        self.frame_size
    }

    pub fn sample_fmt(&self) -> Result<AVSampleFormat> {
        Ok(AVSampleFormat::try_from(self.sample_fmt)?)
    }

    pub fn ch_layout(&self) -> Result<ChannelLayout> {
        ChannelLayout::copy_from(&self.ch_layout)
    }

    /// Set the sample rate; for audio the time base follows as 1/rate.
    pub fn set_sample_rate(&mut self, sample_rate: i32) {
        self.sample_rate = sample_rate;
        self.time_base = AVRational {
            num: 1,
            den: sample_rate,
        };
    }

    pub fn set_sample_fmt(&mut self, format: AVSampleFormat) {
        self.sample_fmt = format as i32;
    }

    pub fn set_ch_layout(&mut self, layout: &ChannelLayout) -> Result<()> {
        ffmpeg! {
            av_channel_layout_copy(&mut self.ch_layout, layout.as_ptr())
        }

        Ok(())
    }

    pub fn set_bit_rate(&mut self, bit_rate: i64) {
        self.bit_rate = bit_rate;
    }

    /// Enable VBR with the given codec-specific quality scale.
    pub fn set_global_quality(&mut self, quality: i32) {
        self.global_quality = quality;
        self.flags |= AV_CODEC_FLAG_QSCALE as c_int;
    }

    pub fn set_compression_level(&mut self, level: i32) {
        self.compression_level = level;
    }

    pub fn send_packet(&mut self, packet: &AVPacket) -> Result<()> {
        ffmpeg! {
            avcodec_send_packet(self.inner, packet.inner)
        }

        Ok(())
    }

    /// Signal end of stream to the decoder.
    pub fn send_eof_packet(&mut self) -> Result<()> {
        ffmpeg! {
            avcodec_send_packet(self.inner, null())
        }

        Ok(())
    }

    /// `Ok(true)` when a frame came out; `Ok(false)` once the decoder wants
    /// more input or is fully drained.
    pub fn receive_frame(&mut self, frame: &mut AVFrame) -> Result<bool> {
        let code = unsafe { avcodec_receive_frame(self.inner, frame.inner) };
        check_drain(code, "avcodec_receive_frame")
    }

    pub fn send_frame(&mut self, frame: &AVFrame) -> Result<()> {
        ffmpeg! {
            avcodec_send_frame(self.inner, frame.inner)
        }

        Ok(())
    }

    /// Signal end of stream to the encoder.
    pub fn send_eof_frame(&mut self) -> Result<()> {
        ffmpeg! {
            avcodec_send_frame(self.inner, null())
        }

        Ok(())
    }

    pub fn receive_packet(&mut self, packet: &mut AVPacket) -> Result<bool> {
        let code = unsafe { avcodec_receive_packet(self.inner, packet.inner) };
        check_drain(code, "avcodec_receive_packet")
    }
}

#[test]
fn test_encoder_context_setup() {
    let codec = AVCodec::new_encoder_with_name("pcm_s16le").unwrap();
    let mut context = AVCodecContext::new(Some(&codec)).unwrap();

    let stereo = ChannelLayout::default_for(2);
    context.set_sample_rate(44100);
    context.set_sample_fmt(codec.default_sample_fmt());
    context.set_ch_layout(&stereo).unwrap();
    context.open(&codec).unwrap();

    assert_eq!(context.sample_rate(), 44100);
    assert_eq!(context.nb_channels(), 2);
    assert_eq!(context.sample_fmt().unwrap(), AVSampleFormat::S16);
    assert_eq!(context.time_base.num, 1);
    assert_eq!(context.time_base.den, 44100);
    // PCM accepts any frame size.
    assert_eq!(context.frame_size(), 0);
}

#[test]
fn test_open_with_options() {
    let codec = AVCodec::new_encoder_with_name("pcm_s16le").unwrap();
    let mut context = AVCodecContext::new(Some(&codec)).unwrap();

    let mono = ChannelLayout::default_for(1);
    context.set_sample_rate(8000);
    context.set_sample_fmt(AVSampleFormat::S16);
    context.set_ch_layout(&mono).unwrap();

    let mut options = AVDictionary::new();
    options.set("threads", "1").unwrap();
    context.open_with_options(&codec, &mut options).unwrap();
}

#[test]
fn test_encode_produces_packets() {
    let codec = AVCodec::new_encoder_with_name("pcm_s16le").unwrap();
    let mut encoder = AVCodecContext::new(Some(&codec)).unwrap();

    let mono = ChannelLayout::default_for(1);
    encoder.set_sample_rate(8000);
    encoder.set_sample_fmt(AVSampleFormat::S16);
    encoder.set_ch_layout(&mono).unwrap();
    encoder.open(&codec).unwrap();

    let mut frame = AVFrame::new().unwrap();
    frame
        .alloc_samples(AVSampleFormat::S16, &mono, 8000, 512)
        .unwrap();
    frame.plane_mut::<i16>(0).unwrap().fill(1000);
    frame.set_pts(0);

    encoder.send_frame(&frame).unwrap();
    encoder.send_eof_frame().unwrap();

    let mut packet = AVPacket::new().unwrap();
    let mut total = 0usize;
    while encoder.receive_packet(&mut packet).unwrap() {
        total += packet.size as usize;
        packet.release();
    }

    // 512 mono s16 samples in, 1024 bytes out.
    assert_eq!(total, 1024);
}
