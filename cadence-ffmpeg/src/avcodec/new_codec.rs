use crate::avcodec::AVCodec;
use crate::avformat::AVInputContext;
use crate::ffi::{avcodec_find_decoder, avcodec_find_encoder, avcodec_find_encoder_by_name};
use crate::ffi_enum::{AVCodecID, AVSampleFormat};
use anyhow::{anyhow, Result};
use std::ffi::CString;

impl AVCodec {
    /// Decoder for the codec carried by one of the input's streams.
    pub fn new_decoder(input: &AVInputContext, stream_index: u32) -> Result<Self> {
        let codec_id = unsafe { (*input.stream_parameters(stream_index)).codec_id };

        let codec = unsafe { avcodec_find_decoder(codec_id) };
        if codec.is_null() {
            return Err(anyhow!(
                "Failed to find decoder for {:?}",
                AVCodecID::try_from(codec_id).ok()
            ));
        }

        Ok(AVCodec {
            inner: codec.cast_mut(),
        })
    }

    pub fn new_decoder_with_id(id: AVCodecID) -> Result<Self> {
        let codec = unsafe { avcodec_find_decoder(id as crate::ffi::AVCodecID) };

        if codec.is_null() {
            Err(anyhow!("Failed to find decoder for {:?}", id))
        } else {
            Ok(AVCodec {
                inner: codec.cast_mut(),
            })
        }
    }

    pub fn new_encoder_with_id(id: AVCodecID) -> Result<Self> {
        let codec = unsafe { avcodec_find_encoder(id as crate::ffi::AVCodecID) };

        if codec.is_null() {
            Err(anyhow!("Failed to find encoder for {:?}", id))
        } else {
            Ok(AVCodec {
                inner: codec.cast_mut(),
            })
        }
    }

    pub fn new_encoder_with_name(name: &str) -> Result<Self> {
        let name_c = CString::new(name)?;
        let codec = unsafe { avcodec_find_encoder_by_name(name_c.as_ptr()) };

        if codec.is_null() {
            Err(anyhow!("Failed to find encoder named '{}'", name))
        } else {
            Ok(AVCodec {
                inner: codec.cast_mut(),
            })
        }
    }

    /// First sample format the encoder advertises, falling back to planar
    /// float when the codec does not constrain it.
    pub fn default_sample_fmt(&self) -> AVSampleFormat {
        let formats = self.sample_fmts;
        if formats.is_null() {
            return AVSampleFormat::Fltp;
        }

        AVSampleFormat::try_from(unsafe { *formats }).unwrap_or(AVSampleFormat::Fltp)
    }

    pub fn name(&self) -> String {
        unsafe {
            std::ffi::CStr::from_ptr(self.name)
                .to_string_lossy()
                .into_owned()
        }
    }
}

#[test]
fn test_builtin_codecs() {
    let pcm = AVCodec::new_encoder_with_name("pcm_s16le").unwrap();
    assert_eq!(pcm.name(), "pcm_s16le");
    assert_eq!(pcm.default_sample_fmt(), AVSampleFormat::S16);

    let flac = AVCodec::new_encoder_with_name("flac").unwrap();
    assert_eq!(flac.name(), "flac");

    assert!(AVCodec::new_encoder_with_name("not_a_codec").is_err());
}

#[test]
fn test_lookup_by_id() {
    let mp3 = AVCodec::new_decoder_with_id(AVCodecID::Mp3).unwrap();
    assert!(mp3.name().contains("mp3"), "got: {}", mp3.name());

    let flac = AVCodec::new_encoder_with_id(AVCodecID::Flac).unwrap();
    assert_eq!(flac.name(), "flac");
}
