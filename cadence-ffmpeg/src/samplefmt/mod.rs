use crate::ffi::{
    av_get_bytes_per_sample, av_get_packed_sample_fmt, av_get_sample_fmt_name,
    av_sample_fmt_is_planar,
};
use crate::ffi_enum::AVSampleFormat;
use anyhow::{bail, Result};
use std::ffi::CStr;

/// Name of a sample format the way FFmpeg spells it, e.g. "fltp".
pub fn name(format: AVSampleFormat) -> Result<String> {
    let name = unsafe { av_get_sample_fmt_name(format as i32) };
    if name.is_null() {
        bail!("No name for sample format {:?}", format);
    }

    Ok(unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned())
}

pub fn bytes_per_sample(format: AVSampleFormat) -> usize {
    unsafe { av_get_bytes_per_sample(format as i32) as usize }
}

pub fn is_planar(format: AVSampleFormat) -> bool {
    unsafe { av_sample_fmt_is_planar(format as i32) != 0 }
}

/// The interleaved counterpart of a planar format (identity for packed ones).
pub fn packed(format: AVSampleFormat) -> Result<AVSampleFormat> {
    let packed = unsafe { av_get_packed_sample_fmt(format as i32) };
    Ok(AVSampleFormat::try_from(packed)?)
}

#[test]
fn test_sample_format_descriptions() {
    assert_eq!(name(AVSampleFormat::S16).unwrap(), "s16");
    assert_eq!(name(AVSampleFormat::Fltp).unwrap(), "fltp");

    assert_eq!(bytes_per_sample(AVSampleFormat::S16), 2);
    assert_eq!(bytes_per_sample(AVSampleFormat::Fltp), 4);

    assert!(is_planar(AVSampleFormat::Fltp));
    assert!(!is_planar(AVSampleFormat::S16));

    assert_eq!(packed(AVSampleFormat::Fltp).unwrap(), AVSampleFormat::Flt);
    assert_eq!(packed(AVSampleFormat::S16).unwrap(), AVSampleFormat::S16);
}

#[test]
fn test_extracted_enum_matches_bindings() {
    use crate::ffi;

    assert_eq!(
        AVSampleFormat::try_from(ffi::AVSampleFormat_AV_SAMPLE_FMT_FLTP).unwrap(),
        AVSampleFormat::Fltp
    );
    assert_eq!(
        AVSampleFormat::try_from(ffi::AVSampleFormat_AV_SAMPLE_FMT_NONE).unwrap(),
        AVSampleFormat::None
    );
    assert!(AVSampleFormat::try_from(9999).is_err());
}
