use crate::ffi::{av_opt_set, av_opt_set_bin, av_opt_set_int, AV_OPT_SEARCH_CHILDREN};
use crate::util::error_handler::check;
use anyhow::Result;
use std::ffi::{c_int, c_void, CString};

/// Option setting for anything carrying an AVClass (codec contexts, filter
/// contexts, resamplers). Searches child objects the way the native option
/// helpers do.
pub trait SetAVOption {
    fn as_opt_target(&mut self) -> *mut c_void;

    fn set_opt(&mut self, name: &str, value: &str) -> Result<()> {
        let name = CString::new(name)?;
        let value = CString::new(value)?;

        check(
            unsafe {
                av_opt_set(
                    self.as_opt_target(),
                    name.as_ptr(),
                    value.as_ptr(),
                    AV_OPT_SEARCH_CHILDREN as c_int,
                )
            },
            "av_opt_set",
        )?;

        Ok(())
    }

    fn set_opt_int(&mut self, name: &str, value: i64) -> Result<()> {
        let name = CString::new(name)?;

        check(
            unsafe {
                av_opt_set_int(
                    self.as_opt_target(),
                    name.as_ptr(),
                    value,
                    AV_OPT_SEARCH_CHILDREN as c_int,
                )
            },
            "av_opt_set_int",
        )?;

        Ok(())
    }

    /// Set a binary option from a slice of raw element values (no
    /// terminator; the byte length tells the consumer how many there are).
    fn set_opt_bin<T: Copy>(&mut self, name: &str, values: &[T]) -> Result<()> {
        let name = CString::new(name)?;

        check(
            unsafe {
                av_opt_set_bin(
                    self.as_opt_target(),
                    name.as_ptr(),
                    values.as_ptr() as *const u8,
                    std::mem::size_of_val(values) as c_int,
                    AV_OPT_SEARCH_CHILDREN as c_int,
                )
            },
            "av_opt_set_bin",
        )?;

        Ok(())
    }
}

impl SetAVOption for crate::avcodec::AVCodecContext {
    fn as_opt_target(&mut self) -> *mut c_void {
        self.inner as *mut c_void
    }
}

impl SetAVOption for crate::avfilter_context::AVFilterContext {
    fn as_opt_target(&mut self) -> *mut c_void {
        self.inner as *mut c_void
    }
}

impl SetAVOption for crate::swr::SwrContext {
    fn as_opt_target(&mut self) -> *mut c_void {
        self.inner as *mut c_void
    }
}

#[test]
fn test_set_codec_options() {
    use crate::avcodec::{AVCodec, AVCodecContext};

    let codec = AVCodec::new_encoder_with_name("pcm_s16le").unwrap();
    let mut context = AVCodecContext::new(Some(&codec)).unwrap();

    context.set_opt_int("ar", 22050).unwrap();
    assert_eq!(context.sample_rate(), 22050);

    assert!(context.set_opt("no_such_option", "1").is_err());
}
