use crate::ffi::{
    av_channel_layout_compare, av_channel_layout_copy, av_channel_layout_default,
    av_channel_layout_describe, av_channel_layout_uninit, AVChannelLayout,
};
use crate::util::error_handler::check;
use anyhow::Result;
use std::ffi::{c_char, CStr};
use std::fmt;

/// Owned channel layout. Custom layouts allocate a channel map, so the
/// native value is uninitialized on drop.
pub struct ChannelLayout {
    inner: AVChannelLayout,
}

impl ChannelLayout {
    /// The native default ordering for a channel count ("mono", "stereo", ...).
    pub fn default_for(nb_channels: i32) -> Self {
        let mut inner: AVChannelLayout = unsafe { std::mem::zeroed() };
        unsafe {
            av_channel_layout_default(&mut inner as *mut AVChannelLayout, nb_channels);
        }
        Self { inner }
    }

    pub(crate) fn copy_from(raw: &AVChannelLayout) -> Result<Self> {
        let mut inner: AVChannelLayout = unsafe { std::mem::zeroed() };
        check(
            unsafe { av_channel_layout_copy(&mut inner as *mut AVChannelLayout, raw) },
            "av_channel_layout_copy",
        )?;
        Ok(Self { inner })
    }

    pub fn try_clone(&self) -> Result<Self> {
        Self::copy_from(&self.inner)
    }

    pub fn nb_channels(&self) -> i32 {
        self.inner.nb_channels
    }

    /// Layout name the way FFmpeg spells it, e.g. "stereo" or "5.1".
    pub fn describe(&self) -> Result<String> {
        let mut buf = [0 as c_char; 64];
        check(
            unsafe {
                av_channel_layout_describe(&self.inner, buf.as_mut_ptr(), buf.len())
            },
            "av_channel_layout_describe",
        )?;
        Ok(unsafe { CStr::from_ptr(buf.as_ptr()) }
            .to_string_lossy()
            .into_owned())
    }

    pub(crate) fn as_ptr(&self) -> *const AVChannelLayout {
        &self.inner
    }
}

impl PartialEq for ChannelLayout {
    fn eq(&self, other: &Self) -> bool {
        unsafe { av_channel_layout_compare(self.as_ptr(), other.as_ptr()) == 0 }
    }
}

impl fmt::Debug for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.describe() {
            Ok(name) => write!(f, "ChannelLayout({})", name),
            Err(_) => write!(f, "ChannelLayout({} channels)", self.nb_channels()),
        }
    }
}

impl Drop for ChannelLayout {
    fn drop(&mut self) {
        unsafe {
            av_channel_layout_uninit(&mut self.inner as *mut AVChannelLayout);
        }
    }
}

unsafe impl Send for ChannelLayout {}

#[test]
fn test_default_layouts() {
    let mono = ChannelLayout::default_for(1);
    let stereo = ChannelLayout::default_for(2);

    assert_eq!(mono.nb_channels(), 1);
    assert_eq!(stereo.nb_channels(), 2);
    assert_eq!(mono.describe().unwrap(), "mono");
    assert_eq!(stereo.describe().unwrap(), "stereo");

    assert!(mono != stereo);
    assert!(stereo == stereo.try_clone().unwrap());
}
