use crate::ffi::{av_free, av_malloc};
use anyhow::{bail, Result};
use std::ffi::c_void;
use std::ops::Deref;

/// Memory owned by FFmpeg's allocator.
#[derive(Debug)]
pub struct AVMemorySegment {
    pub inner: *mut c_void,
    pub size: usize,
}

impl Deref for AVMemorySegment {
    type Target = *mut c_void;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Drop for AVMemorySegment {
    fn drop(&mut self) {
        unsafe {
            av_free(self.inner);
        }
    }
}

impl AVMemorySegment {
    pub fn new(size: usize) -> Result<Self> {
        let segment = unsafe { av_malloc(size) };

        if segment.is_null() {
            bail!("Failed to allocate memory by 'av_malloc'.");
        }

        Ok(AVMemorySegment {
            inner: segment,
            size,
        })
    }

    /// Hand the allocation to a native owner that will `av_free` it.
    pub(crate) fn into_raw(self) -> *mut c_void {
        let inner = self.inner;
        std::mem::forget(self);
        inner
    }
}

#[test]
fn test_segment_alloc() {
    let segment = AVMemorySegment::new(4096).unwrap();
    assert!(!segment.inner.is_null());
    assert_eq!(segment.size, 4096);
}
