use crate::ffi::{av_dict_count, av_dict_free, av_dict_get, av_dict_set};
use crate::ffi::AVDictionary as AVDictionaryRaw;
use anyhow::Result;
use std::ffi::{CStr, CString};
use std::ptr::{null, null_mut};

/// Owned key/value dictionary. The native dictionary is allocated lazily by
/// the first `av_dict_set`, so `inner` stays null until then and must never
/// be dereferenced directly.
#[derive(Debug)]
pub struct AVDictionary {
    inner: *mut AVDictionaryRaw,
}

impl AVDictionary {
    pub fn new() -> Self {
        Self { inner: null_mut() }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let key = CString::new(key)?;
        let value = CString::new(value)?;

        ffmpeg! {
            av_dict_set(
                &mut self.inner as *mut *mut AVDictionaryRaw,
                key.as_ptr(),
                value.as_ptr(),
                0,
            )
        }

        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        entry_value(self.inner, key)
    }

    pub fn len(&self) -> usize {
        unsafe { av_dict_count(self.inner) as usize }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut *mut AVDictionaryRaw {
        &mut self.inner
    }
}

impl Default for AVDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AVDictionary {
    fn drop(&mut self) {
        unsafe {
            av_dict_free(&mut self.inner as *mut *mut AVDictionaryRaw);
        }
    }
}

/// Look up `key` in a raw dictionary pointer (also used for the metadata
/// dictionaries embedded in format contexts).
pub(crate) fn entry_value(dict: *const AVDictionaryRaw, key: &str) -> Option<String> {
    let key = CString::new(key).ok()?;
    unsafe {
        let entry = av_dict_get(dict, key.as_ptr(), null(), 0);
        if entry.is_null() {
            return None;
        }
        Some(CStr::from_ptr((*entry).value).to_string_lossy().into_owned())
    }
}

#[test]
fn test_dictionary_roundtrip() {
    let mut dict = AVDictionary::new();
    assert!(dict.is_empty());
    assert_eq!(dict.get("title"), None);

    dict.set("title", "Night Drive").unwrap();
    dict.set("artist", "Cadence").unwrap();

    assert_eq!(dict.len(), 2);
    assert_eq!(dict.get("title").as_deref(), Some("Night Drive"));
    assert_eq!(dict.get("artist").as_deref(), Some("Cadence"));
    assert_eq!(dict.get("album"), None);
}
