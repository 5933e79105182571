use crate::avformat::{AVInputContext, AVMediaType};
use crate::ffi::{
    av_find_best_stream, avformat_find_stream_info, AVCodecParameters, AVDictionary,
};
use anyhow::{anyhow, Result};
use std::ptr::null_mut;

impl AVInputContext {
    fn ensure_scanned(&mut self) -> Result<()> {
        if self.opened {
            return Ok(());
        }

        ffmpeg! {
            avformat_find_stream_info(
                self.inner,
                null_mut::<*mut AVDictionary>()
            ) or "Failed to find stream info"
        }
        self.opened = true;

        Ok(())
    }

    /// Indices of every stream of the given type, cached per type.
    pub fn find_stream(&mut self, target_type: AVMediaType) -> Result<Vec<u32>> {
        if let Some(found) = self.scanned_stream.get(&target_type) {
            return Ok(found.clone());
        }

        self.ensure_scanned()?;

        let matching = (0..self.nb_streams)
            .filter(|index| unsafe {
                (*(**self.streams.add(*index as usize)).codecpar).codec_type == target_type as i32
            })
            .collect::<Vec<_>>();

        if matching.is_empty() {
            return Err(anyhow!("No target stream {:?} found", target_type));
        }

        self.scanned_stream.insert(target_type, matching.clone());
        Ok(matching)
    }

    /// The stream libavformat considers the best of its type.
    pub fn best_stream(&mut self, target_type: AVMediaType) -> Result<u32> {
        self.ensure_scanned()?;

        let index = unsafe {
            av_find_best_stream(self.inner, target_type as i32, -1, -1, null_mut(), 0)
        };

        if index < 0 {
            return Err(anyhow!("No target stream {:?} found", target_type));
        }

        Ok(index as u32)
    }

    pub fn best_audio_stream(&mut self) -> Result<u32> {
        self.best_stream(AVMediaType::AUDIO)
    }

    pub(crate) fn stream_parameters(&self, index: u32) -> *const AVCodecParameters {
        unsafe { (**self.streams.add(index as usize)).codecpar }
    }
}
