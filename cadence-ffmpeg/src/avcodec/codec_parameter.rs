use crate::avcodec::AVCodecContext;
use crate::ffi::{avcodec_parameters_from_context, AVStream};
use anyhow::Result;

impl AVCodecContext {
    /// Export this context's parameters onto an output stream, carrying the
    /// time base along.
    pub(crate) fn apply_to_stream(&self, stream: *mut AVStream) -> Result<()> {
        ffmpeg! {
            avcodec_parameters_from_context((*stream).codecpar, self.inner)
        }

        unsafe {
            (*stream).time_base = self.time_base;
        }

        Ok(())
    }
}
