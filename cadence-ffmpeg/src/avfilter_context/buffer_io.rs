use crate::avfilter_context::AVFilterContext;
use crate::avframe::AVFrame;
use crate::ffi::{av_buffersink_get_frame, av_buffersrc_add_frame_flags};
use crate::util::error_handler::check_drain;
use anyhow::Result;
use std::ptr::null_mut;

impl AVFilterContext {
    /// Feed a frame into a buffer source; `None` signals end of stream.
    pub fn push_frame(&mut self, frame: Option<&mut AVFrame>) -> Result<()> {
        let frame_ptr = frame.map(|f| f.inner).unwrap_or(null_mut());

        ffmpeg! {
            av_buffersrc_add_frame_flags(self.inner, frame_ptr, 0)
        }

        Ok(())
    }

    /// Pull a filtered frame out of a buffer sink. `Ok(false)` when the sink
    /// needs more input or the graph is drained.
    pub fn pull_frame(&mut self, frame: &mut AVFrame) -> Result<bool> {
        let code = unsafe { av_buffersink_get_frame(self.inner, frame.inner) };
        check_drain(code, "av_buffersink_get_frame")
    }
}
