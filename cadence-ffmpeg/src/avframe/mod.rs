pub mod frame_info;
pub mod open_frame;

wrap!(
    AVFrame drop2 av_frame_free
);

unsafe impl Send for AVFrame {}
