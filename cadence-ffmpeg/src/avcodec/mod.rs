pub mod codec_context;
pub mod codec_parameter;
pub mod new_codec;

wrap!(
    AVCodecContext drop2 avcodec_free_context,
    AVCodec
);

// AVCodec points into libavcodec's static codec table.
impl Clone for AVCodec {
    fn clone(&self) -> Self {
        AVCodec { inner: self.inner }
    }
}

unsafe impl Send for AVCodec {}
unsafe impl Sync for AVCodec {}

unsafe impl Send for AVCodecContext {}
