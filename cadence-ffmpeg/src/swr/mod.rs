pub mod new_swr;

wrap!(
    SwrContext drop2 swr_free
);

unsafe impl Send for SwrContext {}
