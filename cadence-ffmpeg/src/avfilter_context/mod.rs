pub mod alloc;
pub mod buffer_io;

// Filter contexts are owned and freed by their graph; no Drop here.
wrap!(
    AVFilterContext
);

unsafe impl Send for AVFilterContext {}
