use crate::avfilter_context::{AVFilterContext, AVFilterContextRaw};
use crate::avfilter_graph::AVFilterGraph;
use crate::ffi::{avfilter_get_by_name, avfilter_graph_create_filter};
use anyhow::{bail, Result};
use std::ffi::CString;
use std::ptr::{null, null_mut};

impl AVFilterContext {
    /// Create a named instance of `filter_name` inside `graph`.
    pub(crate) fn new(
        filter_name: &str,
        instance_name: &str,
        args: Option<&str>,
        graph: &mut AVFilterGraph,
    ) -> Result<Self> {
        let filter_name_c = CString::new(filter_name)?;
        let instance_name_c = CString::new(instance_name)?;
        let args_c = args.map(CString::new).transpose()?;

        let filter = unsafe { avfilter_get_by_name(filter_name_c.as_ptr()) };
        if filter.is_null() {
            bail!("Could not find filter with name: {}", filter_name);
        }

        let mut inner = null_mut::<AVFilterContextRaw>();
        ffmpeg! {
            avfilter_graph_create_filter(
                &mut inner as *mut *mut AVFilterContextRaw,
                filter,
                instance_name_c.as_ptr(),
                args_c.as_ref().map(|s| s.as_ptr()).unwrap_or(null()),
                null_mut(),
                graph.inner,
            ) or "Failed to create filter"
        }

        Ok(Self { inner })
    }
}
