use crate::avfilter_context::AVFilterContext;
use crate::avfilter_graph::AVFilterGraph;
use crate::ffi::{
    av_strdup, avfilter_graph_alloc, avfilter_graph_config, avfilter_graph_parse_ptr,
    avfilter_inout_alloc, avfilter_inout_free,
};
use crate::util::error_handler::check;
use anyhow::{bail, Result};
use std::ffi::CString;
use std::ptr::null_mut;

impl AVFilterGraph {
    pub fn new() -> Result<Self> {
        let inner = unsafe { avfilter_graph_alloc() };

        if inner.is_null() {
            bail!("Failed to allocate memory by 'avfilter_graph_alloc'.");
        }

        Ok(Self { inner })
    }

    /// Create a named filter instance inside this graph. The returned
    /// context stays valid for the lifetime of the graph.
    pub fn add_context(
        &mut self,
        filter_name: &str,
        instance_name: &str,
        args: Option<&str>,
    ) -> Result<AVFilterContext> {
        AVFilterContext::new(filter_name, instance_name, args, self)
    }

    /// Parse a textual filter chain ("volume=0.5,atempo=1.2") and wire it
    /// between an existing buffer source and sink.
    pub fn parse_chain(
        &mut self,
        filters: &str,
        src: &AVFilterContext,
        sink: &AVFilterContext,
    ) -> Result<()> {
        let filters_c = CString::new(filters)?;
        let src_name = CString::new("in")?;
        let sink_name = CString::new("out")?;

        let mut outputs = unsafe { avfilter_inout_alloc() };
        let mut inputs = unsafe { avfilter_inout_alloc() };

        if outputs.is_null() || inputs.is_null() {
            unsafe {
                avfilter_inout_free(&mut outputs);
                avfilter_inout_free(&mut inputs);
            }
            bail!("Failed to allocate memory by 'avfilter_inout_alloc'.");
        }

        unsafe {
            (*outputs).name = av_strdup(src_name.as_ptr());
            (*outputs).filter_ctx = src.inner;
            (*outputs).pad_idx = 0;
            (*outputs).next = null_mut();

            (*inputs).name = av_strdup(sink_name.as_ptr());
            (*inputs).filter_ctx = sink.inner;
            (*inputs).pad_idx = 0;
            (*inputs).next = null_mut();
        }

        let code = unsafe {
            avfilter_graph_parse_ptr(
                self.inner,
                filters_c.as_ptr(),
                &mut inputs,
                &mut outputs,
                null_mut(),
            )
        };

        unsafe {
            avfilter_inout_free(&mut inputs);
            avfilter_inout_free(&mut outputs);
        }

        check(code, "avfilter_graph_parse_ptr")?;

        Ok(())
    }

    pub fn config(&mut self) -> Result<()> {
        ffmpeg! {
            avfilter_graph_config(self.inner, null_mut()) or "Failed to configure filter graph"
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::av_opt::SetAVOption;
    use crate::avframe::AVFrame;
    use crate::channel_layout::ChannelLayout;
    use crate::ffi_enum::AVSampleFormat;

    fn sine_frame(layout: &ChannelLayout, nb_samples: i32, amplitude: f32) -> AVFrame {
        let mut frame = AVFrame::new().unwrap();
        frame
            .alloc_samples(AVSampleFormat::Fltp, layout, 44100, nb_samples)
            .unwrap();
        for channel in 0..layout.nb_channels() {
            let plane = frame.plane_mut::<f32>(channel as usize).unwrap();
            for (i, sample) in plane.iter_mut().enumerate() {
                *sample =
                    amplitude * (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / 44100.0).sin();
            }
        }
        frame
    }

    fn run_chain(chain: &str, amplitude: f32) -> (i32, f32) {
        let stereo = ChannelLayout::default_for(2);
        let mut graph = AVFilterGraph::new().unwrap();

        let args = "time_base=1/44100:sample_rate=44100:sample_fmt=fltp:channel_layout=stereo";
        let mut src = graph.add_context("abuffer", "in", Some(args)).unwrap();
        let mut sink = graph.add_context("abuffersink", "out", None).unwrap();
        sink.set_opt_bin("sample_fmts", &[AVSampleFormat::Fltp as i32])
            .unwrap();
        sink.set_opt_bin("sample_rates", &[44100]).unwrap();
        sink.set_opt("ch_layouts", "stereo").unwrap();

        graph.parse_chain(chain, &src, &sink).unwrap();
        graph.config().unwrap();

        let mut frame = sine_frame(&stereo, 1024, amplitude);
        src.push_frame(Some(&mut frame)).unwrap();
        src.push_frame(None).unwrap();

        let mut out = AVFrame::new().unwrap();
        let mut total = 0;
        let mut peak = 0f32;
        while sink.pull_frame(&mut out).unwrap() {
            total += out.nb_samples();
            for sample in out.plane::<f32>(0).unwrap() {
                peak = peak.max(sample.abs());
            }
            out.release();
        }

        (total, peak)
    }

    #[test]
    fn test_anull_passthrough() {
        let (total, peak) = run_chain("anull", 0.8);
        assert_eq!(total, 1024);
        assert!((peak - 0.8).abs() < 0.01, "peak: {}", peak);
    }

    #[test]
    fn test_volume_halves_peak() {
        let (total, peak) = run_chain("volume=0.5", 0.8);
        assert_eq!(total, 1024);
        assert!((peak - 0.4).abs() < 0.01, "peak: {}", peak);
    }

    #[test]
    fn test_bad_chain_rejected() {
        let mut graph = AVFilterGraph::new().unwrap();
        let args = "time_base=1/44100:sample_rate=44100:sample_fmt=fltp:channel_layout=stereo";
        let src = graph.add_context("abuffer", "in", Some(args)).unwrap();
        let sink = graph.add_context("abuffersink", "out", None).unwrap();
        assert!(graph.parse_chain("no_such_filter=1", &src, &sink).is_err());
    }
}
