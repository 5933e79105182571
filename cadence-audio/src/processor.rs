use crate::format::OutputFormat;
use anyhow::Result;
use cadence_ffmpeg::audio_fifo::AVAudioFifo;
use cadence_ffmpeg::av_opt::SetAVOption;
use cadence_ffmpeg::avcodec::{AVCodec, AVCodecContext};
use cadence_ffmpeg::avfilter_context::AVFilterContext;
use cadence_ffmpeg::avfilter_graph::AVFilterGraph;
use cadence_ffmpeg::avformat::open_input::OpenInputToAVInputContext;
use cadence_ffmpeg::avformat::{AVInputContext, AVOutputContext};
use cadence_ffmpeg::avframe::AVFrame;
use cadence_ffmpeg::avpacket::AVPacket;
use cadence_ffmpeg::channel_layout::ChannelLayout;
use cadence_ffmpeg::ffi_enum::AVSampleFormat;
use cadence_ffmpeg::samplefmt;
use cadence_ffmpeg::swr::SwrContext;
use hashbrown::HashMap;
use log::debug;
use parking_lot::RwLock;
use std::sync::LazyLock;

/// Encoders are looked up by name once; the codec table entries are static.
static ENCODERS: LazyLock<RwLock<HashMap<String, AVCodec>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

const DEFAULT_BIT_RATE: i64 = 192_000;
/// Chunk size for encoders that accept arbitrary frame sizes.
const FALLBACK_CHUNK: i32 = 4096;

fn find_encoder(name: &str) -> Result<AVCodec> {
    if let Some(codec) = ENCODERS.read().get(name) {
        return Ok(codec.clone());
    }

    let codec = AVCodec::new_encoder_with_name(name)?;
    ENCODERS.write().insert(name.to_string(), codec.clone());
    Ok(codec)
}

/// Options for one processing run.
#[derive(Debug)]
pub struct ProcessOptions<'a> {
    /// Input audio data (any container/codec FFmpeg can probe)
    pub input: &'a [u8],
    /// Output format specification
    pub output_format: OutputFormat,
    /// Filter chain (e.g. "volume=0.5,atempo=1.2")
    pub filters: Option<String>,
    /// Metadata tags for the output container
    pub metadata: &'a HashMap<String, String>,
    /// Start time in seconds (for trimming)
    pub start_time: Option<f64>,
    /// Duration in seconds (for trimming)
    pub duration: Option<f64>,
}

/// In-memory audio transcoder.
#[derive(Debug, Default)]
pub struct AudioProcessor;

impl AudioProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Decode, optionally filter or resample, re-encode and mux, entirely
    /// over memory buffers.
    pub fn process(&self, options: ProcessOptions<'_>) -> Result<Vec<u8>> {
        let mut input = AVInputContext::open_buffer(options.input.to_vec())?;
        let stream_index = input.best_audio_stream()?;

        debug!("Found audio stream {}", stream_index);

        let decoder_codec = AVCodec::new_decoder(&input, stream_index)?;
        let mut decoder = AVCodecContext::new(Some(&decoder_codec))?;
        decoder.apply_stream_parameters(&input, stream_index)?;
        decoder.open(&decoder_codec)?;

        debug!(
            "Decoder {} opened at {} Hz",
            decoder_codec.name(),
            decoder.sample_rate()
        );

        let encoder_codec = match options.output_format.codec {
            Some(ref name) => find_encoder(name)?,
            None => find_encoder("libmp3lame")?,
        };

        let out_rate = options
            .output_format
            .sample_rate
            .unwrap_or(decoder.sample_rate());
        let out_channels = options
            .output_format
            .channels
            .unwrap_or(decoder.nb_channels());
        let out_layout = ChannelLayout::default_for(if out_channels == 1 { 1 } else { 2 });
        let out_fmt = encoder_codec.default_sample_fmt();

        let mut encoder = AVCodecContext::new(Some(&encoder_codec))?;
        encoder.set_sample_rate(out_rate);
        encoder.set_ch_layout(&out_layout)?;
        encoder.set_sample_fmt(out_fmt);
        encoder.set_bit_rate(options.output_format.bit_rate.unwrap_or(DEFAULT_BIT_RATE));
        if let Some(quality) = options.output_format.quality {
            encoder.set_global_quality((quality * 100.0) as i32);
        }
        if let Some(level) = options.output_format.compression_level {
            encoder.set_compression_level(level);
        }
        encoder.open(&encoder_codec)?;

        debug!(
            "Encoder {} opened at {} Hz, frame size {}",
            encoder_codec.name(),
            encoder.sample_rate(),
            encoder.frame_size()
        );

        let in_fmt = decoder.sample_fmt()?;
        let in_layout = decoder.ch_layout()?;
        let needs_conversion =
            in_fmt != out_fmt || decoder.sample_rate() != out_rate || in_layout != out_layout;

        let mut chain = match options.filters.as_deref() {
            Some(filters) => Some(FilterChain::new(
                &decoder, filters, out_rate, out_fmt, &out_layout,
            )?),
            None => None,
        };

        let mut resampler = if chain.is_none() && needs_conversion {
            Some(SwrContext::new(
                &in_layout,
                in_fmt,
                decoder.sample_rate(),
                &out_layout,
                out_fmt,
                out_rate,
            )?)
        } else {
            None
        };

        let mut sink = EncodeSink::new(
            encoder,
            &encoder_codec,
            &options.output_format.format,
            options.metadata,
            out_fmt,
            out_layout,
            out_rate,
        )?;

        let mut pkt = AVPacket::new()?;
        let mut frame = AVFrame::new()?;
        let mut scratch = AVFrame::new()?;

        let start_sample = options
            .start_time
            .map(|t| (t * decoder.sample_rate() as f64) as i64);
        let end_sample = options.duration.map(|d| {
            start_sample.unwrap_or(0) + (d * decoder.sample_rate() as f64) as i64
        });

        let mut samples_seen: i64 = 0;
        let mut stopped = false;

        'demux: while input.read_frame(&mut pkt)? {
            if pkt.stream_index as u32 != stream_index {
                pkt.release();
                continue;
            }

            decoder.send_packet(&pkt)?;
            pkt.release();

            while decoder.receive_frame(&mut frame)? {
                let first = samples_seen;
                samples_seen += frame.nb_samples() as i64;

                match trim_frame(first, samples_seen, start_sample, end_sample) {
                    Trim::Skip => {
                        frame.release();
                        continue;
                    }
                    Trim::Stop => {
                        frame.release();
                        stopped = true;
                        break 'demux;
                    }
                    Trim::Keep => {}
                }

                route_frame(&mut frame, &mut chain, &mut resampler, &mut scratch, &mut sink)?;
                frame.release();
            }
        }

        // Drain decoder delay unless trimming already cut the stream short.
        if !stopped {
            decoder.send_eof_packet()?;
            while decoder.receive_frame(&mut frame)? {
                let first = samples_seen;
                samples_seen += frame.nb_samples() as i64;

                match trim_frame(first, samples_seen, start_sample, end_sample) {
                    Trim::Skip => {
                        frame.release();
                        continue;
                    }
                    Trim::Stop => {
                        frame.release();
                        break;
                    }
                    Trim::Keep => {}
                }

                route_frame(&mut frame, &mut chain, &mut resampler, &mut scratch, &mut sink)?;
                frame.release();
            }
        }

        if let Some(chain) = &mut chain {
            chain.src.push_frame(None)?;
            while chain.sink.pull_frame(&mut scratch)? {
                sink.push(&scratch)?;
                scratch.release();
            }
        }

        if let Some(swr) = &mut resampler {
            scratch.release();
            scratch.set_audio_parameters(sink.format, &sink.layout, sink.sample_rate)?;
            swr.flush(&mut scratch)?;
            if scratch.nb_samples() > 0 {
                sink.push(&scratch)?;
            }
            scratch.release();
        }

        let result = sink.finish()?;
        debug!("Processing complete, {} bytes out", result.len());

        Ok(result)
    }
}

enum Trim {
    Keep,
    Skip,
    Stop,
}

fn trim_frame(first: i64, last: i64, start: Option<i64>, end: Option<i64>) -> Trim {
    if let Some(start) = start {
        if last <= start {
            return Trim::Skip;
        }
    }
    if let Some(end) = end {
        if first >= end {
            return Trim::Stop;
        }
    }

    Trim::Keep
}

fn route_frame(
    frame: &mut AVFrame,
    chain: &mut Option<FilterChain>,
    resampler: &mut Option<SwrContext>,
    scratch: &mut AVFrame,
    sink: &mut EncodeSink,
) -> Result<()> {
    if let Some(chain) = chain {
        chain.src.push_frame(Some(frame))?;
        while chain.sink.pull_frame(scratch)? {
            sink.push(scratch)?;
            scratch.release();
        }
    } else if let Some(swr) = resampler {
        scratch.release();
        scratch.set_audio_parameters(sink.format, &sink.layout, sink.sample_rate)?;
        swr.convert_frame(scratch, frame)?;
        if scratch.nb_samples() > 0 {
            sink.push(scratch)?;
        }
        scratch.release();
    } else {
        sink.push(frame)?;
    }

    Ok(())
}

/// abuffer → user chain → abuffersink, negotiating the encoder's format at
/// the sink.
struct FilterChain {
    // Owns every filter context; dropped last for that reason.
    _graph: AVFilterGraph,
    src: AVFilterContext,
    sink: AVFilterContext,
}

impl FilterChain {
    fn new(
        decoder: &AVCodecContext,
        filters: &str,
        out_rate: i32,
        out_fmt: AVSampleFormat,
        out_layout: &ChannelLayout,
    ) -> Result<Self> {
        let mut graph = AVFilterGraph::new()?;

        let args = format!(
            "time_base=1/{}:sample_rate={}:sample_fmt={}:channel_layout={}",
            decoder.sample_rate(),
            decoder.sample_rate(),
            samplefmt::name(decoder.sample_fmt()?)?,
            decoder.ch_layout()?.describe()?,
        );

        let src = graph.add_context("abuffer", "in", Some(&args))?;
        let mut sink = graph.add_context("abuffersink", "out", None)?;

        sink.set_opt_bin("sample_fmts", &[out_fmt as i32])?;
        sink.set_opt_bin("sample_rates", &[out_rate])?;
        sink.set_opt("ch_layouts", &out_layout.describe()?)?;

        let filters = if filters.is_empty() { "anull" } else { filters };
        graph.parse_chain(filters, &src, &sink)?;
        graph.config()?;

        debug!("Filter graph configured: {}", filters);

        Ok(Self {
            _graph: graph,
            src,
            sink,
        })
    }
}

/// Re-chunks incoming samples to the encoder's frame size through an audio
/// FIFO, encodes, and muxes.
struct EncodeSink {
    encoder: AVCodecContext,
    output: AVOutputContext,
    fifo: AVAudioFifo,
    chunk: AVFrame,
    packet: AVPacket,
    stream_index: u32,
    chunk_size: i32,
    format: AVSampleFormat,
    layout: ChannelLayout,
    sample_rate: i32,
    next_pts: i64,
}

impl EncodeSink {
    fn new(
        encoder: AVCodecContext,
        codec: &AVCodec,
        format_name: &str,
        metadata: &HashMap<String, String>,
        format: AVSampleFormat,
        layout: ChannelLayout,
        sample_rate: i32,
    ) -> Result<Self> {
        let mut output = AVOutputContext::open(format_name)?;
        let stream_index = output.add_audio_stream(&encoder, codec)?;

        for (key, value) in metadata {
            output.set_metadata(key, value)?;
        }

        output.write_header()?;

        let frame_size = encoder.frame_size();
        let chunk_size = if frame_size > 0 {
            frame_size
        } else {
            FALLBACK_CHUNK
        };

        let fifo = AVAudioFifo::new(format, layout.nb_channels(), chunk_size)?;

        Ok(Self {
            encoder,
            output,
            fifo,
            chunk: AVFrame::new()?,
            packet: AVPacket::new()?,
            stream_index,
            chunk_size,
            format,
            layout,
            sample_rate,
            next_pts: 0,
        })
    }

    fn push(&mut self, frame: &AVFrame) -> Result<()> {
        self.fifo.write_frame(frame)?;
        self.drain(false)
    }

    fn drain(&mut self, finish: bool) -> Result<()> {
        loop {
            let available = self.fifo.size();
            if available <= 0 || (!finish && available < self.chunk_size) {
                break;
            }

            let take = available.min(self.chunk_size);
            self.chunk.release();
            self.chunk
                .alloc_samples(self.format, &self.layout, self.sample_rate, take)?;
            self.fifo.read_frame(&mut self.chunk, take)?;
            self.chunk.set_pts(self.next_pts);
            self.next_pts += take as i64;

            self.encoder.send_frame(&self.chunk)?;
            self.drain_encoder()?;
        }

        Ok(())
    }

    fn drain_encoder(&mut self) -> Result<()> {
        while self.encoder.receive_packet(&mut self.packet)? {
            self.output
                .write_packet(&mut self.packet, &self.encoder, self.stream_index)?;
            self.packet.release();
        }

        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        self.drain(true)?;
        self.encoder.send_eof_frame()?;
        self.drain_encoder()?;
        self.output.write_trailer()?;

        Ok(self.output.take_output())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_frame() {
        assert!(matches!(trim_frame(0, 1024, None, None), Trim::Keep));
        assert!(matches!(trim_frame(0, 1024, Some(1024), None), Trim::Skip));
        assert!(matches!(trim_frame(0, 1024, Some(500), None), Trim::Keep));
        assert!(matches!(trim_frame(2048, 3072, None, Some(2048)), Trim::Stop));
        assert!(matches!(trim_frame(1024, 2048, Some(500), Some(4096)), Trim::Keep));
    }

    #[test]
    fn test_encoder_cache() {
        let first = find_encoder("pcm_s16le").unwrap();
        let second = find_encoder("pcm_s16le").unwrap();
        assert_eq!(first.name(), second.name());
        assert!(find_encoder("no_such_encoder").is_err());
    }
}
