//! End-to-end transcodes over synthesized audio; no fixture files.

use cadence_audio::{AudioProcessor, OutputFormat, ProcessOptions};
use cadence_ffmpeg::avcodec::{AVCodec, AVCodecContext};
use cadence_ffmpeg::avformat::open_input::OpenInputToAVInputContext;
use cadence_ffmpeg::avformat::{AVInputContext, AVMediaType};
use cadence_ffmpeg::avframe::AVFrame;
use cadence_ffmpeg::avpacket::AVPacket;
use cadence_ffmpeg::ffi_enum::AVSampleFormat;
use hashbrown::HashMap;

const RATE: i32 = 44100;
const AMPLITUDE: i16 = 16383;

/// The sine never samples its extremum exactly; allow a few counts.
fn assert_peak_near(peak: i16, expected: i16, tolerance: i16) {
    assert!(
        (expected - peak).abs() <= tolerance,
        "peak {} not within {} of {}",
        peak,
        tolerance,
        expected
    );
}

/// Hand-rolled PCM16 WAV with a 440 Hz sine on every channel.
fn sine_wav(rate: i32, channels: u16, samples: usize) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples * channels as usize * 2);
    for i in 0..samples {
        let t = i as f64 / rate as f64;
        let value = ((t * 440.0 * 2.0 * std::f64::consts::PI).sin() * AMPLITUDE as f64) as i16;
        for _ in 0..channels {
            pcm.extend_from_slice(&value.to_le_bytes());
        }
    }

    let block_align = channels * 2;
    let byte_rate = rate as u32 * block_align as u32;
    let data_len = pcm.len() as u32;

    let mut wav = Vec::with_capacity(44 + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&(rate as u32).to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(&pcm);
    wav
}

struct Stats {
    sample_rate: i32,
    channels: i32,
    samples: i64,
    peak: i16,
    title: Option<String>,
}

/// Decode a buffer with the wrapper layer directly and collect totals.
fn decode_stats(data: Vec<u8>) -> Stats {
    let mut input = AVInputContext::open_buffer(data).unwrap();
    let stream_index = input.best_audio_stream().unwrap();
    assert_eq!(
        input.find_stream(AVMediaType::AUDIO).unwrap(),
        vec![stream_index]
    );
    let title = input.metadata("title");

    let codec = AVCodec::new_decoder(&input, stream_index).unwrap();
    let mut decoder = AVCodecContext::new(Some(&codec)).unwrap();
    decoder.apply_stream_parameters(&input, stream_index).unwrap();
    decoder.open(&codec).unwrap();

    let mut pkt = AVPacket::new().unwrap();
    let mut frame = AVFrame::new().unwrap();
    let mut samples = 0i64;
    let mut peak = 0i16;

    let tally = |frame: &AVFrame, samples: &mut i64, peak: &mut i16| {
        *samples += frame.nb_samples() as i64;
        if frame.sample_fmt().unwrap() == AVSampleFormat::S16 {
            for sample in frame.plane::<i16>(0).unwrap() {
                *peak = (*peak).max(sample.saturating_abs());
            }
        }
    };

    while input.read_frame(&mut pkt).unwrap() {
        if pkt.stream_index as u32 != stream_index {
            pkt.release();
            continue;
        }
        decoder.send_packet(&pkt).unwrap();
        pkt.release();
        while decoder.receive_frame(&mut frame).unwrap() {
            tally(&frame, &mut samples, &mut peak);
            frame.release();
        }
    }

    decoder.send_eof_packet().unwrap();
    while decoder.receive_frame(&mut frame).unwrap() {
        tally(&frame, &mut samples, &mut peak);
        frame.release();
    }

    Stats {
        sample_rate: decoder.sample_rate(),
        channels: decoder.nb_channels(),
        samples,
        peak,
        title,
    }
}

fn process(input: &[u8], configure: impl FnOnce(&mut ProcessOptions<'_>)) -> Vec<u8> {
    let metadata = HashMap::new();
    let mut options = ProcessOptions {
        input,
        output_format: OutputFormat::new("wav", "pcm_s16le"),
        filters: None,
        metadata: &metadata,
        start_time: None,
        duration: None,
    };
    configure(&mut options);

    AudioProcessor::new().process(options).unwrap()
}

#[test]
fn test_wav_roundtrip_preserves_samples() {
    let input = sine_wav(RATE, 2, 22050);
    let output = process(&input, |_| {});

    let stats = decode_stats(output);
    assert_eq!(stats.sample_rate, RATE);
    assert_eq!(stats.channels, 2);
    assert_eq!(stats.samples, 22050);
    assert_peak_near(stats.peak, AMPLITUDE, 4);
}

#[test]
fn test_flac_roundtrip_is_lossless() {
    let input = sine_wav(RATE, 2, 22050);
    let output = process(&input, |options| {
        options.output_format = OutputFormat::from_extension("flac");
    });

    let stats = decode_stats(output);
    assert_eq!(stats.sample_rate, RATE);
    assert_eq!(stats.channels, 2);
    assert_eq!(stats.samples, 22050);
    assert_peak_near(stats.peak, AMPLITUDE, 4);
}

#[test]
fn test_volume_filter_halves_peak() {
    let input = sine_wav(RATE, 2, 22050);
    let output = process(&input, |options| {
        options.filters = Some("volume=0.5".to_string());
    });

    let stats = decode_stats(output);
    assert_eq!(stats.samples, 22050);
    let expected = AMPLITUDE / 2;
    assert!(
        (stats.peak - expected).abs() <= 64,
        "peak {} not near {}",
        stats.peak,
        expected
    );
}

#[test]
fn test_empty_filter_chain_is_passthrough() {
    let input = sine_wav(RATE, 2, 4410);
    let output = process(&input, |options| {
        options.filters = Some(String::new());
    });

    let stats = decode_stats(output);
    assert_eq!(stats.samples, 4410);
    assert_peak_near(stats.peak, AMPLITUDE, 4);
}

#[test]
fn test_resample_changes_rate() {
    let input = sine_wav(RATE, 2, 22050);
    let output = process(&input, |options| {
        options.output_format.sample_rate = Some(22050);
    });

    let stats = decode_stats(output);
    assert_eq!(stats.sample_rate, 22050);
    assert!(
        (10800..=11300).contains(&stats.samples),
        "samples: {}",
        stats.samples
    );
}

#[test]
fn test_downmix_to_mono() {
    let input = sine_wav(RATE, 2, 22050);
    let output = process(&input, |options| {
        options.output_format.channels = Some(1);
    });

    let stats = decode_stats(output);
    assert_eq!(stats.channels, 1);
    assert_eq!(stats.sample_rate, RATE);
    // Same-phase channels average back to the original waveform.
    assert!(
        (stats.peak - AMPLITUDE).abs() <= 64,
        "peak: {}",
        stats.peak
    );
}

#[test]
fn test_trim_window() {
    let input = sine_wav(RATE, 2, 22050);
    let output = process(&input, |options| {
        options.start_time = Some(0.25);
        options.duration = Some(0.25);
    });

    let stats = decode_stats(output);
    // Trimming is frame-granular; the window may widen by up to one decoded
    // frame on each side.
    assert!(
        (11025..=14700).contains(&stats.samples),
        "samples: {}",
        stats.samples
    );
}

#[test]
fn test_metadata_tags_land_in_container() {
    let input = sine_wav(RATE, 2, 4410);

    let mut metadata = HashMap::new();
    metadata.insert("title".to_string(), "Sine Test".to_string());

    let options = ProcessOptions {
        input: &input,
        output_format: OutputFormat::new("wav", "pcm_s16le"),
        filters: None,
        metadata: &metadata,
        start_time: None,
        duration: None,
    };
    let output = AudioProcessor::new().process(options).unwrap();

    let stats = decode_stats(output);
    assert_eq!(stats.title.as_deref(), Some("Sine Test"));
}

#[test]
fn test_garbage_input_is_rejected() {
    let metadata = HashMap::new();
    let options = ProcessOptions {
        input: &[0u8; 512],
        output_format: OutputFormat::new("wav", "pcm_s16le"),
        filters: None,
        metadata: &metadata,
        start_time: None,
        duration: None,
    };
    assert!(AudioProcessor::new().process(options).is_err());
}

#[test]
fn test_unknown_codec_is_rejected() {
    let input = sine_wav(RATE, 2, 4410);
    let metadata = HashMap::new();
    let options = ProcessOptions {
        input: &input,
        output_format: OutputFormat::new("wav", "no_such_codec"),
        filters: None,
        metadata: &metadata,
        start_time: None,
        duration: None,
    };
    assert!(AudioProcessor::new().process(options).is_err());
}
