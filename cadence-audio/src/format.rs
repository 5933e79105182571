/// Target container and codec for one processing run.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    /// Container format name (e.g. "mp3", "ogg", "flac", "wav", "ipod" for m4a)
    pub format: String,
    /// Codec name (e.g. "libmp3lame", "libvorbis", "flac", "pcm_s16le", "aac")
    pub codec: Option<String>,
    /// Sample rate in Hz; defaults to the input's rate
    pub sample_rate: Option<i32>,
    /// Channel count; defaults to the input's
    pub channels: Option<i32>,
    /// Bit rate in bits per second
    pub bit_rate: Option<i64>,
    /// Quality for VBR encoding (codec-specific)
    pub quality: Option<f32>,
    /// Compression level (codec-specific)
    pub compression_level: Option<i32>,
}

impl OutputFormat {
    pub fn new(format: &str, codec: &str) -> Self {
        Self {
            format: format.to_string(),
            codec: Some(codec.to_string()),
            sample_rate: None,
            channels: None,
            bit_rate: None,
            quality: None,
            compression_level: None,
        }
    }

    /// Pick container and codec from a file extension, defaulting to mp3.
    pub fn from_extension(ext: &str) -> Self {
        let (format, codec) = match ext.to_lowercase().as_str() {
            "mp3" => ("mp3", "libmp3lame"),
            "wav" => ("wav", "pcm_s16le"),
            "flac" => ("flac", "flac"),
            "ogg" => ("ogg", "libvorbis"),
            "m4a" => ("ipod", "aac"),
            "opus" => ("ogg", "libopus"),
            _ => ("mp3", "libmp3lame"),
        };

        Self::new(format, codec)
    }
}

#[test]
fn test_output_format_from_extension() {
    let mp3 = OutputFormat::from_extension("mp3");
    assert_eq!(mp3.format, "mp3");
    assert_eq!(mp3.codec.as_deref(), Some("libmp3lame"));

    let wav = OutputFormat::from_extension("WAV");
    assert_eq!(wav.format, "wav");
    assert_eq!(wav.codec.as_deref(), Some("pcm_s16le"));

    let flac = OutputFormat::from_extension("flac");
    assert_eq!(flac.format, "flac");
    assert_eq!(flac.codec.as_deref(), Some("flac"));

    let unknown = OutputFormat::from_extension("xyz");
    assert_eq!(unknown.format, "mp3");
}
