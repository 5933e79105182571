use convert_case::{Case, Casing};
use rayon::prelude::*;
use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");
    println!("cargo:rerun-if-env-changed=FFMPEG_INCLUDE_DIR");
    println!("cargo:rerun-if-env-changed=FFMPEG_LIB_DIR");
    println!("cargo:rerun-if-env-changed=FFMPEG_STATIC");
    println!("cargo:rerun-if-changed=ffi/ffmpeg.h");

    let static_link = env::var("FFMPEG_STATIC").map(|v| v == "1").unwrap_or(false);

    let (include_dir, lib_dir) = match env::var("FFMPEG_DIR") {
        Ok(dir) => (format!("{}/include", dir), format!("{}/lib", dir)),
        Err(_) => probe_pkg_config(static_link).unwrap_or_else(|e| {
            eprintln!("pkg-config failed: {}", e);
            eprintln!("Set FFMPEG_DIR to point to your FFmpeg installation");
            panic!("Cannot find FFmpeg libraries");
        }),
    };

    let include_dir = env::var("FFMPEG_INCLUDE_DIR").unwrap_or(include_dir);
    let lib_dir = env::var("FFMPEG_LIB_DIR").unwrap_or(lib_dir);

    if !lib_dir.is_empty() {
        println!("cargo:rustc-link-search=native={}", lib_dir);
    }

    let link_type = if static_link { "static" } else { "dylib" };
    for lib in ["avformat", "avcodec", "avfilter", "swresample", "avutil"] {
        println!("cargo:rustc-link-lib={}={}", link_type, lib);
    }

    let mut builder = bindgen::Builder::default()
        .header("./ffi/ffmpeg.h")
        .generate_comments(false)
        .allowlist_type("AV.*")
        .allowlist_type("Swr.*")
        .allowlist_function("av_.*")
        .allowlist_function("avformat_.*")
        .allowlist_function("avcodec_.*")
        .allowlist_function("avfilter_.*")
        .allowlist_function("avio_.*")
        .allowlist_function("swr_.*")
        .allowlist_var("AV.*")
        .allowlist_var("FF_.*")
        .allowlist_var("AVERROR.*")
        .allowlist_var("LIBAV.*")
        .blocklist_type("max_align_t")
        // Defined by hand in src/ffi (FFERRTAG macros are invisible to bindgen).
        .blocklist_item("AVERROR_EOF")
        .derive_default(true)
        .merge_extern_blocks(true)
        .layout_tests(false);

    if !include_dir.is_empty() {
        builder = builder.clang_arg(format!("-I{}", include_dir));
    }

    let bindings = builder.generate().expect("Unable to generate FFmpeg bindings");

    let out_path = PathBuf::from(env::var("OUT_DIR").unwrap());
    bindings
        .write_to_file(out_path.join("bindings.rs"))
        .expect("Couldn't write bindings!");

    let source = bindings.to_string();
    let codec_id = extract_enum(&source, "AVCodecID_AV_CODEC_ID_", "u32");
    std::fs::write(out_path.join("codec_id.rs"), codec_id).unwrap();

    let sample_fmt = extract_enum(&source, "AVSampleFormat_AV_SAMPLE_FMT_", "i32");
    std::fs::write(out_path.join("sample_fmt.rs"), sample_fmt).unwrap();
}

fn probe_pkg_config(static_link: bool) -> Result<(String, String), String> {
    let mut include_dirs = Vec::new();
    let mut lib_dirs = Vec::new();

    let libs = [
        "libavformat",
        "libavcodec",
        "libavfilter",
        "libswresample",
        "libavutil",
    ];

    for lib_name in &libs {
        let mut config = pkg_config::Config::new();
        config.statik(static_link);

        match config.probe(lib_name) {
            Ok(lib) => {
                for path in lib.include_paths {
                    let path = path.to_string_lossy().to_string();
                    if !include_dirs.contains(&path) {
                        include_dirs.push(path);
                    }
                }
                for path in lib.link_paths {
                    let path = path.to_string_lossy().to_string();
                    if !lib_dirs.contains(&path) {
                        lib_dirs.push(path);
                    }
                }
            }
            Err(e) => return Err(format!("{}: {}", lib_name, e)),
        }
    }

    Ok((
        include_dirs.first().cloned().unwrap_or_default(),
        lib_dirs.first().cloned().unwrap_or_default(),
    ))
}

/// Turn a constified bindgen enum back into a real Rust enum that
/// `num_enum::TryFromPrimitive` can convert from the raw value.
fn extract_enum(source: &str, pattern: &str, repr: &str) -> String {
    let name = pattern
        .chars()
        .take_while(|c| *c != '_')
        .collect::<String>();

    let mut variants = source
        .lines()
        .enumerate()
        .par_bridge()
        .filter(|(_, line)| line.trim_start().starts_with("pub const") && line.contains(pattern))
        .filter_map(|(order, line)| {
            // pub const AVSampleFormat_AV_SAMPLE_FMT_FLTP: AVSampleFormat = 8;
            let tail = line.split(pattern).nth(1)?;
            let (variant, value) = tail.split_once(':')?;
            let value = value
                .split_once('=')?
                .1
                .trim()
                .trim_end_matches(';')
                .trim()
                .parse::<i64>()
                .ok()?;

            let variant = variant.trim().to_case(Case::UpperCamel);
            let variant = if variant.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                format!("_{}", variant)
            } else {
                variant
            };

            Some((value, order, variant))
        })
        .collect::<Vec<_>>();

    // Sentinels like AV_CODEC_ID_FIRST_AUDIO alias the discriminant of the
    // first real entry; keep the later declaration for each value.
    variants.sort_by(|a, b| (a.0, std::cmp::Reverse(a.1)).cmp(&(b.0, std::cmp::Reverse(b.1))));
    variants.dedup_by_key(|(value, _, _)| *value);

    let body = variants
        .iter()
        .map(|(value, _, variant)| format!("    {} = {},\n", variant, value))
        .collect::<String>();

    format!(
        "#[repr({})]\n#[derive(num_enum::TryFromPrimitive, Copy, Clone, PartialEq, Eq, Debug, Hash)]\npub enum {} {{\n{}}}\n",
        repr, name, body
    )
}
