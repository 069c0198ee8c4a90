use super::*;
use crate::encode::sink::AudioInputConfig;

fn cfg(audio: Option<AudioInputConfig>) -> SinkConfig {
    SinkConfig {
        width: 1080,
        height: 1920,
        fps: Fps { num: 30, den: 1 },
        audio,
    }
}

fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
    args.windows(2).any(|w| w[0] == flag && w[1] == value)
}

#[test]
fn video_only_args_use_fixed_codec_and_preset() {
    let opts = FfmpegSinkOpts::new("out/reel.mp4");
    let args = encoder_args(&cfg(None), &opts);
    assert!(has_pair(&args, "-s", "1080x1920"));
    assert!(has_pair(&args, "-r", "30/1"));
    assert!(has_pair(&args, "-pix_fmt", "rgb24"));
    assert!(has_pair(&args, "-c:v", "libx264"));
    assert!(has_pair(&args, "-preset", "medium"));
    assert!(has_pair(&args, "-threads", "4"));
    assert!(args.iter().any(|a| a == "-an"));
    assert_eq!(args.last().map(String::as_str), Some("out/reel.mp4"));
}

#[test]
fn audio_input_is_added_as_second_stream() {
    let opts = FfmpegSinkOpts::new("reel.mp4");
    let audio = AudioInputConfig {
        path: PathBuf::from("temp/mix.f32le"),
        sample_rate: 48_000,
        channels: 2,
    };
    let args = encoder_args(&cfg(Some(audio)), &opts);
    assert!(has_pair(&args, "-f", "f32le"));
    assert!(has_pair(&args, "-ar", "48000"));
    assert!(has_pair(&args, "-i", "temp/mix.f32le"));
    assert!(has_pair(&args, "-c:a", "aac"));
    assert!(!args.iter().any(|a| a == "-an"));
}

#[test]
fn odd_dimensions_are_rejected_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(
        std::env::temp_dir().join("reelsmith_never_written.mp4"),
    ));
    let mut c = cfg(None);
    c.width = 1081;
    assert!(matches!(sink.begin(c), Err(ReelError::Config(_))));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = RgbImage::new(2, 2);
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
}
