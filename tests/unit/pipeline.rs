use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::voice::synth::{EdgeTtsCli, SpeechRequest};
use image::{Rgb, RgbImage};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Backend that writes bytes no decoder accepts.
struct GarbageVoice;

impl SpeechBackend for GarbageVoice {
    async fn synthesize(&self, _req: &SpeechRequest, out: &Path) -> ReelResult<()> {
        std::fs::write(out, b"not an mp3 stream").map_err(|e| ReelError::synthesis(e.to_string()))
    }
}

fn tiny_format() -> ReelFormat {
    ReelFormat {
        canvas: Canvas {
            width: 18,
            height: 32,
        },
        ..ReelFormat::default()
    }
}

#[test]
fn empty_image_pool_fails_before_any_file_io() {
    let root = tempfile::tempdir().unwrap();
    let cfg = ReelConfig::rooted(root.path());
    std::fs::create_dir_all(&cfg.images_dir).unwrap();
    std::fs::write(cfg.images_dir.join("notes.txt"), "not an image").unwrap();

    let err = create_reel(
        &cfg,
        "script",
        &ReelOptions::default(),
        Some(&EdgeTtsCli::default()),
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap_err();

    assert!(matches!(err, ReelError::Config(_)));
    assert!(!cfg.temp_dir.exists());
    assert!(!cfg.output_dir.exists());
}

#[test]
fn defaults_match_the_reel_layout() {
    let opts = ReelOptions::default();
    assert_eq!(opts.output_name, "viral_reel.mp4");
    assert_eq!(opts.voice, "hi-IN-MadhurNeural");
    assert!(opts.use_voice && opts.use_transitions && opts.use_music);
    assert_eq!(opts.format.image_frames(), 60);
    assert_eq!(opts.format.transition_frames(), 30);
}

#[test]
fn in_memory_build_renders_releases_and_reclaims_scratch() {
    let root = tempfile::tempdir().unwrap();
    let cfg = ReelConfig::rooted(root.path());
    std::fs::create_dir_all(&cfg.images_dir).unwrap();
    for (i, name) in ["a.png", "b.png", "c.jpg"].iter().enumerate() {
        RgbImage::from_pixel(40 + i as u32 * 10, 60, Rgb([150, 100, 50]))
            .save(cfg.images_dir.join(name))
            .unwrap();
    }
    let opts = ReelOptions {
        image_count: Some(2),
        filter: Some(FilterKind::Cool),
        use_transitions: false,
        use_music: false,
        format: tiny_format(),
        ..ReelOptions::default()
    };
    let mut sink = InMemorySink::new();

    let summary = create_reel_with_sink(
        &cfg,
        "सपने सच होते हैं",
        &opts,
        Some(&GarbageVoice),
        &mut StdRng::seed_from_u64(11),
        &mut sink,
    )
    .unwrap();

    assert!(sink.is_finished());
    let frames = sink.frames();
    assert_eq!(frames.len() as u64, 2 * opts.format.image_frames());
    assert!(frames.iter().enumerate().all(|(i, (idx, _))| *idx == FrameIndex(i as u64)));
    assert_eq!(frames[0].1.dimensions(), (18, 32));
    assert_eq!(sink.config().unwrap().audio.is_some(), summary.has_audio);

    assert_eq!(summary.image_count, 2);
    assert_eq!(summary.transition_count, 0);
    assert_eq!(summary.filter, FilterKind::Cool);
    assert!(summary.voice.is_some());
    assert_eq!(summary.file_size, 0);
    assert!(summary.thumbnail.is_none());

    let cleanup = summary.cleanup.unwrap();
    assert!(cleanup.files_removed >= 3, "{cleanup:?}");
    assert!(!cfg.temp_dir.exists());
}

#[test]
fn only_recoverable_failures_degrade() {
    assert_eq!(
        degraded::<()>("music", Err(ReelError::media("bad mp3"))).unwrap(),
        None
    );
    assert_eq!(
        degraded::<()>("cleanup", Err(ReelError::cleanup("busy"))).unwrap(),
        None
    );
    assert_eq!(degraded("voice", Ok(3)).unwrap(), Some(3));

    let disk = degraded::<()>(
        "mix",
        Err(ReelError::Other(anyhow::anyhow!("no space left on device"))),
    );
    assert!(matches!(disk, Err(ReelError::Other(_))));
    assert!(matches!(
        degraded::<()>("render", Err(ReelError::render("ffmpeg died"))),
        Err(ReelError::Render(_))
    ));
}
