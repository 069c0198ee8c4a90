use super::*;
use std::cell::RefCell;

struct FakeBackend {
    bytes: Option<Vec<u8>>,
    seen: RefCell<Vec<SpeechRequest>>,
}

impl SpeechBackend for FakeBackend {
    async fn synthesize(&self, req: &SpeechRequest, out: &Path) -> ReelResult<()> {
        self.seen.borrow_mut().push(req.clone());
        match &self.bytes {
            Some(b) => std::fs::write(out, b).map_err(|e| ReelError::synthesis(e.to_string())),
            None => Err(ReelError::synthesis("service unavailable")),
        }
    }
}

struct BrokenPipe;

impl SpeechBackend for BrokenPipe {
    async fn synthesize(&self, _req: &SpeechRequest, _out: &Path) -> ReelResult<()> {
        Err(ReelError::Other(anyhow::anyhow!("broken pipe")))
    }
}

#[test]
fn prosody_formats_signed_deltas() {
    let p = Prosody::default();
    assert_eq!(p.rate_arg(), "+10%");
    assert_eq!(p.pitch_arg(), "-15Hz");
    assert_eq!(p.volume_arg(), "+15%");
}

#[test]
fn edge_tts_arguments_carry_voice_and_prosody() {
    let req = SpeechRequest::new("नमस्ते", DEFAULT_VOICE);
    let args = EdgeTtsCli::args(&req, Path::new("/tmp/v.mp3"));
    assert_eq!(
        args,
        vec![
            "--voice",
            "hi-IN-MadhurNeural",
            "--rate=+10%",
            "--pitch=-15Hz",
            "--volume=+15%",
            "--text=नमस्ते",
            "--write-media",
            "/tmp/v.mp3",
        ]
    );
}

#[test]
fn script_starting_with_a_dash_stays_one_argument() {
    let req = SpeechRequest::new("-- सपने देखो", DEFAULT_VOICE);
    let args = EdgeTtsCli::args(&req, Path::new("/tmp/v.mp3"));
    assert!(args.contains(&"--text=-- सपने देखो".to_string()));
    assert!(!args.iter().any(|a| a.starts_with("-- ")));
}

#[test]
fn unavailable_backend_is_a_synthesis_error() {
    let root = tempfile::tempdir().unwrap();
    let scratch = Scratch::create(root.path().join("temp")).unwrap();
    let backend = FakeBackend {
        bytes: None,
        seen: RefCell::new(Vec::new()),
    };
    let err = synthesize_voice(&backend, "hello", DEFAULT_VOICE, &VoiceFx::default(), &scratch)
        .unwrap_err();
    assert!(matches!(err, ReelError::Synthesis(_)));
    assert_eq!(backend.seen.borrow().len(), 1);
}

#[test]
fn failed_post_processing_falls_back_to_raw_file() {
    let root = tempfile::tempdir().unwrap();
    let scratch = Scratch::create(root.path().join("temp")).unwrap();
    let backend = FakeBackend {
        bytes: Some(b"not decodable audio".to_vec()),
        seen: RefCell::new(Vec::new()),
    };
    let track =
        synthesize_voice(&backend, "hello", "en-US-GuyNeural", &VoiceFx::default(), &scratch)
            .unwrap();
    assert!(!track.processed);
    assert_eq!(track.path, scratch.file(RAW_VOICE_FILE));
    assert_eq!(backend.seen.borrow()[0].voice, "en-US-GuyNeural");
}

#[test]
fn empty_script_is_rejected_without_calling_the_backend() {
    let root = tempfile::tempdir().unwrap();
    let scratch = Scratch::create(root.path().join("temp")).unwrap();
    let backend = FakeBackend {
        bytes: Some(vec![1]),
        seen: RefCell::new(Vec::new()),
    };
    assert!(synthesize_voice(&backend, "  ", DEFAULT_VOICE, &VoiceFx::default(), &scratch).is_err());
    assert!(backend.seen.borrow().is_empty());
}

#[test]
fn missing_edge_tts_program_is_a_synthesis_error() {
    let root = tempfile::tempdir().unwrap();
    let scratch = Scratch::create(root.path().join("temp")).unwrap();
    let backend = EdgeTtsCli::with_program(root.path().join("no-such-edge-tts"));
    let err = synthesize_voice(&backend, "hello", DEFAULT_VOICE, &VoiceFx::default(), &scratch)
        .unwrap_err();
    assert!(matches!(err, ReelError::Synthesis(_)));
}

#[test]
fn any_backend_failure_is_reported_as_synthesis() {
    let root = tempfile::tempdir().unwrap();
    let scratch = Scratch::create(root.path().join("temp")).unwrap();
    let err = synthesize_voice(&BrokenPipe, "hello", DEFAULT_VOICE, &VoiceFx::default(), &scratch)
        .unwrap_err();
    assert!(matches!(err, ReelError::Synthesis(ref m) if m.contains("broken pipe")));
}
