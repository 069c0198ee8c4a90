use super::*;

fn stereo(frames: usize, value: f32) -> AudioPcm {
    AudioPcm {
        sample_rate: 4,
        channels: 2,
        interleaved_f32: vec![value; frames * 2],
    }
}

fn ramp(frames: usize) -> AudioPcm {
    AudioPcm {
        sample_rate: 4,
        channels: 2,
        interleaved_f32: (0..frames).flat_map(|i| [i as f32 * 0.01; 2]).collect(),
    }
}

#[test]
fn frame_to_sample_uses_rational_fps() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(frame_to_sample(600, fps, 48_000), 960_000);
    let ntsc = Fps::new(30000, 1001).unwrap();
    let samples = frame_to_sample(300, ntsc, 48_000);
    assert!(samples > 470_000 && samples < 490_000);
}

#[test]
fn output_length_is_exact_for_every_combination() {
    for d in [1usize, 5, 16, 40] {
        for v in [1usize, 5, 16, 40] {
            for m in [1usize, 3, 16, 41] {
                let voice = stereo(v, 0.5);
                let music = stereo(m, 0.5);
                for (vo, mo) in [
                    (Some(&voice), None),
                    (None, Some(&music)),
                    (Some(&voice), Some(&music)),
                ] {
                    let out = mix_tracks(vo, mo, d, 0.3).unwrap().unwrap();
                    assert_eq!(out.frames(), d, "d={d} v={v} m={m}");
                }
            }
        }
    }
}

#[test]
fn no_tracks_means_no_audio() {
    assert!(mix_tracks(None, None, 100, 0.3).unwrap().is_none());
}

#[test]
fn voice_longer_than_video_is_truncated() {
    let voice = ramp(10);
    let out = mix_tracks(Some(&voice), None, 4, 0.3).unwrap().unwrap();
    assert_eq!(out.interleaved_f32, voice.interleaved_f32[..8].to_vec());
}

#[test]
fn short_music_loops_then_trims_exactly() {
    let music = ramp(3);
    let out = loop_to_length(&music, 7);
    assert_eq!(out.frames(), 7);
    let left: Vec<f32> = out.interleaved_f32.iter().step_by(2).copied().collect();
    assert_eq!(left, vec![0.0, 0.01, 0.02, 0.0, 0.01, 0.02, 0.0]);
}

#[test]
fn music_is_ducked_under_voice_and_summed() {
    let voice = stereo(2, 0.5);
    let music = stereo(8, 0.5);
    let out = mix_tracks(Some(&voice), Some(&music), 4, 0.3).unwrap().unwrap();
    let expected = [0.65, 0.65, 0.65, 0.65, 0.15, 0.15, 0.15, 0.15];
    for (got, want) in out.interleaved_f32.iter().zip(expected) {
        assert!((got - want).abs() < 1e-6, "{got} vs {want}");
    }
}

#[test]
fn music_alone_keeps_full_level() {
    let music = stereo(2, 0.5);
    let out = mix_tracks(None, Some(&music), 3, 0.3).unwrap().unwrap();
    assert!(out.interleaved_f32.iter().all(|s| (s - 0.5).abs() < 1e-6));
}

#[test]
fn empty_music_is_ignored() {
    let voice = stereo(2, 0.25);
    let empty = stereo(0, 0.0);
    let out = mix_tracks(Some(&voice), Some(&empty), 2, 0.3).unwrap().unwrap();
    assert_eq!(out.interleaved_f32, vec![0.25; 4]);
    assert!(mix_tracks(None, Some(&empty), 2, 0.3).unwrap().is_none());
}

#[test]
fn superimpose_clamps_to_full_scale() {
    let a = stereo(1, 0.8);
    let b = stereo(1, 0.8);
    assert_eq!(superimpose(&a, &b).interleaved_f32, vec![1.0, 1.0]);
}

#[test]
fn mismatched_formats_are_rejected() {
    let voice = stereo(2, 0.1);
    let mut music = stereo(2, 0.1);
    music.sample_rate = 8;
    assert!(mix_tracks(Some(&voice), Some(&music), 2, 0.3).is_err());
}

#[test]
fn audio_tracks_drop_samples_on_release() {
    let mut track = AudioTrack::new("voice", stereo(3, 0.2));
    assert_eq!(track.pcm().map(AudioPcm::frames), Some(3));
    assert!(!track.is_released());
    track.release().unwrap();
    track.release().unwrap();
    assert!(track.is_released());
    assert!(track.pcm().is_none());
    assert_eq!(track.label(), "audio voice");
}
