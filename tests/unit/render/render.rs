use super::*;
use crate::effects::motion::KenBurns;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Canvas, Fps};
use crate::timeline::clip::Clip;
use image::{Rgb, RgbImage};

fn timeline(clips: &[(u8, u64)]) -> Timeline {
    let mut tl = Timeline::new(
        Canvas {
            width: 6,
            height: 10,
        },
        Fps { num: 30, den: 1 },
    );
    for &(color, frames) in clips {
        let img = RgbImage::from_pixel(6, 10, Rgb([color; 3]));
        tl.push(Clip::still(
            "a.jpg",
            "filtered.jpg",
            img,
            KenBurns::new(1.2).unwrap(),
            frames,
        ));
    }
    tl
}

#[test]
fn frames_reach_the_sink_in_order() {
    let tl = timeline(&[(10, 7), (200, 5)]);
    let mut sink = InMemorySink::new();
    let opts = RenderOpts {
        workers: 3,
        chunk_size: 4,
    };
    let stats = render_timeline(&tl, None, &mut sink, &opts).unwrap();

    assert_eq!(stats.frames_total, 12);
    assert_eq!(stats.chunks, 3);
    assert!(sink.is_finished());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, (0..12).collect::<Vec<_>>());
    assert_eq!(sink.frames()[0].1.get_pixel(3, 5).0, [10; 3]);
    assert_eq!(sink.frames()[7].1.get_pixel(3, 5).0, [200; 3]);
}

#[test]
fn sink_config_carries_geometry_and_audio() {
    let tl = timeline(&[(1, 2)]);
    let mut sink = InMemorySink::new();
    let audio = AudioInputConfig {
        path: "mix.f32le".into(),
        sample_rate: 48_000,
        channels: 2,
    };
    render_timeline(&tl, Some(audio.clone()), &mut sink, &RenderOpts::default()).unwrap();
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (6, 10));
    assert_eq!(cfg.fps, Fps { num: 30, den: 1 });
    assert_eq!(cfg.audio, Some(audio));
}

#[test]
fn empty_timelines_and_zero_workers_are_rejected() {
    let mut sink = InMemorySink::new();
    let err = render_timeline(&timeline(&[]), None, &mut sink, &RenderOpts::default()).unwrap_err();
    assert!(matches!(err, ReelError::Render(_)));

    let opts = RenderOpts {
        workers: 0,
        chunk_size: 4,
    };
    let err = render_timeline(&timeline(&[(1, 1)]), None, &mut sink, &opts).unwrap_err();
    assert!(matches!(err, ReelError::Config(_)));
}
