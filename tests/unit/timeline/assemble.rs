use super::*;
use crate::foundation::core::{Canvas, FrameIndex};
use image::{Rgb, RgbImage};
use std::path::PathBuf;

fn small_format() -> ReelFormat {
    ReelFormat {
        canvas: Canvas {
            width: 18,
            height: 32,
        },
        ..ReelFormat::default()
    }
}

fn write_image(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(w, h, Rgb([120, 90, 60]))
        .save(&path)
        .unwrap();
    path
}

fn image_entry(path: PathBuf) -> PlanEntry {
    PlanEntry::Image {
        path,
        motion: KenBurns::new(1.2).unwrap(),
    }
}

#[test]
fn stills_are_filtered_saved_and_cropped_to_the_canvas() {
    let root = tempfile::tempdir().unwrap();
    let a = write_image(root.path(), "a.png", 40, 40);
    let b = write_image(root.path(), "b.png", 10, 60);
    let scratch = Scratch::create(root.path().join("temp")).unwrap();
    let plan = TimelinePlan {
        filter: FilterKind::Warm,
        entries: vec![image_entry(a.clone()), image_entry(b)],
    };

    let format = small_format();
    let timeline = assemble_timeline(&plan, &format, &scratch).unwrap();
    assert_eq!(timeline.image_count(), 2);
    assert_eq!(timeline.duration_frames(), 120);
    assert_eq!(timeline.clips()[0].source(), a.as_path());
    assert!(scratch.file("filtered_000.jpg").is_file());
    assert!(scratch.file("filtered_001.jpg").is_file());

    let frame = timeline.render_frame(FrameIndex(0)).unwrap();
    assert_eq!(frame.dimensions(), (18, 32));
}

#[test]
fn unloadable_transitions_are_skipped() {
    let root = tempfile::tempdir().unwrap();
    let a = write_image(root.path(), "a.png", 20, 20);
    let b = write_image(root.path(), "b.png", 20, 20);
    let scratch = Scratch::create(root.path().join("temp")).unwrap();
    let plan = TimelinePlan {
        filter: FilterKind::Cinematic,
        entries: vec![
            image_entry(a),
            PlanEntry::Transition {
                path: root.path().join("missing.mp4"),
            },
            image_entry(b),
        ],
    };

    let timeline = assemble_timeline(&plan, &small_format(), &scratch).unwrap();
    assert_eq!(timeline.transition_count(), 0);
    assert_eq!(timeline.duration_frames(), 120);
}

#[test]
fn unreadable_images_abort_assembly() {
    let root = tempfile::tempdir().unwrap();
    let bogus = root.path().join("broken.jpg");
    std::fs::write(&bogus, b"not an image").unwrap();
    let scratch = Scratch::create(root.path().join("temp")).unwrap();
    let plan = TimelinePlan {
        filter: FilterKind::Cool,
        entries: vec![image_entry(bogus)],
    };
    let err = assemble_timeline(&plan, &small_format(), &scratch).unwrap_err();
    assert!(matches!(err, ReelError::Media(_)));
}
