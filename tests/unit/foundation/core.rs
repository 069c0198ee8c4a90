use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn clip_durations_land_on_whole_frames() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames_round(2.0), 60);
    assert_eq!(fps.secs_to_frames_round(1.0), 30);
    assert!((fps.frames_to_secs(600) - 20.0).abs() < 1e-12);
}

#[test]
fn reel_canvas_is_vertical_9_16() {
    let c = Canvas::REEL;
    assert_eq!(c.width * 16, c.height * 9);
    assert_eq!(c.rgb24_len(), 1080 * 1920 * 3);
    assert_eq!(c.rect().width(), 1080.0);
}
