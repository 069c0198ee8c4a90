use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn scale_is_exact_at_both_boundaries() {
    for r in [1.0001, 1.15, 1.2, 1.25, 1.5, 2.0, 3.7] {
        let kb = KenBurns::new(r).unwrap();
        for d in [0.001, 1.0, 2.0, 2.5, 7.3] {
            assert_eq!(kb.scale_at(0.0, d), 1.0);
            assert_eq!(kb.scale_at(d, d), r);
        }
    }
}

#[test]
fn scale_is_linear_between_boundaries() {
    let kb = KenBurns::new(1.2).unwrap();
    assert!((kb.scale_at(1.0, 2.0) - 1.1).abs() < 1e-12);
    assert!((kb.scale_at(0.5, 2.0) - 1.05).abs() < 1e-12);
    assert_eq!(kb.scale_at(-1.0, 2.0), 1.0);
    assert_eq!(kb.scale_at(5.0, 2.0), 1.2);
}

#[test]
fn ratios_at_or_below_one_are_rejected() {
    assert!(KenBurns::new(1.0).is_err());
    assert!(KenBurns::new(0.5).is_err());
    assert!(KenBurns::new(f64::NAN).is_err());
}

#[test]
fn random_ratios_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let kb = KenBurns::random(&mut rng);
        assert!(KenBurns::ZOOM_RANGE.contains(&kb.zoom_ratio));
    }
}

#[test]
fn viewport_shrinks_around_the_center() {
    let kb = KenBurns::new(1.25).unwrap();
    let frame = Rect::new(0.0, 0.0, 1080.0, 1920.0);
    assert_eq!(kb.viewport(frame, 0.0, 2.0), frame);

    let end = kb.viewport(frame, 2.0, 2.0);
    assert!((end.width() - 864.0).abs() < 1e-9);
    assert!((end.height() - 1536.0).abs() < 1e-9);
    assert!((end.center().x - 540.0).abs() < 1e-9);
    assert!((end.center().y - 960.0).abs() < 1e-9);
}

#[test]
fn render_at_start_reproduces_the_source() {
    let src = RgbImage::from_fn(12, 20, |x, y| Rgb([(x * 20) as u8, (y * 12) as u8, 7]));
    let kb = KenBurns::new(1.2).unwrap();
    let out = kb.render(&src, 0.0, 2.0);
    assert_eq!(out, src);
}

#[test]
fn render_zooms_into_the_center() {
    // Left half black, right half white: zooming keeps the split at the center but the
    // outermost columns stay on their own side.
    let src = RgbImage::from_fn(40, 40, |x, _| {
        if x < 20 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
    });
    let kb = KenBurns::new(2.0).unwrap();
    let out = kb.render(&src, 2.0, 2.0);
    assert_eq!(out.dimensions(), (40, 40));
    assert_eq!(out.get_pixel(0, 20).0, [0, 0, 0]);
    assert_eq!(out.get_pixel(39, 20).0, [255, 255, 255]);
}
