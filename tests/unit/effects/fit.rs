use super::*;

const SMALL: Canvas = Canvas {
    width: 9,
    height: 16,
};

#[test]
fn cover_crop_always_hits_the_canvas() {
    for (w, h) in [(1920, 1080), (100, 100), (3, 40), (9, 16), (4000, 3000), (1, 1)] {
        let img = RgbImage::new(w, h);
        let out = cover_crop(&img, SMALL, FilterType::Triangle);
        assert_eq!(out.dimensions(), (9, 16), "input {w}x{h}");
    }
}

#[test]
fn cover_crop_keeps_the_horizontal_center_of_wide_images() {
    // 32x16 image, left quarter red, right quarter blue, middle green.
    let img = RgbImage::from_fn(32, 16, |x, _| match x {
        0..=7 => Rgb([255, 0, 0]),
        24..=31 => Rgb([0, 0, 255]),
        _ => Rgb([0, 255, 0]),
    });
    let out = cover_crop(&img, SMALL, FilterType::Nearest);
    for px in out.pixels() {
        assert_eq!(px.0, [0, 255, 0]);
    }
}

#[test]
fn compose_centers_smaller_frames_on_black() {
    let frame = RgbImage::from_pixel(3, 4, Rgb([200, 200, 200]));
    let out = compose_on_canvas(&frame, SMALL);
    assert_eq!(out.dimensions(), (9, 16));
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(out.get_pixel(4, 8).0, [200, 200, 200]);
}

#[test]
fn compose_passes_canvas_sized_frames_through() {
    let frame = RgbImage::from_pixel(9, 16, Rgb([1, 2, 3]));
    assert_eq!(compose_on_canvas(&frame, SMALL), frame);
}
