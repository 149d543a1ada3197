use super::*;

use image::GenericImageView;

fn layer(color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(2, 2, Rgba(color))
}

#[test]
fn opaque_foreground_hides_background() {
    let out = alpha_composite(&layer([0, 0, 255, 255]), &layer([10, 20, 30, 255]));
    assert_eq!(*out.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
}

#[test]
fn transparent_foreground_shows_background() {
    let out = alpha_composite(&layer([0, 0, 255, 255]), &layer([10, 20, 30, 0]));
    assert_eq!(*out.get_pixel(1, 1), Rgba([0, 0, 255, 255]));
}

#[test]
fn half_alpha_blends_over_opaque_background() {
    let out = alpha_composite(&layer([0, 0, 0, 255]), &layer([255, 255, 255, 128]));
    let px = out.get_pixel(0, 0);
    assert_eq!(px[3], 255);
    assert!((127..=129).contains(&px[0]), "got {px:?}");
}

#[test]
fn two_transparent_layers_stay_transparent() {
    let out = alpha_composite(&layer([9, 9, 9, 0]), &layer([7, 7, 7, 0]));
    assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
}

#[test]
fn solid_background_matches_foreground_size() {
    let bg = build_background(&Backdrop::Solid(HexColor::new(1, 2, 3)), 5, 3);
    assert_eq!(bg.dimensions(), (5, 3));
    assert_eq!(*bg.get_pixel(4, 2), Rgba([1, 2, 3, 255]));
}

#[test]
fn image_background_is_resized_to_foreground() {
    let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 10, Rgba([50, 60, 70, 255])));
    let bg = build_background(&Backdrop::Image(source), 8, 8);
    assert_eq!(bg.dimensions(), (8, 8));
    assert_eq!(*bg.get_pixel(3, 3), Rgba([50, 60, 70, 255]));
}

#[test]
fn composed_png_is_flattened_rgb_with_foreground_size() {
    let mut fg = RgbaImage::from_pixel(4, 3, Rgba([0, 0, 0, 0]));
    fg.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    let png = compose_png(
        &DynamicImage::ImageRgba8(fg),
        &Backdrop::Solid(HexColor::new(0, 255, 0)),
    )
    .expect("compose");

    let decoded = decode_image(&png).expect("decode");
    assert_eq!(decoded.dimensions(), (4, 3));
    assert!(!decoded.color().has_alpha());
    let rgb = decoded.to_rgb8();
    assert_eq!(rgb.get_pixel(0, 0).0, [255, 0, 0]);
    assert_eq!(rgb.get_pixel(3, 2).0, [0, 255, 0]);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(matches!(
        decode_image(b"definitely not an image"),
        Err(ComposeError::Decode(_))
    ));
}
