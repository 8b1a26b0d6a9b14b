// Host-side tests for particle mask decoding (no GPU needed)
use ocean_render::MaskImage;
use std::io::Cursor;

fn png_bytes(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(pixel));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn decodes_png_into_packed_rgba() {
    let mask = MaskImage::decode(&png_bytes(3, 2, [200, 10, 20, 255])).unwrap();
    assert_eq!((mask.width, mask.height), (3, 2));
    assert_eq!(mask.rgba.len(), 3 * 2 * 4);
    assert_eq!(&mask.rgba[..4], &[200, 10, 20, 255]);
}

#[test]
fn garbage_bytes_are_an_error() {
    assert!(MaskImage::decode(b"not an image").is_err());
}

#[test]
fn fallback_is_single_white_texel() {
    let mask = MaskImage::decode_or_solid(&[]);
    assert_eq!(mask, MaskImage::solid());
    assert_eq!((mask.width, mask.height), (1, 1));
    assert_eq!(mask.rgba, vec![255; 4]);
}

#[test]
fn valid_bytes_skip_the_fallback() {
    let mask = MaskImage::decode_or_solid(&png_bytes(4, 4, [0, 0, 0, 0]));
    assert_eq!(mask.width, 4);
    assert!(mask.rgba.iter().all(|&b| b == 0));
}
