//! Source image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{DecodeError, Orientation, SourceImage};

/// Decode a JPEG, PNG or WebP file, applying EXIF orientation correction.
///
/// Browsers render images with their EXIF orientation applied, so the
/// natural dimensions reported here are the oriented ones.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be determined,
/// `DecodeError::UnsupportedFormat` for formats other than JPEG/PNG/WebP and
/// `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let img = decode_dynamic(bytes)?;
    let oriented = apply_orientation(img, get_orientation(bytes));
    Ok(SourceImage::from_rgba_image(oriented.into_rgba8()))
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    match reader.format() {
        Some(ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP) => {}
        Some(other) => return Err(DecodeError::UnsupportedFormat(format!("{:?}", other))),
        None => return Err(DecodeError::InvalidFormat),
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Read the EXIF orientation tag.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
            .unwrap();
        buf
    }

    fn two_pixel_image() -> RgbaImage {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 255, 0, 128]));
        img
    }

    #[test]
    fn test_decode_png() {
        let bytes = png_bytes(&two_pixel_image());
        let decoded = decode_image(&bytes).unwrap();

        assert_eq!(decoded.width, 2);
        assert_eq!(decoded.height, 1);
        assert_eq!(decoded.pixels, two_pixel_image().into_raw());
    }

    #[test]
    fn test_decode_invalid_bytes() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_decode_unsupported_gif() {
        let gif_header = b"GIF89a\x01\x00\x01\x00\x00\x00\x00";
        let result = decode_image(gif_header);
        assert!(matches!(result, Err(DecodeError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(&two_pixel_image());
        let result = decode_image(&bytes[..20]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_orientation_without_exif() {
        let bytes = png_bytes(&two_pixel_image());
        assert_eq!(get_orientation(&bytes), Orientation::Normal);
        assert_eq!(get_orientation(&[0x00, 0x01]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps_dimensions() {
        let img = DynamicImage::ImageRgba8(two_pixel_image());
        let rotated = apply_orientation(img, Orientation::Rotate90CW);
        assert_eq!((rotated.width(), rotated.height()), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let img = DynamicImage::ImageRgba8(two_pixel_image());
        let flipped = apply_orientation(img, Orientation::FlipHorizontal).into_rgba8();
        assert_eq!(flipped.get_pixel(0, 0).0, [0, 255, 0, 128]);
        assert_eq!(flipped.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }
}
