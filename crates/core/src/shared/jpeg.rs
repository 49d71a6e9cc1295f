use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use super::frame::Frame;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encodes a gray or RGB frame as JPEG.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let color = match frame.channels() {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        n => {
            return Err(image::ImageError::Unsupported(
                image::error::UnsupportedError::from_format_and_kind(
                    image::ImageFormat::Jpeg.into(),
                    image::error::UnsupportedErrorKind::GenericFeature(format!("{n}-channel frames")),
                ),
            ))
        }
    };
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode(frame.data(), frame.width(), frame.height(), color)?;
    Ok(buf)
}
