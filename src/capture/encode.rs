use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::jpeg::JpegEncoder, DynamicImage, RgbaImage};

use super::frame::VideoFrame;

const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// JPEG-encode a frame (alpha dropped) at the given quality, 1-100.
pub fn encode_jpeg(frame: &VideoFrame, quality: u8) -> Result<Vec<u8>> {
    let rgba = RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .context("frame buffer does not match its dimensions")?;
    let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .encode_image(&rgb)
        .context("jpeg encoding failed")?;
    Ok(out)
}

/// Frame as a `data:image/jpeg;base64,...` URI, the form the analyzer expects.
pub fn encode_data_uri(frame: &VideoFrame, quality: u8) -> Result<String> {
    let jpeg = encode_jpeg(frame, quality)?;
    Ok(format!("{DATA_URI_PREFIX}{}", STANDARD.encode(jpeg)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_decodes_back_to_jpeg() {
        let frame = VideoFrame::filled(16, 12, [200, 120, 90]);
        let uri = encode_data_uri(&frame, 80).unwrap();

        let payload = uri.strip_prefix(DATA_URI_PREFIX).unwrap();
        let bytes = STANDARD.decode(payload).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 12));
    }

    #[test]
    fn test_mismatched_buffer_is_an_error() {
        let mut frame = VideoFrame::filled(4, 4, [0, 0, 0]);
        frame.data.truncate(10);
        assert!(encode_jpeg(&frame, 80).is_err());
    }
}
