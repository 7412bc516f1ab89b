//! Packs extracted fields, recognized text and the annotated image into the
//! response payload.

use base64::{Engine, engine::general_purpose::STANDARD};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use labelscan_core::{ExtractedFields, ExtractionResponse, LabelError};

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Encode an RGB raster as JPEG.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, LabelError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(image)
        .map_err(|e| LabelError::Encode(format!("jpeg encoding failed: {e}")))?;
    Ok(buf)
}

/// Standard, padded base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Build the response for one request.
pub fn assemble(
    fields: ExtractedFields,
    recognized_text: Vec<String>,
    annotated: &RgbImage,
    jpeg_quality: u8,
) -> Result<ExtractionResponse, LabelError> {
    let jpeg = encode_jpeg(annotated, jpeg_quality)?;
    Ok(ExtractionResponse {
        fields,
        ocr_output_image: encode_base64(&jpeg),
        recognized_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};

    #[test]
    fn jpeg_output_decodes_to_same_dimensions() {
        let image = RgbImage::from_pixel(12, 7, Rgb([200, 30, 30]));
        let jpeg = encode_jpeg(&image, DEFAULT_JPEG_QUALITY).unwrap();

        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 7));
    }

    #[test]
    fn response_carries_text_in_order_with_duplicates() {
        let image = RgbImage::new(4, 4);
        let texts = vec!["B".to_string(), "A".to_string(), "B".to_string()];
        let resp = assemble(ExtractedFields::default(), texts.clone(), &image, 80).unwrap();

        assert_eq!(resp.recognized_text, texts);
        assert!(resp.fields.is_empty());
        let jpeg = STANDARD.decode(&resp.ocr_output_image).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn base64_is_padded_standard_alphabet() {
        assert_eq!(encode_base64(b"ab"), "YWI=");
        assert_eq!(encode_base64(&[0xfb, 0xff]), "+/8=");
    }
}
