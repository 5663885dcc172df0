use snaplabel_types::CapturedImage;

/// Decode an encoded image payload into RGBA8. `None` when nothing decodable is there.
pub fn decode_image(bytes: &[u8]) -> Option<CapturedImage> {
    if bytes.is_empty() {
        return None;
    }

    match image::load_from_memory(bytes) {
        Ok(decoded) => {
            let rgba = decoded.to_rgba8();
            Some(CapturedImage {
                width: rgba.width(),
                height: rgba.height(),
                data: rgba.into_raw(),
            })
        }
        Err(e) => {
            tracing::warn!("Failed to decode capture payload: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    #[test]
    fn test_decode_png_to_rgba() {
        let img = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.data.len(), 3 * 2 * 4);
        assert_eq!(&decoded.data[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_garbage_is_not_an_image() {
        assert!(decode_image(b"definitely not a png").is_none());
        assert!(decode_image(&[]).is_none());
    }
}
