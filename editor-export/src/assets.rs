//! Image asset loading for export.
//!
//! Supports base64 data URIs and local file paths. Loading is best-effort:
//! callers treat a failure as "skip this element", never as a fatal export
//! error.

use base64::Engine;
use image::{DynamicImage, RgbaImage};

use editor_core::ObjectFit;

/// Load an image element's bitmap from its `src`.
///
/// # Errors
///
/// Returns a description of the failure; callers skip the element.
pub fn load_image_source(src: &str) -> Result<DynamicImage, String> {
    if src.starts_with("data:") {
        load_from_data_uri(src)
    } else {
        let bytes = std::fs::read(src).map_err(|e| format!("Failed to read {src}: {e}"))?;
        image::load_from_memory(&bytes).map_err(|e| format!("Failed to decode image: {e}"))
    }
}

/// Measure an image source's pixel dimensions.
///
/// Reads only the image header, so validation does not pay a full decode
/// per image element.
///
/// # Errors
///
/// Returns a description of the failure.
pub fn measure_image_source(src: &str) -> Result<(u32, u32), String> {
    let dimensions = if src.starts_with("data:") {
        let bytes = data_uri_bytes(src)?;
        image::ImageReader::new(std::io::Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| format!("Failed to probe image: {e}"))?
            .into_dimensions()
    } else {
        image::ImageReader::open(src)
            .map_err(|e| format!("Failed to read {src}: {e}"))?
            .into_dimensions()
    };
    dimensions.map_err(|e| format!("Failed to read image dimensions: {e}"))
}

fn load_from_data_uri(uri: &str) -> Result<DynamicImage, String> {
    let bytes = data_uri_bytes(uri)?;
    image::load_from_memory(&bytes).map_err(|e| format!("Failed to decode image: {e}"))
}

fn data_uri_bytes(uri: &str) -> Result<Vec<u8>, String> {
    let uri_data = uri.strip_prefix("data:").ok_or("Not a data URI")?;
    let comma = uri_data
        .find(',')
        .ok_or("Invalid data URI: missing comma")?;
    let (metadata, encoded) = (&uri_data[..comma], &uri_data[comma + 1..]);

    if !metadata.contains(";base64") {
        return Err("Only base64 data URIs are supported".to_string());
    }

    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| format!("Failed to decode base64: {e}"))
}

/// Encode a bitmap as a PNG data URI for embedding in the SVG intermediate.
///
/// # Errors
///
/// Returns a description of the failure.
pub fn to_png_data_uri(img: &RgbaImage) -> Result<String, String> {
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| format!("PNG encoding failed: {e}"))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(buf.into_inner());
    Ok(format!("data:image/png;base64,{encoded}"))
}

/// Apply the element's CSS-like filters to a bitmap.
///
/// Brightness, contrast, and saturation are percentages where 100 means
/// unchanged; blur is a Gaussian radius in design units.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn apply_filters(
    img: DynamicImage,
    brightness: f32,
    contrast: f32,
    saturation: f32,
    blur: f32,
) -> RgbaImage {
    let mut rgba = img.into_rgba8();

    let brightness = brightness / 100.0;
    let contrast = contrast / 100.0;
    let saturation = saturation / 100.0;

    let needs_adjust = (brightness - 1.0).abs() > f32::EPSILON
        || (contrast - 1.0).abs() > f32::EPSILON
        || (saturation - 1.0).abs() > f32::EPSILON;

    if needs_adjust {
        for pixel in rgba.pixels_mut() {
            let [r, g, b, a] = pixel.0;
            let mut rf = f32::from(r);
            let mut gf = f32::from(g);
            let mut bf = f32::from(b);

            // Brightness: plain multiplication.
            rf *= brightness;
            gf *= brightness;
            bf *= brightness;

            // Contrast: expand/compress around mid gray.
            rf = (rf - 128.0) * contrast + 128.0;
            gf = (gf - 128.0) * contrast + 128.0;
            bf = (bf - 128.0) * contrast + 128.0;

            // Saturation: lerp between the luma and the color.
            let luma = 0.2126 * rf + 0.7152 * gf + 0.0722 * bf;
            rf = luma + (rf - luma) * saturation;
            gf = luma + (gf - luma) * saturation;
            bf = luma + (bf - luma) * saturation;

            pixel.0 = [
                rf.round().clamp(0.0, 255.0) as u8,
                gf.round().clamp(0.0, 255.0) as u8,
                bf.round().clamp(0.0, 255.0) as u8,
                a,
            ];
        }
    }

    if blur > 0.0 {
        rgba = image::imageops::blur(&rgba, blur);
    }

    rgba
}

/// SVG `preserveAspectRatio` value for an object-fit mode.
#[must_use]
pub fn preserve_aspect_ratio(fit: ObjectFit) -> &'static str {
    match fit {
        ObjectFit::Contain => "xMidYMid meet",
        ObjectFit::Cover | ObjectFit::None => "xMidYMid slice",
        ObjectFit::Fill => "none",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1x1 red pixel PNG.
    const RED_PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_load_data_uri() {
        let img = load_image_source(RED_PIXEL).expect("load");
        assert_eq!(img.width(), 1);
        assert_eq!(img.height(), 1);
    }

    #[test]
    fn test_measure_data_uri() {
        assert_eq!(measure_image_source(RED_PIXEL).expect("measure"), (1, 1));
    }

    #[test]
    fn test_measure_file_path() {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([0, 102, 255, 255]));
        let path = std::env::temp_dir().join("editor-export-measure-probe.png");
        img.save(&path).expect("save");

        let path_str = path.to_str().expect("utf-8 path");
        assert_eq!(measure_image_source(path_str).expect("measure"), (3, 2));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_measure_invalid_sources() {
        assert!(measure_image_source("data:image/png;base64,!!!").is_err());
        assert!(measure_image_source("/nonexistent/path.png").is_err());
    }

    #[test]
    fn test_load_invalid_sources() {
        assert!(load_image_source("data:image/png").is_err());
        assert!(load_image_source("/nonexistent/path.png").is_err());
    }

    #[test]
    fn test_png_data_uri_round_trip() {
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([0, 102, 255, 255]));
        let uri = to_png_data_uri(&img).expect("encode");
        assert!(uri.starts_with("data:image/png;base64,"));

        let back = load_image_source(&uri).expect("reload");
        assert_eq!(back.width(), 2);
    }

    #[test]
    fn test_filters_identity() {
        let img = RgbaImage::from_pixel(1, 1, image::Rgba([10, 20, 30, 255]));
        let out = apply_filters(DynamicImage::ImageRgba8(img), 100.0, 100.0, 100.0, 0.0);
        assert_eq!(out.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_brightness_doubles_values() {
        let img = RgbaImage::from_pixel(1, 1, image::Rgba([50, 50, 50, 255]));
        let out = apply_filters(DynamicImage::ImageRgba8(img), 200.0, 100.0, 100.0, 0.0);
        assert_eq!(out.get_pixel(0, 0).0, [100, 100, 100, 255]);
    }

    #[test]
    fn test_saturation_zero_is_grayscale() {
        let img = RgbaImage::from_pixel(1, 1, image::Rgba([200, 50, 50, 255]));
        let out = apply_filters(DynamicImage::ImageRgba8(img), 100.0, 100.0, 0.0, 0.0);
        let [r, g, b, _] = out.get_pixel(0, 0).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
    }
}
