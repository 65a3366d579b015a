//! Artifact assembly: turn a scene into final bytes per export format.
//!
//! All paths are all-or-nothing; a failure returns an error and no bytes.
//! The press path composites the rasterized trim area onto a bleed-extended
//! white surface, draws crop marks, and wraps the result as a one-page PDF.

use editor_core::{ElementId, ElementKind, Scene};

use crate::color::{cmyk_to_hex, hex_to_cmyk, make_print_safe};
use crate::error::{RenderError, RenderResult};
use crate::options::{Background, CropMarkSettings, ExportFormat, ExportOptions, MM_TO_PX};
use crate::raster::rasterize;
use crate::svg::render_svg;

/// A finished export artifact ready for the upload collaborator.
#[derive(Debug)]
pub struct ExportArtifact {
    /// The complete artifact bytes.
    pub bytes: Vec<u8>,
    /// MIME type matching the requested format.
    pub mime_type: &'static str,
    /// Suggested file name, derived from the project name.
    pub suggested_file_name: String,
    /// Image elements skipped because their sources could not be loaded.
    pub skipped: Vec<ElementId>,
}

/// Export a scene to the format requested in `options`.
///
/// `base_name` becomes the artifact's suggested file name stem.
///
/// # Errors
///
/// Returns an error if rendering, encoding, or PDF assembly fails; no
/// partial artifact is ever returned.
pub fn export(
    scene: &Scene,
    options: &ExportOptions,
    base_name: &str,
) -> RenderResult<ExportArtifact> {
    let (bytes, skipped) = match options.format {
        ExportFormat::Png => {
            let out = rasterize(scene, options)?;
            let bytes = out
                .pixmap
                .encode_png()
                .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
            (bytes, out.skipped)
        }
        ExportFormat::Svg => (render_svg(scene, options).into_bytes(), Vec::new()),
        ExportFormat::Pdf => {
            let out = rasterize(scene, options)?;
            let png = out
                .pixmap
                .encode_png()
                .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
            let bytes = wrap_in_pdf(&png, options.dpi.dots_per_inch(), "Canvas Export")?;
            (bytes, out.skipped)
        }
        ExportFormat::PrintReady => {
            let (surface, skipped) = render_print_surface(scene, options)?;
            let png = surface
                .encode_png()
                .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
            let bytes = wrap_in_pdf(&png, options.dpi.dots_per_inch(), "Print Ready Export")?;
            (bytes, skipped)
        }
    };

    Ok(ExportArtifact {
        bytes,
        mime_type: options.format.mime_type(),
        suggested_file_name: format!("{base_name}.{}", options.format.extension()),
        skipped,
    })
}

/// Replace every element's fill/color/stroke with its CMYK-safe
/// approximation, returning a converted copy of the scene.
///
/// The live scene is never touched; export color conversion must not leak
/// back into the editor.
#[must_use]
pub fn cmyk_safe_scene(scene: &Scene) -> Scene {
    let mut converted = scene.clone();
    for element in converted.elements_mut() {
        match &mut element.kind {
            ElementKind::Shape { fill, stroke, .. } => {
                convert_hex_in_place(fill);
                if let Some(stroke) = stroke {
                    convert_hex_in_place(stroke);
                }
            }
            ElementKind::Text { color, .. } => {
                convert_hex_in_place(color);
            }
            ElementKind::Image { .. } => {}
        }
    }
    converted
}

/// Unparseable colors are left as-is; resvg will reject them the same way
/// in both the converted and unconverted renders.
fn convert_hex_in_place(hex: &mut String) {
    if let Some(cmyk) = hex_to_cmyk(hex) {
        *hex = cmyk_to_hex(make_print_safe(cmyk));
    }
}

/// Rasterize the (optionally color-converted) scene and composite it onto
/// a bleed-extended white surface with optional crop marks.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn render_print_surface(
    scene: &Scene,
    options: &ExportOptions,
) -> RenderResult<(tiny_skia::Pixmap, Vec<ElementId>)> {
    let source;
    let scene = if options.cmyk {
        source = cmyk_safe_scene(scene);
        &source
    } else {
        scene
    };

    // The trim area always renders on white; transparency makes no sense
    // on press stock.
    let inner = rasterize(
        scene,
        &ExportOptions {
            background: Background::White,
            ..options.clone()
        },
    )?;

    let bleed_px = options.bleed.px();
    let scale = options.dpi.scale_factor();
    let final_width = ((scene.canvas_width + 2.0 * bleed_px) * scale).round().max(1.0) as u32;
    let final_height = ((scene.canvas_height + 2.0 * bleed_px) * scale).round().max(1.0) as u32;

    let mut surface = tiny_skia::Pixmap::new(final_width, final_height)
        .ok_or_else(|| RenderError::Surface(format!("pixmap {final_width}x{final_height}")))?;
    surface.fill(tiny_skia::Color::WHITE);

    // Trim content sits at (bleed, bleed); the margin itself stays plain
    // white rather than extending edge content.
    let offset = (bleed_px * scale).round() as i32;
    surface.draw_pixmap(
        offset,
        offset,
        inner.pixmap.as_ref(),
        &tiny_skia::PixmapPaint::default(),
        tiny_skia::Transform::identity(),
        None,
    );

    if options.crop_marks {
        draw_crop_marks(
            &mut surface,
            scene.canvas_width + 2.0 * bleed_px,
            scene.canvas_height + 2.0 * bleed_px,
            bleed_px,
            scale,
            CropMarkSettings::default(),
        )?;
    }

    Ok((surface, inner.skipped))
}

/// Draw the 8 crop mark segments (2 per corner) around the trim box.
///
/// Geometry is in design units; `scale` maps it onto the surface.
fn draw_crop_marks(
    surface: &mut tiny_skia::Pixmap,
    width: f32,
    height: f32,
    bleed_px: f32,
    scale: f32,
    settings: CropMarkSettings,
) -> RenderResult<()> {
    let length = settings.length_mm * MM_TO_PX;
    let offset = settings.offset_mm * MM_TO_PX;

    let (left, top) = (bleed_px, bleed_px);
    let (right, bottom) = (width - bleed_px, height - bleed_px);

    let mut pb = tiny_skia::PathBuilder::new();
    let mut segment = |x1: f32, y1: f32, x2: f32, y2: f32| {
        pb.move_to(x1, y1);
        pb.line_to(x2, y2);
    };

    // Top-left
    segment(left - offset, top, left - offset - length, top);
    segment(left, top - offset, left, top - offset - length);
    // Top-right
    segment(right + offset, top, right + offset + length, top);
    segment(right, top - offset, right, top - offset - length);
    // Bottom-left
    segment(left - offset, bottom, left - offset - length, bottom);
    segment(left, bottom + offset, left, bottom + offset + length);
    // Bottom-right
    segment(right + offset, bottom, right + offset + length, bottom);
    segment(right, bottom + offset, right, bottom + offset + length);

    let path = pb
        .finish()
        .ok_or_else(|| RenderError::Surface("crop mark path".to_string()))?;

    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = true;

    let stroke = tiny_skia::Stroke {
        width: settings.stroke_width,
        ..tiny_skia::Stroke::default()
    };

    surface.stroke_path(
        &path,
        &paint,
        &stroke,
        tiny_skia::Transform::from_scale(scale, scale),
        None,
    );
    Ok(())
}

/// Wrap a PNG raster as a single-page PDF sized to the image at `dpi`.
///
/// Only the document title is attached; printpdf 0.7's `PdfDocument::new`
/// exposes no subject/creator/keyword metadata.
fn wrap_in_pdf(png_data: &[u8], dpi: f32, title: &str) -> RenderResult<Vec<u8>> {
    let dynamic_image = printpdf::image_crate::load_from_memory(png_data)
        .map_err(|e| RenderError::Pdf(format!("Failed to decode PNG for PDF: {e}")))?;

    #[allow(clippy::cast_precision_loss)]
    let (px_w, px_h) = (dynamic_image.width() as f32, dynamic_image.height() as f32);
    let page_width_mm = px_w / dpi * 25.4;
    let page_height_mm = px_h / dpi * 25.4;

    let (doc, page1, layer1) = printpdf::PdfDocument::new(
        title,
        printpdf::Mm(page_width_mm),
        printpdf::Mm(page_height_mm),
        "Layer 1",
    );

    let current_layer = doc.get_page(page1).get_layer(layer1);
    let pdf_image = printpdf::Image::from_dynamic_image(&dynamic_image);

    // Placing at the export DPI makes the image span the page exactly.
    let transform = printpdf::ImageTransform {
        translate_x: Some(printpdf::Mm(0.0)),
        translate_y: Some(printpdf::Mm(0.0)),
        dpi: Some(dpi),
        ..Default::default()
    };

    pdf_image.add_to_layer(current_layer, transform);

    doc.save_to_bytes()
        .map_err(|e| RenderError::Pdf(format!("PDF save failed: {e}")))
}
