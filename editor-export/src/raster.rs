//! Scene rasterization via the SVG intermediate and resvg.

use editor_core::{ElementId, ElementKind, Scene};

use crate::assets;
use crate::error::{RenderError, RenderResult};
use crate::options::ExportOptions;
use crate::svg::{render_svg_resolved, ResolvedImages};

/// A rasterized scene plus the elements that could not be rendered.
#[derive(Debug)]
pub struct RasterOutput {
    /// The rendered pixel buffer (RGBA, premultiplied).
    pub pixmap: tiny_skia::Pixmap,
    /// Image elements whose sources could not be loaded. Rendering is
    /// best-effort: these were left out rather than failing the export.
    pub skipped: Vec<ElementId>,
}

/// Rasterize a scene at the requested DPI and background.
///
/// The pixel buffer is sized `canvas * dpi/72`. Unreadable image sources
/// are skipped and reported in [`RasterOutput::skipped`].
///
/// # Errors
///
/// Returns an error if the SVG intermediate cannot be parsed or the
/// surface cannot be allocated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rasterize(scene: &Scene, options: &ExportOptions) -> RenderResult<RasterOutput> {
    let (resolved, skipped) = resolve_images(scene);
    let svg = render_svg_resolved(scene, options, Some(&resolved));

    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree =
        usvg::Tree::from_str(&svg, &opt).map_err(|e| RenderError::Svg(e.to_string()))?;

    let scale = options.dpi.scale_factor();
    let width = (scene.canvas_width * scale).round().max(1.0) as u32;
    let height = (scene.canvas_height * scale).round().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| RenderError::Surface(format!("pixmap {width}x{height}")))?;

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    Ok(RasterOutput { pixmap, skipped })
}

/// Load every image element's bitmap, apply its filters, and re-embed it
/// as a PNG data URI. Failures mark the element as skipped.
fn resolve_images(scene: &Scene) -> (ResolvedImages, Vec<ElementId>) {
    let mut resolved = ResolvedImages::new();
    let mut skipped = Vec::new();

    for element in scene.elements() {
        let ElementKind::Image {
            src,
            brightness,
            contrast,
            saturation,
            blur,
            ..
        } = &element.kind
        else {
            continue;
        };
        if !element.visible {
            continue;
        }

        let entry = assets::load_image_source(src)
            .map(|img| assets::apply_filters(img, *brightness, *contrast, *saturation, *blur))
            .and_then(|img| assets::to_png_data_uri(&img));

        match entry {
            Ok(href) => {
                resolved.insert(element.id, Some(href));
            }
            Err(reason) => {
                tracing::warn!("Skipping image element {}: {reason}", element.id);
                skipped.push(element.id);
                resolved.insert(element.id, None);
            }
        }
    }

    (resolved, skipped)
}
