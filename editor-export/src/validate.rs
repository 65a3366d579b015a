//! Pre-flight export validation.
//!
//! Produces advisory warnings and (reserved, currently never populated)
//! blocking errors. Every rule is evaluated; nothing short-circuits.

use serde::{Deserialize, Serialize};

use editor_core::{ElementId, ElementKind, Scene};

use crate::options::{ExportFormat, ExportOptions};

/// Effective DPI assumed for an image whose source cannot be read.
const FALLBACK_IMAGE_DPI: f32 = 150.0;

/// Design units per inch (CSS reference).
const UNITS_PER_INCH: f32 = 96.0;

/// Category of an advisory warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// The scene has no elements; the export will be blank.
    MissingElements,
    /// An image's effective resolution is below the requested export DPI.
    LowResolution,
    /// Print-ready export requested without a bleed margin.
    NoBleed,
    /// RGB colors present while CMYK conversion is enabled; they will be
    /// converted automatically.
    RgbColors,
}

/// An advisory warning. Never blocks export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportWarning {
    /// Warning category.
    pub kind: WarningKind,
    /// Human-readable description.
    pub message: String,
    /// The element the warning refers to, when element-specific.
    pub element_id: Option<ElementId>,
}

/// A blocking validation error.
///
/// No current rule produces one; the channel exists for future blocking
/// conditions (e.g. an unreadable mandatory asset).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Human-readable description.
    pub message: String,
    /// The element the error refers to, when element-specific.
    pub element_id: Option<ElementId>,
}

/// Result of a pre-flight validation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportValidation {
    /// False iff `errors` is non-empty.
    pub valid: bool,
    /// Advisory warnings; never block export.
    pub warnings: Vec<ExportWarning>,
    /// Blocking errors.
    pub errors: Vec<ValidationError>,
}

/// Validate a scene against the requested export options.
#[must_use]
pub fn validate(scene: &Scene, options: &ExportOptions) -> ExportValidation {
    let mut warnings = Vec::new();
    let errors: Vec<ValidationError> = Vec::new();

    if scene.is_empty() {
        warnings.push(ExportWarning {
            kind: WarningKind::MissingElements,
            message: "No elements on the canvas; the export will be empty".to_string(),
            element_id: None,
        });
    }

    for element in scene.elements() {
        if let ElementKind::Image { src, .. } = &element.kind {
            let effective = effective_dpi(src, element.transform.width);
            if effective < options.dpi.dots_per_inch() {
                let label = element
                    .name
                    .clone()
                    .unwrap_or_else(|| element.id.to_string());
                warnings.push(ExportWarning {
                    kind: WarningKind::LowResolution,
                    message: format!(
                        "Image \"{label}\" has low resolution ({effective:.0} DPI < {:.0} DPI)",
                        options.dpi.dots_per_inch()
                    ),
                    element_id: Some(element.id),
                });
            }
        }
    }

    if options.format == ExportFormat::PrintReady && options.bleed.is_none() {
        warnings.push(ExportWarning {
            kind: WarningKind::NoBleed,
            message: "Professional printing needs a bleed margin of at least 3mm".to_string(),
            element_id: None,
        });
    }

    if options.cmyk {
        let has_rgb_colors = scene.elements().any(|el| match &el.kind {
            ElementKind::Shape { .. } | ElementKind::Text { .. } => true,
            ElementKind::Image { .. } => false,
        });
        if has_rgb_colors {
            warnings.push(ExportWarning {
                kind: WarningKind::RgbColors,
                message: "Colors will be converted automatically from RGB to CMYK for print"
                    .to_string(),
                element_id: None,
            });
        }
    }

    ExportValidation {
        valid: errors.is_empty(),
        warnings,
        errors,
    }
}

/// Estimate the effective print resolution of an image element.
///
/// Measures the source bitmap and divides its pixel width by the displayed
/// width in inches. Unreadable sources fall back to a fixed estimate so
/// validation itself never fails.
fn effective_dpi(src: &str, display_width: f32) -> f32 {
    let display_inches = (display_width / UNITS_PER_INCH).max(f32::MIN_POSITIVE);
    match crate::assets::measure_image_source(src) {
        #[allow(clippy::cast_precision_loss)]
        Ok((width, _)) => width as f32 / display_inches,
        Err(reason) => {
            tracing::debug!("Could not measure image source: {reason}");
            FALLBACK_IMAGE_DPI
        }
    }
}
