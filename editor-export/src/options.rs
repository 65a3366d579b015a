//! Export configuration types.

use serde::{Deserialize, Serialize};

/// Millimeters to design-unit pixels at the CSS reference of 96 px/inch.
pub const MM_TO_PX: f32 = 96.0 / 25.4;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Raster PNG image.
    Png,
    /// SVG vector document.
    Svg,
    /// Single-page PDF with an embedded raster image.
    Pdf,
    /// Press-ready PDF with bleed, crop marks, and CMYK-safe color.
    PrintReady,
}

impl ExportFormat {
    /// MIME type of the produced artifact.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
            Self::Pdf | Self::PrintReady => "application/pdf",
        }
    }

    /// File extension (without dot) of the produced artifact.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Pdf | Self::PrintReady => "pdf",
        }
    }
}

/// Output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dpi {
    /// Screen resolution (1:1 with design units).
    #[serde(rename = "72")]
    Dpi72,
    /// Mid-quality print.
    #[serde(rename = "150")]
    Dpi150,
    /// Professional print.
    #[serde(rename = "300")]
    Dpi300,
}

impl Dpi {
    /// Dots per inch as a float.
    #[must_use]
    pub fn dots_per_inch(self) -> f32 {
        match self {
            Self::Dpi72 => 72.0,
            Self::Dpi150 => 150.0,
            Self::Dpi300 => 300.0,
        }
    }

    /// Raster scale factor relative to design units (72 dpi reference).
    #[must_use]
    pub fn scale_factor(self) -> f32 {
        self.dots_per_inch() / 72.0
    }
}

/// Canvas background for raster output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    /// Fully transparent (PNG only in practice).
    Transparent,
    /// Opaque white.
    White,
}

/// Bleed margin for press output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bleed {
    /// No bleed.
    #[serde(rename = "0")]
    None,
    /// 3 mm on each edge (the common press default).
    #[serde(rename = "3")]
    Mm3,
    /// 5 mm on each edge.
    #[serde(rename = "5")]
    Mm5,
}

impl Bleed {
    /// Bleed width in millimeters.
    #[must_use]
    pub fn mm(self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Mm3 => 3.0,
            Self::Mm5 => 5.0,
        }
    }

    /// Bleed width in design-unit pixels, rounded to a whole pixel.
    #[must_use]
    pub fn px(self) -> f32 {
        (self.mm() * MM_TO_PX).round()
    }

    /// Whether a bleed margin is present.
    #[must_use]
    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

/// Options for a single export call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Output format.
    pub format: ExportFormat,
    /// Output resolution.
    pub dpi: Dpi,
    /// Raster background.
    pub background: Background,
    /// Bleed margin (print-ready only).
    pub bleed: Bleed,
    /// Draw crop marks at the trim corners (print-ready only).
    pub crop_marks: bool,
    /// Convert element colors to a CMYK-safe approximation.
    pub cmyk: bool,
    /// Flatten text to vector paths. Not implemented; the serializer emits
    /// a placeholder comment instead of the text node.
    pub flatten_text: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            dpi: Dpi::Dpi150,
            background: Background::White,
            bleed: Bleed::None,
            crop_marks: false,
            cmyk: false,
            flatten_text: false,
        }
    }
}

impl ExportOptions {
    /// Conventional press defaults for the print-ready path.
    #[must_use]
    pub fn print_ready() -> Self {
        Self {
            format: ExportFormat::PrintReady,
            dpi: Dpi::Dpi300,
            background: Background::White,
            bleed: Bleed::Mm3,
            crop_marks: true,
            cmyk: true,
            flatten_text: false,
        }
    }
}

/// Crop mark geometry, all lengths in millimeters except the stroke.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CropMarkSettings {
    /// Length of each mark segment.
    pub length_mm: f32,
    /// Gap between the trim corner and the start of the mark.
    pub offset_mm: f32,
    /// Stroke width in design-unit pixels.
    pub stroke_width: f32,
}

impl Default for CropMarkSettings {
    fn default() -> Self {
        // offset + length must stay inside the smallest bleed margin (3 mm)
        // or the marks get clipped by the trim + 2x bleed page.
        Self {
            length_mm: 2.0,
            offset_mm: 0.5,
            stroke_width: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_types() {
        assert_eq!(ExportFormat::Png.mime_type(), "image/png");
        assert_eq!(ExportFormat::Svg.mime_type(), "image/svg+xml");
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
        assert_eq!(ExportFormat::PrintReady.mime_type(), "application/pdf");
    }

    #[test]
    fn test_bleed_px_conversion() {
        // 3 mm at 96 px/inch is 11.34 px, rounded to 11.
        assert!((Bleed::Mm3.px() - 11.0).abs() < f32::EPSILON);
        assert!((Bleed::None.px() - 0.0).abs() < f32::EPSILON);
        assert!((Bleed::Mm5.px() - 19.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_options_serde_round_trip() {
        let options = ExportOptions::print_ready();
        let json = serde_json::to_string(&options).expect("serialize");
        assert!(json.contains("print-ready"));
        assert!(json.contains("\"300\""));
        let back: ExportOptions = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.format, ExportFormat::PrintReady);
        assert_eq!(back.dpi, Dpi::Dpi300);
        assert_eq!(back.bleed, Bleed::Mm3);
    }
}
