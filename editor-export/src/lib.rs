//! # Editor Export
//!
//! Export pipeline for the design editor: pre-flight validation, scene
//! rasterization, SVG serialization, CMYK-safe color conversion, and
//! final artifact assembly (PNG, SVG, PDF, press-ready PDF).
//!
//! ## Pipeline
//!
//! ```text
//! Scene ──► validate ──► advisory warnings
//!   │
//!   ├──► render_svg ─────────────────────────► SVG bytes
//!   │
//!   └──► rasterize (SVG ► usvg ► tiny-skia)
//!            │
//!            ├──► PNG bytes
//!            ├──► single-page PDF
//!            └──► bleed + crop marks + CMYK ──► press-ready PDF
//! ```
//!
//! Every raster path goes through the same SVG emission, so paint order
//! and geometry are identical across formats.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assemble;
pub mod assets;
pub mod color;
pub mod error;
pub mod options;
pub mod raster;
pub mod svg;
pub mod validate;

pub use assemble::{cmyk_safe_scene, export, ExportArtifact};
pub use color::{
    cmyk_to_hex, cmyk_to_rgb, hex_to_cmyk, is_print_safe, make_print_safe, parse_hex,
    rgb_to_cmyk, Cmyk, MAX_INK_TOTAL,
};
pub use error::{RenderError, RenderResult};
pub use options::{
    Background, Bleed, CropMarkSettings, Dpi, ExportFormat, ExportOptions, MM_TO_PX,
};
pub use raster::{rasterize, RasterOutput};
pub use svg::render_svg;
pub use validate::{validate, ExportValidation, ExportWarning, ValidationError, WarningKind};

/// Export crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
