//! Error types for rendering and export.

use thiserror::Error;

/// Result type for rendering and export operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rendering or assembling an export.
///
/// Any of these is fatal for the export call that raised it; no partial
/// artifact is ever returned. Unreadable image assets are not errors — they
/// are skipped and reported alongside the rendered output.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The SVG intermediate could not be parsed.
    #[error("SVG parsing failed: {0}")]
    Svg(String),

    /// A render surface could not be allocated.
    #[error("Failed to create render surface: {0}")]
    Surface(String),

    /// Encoding a rendered surface to bytes failed.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// PDF assembly failed.
    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}
