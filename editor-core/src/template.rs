//! Predefined design templates.

use serde::{Deserialize, Serialize};

use crate::Element;

/// A predefined layout that can replace the current scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Display name.
    pub name: String,
    /// Canvas width in design units.
    pub canvas_width: f32,
    /// Canvas height in design units.
    pub canvas_height: f32,
    /// The elements the template places on the canvas.
    pub elements: Vec<Element>,
}

impl Template {
    /// Create a new template.
    #[must_use]
    pub fn new(name: impl Into<String>, width: f32, height: f32, elements: Vec<Element>) -> Self {
        Self {
            name: name.into(),
            canvas_width: width,
            canvas_height: height,
            elements,
        }
    }
}
