//! Scene graph: the flat, insertion-ordered element collection.

use serde::{Deserialize, Serialize};

use crate::{CoreResult, EditorError, Element, ElementId};

/// A scene: all design elements plus the canvas dimensions.
///
/// Elements are stored in insertion order. Paint order is ascending
/// `z_index` with insertion order breaking ties; [`Scene::paint_order`] is
/// the single source of truth for it, so every export path renders
/// identically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// All elements, in insertion order.
    elements: Vec<Element>,
    /// Canvas width in design units.
    pub canvas_width: f32,
    /// Canvas height in design units.
    pub canvas_height: f32,
}

impl Scene {
    /// Create a new empty scene with the given canvas size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            elements: Vec::new(),
            canvas_width: width,
            canvas_height: height,
        }
    }

    /// Add an element to the scene.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Remove an element from the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn remove_element(&mut self, id: ElementId) -> CoreResult<Element> {
        let index = self
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        Ok(self.elements.remove(index))
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get_element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn get_element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// All elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Mutable references to all elements in insertion order.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.iter_mut()
    }

    /// Replace the full element collection (undo restore, template load).
    pub fn set_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
    }

    /// Clone the full element collection (history snapshots).
    #[must_use]
    pub fn elements_vec(&self) -> Vec<Element> {
        self.elements.clone()
    }

    /// Elements in paint order: ascending `z_index`, insertion order on ties.
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        // sort_by_key is stable, which is what guarantees the tie rule.
        ordered.sort_by_key(|e| e.transform.z_index);
        ordered
    }

    /// The highest `z_index` currently in use.
    #[must_use]
    pub fn max_z_index(&self) -> i32 {
        self.elements
            .iter()
            .map(|e| e.transform.z_index)
            .max()
            .unwrap_or(0)
    }

    /// The lowest `z_index` currently in use.
    #[must_use]
    pub fn min_z_index(&self) -> i32 {
        self.elements
            .iter()
            .map(|e| e.transform.z_index)
            .min()
            .unwrap_or(0)
    }

    /// Set the canvas dimensions.
    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Find the topmost visible element at the given canvas coordinates.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        self.paint_order()
            .into_iter()
            .rev()
            .find(|e| e.visible && e.contains_point(x, y))
            .map(|e| e.id)
    }

    /// Get the number of elements in the scene.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the scene is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialize the scene to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(EditorError::Serialization)
    }

    /// Deserialize a scene from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(EditorError::Serialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementKind, ShapeKind, StrokeStyle, Transform};

    fn shape(fill: &str, z_index: i32) -> Element {
        Element::new(ElementKind::Shape {
            shape: ShapeKind::Rectangle,
            fill: fill.to_string(),
            stroke: None,
            stroke_width: 0.0,
            stroke_style: StrokeStyle::Solid,
            border_radius: 0.0,
            shadow: None,
        })
        .with_transform(Transform {
            z_index,
            ..Transform::default()
        })
    }

    #[test]
    fn test_scene_add_remove() {
        let mut scene = Scene::new(800.0, 600.0);
        assert!(scene.is_empty());

        let id = scene.add_element(shape("#ff0000", 0));
        assert_eq!(scene.element_count(), 1);
        assert!(scene.get_element(id).is_some());

        scene.remove_element(id).expect("should remove");
        assert!(scene.is_empty());
    }

    #[test]
    fn test_remove_missing_element() {
        let mut scene = Scene::new(800.0, 600.0);
        let result = scene.remove_element(ElementId::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_paint_order_is_stable_on_ties() {
        let mut scene = Scene::new(800.0, 600.0);
        let first = scene.add_element(shape("#111111", 5));
        let second = scene.add_element(shape("#222222", 5));
        let bottom = scene.add_element(shape("#333333", 1));

        let order: Vec<ElementId> = scene.paint_order().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![bottom, first, second]);
    }

    #[test]
    fn test_element_at_prefers_topmost() {
        let mut scene = Scene::new(800.0, 600.0);
        let below = scene.add_element(shape("#111111", 1));
        let above = scene.add_element(shape("#222222", 2));

        assert_eq!(scene.element_at(50.0, 50.0), Some(above));

        scene
            .get_element_mut(above)
            .expect("element exists")
            .visible = false;
        assert_eq!(scene.element_at(50.0, 50.0), Some(below));
    }

    #[test]
    fn test_json_round_trip() {
        let mut scene = Scene::new(400.0, 300.0);
        scene.add_element(shape("#0066ff", 3));

        let json = scene.to_json().expect("serialize");
        let restored = Scene::from_json(&json).expect("deserialize");
        assert_eq!(restored.element_count(), 1);
        assert!((restored.canvas_width - 400.0).abs() < f32::EPSILON);
    }
}
