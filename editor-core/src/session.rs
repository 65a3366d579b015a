//! Editor session: owned state for one editing surface.
//!
//! An [`EditorSession`] holds the scene, the current selection, and the
//! undo/redo history, and is the only write path into all three. Structural
//! mutations record a history snapshot; live-drag mutations (`move`,
//! `resize`, `rotate`) do not, and the caller commits the drag with
//! [`EditorSession::save_to_history`] when it ends.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::{History, Snapshot};
use crate::{CoreResult, EditorError, Element, ElementId, Scene, Template};

/// Viewport used to compute a fit-to-view zoom after a template load.
const FIT_VIEWPORT_WIDTH: f32 = 1000.0;
const FIT_VIEWPORT_HEIGHT: f32 = 700.0;

/// Opaque token identifying a pending destructive scene replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplaceToken(Uuid);

impl std::fmt::Display for ReplaceToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a template load request.
#[derive(Debug, Clone)]
pub enum TemplateLoad {
    /// The scene was empty; the template was applied immediately.
    Applied,
    /// The scene has content; the caller must confirm or cancel with the
    /// returned token before the replacement happens.
    Pending(ReplaceToken),
}

#[derive(Debug, Clone)]
struct PendingReplace {
    token: ReplaceToken,
    template: Template,
}

/// Owned editor state for a single design project.
#[derive(Debug, Clone)]
pub struct EditorSession {
    /// Project display name; also the suggested export file base name.
    pub project_name: Option<String>,
    /// Opaque project identifier owned by the host application.
    pub project_id: Option<String>,
    scene: Scene,
    selected: Option<ElementId>,
    history: History,
    zoom: f32,
    pending_replace: Option<PendingReplace>,
}

impl EditorSession {
    /// Create a new session with an empty scene of the given canvas size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            project_name: None,
            project_id: None,
            scene: Scene::new(width, height),
            selected: None,
            history: History::new(),
            zoom: 1.0,
            pending_replace: None,
        }
    }

    /// The current scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The currently selected element, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// The current zoom level (1.0 = 100%).
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom level, clamped to a sane range.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(0.05, 8.0);
    }

    /// Set the canvas dimensions. Does not record history.
    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.scene.set_canvas_size(width, height);
    }

    // ------------------------------------------------------------------
    // Element mutations
    // ------------------------------------------------------------------

    /// Add an element to the scene and record history.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = self.scene.add_element(element);
        tracing::debug!("Added element {id}");
        self.save_to_history();
        id
    }

    /// Apply an update to an element and record history.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn update_element(
        &mut self,
        id: ElementId,
        update: impl FnOnce(&mut Element),
    ) -> CoreResult<()> {
        let element = self
            .scene
            .get_element_mut(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        update(element);
        self.save_to_history();
        Ok(())
    }

    /// Delete an element, clearing the selection if it pointed at it.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn delete_element(&mut self, id: ElementId) -> CoreResult<Element> {
        let removed = self.scene.remove_element(id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.save_to_history();
        Ok(removed)
    }

    /// Set or clear the selection. Does not record history.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.selected = id;
    }

    /// Move an element during a drag. Does not record history; call
    /// [`EditorSession::save_to_history`] when the drag ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn move_element(&mut self, id: ElementId, x: f32, y: f32) -> CoreResult<()> {
        let element = self
            .scene
            .get_element_mut(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        element.transform.x = x;
        element.transform.y = y;
        Ok(())
    }

    /// Resize an element during a drag. Does not record history.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn resize_element(&mut self, id: ElementId, width: f32, height: f32) -> CoreResult<()> {
        let element = self
            .scene
            .get_element_mut(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        element.transform.width = width;
        element.transform.height = height;
        Ok(())
    }

    /// Rotate an element during a drag. Does not record history.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn rotate_element(&mut self, id: ElementId, rotation: f32) -> CoreResult<()> {
        let element = self
            .scene
            .get_element_mut(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        element.transform.rotation = rotation;
        Ok(())
    }

    /// Raise an element above everything else and record history.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn bring_to_front(&mut self, id: ElementId) -> CoreResult<()> {
        let top = self.scene.max_z_index() + 1;
        let element = self
            .scene
            .get_element_mut(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        element.transform.z_index = top;
        self.save_to_history();
        Ok(())
    }

    /// Lower an element below everything else and record history.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn send_to_back(&mut self, id: ElementId) -> CoreResult<()> {
        let bottom = self.scene.min_z_index() - 1;
        let element = self
            .scene
            .get_element_mut(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        element.transform.z_index = bottom;
        self.save_to_history();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Layer ordering
    // ------------------------------------------------------------------

    /// Reassign z-indices from a top-to-bottom visual order.
    ///
    /// The first ID in `order` ends up on top. Elements missing from
    /// `order` keep their relative order and are appended below the listed
    /// ones, so a racing drag-reorder can never drop an element. An empty
    /// `order` is a no-op (a degenerate drag event must not wipe layering).
    pub fn reorder_layers(&mut self, order: &[ElementId]) {
        if order.is_empty() {
            return;
        }

        let mut ranked: Vec<ElementId> = order
            .iter()
            .copied()
            .filter(|id| self.scene.get_element(*id).is_some())
            .collect();
        for element in self.scene.elements() {
            if !ranked.contains(&element.id) {
                ranked.push(element.id);
            }
        }

        let top = i32::try_from(ranked.len()).unwrap_or(i32::MAX);
        for (rank, id) in ranked.iter().enumerate() {
            let z = top - i32::try_from(rank).unwrap_or(0);
            if let Some(element) = self.scene.get_element_mut(*id) {
                element.transform.z_index = z;
            }
        }
        self.save_to_history();
    }

    /// Flip an element's visibility and record history.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn toggle_visibility(&mut self, id: ElementId) -> CoreResult<()> {
        let element = self
            .scene
            .get_element_mut(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        element.visible = !element.visible;
        self.save_to_history();
        Ok(())
    }

    /// Flip an element's lock flag and record history.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn toggle_lock(&mut self, id: ElementId) -> CoreResult<()> {
        let element = self
            .scene
            .get_element_mut(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        element.locked = !element.locked;
        self.save_to_history();
        Ok(())
    }

    /// Rename an element's layer label and record history.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn rename_layer(&mut self, id: ElementId, name: impl Into<String>) -> CoreResult<()> {
        let element = self
            .scene
            .get_element_mut(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        element.name = Some(name.into());
        self.save_to_history();
        Ok(())
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Record the current state as a history snapshot.
    ///
    /// Called automatically by structural mutations; call it directly to
    /// commit a finished drag.
    pub fn save_to_history(&mut self) {
        self.history.record(Snapshot {
            elements: self.scene.elements_vec(),
            selected: self.selected,
        });
    }

    /// Restore the previous snapshot, if any.
    pub fn undo(&mut self) {
        if let Some(snapshot) = self.history.undo() {
            let elements = snapshot.elements.clone();
            let selected = snapshot.selected;
            self.scene.set_elements(elements);
            self.selected = selected;
        }
    }

    /// Restore the next snapshot, if any.
    pub fn redo(&mut self) {
        if let Some(snapshot) = self.history.redo() {
            let elements = snapshot.elements.clone();
            let selected = snapshot.selected;
            self.scene.set_elements(elements);
            self.selected = selected;
        }
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Template replacement
    // ------------------------------------------------------------------

    /// Request loading a template into the session.
    ///
    /// On an empty scene the template is applied immediately. Otherwise the
    /// load is destructive, so a [`ReplaceToken`] is returned and the caller
    /// must confirm or cancel; the UX of asking the user lives entirely in
    /// the caller.
    pub fn request_replace(&mut self, template: Template) -> TemplateLoad {
        if self.scene.is_empty() {
            self.apply_template(template);
            return TemplateLoad::Applied;
        }

        let token = ReplaceToken(Uuid::new_v4());
        tracing::debug!("Template load pending confirmation: {token}");
        self.pending_replace = Some(PendingReplace { token, template });
        TemplateLoad::Pending(token)
    }

    /// Confirm a pending template replacement.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no pending replacement or the token
    /// does not match it.
    pub fn confirm_replace(&mut self, token: ReplaceToken) -> CoreResult<()> {
        match self.pending_replace.take() {
            Some(pending) if pending.token == token => {
                self.apply_template(pending.template);
                Ok(())
            }
            Some(pending) => {
                // Keep the still-valid pending replacement around.
                self.pending_replace = Some(pending);
                Err(EditorError::StaleToken(token.to_string()))
            }
            None => Err(EditorError::InvalidOperation(
                "no pending template replacement".to_string(),
            )),
        }
    }

    /// Cancel a pending template replacement.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no pending replacement or the token
    /// does not match it.
    pub fn cancel_replace(&mut self, token: ReplaceToken) -> CoreResult<()> {
        match self.pending_replace.take() {
            Some(pending) if pending.token == token => Ok(()),
            Some(pending) => {
                self.pending_replace = Some(pending);
                Err(EditorError::StaleToken(token.to_string()))
            }
            None => Err(EditorError::InvalidOperation(
                "no pending template replacement".to_string(),
            )),
        }
    }

    fn apply_template(&mut self, template: Template) {
        self.scene
            .set_canvas_size(template.canvas_width, template.canvas_height);
        self.scene.set_elements(template.elements);
        self.selected = None;

        // Fit the new canvas into the reference viewport, never above 100%.
        let zoom_w = FIT_VIEWPORT_WIDTH / template.canvas_width.max(1.0);
        let zoom_h = FIT_VIEWPORT_HEIGHT / template.canvas_height.max(1.0);
        self.zoom = zoom_w.min(zoom_h).min(1.0);

        tracing::debug!("Loaded template '{}'", template.name);
        self.save_to_history();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementKind, ShapeKind, StrokeStyle, Transform};

    fn shape(fill: &str) -> Element {
        Element::new(ElementKind::Shape {
            shape: ShapeKind::Rectangle,
            fill: fill.to_string(),
            stroke: None,
            stroke_width: 0.0,
            stroke_style: StrokeStyle::Solid,
            border_radius: 0.0,
            shadow: None,
        })
    }

    fn template(elements: Vec<Element>) -> Template {
        Template::new("flyer", 400.0, 300.0, elements)
    }

    #[test]
    fn test_add_update_delete_with_history() {
        let mut session = EditorSession::new(800.0, 600.0);
        let id = session.add_element(shape("#ff0000"));

        session
            .update_element(id, |el| el.transform.x = 40.0)
            .expect("update");
        assert!(session.can_undo());

        session.undo();
        let element = session.scene().get_element(id).expect("element");
        assert!((element.transform.x - 0.0).abs() < f32::EPSILON);

        session.redo();
        let element = session.scene().get_element(id).expect("element");
        assert!((element.transform.x - 40.0).abs() < f32::EPSILON);

        session.delete_element(id).expect("delete");
        assert!(session.scene().is_empty());
    }

    #[test]
    fn test_drag_mutations_skip_history() {
        let mut session = EditorSession::new(800.0, 600.0);
        let id = session.add_element(shape("#ff0000"));

        session.move_element(id, 10.0, 10.0).expect("move");
        session.move_element(id, 20.0, 20.0).expect("move");
        session.save_to_history();

        session.undo();
        // The drag collapses into a single history step.
        let element = session.scene().get_element(id).expect("element");
        assert!((element.transform.x - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_reorder_layers_assigns_descending_z() {
        let mut session = EditorSession::new(800.0, 600.0);
        let a = session.add_element(shape("#a00000"));
        let b = session.add_element(shape("#0b0000"));
        let c = session.add_element(shape("#00c000"));

        session.reorder_layers(&[c, a, b]);

        let z = |id| {
            session
                .scene()
                .get_element(id)
                .expect("element")
                .transform
                .z_index
        };
        assert_eq!(z(c), 3);
        assert_eq!(z(a), 2);
        assert_eq!(z(b), 1);
    }

    #[test]
    fn test_reorder_layers_keeps_omitted_elements() {
        let mut session = EditorSession::new(800.0, 600.0);
        let a = session.add_element(shape("#a00000"));
        let b = session.add_element(shape("#0b0000"));
        let c = session.add_element(shape("#00c000"));

        // b is omitted from the drag order; it must survive, below the rest.
        session.reorder_layers(&[c, a]);

        assert_eq!(session.scene().element_count(), 3);
        let z = |id| {
            session
                .scene()
                .get_element(id)
                .expect("element")
                .transform
                .z_index
        };
        assert!(z(c) > z(a));
        assert!(z(a) > z(b));
    }

    #[test]
    fn test_reorder_layers_empty_is_noop() {
        let mut session = EditorSession::new(800.0, 600.0);
        let a = session.add_element(shape("#a00000"));
        session
            .update_element(a, |el| el.transform.z_index = 7)
            .expect("update");

        session.reorder_layers(&[]);
        assert_eq!(
            session
                .scene()
                .get_element(a)
                .expect("element")
                .transform
                .z_index,
            7
        );
    }

    #[test]
    fn test_toggles_and_rename() {
        let mut session = EditorSession::new(800.0, 600.0);
        let id = session.add_element(shape("#ff0000"));

        session.toggle_visibility(id).expect("toggle");
        assert!(!session.scene().get_element(id).expect("element").visible);

        session.toggle_lock(id).expect("toggle");
        assert!(session.scene().get_element(id).expect("element").locked);

        session.rename_layer(id, "Background").expect("rename");
        assert_eq!(
            session
                .scene()
                .get_element(id)
                .expect("element")
                .name
                .as_deref(),
            Some("Background")
        );
    }

    #[test]
    fn test_template_applies_directly_on_empty_scene() {
        let mut session = EditorSession::new(800.0, 600.0);
        let outcome = session.request_replace(template(vec![shape("#123456")]));
        assert!(matches!(outcome, TemplateLoad::Applied));
        assert_eq!(session.scene().element_count(), 1);
        assert!((session.scene().canvas_width - 400.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_template_replace_requires_confirmation() {
        let mut session = EditorSession::new(800.0, 600.0);
        session.add_element(shape("#ff0000"));

        let outcome = session.request_replace(template(vec![shape("#123456"), shape("#654321")]));
        let token = match outcome {
            TemplateLoad::Pending(token) => token,
            TemplateLoad::Applied => panic!("expected pending confirmation"),
        };

        // Existing content untouched until confirmation.
        assert_eq!(session.scene().element_count(), 1);

        session.confirm_replace(token).expect("confirm");
        assert_eq!(session.scene().element_count(), 2);
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_template_replace_cancel_and_stale_token() {
        let mut session = EditorSession::new(800.0, 600.0);
        session.add_element(shape("#ff0000"));

        let TemplateLoad::Pending(token) = session.request_replace(template(vec![])) else {
            panic!("expected pending confirmation");
        };

        let stale = ReplaceToken(Uuid::new_v4());
        assert!(session.confirm_replace(stale).is_err());
        // The real token still works after a stale attempt.
        session.cancel_replace(token).expect("cancel");
        assert_eq!(session.scene().element_count(), 1);

        // Nothing pending anymore.
        assert!(session.confirm_replace(token).is_err());
    }

    #[test]
    fn test_template_fit_zoom() {
        let mut session = EditorSession::new(800.0, 600.0);
        let wide = Template::new("banner", 2000.0, 500.0, vec![]);
        session.request_replace(wide);
        assert!((session.zoom() - 0.5).abs() < f32::EPSILON);
    }
}
