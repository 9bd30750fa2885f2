//! The scene: every element on the canvas plus the links between them.
//!
//! Elements are kept in insertion order. Paint order is derived from depth
//! on demand, ties falling back to insertion order, so two elements may
//! share a depth indefinitely. The scene never persists anything itself;
//! callers mutate, then persist.

use crate::error::{InvalidReference, SceneError};
use crate::id::ElementId;
use crate::links::{Link, LinkSet};
use crate::model::{BoxMetrics, Element, ElementKind};
use kurbo::{Line, Point};

/// Owns the canvas elements and the link set.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    elements: Vec<Element>,
    links: LinkSet,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Lookup ──────────────────────────────────────────────────────────

    /// Elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn links(&self) -> &LinkSet {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Position of `id` in the insertion sequence.
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// The element at sequence position `index`.
    pub fn id_at(&self, index: usize) -> Result<ElementId, SceneError> {
        self.elements.get(index).map(|e| e.id).ok_or_else(|| {
            InvalidReference::IndexOutOfRange {
                index,
                len: self.elements.len(),
            }
            .into()
        })
    }

    fn resolve_mut(&mut self, id: ElementId) -> Result<&mut Element, SceneError> {
        self.get_mut(id)
            .ok_or_else(|| InvalidReference::UnknownElement(id).into())
    }

    // ─── Structure ───────────────────────────────────────────────────────

    /// Append an element. Its depth is whatever the caller set (0 unless
    /// overridden).
    ///
    /// Rejects an ID already in the scene, blank content, and a placement
    /// or size that is not finite.
    pub fn add_element(&mut self, element: Element) -> Result<ElementId, SceneError> {
        let id = element.id;
        if self.index_of(id).is_some() {
            return Err(InvalidReference::DuplicateElement(id).into());
        }
        if element.content.trim().is_empty() {
            return Err(SceneError::BlankContent(id));
        }
        ensure_finite(id, &[("x", element.x), ("y", element.y), ("rotation", element.rotation)])?;
        if let Some(size) = element.size {
            ensure_finite(id, &[("width", size.width), ("height", size.height)])?;
        }
        log::debug!("scene: add {} {id} at ({}, {})", element.kind.as_str(), element.x, element.y);
        self.elements.push(element);
        Ok(id)
    }

    /// Remove an element and every link that references it.
    pub fn remove_element(&mut self, id: ElementId) -> Result<Element, SceneError> {
        let index = self
            .index_of(id)
            .ok_or(InvalidReference::UnknownElement(id))?;
        let removed = self.elements.remove(index);
        let dropped = self.links.remove_all_referencing(id);
        log::debug!("scene: remove {id} (dropped {dropped} link(s))");
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.links.clear();
    }

    /// Link two owned, distinct elements.
    pub fn link_elements(&mut self, a: ElementId, b: ElementId) -> Result<(), SceneError> {
        for id in [a, b] {
            if self.index_of(id).is_none() {
                return Err(InvalidReference::UnknownElement(id).into());
            }
        }
        self.links.add(a, b)?;
        log::debug!("scene: link {a} <-> {b}");
        Ok(())
    }

    /// Link two elements addressed by sequence position.
    pub fn link_indices(&mut self, a: usize, b: usize) -> Result<(), SceneError> {
        let a = self.id_at(a)?;
        let b = self.id_at(b)?;
        self.link_elements(a, b)
    }

    // ─── Per-element mutations ───────────────────────────────────────────

    pub fn move_element(&mut self, id: ElementId, x: f64, y: f64) -> Result<(), SceneError> {
        let element = self.resolve_mut(id)?;
        ensure_finite(id, &[("x", x), ("y", y)])?;
        element.move_to(x, y);
        Ok(())
    }

    pub fn rotate_element(&mut self, id: ElementId, delta_degrees: f64) -> Result<(), SceneError> {
        let element = self.resolve_mut(id)?;
        ensure_finite(id, &[("rotation", element.rotation + delta_degrees)])?;
        element.rotate_by(delta_degrees);
        Ok(())
    }

    pub fn set_depth(&mut self, id: ElementId, depth: i64) -> Result<(), SceneError> {
        self.resolve_mut(id)?.set_depth(depth);
        Ok(())
    }

    pub fn raise(&mut self, id: ElementId) -> Result<i64, SceneError> {
        let element = self.resolve_mut(id)?;
        element.raise();
        Ok(element.depth)
    }

    pub fn lower(&mut self, id: ElementId) -> Result<i64, SceneError> {
        let element = self.resolve_mut(id)?;
        element.lower();
        Ok(element.depth)
    }

    /// Replace text content. `Ok(false)` means the element is an image and
    /// nothing changed. Blank text is rejected; delete the element instead.
    pub fn set_content(&mut self, id: ElementId, text: impl Into<String>) -> Result<bool, SceneError> {
        let text = text.into();
        let element = self.resolve_mut(id)?;
        if element.kind == ElementKind::Text && text.trim().is_empty() {
            return Err(SceneError::BlankContent(id));
        }
        Ok(element.set_content(text))
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Elements back to front: ascending depth, insertion order on ties.
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut order: Vec<&Element> = self.elements.iter().collect();
        order.sort_by_key(|e| e.depth);
        order
    }

    /// Topmost element whose box contains `(x, y)`, using default metrics.
    pub fn element_at(&self, x: f64, y: f64) -> Option<&Element> {
        self.element_at_with(x, y, &BoxMetrics::default())
    }

    /// Topmost element whose zero-rotation box contains `(x, y)`.
    pub fn element_at_with(&self, x: f64, y: f64, metrics: &BoxMetrics) -> Option<&Element> {
        let point = Point::new(x, y);
        self.paint_order()
            .into_iter()
            .rev()
            .find(|e| e.bounds(metrics).contains(point))
    }

    /// Centre-to-centre segment for each link, in link order.
    pub fn link_segments(&self, metrics: &BoxMetrics) -> Vec<(Link, Line)> {
        self.links
            .iter()
            .filter_map(|link| {
                let a = self.get(link.a)?;
                let b = self.get(link.b)?;
                Some((*link, Line::new(a.center(metrics), b.center(metrics))))
            })
            .collect()
    }
}

/// NaN or infinity would be written as `null` and lose the element on reload.
fn ensure_finite(id: ElementId, values: &[(&'static str, f64)]) -> Result<(), SceneError> {
    match values.iter().find(|(_, value)| !value.is_finite()) {
        Some(&(field, _)) => Err(SceneError::NonFinite { id, field }),
        None => Ok(()),
    }
}
