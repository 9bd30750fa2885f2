//! Canvas session: the authoritative scene plus its persistence.
//!
//! Every change to the scene goes through [`CanvasSession::apply`] as a
//! [`Mutation`]. After a successful mutation the session serializes the
//! scene to the JSON record form and saves it, so the store always holds
//! the latest state. Storage failures never undo a mutation; they are
//! returned as [`EditorError::Persist`] and the next save retries.

use crate::config::EditorConfig;
use crate::drop::{DropPayload, classify};
use crate::input::InputEvent;
use crate::store::{Store, StoreError};
use crate::tools::Tool;
use fc_core::{
    CodecError, Element, ElementId, ParseSkipped, Scene, SceneError, emit_scene,
    parse_text_report, scene_from_json, scene_to_json,
};
use thiserror::Error;

/// Failure reported by a session operation.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The mutation was rejected; the scene is unchanged.
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The scene changed but could not be saved. `created` carries the id
    /// of an element added by the failed operation, if any.
    #[error("scene updated but not persisted: {source}")]
    Persist {
        #[source]
        source: StoreError,
        created: Option<ElementId>,
    },
}

impl EditorError {
    pub fn is_persist(&self) -> bool {
        matches!(self, Self::Persist { .. })
    }
}

/// A change to the scene.
#[derive(Debug, Clone)]
pub enum Mutation {
    AddElement { element: Element },
    RemoveElement { id: ElementId },
    MoveElement { id: ElementId, x: f64, y: f64 },
    RotateElement { id: ElementId, delta_degrees: f64 },
    SetDepth { id: ElementId, depth: i64 },
    Raise { id: ElementId },
    Lower { id: ElementId },
    SetContent { id: ElementId, content: String },
    LinkElements { a: ElementId, b: ElementId },
    /// Link by current sequence positions.
    LinkIndices { a: usize, b: usize },
    Clear,
}

/// Holds the scene, the store it persists to, and editor configuration.
pub struct CanvasSession<S: Store> {
    scene: Scene,
    store: S,
    config: EditorConfig,
    /// Set when the last save failed.
    unsaved: bool,
    /// Set when the stored value could not be read at open. Saves are
    /// refused until `persist`, `import_text` or a `Clear` replaces it.
    protect_stored: bool,
}

impl<S: Store> CanvasSession<S> {
    /// Open a session, rehydrating from whatever `store` holds.
    ///
    /// A missing value starts an empty canvas. An unreadable store or
    /// corrupt JSON is logged and also starts empty, but the stored value
    /// is left alone until the caller replaces it explicitly; individual
    /// malformed records are skipped.
    pub fn open(store: S, config: EditorConfig) -> Self {
        let mut protect_stored = false;
        let scene = match store.load() {
            Ok(Some(json)) => match scene_from_json(&json) {
                Ok(report) => {
                    if !report.is_clean() {
                        log::warn!(
                            "session: loaded with {} malformed record(s), {} dropped link(s)",
                            report.malformed.len(),
                            report.dropped_links.len()
                        );
                    }
                    report.scene
                }
                Err(e) => {
                    log::warn!("session: stored canvas is corrupt, starting empty: {e}");
                    protect_stored = true;
                    Scene::new()
                }
            },
            Ok(None) => Scene::new(),
            Err(e) => {
                log::warn!("session: could not read stored canvas, starting empty: {e}");
                protect_stored = true;
                Scene::new()
            }
        };
        log::info!(
            "session: opened with {} element(s), {} link(s)",
            scene.len(),
            scene.links().len()
        );

        Self {
            scene,
            store,
            config,
            unsaved: false,
            protect_stored,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Whether the scene holds changes the store has not accepted.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Whether saves are held back to keep an unreadable stored canvas.
    pub fn is_protecting_stored(&self) -> bool {
        self.protect_stored
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply one mutation and persist. Returns the id of an added element.
    pub fn apply(&mut self, mutation: Mutation) -> Result<Option<ElementId>, EditorError> {
        let created = self.mutate(mutation)?;
        self.persist_with(created)?;
        Ok(created)
    }

    /// Apply a batch and persist once.
    ///
    /// Stops at the first rejected mutation; earlier ones stay applied and
    /// are persisted. Returns whether anything was applied.
    pub fn apply_all(&mut self, mutations: Vec<Mutation>) -> Result<bool, EditorError> {
        let mut applied = 0;
        let mut rejected = None;
        for mutation in mutations {
            match self.mutate(mutation) {
                Ok(_) => applied += 1,
                Err(e) => {
                    rejected = Some(e);
                    break;
                }
            }
        }
        if applied > 0 {
            self.persist_with(None)?;
        }
        match rejected {
            Some(e) => Err(e.into()),
            None => Ok(applied > 0),
        }
    }

    fn mutate(&mut self, mutation: Mutation) -> Result<Option<ElementId>, SceneError> {
        log::trace!("session: {mutation:?}");
        match mutation {
            Mutation::AddElement { element } => return Ok(Some(self.scene.add_element(element)?)),
            Mutation::RemoveElement { id } => {
                self.scene.remove_element(id)?;
            }
            Mutation::MoveElement { id, x, y } => self.scene.move_element(id, x, y)?,
            Mutation::RotateElement { id, delta_degrees } => {
                self.scene.rotate_element(id, delta_degrees)?
            }
            Mutation::SetDepth { id, depth } => self.scene.set_depth(id, depth)?,
            Mutation::Raise { id } => {
                self.scene.raise(id)?;
            }
            Mutation::Lower { id } => {
                self.scene.lower(id)?;
            }
            Mutation::SetContent { id, content } => {
                if !self.scene.set_content(id, content)? {
                    log::debug!("session: ignored content edit on image {id}");
                }
            }
            Mutation::LinkElements { a, b } => self.scene.link_elements(a, b)?,
            Mutation::LinkIndices { a, b } => self.scene.link_indices(a, b)?,
            Mutation::Clear => {
                self.scene.clear();
                self.protect_stored = false;
            }
        }
        Ok(None)
    }

    /// Serialize the scene and save it, replacing a stored value that
    /// could not be read.
    pub fn persist(&mut self) -> Result<(), EditorError> {
        self.protect_stored = false;
        self.persist_with(None)
    }

    fn persist_with(&mut self, created: Option<ElementId>) -> Result<(), EditorError> {
        if self.protect_stored {
            log::warn!("session: keeping unreadable stored canvas, changes stay in memory");
            self.unsaved = true;
            return Err(EditorError::Persist {
                source: StoreError::Protected,
                created,
            });
        }
        let json = scene_to_json(&self.scene)?;
        match self.store.save(&json) {
            Ok(()) => {
                self.unsaved = false;
                Ok(())
            }
            Err(source) => {
                log::warn!("session: save failed, keeping changes in memory: {source}");
                self.unsaved = true;
                Err(EditorError::Persist { source, created })
            }
        }
    }

    // ─── Conveniences ────────────────────────────────────────────────────

    pub fn add_text(
        &mut self,
        content: impl Into<String>,
        x: f64,
        y: f64,
    ) -> Result<ElementId, EditorError> {
        self.add(Element::text(content, x, y))
    }

    /// Add an image; `None` size uses the configured default.
    pub fn add_image(
        &mut self,
        locator: impl Into<String>,
        x: f64,
        y: f64,
        size: Option<fc_core::Size>,
    ) -> Result<ElementId, EditorError> {
        let size = size.unwrap_or(self.config.default_image_size);
        self.add(Element::image(locator, x, y).with_size(size.width, size.height))
    }

    /// Add whatever was dropped onto the canvas at `(x, y)`.
    pub fn add_drop(
        &mut self,
        payload: DropPayload,
        x: f64,
        y: f64,
    ) -> Result<ElementId, EditorError> {
        let element = classify(payload, x, y, &self.config);
        self.add(element)
    }

    fn add(&mut self, element: Element) -> Result<ElementId, EditorError> {
        let id = self.scene.add_element(element)?;
        self.persist_with(Some(id))?;
        Ok(id)
    }

    /// Topmost element under a canvas point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<ElementId> {
        self.scene
            .element_at_with(x, y, &self.config.metrics)
            .map(|e| e.id)
    }

    /// Feed a pointer event to `tool` and apply what it produces.
    pub fn handle_input(
        &mut self,
        tool: &mut dyn Tool,
        event: &InputEvent,
    ) -> Result<bool, EditorError> {
        let mutations = tool.handle(event, &self.scene, &self.config.metrics);
        if mutations.is_empty() {
            return Ok(false);
        }
        self.apply_all(mutations)
    }

    // ─── Interchange ─────────────────────────────────────────────────────

    /// The scene in text interchange form.
    pub fn export_text(&self) -> String {
        emit_scene(&self.scene)
    }

    /// Replace the scene with a parsed interchange document and persist.
    ///
    /// Returns the lines that were skipped.
    pub fn import_text(&mut self, text: &str) -> Result<Vec<ParseSkipped>, EditorError> {
        let report = parse_text_report(text);
        if !report.skipped.is_empty() {
            log::warn!("session: import skipped {} line(s)", report.skipped.len());
        }
        self.scene = report.scene;
        self.protect_stored = false;
        self.persist_with(None)?;
        Ok(report.skipped)
    }
}
