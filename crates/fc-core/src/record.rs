//! JSON record form: Scene ↔ `{"elements": [...], "links": [[a, b], ...]}`.
//!
//! This is the persistence layout. Element keys (`type`, `zIndex`, nullable
//! `width`/`height`) match what earlier versions of the canvas wrote to
//! storage, so old saves keep loading. Link endpoints are positions in the
//! `elements` array at save time; identities are minted fresh on load.
//!
//! Loading is lenient: a bad record is skipped and reported rather than
//! failing the whole scene, and link indices are remapped around it.

use crate::error::{CodecError, MalformedRecord};
use crate::model::{Element, ElementKind, Size};
use crate::scene::Scene;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

// ─── Records ─────────────────────────────────────────────────────────────

/// Flat attribute mapping for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub content: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rotation: f64,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(rename = "zIndex", default, deserialize_with = "null_as_default")]
    pub depth: i64,
}

/// A stored `null` reads as the field's default, like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The whole scene as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneRecord {
    pub elements: Vec<ElementRecord>,
    pub links: Vec<[usize; 2]>,
}

impl Element {
    pub fn to_record(&self) -> ElementRecord {
        ElementRecord {
            kind: self.kind,
            content: self.content.clone(),
            x: self.x,
            y: self.y,
            rotation: self.rotation,
            width: self.width(),
            height: self.height(),
            depth: self.depth,
        }
    }

    /// Rebuild an element from its record. The result has a new identity.
    ///
    /// A record carrying only one of width/height keeps neither.
    pub fn from_record(record: ElementRecord) -> Self {
        let size = match (record.width, record.height) {
            (Some(width), Some(height)) => Some(Size::new(width, height)),
            (None, None) => None,
            (w, h) => {
                log::warn!("record: ignoring partial size (width {w:?}, height {h:?})");
                None
            }
        };
        let mut element = Element::new(record.kind, record.content, record.x, record.y)
            .with_rotation(record.rotation)
            .with_depth(record.depth);
        element.size = size;
        element
    }
}

impl SceneRecord {
    pub fn from_scene(scene: &Scene) -> Self {
        let positions: HashMap<_, _> = scene
            .elements()
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id, i))
            .collect();
        let links = scene
            .links()
            .iter()
            .filter_map(|link| Some([*positions.get(&link.a)?, *positions.get(&link.b)?]))
            .collect();
        Self {
            elements: scene.elements().iter().map(Element::to_record).collect(),
            links,
        }
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuild a scene with fresh identities. Records the scene refuses
    /// and links that are out of range or join a record to itself are
    /// dropped and reported.
    pub fn into_scene(self) -> LoadReport {
        let mut report = LoadReport::default();
        let mut remap = Vec::with_capacity(self.elements.len());
        for (index, record) in self.elements.into_iter().enumerate() {
            report.add_record(&mut remap, index, record);
        }
        for (index, endpoints) in self.links.into_iter().enumerate() {
            report.add_link(&remap, index, Ok(endpoints));
        }
        report
    }
}

// ─── Loading ─────────────────────────────────────────────────────────────

/// Stored layout, decoded loosely so each record can fail on its own.
#[derive(Deserialize)]
struct RawScene {
    elements: Vec<Value>,
    #[serde(default)]
    links: Vec<Value>,
}

/// A stored link that did not survive loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedLink {
    /// Position in the stored `links` array.
    pub index: usize,
    pub reason: String,
}

impl fmt::Display for DroppedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dropped link #{}: {}", self.index, self.reason)
    }
}

/// Outcome of loading a stored scene.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub scene: Scene,
    pub malformed: Vec<MalformedRecord>,
    pub dropped_links: Vec<DroppedLink>,
}

impl LoadReport {
    /// True when every record and link loaded.
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty() && self.dropped_links.is_empty()
    }

    /// Add the element for stored record `index`, noting in `remap` where it
    /// landed in the rebuilt scene.
    fn add_record(&mut self, remap: &mut Vec<Option<usize>>, index: usize, record: ElementRecord) {
        let slot = self.scene.len();
        match self.scene.add_element(Element::from_record(record)) {
            Ok(_) => remap.push(Some(slot)),
            Err(e) => self.reject_record(remap, index, e.to_string()),
        }
    }

    fn reject_record(&mut self, remap: &mut Vec<Option<usize>>, index: usize, reason: String) {
        let malformed = MalformedRecord { index, reason };
        log::warn!("record: {malformed}");
        self.malformed.push(malformed);
        remap.push(None);
    }

    /// Link two stored positions, or report why the link was dropped.
    fn add_link(&mut self, remap: &[Option<usize>], index: usize, endpoints: Result<[usize; 2], String>) {
        let outcome = endpoints.and_then(|[a, b]| {
            let a = resolve_stored_index(remap, a)?;
            let b = resolve_stored_index(remap, b)?;
            self.scene.link_indices(a, b).map_err(|e| e.to_string())
        });
        if let Err(reason) = outcome {
            let dropped = DroppedLink { index, reason };
            log::warn!("record: {dropped}");
            self.dropped_links.push(dropped);
        }
    }
}

/// Serialize a scene to its stored JSON text.
pub fn scene_to_json(scene: &Scene) -> Result<String, CodecError> {
    SceneRecord::from_scene(scene).to_json()
}

/// Load a scene from stored JSON text.
///
/// # Errors
/// Fails only when the text is not JSON or lacks an `elements` array.
/// Individual bad records and links are reported in the [`LoadReport`].
pub fn scene_from_json(json: &str) -> Result<LoadReport, CodecError> {
    let raw: RawScene = serde_json::from_str(json)?;
    let mut report = LoadReport::default();

    // Stored position → position in the rebuilt scene.
    let mut remap: Vec<Option<usize>> = Vec::with_capacity(raw.elements.len());
    for (index, value) in raw.elements.into_iter().enumerate() {
        match serde_json::from_value::<ElementRecord>(value) {
            Ok(record) => report.add_record(&mut remap, index, record),
            Err(e) => report.reject_record(&mut remap, index, e.to_string()),
        }
    }

    for (index, value) in raw.links.into_iter().enumerate() {
        let endpoints = serde_json::from_value::<(i64, i64)>(value)
            .map_err(|e| e.to_string())
            .and_then(|(a, b)| Ok([stored_endpoint(a)?, stored_endpoint(b)?]));
        report.add_link(&remap, index, endpoints);
    }

    Ok(report)
}

fn stored_endpoint(stored: i64) -> Result<usize, String> {
    usize::try_from(stored).map_err(|_| format!("endpoint {stored} out of range"))
}

fn resolve_stored_index(remap: &[Option<usize>], stored: usize) -> Result<usize, String> {
    let slot = remap
        .get(stored)
        .ok_or_else(|| format!("endpoint {stored} out of range"))?;
    slot.ok_or_else(|| format!("endpoint {stored} refers to a skipped record"))
}
