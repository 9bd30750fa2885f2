//! WASM bridge for FC: exposes the canvas session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the DOM and
//! draws from the JSON views returned here; every edit goes through
//! `FcCanvas` so the scene is persisted to `localStorage` as it changes.

mod storage;

pub use storage::LocalStorage;

use fc_core::{ElementId, ElementKind, Size};
use fc_editor::drop::DropPayload;
use fc_editor::input::InputEvent;
use fc_editor::tools::{LinkTool, RotateTool, SelectTool, Tool, ToolKind};
use fc_editor::{CanvasSession, EditorConfig, EditorError, MemoryStore, Mutation, Store};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// The main WASM-facing canvas controller.
///
/// Holds the session and one instance of each tool. All interaction from
/// the page goes through this struct.
#[wasm_bindgen]
pub struct FcCanvas {
    session: CanvasSession<Box<dyn Store>>,
    active_tool: ToolKind,
    select_tool: SelectTool,
    rotate_tool: RotateTool,
    link_tool: LinkTool,
    width: f64,
    height: f64,
    /// Message from the most recent failed operation, cleared on success.
    last_error: Option<String>,
}

#[wasm_bindgen]
impl FcCanvas {
    /// Create a canvas backed by `localStorage`, restoring any saved scene.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();
        let config = EditorConfig::default();
        let store = LocalStorage::new(config.storage_key.clone());
        Self::with_store(Box::new(store), config, width, height)
    }

    /// Create a canvas that keeps its scene in memory only.
    pub fn in_memory(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();
        Self::with_store(
            Box::new(MemoryStore::new()),
            EditorConfig::default(),
            width,
            height,
        )
    }

    /// Update the visible canvas size used for random placement.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// The last error message, or empty string if the last operation succeeded.
    pub fn last_error(&self) -> String {
        self.last_error.clone().unwrap_or_default()
    }

    pub fn element_count(&self) -> usize {
        self.session.scene().len()
    }

    pub fn link_count(&self) -> usize {
        self.session.scene().links().len()
    }

    // ─── Adding ──────────────────────────────────────────────────────────

    /// Add a text element. Returns its id, or empty string on failure.
    pub fn add_text(&mut self, content: &str, x: f64, y: f64) -> String {
        let result = self.session.add_text(content, x, y);
        self.record_added(result)
    }

    /// Add a text element somewhere inside the visible canvas.
    pub fn add_text_anywhere(&mut self, content: &str) -> String {
        let (x, y) = self.random_point();
        self.add_text(content, x, y)
    }

    /// Add an image at the default size.
    pub fn add_image(&mut self, locator: &str, x: f64, y: f64) -> String {
        let result = self.session.add_image(locator, x, y, None);
        self.record_added(result)
    }

    pub fn add_image_sized(
        &mut self,
        locator: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> String {
        let result = self
            .session
            .add_image(locator, x, y, Some(Size::new(width, height)));
        self.record_added(result)
    }

    /// Add an image at the default size somewhere inside the visible canvas.
    pub fn add_image_anywhere(&mut self, locator: &str) -> String {
        let (x, y) = self.random_point();
        self.add_image(locator, x, y)
    }

    // ─── Drops ───────────────────────────────────────────────────────────

    pub fn drop_text(&mut self, text: &str, x: f64, y: f64) -> String {
        self.add_drop(DropPayload::Text(text.to_string()), x, y)
    }

    pub fn drop_uri(&mut self, uri: &str, x: f64, y: f64) -> String {
        self.add_drop(DropPayload::Uri(uri.to_string()), x, y)
    }

    /// An image file the page has already read with `FileReader.readAsDataURL`.
    pub fn drop_image_file(&mut self, data_url: &str, x: f64, y: f64) -> String {
        self.add_drop(
            DropPayload::ImageFile {
                data_url: data_url.to_string(),
            },
            x,
            y,
        )
    }

    pub fn drop_file(&mut self, name: &str, x: f64, y: f64) -> String {
        self.add_drop(
            DropPayload::File {
                name: name.to_string(),
            },
            x,
            y,
        )
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    pub fn remove_element(&mut self, id: &str) -> bool {
        self.apply_to(id, |id| Mutation::RemoveElement { id })
    }

    pub fn move_element(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.apply_to(id, |id| Mutation::MoveElement { id, x, y })
    }

    pub fn rotate_element(&mut self, id: &str, delta_degrees: f64) -> bool {
        self.apply_to(id, |id| Mutation::RotateElement { id, delta_degrees })
    }

    pub fn set_depth(&mut self, id: &str, depth: i32) -> bool {
        self.apply_to(id, |id| Mutation::SetDepth {
            id,
            depth: i64::from(depth),
        })
    }

    pub fn raise(&mut self, id: &str) -> bool {
        self.apply_to(id, |id| Mutation::Raise { id })
    }

    pub fn lower(&mut self, id: &str) -> bool {
        self.apply_to(id, |id| Mutation::Lower { id })
    }

    /// Replace a text element's content. Images keep theirs; blank text is
    /// refused.
    pub fn set_content(&mut self, id: &str, content: &str) -> bool {
        let content = content.to_string();
        self.apply_to(id, |id| Mutation::SetContent { id, content })
    }

    pub fn link(&mut self, a: &str, b: &str) -> bool {
        let (Some(a), Some(b)) = (self.resolve(a), self.resolve(b)) else {
            return false;
        };
        self.apply(Mutation::LinkElements { a, b })
    }

    pub fn clear(&mut self) -> bool {
        self.apply(Mutation::Clear)
    }

    // ─── Interchange ─────────────────────────────────────────────────────

    pub fn export_text(&self) -> String {
        self.session.export_text()
    }

    /// Replace the scene from interchange text. Returns JSON:
    /// `{"ok":true,"skipped":[{"line":2,"text":"..."}]}` or
    /// `{"ok":false,"error":"..."}`.
    pub fn import_text(&mut self, text: &str) -> String {
        let result = self.session.import_text(text);
        let skipped = match &result {
            Ok(skipped) => Some(
                skipped
                    .iter()
                    .map(|s| serde_json::json!({ "line": s.line, "text": s.text }))
                    .collect::<Vec<_>>(),
            ),
            Err(_) => None,
        };
        self.record(&result);
        match skipped {
            Some(skipped) => serde_json::json!({ "ok": true, "skipped": skipped }).to_string(),
            None => serde_json::json!({ "ok": false, "error": self.last_error() }).to_string(),
        }
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// Switch the active tool: `"select"`, `"rotate"` or `"link"`.
    pub fn set_tool(&mut self, name: &str) {
        let tool = match name {
            "rotate" => ToolKind::Rotate,
            "link" => ToolKind::Link,
            _ => ToolKind::Select,
        };
        if tool != self.active_tool {
            // Abandon any gesture in progress on the old tool.
            self.dispatch(InputEvent::Cancel);
            self.active_tool = tool;
        }
    }

    pub fn get_tool_name(&self) -> String {
        tool_kind_to_name(self.active_tool).to_string()
    }

    /// Handle pointer down event. Returns true if the scene changed.
    pub fn handle_pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.dispatch(InputEvent::from_pointer_down(x, y))
    }

    /// Handle pointer move event. Returns true if the scene changed.
    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.dispatch(InputEvent::from_pointer_move(x, y))
    }

    /// Handle pointer up event. Returns true if the scene changed.
    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.dispatch(InputEvent::from_pointer_up(x, y))
    }

    /// Abort the gesture in progress (Escape, pointer left the window).
    pub fn cancel_gesture(&mut self) {
        self.dispatch(InputEvent::Cancel);
    }

    /// Get the selected element ID, or empty string if none.
    pub fn get_selected_id(&self) -> String {
        self.select_tool
            .selected
            .filter(|id| self.session.scene().get(*id).is_some())
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Topmost element at a canvas point, or empty string.
    pub fn hit_test_at(&self, x: f64, y: f64) -> String {
        self.session
            .hit_test(x, y)
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    // ─── Views ───────────────────────────────────────────────────────────

    /// Elements back to front as a JSON array.
    pub fn get_elements_json(&self) -> String {
        let metrics = &self.session.config().metrics;
        let views: Vec<ElementView<'_>> = self
            .session
            .scene()
            .paint_order()
            .into_iter()
            .map(|e| {
                let bounds = e.bounds(metrics);
                ElementView {
                    id: e.id.as_str(),
                    kind: e.kind,
                    content: &e.content,
                    x: e.x,
                    y: e.y,
                    rotation: e.rotation,
                    width: bounds.width(),
                    height: bounds.height(),
                    explicit_size: e.size.is_some(),
                    z_index: e.depth,
                }
            })
            .collect();
        serde_json::to_string(&views).unwrap_or_else(|_| "[]".to_string())
    }

    /// Link segments (centre to centre) as a JSON array.
    pub fn get_links_json(&self) -> String {
        let views: Vec<LinkView<'_>> = self
            .session
            .scene()
            .link_segments(&self.session.config().metrics)
            .into_iter()
            .map(|(link, line)| LinkView {
                a: link.a.as_str(),
                b: link.b.as_str(),
                x1: line.p0.x,
                y1: line.p0.y,
                x2: line.p1.x,
                y2: line.p1.y,
            })
            .collect();
        serde_json::to_string(&views).unwrap_or_else(|_| "[]".to_string())
    }

    /// In-progress link drag as `{"x1":..,"y1":..,"x2":..,"y2":..}`, or `null`.
    pub fn get_link_preview_json(&self) -> String {
        match self.link_tool.preview() {
            Some(line) => serde_json::json!({
                "x1": line.p0.x,
                "y1": line.p0.y,
                "x2": line.p1.x,
                "y2": line.p1.y,
            })
            .to_string(),
            None => "null".to_string(),
        }
    }
}

// ─── Internals ───────────────────────────────────────────────────────────

impl FcCanvas {
    fn with_store(store: Box<dyn Store>, config: EditorConfig, width: f64, height: f64) -> Self {
        Self {
            session: CanvasSession::open(store, config),
            active_tool: ToolKind::Select,
            select_tool: SelectTool::new(),
            rotate_tool: RotateTool::new(),
            link_tool: LinkTool::new(),
            width,
            height,
            last_error: None,
        }
    }

    fn dispatch(&mut self, event: InputEvent) -> bool {
        let tool: &mut dyn Tool = match self.active_tool {
            ToolKind::Select => &mut self.select_tool,
            ToolKind::Rotate => &mut self.rotate_tool,
            ToolKind::Link => &mut self.link_tool,
        };
        let result = self.session.handle_input(tool, &event);
        let changed = match &result {
            Ok(changed) => *changed,
            Err(e) => e.is_persist(),
        };
        self.record(&result);
        changed
    }

    fn apply(&mut self, mutation: Mutation) -> bool {
        let result = self.session.apply(mutation);
        self.record(&result)
    }

    fn apply_to(&mut self, id: &str, mutation: impl FnOnce(ElementId) -> Mutation) -> bool {
        match self.resolve(id) {
            Some(id) => self.apply(mutation(id)),
            None => false,
        }
    }

    /// Map an id string from the page to an element id. Strings that were
    /// never minted are reported as unknown without being interned.
    fn resolve(&mut self, id: &str) -> Option<ElementId> {
        let found = ElementId::lookup(id);
        if found.is_none() {
            self.last_error = Some(format!("invalid reference: no element `{id}` in scene"));
        }
        found
    }

    fn add_drop(&mut self, payload: DropPayload, x: f64, y: f64) -> String {
        let result = self.session.add_drop(payload, x, y);
        self.record_added(result)
    }

    /// Remember the outcome. Returns whether the scene changed, which is
    /// also the case when only the save failed.
    fn record<T>(&mut self, result: &Result<T, EditorError>) -> bool {
        match result {
            Ok(_) => {
                self.last_error = None;
                true
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                e.is_persist()
            }
        }
    }

    fn record_added(&mut self, result: Result<ElementId, EditorError>) -> String {
        let id = match &result {
            Ok(id) => Some(*id),
            Err(EditorError::Persist { created, .. }) => *created,
            Err(_) => None,
        };
        self.record(&result);
        id.map(|id| id.as_str().to_string()).unwrap_or_default()
    }

    /// A point inside the canvas, leaving room for a default-sized image.
    fn random_point(&self) -> (f64, f64) {
        let margin = self.session.config().default_image_size;
        let x = js_sys::Math::random() * (self.width - margin.width).max(0.0);
        let y = js_sys::Math::random() * (self.height - margin.height).max(0.0);
        (x, y)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ElementView<'a> {
    id: &'a str,
    kind: ElementKind,
    content: &'a str,
    x: f64,
    y: f64,
    rotation: f64,
    width: f64,
    height: f64,
    explicit_size: bool,
    z_index: i64,
}

#[derive(Serialize)]
struct LinkView<'a> {
    a: &'a str,
    b: &'a str,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

fn tool_kind_to_name(kind: ToolKind) -> &'static str {
    match kind {
        ToolKind::Select => "select",
        ToolKind::Rotate => "rotate",
        ToolKind::Link => "link",
    }
}

/// Set up console_error_panic_hook for better error messages.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("FC WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Parse interchange text and return the skipped lines as JSON:
/// `{"elements":3,"links":2,"skipped":[{"line":4,"text":"..."}]}`.
#[wasm_bindgen]
pub fn check_text(text: &str) -> String {
    let report = fc_core::parse_text_report(text);
    let skipped: Vec<_> = report
        .skipped
        .iter()
        .map(|s| serde_json::json!({ "line": s.line, "text": s.text }))
        .collect();
    serde_json::json!({
        "elements": report.scene.len(),
        "links": report.scene.links().len(),
        "skipped": skipped,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn canvas() -> FcCanvas {
        FcCanvas::in_memory(800.0, 600.0)
    }

    #[test]
    fn add_and_export() {
        let mut c = canvas();
        let hello = c.add_text("Hello", 10.0, 20.0);
        let cat = c.add_image("cat.png", 50.0, 60.0);
        assert!(!hello.is_empty());
        assert!(c.link(&hello, &cat));
        assert_eq!(
            c.export_text(),
            "Hello @@ (10, 20, r0, z0)\ncat.png @@ (50, 60, r0, z0) @@ 100x100\n\n# Links\n0 -> 1"
        );
        assert_eq!(c.last_error(), "");
    }

    #[test]
    fn self_link_is_rejected_with_message() {
        let mut c = canvas();
        let a = c.add_text("a", 0.0, 0.0);
        assert!(!c.link(&a, &a));
        assert!(!c.last_error().is_empty());
        assert_eq!(c.link_count(), 0);
    }

    #[test]
    fn unknown_id_is_rejected() {
        let mut c = canvas();
        assert!(!c.move_element("no_such_element", 1.0, 1.0));
        assert_eq!(c.last_error(), "invalid reference: no element `no_such_element` in scene");
    }

    #[test]
    fn page_ids_are_looked_up_not_interned() {
        let mut c = canvas();
        let a = c.add_text("a", 0.0, 0.0);
        assert!(!c.link(&a, "text_from_page"));
        assert!(!c.remove_element("image_from_page"));
        assert!(!c.set_content("text_from_page", "x"));
        assert_eq!(ElementId::lookup("text_from_page"), None);
        assert_eq!(ElementId::lookup("image_from_page"), None);
        assert!(c.raise(&a));
    }

    #[test]
    fn non_finite_move_keeps_the_element() {
        let mut c = canvas();
        let a = c.add_text("a", 3.0, 4.0);
        assert!(!c.move_element(&a, f64::NAN, 1.0));
        assert!(!c.rotate_element(&a, f64::INFINITY));
        assert!(!c.last_error().is_empty());
        let json: serde_json::Value = serde_json::from_str(&c.get_elements_json()).unwrap();
        assert_eq!(json[0]["x"], 3.0);
        assert_eq!(json[0]["y"], 4.0);
    }

    #[test]
    fn links_json_carries_endpoint_ids() {
        let mut c = canvas();
        let a = c.add_text("a", 0.0, 0.0);
        let b = c.add_text("b", 100.0, 0.0);
        assert!(c.link(&a, &b));
        let links: serde_json::Value = serde_json::from_str(&c.get_links_json()).unwrap();
        assert_eq!(links.as_array().map(Vec::len), Some(1));
        assert_eq!(links[0]["a"], a.as_str());
        assert_eq!(links[0]["b"], b.as_str());
    }

    #[test]
    fn elements_json_is_in_paint_order() {
        let mut c = canvas();
        let back = c.add_text("back", 0.0, 0.0);
        let front = c.add_text("front", 0.0, 0.0);
        c.raise(&back);
        c.raise(&back);
        let json: serde_json::Value = serde_json::from_str(&c.get_elements_json()).unwrap();
        let ids: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec![front, back]);
        assert_eq!(json[1]["zIndex"], 2);
        assert_eq!(json[1]["kind"], "text");
    }

    #[test]
    fn link_tool_gesture_via_pointer_events() {
        let mut c = canvas();
        let a = c.add_image_sized("a.png", 0.0, 0.0, 100.0, 100.0);
        let b = c.add_image_sized("b.png", 300.0, 0.0, 100.0, 100.0);
        c.set_tool("link");
        assert_eq!(c.get_tool_name(), "link");

        assert!(!c.handle_pointer_down(50.0, 50.0));
        c.handle_pointer_move(200.0, 50.0);
        let preview: serde_json::Value = serde_json::from_str(&c.get_link_preview_json()).unwrap();
        assert_eq!(preview["x1"], 50.0);
        assert_eq!(preview["y1"], 100.0);
        assert!(c.handle_pointer_up(350.0, 50.0));
        assert_eq!(c.get_link_preview_json(), "null");

        let links: serde_json::Value = serde_json::from_str(&c.get_links_json()).unwrap();
        assert_eq!(links[0]["a"], a.as_str());
        assert_eq!(links[0]["b"], b.as_str());
    }

    #[test]
    fn switching_tool_cancels_link_drag() {
        let mut c = canvas();
        c.add_image_sized("a.png", 0.0, 0.0, 100.0, 100.0);
        c.add_image_sized("b.png", 300.0, 0.0, 100.0, 100.0);
        c.set_tool("link");
        c.handle_pointer_down(50.0, 50.0);
        c.set_tool("select");
        c.set_tool("link");
        c.handle_pointer_up(350.0, 50.0);
        assert_eq!(c.link_count(), 0);
    }

    #[test]
    fn import_reports_skipped_lines() {
        let mut c = canvas();
        let out = c.import_text("a @@ (0, 0, r0, z0)\nnonsense\n\n# Links\n0 -> 0");
        let out: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(out["ok"], true);
        assert_eq!(out["skipped"][0]["line"], 2);
        assert_eq!(out["skipped"][1]["line"], 5);
        assert_eq!(c.element_count(), 1);
    }

    #[test]
    fn drops_classify() {
        let mut c = canvas();
        c.drop_uri("https://example.com/a.gif", 0.0, 0.0);
        c.drop_file("notes.pdf", 0.0, 0.0);
        let json: serde_json::Value = serde_json::from_str(&c.get_elements_json()).unwrap();
        assert_eq!(json[0]["kind"], "image");
        assert_eq!(json[0]["explicitSize"], true);
        assert_eq!(json[1]["kind"], "text");
        assert_eq!(json[1]["content"], "notes.pdf");
    }

    #[test]
    fn check_text_counts() {
        let json: serde_json::Value =
            serde_json::from_str(&check_text("a @@ (0, 0, r0, z0)\nbad")).unwrap();
        assert_eq!(json["elements"], 1);
        assert_eq!(json["links"], 0);
        assert_eq!(json["skipped"][0]["text"], "bad");
    }
}
