//! Tool system for canvas interactions.
//!
//! Each tool translates pointer events into `Mutation`s that the session
//! applies. Tools read the scene but never change it themselves.
//!
//! | Tool | Down on element | Move | Up |
//! |------|-----------------|------|----|
//! | **Select** | select, remember grab offset | move to pointer − offset | end drag |
//! | **Rotate** | remember angle from centre | rotate by angle delta | end |
//! | **Link** | start preview at bottom-centre | update preview | link to element under pointer |

use crate::input::InputEvent;
use crate::session::Mutation;
use fc_core::{BoxMetrics, ElementId, Line, Point, Scene};

/// The active tool determines how input events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Select,
    Rotate,
    Link,
}

/// Trait for tools that handle input and produce mutations.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Handle an input event, returning zero or more mutations.
    fn handle(&mut self, event: &InputEvent, scene: &Scene, metrics: &BoxMetrics)
    -> Vec<Mutation>;
}

// ─── Select Tool ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SelectTool {
    /// Element picked by the last pointer-down.
    pub selected: Option<ElementId>,
    drag: Option<Drag>,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    id: ElementId,
    offset_x: f64,
    offset_y: f64,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        scene: &Scene,
        metrics: &BoxMetrics,
    ) -> Vec<Mutation> {
        match *event {
            InputEvent::PointerDown { x, y } => {
                let hit = scene.element_at_with(x, y, metrics);
                self.selected = hit.map(|e| e.id);
                self.drag = hit.map(|e| Drag {
                    id: e.id,
                    offset_x: x - e.x,
                    offset_y: y - e.y,
                });
                vec![]
            }
            InputEvent::PointerMove { x, y } => match self.drag {
                Some(drag) if scene.get(drag.id).is_some() => vec![Mutation::MoveElement {
                    id: drag.id,
                    x: x - drag.offset_x,
                    y: y - drag.offset_y,
                }],
                Some(_) => {
                    self.drag = None;
                    vec![]
                }
                None => vec![],
            },
            InputEvent::PointerUp { .. } | InputEvent::Cancel => {
                self.drag = None;
                vec![]
            }
        }
    }
}

// ─── Rotate Tool ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RotateTool {
    turn: Option<Turn>,
}

#[derive(Debug, Clone, Copy)]
struct Turn {
    id: ElementId,
    center: Point,
    /// Pointer angle (radians) at the previous event.
    last_angle: f64,
}

impl RotateTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<ElementId> {
        self.turn.map(|t| t.id)
    }
}

fn pointer_angle(center: Point, x: f64, y: f64) -> f64 {
    (y - center.y).atan2(x - center.x)
}

/// Wrap a degree delta into `[-180, 180)` so crossing the ±180° seam does
/// not spin the element a full turn.
fn wrap_degrees(delta: f64) -> f64 {
    (delta + 180.0).rem_euclid(360.0) - 180.0
}

impl Tool for RotateTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rotate
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        scene: &Scene,
        metrics: &BoxMetrics,
    ) -> Vec<Mutation> {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.turn = scene.element_at_with(x, y, metrics).map(|e| {
                    let center = e.center(metrics);
                    Turn {
                        id: e.id,
                        center,
                        last_angle: pointer_angle(center, x, y),
                    }
                });
                vec![]
            }
            InputEvent::PointerMove { x, y } => {
                let Some(mut turn) = self.turn else {
                    return vec![];
                };
                if scene.get(turn.id).is_none() {
                    self.turn = None;
                    return vec![];
                }
                let angle = pointer_angle(turn.center, x, y);
                let delta = wrap_degrees((angle - turn.last_angle).to_degrees());
                turn.last_angle = angle;
                self.turn = Some(turn);
                if delta == 0.0 {
                    return vec![];
                }
                vec![Mutation::RotateElement {
                    id: turn.id,
                    delta_degrees: delta,
                }]
            }
            InputEvent::PointerUp { .. } | InputEvent::Cancel => {
                self.turn = None;
                vec![]
            }
        }
    }
}

// ─── Link Tool ───────────────────────────────────────────────────────────

/// Drag from one element to another to connect them.
///
/// While dragging, [`LinkTool::preview`] gives the provisional segment from
/// the source's bottom-centre to the pointer.
#[derive(Debug, Default)]
pub struct LinkTool {
    source: Option<ElementId>,
    preview: Option<Line>,
}

impl LinkTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<ElementId> {
        self.source
    }

    /// Segment to draw while a link drag is in progress.
    pub fn preview(&self) -> Option<Line> {
        self.preview
    }

    fn reset(&mut self) {
        self.source = None;
        self.preview = None;
    }
}

fn bottom_center(scene: &Scene, id: ElementId, metrics: &BoxMetrics) -> Option<Point> {
    let bounds = scene.get(id)?.bounds(metrics);
    Some(Point::new(bounds.center().x, bounds.y1))
}

impl Tool for LinkTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Link
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        scene: &Scene,
        metrics: &BoxMetrics,
    ) -> Vec<Mutation> {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.reset();
                if let Some(hit) = scene.element_at_with(x, y, metrics) {
                    self.source = Some(hit.id);
                    self.preview =
                        bottom_center(scene, hit.id, metrics).map(|anchor| Line::new(anchor, anchor));
                }
                vec![]
            }
            InputEvent::PointerMove { x, y } => {
                if let Some(source) = self.source {
                    match bottom_center(scene, source, metrics) {
                        Some(anchor) => self.preview = Some(Line::new(anchor, (x, y))),
                        None => self.reset(),
                    }
                }
                vec![]
            }
            InputEvent::PointerUp { x, y } => {
                let source = self.source.filter(|id| scene.get(*id).is_some());
                self.reset();
                let Some(source) = source else {
                    return vec![];
                };
                match scene.element_at_with(x, y, metrics) {
                    Some(target) if target.id != source => vec![Mutation::LinkElements {
                        a: source,
                        b: target.id,
                    }],
                    _ => vec![],
                }
            }
            InputEvent::Cancel => {
                self.reset();
                vec![]
            }
        }
    }
}
