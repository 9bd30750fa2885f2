pub mod emitter;
pub mod error;
pub mod id;
pub mod links;
pub mod model;
pub mod parser;
pub mod record;
pub mod scene;

pub use emitter::emit_scene;
pub use error::{CodecError, InvalidReference, MalformedRecord, ParseSkipped, SceneError};
pub use id::ElementId;
pub use links::{Link, LinkSet};
pub use model::*;
pub use parser::{ParseReport, parse_text, parse_text_report};
pub use record::{ElementRecord, LoadReport, SceneRecord, scene_from_json, scene_to_json};
pub use scene::Scene;

// Re-export kurbo geometry so downstream crates don't need a direct dependency
pub use kurbo::{Line, Point, Rect};
