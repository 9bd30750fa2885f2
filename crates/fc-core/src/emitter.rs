//! Emitter: Scene → text interchange form.
//!
//! ```text
//! Hello @@ (10, 20, r0, z0)
//! cat.png @@ (50, 60, r0, z0) @@ 100x100
//!
//! # Links
//! 0 -> 1
//! ```
//!
//! Output round-trips through [`crate::parser`]. Numbers are written in
//! shortest form, so scenes with integral coordinates produce exactly what
//! older exports contained.

use crate::model::Element;
use crate::scene::Scene;
use std::collections::HashMap;
use std::fmt::Write;

/// Separator between an element's content and its placement.
pub const FIELD_SEPARATOR: &str = " @@ ";

/// Header line that opens the links section.
pub const LINKS_HEADER: &str = "# Links";

impl Element {
    /// One line of the interchange form.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.content.len() + 32);
        emit_element(&mut out, self);
        out
    }
}

/// Emit a `Scene` as an interchange document.
///
/// The links header is always written, even when there are no links, and
/// there is no trailing newline.
#[must_use]
pub fn emit_scene(scene: &Scene) -> String {
    let mut out = String::with_capacity(64 * (scene.len() + 1));

    for (i, element) in scene.elements().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        emit_element(&mut out, element);
    }

    out.push_str("\n\n");
    out.push_str(LINKS_HEADER);
    out.push('\n');

    let positions: HashMap<_, _> = scene
        .elements()
        .iter()
        .enumerate()
        .map(|(i, e)| (e.id, i))
        .collect();
    let mut first = true;
    for link in scene.links() {
        let (Some(a), Some(b)) = (positions.get(&link.a), positions.get(&link.b)) else {
            continue;
        };
        if !first {
            out.push('\n');
        }
        first = false;
        let _ = write!(out, "{a} -> {b}");
    }

    out
}

fn emit_element(out: &mut String, element: &Element) {
    let _ = write!(
        out,
        "{}{}({}, {}, r{}, z{})",
        element.content,
        FIELD_SEPARATOR,
        format_num(element.x),
        format_num(element.y),
        format_num(element.rotation),
        element.depth
    );
    if let Some(size) = element.size {
        let _ = write!(
            out,
            "{}{}x{}",
            FIELD_SEPARATOR,
            format_num(size.width),
            format_num(size.height)
        );
    }
}

/// Shortest decimal form: `10` rather than `10.0`, `12.5` stays `12.5`.
pub fn format_num(n: f64) -> String {
    if n == 0.0 {
        // Collapse -0 so exports never show a signed zero.
        return "0".to_string();
    }
    format!("{n}")
}
