//! Drag-and-drop: turn whatever lands on the canvas into an element.
//!
//! Hosts inspect the drop's data transfer in this priority order and build
//! one `DropPayload`: plain text, then a URI list, then files. Image files
//! are read to a data URL by the host before classifying.

use crate::config::EditorConfig;
use fc_core::{Element, has_image_extension};

/// What was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPayload {
    /// `text/plain`
    Text(String),
    /// First entry of a `text/uri-list`.
    Uri(String),
    /// An image file, already read to a data URL.
    ImageFile { data_url: String },
    /// Any other file. Only its name is kept.
    File { name: String },
}

/// Build the element for a drop at `(x, y)`.
///
/// URIs ending in an image extension and image files become images at the
/// configured default size. Everything else becomes a text element.
pub fn classify(payload: DropPayload, x: f64, y: f64, config: &EditorConfig) -> Element {
    let size = config.default_image_size;
    match payload {
        DropPayload::Text(text) => Element::text(text, x, y),
        DropPayload::Uri(uri) if has_image_extension(&uri) => {
            Element::image(uri, x, y).with_size(size.width, size.height)
        }
        DropPayload::Uri(uri) => Element::text(uri, x, y),
        DropPayload::ImageFile { data_url } => {
            Element::image(data_url, x, y).with_size(size.width, size.height)
        }
        DropPayload::File { name } => Element::text(name, x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::{ElementKind, Size};
    use pretty_assertions::assert_eq;

    fn drop_at_origin(payload: DropPayload) -> Element {
        classify(payload, 0.0, 0.0, &EditorConfig::default())
    }

    #[test]
    fn plain_text_is_text_even_with_image_name() {
        let e = drop_at_origin(DropPayload::Text("photo.png".into()));
        assert_eq!(e.kind, ElementKind::Text);
        assert_eq!(e.size, None);
    }

    #[test]
    fn image_uri_gets_default_size() {
        let e = drop_at_origin(DropPayload::Uri("https://example.com/a.JPG".into()));
        assert_eq!(e.kind, ElementKind::Image);
        assert_eq!(e.size, Some(Size::new(100.0, 100.0)));
    }

    #[test]
    fn other_uri_is_text() {
        let e = drop_at_origin(DropPayload::Uri("https://example.com/page".into()));
        assert_eq!(e.kind, ElementKind::Text);
        assert_eq!(e.content, "https://example.com/page");
    }

    #[test]
    fn image_file_uses_data_url() {
        let e = drop_at_origin(DropPayload::ImageFile {
            data_url: "data:image/png;base64,iVBORw0KGgo=".into(),
        });
        assert_eq!(e.kind, ElementKind::Image);
        assert_eq!(e.content, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn other_file_keeps_name() {
        let e = drop_at_origin(DropPayload::File {
            name: "report.pdf".into(),
        });
        assert_eq!(e.kind, ElementKind::Text);
        assert_eq!(e.content, "report.pdf");
    }
}
