//! Error types for scene mutation and record decoding.

use crate::id::ElementId;
use std::fmt;
use thiserror::Error;

/// Why an element reference failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReference {
    /// The ID does not belong to any element in the scene.
    UnknownElement(ElementId),
    /// A sequence position past the end of the element list.
    IndexOutOfRange { index: usize, len: usize },
    /// Both endpoints of a link are the same element.
    SelfLink(ElementId),
    /// An element with this ID is already in the scene.
    DuplicateElement(ElementId),
}

impl fmt::Display for InvalidReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownElement(id) => write!(f, "no element `{id}` in scene"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "element index {index} out of range (scene has {len})")
            }
            Self::SelfLink(id) => write!(f, "cannot link element `{id}` to itself"),
            Self::DuplicateElement(id) => write!(f, "element `{id}` is already in scene"),
        }
    }
}

/// Errors raised by `Scene` and `LinkSet` mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("invalid reference: {0}")]
    InvalidReference(InvalidReference),

    /// Blank content has no line of its own in the text form.
    #[error("element `{0}` has blank content")]
    BlankContent(ElementId),

    #[error("element `{id}`: {field} must be finite")]
    NonFinite { id: ElementId, field: &'static str },
}

impl From<InvalidReference> for SceneError {
    fn from(reason: InvalidReference) -> Self {
        SceneError::InvalidReference(reason)
    }
}

/// Errors that abort decoding of the JSON record form as a whole.
///
/// Problems with individual records are not errors; they are collected as
/// [`MalformedRecord`] values in a [`crate::record::LoadReport`].
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A stored record that could not be turned into an element (skipped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// Position of the record in the stored `elements` array.
    pub index: usize,
    pub reason: String,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed record #{}: {}", self.index, self.reason)
    }
}

/// A line of the text interchange form that did not match (skipped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSkipped {
    /// 1-based line number within the input.
    pub line: usize,
    pub text: String,
}

impl fmt::Display for ParseSkipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: skipped `{}`", self.line, self.text)
    }
}
