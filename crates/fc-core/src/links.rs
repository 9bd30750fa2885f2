//! Visual links between pairs of elements.
//!
//! Links are unordered: `(a, b)` and `(b, a)` describe the same connection.
//! Duplicates are kept, and iteration follows insertion order so connecting
//! lines always paint in the same sequence.

use crate::error::{InvalidReference, SceneError};
use crate::id::ElementId;
use smallvec::SmallVec;

/// An unordered connection between two distinct elements.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Link {
    pub a: ElementId,
    pub b: ElementId,
}

impl Link {
    pub fn touches(&self, id: ElementId) -> bool {
        self.a == id || self.b == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint.
    pub fn other(&self, id: ElementId) -> Option<ElementId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

/// Insertion-ordered collection of links.
#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    links: Vec<Link>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a link. Self-links are rejected; duplicates are not.
    ///
    /// The set does not know which elements exist; `Scene::link_elements`
    /// checks ownership before delegating here.
    pub fn add(&mut self, a: ElementId, b: ElementId) -> Result<(), SceneError> {
        if a == b {
            return Err(InvalidReference::SelfLink(a).into());
        }
        self.links.push(Link { a, b });
        Ok(())
    }

    /// Drop every link with `id` as an endpoint. Returns how many went.
    pub fn remove_all_referencing(&mut self, id: ElementId) -> usize {
        let before = self.links.len();
        self.links.retain(|link| !link.touches(id));
        before - self.links.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    /// Elements linked to `id`, in link order (repeated for duplicate links).
    pub fn neighbors(&self, id: ElementId) -> SmallVec<[ElementId; 4]> {
        self.links.iter().filter_map(|link| link.other(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementKind;

    fn ids() -> (ElementId, ElementId, ElementId) {
        (
            ElementId::mint(ElementKind::Text),
            ElementId::mint(ElementKind::Text),
            ElementId::mint(ElementKind::Image),
        )
    }

    #[test]
    fn self_link_rejected() {
        let (a, _, _) = ids();
        let mut set = LinkSet::new();
        let err = set.add(a, a).unwrap_err();
        assert_eq!(err, SceneError::InvalidReference(InvalidReference::SelfLink(a)));
        assert!(set.is_empty());
    }

    #[test]
    fn duplicates_allowed_and_ordered() {
        let (a, b, c) = ids();
        let mut set = LinkSet::new();
        set.add(a, b).unwrap();
        set.add(b, c).unwrap();
        set.add(b, a).unwrap();
        assert_eq!(set.len(), 3);
        let pairs: Vec<_> = set.iter().map(|l| (l.a, l.b)).collect();
        assert_eq!(pairs, vec![(a, b), (b, c), (b, a)]);
    }

    #[test]
    fn links_are_unordered() {
        let (a, b, _) = ids();
        assert_eq!(Link { a, b }, Link { a: b, b: a });
    }

    #[test]
    fn remove_all_referencing_cascades() {
        let (a, b, c) = ids();
        let mut set = LinkSet::new();
        set.add(a, b).unwrap();
        set.add(c, a).unwrap();
        set.add(b, c).unwrap();
        assert_eq!(set.remove_all_referencing(a), 2);
        assert_eq!(set.len(), 1);
        assert!(set.iter().all(|l| !l.touches(a)));
    }

    #[test]
    fn neighbors_in_link_order() {
        let (a, b, c) = ids();
        let mut set = LinkSet::new();
        set.add(a, b).unwrap();
        set.add(c, a).unwrap();
        assert_eq!(set.neighbors(a).as_slice(), &[b, c]);
        assert_eq!(set.neighbors(b).as_slice(), &[a]);
    }
}
