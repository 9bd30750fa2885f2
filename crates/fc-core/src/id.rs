//! Element identity.
//!
//! Every element gets an id of the form `<kind>_<n>` when it is created,
//! where `n` comes from one process-wide counter. The strings live in a
//! shared `lasso` table so an `ElementId` is a 4-byte `Copy` handle and
//! the UI can hold it without borrowing the scene.
//!
//! Only minting adds to the table. Strings arriving from outside (the page,
//! the command line) are resolved with [`ElementId::lookup`], which never
//! grows it: an id nobody minted cannot name an element anyway.

use crate::model::ElementKind;
use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static NAMES: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

static NEXT: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of a canvas element, independent of its position in the
/// scene sequence.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Spur);

impl ElementId {
    /// A fresh id for a new element of `kind`, e.g. `text_3` or `image_4`.
    pub fn mint(kind: ElementKind) -> Self {
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        ElementId(NAMES.get_or_intern(format!("{}_{n}", kind.as_str())))
    }

    /// The id previously minted under `name`, if any.
    pub fn lookup(name: &str) -> Option<Self> {
        NAMES.get(name).map(ElementId)
    }

    /// The id's string form. The table is never emptied, so the slice
    /// outlives any scene or element that carries the id.
    pub fn as_str(&self) -> &'static str {
        NAMES.resolve(&self.0)
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
