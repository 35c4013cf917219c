//! core::merge
//!
//! Pure three-way merge decisions at file granularity.
//!
//! # Rules
//!
//! For each path, with `current`, `other`, and `base` being the blob ids on
//! each side (absent when the path does not exist there):
//!
//! 1. `current == other`: keep current (both sides agree)
//! 2. `other == base`: keep current (only current touched it)
//! 3. `current == base`: take other (only other touched it)
//! 4. otherwise: conflict
//!
//! A path whose resolved id is absent is left out of the merged tree.
//!
//! Nothing here touches the filesystem. The engine reads blobs for
//! conflicting paths and writes the marker text produced by
//! [`conflict_markers`].

use std::collections::BTreeSet;

use crate::core::object::Tree;
use crate::core::types::ObjectId;

/// The outcome of merging one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Keep the current side's version (possibly absent).
    Current,
    /// Take the other side's version (possibly absent).
    Other,
    /// Both sides changed the path differently.
    Conflict,
}

/// Decide how to merge one path.
///
/// Total over every combination of present and absent ids, and
/// deterministic.
///
/// # Example
///
/// ```
/// use strata::core::merge::{resolve, Resolution};
/// use strata::core::types::ObjectId;
///
/// let base = ObjectId::hash_bytes(b"base");
/// let edit = ObjectId::hash_bytes(b"edit");
///
/// assert_eq!(resolve(Some(&base), Some(&edit), Some(&base)), Resolution::Other);
/// assert_eq!(resolve(Some(&edit), Some(&base), Some(&base)), Resolution::Current);
/// ```
pub fn resolve(
    current: Option<&ObjectId>,
    other: Option<&ObjectId>,
    base: Option<&ObjectId>,
) -> Resolution {
    if current == other || other == base {
        Resolution::Current
    } else if current == base {
        Resolution::Other
    } else {
        Resolution::Conflict
    }
}

/// The merge of a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMerge {
    pub path: String,
    pub current: Option<ObjectId>,
    pub other: Option<ObjectId>,
    pub base: Option<ObjectId>,
    pub resolution: Resolution,
}

impl FileMerge {
    /// The id this path resolves to.
    ///
    /// A conflict resolves to the current side as a placeholder.
    pub fn result(&self) -> Option<&ObjectId> {
        match self.resolution {
            Resolution::Current | Resolution::Conflict => self.current.as_ref(),
            Resolution::Other => self.other.as_ref(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.resolution == Resolution::Conflict
    }

    /// Whether the merged result differs from the current side.
    pub fn changes_current(&self) -> bool {
        self.resolution == Resolution::Other && self.current != self.other
    }
}

/// Per-path merge results over the union of all three trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// One entry per path, in ascending path order.
    pub files: Vec<FileMerge>,
}

impl MergePlan {
    /// Paths that could not be merged automatically.
    pub fn conflicts(&self) -> impl Iterator<Item = &FileMerge> {
        self.files.iter().filter(|f| f.is_conflict())
    }

    pub fn has_conflicts(&self) -> bool {
        self.files.iter().any(FileMerge::is_conflict)
    }

    /// The merged tree: every path whose result is present.
    pub fn merged_tree(&self) -> Tree {
        self.files
            .iter()
            .filter_map(|f| f.result().map(|id| (f.path.clone(), id.clone())))
            .collect()
    }
}

/// Merge three trees file by file.
pub fn three_way(current: &Tree, other: &Tree, base: &Tree) -> MergePlan {
    let paths: BTreeSet<&String> = current
        .paths()
        .chain(other.paths())
        .chain(base.paths())
        .collect();

    let files = paths
        .into_iter()
        .map(|path| {
            let cur = current.get(path);
            let oth = other.get(path);
            let bas = base.get(path);
            FileMerge {
                path: path.clone(),
                current: cur.cloned(),
                other: oth.cloned(),
                base: bas.cloned(),
                resolution: resolve(cur, oth, bas),
            }
        })
        .collect();

    MergePlan { files }
}

/// Build the working-file contents for a conflicting path.
///
/// The layout is byte-exact:
///
/// ```text
/// <<<<<<< HEAD
/// <current>
/// =======
/// <other>
/// >>>>>>> <path>
/// ```
pub fn conflict_markers(path: &str, current: &[u8], other: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(current.len() + other.len() + path.len() + 40);
    out.extend_from_slice(b"<<<<<<< HEAD\n");
    out.extend_from_slice(current);
    out.extend_from_slice(b"\n=======\n");
    out.extend_from_slice(other);
    out.extend_from_slice(b"\n>>>>>>> ");
    out.extend_from_slice(path.as_bytes());
    out.push(b'\n');
    out
}
