//! Property-based tests for the storage and merge core.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;
use tempfile::TempDir;

use strata::core::graph::CommitGraph;
use strata::core::merge::{resolve, three_way, Resolution};
use strata::core::object::{Commit, ObjectStore, Signature, Tree};
use strata::core::paths::RepoPaths;
use strata::core::types::ObjectId;

fn temp_paths() -> (TempDir, RepoPaths) {
    let dir = TempDir::new().unwrap();
    let paths = RepoPaths::new(dir.path().to_path_buf());
    paths.ensure_dirs().unwrap();
    (dir, paths)
}

/// Strategy for generating repository-relative paths.
fn file_path() -> impl Strategy<Value = String> {
    "[a-z]{1,6}(/[a-z]{1,6}){0,2}(\\.[a-z]{1,3})?"
}

/// Strategy for optional blob ids drawn from a small pool, so that
/// equal ids come up often.
fn maybe_id() -> impl Strategy<Value = Option<ObjectId>> {
    prop::option::of((0u8..4).prop_map(|n| ObjectId::hash_bytes(&[n])))
}

fn sig() -> Signature {
    Signature {
        name: "prop".into(),
        epoch: 0,
        tz_offset: "+0000".into(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Storing the same bytes twice yields one id and one object.
    #[test]
    fn blob_storage_is_deduplicated(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let (_dir, paths) = temp_paths();
        let store = ObjectStore::new(&paths);

        let a = store.put_blob(&bytes).unwrap();
        let b = store.put_blob(&bytes).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.clone(), ObjectId::hash_bytes(&bytes));
        prop_assert_eq!(store.get_blob(&a).unwrap(), bytes);
        prop_assert_eq!(std::fs::read_dir(paths.objects_dir()).unwrap().count(), 1);
    }

    /// Ancestry is reflexive and transitive over arbitrary DAGs, and every
    /// merge base is a common ancestor.
    #[test]
    fn ancestry_laws_hold(
        shape in prop::collection::vec(prop::collection::vec(any::<prop::sample::Index>(), 0..3), 1..10)
    ) {
        let (_dir, paths) = temp_paths();
        let store = ObjectStore::new(&paths);
        let graph = CommitGraph::new(&paths);
        let tree = store.put_tree(&Tree::new()).unwrap();

        let mut ids: Vec<ObjectId> = Vec::new();
        for (i, picks) in shape.iter().enumerate() {
            let mut parents: Vec<ObjectId> = Vec::new();
            if i > 0 {
                for pick in picks {
                    let parent = ids[pick.index(i)].clone();
                    if !parents.contains(&parent) {
                        parents.push(parent);
                    }
                }
            }
            let commit = Commit {
                tree: tree.clone(),
                parents,
                author: sig(),
                committer: sig(),
                message: format!("commit {}", i),
            };
            ids.push(store.put_commit(&commit).unwrap());
        }

        for id in &ids {
            let ancestors = graph.ancestors(Some(id)).unwrap();
            prop_assert!(ancestors.contains(id));
            prop_assert_eq!(graph.merge_base(Some(id), Some(id)).unwrap(), Some(id.clone()));

            for parent in store.get_commit(id).unwrap().parents {
                prop_assert!(graph.is_ancestor(&parent, id).unwrap());
                for grand in graph.ancestors(Some(&parent)).unwrap() {
                    prop_assert!(ancestors.contains(&grand));
                }
            }
        }

        let first = ids.first().unwrap();
        let last = ids.last().unwrap();
        if let Some(base) = graph.merge_base(Some(first), Some(last)).unwrap() {
            prop_assert!(graph.ancestors(Some(first)).unwrap().contains(&base));
            prop_assert!(graph.ancestors(Some(last)).unwrap().contains(&base));
        }
    }

    /// A tree's id does not depend on insertion order.
    #[test]
    fn tree_id_is_order_independent(
        entries in prop::collection::btree_map(file_path(), any::<u8>(), 0..12)
    ) {
        let pairs: Vec<(String, ObjectId)> = entries
            .into_iter()
            .map(|(path, n)| (path, ObjectId::hash_bytes(&[n])))
            .collect();

        let forward: Tree = pairs.iter().cloned().collect();
        let backward: Tree = pairs.iter().rev().cloned().collect();
        prop_assert_eq!(forward.id(), backward.id());
        prop_assert_eq!(Tree::decode(&forward.encode()).unwrap(), forward);
    }

    /// `resolve` is total and deterministic, and agrees with its rules.
    #[test]
    fn resolve_is_total_and_deterministic(
        current in maybe_id(),
        other in maybe_id(),
        base in maybe_id(),
    ) {
        let first = resolve(current.as_ref(), other.as_ref(), base.as_ref());
        let second = resolve(current.as_ref(), other.as_ref(), base.as_ref());
        prop_assert_eq!(first, second);

        let expected = if current == other || other == base {
            Resolution::Current
        } else if current == base {
            Resolution::Other
        } else {
            Resolution::Conflict
        };
        prop_assert_eq!(first, expected);
    }

    /// Merging a tree with itself against any base is conflict-free and
    /// yields the same tree.
    #[test]
    fn self_merge_is_identity(
        files in prop::collection::btree_map(file_path(), any::<u8>(), 0..8),
        base_files in prop::collection::btree_map(file_path(), any::<u8>(), 0..8),
    ) {
        let tree: Tree = files
            .into_iter()
            .map(|(p, n)| (p, ObjectId::hash_bytes(&[n])))
            .collect();
        let base: Tree = base_files
            .into_iter()
            .map(|(p, n)| (p, ObjectId::hash_bytes(&[n])))
            .collect();

        let plan = three_way(&tree, &tree, &base);
        prop_assert!(!plan.has_conflicts());
        prop_assert_eq!(plan.merged_tree(), tree);
    }
}
