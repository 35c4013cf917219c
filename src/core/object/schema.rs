//! core::object::schema
//!
//! In-memory object model and its exact on-disk encoding.
//!
//! # Formats
//!
//! Trees are UTF-8 text, one `path:hash\n` line per entry, sorted by path.
//! Because entries live in a `BTreeMap`, two trees with the same pairs
//! always encode to the same bytes regardless of insertion order.
//!
//! Commits are stored framed, exactly as hashed:
//!
//! ```text
//! commit <len>\0tree <hash>
//! parent <hash>            (zero, one, or two lines)
//! author <name> <epoch> <tz>
//! committer <name> <epoch> <tz>
//!
//! <message>
//! ```
//!
//! The framing makes commit ids differ from a plain content hash of the
//! same text, unlike blobs and trees which are hashed as-is.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;
use thiserror::Error;

use crate::core::types::ObjectId;

/// Errors from decoding stored objects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("tree line {line} has no ':' separator")]
    MissingTreeSeparator { line: usize },

    #[error("tree line {line} has an invalid hash")]
    InvalidTreeHash { line: usize },

    #[error("commit is missing its header separator")]
    MissingHeaderSeparator,

    #[error("commit has a malformed frame header")]
    MalformedFrame,

    #[error("commit is missing its tree line")]
    MissingTree,

    #[error("commit has a malformed {field} line")]
    MalformedField { field: &'static str },

    #[error("commit is not valid UTF-8")]
    InvalidUtf8,
}

/// A mapping from file path to blob hash.
///
/// # Example
///
/// ```
/// use strata::core::object::Tree;
/// use strata::core::types::ObjectId;
///
/// let mut tree = Tree::new();
/// tree.insert("b.txt", ObjectId::hash_bytes(b"b"));
/// tree.insert("a.txt", ObjectId::hash_bytes(b"a"));
///
/// let text = tree.encode();
/// assert!(text.starts_with("a.txt:"));
/// assert_eq!(Tree::decode(&text).unwrap(), tree);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tree {
    entries: BTreeMap<String, ObjectId>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, path: impl Into<String>, blob: ObjectId) {
        self.entries.insert(path.into(), blob);
    }

    /// Remove an entry, returning its blob hash if present.
    pub fn remove(&mut self, path: &str) -> Option<ObjectId> {
        self.entries.remove(path)
    }

    /// Look up the blob hash for a path.
    pub fn get(&self, path: &str) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    /// Check whether a path is present.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in ascending path order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.entries.iter()
    }

    /// Iterate paths in ascending order.
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Borrow the underlying ordered map.
    pub fn entries(&self) -> &BTreeMap<String, ObjectId> {
        &self.entries
    }

    /// Encode as sorted `path:hash` lines.
    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .map(|(path, hash)| format!("{}:{}\n", path, hash))
            .collect()
    }

    /// Decode `path:hash` lines.
    ///
    /// Blank lines are skipped. Each line is split on its last `:` since
    /// hashes never contain one.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::MissingTreeSeparator` for a line without `:`
    /// and `SchemaError::InvalidTreeHash` for a bad hash.
    pub fn decode(text: &str) -> Result<Self, SchemaError> {
        let mut entries = BTreeMap::new();
        for (idx, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (path, hash) = line
                .rsplit_once(':')
                .ok_or(SchemaError::MissingTreeSeparator { line: idx + 1 })?;
            let hash =
                ObjectId::new(hash).map_err(|_| SchemaError::InvalidTreeHash { line: idx + 1 })?;
            entries.insert(path.to_string(), hash);
        }
        Ok(Self { entries })
    }
}

impl From<BTreeMap<String, ObjectId>> for Tree {
    fn from(entries: BTreeMap<String, ObjectId>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, ObjectId)> for Tree {
    fn from_iter<I: IntoIterator<Item = (String, ObjectId)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Author or committer identity with a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    /// Display name.
    pub name: String,
    /// Seconds since the Unix epoch.
    pub epoch: i64,
    /// Timezone offset rendered as `+HHMM` or `-HHMM`.
    pub tz_offset: String,
}

impl Signature {
    /// Create a signature stamped with the current local time.
    pub fn now(name: impl Into<String>) -> Self {
        let now = chrono::Local::now();
        Self {
            name: name.into(),
            epoch: now.timestamp(),
            tz_offset: now.format("%z").to_string(),
        }
    }

    /// Render as `<name> <epoch> <tz>`.
    pub fn render(&self) -> String {
        format!("{} {} {}", self.name, self.epoch, self.tz_offset)
    }

    /// Parse `<name> <epoch> <tz>`. The name may contain spaces.
    fn parse(s: &str, field: &'static str) -> Result<Self, SchemaError> {
        let mut parts = s.rsplitn(3, ' ');
        let tz_offset = parts.next().filter(|tz| !tz.is_empty());
        let epoch = parts.next().and_then(|e| e.parse::<i64>().ok());
        let name = parts.next();

        match (name, epoch, tz_offset) {
            (Some(name), Some(epoch), Some(tz)) => Ok(Self {
                name: name.to_string(),
                epoch,
                tz_offset: tz.to_string(),
            }),
            _ => Err(SchemaError::MalformedField { field }),
        }
    }

    /// The timestamp in the recorded offset, if both parse.
    pub fn datetime(&self) -> Option<DateTime<FixedOffset>> {
        let offset = parse_tz_offset(&self.tz_offset)?;
        offset.timestamp_opt(self.epoch, 0).single()
    }
}

fn parse_tz_offset(tz: &str) -> Option<FixedOffset> {
    let (sign, digits) = if let Some(rest) = tz.strip_prefix('+') {
        (1, rest)
    } else {
        (-1, tz.strip_prefix('-')?)
    };
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// A node in the history graph.
///
/// # Example
///
/// ```
/// use strata::core::object::{Commit, Signature, Tree};
///
/// let sig = Signature { name: "ada".into(), epoch: 0, tz_offset: "+0000".into() };
/// let commit = Commit {
///     tree: Tree::new().id(),
///     parents: vec![],
///     author: sig.clone(),
///     committer: sig,
///     message: "root".into(),
/// };
///
/// let bytes = commit.encode();
/// assert!(bytes.starts_with(b"commit "));
/// assert_eq!(Commit::decode(&bytes).unwrap(), commit);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub tree: ObjectId,
    pub parents: Vec<ObjectId>,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
}

impl Commit {
    /// Header lines, blank line, and message with a trailing newline.
    pub fn body(&self) -> String {
        let mut body = format!("tree {}\n", self.tree);
        for parent in &self.parents {
            body.push_str(&format!("parent {}\n", parent));
        }
        body.push_str(&format!("author {}\n", self.author.render()));
        body.push_str(&format!("committer {}\n", self.committer.render()));
        body.push('\n');
        body.push_str(&self.message);
        body.push('\n');
        body
    }

    /// Encode as `commit <len>\0<body>`.
    pub fn encode(&self) -> Vec<u8> {
        let body = self.body();
        let mut out = format!("commit {}\0", body.len()).into_bytes();
        out.extend_from_slice(body.as_bytes());
        out
    }

    /// The commit id: SHA-1 of the framed encoding.
    pub fn id(&self) -> ObjectId {
        ObjectId::hash_bytes(&self.encode())
    }

    /// Decode a framed commit.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` if the frame, header, or required lines
    /// are missing or malformed.
    pub fn decode(bytes: &[u8]) -> Result<Self, SchemaError> {
        let nul = bytes
            .iter()
            .position(|&b| b == 0)
            .ok_or(SchemaError::MissingHeaderSeparator)?;
        if !bytes[..nul].starts_with(b"commit ") {
            return Err(SchemaError::MalformedFrame);
        }
        let body = std::str::from_utf8(&bytes[nul + 1..]).map_err(|_| SchemaError::InvalidUtf8)?;

        let (header, message) = body
            .split_once("\n\n")
            .ok_or(SchemaError::MissingHeaderSeparator)?;

        let mut tree = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;

        for line in header.lines() {
            if let Some(rest) = line.strip_prefix("tree ") {
                tree = Some(
                    ObjectId::new(rest).map_err(|_| SchemaError::MalformedField { field: "tree" })?,
                );
            } else if let Some(rest) = line.strip_prefix("parent ") {
                parents.push(
                    ObjectId::new(rest)
                        .map_err(|_| SchemaError::MalformedField { field: "parent" })?,
                );
            } else if let Some(rest) = line.strip_prefix("author ") {
                author = Some(Signature::parse(rest, "author")?);
            } else if let Some(rest) = line.strip_prefix("committer ") {
                committer = Some(Signature::parse(rest, "committer")?);
            }
        }

        let message = message.strip_suffix('\n').unwrap_or(message);

        Ok(Self {
            tree: tree.ok_or(SchemaError::MissingTree)?,
            parents,
            author: author.ok_or(SchemaError::MalformedField { field: "author" })?,
            committer: committer.ok_or(SchemaError::MalformedField { field: "committer" })?,
            message: message.to_string(),
        })
    }

    /// First parent, if any.
    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

impl Tree {
    /// The tree id: SHA-1 of the encoded text.
    pub fn id(&self) -> ObjectId {
        ObjectId::hash_bytes(self.encode().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(name: &str) -> Signature {
        Signature {
            name: name.to_string(),
            epoch: 1_700_000_000,
            tz_offset: "-0700".to_string(),
        }
    }

    fn commit(parents: Vec<ObjectId>, message: &str) -> Commit {
        Commit {
            tree: Tree::new().id(),
            parents,
            author: sig("ada"),
            committer: sig("ada"),
            message: message.to_string(),
        }
    }

    mod tree {
        use super::*;

        #[test]
        fn encode_sorted() {
            let mut tree = Tree::new();
            tree.insert("z.txt", ObjectId::hash_bytes(b"z"));
            tree.insert("a.txt", ObjectId::hash_bytes(b"a"));
            let text = tree.encode();
            let paths: Vec<_> = text.lines().map(|l| l.split(':').next().unwrap()).collect();
            assert_eq!(paths, vec!["a.txt", "z.txt"]);
        }

        #[test]
        fn insertion_order_irrelevant() {
            let a = ObjectId::hash_bytes(b"a");
            let b = ObjectId::hash_bytes(b"b");

            let mut t1 = Tree::new();
            t1.insert("one", a.clone());
            t1.insert("two", b.clone());

            let mut t2 = Tree::new();
            t2.insert("two", b);
            t2.insert("one", a);

            assert_eq!(t1.id(), t2.id());
        }

        #[test]
        fn empty_tree_encodes_to_nothing() {
            assert_eq!(Tree::new().encode(), "");
            assert!(Tree::decode("").unwrap().is_empty());
        }

        #[test]
        fn missing_separator_is_rejected() {
            let err = Tree::decode("no-separator-here\n").unwrap_err();
            assert_eq!(err, SchemaError::MissingTreeSeparator { line: 1 });
        }

        #[test]
        fn bad_hash_is_rejected() {
            let err = Tree::decode("a.txt:nothex\n").unwrap_err();
            assert_eq!(err, SchemaError::InvalidTreeHash { line: 1 });
        }

        #[test]
        fn path_with_colon_survives() {
            let mut tree = Tree::new();
            tree.insert("dir/with:colon.txt", ObjectId::hash_bytes(b"c"));
            assert_eq!(Tree::decode(&tree.encode()).unwrap(), tree);
        }
    }

    mod commit {
        use super::*;

        #[test]
        fn body_layout() {
            let parent = ObjectId::hash_bytes(b"parent");
            let c = commit(vec![parent.clone()], "msg");
            let body = c.body();
            let lines: Vec<_> = body.lines().collect();
            assert_eq!(lines[0], format!("tree {}", Tree::new().id()));
            assert_eq!(lines[1], format!("parent {}", parent));
            assert_eq!(lines[2], "author ada 1700000000 -0700");
            assert_eq!(lines[3], "committer ada 1700000000 -0700");
            assert_eq!(lines[4], "");
            assert_eq!(lines[5], "msg");
            assert!(body.ends_with("msg\n"));
        }

        #[test]
        fn id_uses_framed_bytes() {
            let c = commit(vec![], "root");
            let body = c.body();
            let framed = format!("commit {}\0{}", body.len(), body);
            assert_eq!(c.id(), ObjectId::hash_bytes(framed.as_bytes()));
            assert_ne!(c.id(), ObjectId::hash_bytes(body.as_bytes()));
        }

        #[test]
        fn decode_merge_commit() {
            let p1 = ObjectId::hash_bytes(b"p1");
            let p2 = ObjectId::hash_bytes(b"p2");
            let c = commit(vec![p1.clone(), p2.clone()], "Merge branch 'feat'");
            let decoded = Commit::decode(&c.encode()).unwrap();
            assert_eq!(decoded.parents, vec![p1.clone(), p2]);
            assert_eq!(decoded.first_parent(), Some(&p1));
            assert!(decoded.is_merge());
        }

        #[test]
        fn multiline_message_preserved() {
            let c = commit(vec![], "subject\n\nbody line");
            assert_eq!(Commit::decode(&c.encode()).unwrap().message, "subject\n\nbody line");
        }

        #[test]
        fn author_name_with_spaces() {
            let mut c = commit(vec![], "m");
            c.author.name = "Ada King Lovelace".to_string();
            assert_eq!(
                Commit::decode(&c.encode()).unwrap().author.name,
                "Ada King Lovelace"
            );
        }

        #[test]
        fn missing_nul_is_corrupt() {
            let err = Commit::decode(b"tree abc\n\nmsg\n").unwrap_err();
            assert_eq!(err, SchemaError::MissingHeaderSeparator);
        }

        #[test]
        fn missing_tree_is_corrupt() {
            let body = "author a 1 +0000\ncommitter a 1 +0000\n\nmsg\n";
            let framed = format!("commit {}\0{}", body.len(), body);
            assert_eq!(
                Commit::decode(framed.as_bytes()).unwrap_err(),
                SchemaError::MissingTree
            );
        }

        #[test]
        fn malformed_author_is_corrupt() {
            let body = format!(
                "tree {}\nauthor nobody\ncommitter a 1 +0000\n\nmsg\n",
                Tree::new().id()
            );
            let framed = format!("commit {}\0{}", body.len(), body);
            assert_eq!(
                Commit::decode(framed.as_bytes()).unwrap_err(),
                SchemaError::MalformedField { field: "author" }
            );
        }
    }

    mod signature {
        use super::*;

        #[test]
        fn datetime_applies_offset() {
            let dt = sig("a").datetime().unwrap();
            assert_eq!(dt.timestamp(), 1_700_000_000);
            assert_eq!(dt.offset().local_minus_utc(), -7 * 3600);
        }

        #[test]
        fn bad_offset_has_no_datetime() {
            let mut s = sig("a");
            s.tz_offset = "bogus".to_string();
            assert!(s.datetime().is_none());
        }

        #[test]
        fn now_renders_offset() {
            let s = Signature::now("me");
            assert_eq!(s.tz_offset.len(), 5);
            assert!(s.datetime().is_some());
        }
    }
}
