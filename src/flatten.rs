//! Album tree flattening.
//!
//! Turns a gallery's unordered `(album, parent)` edge list into a
//! [`FlattenedIndex`]: every album mapped to itself plus all descendants.
//!
//! ## Walk
//!
//! ```text
//! edges ──group by parent──▶ children map
//!                             │
//! root edge (parent 0) ──▶ depth-first walk ──▶ index
//! ```
//!
//! The walk uses an explicit stack instead of recursion, so tree depth is
//! bounded by heap, not by the thread's call stack. Alongside the stack it
//! keeps the ancestor chain of the album being visited. Each stack frame
//! records its depth; before visiting a frame the chain is truncated to that
//! depth, so a sibling subtree never sees entries pushed by the subtree
//! before it.
//!
//! Each visited album is added to its own entry and to the entry of every
//! album on the chain, which costs O(n × d) for n albums at depth d.
//!
//! ## Excluded edges
//!
//! Edges the walk never reaches are left out of the index without failing
//! the flatten. [`AlbumTreeFlattener::flatten_with_report`] lists them with
//! the reason each was dropped:
//!
//! | Reason | Meaning |
//! |--------|---------|
//! | [`ExclusionReason::DanglingReference`] | parent ID is not an album in the input |
//! | [`ExclusionReason::Unreachable`] | parent exists but is not under the root |
//! | [`ExclusionReason::DiscardedRoot`] | extra root edge dropped by [`RootPolicy::FirstWins`] |
//! | [`ExclusionReason::AlreadyIndexed`] | album is indexed through a different edge |
//!
//! The report is per edge: an album listed under a real parent and under a
//! missing one is indexed once and its second edge reported as
//! `AlreadyIndexed`.
//!
//! ## Roots
//!
//! A gallery has exactly one root album. With no root edge the flatten fails
//! with [`FlattenError::MissingRootAlbum`]. With several, [`RootPolicy`]
//! decides: `Strict` rejects the input, `FirstWins` keeps the first root edge
//! in input order and drops the rest along with their subtrees.

use crate::index::FlattenedIndex;
use crate::types::{AlbumEdge, AlbumId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlattenError {
    #[error("No root album (parent ID 0) among {edge_count} album edges")]
    MissingRootAlbum { edge_count: usize },
    #[error("Multiple root albums (parent ID 0): {candidates:?}")]
    MultipleRootAlbums { candidates: Vec<AlbumId> },
    #[error("Album {0} reached more than once while walking the tree")]
    DuplicateAlbum(AlbumId),
}

/// How to treat input with more than one root edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootPolicy {
    /// Reject the gallery with [`FlattenError::MultipleRootAlbums`].
    #[default]
    #[serde(rename = "strict")]
    Strict,
    /// Use the first root edge in input order; drop the others.
    #[serde(rename = "first")]
    FirstWins,
}

/// Why an edge was left out of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    DanglingReference,
    Unreachable,
    DiscardedRoot,
    AlreadyIndexed,
}

impl ExclusionReason {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::DanglingReference => "parent album does not exist",
            Self::Unreachable => "parent album is not under the root",
            Self::DiscardedRoot => "additional root album ignored",
            Self::AlreadyIndexed => "album already indexed under another parent",
        }
    }
}

/// One input edge the walk did not follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExcludedEdge {
    pub edge: AlbumEdge,
    pub reason: ExclusionReason,
}

/// Side information gathered while flattening.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlattenReport {
    /// Root album the index was built from, `None` for empty input.
    pub root: Option<AlbumId>,
    /// Edges left out of the index, in input order.
    pub excluded: Vec<ExcludedEdge>,
}

impl FlattenReport {
    /// True when every input edge made it into the index.
    pub fn is_clean(&self) -> bool {
        self.excluded.is_empty()
    }

    pub fn excluded_with(&self, reason: ExclusionReason) -> impl Iterator<Item = &AlbumEdge> {
        self.excluded
            .iter()
            .filter(move |e| e.reason == reason)
            .map(|e| &e.edge)
    }
}

/// Builds [`FlattenedIndex`]es from album edge lists.
#[derive(Debug, Clone, Copy)]
pub struct AlbumTreeFlattener {
    root_policy: RootPolicy,
    log_excluded: bool,
}

impl Default for AlbumTreeFlattener {
    fn default() -> Self {
        Self::new(RootPolicy::default())
    }
}

impl AlbumTreeFlattener {
    pub fn new(root_policy: RootPolicy) -> Self {
        Self {
            root_policy,
            log_excluded: true,
        }
    }

    /// Toggle `warn`-level logging of excluded edges.
    pub fn with_excluded_logging(mut self, enabled: bool) -> Self {
        self.log_excluded = enabled;
        self
    }

    pub fn root_policy(&self) -> RootPolicy {
        self.root_policy
    }

    /// Flatten `edges`, silently dropping edges unreachable from the root.
    pub fn flatten(&self, edges: &[AlbumEdge]) -> Result<FlattenedIndex, FlattenError> {
        self.flatten_with_report(edges).map(|(index, _)| index)
    }

    /// Flatten `edges` and report which edges were excluded and why.
    pub fn flatten_with_report(
        &self,
        edges: &[AlbumEdge],
    ) -> Result<(FlattenedIndex, FlattenReport), FlattenError> {
        let mut index = FlattenedIndex::new();
        if edges.is_empty() {
            return Ok((index, FlattenReport::default()));
        }

        let root_pos = self.select_root(edges)?;
        let root = edges[root_pos].album_id;
        let children = group_by_parent(edges);

        index.insert_album(root);
        let mut chain: Vec<AlbumId> = vec![root];
        let mut stack: Vec<(AlbumId, usize)> = Vec::new();
        push_children(&mut stack, &children, root, 1);

        while let Some((album, depth)) = stack.pop() {
            if index.has_album(album) {
                return Err(FlattenError::DuplicateAlbum(album));
            }
            chain.truncate(depth);
            index.insert_album(album);
            for &ancestor in &chain {
                index.add_descendant(ancestor, album);
            }
            chain.push(album);
            push_children(&mut stack, &children, album, depth + 1);
        }

        let report = FlattenReport {
            root: Some(root),
            excluded: excluded_edges(edges, root_pos, &index),
        };

        debug!(
            root,
            albums = index.len(),
            excluded = report.excluded.len(),
            "flattened album tree"
        );
        if self.log_excluded {
            for excluded in &report.excluded {
                warn!(
                    album = excluded.edge.album_id,
                    parent = excluded.edge.parent_id,
                    "album excluded from index: {}",
                    excluded.reason.describe()
                );
            }
        }

        Ok((index, report))
    }

    /// Position of the root edge in `edges`.
    fn select_root(&self, edges: &[AlbumEdge]) -> Result<usize, FlattenError> {
        let roots: Vec<usize> = edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_root())
            .map(|(pos, _)| pos)
            .collect();

        match (roots.as_slice(), self.root_policy) {
            ([], _) => Err(FlattenError::MissingRootAlbum {
                edge_count: edges.len(),
            }),
            ([only], _) => Ok(*only),
            ([first, ..], RootPolicy::FirstWins) => Ok(*first),
            (_, RootPolicy::Strict) => Err(FlattenError::MultipleRootAlbums {
                candidates: roots.iter().map(|&pos| edges[pos].album_id).collect(),
            }),
        }
    }
}

/// Flatten with the default strict root policy.
pub fn flatten(edges: &[AlbumEdge]) -> Result<FlattenedIndex, FlattenError> {
    AlbumTreeFlattener::default().flatten(edges)
}

/// Direct children of each parent, in input order.
fn group_by_parent(edges: &[AlbumEdge]) -> HashMap<AlbumId, Vec<AlbumId>> {
    let mut children: HashMap<AlbumId, Vec<AlbumId>> = HashMap::new();
    for edge in edges.iter().filter(|e| !e.is_root()) {
        children.entry(edge.parent_id).or_default().push(edge.album_id);
    }
    children
}

/// Push `parent`'s children so that the first child is popped first.
fn push_children(
    stack: &mut Vec<(AlbumId, usize)>,
    children: &HashMap<AlbumId, Vec<AlbumId>>,
    parent: AlbumId,
    depth: usize,
) {
    if let Some(kids) = children.get(&parent) {
        stack.extend(kids.iter().rev().map(|&id| (id, depth)));
    }
}

fn excluded_edges(
    edges: &[AlbumEdge],
    root_pos: usize,
    index: &FlattenedIndex,
) -> Vec<ExcludedEdge> {
    let known: HashSet<AlbumId> = edges.iter().map(|e| e.album_id).collect();

    edges
        .iter()
        .enumerate()
        .filter(|(pos, _)| *pos != root_pos)
        .filter_map(|(_, edge)| {
            if !edge.is_root() && index.has_album(edge.parent_id) {
                return None;
            }
            let reason = if index.has_album(edge.album_id) {
                ExclusionReason::AlreadyIndexed
            } else if edge.is_root() {
                ExclusionReason::DiscardedRoot
            } else if known.contains(&edge.parent_id) {
                ExclusionReason::Unreachable
            } else {
                ExclusionReason::DanglingReference
            };
            Some(ExcludedEdge {
                edge: *edge,
                reason,
            })
        })
        .collect()
}
