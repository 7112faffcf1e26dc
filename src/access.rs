//! Role album scopes.
//!
//! A role is granted a handful of albums; the grant covers each album and
//! everything below it. [`AlbumScope`] expands the grant list through a
//! [`FlattenedIndex`] once, so later permission checks are set lookups.

use crate::index::FlattenedIndex;
use crate::types::AlbumId;
use std::collections::BTreeSet;
use tracing::debug;

/// Every album covered by `granted`: the granted albums plus their descendants.
///
/// Granted IDs the index doesn't know are skipped.
pub fn expand_album_ids(
    index: &FlattenedIndex,
    granted: impl IntoIterator<Item = AlbumId>,
) -> BTreeSet<AlbumId> {
    let mut all = BTreeSet::new();
    for album in granted {
        match index.get(album) {
            Some(members) => all.extend(members.iter().copied()),
            None => debug!(album, "granted album is not in the gallery index"),
        }
    }
    all
}

/// The albums a role may act on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumScope {
    granted: BTreeSet<AlbumId>,
    all: BTreeSet<AlbumId>,
}

impl AlbumScope {
    pub fn new(index: &FlattenedIndex, granted: impl IntoIterator<Item = AlbumId>) -> Self {
        let granted: BTreeSet<AlbumId> = granted.into_iter().collect();
        let all = expand_album_ids(index, granted.iter().copied());
        Self { granted, all }
    }

    pub fn is_allowed(&self, album: AlbumId) -> bool {
        self.all.contains(&album)
    }

    /// Albums assigned to the role directly.
    pub fn granted_roots(&self) -> &BTreeSet<AlbumId> {
        &self.granted
    }

    pub fn all_album_ids(&self) -> &BTreeSet<AlbumId> {
        &self.all
    }

    /// Granted albums that already sit under another granted album.
    ///
    /// Dropping these from the grant list leaves the scope unchanged.
    pub fn redundant_grants(&self, index: &FlattenedIndex) -> BTreeSet<AlbumId> {
        self.granted
            .iter()
            .copied()
            .filter(|&album| {
                self.granted
                    .iter()
                    .any(|&other| other != album && index.contains(other, album))
            })
            .collect()
    }
}
