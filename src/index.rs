//! The flattened album index.
//!
//! A [`FlattenedIndex`] maps every album in a gallery to the set holding the
//! album itself plus all of its descendants at any depth. Once built, a
//! subtree-membership question ("is album B somewhere under album A?") is a
//! single set lookup.
//!
//! ## Shape
//!
//! For the tree
//!
//! ```text
//! 1
//! ├── 2
//! │   └── 4
//! └── 3
//! ```
//!
//! the index is
//!
//! ```text
//! 1 → {1, 2, 3, 4}
//! 2 → {2, 4}
//! 3 → {3}
//! 4 → {4}
//! ```
//!
//! Sets are `BTreeSet`s, so each ID appears at most once and serialized output
//! is stable across runs. In JSON the index is an object keyed by album ID:
//! `{"1": [1, 2, 3, 4], "2": [2, 4], ...}`. Deserializing rejects any entry
//! whose set does not hold the album itself.

use crate::types::AlbumId;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

type Entries = BTreeMap<AlbumId, BTreeSet<AlbumId>>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Album {0} is missing from its own member set")]
    MissingSelf(AlbumId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Entries")]
pub struct FlattenedIndex {
    entries: Entries,
}

impl FlattenedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an entry for `album` containing only itself.
    pub(crate) fn insert_album(&mut self, album: AlbumId) {
        self.entries.entry(album).or_default().insert(album);
    }

    /// Record `album` as a descendant of `ancestor`.
    pub(crate) fn add_descendant(&mut self, ancestor: AlbumId, album: AlbumId) {
        self.entries.entry(ancestor).or_default().insert(album);
    }

    pub(crate) fn has_album(&self, album: AlbumId) -> bool {
        self.entries.contains_key(&album)
    }

    /// The album's own ID plus all descendant IDs, if the album is indexed.
    pub fn get(&self, album: AlbumId) -> Option<&BTreeSet<AlbumId>> {
        self.entries.get(&album)
    }

    /// Whether `album` is `ancestor` itself or lives anywhere below it.
    ///
    /// Unknown IDs on either side yield `false`.
    pub fn contains(&self, ancestor: AlbumId, album: AlbumId) -> bool {
        self.entries
            .get(&ancestor)
            .is_some_and(|set| set.contains(&album))
    }

    /// Strict descendants of `album` (the album itself excluded).
    pub fn descendants(&self, album: AlbumId) -> impl Iterator<Item = AlbumId> + '_ {
        self.entries
            .get(&album)
            .into_iter()
            .flat_map(|set| set.iter().copied())
            .filter(move |id| *id != album)
    }

    /// Number of indexed albums.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All indexed album IDs in ascending order.
    pub fn album_ids(&self) -> impl Iterator<Item = AlbumId> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AlbumId, &BTreeSet<AlbumId>)> {
        self.entries.iter().map(|(id, set)| (*id, set))
    }

    /// Order-independent equality: same albums, same member sets.
    ///
    /// Equivalent to `==` because member sets are ordered, but reads better at
    /// call sites that compare indexes built from differently ordered input.
    pub fn set_eq(&self, other: &FlattenedIndex) -> bool {
        self.entries == other.entries
    }
}

impl TryFrom<Entries> for FlattenedIndex {
    type Error = IndexError;

    fn try_from(entries: Entries) -> Result<Self, Self::Error> {
        if let Some((&album, _)) = entries.iter().find(|(album, set)| !set.contains(album)) {
            return Err(IndexError::MissingSelf(album));
        }
        Ok(Self { entries })
    }
}

impl Serialize for FlattenedIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl FromIterator<(AlbumId, BTreeSet<AlbumId>)> for FlattenedIndex {
    fn from_iter<T: IntoIterator<Item = (AlbumId, BTreeSet<AlbumId>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::index_of;

    fn sample() -> FlattenedIndex {
        index_of(&[(1, &[1, 2, 3, 4]), (2, &[2, 4]), (3, &[3]), (4, &[4])])
    }

    #[test]
    fn contains_self_and_descendants() {
        let index = sample();
        assert!(index.contains(1, 1));
        assert!(index.contains(1, 4));
        assert!(index.contains(2, 4));
        assert!(!index.contains(2, 3));
        assert!(!index.contains(4, 2));
    }

    #[test]
    fn contains_unknown_ids_is_false() {
        let index = sample();
        assert!(!index.contains(99, 1));
        assert!(!index.contains(1, 99));
    }

    #[test]
    fn descendants_exclude_self() {
        let index = sample();
        let below: Vec<_> = index.descendants(1).collect();
        assert_eq!(below, vec![2, 3, 4]);
        assert_eq!(index.descendants(3).count(), 0);
        assert_eq!(index.descendants(42).count(), 0);
    }

    #[test]
    fn album_ids_ascending() {
        let index = sample();
        assert_eq!(index.album_ids().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(index.len(), 4);
        assert!(!index.is_empty());
        assert!(FlattenedIndex::new().is_empty());
    }

    #[test]
    fn insert_is_unique() {
        let mut index = FlattenedIndex::new();
        index.insert_album(5);
        index.add_descendant(5, 6);
        index.add_descendant(5, 6);
        assert_eq!(index.get(5).unwrap().len(), 2);
    }

    #[test]
    fn json_is_object_keyed_by_album() {
        let index = index_of(&[(1, &[1, 2]), (2, &[2])]);
        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(json, r#"{"1":[1,2],"2":[2]}"#);

        let back: FlattenedIndex = serde_json::from_str(&json).unwrap();
        assert!(back.set_eq(&index));
    }

    #[test]
    fn json_entry_without_own_album_is_rejected() {
        let err = serde_json::from_str::<FlattenedIndex>(r#"{"1":[2],"2":[2]}"#).unwrap_err();
        assert!(err.to_string().contains("Album 1 is missing"), "{err}");

        assert!(serde_json::from_str::<FlattenedIndex>("{}").unwrap().is_empty());
    }

    #[test]
    fn try_from_checks_every_entry() {
        let entries = BTreeMap::from([(1, BTreeSet::from([1, 2])), (2, BTreeSet::new())]);
        assert_eq!(
            FlattenedIndex::try_from(entries),
            Err(IndexError::MissingSelf(2))
        );
    }
}
