//! Shared test utilities for the album-index test suite.
//!
//! Builders turn compact tuple literals into edges and indexes, and
//! [`assert_index`] compares a computed index against an expected shape
//! with a readable failure message.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let index = flatten(&edges(&[(1, 0), (2, 1)])).unwrap();
//! assert_index(&index, &[(1, &[1, 2]), (2, &[2])]);
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;

use crate::index::FlattenedIndex;
use crate::types::{AlbumEdge, AlbumId};

// =========================================================================
// Builders
// =========================================================================

/// `(album, parent)` pairs to edges.
pub fn edges(pairs: &[(AlbumId, AlbumId)]) -> Vec<AlbumEdge> {
    pairs.iter().copied().map(AlbumEdge::from).collect()
}

/// Build an index directly from `(album, members)` pairs.
pub fn index_of(entries: &[(AlbumId, &[AlbumId])]) -> FlattenedIndex {
    entries
        .iter()
        .map(|(id, members)| (*id, members.iter().copied().collect::<BTreeSet<_>>()))
        .collect()
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert that `index` has exactly the expected albums and member sets.
///
/// Member order in `expected` is irrelevant.
pub fn assert_index(index: &FlattenedIndex, expected: &[(AlbumId, &[AlbumId])]) {
    let expected = index_of(expected);
    let actual_ids: Vec<AlbumId> = index.album_ids().collect();
    let expected_ids: Vec<AlbumId> = expected.album_ids().collect();
    assert_eq!(actual_ids, expected_ids, "indexed albums mismatch");

    for (id, members) in expected.iter() {
        assert_eq!(
            index.get(id),
            Some(members),
            "members of album {id} mismatch"
        );
    }
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `json` as `galleries.json` (and `config` as `config.toml`, if given)
/// into a fresh temp directory.
pub fn write_input(json: &str, config: Option<&str>) -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("galleries.json"), json).unwrap();
    if let Some(config) = config {
        std::fs::write(tmp.path().join("config.toml"), config).unwrap();
    }
    tmp
}

/// Path of the input file created by [`write_input`].
pub fn input_path(dir: &Path) -> std::path::PathBuf {
    dir.join("galleries.json")
}
