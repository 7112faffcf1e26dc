//! Shared types for album hierarchies.
//!
//! These are the rows handed over by whatever store holds the gallery: one
//! [`AlbumEdge`] per album, naming the album and its parent.

use serde::{Deserialize, Serialize};

/// Album identifier as issued by the upstream store.
pub type AlbumId = i32;

/// Gallery identifier. Every gallery owns exactly one album tree.
pub type GalleryId = i32;

/// Parent ID carried by the root album's edge.
pub const ROOT_PARENT_ID: AlbumId = 0;

/// One row of the album hierarchy: `album_id` lives directly under `parent_id`.
///
/// A `parent_id` of [`ROOT_PARENT_ID`] marks the gallery's root album.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlbumEdge {
    pub album_id: AlbumId,
    pub parent_id: AlbumId,
}

impl AlbumEdge {
    pub fn new(album_id: AlbumId, parent_id: AlbumId) -> Self {
        Self {
            album_id,
            parent_id,
        }
    }

    /// Whether this edge marks a root album (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT_ID
    }
}

impl From<(AlbumId, AlbumId)> for AlbumEdge {
    fn from((album_id, parent_id): (AlbumId, AlbumId)) -> Self {
        Self::new(album_id, parent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_edge_has_zero_parent() {
        assert!(AlbumEdge::new(1, 0).is_root());
        assert!(!AlbumEdge::new(2, 1).is_root());
    }

    #[test]
    fn edge_from_tuple() {
        let edge: AlbumEdge = (7, 3).into();
        assert_eq!(edge.album_id, 7);
        assert_eq!(edge.parent_id, 3);
    }

    #[test]
    fn edge_json_field_names() {
        let edge: AlbumEdge = serde_json::from_str(r#"{"album_id": 4, "parent_id": 2}"#).unwrap();
        assert_eq!(edge, AlbumEdge::new(4, 2));
    }
}
