//! Multi-gallery input and output.
//!
//! An installation hosts several galleries, each with its own album tree.
//! The edge lists arrive as one JSON document:
//!
//! ```text
//! {
//!   "galleries": [
//!     { "gallery_id": 1, "albums": [ { "album_id": 1, "parent_id": 0 }, ... ] },
//!     { "gallery_id": 2, "albums": [ ... ] }
//!   ]
//! }
//! ```
//!
//! Each gallery is flattened on its own, in parallel on the rayon pool. A
//! failing gallery yields an error outcome without touching the others.
//! Successful indexes are collected into an [`IndexManifest`] keyed by
//! gallery ID.

use crate::flatten::{AlbumTreeFlattener, FlattenError, FlattenReport};
use crate::index::FlattenedIndex;
use crate::types::{AlbumEdge, GalleryId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Gallery {0} appears more than once in the input")]
    DuplicateGallery(GalleryId),
    #[error("Gallery {0} not found in the input")]
    UnknownGallery(GalleryId),
    #[error("Gallery {gallery_id}: {source}")]
    Flatten {
        gallery_id: GalleryId,
        #[source]
        source: FlattenError,
    },
}

/// Album edges for every gallery, as read from the input file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeManifest {
    pub galleries: Vec<GalleryEdges>,
}

/// One gallery's album hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryEdges {
    pub gallery_id: GalleryId,
    #[serde(default)]
    pub albums: Vec<AlbumEdge>,
}

impl EdgeManifest {
    /// Reject manifests that list the same gallery twice.
    pub fn validate(&self) -> Result<(), GalleryError> {
        let mut seen = HashSet::new();
        for gallery in &self.galleries {
            if !seen.insert(gallery.gallery_id) {
                return Err(GalleryError::DuplicateGallery(gallery.gallery_id));
            }
        }
        Ok(())
    }

    pub fn gallery(&self, gallery_id: GalleryId) -> Result<&GalleryEdges, GalleryError> {
        self.galleries
            .iter()
            .find(|g| g.gallery_id == gallery_id)
            .ok_or(GalleryError::UnknownGallery(gallery_id))
    }
}

/// Read and validate an edge manifest from a JSON file.
pub fn load_edges(path: &Path) -> Result<EdgeManifest, GalleryError> {
    let content = std::fs::read_to_string(path)?;
    let manifest: EdgeManifest = serde_json::from_str(&content)?;
    manifest.validate()?;
    Ok(manifest)
}

/// Result of flattening one gallery.
#[derive(Debug)]
pub struct GalleryOutcome {
    pub gallery_id: GalleryId,
    pub edge_count: usize,
    pub result: Result<(FlattenedIndex, FlattenReport), FlattenError>,
}

impl GalleryOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Flatten every gallery in parallel, returning outcomes in input order.
pub fn flatten_galleries(
    manifest: &EdgeManifest,
    flattener: &AlbumTreeFlattener,
) -> Vec<GalleryOutcome> {
    manifest
        .galleries
        .par_iter()
        .map(|gallery| {
            debug!(
                gallery = gallery.gallery_id,
                edges = gallery.albums.len(),
                "flattening gallery"
            );
            GalleryOutcome {
                gallery_id: gallery.gallery_id,
                edge_count: gallery.albums.len(),
                result: flattener.flatten_with_report(&gallery.albums),
            }
        })
        .collect()
}

/// Flattened indexes for all galleries, keyed by gallery ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub galleries: BTreeMap<GalleryId, FlattenedIndex>,
}

impl IndexManifest {
    /// Collect successful outcomes; the first failed gallery becomes the error.
    pub fn from_outcomes(outcomes: Vec<GalleryOutcome>) -> Result<Self, GalleryError> {
        let mut galleries = BTreeMap::new();
        for outcome in outcomes {
            match outcome.result {
                Ok((index, _)) => {
                    galleries.insert(outcome.gallery_id, index);
                }
                Err(source) => {
                    return Err(GalleryError::Flatten {
                        gallery_id: outcome.gallery_id,
                        source,
                    });
                }
            }
        }
        Ok(Self { galleries })
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, GalleryError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
