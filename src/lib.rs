//! # Album Index
//!
//! Flattened descendant indexes over gallery album trees.
//!
//! A gallery stores its albums as a tree: every album has one parent, and the
//! root album has none (parent ID `0`). Permission checks constantly ask
//! whether one album sits below another, e.g. a role granted "Travel" may open
//! "Travel/Japan/Kyoto". Walking parent links for every check is wasteful, so
//! this crate precomputes, per album, the set of the album itself plus all its
//! descendants.
//!
//! # Pipeline
//!
//! ```text
//! galleries.json ──load──▶ EdgeManifest ──flatten (per gallery, parallel)──▶ IndexManifest
//!                                                   │
//!                                                   └──▶ FlattenReport (excluded edges)
//! ```
//!
//! The edge list is read once per gallery and the index computed from
//! scratch. Any structural change to the tree means recomputing that
//! gallery's index; there is no incremental update.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `AlbumEdge` rows and ID aliases |
//! | [`flatten`] | The flattening walk, root policy, excluded-edge report |
//! | [`index`] | `FlattenedIndex` and its membership queries |
//! | [`access`] | Expanding a role's granted albums through an index |
//! | [`gallery`] | Multi-gallery JSON input, parallel flattening, index output |
//! | [`config`] | `config.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Stack, Not Recursion
//!
//! The walk keeps its own stack and ancestor chain, so a pathologically deep
//! tree costs heap rather than overflowing the thread stack. Frames carry
//! their depth and the chain is truncated to it on every pop; siblings can
//! never observe each other's ancestors.
//!
//! ## One Root, Strictly
//!
//! A gallery with several root albums is a data-integrity problem upstream,
//! and the default [`flatten::RootPolicy::Strict`] says so with an error.
//! `root_policy = "first"` exists for stores known to carry stray roots: the
//! first root edge in input order wins and the rest are reported as excluded.
//!
//! ## Silent Exclusion, Loud Report
//!
//! Edges that cannot be reached from the root (missing parent, detached
//! subtree) are left out of the index rather than failing the whole gallery.
//! They are still listed in the [`flatten::FlattenReport`] and, unless
//! disabled, logged through `tracing`.

pub mod access;
pub mod config;
pub mod flatten;
pub mod gallery;
pub mod index;
pub mod output;
pub mod types;

pub use flatten::{AlbumTreeFlattener, FlattenError, RootPolicy, flatten};
pub use index::{FlattenedIndex, IndexError};
pub use types::{AlbumEdge, AlbumId, GalleryId};

#[cfg(test)]
pub(crate) mod test_helpers;
