//! CLI output formatting.
//!
//! Each command has a `format_*` function returning lines (pure, no I/O, easy
//! to test) and a `print_*` wrapper that writes them out.
//!
//! ## Flatten / Check
//!
//! ```text
//! Gallery 1: 5 albums from 6 edges (root 1)
//!     Excluded: album 99 under 50 (parent album does not exist)
//! Gallery 2: FAILED: No root album (parent ID 0) among 3 album edges
//!
//! 1 gallery indexed, 1 failed
//! ```
//!
//! ## Subtree
//!
//! ```text
//! Gallery 1, album 2: 3 albums
//!     2
//!     4
//!     6
//! ```
//!
//! The JSON index itself goes to stdout (or a file); summaries for `flatten`
//! go to stderr so the two never mix.

use crate::gallery::GalleryOutcome;
use crate::types::{AlbumId, GalleryId};
use std::collections::BTreeSet;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// One header line per gallery, with excluded edges listed underneath.
///
/// `show_excluded` controls whether excluded edges get their own lines; the
/// count is always part of the header.
pub fn format_outcomes(outcomes: &[GalleryOutcome], show_excluded: bool) -> Vec<String> {
    let mut lines = Vec::new();

    for outcome in outcomes {
        match &outcome.result {
            Ok((index, report)) => {
                let root = report
                    .root
                    .map(|r| format!(" (root {r})"))
                    .unwrap_or_default();
                let mut header = format!(
                    "Gallery {}: {} from {}{}",
                    outcome.gallery_id,
                    plural(index.len(), "album", "albums"),
                    plural(outcome.edge_count, "edge", "edges"),
                    root
                );
                if !report.is_clean() {
                    header.push_str(&format!(", {} excluded", report.excluded.len()));
                }
                lines.push(header);

                if show_excluded {
                    for excluded in &report.excluded {
                        lines.push(format!(
                            "{}Excluded: album {} under {} ({})",
                            indent(1),
                            excluded.edge.album_id,
                            excluded.edge.parent_id,
                            excluded.reason.describe()
                        ));
                    }
                }
            }
            Err(e) => {
                lines.push(format!("Gallery {}: FAILED: {}", outcome.gallery_id, e));
            }
        }
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    let indexed = outcomes.len() - failed;
    lines.push(String::new());
    lines.push(format!(
        "{} indexed, {} failed",
        plural(indexed, "gallery", "galleries"),
        failed
    ));

    lines
}

/// Members of one album's subtree, the album itself first.
pub fn format_subtree(
    gallery_id: GalleryId,
    album: AlbumId,
    members: &BTreeSet<AlbumId>,
) -> Vec<String> {
    let mut lines = vec![format!(
        "Gallery {}, album {}: {}",
        gallery_id,
        album,
        plural(members.len(), "album", "albums")
    )];
    lines.push(format!("{}{}", indent(1), album));
    lines.extend(
        members
            .iter()
            .filter(|id| **id != album)
            .map(|id| format!("{}{}", indent(1), id)),
    );
    lines
}

/// Print flatten summaries to stderr, keeping stdout for the JSON index.
pub fn print_flatten_summary(outcomes: &[GalleryOutcome]) {
    for line in format_outcomes(outcomes, false) {
        eprintln!("{}", line);
    }
}

pub fn print_check_output(outcomes: &[GalleryOutcome]) {
    for line in format_outcomes(outcomes, true) {
        println!("{}", line);
    }
}

pub fn print_subtree(gallery_id: GalleryId, album: AlbumId, members: &BTreeSet<AlbumId>) {
    for line in format_subtree(gallery_id, album, members) {
        println!("{}", line);
    }
}
